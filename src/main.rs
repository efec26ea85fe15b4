use clap::Parser;
use recproc::adapters::{csv_source, json_source};
use recproc::core::export::default_export_path;
use recproc::core::transforms::CleanFields;
use recproc::utils::monitor::SystemMonitor;
use recproc::utils::{logger, validation::Validate};
use recproc::{CliConfig, Exporter, JobConfig, LocalStorage, ProcessingPipeline, RecordSource};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting recproc");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let job = match &cli.config {
        Some(path) => match JobConfig::from_file(path) {
            Ok(job) => job,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML");
                std::process::exit(1);
            }
        },
        None => JobConfig::default(),
    };

    if let Err(e) = job.validate() {
        tracing::error!("❌ Job validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let monitor = SystemMonitor::new(cli.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run(&cli, &job, &monitor) {
        Ok(export_path) => {
            monitor.log_final_stats();
            tracing::info!("✅ Processing completed successfully!");
            println!("✅ Processing completed successfully!");
            println!("📁 Output saved to: {}", export_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Processing failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn load_source(input: &str) -> recproc::Result<RecordSource> {
    match Path::new(input).extension().and_then(|ext| ext.to_str()) {
        Some("json") => json_source::load_records(input),
        _ => csv_source::load_csv(input),
    }
}

fn run(
    cli: &CliConfig,
    job: &JobConfig,
    monitor: &SystemMonitor,
) -> recproc::Result<String> {
    let source = load_source(&cli.input)?;
    monitor.log_stats("load");

    if cli.analyze {
        for (i, summary) in source.column_summaries().iter().enumerate() {
            tracing::info!(
                "{}. Column '{}': type {}, {} with data, {} empty, {} distinct, samples {:?}",
                i + 1,
                summary.field,
                summary.type_tag,
                summary.non_null_count,
                summary.null_count,
                summary.distinct_count,
                summary.samples
            );
        }
    }

    let transform: CleanFields = job.build_transform()?;
    let pipeline = ProcessingPipeline::new();
    let pipeline_run = pipeline.run(&source, &transform)?;
    monitor.log_stats("process");

    let storage = LocalStorage::new("");
    let exporter = Exporter::new(storage);

    let destination = cli
        .export
        .as_deref()
        .or_else(|| {
            job.export
                .as_ref()
                .and_then(|e| e.destination.as_deref())
        });
    let export_path = exporter.export_source(&source, destination)?;

    if cli.export_run_log || job.run_log_enabled() {
        let base = default_export_path(source.name());
        let run_log_path = base.replace("_export.json", "_runlog.json");
        exporter.export_run(&pipeline_run, &run_log_path)?;
    }
    monitor.log_stats("export");

    tracing::info!(
        "📊 Summary: {} succeeded, {} failed, {} total",
        pipeline_run.success_count,
        pipeline_run.failure_count,
        pipeline_run.total_rows
    );

    Ok(export_path)
}
