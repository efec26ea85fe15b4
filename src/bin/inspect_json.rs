use anyhow::Context;
use clap::Parser;
use recproc::adapters::json_source;
use recproc::core::extract::extract_keys;
use recproc::core::traversal;
use recproc::utils::logger;

#[derive(Parser)]
#[command(name = "inspect-json")]
#[command(about = "Walk a JSON document or extract a key set from its records")]
struct Args {
    /// Path to the JSON document
    file: String,

    /// Comma-separated keys to extract instead of printing the full walk
    #[arg(short, long)]
    keys: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let doc = json_source::load_value(&args.file)
        .with_context(|| format!("loading JSON document '{}'", args.file))?;

    match &args.keys {
        Some(keys) => {
            let wanted: Vec<String> = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();

            let rows = extract_keys(&doc, &wanted).context("extracting keys")?;
            tracing::info!("✅ Extracted {} records", rows.len());
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        None => {
            print!("{}", traversal::render(&doc));
        }
    }

    Ok(())
}
