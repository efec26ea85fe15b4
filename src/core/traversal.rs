use serde_json::Value;
use std::fmt;

/// Position of a visited node inside its parent: a map key or a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Key(String),
    Index(usize),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Key(k) => write!(f, "'{}'", k),
            Locator::Index(i) => write!(f, "element {}", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    List,
    Map,
}

impl NodeKind {
    pub fn of(node: &Value) -> NodeKind {
        match node {
            Value::Array(_) => NodeKind::List,
            Value::Object(_) => NodeKind::Map,
            _ => NodeKind::Scalar,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Scalar => "scalar",
            NodeKind::List => "list",
            NodeKind::Map => "map",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    /// A leaf value with its runtime type tag.
    Leaf { value: Value, type_tag: &'static str },
    /// A nested container announced before its contents.
    Open,
    /// A list announcing how many elements follow.
    Elements(usize),
}

/// One visit notification emitted while walking a value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalEvent {
    pub depth: usize,
    pub locator: Option<Locator>,
    pub kind: NodeKind,
    pub detail: EventDetail,
}

fn scalar_type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) | Value::Object(_) => "container",
    }
}

enum Task<'a> {
    Visit {
        node: &'a Value,
        depth: usize,
        locator: Option<Locator>,
    },
    Emit(TraversalEvent),
}

/// Lazy traversal of a decoded value tree. Every node is visited exactly
/// once, in document order:
///
/// - a map entry with a scalar value emits one leaf event; an entry with a
///   container value emits an open event, then the child's events one
///   level deeper;
/// - a list emits an element-count event, then each element's events one
///   level deeper, tagged with the element index instead of a key;
/// - a bare scalar emits a single leaf event.
///
/// The recursion lives on an explicit work stack, so depth is bounded by
/// the heap rather than the call stack.
pub struct Walk<'a> {
    stack: Vec<Task<'a>>,
}

pub fn walk(node: &Value) -> Walk<'_> {
    Walk {
        stack: vec![Task::Visit {
            node,
            depth: 0,
            locator: None,
        }],
    }
}

impl<'a> Walk<'a> {
    /// Expand one node. Returns the event to surface now, or `None` when
    /// the node itself is silent (a bare map or list only queues work).
    fn visit(
        &mut self,
        node: &'a Value,
        depth: usize,
        locator: Option<Locator>,
    ) -> Option<TraversalEvent> {
        match node {
            Value::Object(entries) => {
                // A map reached as a list element announces itself so the
                // positional index is not lost; a map reached by key was
                // already announced by its parent's open event.
                let (entry_depth, opened) = match &locator {
                    Some(Locator::Index(_)) => (depth + 1, true),
                    _ => (depth, false),
                };

                for (key, child) in entries.iter().rev() {
                    self.push_entry(child, entry_depth, Locator::Key(key.clone()));
                }

                opened.then_some(TraversalEvent {
                    depth,
                    locator,
                    kind: NodeKind::Map,
                    detail: EventDetail::Open,
                })
            }
            Value::Array(elements) => {
                let (summary_depth, opened) = match &locator {
                    Some(Locator::Index(_)) => (depth + 1, true),
                    _ => (depth, false),
                };

                for (i, child) in elements.iter().enumerate().rev() {
                    self.stack.push(Task::Visit {
                        node: child,
                        depth: summary_depth + 1,
                        locator: Some(Locator::Index(i)),
                    });
                }
                self.stack.push(Task::Emit(TraversalEvent {
                    depth: summary_depth,
                    locator: None,
                    kind: NodeKind::List,
                    detail: EventDetail::Elements(elements.len()),
                }));

                opened.then_some(TraversalEvent {
                    depth,
                    locator,
                    kind: NodeKind::List,
                    detail: EventDetail::Open,
                })
            }
            scalar => Some(TraversalEvent {
                depth,
                locator,
                kind: NodeKind::Scalar,
                detail: EventDetail::Leaf {
                    value: scalar.clone(),
                    type_tag: scalar_type_tag(scalar),
                },
            }),
        }
    }

    /// Queue the tasks for one map entry: scalar children collapse into a
    /// single leaf visit, container children get an open event first.
    fn push_entry(&mut self, child: &'a Value, depth: usize, locator: Locator) {
        match NodeKind::of(child) {
            NodeKind::Scalar => self.stack.push(Task::Visit {
                node: child,
                depth,
                locator: Some(locator),
            }),
            kind => {
                self.stack.push(Task::Visit {
                    node: child,
                    depth: depth + 1,
                    locator: None,
                });
                self.stack.push(Task::Emit(TraversalEvent {
                    depth,
                    locator: Some(locator),
                    kind,
                    detail: EventDetail::Open,
                }));
            }
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = TraversalEvent;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(task) = self.stack.pop() {
            let event = match task {
                Task::Emit(event) => Some(event),
                Task::Visit {
                    node,
                    depth,
                    locator,
                } => self.visit(node, depth, locator),
            };
            if event.is_some() {
                return event;
            }
        }
        None
    }
}

/// Format a traversal as indented text, one line per event.
pub fn render(node: &Value) -> String {
    let mut out = String::new();
    for event in walk(node) {
        let indent = "  ".repeat(event.depth);
        let line = match (&event.locator, &event.detail) {
            (Some(loc), EventDetail::Leaf { value, type_tag }) => {
                format!("{}{} -> {} ({})", indent, loc, compact(value), type_tag)
            }
            (None, EventDetail::Leaf { value, type_tag }) => {
                format!("{}{} ({})", indent, compact(value), type_tag)
            }
            (Some(loc), EventDetail::Open) => {
                format!("{}{} -> {}", indent, loc, event.kind.label())
            }
            (None, EventDetail::Open) => format!("{}{}", indent, event.kind.label()),
            (_, EventDetail::Elements(n)) => format!("{}list of {} elements", indent, n),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
