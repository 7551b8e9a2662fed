use serde_json::{Value, json};

/// How a processor nests other steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorShape {
    /// No nested steps.
    Simple,
    /// Owns one nested `steps` chain.
    Container,
    /// Owns a list of branches plus an optional special branch.
    Branching {
        branches: &'static str,
        special: Option<&'static str>,
    },
}

/// Static description of a known processor.
#[derive(Debug, Clone, Copy)]
pub struct ProcessorInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub shape: ProcessorShape,
    pub requires_uri: bool,
    pub requires_expression: bool,
}

/// Builds the processor table. Each row is `(name, title, shape, uri, expression)`.
macro_rules! define_processors {
    ( $( ($name:expr, $title:expr, $shape:expr, $uri:expr, $expression:expr) ),* $(,)? ) => {
        const PROCESSORS: &[ProcessorInfo] = &[
            $( ProcessorInfo {
                name: $name,
                title: $title,
                shape: $shape,
                requires_uri: $uri,
                requires_expression: $expression,
            }, )*
        ];
    };
}

define_processors! {
    ("from", "From", ProcessorShape::Simple, true, false),
    ("to", "To", ProcessorShape::Simple, true, false),
    ("toD", "To Dynamic", ProcessorShape::Simple, true, false),
    ("wireTap", "Wire Tap", ProcessorShape::Simple, true, false),
    ("log", "Log", ProcessorShape::Simple, false, false),
    ("setBody", "Set Body", ProcessorShape::Simple, false, true),
    ("setHeader", "Set Header", ProcessorShape::Simple, false, true),
    (
        "choice",
        "Choice",
        ProcessorShape::Branching { branches: "when", special: Some("otherwise") },
        false,
        false
    ),
    ("when", "When", ProcessorShape::Container, false, true),
    ("otherwise", "Otherwise", ProcessorShape::Container, false, false),
    ("filter", "Filter", ProcessorShape::Container, false, true),
    ("split", "Split", ProcessorShape::Container, false, true),
    ("loop", "Loop", ProcessorShape::Container, false, true),
    ("aggregate", "Aggregate", ProcessorShape::Container, false, false),
}

pub fn lookup(name: &str) -> Option<&'static ProcessorInfo> {
    PROCESSORS.iter().find(|p| p.name == name)
}

/// Unknown processors are treated as simple steps.
pub fn shape_of(name: &str) -> ProcessorShape {
    lookup(name).map_or(ProcessorShape::Simple, |p| p.shape)
}

pub fn requires_uri(name: &str) -> bool {
    lookup(name).is_some_and(|p| p.requires_uri)
}

pub fn requires_expression(name: &str) -> bool {
    lookup(name).is_some_and(|p| p.requires_expression)
}

pub fn title_of(name: &str) -> String {
    lookup(name).map_or_else(|| name.to_string(), |p| p.title.to_string())
}

/// JSON schema of the editable properties of a processor.
///
/// Nested structural keys (`steps`, branches) are never part of the schema.
pub fn properties_schema(name: &str) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    properties.insert("id".to_string(), json!({ "type": "string", "title": "Id" }));
    properties.insert(
        "description".to_string(),
        json!({ "type": "string", "title": "Description" }),
    );
    if requires_uri(name) {
        properties.insert("uri".to_string(), json!({ "type": "string", "title": "Uri" }));
        properties.insert(
            "parameters".to_string(),
            json!({ "type": "object", "title": "Parameters" }),
        );
        required.push(Value::from("uri"));
    }
    if requires_expression(name) {
        properties.insert(
            "expression".to_string(),
            json!({ "type": "string", "title": "Expression" }),
        );
        required.push(Value::from("expression"));
    }
    if name == "log" {
        properties.insert(
            "message".to_string(),
            json!({ "type": "string", "title": "Message" }),
        );
    }

    json!({
        "type": "object",
        "title": title_of(name),
        "properties": properties,
        "required": required,
    })
}

/// Keys that hold nested steps rather than properties.
pub fn structural_keys(name: &str) -> Vec<&'static str> {
    match shape_of(name) {
        ProcessorShape::Simple if name == "from" => vec!["steps"],
        ProcessorShape::Simple => vec![],
        ProcessorShape::Container => vec!["steps"],
        ProcessorShape::Branching { branches, special } => {
            let mut keys = vec![branches];
            keys.extend(special);
            keys
        }
    }
}
