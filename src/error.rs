use thiserror::Error;

/// Errors raised while turning a pipeline resource into a visualization tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Failed to parse resource JSON: {0}")]
    JsonParseError(String),

    #[error("Unsupported entity kind '{kind}', expected one of: route, pipe")]
    UnsupportedEntity { kind: String },

    #[error("Invalid resource at index {index}: {reason}")]
    InvalidResource { index: usize, reason: String },

    #[error("Invalid step at '{path}': {reason}")]
    InvalidStep { path: String, reason: String },
}

/// Errors returned by an entity when asked to mutate its document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    #[error("No step found at path '{0}'")]
    PathNotFound(String),

    #[error("Cannot insert '{component}' {mode} the step at '{path}': {reason}")]
    InvalidInsertion {
        component: String,
        mode: String,
        path: String,
        reason: String,
    },

    #[error("The step at '{0}' cannot be removed")]
    CannotRemove(String),

    #[error("Invalid model for the step at '{path}': {reason}")]
    InvalidModel { path: String, reason: String },

    #[error("Component '{name}' of kind {kind} is not supported by this entity")]
    UnsupportedComponent { name: String, kind: String },
}

/// Structural faults in a visualization tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Cycle detected while resolving the root of node '{node_id}'")]
    CycleDetected { node_id: String },
}

/// Errors that can occur while loading canvas settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by an editing session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("No node is currently selected")]
    NoSelection,

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
