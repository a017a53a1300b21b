//! Errors raised while running a scenario.

use mcodegen_ir::{BuildError, WireError};
use std::path::PathBuf;

/// Every failure is fatal for the scenario that raised it; nothing retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve {what} in {}", path.display())]
    SemanticResolutionFailed { path: PathBuf, what: String },

    #[error("{language} generation supports one top-level declaration, `{file}` has {count}")]
    UnsupportedMultiDeclaration {
        language: &'static str,
        file: String,
        count: usize,
    },

    #[error("{language} cannot emit {shape}")]
    UnsupportedShape {
        language: &'static str,
        shape: String,
    },

    #[error("unmapped {node} has no {language} source text to fall back on")]
    MissingFallback {
        language: &'static str,
        node: &'static str,
    },

    #[error("EditStepHandler for {0} not found")]
    HandlerNotFound(String),

    #[error("mapper failed: {0}")]
    Mapper(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("external front-end `{program}` failed: {message}")]
    ExternalFrontend { program: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unification needs at least one source")]
    NoSources,

    #[error("scenario `{scenario}` failed: {source}")]
    ScenarioFailed {
        scenario: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
