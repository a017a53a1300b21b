//! Front-ends that run as a separate process.
//!
//! The scope is written to a temporary JSON file and the program is invoked as
//! `<program> -scope <file> -source <relative path>`. It must print an IR wire
//! envelope (see [`mcodegen_ir::wire`]) on stdout.

use crate::config::ScenarioProperty;
use crate::error::{Error, Result};
use crate::scenario::ScenarioScope;
use mcodegen_ir::{IrFile, wire};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Serializable copy of a [`ScenarioScope`] with absolute directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioScopeDto {
    pub name: String,
    pub configuration: ScenarioConfigurationDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfigurationDto {
    pub sources_dir: PathBuf,
    pub output_dir: PathBuf,
    pub properties: Vec<ScenarioProperty>,
}

impl ScenarioScopeDto {
    pub fn from_scope(scope: &ScenarioScope) -> Result<Self> {
        let config = scope.configuration();
        Ok(Self {
            name: scope.name().to_string(),
            configuration: ScenarioConfigurationDto {
                sources_dir: absolute(config.sources_dir())?,
                output_dir: absolute(config.output_dir())?,
                properties: config.properties().to_vec(),
            },
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(path, e))
}

/// A parser implemented by an external executable.
#[derive(Debug, Clone)]
pub struct ExternalFrontend {
    program: PathBuf,
}

impl ExternalFrontend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the program on `source_path` and decodes its output.
    pub fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile> {
        let dto = ScenarioScopeDto::from_scope(scope)?;
        let json = serde_json::to_string(&dto).map_err(|e| self.failure(e.to_string()))?;

        let mut scope_file = tempfile::Builder::new()
            .prefix("scenario-scope-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        scope_file
            .write_all(json.as_bytes())
            .map_err(|e| Error::io(scope_file.path(), e))?;

        tracing::debug!(
            program = %self.program.display(),
            source = %source_path.display(),
            "running external front-end"
        );
        let output = Command::new(&self.program)
            .arg("-scope")
            .arg(scope_file.path())
            .arg("-source")
            .arg(source_path)
            .output()
            .map_err(|e| self.failure(format!("cannot start: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{}: {}", output.status, stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(wire::from_json(&stdout)?)
    }

    fn failure(&self, message: String) -> Error {
        Error::ExternalFrontend {
            program: self.program.display().to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfiguration;
    use std::sync::Arc;

    fn scope() -> ScenarioScope {
        let config = ScenarioConfiguration::builder()
            .sources_dir("src")
            .output_dir("/tmp/out")
            .property("swift", "indent", "  ")
            .build()
            .unwrap();
        ScenarioScope::new("ios", Arc::new(config))
    }

    #[test]
    fn test_dto_has_absolute_dirs() {
        let dto = ScenarioScopeDto::from_scope(&scope()).unwrap();
        assert_eq!(dto.name, "ios");
        assert!(dto.configuration.sources_dir.is_absolute());
        assert!(dto.configuration.sources_dir.ends_with("src"));
        assert_eq!(dto.configuration.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(dto.configuration.properties.len(), 1);
    }

    #[test]
    fn test_dto_json_shape() {
        let dto = ScenarioScopeDto::from_scope(&scope()).unwrap();
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["configuration"]["properties"][0]["name"], "indent");
        assert_eq!(value["configuration"]["properties"][0]["value"], "  ");
    }

    #[test]
    fn test_missing_program_is_external_error() {
        let frontend = ExternalFrontend::new("/nonexistent/companion-binary");
        match frontend.parse(&scope(), Path::new("Model.swift")) {
            Err(Error::ExternalFrontend { program, .. }) => {
                assert_eq!(program, "/nonexistent/companion-binary")
            }
            other => panic!("expected ExternalFrontend error, got {other:?}"),
        }
    }
}
