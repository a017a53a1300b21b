//! Scenario configuration.
//!
//! Built in code through [`ScenarioConfigurationBuilder`] or loaded from TOML.
//! Edit-step handlers are code and are always registered on the builder.
//!
//! Example `mcodegen.toml`:
//! ```toml
//! sources_dir = "src"
//! output_dir = "generated"
//!
//! [[properties]]
//! language = "java"
//! name = "indent"
//! value = "  "
//! ```
//!
//! Relative directories are resolved against the directory holding the file.

use crate::edit::{EditStepHandler, EditStepHandlers};
use crate::error::{Error, Result};
use mcodegen_ir::PropertyValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One `(language, name, value)` setting, e.g. `("java", "indent", "  ")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProperty {
    pub language: String,
    pub name: String,
    pub value: PropertyValue,
}

impl ScenarioProperty {
    pub fn new(
        language: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            language: language.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct ScenarioConfiguration {
    sources_dir: PathBuf,
    output_dir: PathBuf,
    properties: Vec<ScenarioProperty>,
    edit_step_handlers: EditStepHandlers,
}

impl ScenarioConfiguration {
    pub fn builder() -> ScenarioConfigurationBuilder {
        ScenarioConfigurationBuilder::default()
    }

    /// Loads a configuration without edit-step handlers.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        ScenarioConfigurationBuilder::from_toml_file(path)?.build()
    }

    pub fn sources_dir(&self) -> &Path {
        &self.sources_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn properties(&self) -> &[ScenarioProperty] {
        &self.properties
    }

    pub fn edit_step_handlers(&self) -> &EditStepHandlers {
        &self.edit_step_handlers
    }

    /// First property registered for `language` under `name`.
    pub fn property(&self, language: &str, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.language == language && p.name == name)
            .map(|p| &p.value)
    }

    pub fn property_str(&self, language: &str, name: &str) -> Option<&str> {
        self.property(language, name).and_then(PropertyValue::as_str)
    }
}

/// The serializable part of a configuration, as read from TOML.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    sources_dir: PathBuf,
    output_dir: PathBuf,
    #[serde(default)]
    properties: Vec<ScenarioProperty>,
}

#[derive(Debug, Default)]
pub struct ScenarioConfigurationBuilder {
    sources_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    properties: Vec<ScenarioProperty>,
    edit_step_handlers: EditStepHandlers,
}

impl ScenarioConfigurationBuilder {
    /// Starts from a TOML file; handlers can still be added before `build()`.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, base)
    }

    /// Parses TOML, resolving relative directories against `base`.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        let mut builder = Self::default()
            .sources_dir(base.join(file.sources_dir))
            .output_dir(base.join(file.output_dir));
        builder.properties = file.properties;
        Ok(builder)
    }

    pub fn sources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sources_dir = Some(dir.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn property(
        mut self,
        language: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties
            .push(ScenarioProperty::new(language, name, value));
        self
    }

    pub fn edit_step_handler<H: EditStepHandler>(mut self, handler: H) -> Self {
        self.edit_step_handlers.register(handler);
        self
    }

    pub fn build(self) -> Result<ScenarioConfiguration> {
        let sources_dir = non_blank(self.sources_dir, "sources directory")?;
        let output_dir = non_blank(self.output_dir, "output directory")?;
        Ok(ScenarioConfiguration {
            sources_dir,
            output_dir,
            properties: self.properties,
            edit_step_handlers: self.edit_step_handlers,
        })
    }
}

fn non_blank(dir: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    match dir {
        Some(dir) if !dir.as_os_str().to_string_lossy().trim().is_empty() => Ok(dir),
        Some(_) => Err(Error::Config(format!("{what} cannot be blank"))),
        None => Err(Error::Config(format!("{what} must be set"))),
    }
}
