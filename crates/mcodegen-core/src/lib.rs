//! Language-agnostic core of the mcodegen pipeline.
//!
//! # Architecture
//!
//! ```text
//! sources ──parse──> IrFile ──unify──> IrFile ──mappers──> IrFile ──generate──> output
//!    │                (per language)      (common surface)                (any language)
//!    └──edit steps──> edited source ─────────────────────────────────────────> output
//! ```
//!
//! A [`Scenario`] bundles a name, a [`ScenarioConfiguration`] and a body that
//! calls [`LanguageModule`]s; the [`ScenarioManager`] runs scenarios in order
//! and stops at the first failure.

pub mod config;
pub mod edit;
pub mod error;
pub mod external;
pub mod language;
pub mod mapper;
pub mod scenario;
pub mod unify;

pub use config::{ScenarioConfiguration, ScenarioConfigurationBuilder, ScenarioProperty};
pub use edit::{
    EditStep, EditStepHandler, EditStepHandlers, apply_edit_steps, edit_source_file,
};
pub use error::{Error, Result};
pub use external::{ExternalFrontend, ScenarioScopeDto};
pub use language::{LanguageModule, primary_class, read_source, write_output};
pub use mapper::{
    ClassesToInterfaces, GenerationListMapper, GenerationMapper, SetFileProperty,
    apply_list_mappers, apply_mappers,
};
pub use scenario::{Scenario, ScenarioManager, ScenarioScope};
pub use unify::{UnifyClassesByNameAndFields, UnifySourcesStrategy, unify_sources};
