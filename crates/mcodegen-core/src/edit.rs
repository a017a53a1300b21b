//! Text edits applied to existing source files.
//!
//! An [`EditStep`] describes a change (add an import, implement an interface).
//! A language module knows how to apply it through an [`EditStepHandler`]
//! registered in the scenario configuration under the step's name.

use crate::error::{Error, Result};
use crate::language::{read_source, write_output};
use crate::scenario::ScenarioScope;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Last path segment of a type name with generic arguments removed.
///
/// `my_crate::edit::AddImport` becomes `AddImport`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Upcast to [`Any`] for steps stored behind `dyn EditStep`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A declarative description of one change to a source file.
pub trait EditStep: AsAny + fmt::Debug {
    /// Key used to find the handler. Must be unique within a configuration.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }
}

/// Applies one kind of [`EditStep`] to source text.
pub trait EditStepHandler: 'static {
    type Step: EditStep;

    /// Name of the step this handler applies; matches the default [`EditStep::name`].
    fn step_name(&self) -> &str {
        short_type_name::<Self::Step>()
    }

    fn handle(&self, step: &Self::Step, source: &str) -> Result<String>;
}

/// Object-safe view of a handler, downcasting the step it receives.
trait ErasedHandler {
    fn step_name(&self) -> &str;
    fn handle_any(&self, step: &dyn EditStep, source: &str) -> Result<String>;
}

impl<H: EditStepHandler> ErasedHandler for H {
    fn step_name(&self) -> &str {
        EditStepHandler::step_name(self)
    }

    fn handle_any(&self, step: &dyn EditStep, source: &str) -> Result<String> {
        match step.as_any().downcast_ref::<H::Step>() {
            Some(step) => self.handle(step, source),
            None => Err(Error::Config(format!(
                "edit step `{}` is registered for {}, got {:?}",
                step.name(),
                short_type_name::<H::Step>(),
                step
            ))),
        }
    }
}

/// Handlers keyed by the name of the step they apply.
#[derive(Default)]
pub struct EditStepHandlers {
    handlers: HashMap<String, Box<dyn ErasedHandler>>,
}

impl EditStepHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`, replacing any handler for the same step name.
    pub fn register<H: EditStepHandler>(&mut self, handler: H) {
        let name = EditStepHandler::step_name(&handler).to_string();
        self.handlers.insert(name, Box::new(handler));
    }

    pub fn with<H: EditStepHandler>(mut self, handler: H) -> Self {
        self.register(handler);
        self
    }

    pub fn contains(&self, step_name: &str) -> bool {
        self.handlers.contains_key(step_name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered step names, sorted.
    pub fn step_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.values().map(|h| h.step_name()).collect();
        names.sort_unstable();
        names
    }

    fn apply(&self, step: &dyn EditStep, source: &str) -> Result<String> {
        let handler = self
            .handlers
            .get(step.name())
            .ok_or_else(|| Error::HandlerNotFound(step.name().to_string()))?;
        handler.handle_any(step, source)
    }
}

impl fmt::Debug for EditStepHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditStepHandlers")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// Folds `steps` over `source` in order.
///
/// Nothing is returned unless every step succeeds.
pub fn apply_edit_steps(
    handlers: &EditStepHandlers,
    source: &str,
    steps: &[Box<dyn EditStep>],
) -> Result<String> {
    steps.iter().try_fold(source.to_string(), |text, step| {
        tracing::debug!(step = step.name(), "applying edit step");
        handlers.apply(step.as_ref(), &text)
    })
}

/// Reads `source_path` under the sources directory, applies `steps` and writes
/// the result to the output directory under the same file name.
///
/// The output file is written once, after the last step succeeded.
pub fn edit_source_file(
    scope: &ScenarioScope,
    source_path: &Path,
    steps: &[Box<dyn EditStep>],
) -> Result<()> {
    let config = scope.configuration();
    let source = read_source(scope, source_path)?;
    let edited = apply_edit_steps(config.edit_step_handlers(), &source, steps)?;

    let file_name = source_path.file_name().ok_or_else(|| {
        Error::Config(format!("edit source `{}` has no file name", source_path.display()))
    })?;
    let output = config.output_dir().join(file_name);
    write_output(&output, &edited)?;
    tracing::debug!(output = %output.display(), steps = steps.len(), "edited source");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Append(&'static str);

    impl EditStep for Append {}

    struct AppendHandler;

    impl EditStepHandler for AppendHandler {
        type Step = Append;

        fn handle(&self, step: &Append, source: &str) -> Result<String> {
            Ok(format!("{source}{}", step.0))
        }
    }

    #[derive(Debug)]
    struct Unregistered;

    impl EditStep for Unregistered {}

    #[derive(Debug)]
    struct Renamed;

    impl EditStep for Renamed {
        fn name(&self) -> &str {
            "Append"
        }
    }

    #[test]
    fn test_step_name_is_short_type_name() {
        assert_eq!(Append("x").name(), "Append");
        assert_eq!(EditStepHandler::step_name(&AppendHandler), "Append");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_steps_fold_in_order() {
        let handlers = EditStepHandlers::new().with(AppendHandler);
        let steps: Vec<Box<dyn EditStep>> = vec![Box::new(Append("a")), Box::new(Append("b"))];
        assert_eq!(apply_edit_steps(&handlers, ">", &steps).unwrap(), ">ab");
    }

    #[test]
    fn test_missing_handler_fails_whole_fold() {
        let handlers = EditStepHandlers::new().with(AppendHandler);
        let steps: Vec<Box<dyn EditStep>> = vec![Box::new(Append("a")), Box::new(Unregistered)];
        match apply_edit_steps(&handlers, "", &steps) {
            Err(Error::HandlerNotFound(name)) => assert_eq!(name, "Unregistered"),
            other => panic!("expected HandlerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_name_collision_with_other_type_is_rejected() {
        let handlers = EditStepHandlers::new().with(AppendHandler);
        let steps: Vec<Box<dyn EditStep>> = vec![Box::new(Renamed)];
        assert!(matches!(
            apply_edit_steps(&handlers, "", &steps),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_registry_debug_lists_names() {
        let handlers = EditStepHandlers::new().with(AppendHandler);
        assert_eq!(handlers.step_names(), vec!["Append"]);
        assert!(format!("{handlers:?}").contains("Append"));
    }
}
