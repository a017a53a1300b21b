//! Named units of work and the manager that runs them.

use crate::config::ScenarioConfiguration;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// What every language-module call receives: the scenario name and its
/// configuration.
#[derive(Debug, Clone)]
pub struct ScenarioScope {
    name: String,
    configuration: Arc<ScenarioConfiguration>,
}

impl ScenarioScope {
    pub fn new(name: impl Into<String>, configuration: Arc<ScenarioConfiguration>) -> Self {
        Self {
            name: name.into(),
            configuration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configuration(&self) -> &ScenarioConfiguration {
        &self.configuration
    }
}

type ScenarioBody = Box<dyn FnOnce(&ScenarioScope) -> Result<()>>;

/// A named body run once against its scope.
pub struct Scenario {
    scope: ScenarioScope,
    body: ScenarioBody,
}

impl Scenario {
    pub fn new<F>(
        name: impl Into<String>,
        configuration: impl Into<Arc<ScenarioConfiguration>>,
        body: F,
    ) -> Self
    where
        F: FnOnce(&ScenarioScope) -> Result<()> + 'static,
    {
        Self {
            scope: ScenarioScope::new(name, configuration.into()),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        self.scope.name()
    }

    pub fn run(self) -> Result<()> {
        (self.body)(&self.scope)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Runs scenarios one after another in registration order.
#[derive(Debug, Default)]
pub struct ScenarioManager {
    scenarios: Vec<Scenario>,
}

impl ScenarioManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scenario: Scenario) -> &mut Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Runs every scenario. The first failure stops the batch; output written by
    /// earlier scenarios stays on disk.
    pub fn run(self) -> Result<()> {
        let total = self.scenarios.len();
        for (i, scenario) in self.scenarios.into_iter().enumerate() {
            let name = scenario.name().to_string();
            tracing::info!(scenario = %name, "running scenario {}/{}", i + 1, total);
            scenario.run().map_err(|source| {
                tracing::error!(scenario = %name, error = %source, "scenario failed");
                Error::ScenarioFailed {
                    scenario: name.clone(),
                    source: Box::new(source),
                }
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> Arc<ScenarioConfiguration> {
        Arc::new(
            ScenarioConfiguration::builder()
                .sources_dir("src")
                .output_dir("out")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_scope_exposes_name_and_config() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let scenario = Scenario::new("models", config(), move |scope| {
            *sink.borrow_mut() = Some((
                scope.name().to_string(),
                scope.configuration().output_dir().to_path_buf(),
            ));
            Ok(())
        });
        scenario.run().unwrap();
        assert_eq!(
            *seen.borrow(),
            Some(("models".to_string(), std::path::PathBuf::from("out")))
        );
    }

    #[test]
    fn test_manager_runs_in_order_and_stops_on_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = ScenarioManager::new();
        for (name, fail) in [("first", false), ("second", true), ("third", false)] {
            let log = Rc::clone(&log);
            manager.add(Scenario::new(name, config(), move |scope| {
                log.borrow_mut().push(scope.name().to_string());
                if fail {
                    Err(Error::NoSources)
                } else {
                    Ok(())
                }
            }));
        }

        match manager.run() {
            Err(Error::ScenarioFailed { scenario, source }) => {
                assert_eq!(scenario, "second");
                assert!(matches!(*source, Error::NoSources));
            }
            other => panic!("expected ScenarioFailed, got {other:?}"),
        }
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }
}
