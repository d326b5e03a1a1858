//! One-shot hooks run before the process reports ready.
//!
//! Hooks run in registration order, each exactly once. The first failing hook
//! stops the sequence; its error is returned tagged with the hook name.

use std::error::Error;
use std::fmt;

use domain::CoreError;
use tracing::{error, info};

type Hook<'a> = Box<dyn FnOnce() -> Result<(), CoreError> + 'a>;

/// A startup hook failed.
#[derive(Debug)]
pub struct StartupError {
    pub hook: &'static str,
    pub source: CoreError,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "startup hook '{}' failed: {}", self.hook, self.source)
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Ordered list of startup hooks.
#[derive(Default)]
pub struct Startup<'a> {
    hooks: Vec<(&'static str, Hook<'a>)>,
}

impl<'a> Startup<'a> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register<F>(&mut self, name: &'static str, hook: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), CoreError> + 'a,
    {
        self.hooks.push((name, Box::new(hook)));
        self
    }

    /// Consume the runner, executing every hook in order.
    pub fn run(self) -> Result<(), StartupError> {
        for (name, hook) in self.hooks {
            info!(hook = name, "running startup hook");
            if let Err(source) = hook() {
                error!(hook = name, error = %source, "startup hook failed");
                return Err(StartupError { hook: name, source });
            }
        }
        Ok(())
    }
}
