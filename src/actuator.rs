use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::debug;

use crate::error::{ActuatorError, InitError};

/// Something that sets the display brightness to a single opaque value.
pub trait Actuator {
    fn apply(&mut self, value: &str) -> Result<(), ActuatorError>;
}

/// Runs `[elevate] <program> <value>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct BrightnessCommand {
    program: PathBuf,
    elevate: Option<OsString>,
}

impl BrightnessCommand {
    /// Fails when `program` is not an existing file.
    pub fn new(program: impl Into<PathBuf>, elevate: Option<OsString>) -> Result<Self, InitError> {
        let program = program.into();
        if !program.is_file() {
            return Err(InitError::ActuatorMissing(program));
        }

        Ok(Self { program, elevate })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, value: &str) -> Command {
        let mut command = match &self.elevate {
            Some(elevate) => {
                let mut c = Command::new(elevate);
                c.arg(&self.program);
                c
            }
            None => Command::new(&self.program),
        };
        command.arg(value);
        command
    }
}

impl Actuator for BrightnessCommand {
    fn apply(&mut self, value: &str) -> Result<(), ActuatorError> {
        debug!(program = %self.program.display(), value, "running brightness command");

        let status = self
            .command(value)
            .status()
            .map_err(|source| ActuatorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ActuatorError::Status {
                program: self.program.clone(),
                value: value.to_owned(),
                status,
            });
        }

        Ok(())
    }
}
