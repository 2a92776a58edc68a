use std::{io, path::PathBuf, process::ExitStatus};

use crate::gpio::SensorPin;

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} {value} exited with {status}", .program.display())]
    Status {
        program: PathBuf,
        value: String,
        status: ExitStatus,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    #[error("failed to access GPIO: {0}")]
    Init(#[from] rppal::gpio::Error),

    #[error("failed to claim {pin}: {reason}")]
    Claim { pin: SensorPin, reason: String },

    #[error("failed to read {pin}: {reason}")]
    Read { pin: SensorPin, reason: String },
}

impl GpioError {
    /// Remediation text shown next to the error by the diagnostic tool.
    pub fn hint(&self) -> &'static str {
        match self {
            GpioError::Init(rppal::gpio::Error::PermissionDenied(_)) => {
                "run with access to /dev/gpiomem (e.g. as root or a member of the gpio group)"
            }
            GpioError::Init(rppal::gpio::Error::UnknownModel) => {
                "this does not look like a Raspberry Pi"
            }
            GpioError::Init(rppal::gpio::Error::PinUsed(_))
            | GpioError::Init(rppal::gpio::Error::PinNotAvailable(_))
            | GpioError::Claim { .. } => "pin likely reserved by the platform or another process",
            GpioError::Init(_) => "check that the GPIO driver is loaded",
            GpioError::Read { .. } => "pin likely reserved or floating without a pull-down",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("brightness script not found at {}", .0.display())]
    ActuatorMissing(PathBuf),

    #[error("failed to configure {pin}")]
    Pin {
        pin: SensorPin,
        #[source]
        source: GpioError,
    },
}
