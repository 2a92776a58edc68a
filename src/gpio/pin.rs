use std::{fmt, str::FromStr};

use anyhow::{Context as _, Error, bail};

/// Highest BCM line exposed on the 40-pin header.
const MAX_BCM_PIN: u8 = 27;

/// The pin the sensor is wired to on a stock deployment.
pub const DEFAULT_PIN: SensorPin = SensorPin(24);

/// BCM lines a sensor can be wired to, excluding power and ground, in ascending order.
pub const CANDIDATE_PINS: [SensorPin; 22] = [
    SensorPin(4),
    SensorPin(5),
    SensorPin(6),
    SensorPin(7),
    SensorPin(8),
    SensorPin(9),
    SensorPin(10),
    SensorPin(11),
    SensorPin(12),
    SensorPin(13),
    SensorPin(16),
    SensorPin(17),
    SensorPin(18),
    SensorPin(19),
    SensorPin(20),
    SensorPin(21),
    SensorPin(22),
    SensorPin(23),
    SensorPin(24),
    SensorPin(25),
    SensorPin(26),
    SensorPin(27),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensorPin(u8);

impl SensorPin {
    pub fn new(bcm: u8) -> anyhow::Result<Self> {
        if bcm > MAX_BCM_PIN {
            bail!("GPIO {bcm} out of range: expected 0-{MAX_BCM_PIN}");
        }

        Ok(Self(bcm))
    }

    pub fn bcm(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SensorPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO {}", self.0)
    }
}

impl FromStr for SensorPin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bcm = s
            .trim()
            .parse::<u8>()
            .with_context(|| format!("invalid BCM pin number: {s}"))?;

        SensorPin::new(bcm)
    }
}

/// One poll of a motion signal: `true` while the sensor output is high.
pub type MotionReading = bool;
