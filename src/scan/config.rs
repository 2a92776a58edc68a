use std::time::Duration;

use crate::gpio::{CANDIDATE_PINS, SensorPin};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Scanned in this order.
    pub pins: Vec<SensorPin>,

    /// Shared window of a concurrent scan.
    pub duration: Duration,

    /// Edge-detection sampling interval of a concurrent scan.
    pub sample_interval: Duration,

    /// Per-pin window of a sequential scan.
    pub window: Duration,

    /// Detections in a sequential window at which a pin is flagged as likely.
    pub likely_threshold: u32,

    /// How often a concurrent scan reports the remaining time.
    pub progress_every: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pins: CANDIDATE_PINS.to_vec(),
            duration: Duration::from_secs(20),
            sample_interval: Duration::from_millis(50),
            window: Duration::from_secs(2),
            likely_threshold: 3,
            progress_every: Duration::from_secs(1),
        }
    }
}
