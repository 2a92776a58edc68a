use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{error, info};

use crate::{
    actuator::Actuator,
    display::{DisplayState, IdleTimer},
    gpio::MotionReading,
};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_HEARTBEAT_EVERY: u64 = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub idle_timeout: Duration,

    pub on_value: String,

    pub off_value: String,

    /// Log a heartbeat every this many detections while already ON. Zero disables it.
    pub heartbeat_every: u64,

    pub poll_interval: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            on_value: "255".to_owned(),
            off_value: "0".to_owned(),
            heartbeat_every: DEFAULT_HEARTBEAT_EVERY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do.
    Steady,
    /// Motion while already ON and the detection count hit the heartbeat period.
    Heartbeat { detection: u64 },
    TurnedOn { detection: u64 },
    TurnedOff { idle: Duration },
    /// The actuator failed; state is unchanged and the next qualifying tick retries.
    Failed { target: DisplayState },
}

/// ON/OFF rules for a display driven by a motion signal.
///
/// The controller never sleeps or reads hardware: callers feed it one reading and one
/// timestamp per tick.
#[derive(Debug)]
pub struct DisplayController<A: Actuator> {
    config: DisplayConfig,
    actuator: A,
    state: DisplayState,
    idle: IdleTimer,
    detections: u64,
}

impl<A: Actuator> DisplayController<A> {
    /// Forces the display ON with an unconditional actuator call.
    ///
    /// A failed call is logged and the state is still ON.
    pub fn start(config: DisplayConfig, mut actuator: A, now: Instant) -> Self {
        info!("Starting with screen ON");
        match actuator.apply(&config.on_value) {
            Ok(()) => info!(value = %config.on_value, "Screen brightness set to {}", config.on_value),
            Err(e) => error!(value = %config.on_value, error = %e, "Error setting initial brightness"),
        }

        Self {
            config,
            actuator,
            state: DisplayState::On,
            idle: IdleTimer::new(now),
            detections: 0,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn detections(&self) -> u64 {
        self.detections
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        self.idle.idle_for(now)
    }

    pub fn tick(&mut self, reading: MotionReading, now: Instant) -> TickOutcome {
        if reading {
            self.detections += 1;
            self.idle.touch(now);
            let detection = self.detections;

            return match self.state {
                DisplayState::Off => {
                    info!(
                        detection,
                        at = %Local::now().format(TIMESTAMP_FORMAT),
                        "Motion detected! Turning screen ON (detection #{detection})"
                    );
                    self.transition(DisplayState::On, TickOutcome::TurnedOn { detection })
                }
                DisplayState::On
                    if self.config.heartbeat_every > 0
                        && detection % self.config.heartbeat_every == 0 =>
                {
                    info!(detection, "Motion detected (detection #{detection}), screen already ON");
                    TickOutcome::Heartbeat { detection }
                }
                DisplayState::On => TickOutcome::Steady,
            };
        }

        if self.state == DisplayState::On && self.idle.expired(now, self.config.idle_timeout) {
            let idle = self.idle.idle_for(now);
            info!(
                idle_secs = idle.as_secs(),
                at = %Local::now().format(TIMESTAMP_FORMAT),
                "No motion for {} seconds. Turning screen OFF",
                idle.as_secs()
            );
            return self.transition(DisplayState::Off, TickOutcome::TurnedOff { idle });
        }

        TickOutcome::Steady
    }

    /// Sets the display ON regardless of the current state.
    pub fn restore(&mut self) {
        match self.actuator.apply(&self.config.on_value) {
            Ok(()) => {
                self.state = DisplayState::On;
                info!(value = %self.config.on_value, "Screen brightness restored to ON value");
            }
            Err(e) => error!(value = %self.config.on_value, error = %e, "Error restoring brightness"),
        }
    }

    /// Applies the value for `target`; the state only changes when the actuator succeeds.
    fn transition(&mut self, target: DisplayState, done: TickOutcome) -> TickOutcome {
        let value = match target {
            DisplayState::On => &self.config.on_value,
            DisplayState::Off => &self.config.off_value,
        };

        match self.actuator.apply(value) {
            Ok(()) => {
                self.state = target;
                done
            }
            Err(e) => {
                error!(value = %value, error = %e, "Error turning screen {target}");
                TickOutcome::Failed { target }
            }
        }
    }
}
