use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::info;

use crate::{
    actuator::{Actuator, BrightnessCommand},
    clock::Clock,
    display::{DisplayConfig, DisplayController},
    error::{GpioError, InitError},
    gpio::{PinBank, SensorPin, SignalSource},
};

/// A running display session: the controller plus the claimed sensor line.
///
/// Dropping the monitor, on any path, sets the display ON one last time and then releases
/// the pin.
pub struct Monitor<A: Actuator, S: SignalSource> {
    controller: DisplayController<A>,
    source: Option<S>,
}

impl<A: Actuator, S: SignalSource> Monitor<A, S> {
    pub fn start<C: Clock>(config: DisplayConfig, actuator: A, source: S, clock: &C) -> Self {
        let controller = DisplayController::start(config, actuator, clock.now());

        Self {
            controller,
            source: Some(source),
        }
    }

    pub fn controller(&self) -> &DisplayController<A> {
        &self.controller
    }

    /// Polls until `stop` is set. A read error ends the loop early.
    pub fn run<C: Clock>(&mut self, clock: &C, stop: &AtomicBool) -> Result<(), GpioError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(());
        };

        info!(pin = %source.pin(), "Monitoring for motion...");
        let interval = self.controller.config().poll_interval;

        while !stop.load(Ordering::Acquire) {
            let reading = source.read()?;
            self.controller.tick(reading, clock.now());
            clock.sleep(interval);
        }

        Ok(())
    }
}

impl<A: Actuator, S: SignalSource> Drop for Monitor<A, S> {
    fn drop(&mut self) {
        self.controller.restore();

        if let Some(source) = self.source.take() {
            let pin = source.pin();
            drop(source);
            info!(%pin, "GPIO cleaned up");
        }
    }
}

/// Where the brightness command lives and how to run it.
#[derive(Debug, Clone)]
pub struct ActuatorConfig {
    pub program: PathBuf,

    pub sudo: bool,
}

/// Validates the brightness command, then opens the GPIO bank and claims `pin`.
///
/// The command is checked first so a missing script never touches the GPIO header.
pub fn launch<B, C, F>(
    config: DisplayConfig,
    actuator: &ActuatorConfig,
    open_bank: F,
    pin: SensorPin,
    clock: &C,
) -> Result<Monitor<BrightnessCommand, B::Source>, InitError>
where
    B: PinBank,
    C: Clock,
    F: FnOnce() -> Result<B, GpioError>,
{
    let elevate = actuator.sudo.then(|| "sudo".into());
    let command = BrightnessCommand::new(&actuator.program, elevate)?;

    let source = open_bank()
        .and_then(|bank| bank.claim(pin))
        .map_err(|source| InitError::Pin { pin, source })?;
    info!(%pin, "GPIO configured successfully");

    Ok(Monitor::start(config, command, source, clock))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        clock::ManualClock,
        display::DisplayState,
        mock::{MockPinBank, RecordingActuator, ScriptedSource},
    };

    fn pin(bcm: u8) -> SensorPin {
        SensorPin::new(bcm).unwrap()
    }

    #[test]
    fn run_polls_until_stopped_then_restores_on_drop() {
        let clock = ManualClock::new();
        let stop = Arc::new(AtomicBool::new(false));
        let actuator = RecordingActuator::new();
        let config = DisplayConfig {
            idle_timeout: Duration::from_secs(1),
            ..DisplayConfig::default()
        };
        // 10 inactive polls at 200ms: the display goes OFF once idle passes 1s.
        let source = ScriptedSource::new(pin(24), [false; 10]).stop_when_exhausted(stop.clone());

        let mut monitor = Monitor::start(config, actuator.clone(), source, &clock);
        monitor.run(&clock, &stop).unwrap();
        assert_eq!(monitor.controller().state(), DisplayState::Off);
        assert_eq!(actuator.calls(), ["255", "0"]);

        drop(monitor);
        assert_eq!(actuator.calls(), ["255", "0", "255"]);
    }

    #[test]
    fn read_error_still_restores_on_drop() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let actuator = RecordingActuator::new();
        let source = ScriptedSource::failing(pin(24));

        let mut monitor =
            Monitor::start(DisplayConfig::default(), actuator.clone(), source, &clock);
        assert!(matches!(monitor.run(&clock, &stop), Err(GpioError::Read { .. })));
        drop(monitor);

        assert_eq!(actuator.calls(), ["255", "255"]);
    }

    #[test]
    fn stop_before_first_poll_skips_reads() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(true);
        let actuator = RecordingActuator::new();
        let source = ScriptedSource::failing(pin(24));

        let mut monitor =
            Monitor::start(DisplayConfig::default(), actuator.clone(), source, &clock);
        monitor.run(&clock, &stop).unwrap();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn missing_script_never_opens_gpio() {
        let clock = ManualClock::new();
        let opened = AtomicBool::new(false);
        let actuator = ActuatorConfig {
            program: "/nonexistent/brightness.sh".into(),
            sudo: true,
        };

        let err = launch(
            DisplayConfig::default(),
            &actuator,
            || {
                opened.store(true, Ordering::SeqCst);
                Ok(MockPinBank::new())
            },
            pin(24),
            &clock,
        )
        .err()
        .unwrap();

        assert!(matches!(err, InitError::ActuatorMissing(_)));
        assert!(!opened.load(Ordering::SeqCst));
    }

    #[test]
    fn unclaimable_pin_is_an_init_error() {
        let clock = ManualClock::new();
        let actuator = ActuatorConfig {
            program: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
            sudo: false,
        };

        let err = launch(
            DisplayConfig::default(),
            &actuator,
            || Ok(MockPinBank::new().unusable(pin(24))),
            pin(24),
            &clock,
        )
        .err()
        .unwrap();

        assert!(matches!(err, InitError::Pin { pin: p, .. } if p == pin(24)));
    }
}
