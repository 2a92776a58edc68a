use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tracing::info;

use crate::{clock::Clock, error::GpioError, gpio::SignalSource};

/// Timing of the single-pin counting routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinTest {
    pub duration: Duration,

    /// Wait before the first read so the sensor output can settle.
    pub settle: Duration,

    pub poll_interval: Duration,

    /// Extra wait after each detection so one pulse is counted once.
    pub debounce: Duration,
}

impl PinTest {
    pub const DEFAULT_PIN_CHECK: Duration = Duration::from_secs(10);
    pub const CONFIRMATION: Duration = Duration::from_secs(15);
    /// A confirmation run needs strictly more detections than this.
    pub const CONFIRMATION_THRESHOLD: u32 = 3;

    pub fn for_duration(duration: Duration) -> Self {
        Self {
            duration,
            settle: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
            debounce: Duration::from_millis(500),
        }
    }
}

/// Counts active readings on `source` for `test.duration`, or until `stop` is set.
pub fn test_pin<S: SignalSource + ?Sized, C: Clock>(
    source: &mut S,
    clock: &C,
    test: &PinTest,
    stop: &AtomicBool,
) -> Result<u32, GpioError> {
    let pin = source.pin();
    clock.sleep(test.settle);

    let mut detections = 0;
    let start = clock.now();
    while clock.now().saturating_duration_since(start) < test.duration
        && !stop.load(Ordering::Acquire)
    {
        if source.read()? {
            detections += 1;
            info!(%pin, detection = detections, "Motion detected on {pin}!");
            clock.sleep(test.debounce);
        }
        clock.sleep(test.poll_interval);
    }

    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, gpio::SensorPin, mock::ScriptedSource};

    fn pin(bcm: u8) -> SensorPin {
        SensorPin::new(bcm).unwrap()
    }

    #[test]
    fn each_detection_waits_out_the_debounce() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let test = PinTest::for_duration(Duration::from_millis(600));
        let mut source = ScriptedSource::new(pin(24), [true, true]);

        // The second read would be active, but the debounce wait uses up the window.
        assert_eq!(test_pin(&mut source, &clock, &test, &stop).unwrap(), 1);
    }

    #[test]
    fn counts_separate_pulses_within_window() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let test = PinTest::for_duration(Duration::from_secs(2));
        // Each detection costs 600ms of clock time, each idle poll 100ms.
        let mut source = ScriptedSource::new(pin(24), [true, false, true, false, true, true]);

        assert_eq!(test_pin(&mut source, &clock, &test, &stop).unwrap(), 3);
        assert!(clock.elapsed() >= Duration::from_millis(2500));
    }

    #[test]
    fn window_bounds_the_count() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let test = PinTest::for_duration(Duration::from_secs(1));
        let mut source = ScriptedSource::new(pin(24), [true; 50]);

        // 600ms per detection: reads at 0ms and 600ms fit in a 1s window.
        assert_eq!(test_pin(&mut source, &clock, &test, &stop).unwrap(), 2);
    }

    #[test]
    fn stop_ends_the_test_early() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(true);
        let test = PinTest::for_duration(Duration::from_secs(10));
        let mut source = ScriptedSource::new(pin(24), [true; 5]);

        assert_eq!(test_pin(&mut source, &clock, &test, &stop).unwrap(), 0);
    }

    #[test]
    fn read_errors_propagate() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let test = PinTest::for_duration(Duration::from_secs(1));
        let mut source = ScriptedSource::failing(pin(9));

        assert!(matches!(
            test_pin(&mut source, &clock, &test, &stop),
            Err(GpioError::Read { .. })
        ));
    }
}
