use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::{
    clock::Clock,
    gpio::PinBank,
    scan::{PinScanResult, PinStatus, PinTest, ScanConfig, test_pin},
};

/// Tests each pin in turn for `config.window`.
///
/// An interrupt leaves the remaining pins out of the result.
pub fn scan_sequential<B: PinBank, C: Clock>(
    bank: &B,
    clock: &C,
    config: &ScanConfig,
    stop: &AtomicBool,
) -> PinScanResult {
    let test = PinTest::for_duration(config.window);
    let mut result = PinScanResult::new();

    for &pin in &config.pins {
        if stop.load(Ordering::Acquire) {
            warn!("Scan interrupted before {pin}");
            break;
        }

        let status = match bank.claim(pin) {
            Ok(mut source) => match test_pin(&mut source, clock, &test, stop) {
                Ok(detections) => PinStatus::Detections(detections),
                Err(e) => {
                    warn!(%pin, error = %e, hint = e.hint(), "Error reading {pin}");
                    PinStatus::unusable(&e)
                }
            },
            Err(e) => {
                warn!(%pin, error = %e, hint = e.hint(), "Could not monitor {pin}");
                PinStatus::unusable(&e)
            }
        };

        if let PinStatus::Detections(n) = &status
            && *n >= config.likely_threshold
        {
            info!(%pin, detections = *n, "{pin} is likely connected to the sensor");
        }

        result.insert(pin, status);
    }

    result
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{clock::ManualClock, gpio::SensorPin, mock::MockPinBank};

    fn pin(bcm: u8) -> SensorPin {
        SensorPin::new(bcm).unwrap()
    }

    fn config(pins: &[u8]) -> ScanConfig {
        ScanConfig {
            pins: pins.iter().map(|&p| pin(p)).collect(),
            ..ScanConfig::default()
        }
    }

    #[test]
    fn flags_pin_with_enough_detections() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let bank = MockPinBank::new()
            .script(pin(5), [true])
            .script(pin(6), [true, false, true, false, true]);

        let result = scan_sequential(&bank, &clock, &config(&[4, 5, 6]), &stop);

        assert_eq!(result.count(pin(4)), Some(0));
        assert_eq!(result.count(pin(5)), Some(1));
        assert_eq!(result.count(pin(6)), Some(3));
        assert_eq!(result.likely(3), [pin(6)]);
        // Each pin gets its settle time plus a 2s window.
        assert!(clock.elapsed() >= Duration::from_millis(3 * 2500));
    }

    #[test]
    fn unusable_pins_do_not_stop_the_scan() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(false);
        let bank = MockPinBank::new()
            .unusable(pin(4))
            .failing_reads(pin(5))
            .script(pin(6), [true]);

        let result = scan_sequential(&bank, &clock, &config(&[4, 5, 6]), &stop);

        assert!(matches!(result.status(pin(4)), Some(PinStatus::Unusable { .. })));
        assert!(matches!(result.status(pin(5)), Some(PinStatus::Unusable { .. })));
        assert_eq!(result.best(), Some((pin(6), 1)));
        assert_eq!(bank.claims(), 3);
    }

    #[test]
    fn interrupt_skips_remaining_pins() {
        let clock = ManualClock::new();
        let stop = AtomicBool::new(true);
        let bank = MockPinBank::new();

        let result = scan_sequential(&bank, &clock, &config(&[4, 5, 6]), &stop);

        assert_eq!(result.iter().count(), 0);
        assert_eq!(bank.claims(), 0);
    }
}
