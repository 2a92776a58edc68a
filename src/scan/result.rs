use indexmap::IndexMap;

use crate::{error::GpioError, gpio::SensorPin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinStatus {
    Detections(u32),
    /// The pin could not be claimed or read. Carries the error and a remediation hint.
    Unusable { error: String, hint: &'static str },
}

impl PinStatus {
    pub fn unusable(error: &GpioError) -> Self {
        PinStatus::Unusable {
            error: error.to_string(),
            hint: error.hint(),
        }
    }
}

/// Per-pin outcome of one scan session, in the order the pins were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinScanResult {
    pins: IndexMap<SensorPin, PinStatus>,
}

impl PinScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pin: SensorPin, status: PinStatus) {
        self.pins.insert(pin, status);
    }

    pub fn status(&self, pin: SensorPin) -> Option<&PinStatus> {
        self.pins.get(&pin)
    }

    /// Detections on `pin`; `None` when it was not scanned or is unusable.
    pub fn count(&self, pin: SensorPin) -> Option<u32> {
        match self.pins.get(&pin)? {
            PinStatus::Detections(n) => Some(*n),
            PinStatus::Unusable { .. } => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorPin, &PinStatus)> {
        self.pins.iter().map(|(pin, status)| (*pin, status))
    }

    pub fn unusable(&self) -> impl Iterator<Item = (SensorPin, &str, &'static str)> {
        self.iter().filter_map(|(pin, status)| match status {
            PinStatus::Unusable { error, hint } => Some((pin, error.as_str(), *hint)),
            PinStatus::Detections(_) => None,
        })
    }

    /// Pins with at least one detection, most detections first. Ties keep ascending pin order.
    pub fn ranked(&self) -> Vec<(SensorPin, u32)> {
        let mut ranked: Vec<(SensorPin, u32)> = self
            .iter()
            .filter_map(|(pin, status)| match status {
                PinStatus::Detections(n) if *n > 0 => Some((pin, *n)),
                _ => None,
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub fn best(&self) -> Option<(SensorPin, u32)> {
        self.ranked().into_iter().next()
    }

    /// Pins with at least `threshold` detections, in ranking order.
    pub fn likely(&self, threshold: u32) -> Vec<SensorPin> {
        self.ranked()
            .into_iter()
            .filter(|(_, n)| *n >= threshold)
            .map(|(pin, _)| pin)
            .collect()
    }
}

impl FromIterator<(SensorPin, PinStatus)> for PinScanResult {
    fn from_iter<I: IntoIterator<Item = (SensorPin, PinStatus)>>(iter: I) -> Self {
        Self {
            pins: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(bcm: u8) -> SensorPin {
        SensorPin::new(bcm).unwrap()
    }

    fn sample() -> PinScanResult {
        [
            (pin(4), PinStatus::Detections(1)),
            (pin(5), PinStatus::Detections(0)),
            (
                pin(7),
                PinStatus::Unusable {
                    error: "busy".to_owned(),
                    hint: "reserved",
                },
            ),
            (pin(17), PinStatus::Detections(3)),
            (pin(24), PinStatus::Detections(3)),
            (pin(27), PinStatus::Detections(5)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn ranks_by_count_then_pin() {
        assert_eq!(
            sample().ranked(),
            [(pin(27), 5), (pin(17), 3), (pin(24), 3), (pin(4), 1)]
        );
        assert_eq!(sample().best(), Some((pin(27), 5)));
    }

    #[test]
    fn unusable_pins_are_excluded_from_ranking() {
        let result = sample();
        assert_eq!(result.count(pin(7)), None);
        assert!(result.ranked().iter().all(|(p, _)| *p != pin(7)));
        assert_eq!(
            result.unusable().collect::<Vec<_>>(),
            [(pin(7), "busy", "reserved")]
        );
    }

    #[test]
    fn likely_applies_threshold() {
        assert_eq!(sample().likely(3), [pin(27), pin(17), pin(24)]);
    }

    #[test]
    fn empty_scan_has_no_best() {
        let result: PinScanResult = [(pin(4), PinStatus::Detections(0))].into_iter().collect();
        assert_eq!(result.best(), None);
    }
}
