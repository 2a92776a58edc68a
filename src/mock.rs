//! In-memory stand-ins for the GPIO header and the brightness command.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use crate::{
    actuator::Actuator,
    error::{ActuatorError, GpioError},
    gpio::{MotionReading, PinBank, SensorPin, SignalSource},
};

/// Replays a fixed list of readings, then reads inactive forever.
#[derive(Debug)]
pub struct ScriptedSource {
    pin: SensorPin,
    readings: VecDeque<MotionReading>,
    fail_reads: bool,
    stop: Option<Arc<AtomicBool>>,
}

impl ScriptedSource {
    pub fn new(pin: SensorPin, readings: impl IntoIterator<Item = MotionReading>) -> Self {
        Self {
            pin,
            readings: readings.into_iter().collect(),
            fail_reads: false,
            stop: None,
        }
    }

    /// Every read fails.
    pub fn failing(pin: SensorPin) -> Self {
        Self {
            fail_reads: true,
            ..Self::new(pin, [])
        }
    }

    /// Sets `stop` once the last scripted reading has been handed out.
    pub fn stop_when_exhausted(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl SignalSource for ScriptedSource {
    fn pin(&self) -> SensorPin {
        self.pin
    }

    fn read(&mut self) -> Result<MotionReading, GpioError> {
        if self.fail_reads {
            return Err(GpioError::Read {
                pin: self.pin,
                reason: "scripted read failure".to_owned(),
            });
        }

        let reading = self.readings.pop_front().unwrap_or(false);
        if self.readings.is_empty()
            && let Some(stop) = &self.stop
        {
            stop.store(true, Ordering::Release);
        }

        Ok(reading)
    }
}

/// Hands out [`ScriptedSource`]s and counts claim attempts.
#[derive(Debug, Default)]
pub struct MockPinBank {
    scripts: Mutex<HashMap<SensorPin, Vec<MotionReading>>>,
    unusable: HashSet<SensorPin>,
    failing_reads: HashSet<SensorPin>,
    claims: AtomicUsize,
}

impl MockPinBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, pin: SensorPin, readings: impl IntoIterator<Item = MotionReading>) -> Self {
        lock(&self.scripts).insert(pin, readings.into_iter().collect());
        self
    }

    /// Claiming `pin` fails.
    pub fn unusable(mut self, pin: SensorPin) -> Self {
        self.unusable.insert(pin);
        self
    }

    /// Claiming `pin` succeeds but every read fails.
    pub fn failing_reads(mut self, pin: SensorPin) -> Self {
        self.failing_reads.insert(pin);
        self
    }

    pub fn claims(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }
}

impl PinBank for MockPinBank {
    type Source = ScriptedSource;

    fn claim(&self, pin: SensorPin) -> Result<Self::Source, GpioError> {
        self.claims.fetch_add(1, Ordering::SeqCst);

        if self.unusable.contains(&pin) {
            return Err(GpioError::Claim {
                pin,
                reason: "pin reserved".to_owned(),
            });
        }

        if self.failing_reads.contains(&pin) {
            return Ok(ScriptedSource::failing(pin));
        }

        let readings = lock(&self.scripts).remove(&pin).unwrap_or_default();
        Ok(ScriptedSource::new(pin, readings))
    }
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<String>,
    failures: usize,
}

/// Records every value applied. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` calls fail (after being recorded).
    pub fn fail_next(self, n: usize) -> Self {
        self.set_failures(n);
        self
    }

    pub fn set_failures(&self, n: usize) {
        lock(&self.inner).failures = n;
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.inner).calls.clone()
    }
}

impl Actuator for RecordingActuator {
    fn apply(&mut self, value: &str) -> Result<(), ActuatorError> {
        let mut inner = lock(&self.inner);
        inner.calls.push(value.to_owned());

        if inner.failures > 0 {
            inner.failures -= 1;
            return Err(ActuatorError::Spawn {
                program: "mock-brightness".into(),
                source: std::io::Error::other("scripted failure"),
            });
        }

        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
