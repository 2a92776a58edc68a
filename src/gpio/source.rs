use crate::{
    error::GpioError,
    gpio::{MotionReading, SensorPin},
};

/// A claimed digital input line.
///
/// Dropping the source releases the line.
pub trait SignalSource: Send {
    fn pin(&self) -> SensorPin;

    /// Instantaneous, non-blocking level of the line.
    fn read(&mut self) -> Result<MotionReading, GpioError>;
}

/// Hands out input lines configured with a pull-down bias, so a floating line reads inactive.
pub trait PinBank {
    type Source: SignalSource;

    fn claim(&self, pin: SensorPin) -> Result<Self::Source, GpioError>;
}

impl<B: PinBank + ?Sized> PinBank for &B {
    type Source = B::Source;

    fn claim(&self, pin: SensorPin) -> Result<Self::Source, GpioError> {
        (**self).claim(pin)
    }
}
