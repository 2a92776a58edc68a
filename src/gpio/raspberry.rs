use rppal::gpio::{Gpio, InputPin};

use crate::{
    error::GpioError,
    gpio::{MotionReading, PinBank, SensorPin, SignalSource},
};

pub struct RaspberryPiBank {
    gpio: Gpio,
}

impl RaspberryPiBank {
    pub fn new() -> Result<Self, GpioError> {
        Ok(Self { gpio: Gpio::new()? })
    }
}

impl PinBank for RaspberryPiBank {
    type Source = RaspberryPiInput;

    fn claim(&self, pin: SensorPin) -> Result<Self::Source, GpioError> {
        let input = self
            .gpio
            .get(pin.bcm())
            .map_err(|e| GpioError::Claim {
                pin,
                reason: e.to_string(),
            })?
            .into_input_pulldown();

        Ok(RaspberryPiInput { pin, input })
    }
}

pub struct RaspberryPiInput {
    pin: SensorPin,
    input: InputPin,
}

impl SignalSource for RaspberryPiInput {
    fn pin(&self) -> SensorPin {
        self.pin
    }

    fn read(&mut self) -> Result<MotionReading, GpioError> {
        Ok(self.input.is_high())
    }
}
