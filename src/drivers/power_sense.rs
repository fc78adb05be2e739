//! Host power status input.
//!
//! Reads the host's power LED line: HIGH while the host is on.  No
//! debouncing; every call is a fresh sample.

use embedded_hal::digital::InputPin;

use crate::app::power::PowerState;
use crate::error::ActuatorError;

pub struct PowerSense<P> {
    pin: P,
}

impl<P: InputPin> PowerSense<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn read(&mut self) -> Result<PowerState, ActuatorError> {
        self.pin
            .is_high()
            .map(PowerState::from_level)
            .map_err(|_| ActuatorError::GpioReadFailed)
    }
}
