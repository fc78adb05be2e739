//! Power-button relay driver.
//!
//! The relay is wired across the host's front-panel power header.  The pin
//! idles HIGH (contacts open); a press drives it LOW for the hold time and
//! then releases it.  The hold is a blocking delay: a short tap and a
//! five-second forced shutdown differ only in how long the pin stays low.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` pins and delays.  On ESP-IDF the pin is a
//! `PinDriver<Output>` and the delay is `FreeRtos`; in tests both are mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, error};

use crate::error::ActuatorError;

pub struct RelayDriver<P, D> {
    pin: P,
    delay: D,
    presses: u32,
}

impl<P: OutputPin, D: DelayNs> RelayDriver<P, D> {
    /// Take the pin and drive it to the released level.
    pub fn new(mut pin: P, delay: D) -> Result<Self, ActuatorError> {
        pin.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Self {
            pin,
            delay,
            presses: 0,
        })
    }

    /// Hold the button for `hold_ms`, then release it.
    pub fn press(&mut self, hold_ms: u32) -> Result<(), ActuatorError> {
        debug!("Relay: press {} ms", hold_ms);
        self.pin
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.delay.delay_ms(hold_ms);

        if self.pin.set_high().is_err() {
            // One more try: a stuck-low relay keeps the host's button held.
            error!("Relay: release failed, retrying");
            self.pin
                .set_high()
                .map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        self.presses = self.presses.wrapping_add(1);
        Ok(())
    }

    /// Completed presses since boot.
    pub fn presses(&self) -> u32 {
        self.presses
    }
}
