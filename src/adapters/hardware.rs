//! Hardware adapter: bridges the relay and status pin to [`PowerPort`].
//!
//! This is the only module in the system that touches actual hardware.
//! It is generic over the `embedded-hal` pin and delay types, so on
//! non-espidf targets it runs against mock pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::PowerPort;
use crate::app::power::{PowerState, PressKind};
use crate::drivers::power_sense::PowerSense;
use crate::drivers::relay::RelayDriver;
use crate::error::ActuatorError;

/// Concrete adapter that combines the relay and the sense line.
pub struct HardwareAdapter<Out, In, D> {
    relay: RelayDriver<Out, D>,
    sense: PowerSense<In>,
}

impl<Out, In, D> HardwareAdapter<Out, In, D>
where
    Out: OutputPin,
    In: InputPin,
    D: DelayNs,
{
    pub fn new(relay: RelayDriver<Out, D>, sense: PowerSense<In>) -> Self {
        Self { relay, sense }
    }

    /// Relay presses completed since boot.
    pub fn presses(&self) -> u32 {
        self.relay.presses()
    }
}

// ── PowerPort implementation ──────────────────────────────────

impl<Out, In, D> PowerPort for HardwareAdapter<Out, In, D>
where
    Out: OutputPin,
    In: InputPin,
    D: DelayNs,
{
    fn sense(&mut self) -> Result<PowerState, ActuatorError> {
        self.sense.read()
    }

    fn press(&mut self, kind: PressKind, hold_ms: u32) -> Result<(), ActuatorError> {
        self.relay.press(hold_ms).inspect_err(|e| {
            warn!("Hardware: {} press of {} ms failed: {}", kind, hold_ms, e);
        })
    }
}
