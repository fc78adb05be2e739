//! Reply texts posted back to the control channel.

use super::power::PowerState;

pub const POWERING_ON: &str = "The server is now powering on.";
pub const ALREADY_ON: &str = "The server is already powered on.";
pub const POWERING_OFF: &str = "The server is now powering off.";
pub const ALREADY_OFF: &str = "The server is already powered off.";
pub const NOT_OFF_IN_TIME: &str = "The server was not powered off in time.";
pub const FORCING_OFF: &str = "Forcing the server to shut down.";
pub const SENSE_FAILED: &str = "Unable to read the power state.";

/// Answer to `!status`.
pub fn status(state: PowerState) -> &'static str {
    match state {
        PowerState::On => "The power is on.",
        PowerState::Off => "The power is off.",
    }
}
