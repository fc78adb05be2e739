//! Power-state and relay-press vocabulary.

use core::fmt;

/// Host power state, as sensed on the status pin.
///
/// Never cached: every decision point samples the pin again, because the
/// host can change state on its own (front-panel button, OS shutdown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// Status pin level to state: high = powered on.
    pub fn from_level(high: bool) -> Self {
        if high { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// How long the relay emulates holding the power button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Normal tap: boots a powered-off host, asks a running one to shut down.
    Momentary,
    /// Held press: forces the host off, possibly losing data.
    Hard,
}

impl fmt::Display for PressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Momentary => write!(f, "momentary"),
            Self::Hard => write!(f, "hard"),
        }
    }
}
