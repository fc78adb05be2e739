//! Error types for the PowerSwitch firmware.
//!
//! One `Copy` enum per subsystem, so errors pass through the command
//! sequences and the event sink without allocation.  The boot path wraps
//! them in `anyhow`.
//!
//! None of these are fatal once the poll loop is running: the application
//! service logs them and moves on to the next tick.

use core::fmt;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failure of a fetch / react / reply against the message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No network link and reconnecting did not succeed.
    NotConnected,
    /// The HTTP request could not be performed (ESP-IDF error code).
    Request(i32),
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The response body could not be decoded.
    Decode(DecodeError),
    /// The response body exceeded the receive buffer.
    BodyTooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "network not connected"),
            Self::Request(code) => write!(f, "request failed (esp_err=0x{code:X})"),
            Self::Status(status) => write!(f, "HTTP status {status}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::BodyTooLarge => write!(f, "response body too large"),
        }
    }
}

impl core::error::Error for TransportError {}

/// Malformed response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid JSON (or truncated).
    Syntax,
    /// Valid JSON with an unexpected shape (missing or mistyped field).
    Shape,
    /// Body is not valid UTF-8.
    Utf8,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "malformed JSON"),
            Self::Shape => write!(f, "unexpected JSON shape"),
            Self::Utf8 => write!(f, "invalid UTF-8"),
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            serde_json::error::Category::Data => Self::Shape,
            serde_json::error::Category::Io
            | serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof => Self::Syntax,
        }
    }
}

impl From<DecodeError> for TransportError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Relay pin level could not be set.
    GpioWriteFailed,
    /// Status pin level could not be read.
    GpioReadFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl core::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    ClockSyncFailed,
    ClockSyncTimeout,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockSyncFailed => write!(f, "SNTP start failed"),
            Self::ClockSyncTimeout => write!(f, "SNTP sync timed out"),
        }
    }
}

impl core::error::Error for CommsError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.  Names the field.
    Missing(&'static str),
    /// A field failed validation.  Describes which field and why.
    Invalid(&'static str),
    /// The configuration document could not be parsed.
    Parse(DecodeError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "missing {field}"),
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
        }
    }
}

impl core::error::Error for ConfigError {}
