//! GPIO pin assignments for the PowerSwitch board.
//!
//! Single source of truth: `main.rs` takes the pins named here and nothing
//! else hard-codes a GPIO number.

// ---------------------------------------------------------------------------
// Power button relay
// ---------------------------------------------------------------------------

/// Digital output to the relay across the host's power-button header.
/// Idle HIGH (released); driven LOW for the length of a press.
pub const POWER_SWITCH_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Power status sense
// ---------------------------------------------------------------------------

/// Digital input from the host's power LED header (input-only pin).
/// HIGH = host powered on.
pub const STATUS_GPIO: i32 = 34;
