//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the power switch: the
//! command vocabulary, the dedup/authorization gate, and the power-control
//! sequences.  All interaction with the relay, the status pin, the message
//! channel, and the clock happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod gate;
pub mod ports;
pub mod power;
pub mod replies;
pub mod service;
