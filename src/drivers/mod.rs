//! Pin-level drivers for the relay and the power status line.
//!
//! Both are generic over `embedded-hal` 1.0 traits, so the same code drives
//! an ESP-IDF `PinDriver` on target and a recording mock in tests.

pub mod power_sense;
pub mod relay;
