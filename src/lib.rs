//! DHT11 Sensor Driver and Room Comfort Monitor for Embedded Rust
//!
//! This crate provides a platform-agnostic, bit-banged driver for the DHT11
//! temperature and humidity sensor, built on top of the [`embedded-hal`] traits,
//! and a small polling loop that raises an LED and buzzer alarm when the room
//! gets too hot or too dry.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Retunable pulse timings for other sensors of the same family
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for accurate timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support and emits log
//!   messages from the driver and the monitor loop
//!
//! # Limitations
//! Readings carry whole degrees and whole percent only. The fractional bytes
//! are captured (see [`RawFrame`]) but not decoded.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod dht11;
pub mod error;
pub mod frame;
pub mod line;
pub mod monitor;
pub mod timing;

#[cfg(test)]
mod sim;

pub use dht11::{DecodeOutcome, Dht11};
pub use error::{DhtError, LineError, MonitorError};
pub use frame::{RawFrame, Reading};
pub use line::{Direction, Level, Line};
pub use monitor::{Cadence, Monitor, Sensor, Thresholds, TickError};
pub use timing::Timing;
