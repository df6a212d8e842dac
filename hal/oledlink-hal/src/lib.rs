//! oledlink Hardware Abstraction Layer
//!
//! This crate defines the register-level operations the bus engine needs
//! from a two-wire (I2C/TWI) master peripheral. Chip-specific code
//! implements [`TwiController`]; the engine in `oledlink-core` drives it
//! one hardware event at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  oledlink-core (engine, display)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oledlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  MCU register │       │   sim::SimTwi │
//! │     driver    │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::TwiController`] - start/write/stop primitives of a TWI master

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
#[cfg(feature = "sim")]
pub mod sim;

// Re-export key types at crate root for convenience
pub use i2c::{ClockDivider, I2cConfig, TwiController};
