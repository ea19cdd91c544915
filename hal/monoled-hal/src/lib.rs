//! monoled Hardware Abstraction Layer
//!
//! This crate defines the bus traits the display driver is written against,
//! so the same driver runs on any chip whose HAL can put bytes on an I2C bus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  monoled-driver (Ssd1306 controller)    │
//! └─────────────────────────────────────────┘
//!                     │  DisplayTransport
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  I2cInterface (control bytes, chunking) │
//! └─────────────────────────────────────────┘
//!                     │  I2cBus
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ EmbeddedHalBus│       │  test / mock  │
//! │ (any e-h I2c) │       │     buses     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master writes
//! - [`transport::DisplayTransport`] - Command and data writes to a display controller

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use i2c::{EmbeddedHalBus, I2cBus, I2cBusError, I2cConfig};
pub use transport::{DisplayTransport, I2cInterface};
