//! Display controller drivers
//!
//! Drivers own a [`monoled_core::Framebuffer`] and push its dirty regions to
//! the panel through a [`monoled_hal::DisplayTransport`]:
//!
//! - SSD1306 (128x64, 128x32 and other page-addressed geometries)
//!
//! Each driver also implements `embedded-graphics`' `DrawTarget`, so the
//! wider embedded-graphics ecosystem can draw into the same framebuffer.

#![no_std]
#![deny(unsafe_code)]

pub mod error;
pub mod graphics;
pub mod ssd1306;

pub use error::Error;
pub use ssd1306::{DriverState, Ssd1306};
