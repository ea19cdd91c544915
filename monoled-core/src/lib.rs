//! Board-agnostic core for monochrome page-addressed displays
//!
//! This crate contains everything that does not touch a bus:
//!
//! - Page-organized framebuffer with per-page dirty column tracking
//! - Drawing primitives composed from single-pixel writes
//! - Fixed 5x8 bitmap font and wrap/truncate text layout
//! - Display geometry configuration
//!
//! # Framebuffer layout
//!
//! ```text
//!            column 0   column 1        column width-1
//! page 0   [ byte 0 ] [ byte 1 ] ... [ byte width-1 ]      rows 0..7
//! page 1   [ byte w ] [ ...    ] ... [ ...          ]      rows 8..15
//! ```
//!
//! Bit `b` of a byte is pixel row `page * 8 + b` of that column.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod canvas;
pub mod config;
pub mod dirty;
pub mod font;
pub mod framebuffer;
pub mod text;

pub use canvas::{Canvas, Clip, Color};
pub use config::{ConfigError, DisplayConfig};
pub use dirty::{ColumnSpan, DirtyTracker};
pub use framebuffer::{Framebuffer, FramebufferError};
pub use text::{TextExt, TextOutcome, WrapMode};
