//! Application-facing display layer
//!
//! This crate provides:
//! - `SharedDisplay`: one display handle shared between tasks behind an
//!   async mutex, with bounded lock waits
//! - `RefreshGovernor`: minimum interval between throttled refreshes
//! - `Screen`: fixed text layouts (status, connection state, errors, messages)
//!
//! # Architecture
//!
//! ```text
//! task A ──┐
//! task B ──┼──> SharedDisplay ──lock──> clear + draw lines ──> governor? ──> show()
//! task C ──┘       (timeout)
//! ```
//!
//! A render either completes under a single lock acquisition or reports why
//! it did not. Nothing is queued.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod governor;
pub mod screen;
pub mod shared;

pub use config::PanelConfig;
pub use governor::RefreshGovernor;
pub use screen::{Line, Screen, ScreenKind, MAX_LINES};
pub use shared::{RenderOutcome, SharedDisplay};
