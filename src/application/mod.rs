//! Application layer - Use cases and port interfaces
//!
//! Contains the overlay controller and the trait definitions for the
//! systems it drives.

pub mod controller;
pub mod ports;

// Re-export use cases
pub use controller::{ControllerError, ControllerStatus, Notice, OverlayController};
