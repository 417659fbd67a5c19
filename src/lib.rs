//! Volux - floating volume controls for Wayland desktops
//!
//! This crate provides a small overlay of volume buttons and a swipe
//! gesture box that fade out after a delay and come back on touch.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Gesture classification, widget geometry, visibility state and preferences
//! - **Application**: The overlay controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (preference files, volume tools, notifications)
//! - **CLI**: Command-line interface, control socket and the daemon loop
//! - **GUI**: Overlay surfaces (Linux only, uses Wayland layer-shell)

pub mod application;
pub mod cli;
pub mod domain;
#[cfg(target_os = "linux")]
pub mod gui;
pub mod infrastructure;
