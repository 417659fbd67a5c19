//! GUI module for the overlay windows (Linux only)
//!
//! Uses Wayland layer-shell for proper overlay behavior on Linux.

pub mod layer_shell;
mod render;

pub use layer_shell::{LayerShellError, LayerShellWindowManager, PointerInput};
