//! Window manager adapters that need no compositor

mod headless;

pub use headless::{HeadlessWindow, HeadlessWindowManager};
