//! Shown/hidden state of the overlay controls

mod state;

pub use state::{
    InvalidStateTransition, Visibility, VisibilityEvent, VisibilityManager, VisibilityState,
};
