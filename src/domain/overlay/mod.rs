//! Overlay widgets and their geometry

pub mod animation;
pub mod geometry;
mod widget;

pub use animation::{Animation, Frame};
pub use geometry::{Density, Gravity, Position, WindowFlags, WindowGeometry};
pub use widget::{
    Appearance, ButtonCluster, GestureBox, GestureOutcome, IndicatorDot, Shape, VolumeDirection,
    Widget, WidgetKind, WidgetState,
};
