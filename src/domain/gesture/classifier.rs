//! Pointer stream → action classification

use serde::Serialize;

use crate::domain::overlay::{Density, Position, WidgetKind};
use crate::domain::timing::Millis;

use super::mode::InteractionMode;
use super::pointer::{Point, PointerEvent, PointerPhase};

/// Displacement on either axis after which a touch is a drag, not a tap
pub const DRAG_THRESHOLD_PX: f32 = 10.0;
/// Vertical travel that triggers one swipe step on the gesture box
pub const SWIPE_THRESHOLD_DP: f32 = 20.0;
/// Longest press that still counts as a tap
pub const TAP_TIMEOUT_MS: u64 = 200;

/// Classified interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    StartSession,
    /// Increment since the previous drag of the session, in pixels
    Drag { dx: i32, dy: i32 },
    /// Ratio of current to previous inter-pointer distance
    PinchResize { scale: f32 },
    /// Short press released at (x, y)
    Tap { x: f32, y: f32 },
    SwipeUp,
    SwipeDown,
    EndSession,
}

impl Action {
    /// Whether the action mutates size or position
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Drag { .. } | Self::PinchResize { .. })
    }
}

/// What the classifier needs to know about the widget under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyContext {
    pub mode: InteractionMode,
    pub kind: WidgetKind,
    pub widget_position: Position,
    /// Width and height in dp
    pub widget_size: (u32, u32),
    pub density: Density,
}

/// Live record of one touch sequence
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub start_position: Point,
    pub start_widget_position: Position,
    pub start_size: (u32, u32),
    pub pointer_count: usize,
    pub down_ms: Millis,
    /// Displacement passed the drag threshold
    dragging: bool,
    /// A second pointer took part
    pinching: bool,
    /// Drag offset already emitted
    applied: (i32, i32),
    /// Reference y for the next swipe step
    swipe_reference_y: f32,
}

impl GestureSession {
    fn start(event: &PointerEvent, ctx: &ClassifyContext) -> Self {
        Self {
            start_position: event.position,
            start_widget_position: ctx.widget_position,
            start_size: ctx.widget_size,
            pointer_count: event.pointer_count(),
            down_ms: event.time_ms,
            dragging: false,
            pinching: event.secondary.is_some(),
            applied: (0, 0),
            swipe_reference_y: event.position.y,
        }
    }

    /// Time since the pointer went down
    pub fn elapsed_since_down(&self, now: Millis) -> u64 {
        now.saturating_sub(self.down_ms)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn qualifies_as_tap(&self, now: Millis) -> bool {
        !self.dragging && !self.pinching && self.elapsed_since_down(now) < TAP_TIMEOUT_MS
    }
}

/// Tracks the distance between two pointers across events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinchDetector {
    previous_span: Option<f32>,
}

impl PinchDetector {
    /// Feed the two pointer positions; returns the span ratio once a
    /// previous span is known
    pub fn update(&mut self, first: Point, second: Point) -> Option<f32> {
        let span = first.distance(second);
        if !span.is_finite() || span <= f32::EPSILON {
            return None;
        }
        let ratio = self.previous_span.map(|previous| span / previous);
        self.previous_span = Some(span);
        ratio
    }

    pub fn reset(&mut self) {
        self.previous_span = None;
    }
}

/// Stateful classifier for one widget's pointer stream
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    session: Option<GestureSession>,
    pinch: PinchDetector,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live session, if a pointer is down
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Classify one event into zero or more actions
    pub fn classify(&mut self, event: &PointerEvent, ctx: &ClassifyContext) -> Vec<Action> {
        match event.phase {
            PointerPhase::Down => {
                self.pinch.reset();
                if let Some(second) = event.secondary {
                    self.pinch.update(event.position, second);
                }
                self.session = Some(GestureSession::start(event, ctx));
                vec![Action::StartSession]
            }
            PointerPhase::Move => self.on_move(event, ctx),
            PointerPhase::Up => {
                let Some(session) = self.end_session() else {
                    return Vec::new();
                };
                if session.qualifies_as_tap(event.time_ms) {
                    vec![
                        Action::Tap {
                            x: event.position.x,
                            y: event.position.y,
                        },
                        Action::EndSession,
                    ]
                } else {
                    vec![Action::EndSession]
                }
            }
            PointerPhase::Cancel => match self.end_session() {
                Some(_) => vec![Action::EndSession],
                None => Vec::new(),
            },
        }
    }

    fn end_session(&mut self) -> Option<GestureSession> {
        self.pinch.reset();
        self.session.take()
    }

    fn on_move(&mut self, event: &PointerEvent, ctx: &ClassifyContext) -> Vec<Action> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.pointer_count = event.pointer_count();

        if let Some(second) = event.secondary {
            session.pinching = true;
            return match self.pinch.update(event.position, second) {
                Some(scale) if ctx.mode.is_move() => vec![Action::PinchResize { scale }],
                _ => Vec::new(),
            };
        }
        if session.pinching {
            self.pinch.reset();
            return Vec::new();
        }

        let dx = event.position.x - session.start_position.x;
        let dy = event.position.y - session.start_position.y;
        if dx.abs() > DRAG_THRESHOLD_PX || dy.abs() > DRAG_THRESHOLD_PX {
            session.dragging = true;
        }

        if ctx.mode.is_move() {
            if !session.dragging {
                return Vec::new();
            }
            let total = (dx as i32, dy as i32);
            let step = (
                total.0.saturating_sub(session.applied.0),
                total.1.saturating_sub(session.applied.1),
            );
            if step == (0, 0) {
                return Vec::new();
            }
            session.applied = total;
            return vec![Action::Drag {
                dx: step.0,
                dy: step.1,
            }];
        }

        if ctx.kind != WidgetKind::GestureBox {
            return Vec::new();
        }
        let delta = event.position.y - session.swipe_reference_y;
        if delta.abs() > ctx.density.dp_to_px_f(SWIPE_THRESHOLD_DP) {
            session.swipe_reference_y = event.position.y;
            session.dragging = true;
            if delta < 0.0 {
                vec![Action::SwipeUp]
            } else {
                vec![Action::SwipeDown]
            }
        } else {
            Vec::new()
        }
    }
}
