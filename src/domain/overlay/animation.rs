//! Fire-and-forget animation descriptors
//!
//! The controller never waits on an animation. Geometry and preferences are
//! updated before one is started; adapters sample the descriptor per frame.

use serde::Serialize;

use super::widget::VolumeDirection;

/// Fade used when restoring opacity on interaction
pub const FADE_IN_MS: u64 = 200;
/// Fade used by auto-hide
pub const FADE_OUT_MS: u64 = 300;
/// Scale+fade entrance used when revealing hidden controls
pub const ZOOM_ENTRANCE_MS: u64 = 400;
/// Starting scale of the entrance animation
pub const ZOOM_START_SCALE: f32 = 0.1;

/// One visual effect applied to a whole overlay window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Animation {
    /// Linear opacity change
    Fade { from: f32, to: f32, duration_ms: u64 },
    /// Scale up from `from_scale` to 1 while fading from 0 to `to_opacity`
    ZoomEntrance {
        from_scale: f32,
        to_opacity: f32,
        duration_ms: u64,
    },
    /// Out-and-back vertical bounce with a small scale pulse
    Bounce {
        translate_y: f32,
        translate_ms: u64,
        peak_scale: f32,
        scale_ms: u64,
    },
}

/// Sampled animation values at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Opacity override, None when the animation leaves opacity alone
    pub opacity: Option<f32>,
    pub scale: f32,
    pub translate_y: f32,
}

impl Animation {
    /// Fade from the current opacity back to the preference opacity
    pub fn fade_in(from: f32, to: f32) -> Self {
        Self::Fade {
            from,
            to,
            duration_ms: FADE_IN_MS,
        }
    }

    /// Fade to fully transparent
    pub fn fade_out(from: f32) -> Self {
        Self::Fade {
            from,
            to: 0.0,
            duration_ms: FADE_OUT_MS,
        }
    }

    /// Emphasized entrance for hidden controls
    pub fn zoom_entrance(to_opacity: f32) -> Self {
        Self::ZoomEntrance {
            from_scale: ZOOM_START_SCALE,
            to_opacity,
            duration_ms: ZOOM_ENTRANCE_MS,
        }
    }

    /// Feedback after a swipe on the gesture box
    pub fn swipe_feedback(direction: VolumeDirection) -> Self {
        Self::Bounce {
            translate_y: direction.sign() * 30.0,
            translate_ms: 200,
            peak_scale: 1.05,
            scale_ms: 150,
        }
    }

    /// Feedback after pressing a volume button
    pub fn button_bounce(direction: VolumeDirection) -> Self {
        Self::Bounce {
            translate_y: direction.sign() * 20.0,
            translate_ms: 300,
            peak_scale: 1.1,
            scale_ms: 200,
        }
    }

    /// Total running time
    pub fn duration_ms(&self) -> u64 {
        match *self {
            Self::Fade { duration_ms, .. } => duration_ms,
            Self::ZoomEntrance { duration_ms, .. } => duration_ms,
            Self::Bounce {
                translate_ms,
                scale_ms,
                ..
            } => translate_ms.max(scale_ms),
        }
    }

    /// Values `elapsed_ms` after the animation started
    pub fn sample(&self, elapsed_ms: u64) -> Frame {
        match *self {
            Self::Fade {
                from,
                to,
                duration_ms,
            } => Frame {
                opacity: Some(lerp(from, to, progress(elapsed_ms, duration_ms))),
                scale: 1.0,
                translate_y: 0.0,
            },
            Self::ZoomEntrance {
                from_scale,
                to_opacity,
                duration_ms,
            } => {
                let t = progress(elapsed_ms, duration_ms);
                Frame {
                    opacity: Some(lerp(0.0, to_opacity, t)),
                    scale: lerp(from_scale, 1.0, t),
                    translate_y: 0.0,
                }
            }
            Self::Bounce {
                translate_y,
                translate_ms,
                peak_scale,
                scale_ms,
            } => Frame {
                opacity: None,
                scale: lerp(1.0, peak_scale, triangle(elapsed_ms, scale_ms)),
                translate_y: translate_y * triangle(elapsed_ms, translate_ms),
            },
        }
    }
}

fn progress(elapsed_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).min(1.0)
}

/// 0 → 1 → 0 over `duration_ms`
fn triangle(elapsed_ms: u64, duration_ms: u64) -> f32 {
    let t = progress(elapsed_ms, duration_ms);
    if t < 0.5 {
        t * 2.0
    } else {
        (1.0 - t) * 2.0
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_entrance_starts_small_and_transparent() {
        let anim = Animation::zoom_entrance(0.8);
        let start = anim.sample(0);
        assert_eq!(start.opacity, Some(0.0));
        assert!((start.scale - 0.1).abs() < f32::EPSILON);

        let end = anim.sample(ZOOM_ENTRANCE_MS);
        assert_eq!(end.opacity, Some(0.8));
        assert_eq!(end.scale, 1.0);
    }

    #[test]
    fn fade_out_reaches_zero() {
        let anim = Animation::fade_out(0.8);
        assert_eq!(anim.duration_ms(), FADE_OUT_MS);
        assert_eq!(anim.sample(FADE_OUT_MS * 2).opacity, Some(0.0));
    }

    #[test]
    fn bounce_returns_to_rest() {
        let anim = Animation::swipe_feedback(VolumeDirection::Raise);
        assert_eq!(anim.duration_ms(), 200);
        let mid = anim.sample(100);
        assert!((mid.translate_y + 30.0).abs() < 0.01);
        let end = anim.sample(200);
        assert_eq!(end.translate_y, 0.0);
        assert_eq!(end.scale, 1.0);
        assert_eq!(end.opacity, None);
    }

    #[test]
    fn button_bounce_goes_down_for_lower() {
        match Animation::button_bounce(VolumeDirection::Lower) {
            Animation::Bounce { translate_y, .. } => assert_eq!(translate_y, 20.0),
            other => panic!("unexpected animation {:?}", other),
        }
    }
}
