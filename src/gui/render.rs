//! Software rendering of overlay widgets with tiny-skia

use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

use crate::domain::overlay::{Appearance, Frame, Shape};

/// Color helpers (Color::from_rgba8 is not const)
fn surface_color(opacity: f32) -> Color {
    rgba(0.12, 0.12, 0.12, 0.86 * opacity)
}

fn glyph_color(opacity: f32) -> Color {
    rgba(1.0, 1.0, 1.0, opacity)
}

fn dot_color(opacity: f32) -> Color {
    rgba(0.33, 0.63, 1.0, opacity)
}

fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
    Color::from_rgba(r, g, b, a.clamp(0.0, 1.0)).unwrap_or(Color::TRANSPARENT)
}

/// Draw one widget into a `width`×`height` pixmap.
///
/// `frame` is the current animation sample, if any. Returns None for an
/// empty surface size.
pub fn render(appearance: &Appearance, frame: Option<Frame>, width: u32, height: u32) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    pixmap.fill(Color::TRANSPARENT);

    let opacity = frame
        .and_then(|f| f.opacity)
        .unwrap_or(appearance.opacity)
        .clamp(0.0, 1.0);
    if opacity == 0.0 {
        return Some(pixmap);
    }

    let (w, h) = (width as f32, height as f32);
    let transform = frame_transform(frame, w, h);

    let mut paint = Paint::default();
    paint.anti_alias = true;

    match appearance.shape {
        Shape::ButtonPair { button_px, gap_px } => {
            let d = button_px as f32;
            let r = d / 2.0;
            let lower_top = d + gap_px as f32;
            for (top, raise) in [(0.0, true), (lower_top, false)] {
                paint.set_color(surface_color(opacity));
                if let Some(circle) = circle(w / 2.0, top + r, r) {
                    pixmap.fill_path(&circle, &paint, FillRule::Winding, transform, None);
                }
                paint.set_color(glyph_color(opacity));
                draw_sign(&mut pixmap, &paint, transform, w / 2.0, top + r, d * 0.4, raise);
            }
        }
        Shape::RoundedBox { corner_px } => {
            paint.set_color(surface_color(opacity));
            if let Some(path) = rounded_rect(w, h, corner_px as f32) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
            // Grip line hinting at vertical swipes
            paint.set_color(glyph_color(opacity * 0.6));
            if let Some(grip) = Rect::from_xywh(w * 0.35, h / 2.0 - 2.0, w * 0.3, 4.0) {
                pixmap.fill_rect(grip, &paint, transform, None);
            }
        }
        Shape::Dot => {
            paint.set_color(dot_color(opacity));
            let r = w.min(h) / 2.0;
            if let Some(circle) = circle(w / 2.0, h / 2.0, r) {
                pixmap.fill_path(&circle, &paint, FillRule::Winding, transform, None);
            }
        }
    }

    Some(pixmap)
}

/// Scale around the center, then translate vertically
fn frame_transform(frame: Option<Frame>, w: f32, h: f32) -> Transform {
    let Some(frame) = frame else {
        return Transform::identity();
    };
    let (cx, cy) = (w / 2.0, h / 2.0);
    Transform::from_translate(cx, cy + frame.translate_y)
        .pre_scale(frame.scale, frame.scale)
        .pre_translate(-cx, -cy)
}

fn circle(cx: f32, cy: f32, r: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.push_circle(cx, cy, r);
    pb.finish()
}

fn rounded_rect(w: f32, h: f32, radius: f32) -> Option<Path> {
    let radius = radius.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(radius, 0.0);
    pb.line_to(w - radius, 0.0);
    pb.quad_to(w, 0.0, w, radius);
    pb.line_to(w, h - radius);
    pb.quad_to(w, h, w - radius, h);
    pb.line_to(radius, h);
    pb.quad_to(0.0, h, 0.0, h - radius);
    pb.line_to(0.0, radius);
    pb.quad_to(0.0, 0.0, radius, 0.0);
    pb.close();
    pb.finish()
}

/// Plus for raise, minus for lower
fn draw_sign(
    pixmap: &mut Pixmap,
    paint: &Paint,
    transform: Transform,
    cx: f32,
    cy: f32,
    size: f32,
    plus: bool,
) {
    let stroke = (size / 6.0).max(2.0);
    if let Some(bar) = Rect::from_xywh(cx - size / 2.0, cy - stroke / 2.0, size, stroke) {
        pixmap.fill_rect(bar, paint, transform, None);
    }
    if plus {
        if let Some(bar) = Rect::from_xywh(cx - stroke / 2.0, cy - size / 2.0, stroke, size) {
            pixmap.fill_rect(bar, paint, transform, None);
        }
    }
}

/// Copy premultiplied RGBA pixels into an ARGB8888 (little-endian BGRA) canvas
pub fn copy_to_argb(pixmap: &Pixmap, canvas: &mut [u8]) {
    let src = pixmap.data();
    for (dst, px) in canvas.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        dst[0] = px[2];
        dst[1] = px[1];
        dst[2] = px[0];
        dst[3] = px[3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    fn dot(opacity: f32) -> Appearance {
        Appearance {
            shape: Shape::Dot,
            opacity,
            visible: true,
        }
    }

    #[test]
    fn dot_fills_center_not_corner() {
        let pixmap = render(&dot(1.0), None, 20, 20).unwrap();
        assert!(alpha_at(&pixmap, 10, 10) > 200);
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
    }

    #[test]
    fn zero_opacity_draws_nothing() {
        let pixmap = render(&dot(0.0), None, 20, 20).unwrap();
        assert!(pixmap.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn frame_opacity_overrides_appearance() {
        let frame = Frame {
            opacity: Some(0.0),
            scale: 1.0,
            translate_y: 0.0,
        };
        let pixmap = render(&dot(1.0), Some(frame), 20, 20).unwrap();
        assert_eq!(alpha_at(&pixmap, 10, 10), 0);
    }

    #[test]
    fn button_pair_draws_both_buttons() {
        let appearance = Appearance {
            shape: Shape::ButtonPair {
                button_px: 60,
                gap_px: 8,
            },
            opacity: 1.0,
            visible: true,
        };
        let pixmap = render(&appearance, None, 60, 128).unwrap();
        // Left edge of each circle's body, away from the glyphs
        assert!(alpha_at(&pixmap, 8, 30) > 0);
        assert!(alpha_at(&pixmap, 8, 98) > 0);
        // Gap between buttons stays clear at the edge
        assert_eq!(alpha_at(&pixmap, 2, 64), 0);
    }

    #[test]
    fn rounded_box_leaves_corners_clear() {
        let appearance = Appearance {
            shape: Shape::RoundedBox { corner_px: 12 },
            opacity: 0.8,
            visible: true,
        };
        let pixmap = render(&appearance, None, 200, 100).unwrap();
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
        assert!(alpha_at(&pixmap, 20, 20) > 0);
    }

    #[test]
    fn empty_size_yields_none() {
        assert!(render(&dot(1.0), None, 0, 10).is_none());
    }

    #[test]
    fn argb_copy_swaps_red_and_blue() {
        let mut pixmap = Pixmap::new(1, 1).unwrap();
        pixmap.fill(Color::from_rgba8(255, 0, 0, 255));
        let mut canvas = [0u8; 4];
        copy_to_argb(&pixmap, &mut canvas);
        assert_eq!(canvas, [0, 0, 255, 255]);
    }
}
