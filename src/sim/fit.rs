//! Coordinate mapping between normalized field space and device pixels
//!
//! All gameplay geometry (ball, obstacles, bounds) lives in field-relative
//! units; device pixels are computed on demand and never stored. A resize
//! only changes this mapping's inputs, not any simulation state.
//!
//! The field is an image of known aspect ratio fitted into a container.
//! `cover` scales until the container is fully covered (overflow is cropped,
//! placement weighted by the focus origin); `contain` scales until the whole
//! image is visible (letterboxed, placement weighted the same way).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;

/// How the field image is fitted into its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FitMode {
    /// Whole image visible, letterboxed.
    Contain,
    /// Container fully covered, image may overflow.
    #[default]
    Cover,
}

/// Drawn rectangle of the field image inside a container, in device pixels.
///
/// Pure function of (aspect, container size, mode, origin) - recomputed every
/// frame, never persisted. `draw_w / draw_h` equals the image aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitRect {
    pub draw_w: f32,
    pub draw_h: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Scale relative to a unit-height image (`draw_h`).
    pub scale: f32,
}

/// Fit an image of the given aspect ratio (width / height) into a
/// `container_w` x `container_h` box.
///
/// Degenerate inputs (zero/negative container or aspect) yield an all-zero
/// rectangle; callers skip collision work for such frames.
pub fn fit(
    aspect: f32,
    container_w: f32,
    container_h: f32,
    mode: FitMode,
    origin_x: f32,
    origin_y: f32,
) -> FitRect {
    if aspect <= 0.0 || container_w <= 0.0 || container_h <= 0.0 {
        return FitRect::default();
    }

    // Treat the image as aspect x 1.0 and pick the per-axis scale per mode.
    let scale_x = container_w / aspect;
    let scale_y = container_h;
    let scale = match mode {
        FitMode::Cover => scale_x.max(scale_y),
        FitMode::Contain => scale_x.min(scale_y),
    };

    let draw_w = aspect * scale;
    let draw_h = scale;

    FitRect {
        draw_w,
        draw_h,
        offset_x: (container_w - draw_w) * origin_x,
        offset_y: (container_h - draw_h) * origin_y,
        scale,
    }
}

impl FitRect {
    /// True when the rectangle carries no drawable area.
    pub fn is_degenerate(&self) -> bool {
        self.draw_w <= f32::EPSILON || self.draw_h <= f32::EPSILON
    }

    /// Field position ([0,1] x [0,1] spans the drawn image) to device pixels.
    #[inline]
    pub fn field_to_px(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + p.x * self.draw_w,
            self.offset_y + p.y * self.draw_h,
        )
    }

    /// Device pixels back to field units. Degenerate rects map everything to
    /// the origin rather than dividing by zero.
    #[inline]
    pub fn px_to_field(&self, p: Vec2) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }
        Vec2::new(
            (p.x - self.offset_x) / self.draw_w,
            (p.y - self.offset_y) / self.draw_h,
        )
    }

    /// Field velocity (field units/s) to pixel velocity (px/s).
    #[inline]
    pub fn vel_to_px(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x * self.draw_w, v.y * self.draw_h)
    }

    /// Pixel velocity back to field velocity.
    #[inline]
    pub fn vel_to_field(&self, v: Vec2) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }
        Vec2::new(v.x / self.draw_w, v.y / self.draw_h)
    }

    /// Ball radii are expressed as fractions of the field width.
    #[inline]
    pub fn px_radius(&self, r: f32) -> f32 {
        r * self.draw_w
    }

    /// Horizontal field range visible inside a container of `container_w`,
    /// clamped to [0, 1]. In contain mode this is the whole field; in cover
    /// mode the overflowed margins are cut off. These edges are the side
    /// walls of the play area.
    pub fn visible_field_x(&self, container_w: f32) -> (f32, f32) {
        if self.is_degenerate() {
            return (0.0, 1.0);
        }
        let left = (-self.offset_x / self.draw_w).max(0.0);
        let right = ((container_w - self.offset_x) / self.draw_w).min(1.0);
        (left, right)
    }

    /// Anchor/placement helper: the one function used to place every
    /// obstacle assembly (and the ball sprite) consistently at any container
    /// size.
    ///
    /// `rel_pos` is a position in field units, `rel_w` the box width as a
    /// fraction of the drawn field width (times `scale_mul`), `aspect` the
    /// box's own width/height ratio, and `anchor` the point of the box (0..1
    /// per axis) pinned to `rel_pos`.
    pub fn place(&self, rel_pos: Vec2, rel_w: f32, scale_mul: f32, aspect: f32, anchor: Vec2) -> Rect {
        let w = self.draw_w * rel_w * scale_mul;
        let h = if aspect > 0.0 { w / aspect } else { 0.0 };
        let origin = self.field_to_px(rel_pos);
        Rect::new(origin.x - anchor.x * w, origin.y - anchor.y * h, w, h)
    }
}
