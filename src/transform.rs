//! Pan/zoom view transform for the image surface.
//!
//! Pan is measured in screen pixels from the container center, the same
//! origin the canvas uses for painting. A point `p` of the untransformed
//! surface lands on screen at `center + pan + (p - center) * scale`.

use eframe::egui;

use crate::config::ViewerConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    pub fn clamp(self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: crate::config::MIN_SCALE,
            max: crate::config::MAX_SCALE,
        }
    }
}

impl From<&ViewerConfig> for ScaleBounds {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            min: config.min_scale,
            max: config.max_scale,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan: egui::Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: egui::Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// Untransformed surface position -> screen position.
    pub fn apply(&self, container: egui::Rect, surface_pos: egui::Pos2) -> egui::Pos2 {
        let center = container.center();
        center + self.pan + (surface_pos - center) * self.scale
    }

    /// The displayed image rectangle on screen under this transform.
    pub fn image_box(&self, container: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
        let fitted = fit_rect(container, image_size);
        egui::Rect::from_min_max(
            self.apply(container, fitted.min),
            self.apply(container, fitted.max),
        )
    }
}

/// Letterboxed placement of an image inside the container at scale 1,
/// preserving aspect ratio ("contain" fit).
pub fn fit_rect(container: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return container;
    }
    let ratio = (container.width() / image_size.x).min(container.height() / image_size.y);
    egui::Rect::from_center_size(container.center(), image_size * ratio)
}

/// Scale requested by a wheel step. `delta_y` uses the DOM sign
/// convention: positive when scrolling toward the user, which zooms out.
pub fn wheel_scale(current: f32, delta_y: f32, sensitivity: f32) -> f32 {
    current - delta_y * sensitivity
}

// ── Viewport ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Viewport {
    transform: ViewTransform,
    bounds: ScaleBounds,
    drag_anchor: Option<egui::Vec2>,
}

impl Viewport {
    pub fn new(bounds: ScaleBounds) -> Self {
        Self {
            transform: ViewTransform::default(),
            bounds,
            drag_anchor: None,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn can_zoom_in(&self) -> bool {
        self.transform.scale < self.bounds.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.transform.scale > self.bounds.min
    }

    pub fn begin_drag(&mut self, pointer: egui::Pos2) {
        self.drag_anchor = Some(pointer.to_vec2() - self.transform.pan);
    }

    /// Returns false when no drag is in progress.
    pub fn continue_drag(&mut self, pointer: egui::Pos2) -> bool {
        let Some(anchor) = self.drag_anchor else {
            return false;
        };
        self.transform.pan = pointer.to_vec2() - anchor;
        true
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Zoom keeping the surface point under `pointer` fixed on screen.
    pub fn zoom_at(&mut self, pointer: egui::Pos2, requested: f32, container: egui::Rect) {
        let old_scale = self.transform.scale;
        let new_scale = self.bounds.clamp(requested);
        let ratio = new_scale / old_scale;
        let p = pointer - container.center();
        self.transform.pan = p - (p - self.transform.pan) * ratio;
        self.transform.scale = new_scale;
    }

    /// Zoom around the container center. Discards any drag offset.
    pub fn set_scale(&mut self, requested: f32) {
        self.transform.scale = self.bounds.clamp(requested);
        self.transform.pan = egui::Vec2::ZERO;
    }

    pub fn zoom_in(&mut self, step: f32) {
        self.set_scale(self.transform.scale + step);
    }

    pub fn zoom_out(&mut self, step: f32) {
        self.set_scale(self.transform.scale - step);
    }

    pub fn reset(&mut self) {
        self.drag_anchor = None;
        self.set_scale(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sub-pixel.
    const EPS: f32 = 1e-2;

    fn container() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    fn close(a: egui::Pos2, b: egui::Pos2) -> bool {
        (a - b).length() < EPS
    }

    fn invert(t: ViewTransform, container: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let center = container.center();
        center + (screen_pos - center - t.pan) / t.scale
    }

    #[test]
    fn wheel_at_center_zooms_without_shift() {
        let mut vp = Viewport::default();
        let requested = wheel_scale(vp.transform().scale, -100.0, 0.001);
        vp.zoom_at(egui::pos2(400.0, 300.0), requested, container());
        assert!((vp.transform().scale - 1.1).abs() < EPS);
        assert_eq!(vp.transform().pan, egui::Vec2::ZERO);
    }

    #[test]
    fn zoom_at_keeps_point_under_pointer() {
        let c = container();
        let pointers = [
            egui::pos2(0.0, 0.0),
            egui::pos2(123.0, 456.0),
            egui::pos2(799.0, 10.0),
            egui::pos2(-50.0, 900.0),
        ];
        let ratios = [0.5, 0.9, 1.3, 2.0, 7.5];
        for pointer in pointers {
            for ratio in ratios {
                let mut vp = Viewport::default();
                vp.begin_drag(egui::pos2(10.0, 10.0));
                vp.continue_drag(egui::pos2(47.0, -22.0));
                vp.end_drag();
                vp.zoom_at(egui::pos2(300.0, 200.0), 1.7, c);

                let before = vp.transform();
                let surface_point = invert(before, c, pointer);
                vp.zoom_at(pointer, before.scale * ratio, c);
                let after = vp.transform().apply(c, surface_point);
                assert!(close(after, pointer), "{pointer:?} x{ratio}: {after:?}");
            }
        }
    }

    #[test]
    fn scale_is_always_clamped() {
        let c = container();
        for requested in [-5.0, 0.0, 0.1, 0.5, 3.0, 10.0, 11.0, 1e6] {
            let mut vp = Viewport::default();
            vp.zoom_at(egui::pos2(100.0, 100.0), requested, c);
            let s = vp.transform().scale;
            assert!((0.5..=10.0).contains(&s), "{requested} -> {s}");
            vp.set_scale(requested);
            let s = vp.transform().scale;
            assert!((0.5..=10.0).contains(&s), "{requested} -> {s}");
        }
    }

    #[test]
    fn zoom_at_bound_is_idempotent() {
        let c = container();
        let mut vp = Viewport::default();
        vp.zoom_at(egui::pos2(200.0, 150.0), 50.0, c);
        let first = vp.transform();
        vp.zoom_at(egui::pos2(200.0, 150.0), 60.0, c);
        assert_eq!(vp.transform(), first);
        assert!(!vp.can_zoom_in());
        assert!(vp.can_zoom_out());
    }

    #[test]
    fn drag_translates_without_scaling() {
        let mut vp = Viewport::default();
        vp.set_scale(2.0);
        vp.begin_drag(egui::pos2(100.0, 100.0));
        assert!(vp.continue_drag(egui::pos2(130.0, 80.0)));
        assert_eq!(vp.transform().pan, egui::vec2(30.0, -20.0));
        assert_eq!(vp.transform().scale, 2.0);

        vp.end_drag();
        assert!(!vp.continue_drag(egui::pos2(500.0, 500.0)));
        assert_eq!(vp.transform().pan, egui::vec2(30.0, -20.0));

        // A second drag continues from the current pan.
        vp.begin_drag(egui::pos2(0.0, 0.0));
        vp.continue_drag(egui::pos2(5.0, 5.0));
        assert_eq!(vp.transform().pan, egui::vec2(35.0, -15.0));
    }

    #[test]
    fn set_scale_anchors_at_container_center() {
        let c = container();
        let mut vp = Viewport::default();
        vp.begin_drag(egui::pos2(0.0, 0.0));
        vp.continue_drag(egui::pos2(90.0, 40.0));
        vp.end_drag();

        vp.set_scale(3.0);
        let t = vp.transform();
        assert_eq!(t.pan, egui::Vec2::ZERO);
        assert!(close(t.apply(c, c.center()), c.center()));
    }

    #[test]
    fn buttons_step_and_reset() {
        let mut vp = Viewport::default();
        vp.zoom_in(0.5);
        vp.zoom_in(0.5);
        assert!((vp.transform().scale - 2.0).abs() < EPS);
        for _ in 0..10 {
            vp.zoom_out(0.5);
        }
        assert_eq!(vp.transform().scale, 0.5);
        vp.reset();
        assert_eq!(vp.transform(), ViewTransform::default());
    }

    #[test]
    fn fit_rect_letterboxes_wide_image() {
        let fitted = fit_rect(container(), egui::vec2(1600.0, 400.0));
        assert!(close(fitted.min, egui::pos2(0.0, 200.0)));
        assert!(close(fitted.max, egui::pos2(800.0, 400.0)));
    }

    #[test]
    fn image_box_follows_transform() {
        let c = container();
        let t = ViewTransform {
            pan: egui::vec2(10.0, -5.0),
            scale: 2.0,
        };
        let fitted = fit_rect(c, egui::vec2(400.0, 300.0));
        assert_eq!(fitted, c);
        let boxed = t.image_box(c, egui::vec2(400.0, 300.0));
        assert!(close(boxed.min, egui::pos2(-390.0, -305.0)));
        assert!((boxed.width() - 1600.0).abs() < EPS);
        assert!((boxed.height() - 1200.0).abs() < EPS);
    }
}
