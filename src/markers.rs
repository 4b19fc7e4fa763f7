use eframe::egui;

use crate::transform::ViewTransform;

/// A labeled location, normalized to the displayed image box so it stays
/// valid under any pan or zoom.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub label: String,
}

impl Marker {
    /// Returns `None` for a blank label or coordinates outside the image.
    pub fn new(x: f32, y: f32, label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() || !in_unit_range(x) || !in_unit_range(y) {
            return None;
        }
        Some(Self {
            x,
            y,
            label: label.to_owned(),
        })
    }
}

fn in_unit_range(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Pointer position -> normalized image coordinates. Positions outside the
/// image box (e.g. letterbox padding) are rejected.
pub fn to_image_space(pointer: egui::Pos2, image_box: egui::Rect) -> Option<(f32, f32)> {
    if image_box.width() <= 0.0 || image_box.height() <= 0.0 {
        return None;
    }
    let x = (pointer.x - image_box.min.x) / image_box.width();
    let y = (pointer.y - image_box.min.y) / image_box.height();
    (in_unit_range(x) && in_unit_range(y)).then_some((x, y))
}

/// Where and how to paint a marker pin. The anchor sits at the marker's
/// percentage offset within the transformed image box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinPlacement {
    /// Screen point the pin tip sits on.
    pub anchor: egui::Pos2,
    /// Inverse of the view scale; applied on top of the surface transform it
    /// keeps the glyph at a constant on-screen size.
    pub counter_scale: f32,
}

pub fn to_screen_space(
    marker: &Marker,
    transform: &ViewTransform,
    container: egui::Rect,
    image_size: egui::Vec2,
) -> PinPlacement {
    let image_box = transform.image_box(container, image_size);
    let size = image_box.size();
    PinPlacement {
        anchor: image_box.min + egui::vec2(marker.x * size.x, marker.y * size.y),
        counter_scale: 1.0 / transform.scale,
    }
}

// ── Marker list ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct MarkerList {
    markers: Vec<Marker>,
}

impl MarkerList {
    pub fn append(&mut self, marker: Marker) -> usize {
        self.markers.push(marker);
        self.markers.len() - 1
    }

    /// Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<Marker> {
        (index < self.markers.len()).then(|| self.markers.remove(index))
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn list(&self) -> &[Marker] {
        &self.markers
    }

}
