//! Viewer session: the single owner of the live view transform, the marker
//! list and the current pointer interaction for the selected image.
//!
//! Input arrives as [`Event`]s; each call to [`ViewerSession::handle`] is one
//! deterministic state transition and reports what changed as an [`Effect`],
//! so the whole interaction model runs headless in tests.

use eframe::egui;

use crate::config::ViewerConfig;
use crate::markers::{self, Marker, MarkerList};
use crate::transform::{self, ScaleBounds, ViewTransform, Viewport};

/// Geometry the shell reports for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub container: egui::Rect,
    pub image_size: egui::Vec2,
}

impl Surface {
    pub fn image_box(&self, transform: &ViewTransform) -> egui::Rect {
        transform.image_box(self.container, self.image_size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging,
    PendingLabel { x: f32, y: f32, label: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PointerDown(egui::Pos2),
    PointerMove(egui::Pos2),
    PointerUp,
    /// `delta_y` uses the DOM sign convention (positive = toward the user).
    Wheel { pointer: egui::Pos2, delta_y: f32 },
    DoubleClick(egui::Pos2),
    LabelEdited(String),
    ConfirmLabel,
    CancelLabel,
    SetScale(f32),
    ZoomIn,
    ZoomOut,
    ResetView,
    RemoveMarker(usize),
    ClearMarkers,
    EntryChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    TransformChanged,
    LabelRequested,
    LabelDismissed,
    MarkerAdded(usize),
    MarkerRemoved(usize),
    MarkersCleared,
    SessionReset,
}

pub struct ViewerSession {
    viewport: Viewport,
    markers: MarkerList,
    interaction: Interaction,
    wheel_sensitivity: f32,
    zoom_step: f32,
}

impl ViewerSession {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            viewport: Viewport::new(ScaleBounds::from(config)),
            markers: MarkerList::default(),
            interaction: Interaction::Idle,
            wheel_sensitivity: config.wheel_sensitivity,
            zoom_step: config.zoom_step,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn markers(&self) -> &[Marker] {
        self.markers.list()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_label_pending(&self) -> bool {
        matches!(self.interaction, Interaction::PendingLabel { .. })
    }

    pub fn handle(&mut self, event: Event, surface: &Surface) -> Effect {
        match event {
            Event::PointerDown(pos) => {
                // No panning while a label is being entered.
                if self.interaction == Interaction::Idle {
                    self.viewport.begin_drag(pos);
                    self.interaction = Interaction::Dragging;
                }
                Effect::None
            }
            Event::PointerMove(pos) => {
                if self.interaction == Interaction::Dragging && self.viewport.continue_drag(pos) {
                    Effect::TransformChanged
                } else {
                    Effect::None
                }
            }
            Event::PointerUp => {
                if self.interaction == Interaction::Dragging {
                    self.viewport.end_drag();
                    self.interaction = Interaction::Idle;
                }
                Effect::None
            }
            Event::Wheel { pointer, delta_y } => {
                let requested = transform::wheel_scale(
                    self.viewport.transform().scale,
                    delta_y,
                    self.wheel_sensitivity,
                );
                self.viewport.zoom_at(pointer, requested, surface.container);
                Effect::TransformChanged
            }
            Event::DoubleClick(pos) => {
                if self.is_label_pending() {
                    return Effect::None;
                }
                let image_box = surface.image_box(&self.viewport.transform());
                let Some((x, y)) = markers::to_image_space(pos, image_box) else {
                    log::trace!("double-click at {pos:?} outside image box {image_box:?}");
                    return Effect::None;
                };
                self.viewport.end_drag();
                self.interaction = Interaction::PendingLabel {
                    x,
                    y,
                    label: String::new(),
                };
                Effect::LabelRequested
            }
            Event::LabelEdited(text) => {
                if let Interaction::PendingLabel { label, .. } = &mut self.interaction {
                    *label = text;
                }
                Effect::None
            }
            Event::ConfirmLabel => self.commit_pending(),
            Event::CancelLabel => {
                if !self.is_label_pending() {
                    return Effect::None;
                }
                self.interaction = Interaction::Idle;
                Effect::LabelDismissed
            }
            Event::SetScale(scale) => {
                self.viewport.set_scale(scale);
                Effect::TransformChanged
            }
            Event::ZoomIn => {
                self.viewport.zoom_in(self.zoom_step);
                Effect::TransformChanged
            }
            Event::ZoomOut => {
                self.viewport.zoom_out(self.zoom_step);
                Effect::TransformChanged
            }
            Event::ResetView => {
                self.viewport.reset();
                Effect::TransformChanged
            }
            Event::RemoveMarker(index) => match self.markers.remove_at(index) {
                Some(marker) => {
                    log::debug!("removed marker {index} ({})", marker.label);
                    Effect::MarkerRemoved(index)
                }
                None => Effect::None,
            },
            Event::ClearMarkers => {
                self.markers.clear();
                Effect::MarkersCleared
            }
            Event::EntryChanged => {
                self.viewport.reset();
                self.markers.clear();
                self.interaction = Interaction::Idle;
                Effect::SessionReset
            }
        }
    }

    /// Blank labels are rejected and leave the entry open.
    fn commit_pending(&mut self) -> Effect {
        let Interaction::PendingLabel { x, y, label } = &self.interaction else {
            return Effect::None;
        };
        let Some(marker) = Marker::new(*x, *y, label) else {
            return Effect::None;
        };
        log::debug!(
            "added marker {:?} at ({:.3}, {:.3})",
            marker.label,
            marker.x,
            marker.y
        );
        let index = self.markers.append(marker);
        self.interaction = Interaction::Idle;
        Effect::MarkerAdded(index)
    }
}
