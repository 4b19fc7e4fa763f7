use eframe::egui;
use std::collections::HashMap;

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{ViewerConfig, PLACEHOLDER_SIZE, SLIDER_STEP};
use crate::markers;
use crate::session::{Effect, Event, Interaction, Surface, ViewerSession};

const SIDEBAR_WIDTH: f32 = 320.0;
const PIN_RADIUS: f32 = 7.0;
const PIN_COLOR: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);

// ── Image cache ─────────────────────────────────────────────────────────────

struct LoadedImage {
    /// `None` when the asset is missing; a placeholder is painted instead.
    texture: Option<egui::TextureHandle>,
    size: egui::Vec2,
}

fn load_image(ctx: &egui::Context, config: &ViewerConfig, entry: &CatalogEntry) -> LoadedImage {
    let path = config.assets_dir.join(entry.image);
    let img = match image::open(&path) {
        Ok(img) => img,
        Err(err) => {
            log::warn!("cannot load {}: {err}; showing placeholder", path.display());
            return LoadedImage {
                texture: None,
                size: egui::vec2(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1),
            };
        }
    };
    let size = egui::vec2(img.width() as f32, img.height() as f32);

    // Layout keeps the intrinsic size; only the uploaded texture shrinks.
    let max_side = ctx.input(|i| i.max_texture_side) as u32;
    let img = if img.width() > max_side || img.height() > max_side {
        log::debug!(
            "downscaling {} from {}x{} to fit {max_side}px textures",
            entry.image,
            img.width(),
            img.height()
        );
        img.thumbnail(max_side, max_side)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let pixels = rgba.as_flat_samples();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [rgba.width() as usize, rgba.height() as usize],
        pixels.as_slice(),
    );
    log::info!("loaded {} ({}x{})", path.display(), size.x, size.y);
    LoadedImage {
        texture: Some(ctx.load_texture(entry.id, color_image, egui::TextureOptions::LINEAR)),
        size,
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct ExplorerApp {
    config: ViewerConfig,
    catalog: Catalog,
    session: ViewerSession,
    images: HashMap<&'static str, LoadedImage>,
    /// Canvas geometry from the most recent frame.
    surface: Surface,
    focus_label: bool,
}

impl ExplorerApp {
    pub fn new(config: ViewerConfig, catalog: Catalog) -> Self {
        let session = ViewerSession::new(&config);
        Self {
            config,
            catalog,
            session,
            images: HashMap::new(),
            surface: Surface {
                container: egui::Rect::ZERO,
                image_size: egui::vec2(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1),
            },
            focus_label: false,
        }
    }

    fn dispatch(&mut self, event: Event) -> Effect {
        self.session.handle(event, &self.surface)
    }

    fn ensure_image(&mut self, ctx: &egui::Context) {
        let entry = self.catalog.selected();
        let loaded = self
            .images
            .entry(entry.id)
            .or_insert_with(|| load_image(ctx, &self.config, entry));
        self.surface.image_size = loaded.size;
    }

    fn select(&mut self, id: &str) {
        if self.catalog.select(id) {
            log::info!("selected {}", self.catalog.selected().name);
            self.dispatch(Event::EntryChanged);
        }
    }

    fn catalog_panel(&mut self, ui: &mut egui::Ui) -> Option<&'static str> {
        ui.add_space(8.0);
        ui.heading("NASA Explorer");
        ui.add_space(4.0);
        ui.add(
            egui::TextEdit::singleline(&mut self.catalog.query)
                .hint_text("Search images...")
                .desired_width(f32::INFINITY),
        );
        ui.separator();

        let current = self.catalog.selected().id;
        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in self.catalog.filtered() {
                let fill = if entry.id == current {
                    ui.visuals().selection.bg_fill.gamma_multiply(0.3)
                } else {
                    ui.visuals().faint_bg_color
                };
                let card = egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.strong(entry.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let [r, g, b] = entry.category.rgb();
                            ui.label(
                                egui::RichText::new(entry.category.label())
                                    .small()
                                    .color(egui::Color32::from_rgb(r, g, b)),
                            );
                        });
                    });
                    ui.small(entry.description);
                    ui.horizontal(|ui| {
                        ui.small(entry.resolution);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.small(entry.date.format("%b %-d, %Y").to_string());
                        });
                    });
                });
                if card.response.interact(egui::Sense::click()).clicked() {
                    clicked = Some(entry.id);
                }
            }
            if self.catalog.filtered().next().is_none() {
                ui.weak(format!(
                    "No matches among {} images",
                    self.catalog.entries().len()
                ));
            }
        });
        clicked
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        let entry = self.catalog.selected();
        let (name, subtitle) = (entry.name, format!("{} • {}", entry.resolution, entry.date));
        ui.horizontal(|ui| {
            if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                self.catalog.toggle_sidebar();
            }
            ui.vertical(|ui| {
                ui.heading(name);
                ui.weak(subtitle);
            });
        });
    }

    fn zoom_controls(&mut self, ui: &mut egui::Ui) {
        let viewport = self.session.viewport();
        let bounds = viewport.bounds();
        let (can_out, can_in) = (viewport.can_zoom_out(), viewport.can_zoom_in());
        let mut scale = self.session.transform().scale;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(can_out, egui::Button::new("−"))
                .on_hover_text("Zoom out")
                .clicked()
            {
                self.dispatch(Event::ZoomOut);
            }
            let slider = egui::Slider::new(&mut scale, bounds.min..=bounds.max)
                .step_by(SLIDER_STEP)
                .show_value(false);
            if ui.add(slider).changed() {
                self.dispatch(Event::SetScale(scale));
            }
            ui.label(format!("{:.0}%", self.session.transform().scale * 100.0));
            if ui
                .add_enabled(can_in, egui::Button::new("+"))
                .on_hover_text("Zoom in")
                .clicked()
            {
                self.dispatch(Event::ZoomIn);
            }
            ui.separator();
            if ui.button("⟲").on_hover_text("Reset zoom").clicked() {
                self.dispatch(Event::ResetView);
            }
        });
    }

    fn marker_panel(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.strong("Markers");
            ui.label(format!("({})", self.session.markers().len()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("🗑").on_hover_text("Clear all markers").clicked() {
                    action = Some(Event::ClearMarkers);
                }
            });
        });
        ui.separator();
        egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
            for (index, marker) in self.session.markers().iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.colored_label(PIN_COLOR, "●");
                    ui.label(&marker.label);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").on_hover_text("Remove marker").clicked() {
                            action = Some(Event::RemoveMarker(index));
                        }
                    });
                });
            }
        });
        if let Some(event) = action {
            self.dispatch(event);
        }
    }

    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ctx.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or(response.interact_pointer_pos()) {
                self.dispatch(Event::PointerDown(pos));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dispatch(Event::PointerMove(pos));
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.dispatch(Event::PointerUp);
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.dispatch(Event::DoubleClick(pos)) == Effect::LabelRequested {
                    self.focus_label = true;
                }
            }
        }

        let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                // egui reports scrolling up as positive.
                self.dispatch(Event::Wheel {
                    pointer,
                    delta_y: -scroll,
                });
            }
        }
    }

    fn draw_image(&self, painter: &egui::Painter) {
        let image_box = self.surface.image_box(&self.session.transform());
        let texture = self
            .images
            .get(self.catalog.selected().id)
            .and_then(|img| img.texture.as_ref());
        match texture {
            Some(tex) => {
                painter.image(
                    tex.id(),
                    image_box,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(image_box, 0.0, egui::Color32::from_gray(60));
                painter.text(
                    image_box.center(),
                    egui::Align2::CENTER_CENTER,
                    self.catalog.selected().name,
                    egui::FontId::proportional(18.0),
                    egui::Color32::from_gray(160),
                );
            }
        }
    }

    fn draw_markers(&self, painter: &egui::Painter) {
        let transform = self.session.transform();
        for marker in self.session.markers() {
            let pin = markers::to_screen_space(
                marker,
                &transform,
                self.surface.container,
                self.surface.image_size,
            );
            // Counter-scaled: the glyph stays the same size on screen.
            let r = PIN_RADIUS * pin.counter_scale * transform.scale;
            let head = pin.anchor - egui::vec2(0.0, r * 2.5);
            painter.line_segment([head, pin.anchor], egui::Stroke::new(2.0, PIN_COLOR));
            painter.circle_filled(head, r, PIN_COLOR);
            painter.circle_filled(head, r * 0.4, egui::Color32::from_gray(30));

            let galley = painter.layout_no_wrap(
                marker.label.clone(),
                egui::FontId::proportional(12.0),
                egui::Color32::BLACK,
            );
            let text_pos = pin.anchor + egui::vec2(-galley.size().x * 0.5, 6.0);
            let bg = egui::Rect::from_min_size(text_pos, galley.size()).expand(3.0);
            painter.rect_filled(bg, 3.0, PIN_COLOR.gamma_multiply(0.9));
            painter.galley(text_pos, galley, egui::Color32::BLACK);
        }
    }

    fn controls_hint(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("controls_hint"))
            .fixed_pos(self.surface.container.min + egui::vec2(16.0, 16.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong("Controls");
                    for line in [
                        "Click and drag to pan",
                        "Mouse wheel to zoom",
                        "Use slider for precise zoom",
                        "Double-click to add marker",
                    ] {
                        ui.small(format!("• {line}"));
                    }
                });
            });
    }

    fn label_dialog(&mut self, ctx: &egui::Context) {
        let Interaction::PendingLabel { label, .. } = self.session.interaction() else {
            return;
        };
        let current = label.clone();
        let mut text = current.clone();
        let (mut confirm, mut cancel) = (false, false);

        egui::Window::new("Add Marker")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Enter a label for this location");
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text("e.g., Crater, Galaxy Core, Mountain..."),
                );
                if self.focus_label {
                    edit.request_focus();
                    self.focus_label = false;
                }
                let blank = text.trim().is_empty();
                ui.horizontal(|ui| {
                    confirm |= ui.add_enabled(!blank, egui::Button::new("Add Marker")).clicked();
                    cancel |= ui.button("Cancel").clicked();
                });
            });

        let (enter, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if text != current {
            self.dispatch(Event::LabelEdited(text));
        }
        if confirm || enter {
            self.dispatch(Event::ConfirmLabel);
        }
        if cancel || escape {
            self.dispatch(Event::CancelLabel);
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_image(ctx);

        let mut selected = None;
        if self.catalog.sidebar_open() {
            egui::SidePanel::left("catalog")
                .resizable(false)
                .exact_width(SIDEBAR_WIDTH)
                .show(ctx, |ui| selected = self.catalog_panel(ui));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| self.top_bar(ui));

        egui::TopBottomPanel::bottom("zoom_controls").show(ctx, |ui| {
            ui.vertical_centered(|ui| self.zoom_controls(ui));
        });

        if !self.session.markers().is_empty() {
            egui::SidePanel::right("markers")
                .default_width(280.0)
                .show(ctx, |ui| self.marker_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            self.surface.container = response.rect;
            painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(20));

            self.handle_canvas_input(ctx, &response);
            self.draw_image(&painter);
            self.draw_markers(&painter);

            if self.session.viewport().is_dragging() {
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Grab);
            }
        });

        self.controls_hint(ctx);
        self.label_dialog(ctx);

        if let Some(id) = selected {
            self.select(id);
        }
    }
}
