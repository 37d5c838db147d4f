//! Main application state and eframe integration.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use egui::{CentralPanel, Context, Key, Modifiers, Rect, TopBottomPanel, Vec2};
use overlay_core::replay::feed_cuts;
use overlay_core::{
    load_script, Color, CutDirection, CutQuality, CutVisualizer, EditorEvent, EditorSession,
    NoteCutEvent, ReplayScript,
};

use crate::canvas::{self, OverlayElement};
use crate::theme;
use crate::transform::{screen_to_canvas, to_viewport};

/// Interval between synthetic cuts in demo mode.
const DEMO_INTERVAL: Duration = Duration::from_millis(180);

const DEMO_LEFT: Color = Color::rgb(200, 30, 30);
const DEMO_RIGHT: Color = Color::rgb(30, 90, 200);

/// A replay file being played back.
struct Playback {
    script: ReplayScript,
    started_at: Instant,
    next_cut: usize,
}

/// Main application state.
pub struct ViewerApp {
    /// Canvas, viewport, resize and edit state
    session: EditorSession,
    /// Cut visualizer fed by a replay or the demo stream
    visualizer: CutVisualizer,
    /// Elements placed on the canvas
    elements: Vec<OverlayElement>,
    /// Index of the element being edited
    editing: Option<usize>,

    playback: Option<Playback>,
    /// Demo stream state: enabled flag, last emit time, counter
    demo: bool,
    demo_last: Option<Instant>,
    demo_counter: usize,

    /// True while a pinch/ctrl-scroll zoom is in progress
    pinching: bool,
    /// Viewport area from last frame
    last_area: Option<Rect>,

    /// Status message
    status_message: String,
    /// Error message to display
    error_message: Option<String>,
    /// Show about dialog
    show_about_dialog: bool,
}

impl ViewerApp {
    /// Create a new viewer application.
    pub fn new(_cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        let visualizer = CutVisualizer::default();
        let elements = canvas::demo_layout(&visualizer);
        let mut app = Self {
            session: EditorSession::default(),
            visualizer,
            elements,
            editing: None,
            playback: None,
            demo: false,
            demo_last: None,
            demo_counter: 0,
            pinching: false,
            last_area: None,
            status_message: "Drag to pan, Ctrl+scroll to zoom, drag the corner to resize"
                .to_string(),
            error_message: None,
            show_about_dialog: false,
        };

        if let Some(path) = initial_file {
            app.load_replay(path);
        }

        app
    }

    /// Load a replay file and start playing its cuts.
    fn load_replay(&mut self, path: PathBuf) {
        match load_script(&path) {
            Ok(script) => {
                self.visualizer = CutVisualizer::new(script.visualizer.clone());
                self.resize_visualizer_element();
                self.status_message = format!(
                    "Playing: {} | {} cut(s)",
                    path.file_name()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    script.cuts.len()
                );
                tracing::info!("Loaded replay {} with {} cuts", path.display(), script.cuts.len());
                self.playback = Some(Playback {
                    script,
                    started_at: Instant::now(),
                    next_cut: 0,
                });
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load replay: {}", e));
                tracing::error!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    /// Open file dialog and load selected replay.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Replay", &["json"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_replay(path);
        }
    }

    fn resize_visualizer_element(&mut self) {
        let (width, height) = self.visualizer.extent();
        for element in &mut self.elements {
            if element.kind == canvas::ElementKind::CutVisualizer {
                element.width = width;
                element.height = height;
            }
        }
    }

    /// Feed due replay cuts and demo cuts into the visualizer.
    fn pump_cuts(&mut self, now: Instant) {
        let mut finished = false;
        if let Some(playback) = &mut self.playback {
            let elapsed = now.saturating_duration_since(playback.started_at);
            let due = playback.script.cuts[playback.next_cut..]
                .iter()
                .take_while(|cut| Duration::from_millis(cut.at_ms) <= elapsed)
                .count();
            let batch = &playback.script.cuts[playback.next_cut..playback.next_cut + due];
            let stats = feed_cuts(&mut self.visualizer, batch, playback.started_at);
            if stats.rejected > 0 {
                tracing::warn!("{} replay cut(s) outside the grid", stats.rejected);
            }
            playback.next_cut += due;
            finished = playback.next_cut == playback.script.cuts.len();
        }
        if finished {
            self.status_message = "Replay finished".to_string();
            self.playback = None;
        }

        if self.demo {
            let due = self
                .demo_last
                .map_or(true, |last| now.saturating_duration_since(last) >= DEMO_INTERVAL);
            if due {
                let event = self.demo_cut();
                if let Err(e) = self.visualizer.apply(event, now) {
                    tracing::warn!("Demo cut rejected: {}", e);
                }
                self.demo_last = Some(now);
            }
        }
    }

    /// Next synthetic cut, walking the grid in a fixed pattern.
    fn demo_cut(&mut self) -> NoteCutEvent {
        const DIRECTIONS: [CutDirection; 5] = [
            CutDirection::Down,
            CutDirection::UpLeft,
            CutDirection::Right,
            CutDirection::Any,
            CutDirection::Up,
        ];
        let n = self.demo_counter;
        self.demo_counter += 1;

        let cells = self.visualizer.rows() * self.visualizer.columns();
        let cell = (n * 7) % cells.max(1);
        let column = cell % self.visualizer.columns().max(1);
        NoteCutEvent {
            row: cell / self.visualizer.columns().max(1),
            column,
            quality: match n % 11 {
                3 => CutQuality::Bad,
                8 => CutQuality::Miss,
                _ => CutQuality::Good,
            },
            color: if column < self.visualizer.columns() / 2 {
                DEMO_LEFT
            } else {
                DEMO_RIGHT
            },
            timestamp: n as u64 * DEMO_INTERVAL.as_millis() as u64,
            direction: DIRECTIONS[n % DIRECTIONS.len()],
        }
    }

    fn dispatch(&mut self, event: EditorEvent) {
        if !self.session.dispatch(event) {
            tracing::debug!("Ignored {:?}", event);
        }
    }

    fn toggle_fullscreen(&mut self, ctx: &Context) {
        self.dispatch(EditorEvent::ToggleFullscreen);
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(
            self.session.is_fullscreen(),
        ));
    }

    /// Open the editor for an element and re-frame the viewport around it.
    fn start_editing(&mut self, index: usize) {
        let (Some(area), Some(element)) = (self.last_area, self.elements.get(index)) else {
            return;
        };
        let bounds = canvas::edit_bounds(self.session.transform(), area, element);
        let status_message = format!("Editing {}", element.name);

        self.editing = Some(index);
        self.dispatch(EditorEvent::EditStart(bounds));
        self.status_message = status_message;
    }

    fn stop_editing(&mut self) {
        if self.editing.take().is_some() {
            self.dispatch(EditorEvent::EditEnd);
            self.status_message = "Editing closed".to_string();
        }
    }

    /// Render the menu bar.
    fn render_menu(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open replay... (Ctrl+O)").clicked() {
                        self.open_file_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit (Ctrl+Q)").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Center canvas (C)").clicked() {
                        self.dispatch(EditorEvent::CenterView);
                        ui.close_menu();
                    }
                    if ui.button("Fullscreen (F11)").clicked() {
                        self.toggle_fullscreen(ctx);
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.checkbox(&mut self.demo, "Demo cut stream");
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about_dialog = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Render the edit drawer.
    fn render_edit_panel(&mut self, ctx: &Context) {
        let (Some(index), Some(area)) = (self.editing, self.last_area) else {
            return;
        };
        let mut close = false;

        // Overlays the canvas area so the viewport keeps its size while editing
        let drawer = canvas::drawer_rect(area);
        egui::Area::new(egui::Id::new("edit_drawer"))
            .fixed_pos(drawer.min)
            .show(ctx, |ui| {
                egui::Frame::side_top_panel(ui.style())
                    .inner_margin(theme::DRAWER_PADDING)
                    .show(ui, |ui| {
                        ui.set_width(drawer.width() - 2.0 * theme::DRAWER_PADDING);
                        ui.set_min_height(drawer.height() - 2.0 * theme::DRAWER_PADDING);

                        let Some(element) = self.elements.get_mut(index) else {
                            close = true;
                            return;
                        };
                        ui.heading(&element.name);
                        ui.separator();

                        egui::Grid::new("element_grid")
                            .num_columns(2)
                            .spacing([20.0, 4.0])
                            .show(ui, |ui| {
                                ui.label("X");
                                ui.add(egui::DragValue::new(&mut element.x).speed(1.0));
                                ui.end_row();
                                ui.label("Y");
                                ui.add(egui::DragValue::new(&mut element.y).speed(1.0));
                                ui.end_row();
                                ui.label("Width");
                                ui.label(format!("{:.0}", element.width));
                                ui.end_row();
                                ui.label("Height");
                                ui.label(format!("{:.0}", element.height));
                                ui.end_row();
                            });

                        ui.separator();
                        if ui.button("Done (Esc)").clicked() {
                            close = true;
                        }
                    });
            });

        if close {
            self.stop_editing();
        }
    }

    /// Render the status bar.
    fn render_status_bar(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(self.session.transform().zoom_percent())
                            .color(theme::DIM_TEXT),
                    );
                    if self.session.is_resizing() {
                        ui.separator();
                        ui.label("Resizing");
                    }
                });
            });
        });
    }

    /// Floating zoom and fullscreen controls.
    fn render_controls(&mut self, ctx: &Context) {
        egui::Area::new(egui::Id::new("canvas_controls"))
            .anchor(egui::Align2::RIGHT_BOTTOM, Vec2::new(-16.0, -40.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("➕").on_hover_text("Zoom in (+)").clicked() {
                        self.dispatch(EditorEvent::ZoomIn);
                    }
                    if ui.button("➖").on_hover_text("Zoom out (-)").clicked() {
                        self.dispatch(EditorEvent::ZoomOut);
                    }
                    let label = if self.session.is_fullscreen() { "🗗" } else { "⛶" };
                    if ui.button(label).on_hover_text("Fullscreen (F11)").clicked() {
                        self.toggle_fullscreen(ctx);
                    }
                });
            });
    }

    /// Render the main canvas and route pointer gestures.
    fn render_canvas(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::CANVAS_BG))
            .show(ctx, |ui| {
                self.handle_keyboard(ctx);

                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let area = response.rect;

                // Layout measurement: first one fits the canvas, later ones only resize.
                if self.last_area.map(|r| r.size()) != Some(area.size()) {
                    let (width, height) = (area.width() as f64, area.height() as f64);
                    if !self.dispatch_mount(width, height) {
                        self.dispatch(EditorEvent::ViewportResized { width, height });
                    }
                }
                self.last_area = Some(area);

                let transform = *self.session.transform();
                let handle_rect = canvas::render_canvas(
                    &painter,
                    area,
                    self.session.canvas(),
                    &transform,
                    self.session.is_resizing(),
                );

                // Resize handle takes precedence over panning.
                let handle = ui.interact(
                    handle_rect,
                    ui.id().with("resize_handle"),
                    egui::Sense::drag(),
                );
                if handle.drag_started() {
                    self.dispatch(EditorEvent::ResizeStart);
                }
                if handle.dragged() {
                    if let Some(pointer) = handle.interact_pointer_pos() {
                        let (width, height) = screen_to_canvas(&transform, area, pointer);
                        self.dispatch(EditorEvent::Resize { width, height });
                    }
                }
                if handle.drag_stopped() {
                    self.dispatch(EditorEvent::ResizeStop);
                }

                if response.dragged() {
                    let delta = response.drag_delta();
                    self.dispatch(EditorEvent::Pan {
                        dx: delta.x as f64,
                        dy: delta.y as f64,
                    });
                }
                if response.drag_stopped() {
                    self.dispatch(EditorEvent::Settle);
                }

                let zoom_delta = ctx.input(|i| i.zoom_delta());
                if zoom_delta != 1.0 {
                    if let Some(hover) = response.hover_pos() {
                        let (focus_x, focus_y) = to_viewport(area, hover);
                        self.pinching = true;
                        self.dispatch(EditorEvent::Pinch {
                            factor: zoom_delta as f64,
                            focus_x,
                            focus_y,
                        });
                    }
                } else if self.pinching {
                    self.pinching = false;
                    self.dispatch(EditorEvent::Settle);
                }

                if response.clicked() {
                    let hit = response.interact_pointer_pos().and_then(|pos| {
                        let (x, y) = screen_to_canvas(self.session.transform(), area, pos);
                        self.elements.iter().rposition(|e| e.contains(x, y))
                    });
                    match hit {
                        Some(index) if self.editing != Some(index) => self.start_editing(index),
                        Some(_) => {}
                        None => self.stop_editing(),
                    }
                }

                canvas::render_elements(
                    &painter,
                    area,
                    self.session.transform(),
                    &self.elements,
                    &self.visualizer,
                    self.editing,
                    Instant::now(),
                );
            });
    }

    /// Mount the viewport. Returns false once the initial fit has happened.
    fn dispatch_mount(&mut self, width: f64, height: f64) -> bool {
        self.session.dispatch(EditorEvent::Mount { width, height })
    }

    /// Handle keyboard shortcuts.
    fn handle_keyboard(&mut self, ctx: &Context) {
        let mut events = Vec::new();
        let mut open = false;
        let mut fullscreen = false;
        let mut escape = false;
        let mut quit = false;

        ctx.input(|i| {
            if i.modifiers.ctrl && i.key_pressed(Key::O) {
                open = true;
            }
            if i.modifiers.ctrl && i.key_pressed(Key::Q) {
                quit = true;
            }
            if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                events.push(EditorEvent::ZoomIn);
            }
            if i.key_pressed(Key::Minus) {
                events.push(EditorEvent::ZoomOut);
            }
            if i.key_pressed(Key::C) && i.modifiers == Modifiers::NONE {
                events.push(EditorEvent::CenterView);
            }
            if i.key_pressed(Key::F11) {
                fullscreen = true;
            }
            if i.key_pressed(Key::Escape) {
                escape = true;
            }
        });

        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        for event in events {
            self.dispatch(event);
        }
        if open {
            self.open_file_dialog();
        }
        if fullscreen {
            self.toggle_fullscreen(ctx);
        }
        if escape {
            self.stop_editing();
            self.show_about_dialog = false;
        }
    }

    /// Show error dialog if there's an error.
    fn show_error_dialog(&mut self, ctx: &Context) {
        if let Some(error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(&error);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }
    }

    /// Show about dialog.
    fn show_about(&mut self, ctx: &Context) {
        if !self.show_about_dialog {
            return;
        }

        egui::Window::new("About Overlay Viewer")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.heading("Overlay Viewer");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.label("Preview stream overlay layouts and the cut visualizer.");
                ui.separator();
                if ui.button("Close").clicked() {
                    self.show_about_dialog = false;
                }
            });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.pump_cuts(now);

        self.render_menu(ctx);
        self.render_edit_panel(ctx);
        self.render_status_bar(ctx);
        self.render_canvas(ctx);
        self.render_controls(ctx);
        self.show_error_dialog(ctx);
        self.show_about(ctx);

        // Fades and playback need frames even without input
        if self.visualizer.is_animating(now) || self.playback.is_some() || self.demo {
            ctx.request_repaint();
        } else if ctx.input(|i| {
            i.pointer.is_moving() || i.pointer.any_down() || i.raw_scroll_delta != Vec2::ZERO
        }) {
            ctx.request_repaint();
        }
    }
}
