//! wcschat desktop — egui app state and UI.

use crate::window::{self, Widget};
use eframe::egui;
use std::sync::Arc;
use wcschat::chat::{self, ChatController, RenderSurface};
use wcschat::config::Config;
use wcschat::layout::{Grid, Rect, Size};

/// Natural size of the history area before it is given the spare space.
const HISTORY_MIN_SIZE: Size = Size::new(120.0, 60.0);
const HISTORY_MARGIN: f32 = 4.0;

/// History text and input state as last set by the controller.
#[derive(Default)]
pub struct EguiSurface {
    history: String,
    input_enabled: bool,
    /// Set when the input unlocks; consumed by the next frame to focus the box.
    focus_input: bool,
}

impl RenderSurface for EguiSurface {
    fn set_text(&mut self, text: &str) {
        self.history.clear();
        self.history.push_str(text);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.input_enabled {
            self.focus_input = true;
        }
        self.input_enabled = enabled;
    }
}

pub struct ChatApp {
    /// None when the chat worker could not be started; the error is shown instead.
    controller: Option<ChatController<EguiSurface>>,
    startup_error: Option<String>,
    /// Materialized once at construction; solved into rects every frame.
    grid: Grid<Widget>,
    /// Current text in the input box.
    input: String,
    /// Whether the first frame (window open) has been handled.
    opened: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        apply_theme(&cc.egui_ctx, config.window.theme.as_deref());
        let (controller, startup_error) = match start(&config, &cc.egui_ctx) {
            Ok(c) => (Some(c), None),
            Err(e) => {
                log::error!("chat worker failed to start: {:#}", e);
                (None, Some(format!("ERROR:{:#}", e)))
            }
        };
        Self {
            controller,
            startup_error,
            grid: window::build_layout().materialize(),
            input: String::new(),
            opened: false,
        }
    }

    fn paint(&mut self, ui: &mut egui::Ui, widget: Widget, rect: egui::Rect) {
        match widget {
            Widget::HistoryLabel | Widget::InputLabel => {
                let text = if widget == Widget::HistoryLabel {
                    window::HISTORY_LABEL
                } else {
                    window::INPUT_LABEL
                };
                let mut child = ui.child_ui(rect, egui::Layout::left_to_right(egui::Align::Center));
                child.label(text);
            }
            Widget::ClearButton => {
                let mut child = ui.child_ui(rect, egui::Layout::left_to_right(egui::Align::Center));
                let clicked = child
                    .add_sized(rect.size(), egui::Button::new(window::CLEAR_BUTTON))
                    .clicked();
                if clicked {
                    if let Some(c) = self.controller.as_mut() {
                        c.on_clear();
                    }
                }
            }
            Widget::History => {
                let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::Min));
                let stroke = child.visuals().widgets.noninteractive.fg_stroke.color;
                let history = match (&self.controller, &self.startup_error) {
                    (Some(c), _) => c.surface().history.as_str(),
                    (None, Some(err)) => err.as_str(),
                    (None, None) => "",
                };
                egui::Frame::none()
                    .stroke(egui::Stroke::new(1.0, stroke))
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::same(HISTORY_MARGIN))
                    .show(&mut child, |ui| {
                        egui::ScrollArea::vertical()
                            .stick_to_bottom(true)
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                let mut text = history;
                                ui.add(
                                    egui::TextEdit::multiline(&mut text)
                                        .desired_width(f32::INFINITY)
                                        .frame(false),
                                );
                            });
                    });
            }
            Widget::Input => {
                let mut child = ui.child_ui(rect, egui::Layout::left_to_right(egui::Align::Center));
                let enabled = self
                    .controller
                    .as_ref()
                    .map(|c| c.surface().input_enabled)
                    .unwrap_or(false);
                let response = child.add_enabled(
                    enabled,
                    egui::TextEdit::singleline(&mut self.input)
                        .id(egui::Id::new("chat_input"))
                        .font(egui::FontId::proportional(window::INPUT_FONT_SIZE))
                        .desired_width(rect.width()),
                );
                let Some(controller) = self.controller.as_mut() else {
                    return;
                };
                if enabled && controller.surface().focus_input {
                    response.request_focus();
                    controller.surface_mut().focus_input = false;
                }
                let submitted =
                    response.lost_focus() && child.input(|i| i.key_pressed(egui::Key::Enter));
                if submitted && controller.on_user_submit(&self.input) {
                    self.input.clear();
                }
            }
        }
    }
}

fn start(config: &Config, ctx: &egui::Context) -> anyhow::Result<ChatController<EguiSurface>> {
    let ctx = ctx.clone();
    let notify: chat::Notifier = Arc::new(move || ctx.request_repaint());
    chat::start_controller(config, EguiSurface::default(), notify)
}

/// Pick light/dark visuals from config. Anything unrecognised keeps the default look.
fn apply_theme(ctx: &egui::Context, theme: Option<&str>) {
    match theme.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("system") => {}
        Some("dark") => ctx.set_visuals(egui::Visuals::dark()),
        Some("light") => ctx.set_visuals(egui::Visuals::light()),
        Some(other) => log::warn!("unsupported theme {:?}, using default presentation", other),
    }
}

/// Natural size of each widget in the current style.
fn natural_size(ui: &egui::Ui, widget: Widget) -> Size {
    let body = egui::TextStyle::Body.resolve(ui.style());
    let color = ui.visuals().text_color();
    let text_size = |text: &str| {
        let size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), body.clone(), color).size());
        Size::new(size.x, size.y)
    };
    let spacing = ui.spacing();
    match widget {
        Widget::HistoryLabel => text_size(window::HISTORY_LABEL),
        Widget::InputLabel => text_size(window::INPUT_LABEL),
        Widget::ClearButton => {
            let text = text_size(window::CLEAR_BUTTON);
            Size::new(
                (text.width + 2.0 * spacing.button_padding.x).max(spacing.interact_size.x),
                (text.height + 2.0 * spacing.button_padding.y).max(spacing.interact_size.y),
            )
        }
        Widget::History => HISTORY_MIN_SIZE,
        Widget::Input => {
            let font = egui::FontId::proportional(window::INPUT_FONT_SIZE);
            let row = ui.fonts(|f| f.row_height(&font));
            Size::new(spacing.text_edit_width, row + 2.0 * spacing.button_padding.y + 4.0)
        }
    }
}

fn to_layout_rect(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(rect.x, rect.y), egui::vec2(rect.width, rect.height))
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(controller) = self.controller.as_mut() {
            if !self.opened {
                self.opened = true;
                controller.on_window_ready();
            }
            controller.pump();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill))
            .show(ctx, |ui| {
                let bounds = to_layout_rect(ui.max_rect());
                let placements = self
                    .grid
                    .arrange(bounds, &mut |w: &Widget| natural_size(ui, *w));
                for placement in placements {
                    self.paint(ui, placement.widget, to_egui_rect(placement.rect));
                }
            });
    }
}
