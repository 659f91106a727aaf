use std::fs;
use std::path::Path;

use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::error::{Error, Result};
use crate::note::{self, ActiveNote};
use crate::staff::StaffLayout;

pub const BACKGROUND: Color32 = Color32::from_rgb(40, 40, 40);
const BUTTON_FILL: Color32 = Color32::from_rgb(200, 200, 200);
const BUTTON_PRESSED: Color32 = Color32::from_rgb(150, 150, 150);
const INK: Color32 = Color32::WHITE;
const WARNING: Color32 = Color32::from_rgb(230, 126, 34);

const BUTTON_WIDTH: f32 = 120.0;
const BUTTON_HEIGHT: f32 = 40.0;
const DEVICE_BUTTON_WIDTH: f32 = 400.0;
const MARGIN: f32 = 20.0;
const LIST_TOP: f32 = 60.0;
const DEVICE_BUTTON_STRIDE: f32 = 50.0;
const HISTORY_LINE_HEIGHT: f32 = 20.0;
const TEXT_SIZE: f32 = 18.0;
const CUSTOM_FONT: &str = "custom";

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
}

impl Button {
    pub fn new(x: f32, y: f32, width: f32, height: f32, label: impl Into<String>) -> Self {
        Self {
            rect: Rect::from_min_size(egui::pos2(x, y), egui::vec2(width, height)),
            label: label.into(),
        }
    }

    /// Half-open on the right and bottom edges.
    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= self.rect.min.x
            && pos.x < self.rect.max.x
            && pos.y >= self.rect.min.y
            && pos.y < self.rect.max.y
    }

    pub fn draw(&self, painter: &Painter, pressed: bool) {
        let fill = if pressed { BUTTON_PRESSED } else { BUTTON_FILL };
        painter.rect_filled(self.rect, 0.0, fill);
        painter.text(
            self.rect.center(),
            Align2::CENTER_CENTER,
            &self.label,
            FontId::proportional(TEXT_SIZE),
            Color32::BLACK,
        );
    }
}

pub fn close_button(window_width: f32) -> Button {
    Button::new(
        window_width - BUTTON_WIDTH - MARGIN,
        MARGIN,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
        "Close",
    )
}

pub fn device_buttons<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Button> {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            Button::new(
                MARGIN,
                LIST_TOP + i as f32 * DEVICE_BUTTON_STRIDE,
                DEVICE_BUTTON_WIDTH,
                BUTTON_HEIGHT,
                name,
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    Select(usize),
}

/// Close wins over everything; device buttons only react while nothing is
/// being listened to.
pub fn route_click(
    pos: Pos2,
    close: &Button,
    devices: &[Button],
    listening: bool,
) -> Option<Action> {
    if close.contains(pos) {
        return Some(Action::Close);
    }
    if listening {
        return None;
    }
    devices.iter().position(|b| b.contains(pos)).map(Action::Select)
}

pub fn draw_device_name(painter: &Painter, name: &str) {
    text(painter, egui::pos2(MARGIN, 30.0), name, INK);
}

pub fn draw_history(painter: &Painter, history: &[String]) {
    for (i, name) in history.iter().enumerate() {
        let y = LIST_TOP + i as f32 * HISTORY_LINE_HEIGHT;
        text(painter, egui::pos2(MARGIN, y), name, INK);
    }
}

pub fn draw_status(painter: &Painter, window_height: f32, status: &str) {
    text(painter, egui::pos2(MARGIN, window_height - MARGIN), status, WARNING);
}

fn text(painter: &Painter, baseline: Pos2, text: &str, color: Color32) {
    painter.text(
        baseline,
        Align2::LEFT_BOTTOM,
        text,
        FontId::proportional(TEXT_SIZE),
        color,
    );
}

pub fn draw_staff(painter: &Painter, layout: &StaffLayout, active: Option<ActiveNote>) {
    let stroke = Stroke::new(1.0, INK);

    for y in layout.line_ys() {
        painter.line_segment([egui::pos2(layout.left, y), egui::pos2(layout.right(), y)], stroke);
    }

    let clef_x = layout.clef_x();
    let (clef_top, clef_bottom) = layout.clef_span();
    painter.line_segment(
        [egui::pos2(clef_x, clef_top), egui::pos2(clef_x, clef_bottom)],
        stroke,
    );

    let Some(active) = active else {
        return;
    };
    let position = note::staff_position(active.midi);
    let center = egui::pos2(layout.note_x(), layout.y_for(position));
    painter.circle_filled(center, layout.note_radius(), INK);

    let (ledger_left, ledger_right) = layout.ledger_span();
    for y in layout.ledger_ys(position) {
        painter.line_segment([egui::pos2(ledger_left, y), egui::pos2(ledger_right, y)], stroke);
    }
}

pub fn load_font(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Font {
        path: path.to_path_buf(),
        source,
    })
}

/// Makes `bytes` the first choice for proportional text.
pub fn install_font(ctx: &egui::Context, bytes: Vec<u8>) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(CUSTOM_FONT.to_owned(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, CUSTOM_FONT.to_owned());
    ctx.set_fonts(fonts);
}
