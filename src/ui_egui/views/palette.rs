use egui::Color32;

use crate::models::entry::ColorKey;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Fill colour for a block.
pub fn entry_fill(key: ColorKey) -> Color32 {
    match key {
        ColorKey::Purple => Color32::from_rgb(147, 112, 219),
        ColorKey::Orange => Color32::from_rgb(240, 150, 60),
        ColorKey::Green => Color32::from_rgb(76, 175, 110),
        ColorKey::Blue => Color32::from_rgb(66, 133, 244),
        ColorKey::Yellow => Color32::from_rgb(230, 190, 50),
        ColorKey::Red => Color32::from_rgb(220, 80, 70),
    }
}

/// Text drawn on top of [`entry_fill`].
pub fn entry_text(key: ColorKey) -> Color32 {
    match key {
        ColorKey::Yellow => Color32::from_rgb(40, 35, 10),
        _ => Color32::WHITE,
    }
}

#[derive(Clone, Copy)]
pub(crate) struct GridPalette {
    pub background: Color32,
    pub header_bg: Color32,
    pub today_bg: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub column_border: Color32,
    pub time_label: Color32,
    pub header_text: Color32,
    pub today_text: Color32,
    pub now_line: Color32,
    pub ghost_border: Color32,
}

impl GridPalette {
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        let background = visuals.extreme_bg_color;
        let accent = visuals.selection.bg_fill;
        let lines = visuals.widgets.noninteractive.bg_stroke.color;

        Self {
            background,
            header_bg: visuals.faint_bg_color,
            today_bg: blend(background, accent, if visuals.dark_mode { 0.18 } else { 0.10 }),
            hour_line: lines,
            half_hour_line: with_alpha(lines, 90),
            column_border: lines,
            time_label: visuals.weak_text_color(),
            header_text: visuals.text_color(),
            today_text: accent,
            now_line: Color32::from_rgb(255, 100, 100),
            ghost_border: visuals.strong_text_color(),
        }
    }
}
