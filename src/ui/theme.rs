use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use site_schedule::model::TaskStatus;

// Surfaces
pub const BG_DARK: Color32 = Color32::from_rgb(27, 29, 33);
pub const BG_PANEL: Color32 = Color32::from_rgb(34, 36, 41);
pub const BG_HEADER: Color32 = Color32::from_rgb(40, 43, 49);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(6, 6, 6, 6);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(70, 110, 60, 60);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(56, 59, 66);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(255, 196, 0);

// Text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 228, 232);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 164, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(108, 112, 122);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(250, 250, 250);

// Chart marks. Safety-yellow accent, red for today and critical work.
pub const ACCENT: Color32 = Color32::from_rgb(214, 150, 0);
pub const TODAY_LINE: Color32 = Color32::from_rgb(229, 72, 60);
pub const GRID_LINE: Color32 = Color32::from_rgb(48, 51, 58);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(245, 245, 245);
pub const LINK_COLOR: Color32 = Color32::from_rgb(138, 142, 152);
pub const CRITICAL_OUTLINE: Color32 = Color32::from_rgb(229, 72, 60);
pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 70);

// Chart geometry
pub const ROW_HEIGHT: f32 = 28.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const BAR_ROUNDING: f32 = 3.0;
pub const BAR_INSET: f32 = 5.0;
pub const PROGRESS_HANDLE: f32 = 8.0;

pub fn font_header() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.0)
}

/// Bar and label color for an activity's status.
pub fn status_color(status: TaskStatus) -> Color32 {
    match status {
        TaskStatus::NotStarted => Color32::from_rgb(120, 132, 146),
        TaskStatus::OnTrack => Color32::from_rgb(60, 130, 200),
        TaskStatus::Delayed => Color32::from_rgb(224, 128, 32),
        TaskStatus::Completed => Color32::from_rgb(76, 160, 90),
    }
}

/// Dark visuals with the site accent on focus and selection.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    let corner = Rounding::same(3.0);
    let accent_stroke = Stroke::new(1.0, ACCENT);

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.faint_bg_color = BG_HEADER;
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = corner;
    }
    visuals.widgets.inactive.bg_fill = BG_HEADER;
    visuals.widgets.inactive.weak_bg_fill = BG_HEADER;
    visuals.widgets.hovered.bg_stroke = accent_stroke;
    visuals.widgets.active.bg_stroke = accent_stroke;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = accent_stroke;
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);
    });
}
