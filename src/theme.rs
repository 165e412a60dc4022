use ratatui::style::Color;

// Centralized theme colors. Brand colors are written as RGB and downgraded
// to the xterm-256 cube when the terminal does not advertise truecolor.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const SNAP_PREVIEW_RGB: (u8, u8, u8) = (70, 130, 180);
pub const GAIN_RGB: (u8, u8, u8) = (80, 200, 120);
pub const LOSS_RGB: (u8, u8, u8) = (230, 80, 80);

fn truecolor() -> bool {
    std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_ascii_lowercase();
            v.contains("truecolor") || v.contains("24bit")
        })
        .unwrap_or(false)
}

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    if truecolor() {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else {
        Color::Indexed(cube_index(rgb))
    }
}

/// Nearest entry of the 6x6x6 xterm color cube (indices 16..=231).
fn cube_index((r, g, b): (u8, u8, u8)) -> u8 {
    let level = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

// Menu bar
pub fn panel_bg() -> Color {
    Color::DarkGray
}
pub fn panel_fg() -> Color {
    Color::Black
}
pub fn panel_active_bg() -> Color {
    Color::Gray
}
pub fn panel_active_fg() -> Color {
    Color::Black
}

// Dropdown menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Dock of minimized windows
pub fn dock_bg() -> Color {
    Color::Black
}
pub fn dock_fg() -> Color {
    Color::Gray
}
pub fn dock_item_bg() -> Color {
    Color::DarkGray
}

// Notifications
pub fn notice_info_fg() -> Color {
    Color::White
}
pub fn notice_error_fg() -> Color {
    Color::LightRed
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}

pub fn snap_preview() -> Color {
    rgb_to_color(SNAP_PREVIEW_RGB)
}

// Quote direction
pub fn gain() -> Color {
    rgb_to_color(GAIN_RGB)
}
pub fn loss() -> Color {
    rgb_to_color(LOSS_RGB)
}
