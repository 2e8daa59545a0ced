use ratatui::style::Color;

pub const ACTIVE: Color = Color::from_u32(0x0063c76a);
pub const PAUSED: Color = Color::from_u32(0x00f7d44b);
pub const DISABLED: Color = Color::from_u32(0x00404040);
pub const BACKGROUND: Color = Color::from_u32(0x000d0d0d);
pub const ACCENT: Color = Color::from_u32(0x00feca88);
