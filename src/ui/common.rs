use eframe::egui::{Color32, Frame, Stroke};

/// Dark theme palette shared by all UI sections.
pub struct UiColors;

impl UiColors {
    /// Window background
    pub const MAIN_BG: Color32 = Color32::from_rgb(46, 46, 46);

    /// Section frame background
    pub const SECTION_BG: Color32 = Color32::from_rgb(62, 62, 62);

    /// Text entry / log background
    pub const ENTRY_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Log and entry text - terminal green
    pub const LOG_FG: Color32 = Color32::from_rgb(0, 255, 0);

    /// Section headings and the status label
    pub const ACCENT: Color32 = Color32::from_rgb(0, 255, 204);

    /// Plain label text
    pub const TEXT: Color32 = Color32::WHITE;

    /// Connect button fill
    pub const CONNECT: Color32 = Color32::from_rgb(76, 175, 80);

    /// Disconnect button fill
    pub const DISCONNECT: Color32 = Color32::from_rgb(244, 67, 54);

    /// Border color for section frames
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);
}

/// Standard frame for one of the three UI sections.
pub fn section_frame() -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, UiColors::BORDER))
        .fill(UiColors::SECTION_BG)
        .inner_margin(8)
        .outer_margin(4)
}
