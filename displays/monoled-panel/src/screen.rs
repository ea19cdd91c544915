//! Screen layouts
//!
//! A [`Screen`] is a short list of positioned text lines plus a
//! [`ScreenKind`] that decides throttling and lock wait. Rendering always
//! starts from a cleared framebuffer.

use heapless::Vec;
use monoled_core::{Canvas, Color, TextExt, TextOutcome, WrapMode};

/// Most lines a screen can hold
pub const MAX_LINES: usize = 4;

/// How a screen is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenKind {
    /// Periodic status; skipped flush when refreshed too often
    Status,
    /// One-off state change; always flushed, short lock wait
    Notice,
    /// User-visible content; always flushed, longer lock wait
    Content,
}

impl ScreenKind {
    /// Check if the refresh governor applies
    pub fn is_throttled(self) -> bool {
        matches!(self, ScreenKind::Status)
    }
}

/// One positioned text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub x: u16,
    pub y: u16,
    pub wrap: WrapMode,
}

/// Text layout for one full frame
#[derive(Debug, Clone)]
pub struct Screen<'a> {
    kind: ScreenKind,
    lines: Vec<Line<'a>, MAX_LINES>,
}

impl<'a> Screen<'a> {
    /// Create an empty screen
    pub fn new(kind: ScreenKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    /// Add a line, handing it back if the screen is full
    pub fn push(&mut self, line: Line<'a>) -> Result<(), Line<'a>> {
        self.lines.push(line)
    }

    /// Builder form of [`push`](Self::push) for the fixed layouts below
    ///
    /// Layouts never exceed [`MAX_LINES`].
    fn with(mut self, text: &'a str, y: u16, wrap: WrapMode) -> Self {
        let pushed = self.push(Line {
            text,
            x: 0,
            y,
            wrap,
        });
        debug_assert!(pushed.is_ok(), "screen layout exceeds {} lines", MAX_LINES);
        self
    }

    /// Three status lines at rows 0, 16 and 32, truncated
    pub fn status(line1: &'a str, line2: &'a str, line3: &'a str) -> Self {
        Self::new(ScreenKind::Status)
            .with(line1, 0, WrapMode::Truncate)
            .with(line2, 16, WrapMode::Truncate)
            .with(line3, 32, WrapMode::Truncate)
    }

    /// Blank status screen
    pub fn blank() -> Self {
        Self::status("", "", "")
    }

    /// Network join in progress
    pub fn connecting() -> Self {
        Self::new(ScreenKind::Notice)
            .with("ESP32 WiFi Demo", 0, WrapMode::Truncate)
            .with("Connecting...", 16, WrapMode::Truncate)
    }

    /// Network up, server running, optional URL wrapped below
    pub fn connected(url: Option<&'a str>) -> Self {
        let screen = Self::new(ScreenKind::Notice)
            .with("WiFi Connected!", 0, WrapMode::Truncate)
            .with("Server Running", 16, WrapMode::Truncate);
        match url {
            Some(url) => screen.with(url, 32, WrapMode::Wrap),
            None => screen,
        }
    }

    /// Network up with the assigned address, `N/A` when unknown
    pub fn connected_with_ip(ip: Option<&'a str>) -> Self {
        Self::new(ScreenKind::Notice)
            .with("WiFi Connected!", 0, WrapMode::Truncate)
            .with("Server: Port 443", 12, WrapMode::Truncate)
            .with("IP Address:", 24, WrapMode::Truncate)
            .with(ip.unwrap_or("N/A"), 36, WrapMode::Truncate)
    }

    /// Error title with the message wrapped below
    pub fn error(message: &'a str) -> Self {
        Self::new(ScreenKind::Notice)
            .with("ERROR", 0, WrapMode::Truncate)
            .with(message, 16, WrapMode::Wrap)
    }

    /// Fetched joke
    pub fn joke(text: &'a str) -> Self {
        Self::new(ScreenKind::Content)
            .with("Joke:", 0, WrapMode::Truncate)
            .with(text, 10, WrapMode::Wrap)
    }

    /// Message submitted through the web front end
    pub fn custom_text(text: &'a str) -> Self {
        Self::new(ScreenKind::Content)
            .with("Web Message:", 0, WrapMode::Truncate)
            .with(text, 12, WrapMode::Wrap)
    }

    /// Scheduling class
    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    /// Lines in draw order
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Draw every line onto `canvas`, lit pixels only
    ///
    /// Does not clear first; [`SharedDisplay`](crate::SharedDisplay) clears
    /// before drawing.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> TextOutcome {
        self.lines.iter().fold(TextOutcome::default(), |outcome, line| {
            outcome.merge(canvas.draw_text(line.text, line.x, line.y, Color::On, line.wrap))
        })
    }
}
