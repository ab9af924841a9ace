//! Styled output lines.
//!
//! Renderers build lines out of styled segments and decide only at the end
//! whether to emit ANSI escapes. All widths are display widths.

use nu_ansi_term::{Color, Style};
use unicode_width::UnicodeWidthChar;

/// Styles the table renderer uses for emphasis.
pub mod styles {
    use super::*;

    pub fn border() -> Style {
        Color::Green.normal()
    }

    pub fn header() -> Style {
        Style::new().bold()
    }

    pub fn primary_key() -> Style {
        Color::Cyan.normal()
    }

    pub fn inserted() -> Style {
        Color::Green.normal()
    }

    pub fn updated() -> Style {
        Color::Blue.normal()
    }

    pub fn deleted() -> Style {
        Color::Red.normal()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    style: Style,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledLine {
    segments: Vec<Segment>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut line = Self::new();
        line.push(text, style);
        line
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.segments.push(Segment { text, style }),
        }
    }

    pub fn push_plain(&mut self, text: impl Into<String>) {
        self.push(text, Style::default());
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| text_width(&s.text)).sum()
    }

    /// Cut the line down to at most `max_width` columns.
    pub fn truncate(&mut self, max_width: usize) {
        let mut used = 0;
        let mut keep = 0;
        for segment in self.segments.iter_mut() {
            let w = text_width(&segment.text);
            if used + w <= max_width {
                used += w;
                keep += 1;
                continue;
            }
            let clipped = clip(&segment.text, max_width - used).to_string();
            if !clipped.is_empty() {
                segment.text = clipped;
                keep += 1;
            }
            break;
        }
        self.segments.truncate(keep);
    }

    /// Give the whole line a single style.
    pub fn restyle(&mut self, style: Style) {
        let text = self.plain();
        self.segments.clear();
        self.push(text, style);
    }

    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Text with ANSI escapes when `color` is set, plain text otherwise.
    pub fn render(&self, color: bool) -> String {
        if !color {
            return self.plain();
        }
        self.segments
            .iter()
            .map(|s| s.style.paint(s.text.as_str()).to_string())
            .collect()
    }
}

/// Display width of `s`, summed per char. Every width in this crate uses
/// this measure so that `clip` never yields text wider than asked for.
pub fn text_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Longest prefix of `s` that fits in `width` display columns.
pub fn clip(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// `s` clipped and left-aligned in a field of `width` columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let s = clip(s, width);
    let mut out = String::with_capacity(width);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(text_width(s))));
    out
}

/// `s` clipped and centered in a field of `width` columns; odd padding goes
/// to the right.
pub fn center(s: &str, width: usize) -> String {
    let s = clip(s, width);
    let n = width.saturating_sub(text_width(s));
    let left = n / 2;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(' ').take(left));
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(n - left));
    out
}
