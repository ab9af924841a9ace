//! Border glyph sets for the table renderer.

use crate::error::{QuillError, QuillResult};

/// Glyphs of one named table style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    pub name: &'static str,
    pub header_top_left: char,
    pub header_top_right: char,
    pub header_line: char,
    pub header_cross_down: char,
    pub header_separator: char,
    pub header_body_cross_left: char,
    pub header_body_cross_right: char,
    pub header_body_cross: char,
    pub body_line: char,
    pub body_separator: char,
    pub body_cross_up: char,
    pub body_bottom_left: char,
    pub body_bottom_right: char,
}

pub const DEFAULT_STYLE: TableStyle = TableStyle {
    name: "default",
    header_top_left: '+',
    header_top_right: '+',
    header_line: '-',
    header_cross_down: '+',
    header_separator: '|',
    header_body_cross_left: '+',
    header_body_cross_right: '+',
    header_body_cross: '+',
    body_line: '-',
    body_separator: '|',
    body_cross_up: '+',
    body_bottom_left: '+',
    body_bottom_right: '+',
};

const SOLID_STYLE: TableStyle = TableStyle {
    name: "solid",
    header_top_left: '┌',
    header_top_right: '┐',
    header_line: '─',
    header_cross_down: '┬',
    header_separator: '│',
    header_body_cross_left: '├',
    header_body_cross_right: '┤',
    header_body_cross: '┼',
    body_line: '─',
    body_separator: '│',
    body_cross_up: '┴',
    body_bottom_left: '└',
    body_bottom_right: '┘',
};

const HEAVY_STYLE: TableStyle = TableStyle {
    name: "heavy",
    header_top_left: '┏',
    header_top_right: '┓',
    header_line: '━',
    header_cross_down: '┳',
    header_separator: '┃',
    header_body_cross_left: '┣',
    header_body_cross_right: '┫',
    header_body_cross: '╋',
    body_line: '━',
    body_separator: '┃',
    body_cross_up: '┻',
    body_bottom_left: '┗',
    body_bottom_right: '┛',
};

const DOUBLE_STYLE: TableStyle = TableStyle {
    name: "double",
    header_top_left: '╔',
    header_top_right: '╗',
    header_line: '═',
    header_cross_down: '╦',
    header_separator: '║',
    header_body_cross_left: '╠',
    header_body_cross_right: '╣',
    header_body_cross: '╬',
    body_line: '═',
    body_separator: '║',
    body_cross_up: '╩',
    body_bottom_left: '╚',
    body_bottom_right: '╝',
};

// Light header, single-line body with rounded corners.
const ROUNDED_STYLE: TableStyle = TableStyle {
    name: "rounded",
    header_top_left: '╭',
    header_top_right: '╮',
    header_line: '─',
    header_cross_down: '┬',
    header_separator: '│',
    header_body_cross_left: '├',
    header_body_cross_right: '┤',
    header_body_cross: '┼',
    body_line: '─',
    body_separator: '│',
    body_cross_up: '┴',
    body_bottom_left: '╰',
    body_bottom_right: '╯',
};

static BUILT_IN_STYLES: [TableStyle; 5] = [
    DEFAULT_STYLE,
    SOLID_STYLE,
    HEAVY_STYLE,
    DOUBLE_STYLE,
    ROUNDED_STYLE,
];

impl TableStyle {
    /// Look up a built-in style, ignoring ASCII case.
    pub fn by_name(name: &str) -> QuillResult<&'static TableStyle> {
        BUILT_IN_STYLES
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| QuillError::UnknownTableStyle {
                name: name.to_string(),
                known: Self::names().join(", "),
            })
    }

    pub fn names() -> Vec<&'static str> {
        BUILT_IN_STYLES.iter().map(|s| s.name).collect()
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        DEFAULT_STYLE
    }
}

/// Where a border line sits in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Above the header text.
    HeaderTop,
    /// Between header text and the body.
    HeaderBody,
    /// Closing line of a table without data rows.
    HeaderBottom,
    /// Closing line after the last data row.
    BodyBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub left: char,
    pub line: char,
    pub cross: char,
    pub right: char,
}

impl LineType {
    pub fn glyphs(self, style: &TableStyle) -> BorderGlyphs {
        match self {
            LineType::HeaderTop => BorderGlyphs {
                left: style.header_top_left,
                line: style.header_line,
                cross: style.header_cross_down,
                right: style.header_top_right,
            },
            LineType::HeaderBody => BorderGlyphs {
                left: style.header_body_cross_left,
                line: style.header_line,
                cross: style.header_body_cross,
                right: style.header_body_cross_right,
            },
            LineType::HeaderBottom => BorderGlyphs {
                left: style.body_bottom_left,
                line: style.header_line,
                cross: style.body_cross_up,
                right: style.body_bottom_right,
            },
            LineType::BodyBottom => BorderGlyphs {
                left: style.body_bottom_left,
                line: style.body_line,
                cross: style.body_cross_up,
                right: style.body_bottom_right,
            },
        }
    }
}
