//! Terminal output sanitization
//!
//! Everything printed from a vCon comes from documents we do not control: party
//! names, summaries, transcripts and index highlights can all carry ANSI escape
//! sequences or other control characters. All record text passes through
//! [`sanitize`] before it reaches stdout.

use std::borrow::Cow;
use std::io::IsTerminal;

const ESC: char = '\x1b';

/// Opening/closing tags the index wraps around matched terms
pub const HIGHLIGHT_OPEN: &str = "<em>";
pub const HIGHLIGHT_CLOSE: &str = "</em>";

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const PLAIN_MARKER: &str = "**";

/// How highlighted terms are marked in rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    /// Bold ANSI sequences, for interactive terminals
    Ansi,
    /// Markdown-style `**term**`, for pipes and files
    Plain,
}

impl HighlightStyle {
    /// Pick ANSI when stdout is a terminal
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() { Self::Ansi } else { Self::Plain }
    }

    fn markers(self) -> (&'static str, &'static str) {
        match self {
            Self::Ansi => (ANSI_BOLD, ANSI_RESET),
            Self::Plain => (PLAIN_MARKER, PLAIN_MARKER),
        }
    }
}

/// Strip ANSI CSI sequences and control characters other than tab, newline and CR
///
/// Borrows the input when there is nothing to remove.
///
/// # Examples
///
/// ```
/// use vcon_search::utils::terminal::sanitize;
///
/// assert_eq!(sanitize("\x1b[31mRed\x1b[0m caller"), "Red caller");
/// ```
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_unsafe_char) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC && chars.peek() == Some(&'[') {
            chars.next();
            // CSI runs until its final letter
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if is_unsafe_char(ch) {
            continue;
        }

        result.push(ch);
    }

    Cow::Owned(result)
}

/// Sanitize an index highlight fragment and restyle its `<em>` markers
pub fn render_highlight(fragment: &str, style: HighlightStyle) -> String {
    let (open, close) = style.markers();
    sanitize(fragment).replace(HIGHLIGHT_OPEN, open).replace(HIGHLIGHT_CLOSE, close)
}

fn is_unsafe_char(ch: char) -> bool {
    ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_color_codes() {
        assert_eq!(sanitize("\x1b[31mRed text\x1b[0m normal"), "Red text normal");
    }

    #[test]
    fn test_sanitize_cursor_movement() {
        assert_eq!(sanitize("\x1b[2J\x1b[H Cleared screen"), " Cleared screen");
    }

    #[test]
    fn test_sanitize_bell_and_backspace() {
        assert_eq!(sanitize("Alert! \x07Test\x08"), "Alert! Test");
    }

    #[test]
    fn test_sanitize_plain_text_borrows() {
        let text = "Line 1\nLine 2\tTabbed";
        assert!(matches!(sanitize(text), Cow::Borrowed(_)));
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_unicode() {
        assert_eq!(sanitize("Hola 👋 \x1b[31mMundo\x1b[0m"), "Hola 👋 Mundo");
    }

    #[test]
    fn test_render_highlight_plain() {
        let rendered = render_highlight("the <em>brake</em> pads", HighlightStyle::Plain);
        assert_eq!(rendered, "the **brake** pads");
    }

    #[test]
    fn test_render_highlight_ansi_strips_injected_codes() {
        let rendered = render_highlight("\x1b[2J<em>oil</em>", HighlightStyle::Ansi);
        assert_eq!(rendered, "\x1b[1moil\x1b[0m");
    }
}
