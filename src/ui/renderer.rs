use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::scroll::ScrollState;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::ui::view::View;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NOTICE_TITLE: &str = " Notice ";
const NOTICE_FOOTER: &str = "[Enter] OK";
const NOTICE_MAX_WIDTH: usize = 60;

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

/// Fits a [`View`] into the terminal: the body scrolls so the focused row
/// (or the cursor) stays visible, and a blocking notice floats on top.
pub struct Renderer {
    scroll: ScrollState,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::default(),
        }
    }

    pub fn render(&mut self, view: &View, theme: &Theme, size: TerminalSize) -> RenderFrame {
        let height = size.height as usize;
        // One row is kept for the scroll indicator.
        let fixed = view.header.len() + view.footer.len() + 1;
        let capacity = height.saturating_sub(fixed).max(1);
        self.scroll.max_visible = Some(capacity);

        let total = view.body.len();
        if let Some(row) = view.cursor.map(|cursor| cursor.row).or(view.focus_row) {
            self.scroll.ensure_visible(row, total);
        }
        self.scroll.clamp(total);
        let (start, end) = self.scroll.visible_range(total);

        let mut frame = RenderFrame::default();
        frame.lines.extend(view.header.iter().cloned());
        let body_top = frame.lines.len();
        frame.lines.extend(view.body[start..end].iter().cloned());

        if let Some(cursor) = view.cursor
            && (start..end).contains(&cursor.row)
        {
            frame.cursor = Some(CursorPos {
                col: to_u16(cursor.col),
                row: to_u16(body_top + cursor.row - start),
            });
        }

        if let Some(indicator) = self.scroll.footer(total) {
            frame.lines.push(vec![Span::styled(indicator, theme.hint)]);
        }
        frame.lines.extend(view.footer.iter().cloned());

        if let Some(message) = &view.notice {
            overlay_notice(&mut frame, message, theme, size);
        }
        frame
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws a bordered box over the middle of the frame and hides the cursor.
fn overlay_notice(frame: &mut RenderFrame, message: &str, theme: &Theme, size: TerminalSize) {
    let width = size.width as usize;
    let inner = width.saturating_sub(6).clamp(10, NOTICE_MAX_WIDTH);
    let mut text_lines = wrap_words(message, inner);
    text_lines.push(String::new());
    text_lines.push(NOTICE_FOOTER.to_string());

    let box_width = inner + 4;
    let left = " ".repeat(width.saturating_sub(box_width) / 2);
    let border = theme.notice_border;

    let mut boxed: Vec<SpanLine> = Vec::with_capacity(text_lines.len() + 2);
    let title_fill = "─".repeat(box_width.saturating_sub(2 + NOTICE_TITLE.width()));
    boxed.push(vec![
        Span::new(left.clone()),
        Span::styled(format!("┌{NOTICE_TITLE}{title_fill}┐"), border),
    ]);
    for text in text_lines {
        let pad = " ".repeat(inner.saturating_sub(text.width()));
        boxed.push(vec![
            Span::new(left.clone()),
            Span::styled("│ ", border),
            Span::styled(format!("{text}{pad}"), theme.notice_text),
            Span::styled(" │", border),
        ]);
    }
    boxed.push(vec![
        Span::new(left),
        Span::styled(format!("└{}┘", "─".repeat(box_width.saturating_sub(2))), border),
    ]);

    let height = size.height as usize;
    let top = height.saturating_sub(boxed.len()) / 3;
    if frame.lines.len() < top + boxed.len() {
        frame.lines.resize(top + boxed.len(), Vec::new());
    }
    for (offset, line) in boxed.into_iter().enumerate() {
        frame.lines[top + offset] = line;
    }
    frame.cursor = None;
}

/// Greedy word wrap by display width; words longer than `width` are split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        for ch in word.chars() {
            if current.width() + ch.width().unwrap_or(0) > width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
