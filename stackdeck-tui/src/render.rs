use crate::{
    model::{SelectList, SelectMode},
    theme::Theme,
};
use crossterm::{
    QueueableCommand,
    cursor::MoveTo,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "❯ ";
const CURSOR_MARKER: &str = "› ";
const CHECKED: &str = "◉ ";
const UNCHECKED: &str = "◯ ";

/// Rows above and below the item window: title, query line, footer, spacer.
const CHROME_ROWS: u16 = 4;

/// Visible slice of the filtered view. Derived from cursor and height every
/// frame; the renderer keeps no scroll state of its own.
fn window_bounds(cursor: usize, len: usize, budget: usize) -> (usize, usize) {
    if budget == 0 || len == 0 {
        return (0, 0);
    }
    let start = if cursor >= budget { cursor + 1 - budget } else { 0 };
    (start, (start + budget).min(len))
}

/// Redraw the whole screen from the model. Clears, draws title, query line,
/// the windowed item rows, and the key hints, then parks the terminal cursor
/// at the end of the query so typing reads naturally.
pub fn draw(
    out: &mut impl Write,
    list: &SelectList,
    title: &str,
    theme: &Theme,
    size: (u16, u16),
) -> io::Result<()> {
    let (width, height) = size;
    let budget = height.saturating_sub(CHROME_ROWS) as usize;
    let (start, end) = window_bounds(list.cursor(), list.filtered_len(), budget);

    out.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, 0))?;

    out.queue(SetForegroundColor(theme.accent))?;
    out.queue(Print(title))?;
    out.queue(ResetColor)?;
    out.queue(Print("\r\n"))?;

    out.queue(SetForegroundColor(theme.accent))?;
    out.queue(Print(PROMPT))?;
    out.queue(ResetColor)?;
    out.queue(Print(list.query()))?;
    out.queue(Print("\r\n"))?;

    if list.filtered_len() == 0 {
        out.queue(SetForegroundColor(theme.muted))?;
        out.queue(Print("  (no matches)"))?;
        out.queue(ResetColor)?;
        out.queue(Print("\r\n"))?;
    }

    for (row, (item, under_cursor, checked)) in list.visible_rows().enumerate() {
        if row < start {
            continue;
        }
        if row >= end {
            break;
        }

        let marker = if under_cursor { CURSOR_MARKER } else { "  " };
        let checkbox = match list.mode() {
            SelectMode::Multi => {
                if checked {
                    CHECKED
                } else {
                    UNCHECKED
                }
            }
            SelectMode::Single => "",
        };

        let prefix_width = marker.width() + checkbox.width();
        let label = truncate_to_width(&item.label, (width as usize).saturating_sub(prefix_width));

        if under_cursor {
            out.queue(SetForegroundColor(theme.accent))?;
        } else if checked {
            out.queue(SetForegroundColor(theme.success))?;
        }
        out.queue(Print(marker))?;
        out.queue(Print(checkbox))?;
        out.queue(Print(label))?;
        if under_cursor || checked {
            out.queue(ResetColor)?;
        }
        out.queue(Print("\r\n"))?;
    }

    if end < list.filtered_len() {
        out.queue(SetForegroundColor(theme.muted))?;
        out.queue(Print(format!("  … {} more", list.filtered_len() - end)))?;
        out.queue(ResetColor)?;
        out.queue(Print("\r\n"))?;
    }

    out.queue(SetForegroundColor(theme.hint))?;
    out.queue(Print(footer_hints(list.mode())))?;
    out.queue(ResetColor)?;

    // Park the cursor after the query text
    let cursor_col = PROMPT.width() + list.query().width();
    out.queue(MoveTo(cursor_col.min(u16::MAX as usize) as u16, 1))?;

    out.flush()
}

fn footer_hints(mode: SelectMode) -> &'static str {
    match mode {
        SelectMode::Multi => "↑/↓ move · space select · enter confirm · type to filter · ctrl-c quit",
        SelectMode::Single => "↑/↓ move · enter confirm · type to filter · ctrl-c quit",
    }
}

pub fn clear(out: &mut impl Write) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, 0))?;
    out.flush()
}

fn truncate_to_width(label: &str, max_width: usize) -> &str {
    if label.width() <= max_width {
        return label;
    }
    let mut end = 0;
    let mut used = 0;
    for (offset, grapheme) in label.grapheme_indices(true) {
        let grapheme_width = grapheme.width();
        if used + grapheme_width > max_width {
            break;
        }
        used += grapheme_width;
        end = offset + grapheme.len();
    }
    &label[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_follows_cursor_past_the_budget() {
        assert_eq!(window_bounds(0, 10, 4), (0, 4));
        assert_eq!(window_bounds(3, 10, 4), (0, 4));
        assert_eq!(window_bounds(4, 10, 4), (1, 5));
        assert_eq!(window_bounds(9, 10, 4), (6, 10));
    }

    #[test]
    fn test_window_handles_small_lists_and_zero_budget() {
        assert_eq!(window_bounds(0, 2, 10), (0, 2));
        assert_eq!(window_bounds(0, 0, 10), (0, 0));
        assert_eq!(window_bounds(5, 10, 0), (0, 0));
    }

    #[test]
    fn test_truncate_to_width_respects_display_width() {
        assert_eq!(truncate_to_width("abcdef", 4), "abcd");
        assert_eq!(truncate_to_width("abc", 4), "abc");
        // Wide CJK glyphs take two columns each
        assert_eq!(truncate_to_width("日本語", 4), "日本");
    }
}
