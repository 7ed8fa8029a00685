//! Word-wrapped layout of the input buffer.
//!
//! Wrapping is done here rather than by `Paragraph` so that every visual row
//! maps back to an exact byte range of the buffer. Cursor placement, vertical
//! movement and scrolling all read from the same rows that get drawn.

use unicode_width::UnicodeWidthChar;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// One visual row: `buffer[start..end]`, never containing `'\n'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
    /// Row was broken to fit the width; the logical line continues below.
    pub soft: bool,
}

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Greedy word wrap. Spaces may hang past the right edge so that a row
/// never starts with the space that caused the break. Words wider than the
/// row are split at the character that overflows.
pub(super) fn rows(text: &str, width: u16) -> Vec<Row> {
    let width = width as usize;
    let mut out = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        wrap_line(line, line_start, width, &mut out);
        line_start += line.len() + 1;
    }
    out
}

fn wrap_line(line: &str, offset: usize, width: usize, out: &mut Vec<Row>) {
    if width == 0 || line.is_empty() {
        out.push(Row {
            start: offset,
            end: offset + line.len(),
            soft: false,
        });
        return;
    }

    let mut row_start = 0;
    let mut row_width = 0;
    // Byte index just past the last space in the current row.
    let mut break_at: Option<usize> = None;

    for (i, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if c == ' ' {
            row_width += w;
            break_at = Some(i + c.len_utf8());
            continue;
        }
        if row_width + w > width && i > row_start {
            let split = match break_at {
                Some(b) if b > row_start => b,
                _ => i,
            };
            out.push(Row {
                start: offset + row_start,
                end: offset + split,
                soft: true,
            });
            row_start = split;
            row_width = display_width(&line[split..i]);
            break_at = None;
        }
        row_width += w;
    }

    out.push(Row {
        start: offset + row_start,
        end: offset + line.len(),
        soft: false,
    });
}

pub(super) fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Row index holding the cursor. At a soft break the cursor belongs to the
/// row below, matching where the next typed character lands.
pub(super) fn cursor_row(rows: &[Row], pos: usize) -> usize {
    rows.iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0)
}

/// `(row, column)` of the cursor, column in display cells.
pub(super) fn cursor_position(text: &str, rows: &[Row], pos: usize) -> (usize, usize) {
    let row = cursor_row(rows, pos);
    let col = rows
        .get(row)
        .map(|r| display_width(&text[r.start..pos.min(r.end).max(r.start)]))
        .unwrap_or(0);
    (row, col)
}

/// Cursor position one row up (`delta < 0`) or down, keeping the display
/// column where possible. `None` at the first/last row.
pub(super) fn vertical_target(text: &str, rows: &[Row], pos: usize, delta: isize) -> Option<usize> {
    let (row, col) = cursor_position(text, rows, pos);
    let target = row.checked_add_signed(delta)?;
    let target_row = rows.get(target)?;

    // The last cell of a soft row is the same spot as the start of the next row.
    let limit = if target_row.soft {
        text[target_row.start..target_row.end]
            .char_indices()
            .next_back()
            .map(|(i, _)| target_row.start + i)
            .unwrap_or(target_row.start)
    } else {
        target_row.end
    };

    let mut acc = 0;
    for (i, c) in text[target_row.start..limit].char_indices() {
        let w = c.width().unwrap_or(0);
        if acc + w > col {
            return Some(target_row.start + i);
        }
        acc += w;
    }
    Some(limit)
}

/// Adjusts `scroll` so the cursor row stays in a window of `visible` rows.
pub(super) fn follow_cursor(scroll: u16, cursor_row: usize, total: usize, visible: u16) -> u16 {
    if total <= visible as usize {
        return 0;
    }
    let cursor_row = cursor_row as u16;
    if cursor_row < scroll {
        cursor_row
    } else if cursor_row >= scroll + visible {
        cursor_row + 1 - visible
    } else {
        scroll
    }
}
