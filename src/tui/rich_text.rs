//! Message text → ratatui `Text`.
//!
//! Runs [`segments::parse`] over the displayed text and styles the result:
//! plain runs in the author colour, fenced code blocks framed and
//! syntax-highlighted with syntect. Each block's header carries its 1-based
//! index so the copy shortcuts (`1`-`9` in cursor mode) have something to
//! point at.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::segments::{self, CodeBlock, Segment};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Render `content` as styled text. Owned output, so the caller can drop the
/// source string right after.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut block_index = 0usize;

    for segment in segments::parse(content) {
        match segment {
            Segment::Text(text) => push_text(&mut lines, &text, base_fg),
            Segment::Code(block) => {
                block_index += 1;
                push_code(&mut lines, &block, block_index);
            }
        }
    }

    Text::from(lines)
}

/// Appends plain text, one `Line` per newline-separated run.
fn push_text(lines: &mut Vec<Line<'static>>, text: &str, base_fg: Color) {
    let style = Style::default().fg(base_fg);
    for (i, raw) in text.split('\n').enumerate() {
        // The newline right after a closing fence is already implied by the frame.
        if i == 0 && raw.is_empty() && !lines.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(expand_tabs(raw), style)));
    }
}

fn push_code(lines: &mut Vec<Line<'static>>, block: &CodeBlock, index: usize) {
    let border = Style::default().fg(Color::DarkGray);

    // Drop a trailing empty line left by the text before the fence.
    if lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }

    lines.push(Line::from(vec![
        Span::styled("╭── ", border),
        Span::styled(format!("[{index}] "), border),
        Span::styled(block.language.clone(), border.add_modifier(Modifier::BOLD)),
        Span::styled(" ──", border),
    ]));

    let body = expand_tabs(&block.value);
    let mut highlighter = SYNTAX_SET
        .find_syntax_by_token(&block.language)
        .zip(THEME_SET.themes.get(THEME))
        .map(|(syntax, theme)| HighlightLines::new(syntax, theme));

    for line in LinesWithEndings::from(&body) {
        let mut spans = vec![Span::styled("│ ", border)];
        match highlighter.as_mut().map(|h| h.highlight_line(line, &SYNTAX_SET)) {
            Some(Ok(ranges)) => {
                spans.extend(ranges.into_iter().filter_map(|(style, fragment)| {
                    let content = fragment.trim_end_matches('\n');
                    if content.is_empty() {
                        return None;
                    }
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                }));
            }
            _ => spans.push(Span::styled(
                line.trim_end_matches('\n').to_owned(),
                Style::default().fg(Color::White),
            )),
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled("╰──", border)));
}

fn expand_tabs(text: &str) -> String {
    // ratatui renders \t as zero-width
    text.replace('\t', "    ")
}
