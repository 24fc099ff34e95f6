//! Chat reply → ratatui `Text` renderer.
//!
//! Bot replies carry a deliberately tiny grammar: `**bold**` runs, bare
//! http(s) URLs, and newlines. Everything else is literal text, so a
//! reply that embeds markup or control bytes renders inert instead of
//! styling itself into the transcript.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use regex::Regex;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL regex is valid"));

static BOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex is valid"));

/// Renders reply content into styled `Text` on the given base color.
///
/// Returns owned text (`'static`) so callers aren't constrained by input
/// lifetime. URLs are carved out before the bold scan and never restyled,
/// so asterisks inside a URL cannot open a bold run.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let base = Style::default().fg(base_fg);
    let bold = base.add_modifier(Modifier::BOLD);
    let link = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);

    let sanitized = sanitize(content);
    let mut lines = Vec::new();
    for raw_line in sanitized.split('\n') {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut cursor = 0;
        for url in URL_REGEX.find_iter(raw_line) {
            push_bold_spans(&mut spans, &raw_line[cursor..url.start()], base, bold);
            spans.push(Span::styled(url.as_str().to_string(), link));
            cursor = url.end();
        }
        push_bold_spans(&mut spans, &raw_line[cursor..], base, bold);
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

/// Splits a URL-free stretch into plain and `**bold**` spans. The
/// asterisk pairs are consumed; the text between them keeps the bold
/// style. An unpaired `**` stays literal.
fn push_bold_spans(spans: &mut Vec<Span<'static>>, text: &str, base: Style, bold: Style) {
    let mut cursor = 0;
    for caps in BOLD_REGEX.captures_iter(text) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            if whole.start() > cursor {
                spans.push(Span::styled(text[cursor..whole.start()].to_string(), base));
            }
            spans.push(Span::styled(inner.as_str().to_string(), bold));
            cursor = whole.end();
        }
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), base));
    }
}

/// Strips control characters so a reply cannot move the cursor or clear
/// the screen. Newlines survive as line breaks and tabs become four
/// spaces (ratatui renders `\t` as zero-width).
fn sanitize(content: &str) -> String {
    content
        .replace('\t', "    ")
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}
