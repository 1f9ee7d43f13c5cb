//! Markdown to ANSI rendering using pulldown-cmark.

use super::terminal::{LineBuilder, StyledLine, StyledSpan, lines_to_ansi};
use crossterm::style::Color;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use thiserror::Error;

/// Width used for rules and tables.
const RENDER_WIDTH: usize = 60;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unterminated code fence opened on line {0}")]
    UnterminatedFence(usize),

    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
}

/// Render markdown for the terminal. Returns `text` unchanged if rendering fails.
pub fn render_markdown(text: &str) -> String {
    match try_render_markdown(text) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::debug!(error = %e, "Markdown rendering failed, using raw text");
            text.to_string()
        }
    }
}

pub fn try_render_markdown(text: &str) -> Result<String, RenderError> {
    check_fences(text)?;
    let lines = render_lines(text);
    Ok(lines_to_ansi(&lines)?)
}

/// A fence line: at most three spaces of indent, then a run of three or more
/// backticks or tildes. Returns the fence character, the run length and the
/// rest of the line.
fn fence(line: &str) -> Option<(char, usize, &str)> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let ch = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let run = rest.len() - rest.trim_start_matches(ch).len();
    (run >= 3).then(|| (ch, run, &rest[run..]))
}

/// A fence left open would swallow the rest of the reply into a code block.
///
/// A block closes on a fence of the same character, at least as long as the
/// opener, with nothing after it.
fn check_fences(text: &str) -> Result<(), RenderError> {
    // (line number, fence char, run length)
    let mut open: Option<(usize, char, usize)> = None;
    for (idx, line) in text.lines().enumerate() {
        let Some((ch, run, info)) = fence(line) else {
            continue;
        };
        match open {
            Some((_, open_ch, open_run)) => {
                if ch == open_ch && run >= open_run && info.trim().is_empty() {
                    open = None;
                }
            }
            // Backtick info strings cannot contain backticks
            None if ch == '`' && info.contains('`') => {}
            None => open = Some((idx + 1, ch, run)),
        }
    }
    match open {
        Some((line, _, _)) => Err(RenderError::UnterminatedFence(line)),
        None => Ok(()),
    }
}

#[derive(Default)]
struct InlineState {
    bold: bool,
    italic: bool,
    link: bool,
    blockquote: bool,
}

impl InlineState {
    fn span(&self, text: &str) -> StyledSpan {
        let mut span = if self.bold {
            StyledSpan::bold(text)
        } else if self.italic || self.blockquote {
            StyledSpan::italic(text)
        } else {
            StyledSpan::raw(text)
        };
        if self.bold && self.italic {
            span = span.with_italic();
        }
        if self.link {
            span = span.with_color(Color::Blue);
        }
        span
    }
}

#[allow(clippy::too_many_lines)]
fn render_lines(content: &str) -> Vec<StyledLine> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(content, options);

    let mut result: Vec<StyledLine> = Vec::new();
    let mut current = LineBuilder::new();
    let mut prefix_only = false;
    let mut inline = InlineState::default();

    let mut in_code_block = false;
    let mut code_buffer = String::new();
    let mut list_counters: Vec<Option<u64>> = Vec::new();
    let mut item_prefix: Option<String> = None;
    let mut pending_link: Option<String> = None;

    let mut in_table = false;
    let mut table_rows: Vec<Vec<String>> = Vec::new();
    let mut table_row: Vec<String> = Vec::new();
    let mut table_cell = String::new();

    fn flush(result: &mut Vec<StyledLine>, current: &mut LineBuilder, prefix_only: bool) {
        let line = std::mem::take(current).build();
        if !prefix_only && !line.is_empty() {
            result.push(line);
        }
    }

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Strong => inline.bold = true,
                Tag::Emphasis => inline.italic = true,
                Tag::Link { dest_url, .. } => {
                    inline.link = true;
                    pending_link = Some(dest_url.to_string());
                }
                Tag::CodeBlock(kind) => {
                    flush(&mut result, &mut current, prefix_only);
                    in_code_block = true;
                    code_buffer.clear();
                    if let CodeBlockKind::Fenced(lang) = kind
                        && !lang.is_empty()
                    {
                        result.push(StyledLine::dim(format!("╭─ {lang}")));
                    }
                }
                Tag::Heading { level, .. } => {
                    flush(&mut result, &mut current, prefix_only);
                    let marker = match level {
                        HeadingLevel::H1 => "# ",
                        HeadingLevel::H2 => "## ",
                        HeadingLevel::H3 => "### ",
                        _ => "#### ",
                    };
                    current = LineBuilder::new()
                        .styled(StyledSpan::bold(marker).with_color(Color::Yellow));
                    prefix_only = false;
                    inline.bold = true;
                }
                Tag::List(start) => list_counters.push(start),
                Tag::Item => {
                    flush(&mut result, &mut current, prefix_only);
                    let indent = "  ".repeat(list_counters.len().saturating_sub(1));
                    let marker = match list_counters.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{indent}{n}. ");
                            *n += 1;
                            marker
                        }
                        _ => format!("{indent}• "),
                    };
                    current = LineBuilder::new().styled(StyledSpan::colored(&marker, Color::Cyan));
                    item_prefix = Some(" ".repeat(marker.chars().count()));
                    prefix_only = true;
                }
                Tag::BlockQuote(_) => {
                    flush(&mut result, &mut current, prefix_only);
                    inline.blockquote = true;
                    current = LineBuilder::new().dim("│ ");
                    prefix_only = true;
                }
                Tag::Paragraph => {
                    // Inside an item the paragraph continues the marker line
                    if !prefix_only {
                        flush(&mut result, &mut current, prefix_only);
                        current = match (&item_prefix, inline.blockquote) {
                            (Some(pad), _) => LineBuilder::new().raw(pad.clone()),
                            (None, true) => LineBuilder::new().dim("│ "),
                            (None, false) => LineBuilder::new(),
                        };
                        prefix_only = item_prefix.is_some() || inline.blockquote;
                    }
                }
                Tag::Table(_) => {
                    flush(&mut result, &mut current, prefix_only);
                    in_table = true;
                    table_rows.clear();
                }
                Tag::TableHead | Tag::TableRow => table_row.clear(),
                Tag::TableCell => table_cell.clear(),
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Strong => inline.bold = false,
                TagEnd::Emphasis => inline.italic = false,
                TagEnd::Link => {
                    inline.link = false;
                    if let Some(url) = pending_link.take() {
                        current = current.dim(format!(" ({url})"));
                        prefix_only = false;
                    }
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    for line in code_buffer.lines() {
                        result.push(
                            LineBuilder::new()
                                .dim("│ ")
                                .styled(StyledSpan::colored(line, Color::Grey))
                                .build(),
                        );
                    }
                    result.push(StyledLine::empty());
                }
                TagEnd::Heading(_) => {
                    inline.bold = false;
                    flush(&mut result, &mut current, false);
                    result.push(StyledLine::empty());
                }
                TagEnd::Paragraph => {
                    flush(&mut result, &mut current, prefix_only);
                    prefix_only = false;
                    if list_counters.is_empty() && !inline.blockquote {
                        result.push(StyledLine::empty());
                    }
                }
                TagEnd::Item => {
                    flush(&mut result, &mut current, prefix_only);
                    item_prefix = None;
                    prefix_only = false;
                }
                TagEnd::List(_) => {
                    list_counters.pop();
                    if list_counters.is_empty() {
                        result.push(StyledLine::empty());
                    }
                }
                TagEnd::BlockQuote(_) => {
                    flush(&mut result, &mut current, prefix_only);
                    inline.blockquote = false;
                    prefix_only = false;
                    result.push(StyledLine::empty());
                }
                TagEnd::TableCell => table_row.push(std::mem::take(&mut table_cell)),
                TagEnd::TableHead | TagEnd::TableRow => {
                    table_rows.push(std::mem::take(&mut table_row));
                }
                TagEnd::Table => {
                    in_table = false;
                    result.extend(render_table(&table_rows));
                    result.push(StyledLine::empty());
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    code_buffer.push_str(&text);
                } else if in_table {
                    table_cell.push_str(&text);
                } else {
                    current = current.styled(inline.span(&text));
                    prefix_only = false;
                }
            }
            Event::Code(code) => {
                if in_table {
                    table_cell.push_str(&code);
                } else {
                    current = current.styled(StyledSpan::colored(code.to_string(), Color::Cyan));
                    prefix_only = false;
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                flush(&mut result, &mut current, prefix_only);
                current = match (&item_prefix, inline.blockquote) {
                    (Some(pad), _) => LineBuilder::new().raw(pad.clone()),
                    (None, true) => LineBuilder::new().dim("│ "),
                    (None, false) => LineBuilder::new(),
                };
                prefix_only = item_prefix.is_some() || inline.blockquote;
            }
            Event::Rule => {
                flush(&mut result, &mut current, prefix_only);
                prefix_only = false;
                result.push(StyledLine::dim("─".repeat(RENDER_WIDTH)));
                result.push(StyledLine::empty());
            }
            Event::TaskListMarker(done) => {
                current = current.raw(if done { "[x] " } else { "[ ] " });
                prefix_only = false;
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                current = current.dim(html.trim_end().to_string());
                prefix_only = false;
            }
            _ => {}
        }
    }

    flush(&mut result, &mut current, prefix_only);
    while result.last().is_some_and(StyledLine::is_empty) {
        result.pop();
    }
    result
}

fn render_table(rows: &[Vec<String>]) -> Vec<StyledLine> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(unicode_width::UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let mut lines = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let mut line = LineBuilder::new();
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                line = line.dim(" │ ");
            }
            let cell = row.get(i).map_or("", String::as_str);
            let pad = width.saturating_sub(unicode_width::UnicodeWidthStr::width(cell));
            let text = format!("{cell}{}", " ".repeat(pad));
            line = if row_idx == 0 { line.bold(text) } else { line.raw(text) };
        }
        lines.push(line.build());
        if row_idx == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            lines.push(StyledLine::dim(rule.join("─┼─")));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::util::strip_ansi;

    fn plain(text: &str) -> String {
        strip_ansi(&render_markdown(text))
    }

    #[test]
    fn headings_and_paragraphs() {
        let out = plain("# Title\n\nSome **bold** and *italic* text.");
        assert_eq!(out, "# Title\n\nSome bold and italic text.");
    }

    #[test]
    fn bullet_and_numbered_lists() {
        let out = plain("- one\n- two\n\n3. three\n4. four");
        assert!(out.contains("• one\n• two"), "got {out:?}");
        assert!(out.contains("3. three\n4. four"), "got {out:?}");
    }

    #[test]
    fn nested_list_is_indented() {
        let out = plain("- outer\n  - inner");
        assert!(out.contains("• outer\n  • inner"), "got {out:?}");
    }

    #[test]
    fn code_block_keeps_indentation() {
        let out = plain("```rust\nfn main() {\n    println!(\"hi\");\n}\n```");
        assert!(out.contains("╭─ rust"));
        assert!(out.contains("│     println!(\"hi\");"), "got {out:?}");
    }

    #[test]
    fn inline_code_and_links() {
        let out = plain("Run `cargo` from [the docs](https://doc.rust-lang.org).");
        assert_eq!(out, "Run cargo from the docs (https://doc.rust-lang.org).");
    }

    #[test]
    fn blockquote_prefix() {
        let out = plain("> quoted line");
        assert_eq!(out, "│ quoted line");
    }

    #[test]
    fn table_columns_align() {
        let out = plain("| a | bb |\n|---|----|\n| ccc | d |");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "a   │ bb");
        assert_eq!(lines[2], "ccc │ d ");
    }

    #[test]
    fn styling_is_emitted() {
        assert!(render_markdown("**bold**").contains('\x1b'));
    }

    #[test]
    fn unterminated_fence_returns_input_unchanged() {
        let input = "Here is code:\n```python\nprint('never closed')";
        assert_eq!(render_markdown(input), input);
        assert!(matches!(
            try_render_markdown(input),
            Err(RenderError::UnterminatedFence(2))
        ));
    }

    #[test]
    fn mismatched_fence_markers_stay_open() {
        let input = "~~~\ncode\n```";
        assert_eq!(render_markdown(input), input);
    }

    #[test]
    fn longer_fence_wraps_a_shorter_one() {
        let input = "Use a fence:\n\n````\n```\n````\n\nDone **bold**.";
        assert!(try_render_markdown(input).is_ok());
        let out = plain(input);
        assert!(out.contains("│ ```"), "got {out:?}");
        assert!(out.ends_with("Done bold."), "got {out:?}");
    }

    #[test]
    fn closing_fence_must_be_long_enough_and_bare() {
        for input in ["````\ncode\n```", "```rust\ncode\n```rust"] {
            assert!(
                matches!(try_render_markdown(input), Err(RenderError::UnterminatedFence(1))),
                "{input:?}"
            );
        }
        assert!(try_render_markdown("~~~~\ncode\n~~~~~  ").is_ok());
    }

    #[test]
    fn indented_code_is_not_a_fence() {
        assert!(try_render_markdown("text\n\n    ```\n    still code").is_ok());
    }

    #[test]
    fn unclosed_emphasis_is_literal() {
        assert_eq!(plain("**not closed"), "**not closed");
    }
}
