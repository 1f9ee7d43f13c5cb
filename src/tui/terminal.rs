//! Styled text primitives rendered to ANSI strings with crossterm.

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};
use std::fmt::Write as _;

/// A styled run of text.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    pub content: String,
    pub style: ContentStyle,
}

impl StyledSpan {
    pub fn new(content: impl Into<String>, style: ContentStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// Create an unstyled span.
    pub fn raw(content: impl Into<String>) -> Self {
        Self::new(content, ContentStyle::new())
    }

    pub fn colored(content: impl Into<String>, color: Color) -> Self {
        Self::new(
            content,
            ContentStyle {
                foreground_color: Some(color),
                ..ContentStyle::default()
            },
        )
    }

    pub fn dim(content: impl Into<String>) -> Self {
        Self::with_attribute(content, Attribute::Dim)
    }

    pub fn bold(content: impl Into<String>) -> Self {
        Self::with_attribute(content, Attribute::Bold)
    }

    pub fn italic(content: impl Into<String>) -> Self {
        Self::with_attribute(content, Attribute::Italic)
    }

    fn with_attribute(content: impl Into<String>, attribute: Attribute) -> Self {
        Self::new(
            content,
            ContentStyle {
                attributes: attribute.into(),
                ..ContentStyle::default()
            },
        )
    }

    #[must_use]
    pub fn with_italic(mut self) -> Self {
        self.style.attributes.set(Attribute::Italic);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.style.foreground_color = Some(color);
        self
    }

    fn is_plain(&self) -> bool {
        self.style.foreground_color.is_none()
            && self.style.background_color.is_none()
            && self.style.attributes.is_empty()
    }

    /// Append this span as ANSI text.
    pub fn write_ansi(&self, out: &mut String) -> std::fmt::Result {
        if self.is_plain() {
            out.push_str(&self.content);
            return Ok(());
        }
        write!(out, "{}", StyledContent::new(self.style, &self.content))
    }
}

/// A line of styled spans.
#[derive(Clone, Debug, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn dim(content: impl Into<String>) -> Self {
        Self {
            spans: vec![StyledSpan::dim(content)],
        }
    }

    pub fn push(&mut self, span: StyledSpan) {
        self.spans.push(span);
    }

    /// True when the line has no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.content.is_empty())
    }

    pub fn write_ansi(&self, out: &mut String) -> std::fmt::Result {
        for span in &self.spans {
            span.write_ansi(out)?;
        }
        Ok(())
    }
}

/// Builder for styled lines.
pub struct LineBuilder {
    line: StyledLine,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self {
            line: StyledLine::empty(),
        }
    }

    #[must_use]
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::raw(content));
        self
    }

    #[must_use]
    pub fn dim(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::dim(content));
        self
    }

    #[must_use]
    pub fn bold(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::bold(content));
        self
    }

    #[must_use]
    pub fn styled(mut self, span: StyledSpan) -> Self {
        self.line.push(span);
        self
    }

    pub fn build(self) -> StyledLine {
        self.line
    }
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Join lines into one ANSI string separated by `\n`.
pub fn lines_to_ansi(lines: &[StyledLine]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        line.write_ansi(&mut out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::util::strip_ansi;

    #[test]
    fn plain_spans_emit_no_escapes() {
        let line = LineBuilder::new().raw("a").raw("b").build();
        assert_eq!(lines_to_ansi(&[line]).unwrap(), "ab");
    }

    #[test]
    fn styled_spans_keep_text() {
        let line = LineBuilder::new()
            .bold("Title")
            .raw(" ")
            .styled(StyledSpan::italic("em").with_color(Color::Cyan))
            .build();
        let ansi = lines_to_ansi(&[line.clone(), StyledLine::dim("x")]).unwrap();
        assert!(ansi.contains('\x1b'));
        assert_eq!(strip_ansi(&ansi), "Title em\nx");
        let text: String = line.spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(text, "Title em");
    }

    #[test]
    fn empty_detection_ignores_empty_spans() {
        let line = StyledLine {
            spans: vec![StyledSpan::raw(""), StyledSpan::dim("")],
        };
        assert!(line.is_empty());
        assert!(!LineBuilder::new().raw(" ").build().is_empty());
    }
}
