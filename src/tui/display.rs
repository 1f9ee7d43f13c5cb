//! Stateless print helpers for headers, replies and errors.

use super::console::Console;
use super::markdown::render_markdown;
use super::util::format_timestamp;
use crate::i18n::{Locale, get_message, language_name};
use crate::session::{LocaleContext, VideoMetadata};
use std::io;

/// Width of the `=` rules around the chat header and under summaries.
const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn display_usage(console: &Console, locale: Locale) -> io::Result<()> {
    for key in ["usage_header", "usage_examples", "usage_example_1", "usage_note"] {
        console.println(get_message(key, locale, &[]))?;
    }
    Ok(())
}

pub fn display_video_info(console: &Console, metadata: &VideoMetadata, locale: Locale) -> io::Result<()> {
    console.println(get_message("video_info_title", locale, &[("title", metadata.title.as_str())]))?;
    console.println(get_message("video_info_author", locale, &[("author", metadata.author.as_str())]))?;
    let duration = format_timestamp(metadata.duration_secs);
    console.println(get_message("video_info_duration", locale, &[("duration", duration.as_str())]))
}

pub fn display_chat_header(console: &Console, ctx: &LocaleContext) -> io::Result<()> {
    let ui_language = language_name(&ctx.ui_language);
    let transcript_language = language_name(&ctx.transcript_language);

    console.println(format!("\n{}", rule()))?;
    console.println(get_message(
        "chat_started_with_languages",
        ctx.locale,
        &[
            ("ui_language", ui_language.as_str()),
            ("transcript_language", transcript_language.as_str()),
        ],
    ))?;
    console.println(get_message("chat_exit_instruction", ctx.locale, &[]))?;
    console.println(get_message("chat_export_instruction", ctx.locale, &[]))?;
    console.println(get_message("chat_lang_instruction", ctx.locale, &[]))?;
    console.println(format!("{}\n", rule()))
}

/// Print an agent reply as markdown with exactly one trailing newline.
pub fn display_assistant_response(console: &Console, content: &str) -> io::Result<()> {
    let rendered = render_markdown(content.trim());
    console.write_out(format!("{}\n", rendered.trim_end()))
}

/// Print a localized error to the error stream, framed by blank lines.
pub fn display_error(
    console: &Console,
    key: &str,
    locale: Locale,
    params: &[(&str, &str)],
) -> io::Result<()> {
    console.write_err(format!("\n{}\n\n", get_message(key, locale, params)))
}

pub fn display_summary(console: &Console, content: &str) -> io::Result<()> {
    console.println(render_markdown(content))?;
    console.println(format!("\n{}", rule()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::util::strip_ansi;

    #[test]
    fn usage_prints_four_lines() {
        let (console, out, _) = Console::capture();
        display_usage(&console, Locale::En).unwrap();
        let text = out.contents();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("Usage: tubechat"));
    }

    #[test]
    fn video_info_formats_duration() {
        let (console, out, _) = Console::capture();
        let metadata = VideoMetadata {
            title: "Intro".to_string(),
            author: "Ada".to_string(),
            duration_secs: 3725,
            video_id: None,
        };
        display_video_info(&console, &metadata, Locale::En).unwrap();
        assert_eq!(out.contents(), "Title: Intro\nAuthor: Ada\nDuration: 1:02:05\n");
    }

    #[test]
    fn header_names_languages() {
        let (console, out, _) = Console::capture();
        let ctx = LocaleContext::new(Locale::Es, "en");
        display_chat_header(&console, &ctx).unwrap();
        let text = out.contents();
        assert!(text.contains("interfaz: Spanish, transcripción: English"), "got {text}");
        assert!(text.starts_with(&format!("\n{}\n", "=".repeat(60))));
        assert!(text.ends_with(&format!("{}\n\n", "=".repeat(60))));
    }

    #[test]
    fn assistant_response_has_single_trailing_newline() {
        let (console, out, _) = Console::capture();
        display_assistant_response(&console, "\n\n  Hello **there**  \n\n").unwrap();
        let text = strip_ansi(&out.contents());
        assert_eq!(text, "Hello there\n");
    }

    #[test]
    fn errors_go_to_error_stream() {
        let (console, out, err) = Console::capture();
        display_error(&console, "error_general", Locale::En, &[("error", "network down")]).unwrap();
        assert!(out.is_empty());
        assert_eq!(err.contents(), "\nError: network down\n\n");
    }

    #[test]
    fn summary_ends_with_rule() {
        let (console, out, _) = Console::capture();
        display_summary(&console, "Short summary.").unwrap();
        let text = strip_ansi(&out.contents());
        assert_eq!(text, format!("Short summary.\n\n{}\n", "=".repeat(60)));
    }
}
