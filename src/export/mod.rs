//! `/export`: save the conversation as Markdown or JSON.

use crate::agent::Role;
use crate::error::{Error, Result};
use crate::i18n::{Locale, get_message};
use crate::session::{ConversationHistory, HistoryEntry, VideoMetadata};
use crate::tui::console::Console;
use crate::tui::display::display_error;
use crate::tui::input::{LineSource, ask};
use crate::tui::spinner::start_spinner;
use crate::tui::util::format_timestamp;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

const MAX_SLUG_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    /// Menu answer to format. Blank or unrecognised answers pick Markdown.
    pub fn from_choice(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "2" | "json" => Self::Json,
            _ => Self::Markdown,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    metadata: &'a VideoMetadata,
    source_url: &'a str,
    exported_at: DateTime<Local>,
    messages: &'a [HistoryEntry],
}

pub fn render_json(
    history: &ConversationHistory,
    metadata: &VideoMetadata,
    source_url: &str,
    exported_at: DateTime<Local>,
) -> Result<String> {
    let doc = ExportDocument {
        metadata,
        source_url,
        exported_at,
        messages: history.entries(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn render_markdown(
    history: &ConversationHistory,
    metadata: &VideoMetadata,
    source_url: &str,
    exported_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    let title = if metadata.title.is_empty() {
        "Video chat"
    } else {
        metadata.title.as_str()
    };
    out.push_str(&format!("# {title}\n\n"));
    if !metadata.author.is_empty() {
        out.push_str(&format!("- **Author:** {}\n", metadata.author));
    }
    if metadata.duration_secs > 0 {
        out.push_str(&format!(
            "- **Duration:** {}\n",
            format_timestamp(metadata.duration_secs)
        ));
    }
    out.push_str(&format!("- **Source:** {source_url}\n"));
    out.push_str(&format!(
        "- **Exported:** {}\n",
        exported_at.format("%Y-%m-%d %H:%M:%S")
    ));

    for entry in history.entries() {
        let speaker = match entry.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
            Role::System => "System",
        };
        out.push_str(&format!(
            "\n## {speaker} ({})\n\n{}\n",
            entry.timestamp.format("%H:%M:%S"),
            entry.content.trim()
        ));
    }
    out
}

/// Lowercase ASCII slug of `text`, words joined by `-`.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// `<video-id or title slug>-chat-<YYYYMMDD-HHMMSS>.<ext>`
pub fn default_file_name(metadata: &VideoMetadata, format: ExportFormat, now: DateTime<Local>) -> String {
    let stem = metadata
        .video_id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| Some(slugify(&metadata.title)).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "video".to_string());
    format!(
        "{stem}-chat-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Render and write the export, returning the written path.
pub async fn export_to(
    dir: &Path,
    file_name: &str,
    format: ExportFormat,
    history: &ConversationHistory,
    metadata: &VideoMetadata,
    source_url: &str,
) -> Result<PathBuf> {
    let now = Local::now();
    let contents = match format {
        ExportFormat::Markdown => render_markdown(history, metadata, source_url, now),
        ExportFormat::Json => render_json(history, metadata, source_url, now)?,
    };

    let mut path = dir.join(file_name);
    if path.extension().is_none() {
        path.set_extension(format.extension());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| Error::Export(format!("{}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), entries = history.len(), "Conversation exported");
    Ok(path)
}

/// Ask for format and file name, then write the export.
///
/// Failures are reported to the user and never end the chat.
pub async fn handle_export_command(
    console: &Console,
    input: &mut dyn LineSource,
    history: &ConversationHistory,
    metadata: &VideoMetadata,
    source_url: &str,
    locale: Locale,
    dir: &Path,
) -> io::Result<()> {
    if history.is_empty() {
        return console.println(get_message("export_empty", locale, &[]));
    }

    let prompt = get_message("export_prompt_format", locale, &[]);
    let Some(answer) = ask(console, input, &prompt).await? else {
        return Ok(());
    };
    let format = ExportFormat::from_choice(&answer);

    let default_name = default_file_name(metadata, format, Local::now());
    let prompt = get_message(
        "export_prompt_filename",
        locale,
        &[("default", default_name.as_str())],
    );
    let Some(answer) = ask(console, input, &prompt).await? else {
        return Ok(());
    };
    let file_name = match answer.trim() {
        "" => default_name,
        name => name.to_string(),
    };

    let spinner = start_spinner(console, get_message("export_writing", locale, &[]));
    match export_to(dir, &file_name, format, history, metadata, source_url).await {
        Ok(path) => {
            let path = path.display().to_string();
            spinner
                .succeed(&get_message("export_success", locale, &[("path", path.as_str())]))
                .await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Export failed");
            spinner.stop().await?;
            let error = e.to_string();
            display_error(console, "error_export", locale, &[("error", error.as_str())])
        }
    }
}
