//! Conversation state owned by the caller of the prompt loop.

use crate::agent::{ChatMessage, Role};
use crate::i18n::{Locale, language_name};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use url::Url;

/// One recorded turn half.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub role: Role,
    pub content: String,
    /// Full message sequence the agent returned (assistant entries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_messages: Option<Vec<ChatMessage>>,
}

/// Append-only record of the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry {
            timestamp: Local::now(),
            role: Role::User,
            content: content.into(),
            full_messages: None,
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, full_messages: Vec<ChatMessage>) {
        self.entries.push(HistoryEntry {
            timestamp: Local::now(),
            role: Role::Assistant,
            content: content.into(),
            full_messages: Some(full_messages),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only description of the video being discussed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub duration_secs: u64,
    pub video_id: Option<String>,
}

/// Active languages: UI message locale, UI language code and transcript language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub locale: Locale,
    pub ui_language: String,
    pub transcript_language: String,
}

impl LocaleContext {
    pub fn new(locale: Locale, transcript_language: impl Into<String>) -> Self {
        Self {
            locale,
            ui_language: locale.code().to_string(),
            transcript_language: transcript_language.into(),
        }
    }

    /// Switch the UI locale; the UI language follows it.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.ui_language = locale.code().to_string();
    }
}

/// Extract the video id from the common YouTube URL shapes.
pub fn video_id_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let id = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    (!id.is_empty()).then_some(id)
}

/// System prompt for the agent: what the video is, its transcript, and which
/// language to answer in.
pub fn build_system_prompt(
    metadata: &VideoMetadata,
    transcript: Option<&str>,
    locale: &LocaleContext,
) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant answering questions about a video. \
         Base your answers on the transcript when one is provided and say so \
         when the transcript does not cover a question.\n\n",
    );
    if !metadata.title.is_empty() {
        prompt.push_str(&format!("Title: {}\n", metadata.title));
    }
    if !metadata.author.is_empty() {
        prompt.push_str(&format!("Author: {}\n", metadata.author));
    }
    if metadata.duration_secs > 0 {
        prompt.push_str(&format!("Duration: {} seconds\n", metadata.duration_secs));
    }
    prompt.push_str(&format!(
        "Always answer in {}.\n",
        language_name(&locale.ui_language)
    ));
    if let Some(transcript) = transcript.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(
            "\nTranscript ({}):\n{}\n",
            language_name(&locale.transcript_language),
            transcript
        ));
    }
    prompt
}
