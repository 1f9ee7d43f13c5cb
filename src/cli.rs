//! Command line entry point: gather video details, build the agent and hand
//! over to the chat loop.

use crate::agent::{Agent, ChatCompletionsAgent, ChatMessage, final_message};
use crate::config::Config;
use crate::i18n::{Locale, get_message};
use crate::session::{
    ConversationHistory, LocaleContext, VideoMetadata, build_system_prompt, video_id_from_url,
};
use crate::tui::display::{display_summary, display_usage, display_video_info};
use crate::tui::spinner::start_spinner;
use crate::tui::{ChatExit, ChatSession, Console, StdinLines, start_chat};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const SUMMARY_REQUEST: &str =
    "Give a short summary of this video: a one-sentence overview followed by its key points.";

/// Chat with a video from the terminal
#[derive(Parser, Debug)]
#[command(name = "tubechat", version, about)]
pub struct Cli {
    /// Video URL
    pub url: Option<String>,

    /// Video title
    #[arg(long)]
    pub title: Option<String>,

    /// Channel or author name
    #[arg(long)]
    pub author: Option<String>,

    /// Duration in seconds
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Plain-text transcript file
    #[arg(long, value_name = "FILE")]
    pub transcript: Option<PathBuf>,

    /// Interface language (en, es, fr)
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Language the transcript is written in
    #[arg(long = "transcript-lang", value_name = "CODE")]
    pub transcript_lang: Option<String>,

    /// Model to use instead of the configured one
    #[arg(long)]
    pub model: Option<String>,

    /// Summarize the video before the chat starts
    #[arg(long)]
    pub summary: bool,

    /// Config file (default: <config dir>/tubechat/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the UI locale: `--lang`, then config, then English.
    #[must_use]
    pub fn locale(&self, config: &Config) -> Locale {
        self.lang
            .as_deref()
            .and_then(Locale::from_code)
            .or_else(|| Locale::from_code(&config.locale))
            .unwrap_or_default()
    }

    fn metadata(&self) -> VideoMetadata {
        VideoMetadata {
            title: self.title.clone().unwrap_or_default(),
            author: self.author.clone().unwrap_or_default(),
            duration_secs: self.duration.unwrap_or(0),
            video_id: self.url.as_deref().and_then(video_id_from_url),
        }
    }
}

/// Logging is off unless asked for so the prompt stays clean.
/// `TUBECHAT_LOG` writes debug logs to `tubechat.log`; `RUST_LOG` logs to stderr.
pub fn init_tracing() {
    if std::env::var("TUBECHAT_LOG").is_ok() {
        use std::fs::File;
        use tracing_subscriber::prelude::*;
        match File::create("tubechat.log") {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false);
                let filter = tracing_subscriber::EnvFilter::new("tubechat=debug");
                let _ = tracing_subscriber::registry()
                    .with(file_layer.with_filter(filter))
                    .try_init();
            }
            Err(err) => {
                eprintln!("Failed to create log file: {err}");
            }
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Run the program and map the outcome to a process exit code.
pub async fn run(cli: Cli) -> ExitCode {
    let console = Console::stdio();
    match run_inner(cli, console.clone()).await {
        Ok(code) => code,
        Err(e) => {
            if console.eprintln(format!("Error: {e:#}")).is_err() {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(1)
        }
    }
}

async fn run_inner(cli: Cli, console: Console) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    let locale = cli.locale(&config);

    let Some(url) = cli.url.clone() else {
        display_usage(&console, locale)?;
        return Ok(ExitCode::from(2));
    };

    let transcript = match &cli.transcript {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read transcript {}", path.display()))?,
        ),
        None => None,
    };

    let metadata = cli.metadata();
    let transcript_language = cli
        .transcript_lang
        .clone()
        .unwrap_or_else(|| config.transcript_language.clone());
    let mut locale_ctx = LocaleContext::new(locale, transcript_language);

    display_video_info(&console, &metadata, locale)?;

    let mut agent_config = config.agent.clone();
    if let Some(model) = &cli.model {
        agent_config.model.clone_from(model);
    }
    let system_prompt = build_system_prompt(&metadata, transcript.as_deref(), &locale_ctx);
    let agent = ChatCompletionsAgent::from_config(&agent_config, system_prompt)
        .context("Failed to set up the agent")?;
    tracing::debug!(?agent, video_id = ?metadata.video_id, "Starting chat");

    if cli.summary {
        summarize(&console, &agent, locale).await?;
    }

    let mut history = ConversationHistory::new();
    let session = ChatSession::new(&agent, &mut history, &metadata, &url, &mut locale_ctx)
        .with_transcript(transcript.as_deref())
        .with_export_dir(config.export_dir())
        .with_redraw_interval(Duration::from_millis(config.redraw_interval_ms));

    let exit = start_chat(&console, StdinLines::new(), session).await?;
    tracing::debug!(?exit, turns = history.len(), "Chat ended");
    match exit {
        ChatExit::Quit | ChatExit::InputClosed => Ok(ExitCode::SUCCESS),
    }
}

/// Ask for a summary before the chat starts. A failed summary is fatal.
async fn summarize(console: &Console, agent: &dyn Agent, locale: Locale) -> Result<()> {
    let spinner = start_spinner(console, get_message("summary_generating", locale, &[]));
    let result = agent.invoke(vec![ChatMessage::user(SUMMARY_REQUEST)]).await;
    spinner.stop().await?;

    let messages = result.context("Failed to generate summary")?;
    let summary = final_message(&messages).context("Failed to generate summary")?;
    display_summary(console, &summary.content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "tubechat",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "--title",
            "Intro",
            "--duration",
            "212",
            "--lang",
            "fr",
            "--transcript-lang",
            "en",
            "--summary",
        ])
        .unwrap();

        assert!(cli.summary);
        assert_eq!(cli.locale(&Config::default()), Locale::Fr);
        let metadata = cli.metadata();
        assert_eq!(metadata.title, "Intro");
        assert_eq!(metadata.duration_secs, 212);
        assert_eq!(metadata.video_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn locale_falls_back_to_config_then_english() {
        let cli = Cli::try_parse_from(["tubechat", "--lang", "xx"]).unwrap();
        let config = Config {
            locale: "es".to_string(),
            ..Config::default()
        };
        assert_eq!(cli.locale(&config), Locale::Es);

        let config = Config {
            locale: "??".to_string(),
            ..Config::default()
        };
        assert_eq!(cli.locale(&config), Locale::En);
    }

    #[tokio::test]
    async fn missing_url_prints_usage() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "tubechat",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
        ])
        .unwrap();
        let (console, out, _) = Console::capture();

        let code = run_inner(cli, console).await.unwrap();

        assert_eq!(code, ExitCode::from(2));
        assert!(out.contents().starts_with("Usage: tubechat"));
    }

    #[tokio::test]
    async fn bad_config_is_a_startup_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "redraw_interval_ms = 0\n").unwrap();
        let cli = Cli::try_parse_from(["tubechat", "https://youtu.be/x", "--config", path.to_str().unwrap()])
            .unwrap();
        let (console, _, _) = Console::capture();

        let err = run_inner(cli, console).await.unwrap_err();
        assert!(format!("{err:#}").contains("redraw_interval_ms"));
    }
}
