//! The interactive prompt loop.
//!
//! Each iteration draws the bordered prompt, keeps the bottom border alive
//! with a [`RedrawTimer`] while the line read is pending, then dispatches the
//! submitted line. The timer is always cancelled before anything else is
//! written, so a late redraw can never land in the middle of the border erase.

use super::command::Command;
use super::console::Console;
use super::display::{display_assistant_response, display_chat_header, display_error};
use super::input::LineSource;
use super::lang::handle_lang_command;
use super::prompt::{draw_prompt, erase_borders};
use super::redraw::RedrawTimer;
use super::spinner::start_thinking_spinner;
use crate::agent::{Agent, AgentError, ChatMessage, final_message};
use crate::config::DEFAULT_REDRAW_INTERVAL_MS;
use crate::export::handle_export_command;
use crate::i18n::get_message;
use crate::session::{ConversationHistory, LocaleContext, VideoMetadata, build_system_prompt};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// How a chat session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
    /// The user typed `exit` or `quit`.
    Quit,
    /// The input stream ended.
    InputClosed,
}

/// Everything a chat session reads or appends to.
pub struct ChatSession<'a> {
    pub agent: &'a dyn Agent,
    pub history: &'a mut ConversationHistory,
    pub metadata: &'a VideoMetadata,
    pub source_url: &'a str,
    pub locale: &'a mut LocaleContext,
    /// Transcript the agent was primed with, reused when its instructions are rebuilt.
    pub transcript: Option<&'a str>,
    pub export_dir: PathBuf,
    pub redraw_interval: Duration,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        agent: &'a dyn Agent,
        history: &'a mut ConversationHistory,
        metadata: &'a VideoMetadata,
        source_url: &'a str,
        locale: &'a mut LocaleContext,
    ) -> Self {
        Self {
            agent,
            history,
            metadata,
            source_url,
            locale,
            transcript: None,
            export_dir: PathBuf::from("."),
            redraw_interval: Duration::from_millis(DEFAULT_REDRAW_INTERVAL_MS),
        }
    }

    #[must_use]
    pub fn with_transcript(mut self, transcript: Option<&'a str>) -> Self {
        self.transcript = transcript;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    #[must_use]
    pub fn with_redraw_interval(mut self, interval: Duration) -> Self {
        self.redraw_interval = interval;
        self
    }
}

/// Run the chat until the user quits or input ends.
///
/// Takes ownership of `input` and drops it before returning.
pub async fn start_chat<L: LineSource>(
    console: &Console,
    mut input: L,
    session: ChatSession<'_>,
) -> io::Result<ChatExit> {
    display_chat_header(console, session.locale)?;

    loop {
        draw_prompt(console)?;
        let mut timer = RedrawTimer::start(console.clone(), session.redraw_interval);
        let line = input.read_line().await;
        timer.cancel().await;
        erase_borders(console)?;

        let Some(line) = line? else {
            tracing::debug!("Input closed, ending chat");
            say_goodbye(console, session.locale)?;
            drop(input);
            return Ok(ChatExit::InputClosed);
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Exit => {
                say_goodbye(console, session.locale)?;
                drop(input);
                return Ok(ChatExit::Quit);
            }
            Command::Export => {
                handle_export_command(
                    console,
                    &mut input,
                    session.history,
                    session.metadata,
                    session.source_url,
                    session.locale.locale,
                    &session.export_dir,
                )
                .await?;
            }
            Command::Lang => {
                let before = session.locale.locale;
                handle_lang_command(console, &mut input, session.locale).await?;
                if session.locale.locale != before {
                    // Replies follow the UI language
                    let prompt =
                        build_system_prompt(session.metadata, session.transcript, session.locale);
                    session.agent.set_system_prompt(prompt).await;
                }
            }
            Command::Message(text) => {
                run_turn(console, session.agent, session.history, session.locale, text).await?;
            }
        }
    }
}

fn say_goodbye(console: &Console, locale: &LocaleContext) -> io::Result<()> {
    console.println(format!("\n{}", get_message("chat_goodbye", locale.locale, &[])))
}

/// One user message and at most one agent reply.
async fn run_turn(
    console: &Console,
    agent: &dyn Agent,
    history: &mut ConversationHistory,
    locale: &LocaleContext,
    text: String,
) -> io::Result<()> {
    history.push_user(text.clone());

    let spinner = start_thinking_spinner(console, get_message("chat_thinking", locale.locale, &[]));
    let result = ask_agent(agent, text).await;
    spinner.stop().await?;

    match result {
        Ok((content, messages)) => {
            history.push_assistant(content.clone(), messages);
            display_assistant_response(console, &content)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Agent invocation failed");
            let error = e.to_string();
            display_error(console, "error_general", locale.locale, &[("error", error.as_str())])
        }
    }
}

async fn ask_agent(
    agent: &dyn Agent,
    text: String,
) -> Result<(String, Vec<ChatMessage>), AgentError> {
    let messages = agent.invoke(vec![ChatMessage::user(text)]).await?;
    let content = final_message(&messages)?.content.clone();
    Ok((content, messages))
}
