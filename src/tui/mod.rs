//! Line-oriented terminal front end: bordered prompt, spinners, markdown
//! replies and the interactive chat loop.

pub mod chat;
pub mod command;
pub mod console;
pub mod display;
pub mod input;
pub mod lang;
pub mod markdown;
pub mod prompt;
pub mod redraw;
pub mod spinner;
pub mod terminal;
pub(crate) mod util;

pub use chat::{ChatExit, ChatSession, start_chat};
pub use console::Console;
pub use input::{LineSource, StdinLines};
pub use markdown::render_markdown;
