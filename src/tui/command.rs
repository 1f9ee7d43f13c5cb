/// What a submitted prompt line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line; just re-prompt.
    Empty,
    /// `exit` or `quit`.
    Exit,
    /// `/export`
    Export,
    /// `/lang`
    Lang,
    /// Anything else goes to the agent, trimmed.
    Message(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" => Self::Exit,
            "/export" => Self::Export,
            "/lang" => Self::Lang,
            _ => Self::Message(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_empty() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse(" \t  "), Command::Empty);
    }

    #[test]
    fn exit_words_any_case() {
        for input in ["exit", "EXIT", "quit", "QUIT", "  Quit  "] {
            assert_eq!(Command::parse(input), Command::Exit, "{input}");
        }
    }

    #[test]
    fn slash_commands_any_case() {
        assert_eq!(Command::parse("/export"), Command::Export);
        assert_eq!(Command::parse("/EXPORT "), Command::Export);
        assert_eq!(Command::parse("/Lang"), Command::Lang);
    }

    #[test]
    fn everything_else_is_a_trimmed_message() {
        assert_eq!(
            Command::parse("  what is this video about?  "),
            Command::Message("what is this video about?".to_string())
        );
        assert_eq!(
            Command::parse("exit now"),
            Command::Message("exit now".to_string())
        );
        assert_eq!(
            Command::parse("/export md"),
            Command::Message("/export md".to_string())
        );
    }
}
