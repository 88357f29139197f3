//! The `/bluejeans` slash command: registration data and parsing.

use thiserror::Error;

/// Slash command trigger, without the leading slash.
pub const TRIGGER: &str = "bluejeans";

/// Help text listing the available actions.
pub const COMMAND_HELP: &str = "* |/bluejeans start| - Start a BlueJeans meeting.";

/// Registration data for the chat platform's command registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub trigger: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub auto_complete: bool,
    pub auto_complete_desc: &'static str,
    pub auto_complete_hint: &'static str,
}

impl CommandDefinition {
    pub fn bluejeans() -> Self {
        Self {
            trigger: TRIGGER,
            display_name: "BlueJeans",
            description: "Integration with BlueJeans.",
            auto_complete: true,
            auto_complete_desc: "Available commands: start",
            auto_complete_hint: "[command]",
        }
    }
}

/// A parsed `/bluejeans` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start (or point to) the caller's personal meeting.
    Start,
    Help,
    Unknown(String),
}

impl Action {
    fn from_word(word: &str) -> Self {
        match word {
            "start" => Self::Start,
            "help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Reasons a command line is not a usable `/bluejeans` invocation.
///
/// The `Display` text is the reply shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Please enter a command. Try /bluejeans start.")]
    Empty,

    #[error("Command '{0}' is not /bluejeans. Please try again.")]
    WrongTrigger(String),

    #[error("Please specify an action for /bluejeans command.")]
    MissingAction,
}

/// Parses a raw command line such as `/bluejeans start`.
///
/// Tokens after the action are ignored.
pub fn parse(text: &str) -> Result<Action, ParseError> {
    let mut words = text.split_whitespace();

    let command = words.next().ok_or(ParseError::Empty)?;
    if command != format!("/{}", TRIGGER) {
        return Err(ParseError::WrongTrigger(command.to_string()));
    }

    words
        .next()
        .map(Action::from_word)
        .ok_or(ParseError::MissingAction)
}
