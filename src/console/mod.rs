//! Console module
//!
//! Line-oriented command interface over the tracker, used by `yada-console`.

pub mod command;
mod dispatch;

pub use command::{parse, tokenize, Command, ParseError, HELP};
pub use dispatch::execute;

use crate::tracker::Tracker;

/// Result of handling one input line
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Parse and run one line of input
pub fn handle_line(tracker: &mut Tracker, line: &str) -> Reply {
    match parse(line) {
        Ok(Some(Command::Quit)) => Reply::Quit,
        Ok(Some(command)) => Reply::Output(execute(tracker, command)),
        Ok(None) => Reply::Output(String::new()),
        Err(e) => Reply::Output(e.to_string()),
    }
}
