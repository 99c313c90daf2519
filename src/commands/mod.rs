mod command;

pub use command::{Command, CommandError, ParseError};
