use snafu::{ResultExt, Snafu};

use crate::ext::{TimestampExt, now_local};
use crate::namespace::{NodeKind, ResolveError};
use crate::session::Workspace;

/// One parsed input line. Rendering a command (`Display`) yields the verbatim
/// action text recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Command {
    #[display("pwd")]
    Pwd,
    #[display("ls")]
    Ls,
    #[display("cat {path}")]
    Cat { path: String },
    #[display("date")]
    Date,
    #[display("exit")]
    Exit,
}

impl Command {
    /// Maps one input line to a command.
    ///
    /// Matching is exact: no trimming, and `cat` requires its argument
    /// separator. The remainder after `cat ` is taken verbatim, spaces and
    /// all, and may be empty.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "pwd" => Ok(Command::Pwd),
            "ls" => Ok(Command::Ls),
            "date" => Ok(Command::Date),
            "exit" => Ok(Command::Exit),
            _ => input
                .strip_prefix("cat ")
                .map(|path| Command::Cat {
                    path: path.to_string(),
                })
                .ok_or_else(|| ParseError::UnknownCommand {
                    input: input.to_string(),
                }),
        }
    }

    /// Runs the command against the workspace and returns its output text.
    ///
    /// The `Display` message of an error is the diagnostic the session
    /// reports, both on the console and in the audit record.
    pub fn run(&self, workspace: &Workspace) -> Result<String, CommandError> {
        match self {
            Command::Pwd => Ok(workspace.working_path()),
            Command::Ls => Ok(list_entries(workspace)),
            Command::Cat { path } => read_file(workspace, path),
            Command::Date => Ok(now_local().display_timestamp()),
            Command::Exit => Ok(String::new()),
        }
    }
}

/// One child name per line in insertion order, each line newline-terminated.
/// An empty directory produces empty output.
fn list_entries(workspace: &Workspace) -> String {
    workspace
        .namespace()
        .child_names(workspace.cwd())
        .fold(String::new(), |mut out, name| {
            out.push_str(name);
            out.push('\n');
            out
        })
}

fn read_file(workspace: &Workspace, path: &str) -> Result<String, CommandError> {
    let namespace = workspace.namespace();
    let id = namespace
        .resolve(workspace.cwd(), path)
        .context(EntryNotFoundSnafu { path })?;
    match namespace.node(id).kind() {
        NodeKind::Directory { .. } => IsADirectorySnafu { path }.fail(),
        NodeKind::File { content } => Ok(content.clone()),
    }
}

#[derive(Debug, Snafu)]
pub enum ParseError {
    #[snafu(display("Command not found."))]
    UnknownCommand { input: String },
}

#[derive(Debug, Snafu)]
pub enum CommandError {
    /// Covers every resolution failure: a missing entry and a descent
    /// through a file report the same diagnostic.
    #[snafu(display("File not found."))]
    EntryNotFound { path: String, source: ResolveError },
    #[snafu(display("Cannot display content of a directory."))]
    IsADirectory { path: String },
}
