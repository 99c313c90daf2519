use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;

/// Single-user shell session emulator over an in-memory namespace.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// User identifier shown in the prompt and recorded in the audit log
    #[clap(long, short)]
    pub user: Option<String>,

    /// Path of the append-only audit log
    #[clap(long)]
    pub audit_log: Option<PathBuf>,

    /// Path of the optional session settings file
    #[clap(long, short, default_value = "session.yaml")]
    pub config: PathBuf,
}
