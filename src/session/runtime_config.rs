use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub user: Option<String>,
    pub audit_log: Option<PathBuf>,
    pub config: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            user: cli.user,
            audit_log: cli.audit_log,
            config: cli.config,
        }
    }
}
