use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::audit::{AuditLog, AuditLogError, AuditRecord};
use crate::commands::Command;
use crate::config::{SessionConfig, SessionConfigError};
use crate::ext::{TimestampExt, now_local};
use crate::namespace::AttachError;
use crate::session::{RuntimeConfig, Workspace};

const DEFAULT_USER: &str = "user";
const DEFAULT_AUDIT_LOG: &str = "emulator_log.csv";

/// The interactive driver: prompt, read, parse, execute, report, audit.
pub struct Session {
    user: String,
    workspace: Workspace,
    audit: AuditLog,
}

impl Session {
    pub async fn run(runtime: impl Into<RuntimeConfig>) -> Result<(), SessionError> {
        let runtime: RuntimeConfig = runtime.into();
        let config = SessionConfig::read(&runtime.config)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded session config: {:?}", config);

        let user = runtime
            .user
            .or(config.user)
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        let audit_path = runtime
            .audit_log
            .or(config.audit_log)
            .unwrap_or_else(|| DEFAULT_AUDIT_LOG.into());

        let audit = AuditLog::open(&audit_path).await.context(AuditSnafu)?;
        info!("Recording session audit to {}", audit_path.display());

        let workspace = Workspace::bootstrap().context(BootstrapSnafu)?;

        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            colored::control::set_override(false);
        }

        Session {
            user,
            workspace,
            audit,
        }
        .repl()
        .await
    }

    async fn repl(mut self) -> Result<(), SessionError> {
        let stdin = std::io::stdin();
        loop {
            self.print_prompt().context(PromptSnafu)?;

            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line).context(ReadInputSnafu)?;
            if read == 0 {
                info!("Standard input closed, ending session");
                self.record("exit", "").await?;
                break;
            }
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }

            match Command::parse(&line) {
                Ok(Command::Exit) => {
                    self.record("exit", "").await?;
                    break;
                }
                Ok(command) => {
                    let action = command.to_string();
                    match command.run(&self.workspace) {
                        Ok(output) => {
                            // ls output already carries one newline per entry.
                            if matches!(command, Command::Ls) {
                                print!("{output}");
                            } else {
                                println!("{output}");
                            }
                            self.record(&action, &output).await?;
                        }
                        Err(error) => {
                            let diagnostic = error.to_string();
                            println!("{diagnostic}");
                            self.record(&action, &diagnostic).await?;
                        }
                    }
                }
                Err(error) => {
                    let diagnostic = error.to_string();
                    eprintln!("{diagnostic}");
                    self.record(&format!("unknown command: {line}"), &diagnostic)
                        .await?;
                }
            }
        }
        Ok(())
    }

    fn print_prompt(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        write!(
            stdout,
            "{}@{}# ",
            self.user.green(),
            self.workspace.working_path().cyan()
        )?;
        stdout.flush()
    }

    /// Appends one audit record; the log is synced before this returns.
    async fn record(&mut self, action: &str, output: &str) -> Result<(), SessionError> {
        let timestamp = now_local().audit_timestamp();
        let record = AuditRecord {
            timestamp: &timestamp,
            user: &self.user,
            action,
            output,
        };
        self.audit.append(&record).await.context(AuditSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Critical failure encountered while loading the session config"))]
    ConfigError { source: SessionConfigError },
    #[snafu(display("Critical failure encountered in the audit log"))]
    AuditError { source: AuditLogError },
    #[snafu(display("Failed to build the startup namespace"))]
    BootstrapError { source: AttachError },
    #[snafu(display("Failed to write the prompt"))]
    PromptError { source: std::io::Error },
    #[snafu(display("Failed to read from standard input"))]
    ReadInputError { source: std::io::Error },
}
