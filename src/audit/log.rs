use std::path::Path;

use compio::fs::{File, OpenOptions};
use compio::io::AsyncWriteAtExt;
use snafu::{ResultExt, Snafu};
use tracing::debug;

/// One audit entry. Every interactive command produces exactly one, failed
/// commands included (their diagnostic becomes the output field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord<'a> {
    /// Second-precision local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: &'a str,
    pub user: &'a str,
    /// Verbatim command text.
    pub action: &'a str,
    /// Captured output text, possibly spanning multiple lines.
    pub output: &'a str,
}

impl AuditRecord<'_> {
    /// CSV rendering: four double-quoted fields, embedded quotes doubled.
    fn to_csv_line(&self) -> String {
        let mut line = String::new();
        let fields = [self.timestamp, self.user, self.action, self.output];
        for (index, field) in fields.into_iter().enumerate() {
            if index > 0 {
                line.push(',');
            }
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        }
        line.push('\n');
        line
    }
}

/// Append-only CSV record store.
///
/// Every append is synced to the device before it returns, so a recorded
/// command survives abnormal termination.
pub struct AuditLog {
    file: File,
    offset: u64,
}

impl AuditLog {
    /// Opens the log at `path`, creating it if absent, positioned after any
    /// records from earlier sessions.
    pub async fn open(path: &Path) -> Result<Self, AuditLogError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .await
            .context(OpenSnafu {
                file_path: path.display().to_string(),
            })?;
        let offset = compio::fs::metadata(path)
            .await
            .context(OpenSnafu {
                file_path: path.display().to_string(),
            })?
            .len();
        debug!("Audit log opened at offset {}", offset);
        Ok(AuditLog { file, offset })
    }

    pub async fn append(&mut self, record: &AuditRecord<'_>) -> Result<(), AuditLogError> {
        let bytes = record.to_csv_line().into_bytes();
        let length = bytes.len() as u64;
        let result = self.file.write_all_at(bytes, self.offset).await;
        result.0.context(WriteSnafu)?;
        self.offset += length;
        self.file.sync_data().await.context(FlushSnafu)?;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum AuditLogError {
    #[snafu(display("Failed to open the audit log at {}", file_path))]
    OpenError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to append an audit record"))]
    WriteError { source: std::io::Error },
    #[snafu(display("Failed to flush the audit log"))]
    FlushError { source: std::io::Error },
}
