use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const AUDIT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:none] [hour]:[minute]:[second] [year]"
);

/// Current local wall-clock time, falling back to UTC when the local offset
/// cannot be determined.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub trait TimestampExt {
    /// Second-precision `YYYY-MM-DD HH:MM:SS` rendering used for audit
    /// records.
    fn audit_timestamp(&self) -> String;

    /// Human-readable rendering used by the `date` command.
    fn display_timestamp(&self) -> String;
}

impl TimestampExt for OffsetDateTime {
    fn audit_timestamp(&self) -> String {
        self.format(AUDIT_FORMAT)
            .unwrap_or_else(|_| String::from("0000-00-00 00:00:00"))
    }

    fn display_timestamp(&self) -> String {
        self.format(DISPLAY_FORMAT)
            .unwrap_or_else(|_| self.unix_timestamp().to_string())
    }
}
