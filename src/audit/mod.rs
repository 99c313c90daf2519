mod log;

pub use log::{AuditLog, AuditLogError, AuditRecord};
