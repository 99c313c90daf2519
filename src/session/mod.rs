mod runtime_config;
mod session;
mod workspace;

pub use runtime_config::RuntimeConfig;
pub use session::{Session, SessionError};
pub use workspace::Workspace;
