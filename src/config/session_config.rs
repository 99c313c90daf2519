use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

/// Optional session settings file. Every key may be omitted; a missing file
/// is equivalent to an empty configuration.
///
/// ```yaml
/// user: alice
/// audit_log: /var/log/session_audit.csv
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub user: Option<String>,
    pub audit_log: Option<PathBuf>,
}

impl SessionConfig {
    pub async fn read(path: &Path) -> Result<Self, SessionConfigError> {
        debug!("Reading session config from {}", path.display());
        let bytes = match compio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No session config found, using defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };
        let contents = String::from_utf8(bytes).ok().context(NotUtf8Snafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }
}

impl TryFrom<&str> for SessionConfig {
    type Error = SessionConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| SessionConfigError::ParseError { source: e })?;
        let document = documents
            .first()
            .ok_or(SessionConfigError::MalformedConfig)?;

        let top_level = document
            .as_mapping()
            .ok_or(SessionConfigError::TopLevelNotMap)?;

        let mut config = SessionConfig::default();
        for (key, value) in top_level.iter() {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };
            match key.as_ref() {
                "user" => config.user = value.as_str().map(str::to_string),
                "audit_log" => config.audit_log = value.as_str().map(PathBuf::from),
                other => debug!("Skipping unknown config key: {}", other),
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum SessionConfigError {
    #[snafu(display("Failed to read the session config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Session config file {} is not valid UTF-8", file_path))]
    NotUtf8 { file_path: String },
    #[snafu(display("Failed to parse the session config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted session config file"))]
    MalformedConfig,
    #[snafu(display("Top level of the session config should be a map"))]
    TopLevelNotMap,
}
