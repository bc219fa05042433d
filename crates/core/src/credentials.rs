use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use ini::Ini;
use tracing::debug;

use crate::error::{ConfigurationError, Result};

const CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

/// Locations of the shared credential profile store. A location is `None`
/// when it is neither overridden nor derivable from the home directory.
#[derive(Debug, Clone)]
pub struct ProfileFiles {
    pub credentials: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl ProfileFiles {
    /// Uses the environment overrides when set, otherwise `~/.aws/credentials`
    /// and `~/.aws/config`.
    pub fn locate() -> Self {
        Self::resolve(
            dirs::home_dir(),
            env::var_os(CREDENTIALS_FILE_ENV),
            env::var_os(CONFIG_FILE_ENV),
        )
    }

    fn resolve(
        home_dir: Option<PathBuf>,
        credentials_override: Option<OsString>,
        config_override: Option<OsString>,
    ) -> Self {
        let aws_dir = home_dir.map(|home| home.join(".aws"));
        if aws_dir.is_none() {
            debug!("home directory not available");
        }

        Self {
            credentials: credentials_override
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join("credentials"))),
            config: config_override
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join("config"))),
        }
    }

    /// Checks that `profile` is defined in either file.
    ///
    /// When neither file exists nothing can be checked and the profile is
    /// accepted; credentials may still come from the environment.
    pub fn ensure_profile(&self, profile: &str) -> Result<()> {
        let mut searched = Vec::new();

        if let Some((path, file)) = load(self.credentials.as_deref())? {
            searched.push(path.display().to_string());
            if file.section(Some(profile)).is_some() {
                return Ok(());
            }
        }

        if let Some((path, file)) = load(self.config.as_deref())? {
            searched.push(path.display().to_string());
            let prefixed = format!("profile {profile}");
            if file.section(Some(prefixed.as_str())).is_some()
                || (profile == "default" && file.section(Some("default")).is_some())
            {
                return Ok(());
            }
        }

        if searched.is_empty() {
            debug!(profile, "no shared profile files found, skipping profile check");
            return Ok(());
        }

        Err(ConfigurationError::ProfileNotFound {
            profile: profile.to_string(),
            searched: searched.join(", "),
        }
        .into())
    }
}

fn load(path: Option<&Path>) -> Result<Option<(&Path, Ini)>> {
    let Some(path) = path.filter(|path| path.exists()) else {
        return Ok(None);
    };
    Ini::load_from_file(path)
        .map(|file| Some((path, file)))
        .map_err(|error| match error {
            ini::Error::Io(io_error) => io_error.into(),
            ini::Error::Parse(parse_error) => ConfigurationError::InvalidFile {
                path: path.display().to_string(),
                reason: parse_error.to_string(),
            }
            .into(),
        })
}
