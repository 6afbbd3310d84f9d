use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub file: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
}

impl ConfigPaths {
    #[inline]
    pub fn new<P>(file: P, root_dir: Option<PathBuf>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            file: Some(file.into()),
            root_dir,
        }
    }

    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn file_optional(file: Option<&str>, root_dir: Option<PathBuf>) -> Self {
        Self {
            file: file.map(PathBuf::from),
            root_dir,
        }
    }

    #[inline]
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Which server application the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    #[default]
    Admin,
    Setup,
    Development,
}

impl Deployment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "production" | "prod" => Some(Self::Admin),
            "setup" => Some(Self::Setup),
            "development" | "dev" | "local" => Some(Self::Development),
            _ => None,
        }
    }

    /// Request path prefix on the production origin; `None` for local development.
    #[inline]
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("/jemo/admin"),
            Self::Setup => Some("/jemo/setup"),
            Self::Development => None,
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Setup => "setup",
            Self::Development => "development",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    #[default]
    Defaults,
    File {
        path: PathBuf,
    },
    Mixed,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub source: ConfigSource,

    pub deployment: Deployment,
    pub origin: String,
    pub dev_host: String,
    pub max_requests_per_pump: u32,

    /// Application title shown after sign-in.
    pub app_title: String,
    /// Short application key shown in the side menu header.
    pub app_key: String,

    pub log_level: String,

    pub extra: HashMap<String, String>,
}

impl Default for ClientConfig {
    #[inline]
    fn default() -> Self {
        Self {
            source: ConfigSource::Defaults,

            deployment: Deployment::Admin,
            origin: "http://localhost:8080".to_owned(),
            dev_host: "http://localhost:8080".to_owned(),
            max_requests_per_pump: 1,

            app_title: "X2".to_owned(),
            app_key: "X2".to_owned(),

            log_level: "info".to_owned(),

            extra: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Base every endpoint is resolved against: `<origin><prefix>` or the development host.
    pub fn app_root(&self) -> String {
        match self.deployment.prefix() {
            Some(prefix) => format!("{}{}", self.origin.trim_end_matches('/'), prefix),
            None => self.dev_host.trim_end_matches('/').to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideSource {
    Defaults,
    File,
    Env,
    Programmatic,
}

#[derive(Debug, Clone)]
pub struct ConfigOverride {
    pub key: &'static str,
    pub source: ConfigOverrideSource,
    pub from: String,
    pub to: String,
}

/// Optional values applied over the file layer (env and programmatic layers).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub deployment: Option<Deployment>,
    pub origin: Option<String>,
    pub dev_host: Option<String>,
    pub max_requests_per_pump: Option<u32>,
    pub app_title: Option<String>,
    pub app_key: Option<String>,
    pub log_level: Option<String>,
    pub extra: HashMap<String, String>,
}

impl ConfigOverrides {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let deployment = get("X2UI_DEPLOYMENT").and_then(|v| {
            let parsed = Deployment::parse(&v);
            if parsed.is_none() {
                log::warn!("config: ignoring unknown X2UI_DEPLOYMENT '{v}'");
            }
            parsed
        });

        Self {
            deployment,
            origin: get("X2UI_ORIGIN").filter(|v| !v.trim().is_empty()),
            dev_host: get("X2UI_DEV_HOST").filter(|v| !v.trim().is_empty()),
            max_requests_per_pump: get("X2UI_MAX_REQUESTS_PER_PUMP")
                .and_then(|v| v.trim().parse::<u32>().ok()),
            app_title: get("X2UI_APP_TITLE").filter(|v| !v.trim().is_empty()),
            app_key: get("X2UI_APP_KEY").filter(|v| !v.trim().is_empty()),
            log_level: get("X2UI_LOG").filter(|v| !v.trim().is_empty()),
            extra: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum ConfigResolvedFrom {
    /// Path was absolute and existed.
    Absolute,
    /// Found as `cwd/<file>`.
    Cwd,
    /// Found as `exe_dir/<file>`.
    ExeDir,
    /// Found as `root_dir/<file>`.
    RootDir,
    /// Found as-is (relative) in OS resolution.
    AsIs,
    /// No file path was provided.
    #[default]
    NotProvided,
}

#[derive(Debug, Clone)]
pub struct ConfigLoadReport {
    pub source: ConfigSource,
    /// The actual file used (absolute when found).
    pub file: Option<PathBuf>,
    pub resolved_from: ConfigResolvedFrom,
    pub overrides: Vec<ConfigOverride>,
}

impl ConfigLoadReport {
    #[inline]
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    #[inline]
    pub fn is_defaults(&self) -> bool {
        matches!(self.source, ConfigSource::Defaults)
    }

    #[inline]
    pub fn used_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_root_follows_deployment() {
        let mut cfg = ClientConfig::default();
        assert_eq!(cfg.app_root(), "http://localhost:8080/jemo/admin");

        cfg.deployment = Deployment::Setup;
        cfg.origin = "https://x2.example.com/".to_owned();
        assert_eq!(cfg.app_root(), "https://x2.example.com/jemo/setup");

        cfg.deployment = Deployment::Development;
        cfg.dev_host = "http://127.0.0.1:8081".to_owned();
        assert_eq!(cfg.app_root(), "http://127.0.0.1:8081");
    }

    #[test]
    fn env_lookup_ignores_unknown_deployment() {
        let ov = ConfigOverrides::from_lookup(|k| match k {
            "X2UI_DEPLOYMENT" => Some("moon".to_owned()),
            "X2UI_MAX_REQUESTS_PER_PUMP" => Some(" 4 ".to_owned()),
            _ => None,
        });
        assert_eq!(ov.deployment, None);
        assert_eq!(ov.max_requests_per_pump, Some(4));
        assert!(ov.origin.is_none());
    }
}
