use crate::config::{
    ClientConfig, ConfigLoadReport, ConfigOverride, ConfigOverrideSource, ConfigOverrides,
    ConfigPaths, ConfigResolvedFrom, ConfigSource, Deployment,
};
use crate::error::{UiError, UiResult};

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads client config with layering:
    /// defaults -> file -> env -> programmatic.
    pub fn load_json(
        paths: &ConfigPaths,
        defaults: &ConfigOverrides,
    ) -> UiResult<(ClientConfig, ConfigLoadReport)> {
        Self::load_json_with_overrides(paths, defaults, &ConfigOverrides::empty())
    }

    pub fn load_json_with_overrides(
        paths: &ConfigPaths,
        defaults: &ConfigOverrides,
        programmatic: &ConfigOverrides,
    ) -> UiResult<(ClientConfig, ConfigLoadReport)> {
        Self::load_layers(paths, defaults, &ConfigOverrides::from_env(), programmatic)
    }

    pub(crate) fn load_layers(
        paths: &ConfigPaths,
        defaults: &ConfigOverrides,
        env: &ConfigOverrides,
        programmatic: &ConfigOverrides,
    ) -> UiResult<(ClientConfig, ConfigLoadReport)> {
        let mut cfg = ClientConfig::default();

        let mut report = ConfigLoadReport {
            source: ConfigSource::Defaults,
            file: None,
            resolved_from: ConfigResolvedFrom::NotProvided,
            overrides: Vec::new(),
        };

        // 1) Defaults layer
        apply_overrides(&mut cfg, &mut report, ConfigOverrideSource::Defaults, defaults);

        // 2) File layer (optional)
        let mut file_used = false;
        if let Some(raw_path) = paths.file_path() {
            if let Some((resolved, from)) = resolve_file_optional(paths, raw_path) {
                report.file = Some(resolved.clone());
                report.resolved_from = from;

                let data = fs::read_to_string(&resolved).map_err(|e| {
                    UiError::Config(format!("read failed: path={:?} err={}", resolved, e))
                })?;

                let parsed: RootJson = serde_json::from_str(&data).map_err(|e| {
                    UiError::Config(format!("parse failed (json): path={:?} err={}", resolved, e))
                })?;

                apply_root(&mut cfg, &mut report, parsed)?;

                cfg.source = ConfigSource::File {
                    path: resolved.clone(),
                };
                report.source = cfg.source.clone();
                file_used = true;
            }
        }

        // 3) Env layer
        apply_overrides(&mut cfg, &mut report, ConfigOverrideSource::Env, env);

        // 4) Programmatic layer
        apply_overrides(
            &mut cfg,
            &mut report,
            ConfigOverrideSource::Programmatic,
            programmatic,
        );

        let mixed = report.overrides.iter().any(|o| {
            o.source == ConfigOverrideSource::Env || o.source == ConfigOverrideSource::Programmatic
        });

        if mixed {
            cfg.source = ConfigSource::Mixed;
            report.source = ConfigSource::Mixed;

            if !file_used {
                report.file = None;
                report.resolved_from = ConfigResolvedFrom::NotProvided;
            }
        }

        cfg.max_requests_per_pump = cfg.max_requests_per_pump.max(1);

        Ok((cfg, report))
    }
}

#[derive(Deserialize)]
struct RootJson {
    client: Option<ClientJson>,
    app: Option<AppJson>,
    logging: Option<LoggingJson>,
    extra: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct ClientJson {
    deployment: Option<String>,
    origin: Option<String>,
    dev_host: Option<String>,
    max_requests_per_pump: Option<u32>,
}

#[derive(Deserialize)]
struct AppJson {
    title: Option<String>,
    key: Option<String>,
}

#[derive(Deserialize)]
struct LoggingJson {
    level: Option<String>,
}

fn apply_root(
    cfg: &mut ClientConfig,
    report: &mut ConfigLoadReport,
    src: RootJson,
) -> UiResult<()> {
    let source = ConfigOverrideSource::File;

    if let Some(client) = src.client {
        if let Some(d) = client.deployment {
            let to = Deployment::parse(&d)
                .ok_or_else(|| UiError::Config(format!("unknown deployment '{d}'")))?;
            apply_deployment(report, source, &mut cfg.deployment, to);
        }
        if let Some(v) = client.origin {
            apply_string(report, source, "origin", &mut cfg.origin, v);
        }
        if let Some(v) = client.dev_host {
            apply_string(report, source, "dev_host", &mut cfg.dev_host, v);
        }
        if let Some(v) = client.max_requests_per_pump {
            apply_u32(
                report,
                source,
                "max_requests_per_pump",
                &mut cfg.max_requests_per_pump,
                v,
            );
        }
    }

    if let Some(app) = src.app {
        if let Some(v) = app.title {
            apply_string(report, source, "app_title", &mut cfg.app_title, v);
        }
        if let Some(v) = app.key {
            apply_string(report, source, "app_key", &mut cfg.app_key, v);
        }
    }

    if let Some(logging) = src.logging {
        if let Some(level) = logging.level {
            apply_string(report, source, "log_level", &mut cfg.log_level, level);
        }
    }

    if let Some(extra) = src.extra {
        for (k, v) in extra {
            apply_extra(report, source, &mut cfg.extra, k, v);
        }
    }

    Ok(())
}

fn apply_overrides(
    cfg: &mut ClientConfig,
    report: &mut ConfigLoadReport,
    source: ConfigOverrideSource,
    ov: &ConfigOverrides,
) {
    if let Some(v) = ov.deployment {
        apply_deployment(report, source, &mut cfg.deployment, v);
    }

    if let Some(v) = ov.origin.clone() {
        apply_string(report, source, "origin", &mut cfg.origin, v);
    }

    if let Some(v) = ov.dev_host.clone() {
        apply_string(report, source, "dev_host", &mut cfg.dev_host, v);
    }

    if let Some(v) = ov.max_requests_per_pump {
        apply_u32(
            report,
            source,
            "max_requests_per_pump",
            &mut cfg.max_requests_per_pump,
            v,
        );
    }

    if let Some(v) = ov.app_title.clone() {
        apply_string(report, source, "app_title", &mut cfg.app_title, v);
    }

    if let Some(v) = ov.app_key.clone() {
        apply_string(report, source, "app_key", &mut cfg.app_key, v);
    }

    if let Some(v) = ov.log_level.clone() {
        apply_string(report, source, "log_level", &mut cfg.log_level, v);
    }

    for (k, v) in &ov.extra {
        apply_extra(report, source, &mut cfg.extra, k.clone(), v.clone());
    }
}

fn apply_deployment(
    report: &mut ConfigLoadReport,
    source: ConfigOverrideSource,
    slot: &mut Deployment,
    to: Deployment,
) {
    if *slot == to {
        return;
    }
    let from = slot.to_string();
    *slot = to;
    report.overrides.push(ConfigOverride {
        key: "deployment",
        source,
        from,
        to: to.to_string(),
    });
}

fn apply_string(
    report: &mut ConfigLoadReport,
    source: ConfigOverrideSource,
    key: &'static str,
    slot: &mut String,
    to: String,
) {
    let from = slot.clone();
    if from == to {
        return;
    }
    *slot = to.clone();
    report.overrides.push(ConfigOverride {
        key,
        source,
        from,
        to,
    });
}

fn apply_u32(
    report: &mut ConfigLoadReport,
    source: ConfigOverrideSource,
    key: &'static str,
    slot: &mut u32,
    to: u32,
) {
    let from = slot.to_string();
    if *slot == to {
        return;
    }
    *slot = to;
    report.overrides.push(ConfigOverride {
        key,
        source,
        from,
        to: to.to_string(),
    });
}

fn apply_extra(
    report: &mut ConfigLoadReport,
    source: ConfigOverrideSource,
    slot: &mut HashMap<String, String>,
    k: String,
    v: String,
) {
    let from_v = slot.get(&k).cloned().unwrap_or_else(|| "<unset>".to_owned());
    if from_v == v {
        return;
    }
    slot.insert(k.clone(), v.clone());
    report.overrides.push(ConfigOverride {
        key: "extra",
        source,
        from: format!("{}={}", k, from_v),
        to: format!("{}={}", k, v),
    });
}

fn resolve_file_optional(paths: &ConfigPaths, raw: &Path) -> Option<(PathBuf, ConfigResolvedFrom)> {
    if raw.is_absolute() {
        return raw
            .is_file()
            .then(|| (raw.to_path_buf(), ConfigResolvedFrom::Absolute));
    }

    if let Ok(cwd) = std::env::current_dir() {
        let p = cwd.join(raw);
        if p.is_file() {
            return Some((p, ConfigResolvedFrom::Cwd));
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join(raw);
            if p.is_file() {
                return Some((p, ConfigResolvedFrom::ExeDir));
            }
        }
    }

    if let Some(root) = paths.root_dir.as_deref() {
        let p = root.join(raw);
        if p.is_file() {
            return Some((p, ConfigResolvedFrom::RootDir));
        }
    }

    let as_is = raw.to_path_buf();
    if as_is.is_file() {
        return Some((as_is, ConfigResolvedFrom::AsIs));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("x2ui.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_when_no_file() {
        let (cfg, report) = ConfigLoader::load_layers(
            &ConfigPaths::none(),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
        )
        .unwrap();

        assert!(report.is_defaults());
        assert!(!report.has_overrides());
        assert_eq!(cfg.deployment, Deployment::Admin);
        assert_eq!(cfg.max_requests_per_pump, 1);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let paths = ConfigPaths::new("/definitely/not/here/x2ui.json", None);
        let (_, report) = ConfigLoader::load_layers(
            &paths,
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
        )
        .unwrap();
        assert!(report.used_file().is_none());
    }

    #[test]
    fn file_then_env_then_programmatic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "client": { "deployment": "setup", "origin": "https://a.example" },
                "logging": { "level": "debug" },
                "extra": { "tenant": "blue" }
            }"#,
        );

        let env = ConfigOverrides {
            origin: Some("https://b.example".to_owned()),
            ..ConfigOverrides::empty()
        };
        let programmatic = ConfigOverrides {
            max_requests_per_pump: Some(0),
            ..ConfigOverrides::empty()
        };

        let (cfg, report) = ConfigLoader::load_layers(
            &ConfigPaths::new(path.clone(), None),
            &ConfigOverrides::empty(),
            &env,
            &programmatic,
        )
        .unwrap();

        assert!(matches!(report.source, ConfigSource::Mixed));
        assert_eq!(report.used_file(), Some(path.as_path()));
        assert_eq!(cfg.deployment, Deployment::Setup);
        assert_eq!(cfg.app_root(), "https://b.example/jemo/setup");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.extra.get("tenant").map(String::as_str), Some("blue"));
        assert_eq!(cfg.max_requests_per_pump, 1);

        let origin: Vec<_> = report
            .overrides
            .iter()
            .filter(|o| o.key == "origin")
            .map(|o| o.source)
            .collect();
        assert_eq!(
            origin,
            vec![ConfigOverrideSource::File, ConfigOverrideSource::Env]
        );
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{ not json");
        let err = ConfigLoader::load_layers(
            &ConfigPaths::new(path, None),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
        )
        .unwrap_err();
        assert!(matches!(err, UiError::Config(_)));
    }

    #[test]
    fn unknown_deployment_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"{ "client": { "deployment": "moon" } }"#);
        let err = ConfigLoader::load_layers(
            &ConfigPaths::new(path, None),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
            &ConfigOverrides::empty(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("moon"));
    }
}
