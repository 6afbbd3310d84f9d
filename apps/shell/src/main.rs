use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

use x2ui_core::{ConfigLoader, ConfigOverrides, ConfigPaths};
use x2ui_modules_logging::{ConsoleLogger, ConsoleLoggerConfig};
use x2ui_transport::UreqTransport;
use x2ui_ui::{Client, ClientEffect};
use x2ui_view::{ApplicationFeature, ResponseRoute, ResponseView};

/// What the host does after booting, read from the environment.
#[derive(Debug, Clone, Default)]
struct ShellStartup {
    /// JSON config file (`X2UI_CONFIG`).
    config: Option<String>,
    /// Local view description rendered without a server (`X2UI_VIEW_PATH`).
    view_path: Option<String>,
    /// Backend whose feature panel is opened after start (`X2UI_FEATURE`).
    feature: Option<String>,
    /// Loads the menus from the server (`X2UI_START`, default on unless a view file is given).
    start: bool,
}

impl ShellStartup {
    fn from_env() -> Self {
        let get = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        let view_path = get("X2UI_VIEW_PATH");
        let start = get("X2UI_START")
            .map(|v| v != "0")
            .unwrap_or(view_path.is_none());
        Self {
            config: get("X2UI_CONFIG"),
            view_path,
            feature: get("X2UI_FEATURE"),
            start,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let startup = ShellStartup::from_env();

    let paths = ConfigPaths::file_optional(startup.config.as_deref(), None);
    let (config, report) = ConfigLoader::load_json(&paths, &ConfigOverrides::empty())
        .context("loading client config")?;

    let mut logger =
        ConsoleLogger::new(ConsoleLoggerConfig::from_env().with_client_config(&config));
    logger.init()?;

    match report.used_file() {
        Some(file) => info!("shell: config from {} ({:?})", file.display(), report.resolved_from),
        None => info!("shell: config defaults"),
    }
    for o in &report.overrides {
        info!("shell: override {} {:?}: {} -> {}", o.key, o.source, o.from, o.to);
    }
    info!("shell: app root {}", config.app_root());

    let mut client = Client::new(&config, Arc::new(UreqTransport::new()));

    if startup.start {
        client.start()?;
        client.run_until_idle()?;
    }

    if let Some(backend) = startup.feature.as_deref() {
        client.open_feature(&ApplicationFeature {
            title: Some(backend.to_owned()),
            backend: Some(backend.to_owned()),
            ..Default::default()
        })?;
        client.run_until_idle()?;
    }

    if let Some(path) = startup.view_path.as_deref() {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let view = ResponseView::parse(&raw).with_context(|| format!("parsing {path}"))?;
        match view.route() {
            ResponseRoute::Panel => client.run_feature(&view)?,
            _ => {
                let body = client.shell().feature_body;
                client.run_action(&view, Some(body))?;
            }
        }
        client.run_until_idle()?;
    }

    for effect in client.take_effects() {
        match effect {
            ClientEffect::Navigate(url) => info!("shell: navigate to {url}"),
            ClientEffect::Download(url) => info!("shell: download {url}"),
            ClientEffect::SignedOut => warn!("shell: signed out"),
        }
    }

    println!("{}", client.to_html());
    Ok(())
}
