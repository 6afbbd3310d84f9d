mod client;
mod loader;

pub use client::{
    ClientConfig, ConfigLoadReport, ConfigOverride, ConfigOverrideSource, ConfigOverrides,
    ConfigPaths, ConfigResolvedFrom, ConfigSource, Deployment,
};
pub use loader::ConfigLoader;
