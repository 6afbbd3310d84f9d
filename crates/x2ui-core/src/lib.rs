pub mod bus;
pub mod config;
pub mod error;
pub mod sched;

pub use bus::Bus;
pub use config::{
    ClientConfig, ConfigLoadReport, ConfigLoader, ConfigOverride, ConfigOverrideSource,
    ConfigOverrides, ConfigPaths, ConfigResolvedFrom, ConfigSource, Deployment,
};
pub use error::{UiError, UiResult};
pub use sched::{Scheduler, TimerId, TimerKind};
