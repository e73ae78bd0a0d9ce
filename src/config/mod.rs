mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LogSettings, ServerSettings, Settings, StreamSettings};

/// Prefix of the structured environment overrides, e.g. `CHATCAST_STREAM__BUFFER_CAPACITY`.
pub const ENV_PREFIX: &str = "CHATCAST";

/// Loads the configuration from `config/default` and the environment.
///
/// Precedence, lowest first: defaults, the optional file, `CHATCAST_*`
/// variables, then the plain `PORT` variable. A blank `PORT` counts as unset.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Like [`load_config`], reading the optional file at `path` (extension optional).
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option(
            "server.port",
            std::env::var("PORT").ok().filter(|p| !p.trim().is_empty()),
        )?;

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            static_dir: partial
                .server
                .as_ref()
                .and_then(|s| s.static_dir.clone())
                .unwrap_or(default.server.static_dir),
        },
        stream: StreamSettings {
            buffer_capacity: partial
                .stream
                .as_ref()
                .and_then(|s| s.buffer_capacity)
                .filter(|&c| c > 0)
                .unwrap_or(default.stream.buffer_capacity),
            keep_alive_secs: partial
                .stream
                .as_ref()
                .and_then(|s| s.keep_alive_secs)
                .unwrap_or(default.stream.keep_alive_secs),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}
