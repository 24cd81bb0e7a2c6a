use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Read the config file (if any) and layer `ENCORE__SECTION__KEY`
    /// environment variables over it. Missing keys keep their defaults.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Range and emptiness checks the deserializer cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.player.volume) {
            return Err("player.volume must be within [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.player.notice_opacity) {
            return Err("player.notice_opacity must be within [0, 1]".to_string());
        }
        if self.player.storage_name.trim().is_empty() {
            return Err("player.storage_name must not be empty".to_string());
        }
        if let Some(i) = self.audio.iter().position(|t| t.url.trim().is_empty()) {
            return Err(format!("audio[{i}].url must not be empty"));
        }
        Ok(())
    }

    /// Preference file: the configured one, else `preferences.toml` beside
    /// the config file.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences.path.clone().or_else(|| {
            resolve_config_path().and_then(|p| p.parent().map(|d| d.join("preferences.toml")))
        })
    }
}

/// `ENCORE_CONFIG_PATH` when set, else [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// `encore/config.toml` under the XDG config home (`~/.config` when unset).
/// `None` without either variable.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("encore").join("config.toml"))
}
