use tracing::{debug, warn};

use crate::config;
use crate::prefs::{MemoryPreferences, PreferenceStore, TomlPreferences};

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// The on-disk store under the configured storage name, or an in-memory one
/// when no location is known or the file is unreadable.
pub fn open_preferences(settings: &config::Settings) -> Box<dyn PreferenceStore> {
    let Some(path) = settings.preferences_path() else {
        debug!("no preference location; volume will not persist");
        return Box::new(MemoryPreferences::new());
    };
    match TomlPreferences::open(path.clone(), &settings.player.storage_name) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preferences unavailable");
            Box::new(MemoryPreferences::new())
        }
    }
}
