use std::time::Duration;

use serde::Deserialize;

use crate::sequencer::{LoopMode, OrderMode};

/// Construction-time settings of a player, also the `[player]` config table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    pub autoplay: bool,
    /// Pause every other registered player when this one starts.
    pub mutex: bool,
    pub order: OrderMode,
    #[serde(rename = "loop")]
    pub looping: LoopMode,
    /// Initial volume when no stored preference exists.
    pub volume: f64,
    /// Default accent color for tracks without their own.
    pub theme: String,
    /// Namespace of the stored preferences.
    pub storage_name: String,
    pub notice_ms: u64,
    pub notice_opacity: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            mutex: true,
            order: OrderMode::List,
            looping: LoopMode::LoopAll,
            volume: 0.7,
            theme: "#b7daff".to_string(),
            storage_name: "encore-setting".to_string(),
            notice_ms: 2000,
            notice_opacity: 0.8,
        }
    }
}

impl PlayerOptions {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }
}
