use std::env;
use std::path::Path;
use std::sync::mpsc;

use tracing::{info, warn};

use crate::library::scan;
use crate::player::Player;
use crate::sink::RodioSink;
use crate::surface::LogSurface;

mod command;
mod event_loop;
mod settings;

pub use command::{CommandError, ControlCmd};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = settings::load_settings();

    let tracks = match env::args().nth(1) {
        Some(dir) => scan(Path::new(&dir), &settings.library),
        None if !settings.audio.is_empty() => settings.audio.clone(),
        None => {
            let dir = env::current_dir().unwrap_or_else(|_| "Music".into());
            scan(&dir, &settings.library)
        }
    };
    if tracks.is_empty() {
        warn!("nothing to play");
    }

    let sink = RodioSink::open_default()?;
    let player = Player::builder(Box::new(sink))
        .options(settings.player.clone())
        .playlist(tracks)
        .surface(Box::new(LogSurface))
        .preferences(settings::open_preferences(&settings))
        .build()?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    command::spawn_stdin_reader(control_tx);
    info!("reading commands from stdin; `quit` to exit");

    let result = event_loop::run(&player, &control_rx);
    player.destroy();
    result
}
