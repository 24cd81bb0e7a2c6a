use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::player::Player;

use super::ControlCmd;

const TICK: Duration = Duration::from_millis(50);

/// Apply stdin commands and pump the player until `quit` or stdin closes.
pub fn run(
    player: &Player,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match control_rx.recv_timeout(TICK) {
            Ok(cmd) => {
                if handle_control_cmd(cmd, player) {
                    return Ok(());
                }
                while let Ok(cmd) = control_rx.try_recv() {
                    if handle_control_cmd(cmd, player) {
                        return Ok(());
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("input closed, shutting down");
                return Ok(());
            }
        }
        player.pump();
    }
}

/// Returns `true` when shutdown is requested.
fn handle_control_cmd(cmd: ControlCmd, player: &Player) -> bool {
    debug!(?cmd, "control command");
    let result = match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => player.play(),
        ControlCmd::Pause => {
            player.pause();
            Ok(())
        }
        ControlCmd::PlayPause => player.toggle(),
        ControlCmd::Next => player.skip_forward(),
        ControlCmd::Prev => player.skip_back(),
        ControlCmd::Seek(secs) => {
            player.seek(secs);
            Ok(())
        }
        ControlCmd::Volume(level) => {
            player.set_volume(level, true);
            Ok(())
        }
        ControlCmd::Mute => {
            player.toggle_mute();
            Ok(())
        }
        ControlCmd::Order(order) => {
            player.set_order(order);
            Ok(())
        }
        ControlCmd::Loop(looping) => {
            player.set_loop(looping);
            Ok(())
        }
        ControlCmd::Goto(index) => player.switch_to(index),
        ControlCmd::Accent(index, color) => player.set_accent(index, color),
    };
    if let Err(e) = result {
        warn!(error = %e, "command failed");
    }
    false
}
