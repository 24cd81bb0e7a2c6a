use std::io::{self, BufRead};
use std::str::FromStr;
use std::sync::mpsc::Sender;
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::sequencer::{LoopMode, OrderMode};

/// One line of stdin control input.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Next,
    Prev,
    Seek(f64),
    Volume(f64),
    Mute,
    Order(OrderMode),
    Loop(LoopMode),
    Goto(usize),
    Accent(usize, String),
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument {value:?} for `{command}`")]
    InvalidArgument { command: &'static str, value: String },
}

fn arg<'a>(
    command: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<&'a str, CommandError> {
    words.next().ok_or(CommandError::MissingArgument(command))
}

fn number<T: FromStr>(command: &'static str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for ControlCmd {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "quit" | "q" | "exit" => ControlCmd::Quit,
            "play" => ControlCmd::Play,
            "pause" => ControlCmd::Pause,
            "toggle" | "p" => ControlCmd::PlayPause,
            "next" | "n" => ControlCmd::Next,
            "prev" | "previous" => ControlCmd::Prev,
            "mute" => ControlCmd::Mute,
            "seek" => ControlCmd::Seek(number("seek", arg("seek", &mut words)?)?),
            "vol" | "volume" => ControlCmd::Volume(number("vol", arg("vol", &mut words)?)?),
            "goto" => ControlCmd::Goto(number("goto", arg("goto", &mut words)?)?),
            "order" => {
                let value = arg("order", &mut words)?;
                ControlCmd::Order(match value {
                    "list" | "sequential" => OrderMode::List,
                    "random" | "shuffle" => OrderMode::Random,
                    _ => {
                        return Err(CommandError::InvalidArgument {
                            command: "order",
                            value: value.to_string(),
                        });
                    }
                })
            }
            "loop" => {
                let value = arg("loop", &mut words)?;
                ControlCmd::Loop(match value {
                    "none" => LoopMode::NoLoop,
                    "one" => LoopMode::LoopOne,
                    "all" => LoopMode::LoopAll,
                    _ => {
                        return Err(CommandError::InvalidArgument {
                            command: "loop",
                            value: value.to_string(),
                        });
                    }
                })
            }
            "accent" => {
                let index = number("accent", arg("accent", &mut words)?)?;
                let color = arg("accent", &mut words)?.to_string();
                ControlCmd::Accent(index, color)
            }
            _ => return Err(CommandError::Unknown(head.to_string())),
        };
        Ok(cmd)
    }
}

/// Forward parsed stdin lines to `tx` from a background thread. The channel
/// disconnects when stdin closes.
pub fn spawn_stdin_reader(tx: Sender<ControlCmd>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ControlCmd>() {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{e}"),
            }
        }
        debug!("stdin closed");
    });
}
