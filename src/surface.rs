//! The render surface: a pure sink for displayed state.
//!
//! The engine describes every UI mutation as a [`Change`]. A [`Renderer`]
//! folds changes into a [`View`] and forwards only the ones that alter what
//! is displayed, so re-applying the same value never reaches the surface.

mod record;
mod time;

pub use record::{LogSurface, RecordingSurface};
pub use time::format_clock;

use std::collections::BTreeMap;

/// Which affordance the play/pause button shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    /// Paused: the button offers "play".
    Play,
    /// Playing: the button offers "pause".
    Pause,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Icon {
    Play,
    Pause,
    VolumeUp,
    VolumeDown,
    VolumeOff,
}

impl Icon {
    /// Three-tier volume glyph.
    pub fn for_volume(volume: f64) -> Self {
        if volume >= 0.95 {
            Icon::VolumeUp
        } else if volume > 0.0 {
            Icon::VolumeDown
        } else {
            Icon::VolumeOff
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bar {
    Played,
    Loaded,
    Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Button(ButtonState),
    /// `None` blanks the glyph while the button swaps.
    ButtonIcon(Option<Icon>),
    Elapsed(String),
    Total(String),
    /// Fill ratio in `[0, 1]`.
    Bar(Bar, f64),
    VolumeIcon(Icon),
    Loading(bool),
    Notice {
        text: String,
        opacity: f64,
    },
    NowPlaying {
        index: usize,
        title: String,
        artist: String,
        cover: Option<String>,
    },
    ListAccent {
        index: usize,
        color: String,
    },
    /// Accent targets of the active track (cover, played bar, thumb, volume bar).
    Accent(String),
}

pub trait Surface {
    fn apply(&mut self, change: &Change);
}

/// Last displayed value of every handle. `None` means never set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub button: Option<ButtonState>,
    pub button_icon: Option<Option<Icon>>,
    pub elapsed: Option<String>,
    pub total: Option<String>,
    pub bars: BTreeMap<Bar, f64>,
    pub volume_icon: Option<Icon>,
    pub loading: bool,
    pub notice: Option<(String, f64)>,
    pub now_playing: Option<(usize, String, String, Option<String>)>,
    pub list_accents: BTreeMap<usize, String>,
    pub accent: Option<String>,
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl View {
    /// Fold `change` in. Returns false when it was already displayed.
    pub fn apply(&mut self, change: &Change) -> bool {
        match change {
            Change::Button(b) => replace(&mut self.button, Some(*b)),
            Change::ButtonIcon(i) => replace(&mut self.button_icon, Some(*i)),
            Change::Elapsed(t) => replace(&mut self.elapsed, Some(t.clone())),
            Change::Total(t) => replace(&mut self.total, Some(t.clone())),
            Change::Bar(bar, ratio) => {
                if self.bars.get(bar) == Some(ratio) {
                    return false;
                }
                self.bars.insert(*bar, *ratio);
                true
            }
            Change::VolumeIcon(i) => replace(&mut self.volume_icon, Some(*i)),
            Change::Loading(on) => replace(&mut self.loading, *on),
            Change::Notice { text, opacity } => {
                replace(&mut self.notice, Some((text.clone(), *opacity)))
            }
            Change::NowPlaying {
                index,
                title,
                artist,
                cover,
            } => replace(
                &mut self.now_playing,
                Some((*index, title.clone(), artist.clone(), cover.clone())),
            ),
            Change::ListAccent { index, color } => {
                if self.list_accents.get(index) == Some(color) {
                    return false;
                }
                self.list_accents.insert(*index, color.clone());
                true
            }
            Change::Accent(c) => replace(&mut self.accent, Some(c.clone())),
        }
    }

    pub fn bar(&self, bar: Bar) -> Option<f64> {
        self.bars.get(&bar).copied()
    }
}

/// Deduplicating front for a [`Surface`].
pub struct Renderer {
    view: View,
    surface: Box<dyn Surface>,
}

impl Renderer {
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            view: View::default(),
            surface,
        }
    }

    /// Apply `change` unless it is already displayed. Bar ratios are clamped
    /// to `[0, 1]`; non-finite ratios display as empty.
    pub fn set(&mut self, change: Change) -> bool {
        let change = match change {
            Change::Bar(bar, ratio) if !ratio.is_finite() => Change::Bar(bar, 0.0),
            Change::Bar(bar, ratio) => Change::Bar(bar, ratio.clamp(0.0, 1.0)),
            other => other,
        };
        if !self.view.apply(&change) {
            return false;
        }
        self.surface.apply(&change);
        true
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Forget list accents beyond `len` (after list shrink).
    pub fn truncate_list(&mut self, len: usize) {
        self.view.list_accents.retain(|i, _| *i < len);
    }
}

#[cfg(test)]
mod tests;
