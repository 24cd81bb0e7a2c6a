//! A [`MediaSink`] over a `rodio` output stream.
//!
//! Sources are local files (plain paths or `file://` URLs) decoded by rodio.
//! Timing signals are derived by polling the rodio `Sink`, the same way a
//! terminal player notices that a track ran out.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::SinkError;
use crate::events::MediaEvent;

use super::MediaSink;

const NATIVE_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/flac",
    "audio/x-flac",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    "audio/vorbis",
];

/// Length from the file's audio properties. Decoders without a byte length
/// (MP3 among them) cannot report one.
fn tagged_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()).filter(|d| !d.is_zero()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no duration in file properties");
            None
        }
    }
}

pub struct RodioSink {
    stream: OutputStream,
    sink: Option<Sink>,
    src: Option<String>,
    duration: Option<Duration>,
    volume: f64,
    muted: bool,
    paused: bool,
    ended: bool,
    last_reported: Duration,
    events: VecDeque<MediaEvent>,
}

impl RodioSink {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, SinkError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| SinkError::NotSupported(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            src: None,
            duration: None,
            volume: 1.0,
            muted: false,
            paused: true,
            ended: false,
            last_reported: Duration::ZERO,
            events: VecDeque::new(),
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume as f32 }
    }

    /// Decode `url` into a fresh paused rodio sink.
    fn open(&self, url: &str) -> Result<(Sink, Option<Duration>), SinkError> {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| SinkError::Decode(format!("{}: {e}", path.display())))?;
        let duration = source.total_duration().or_else(|| tagged_duration(path));

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        sink.set_volume(self.effective_volume());
        Ok((sink, duration))
    }

    fn load(&mut self, url: &str) {
        self.events.push_back(MediaEvent::LoadStart);
        match self.open(url) {
            Ok((sink, duration)) => {
                self.sink = Some(sink);
                self.duration = duration;
                self.events.push_back(MediaEvent::DurationChange);
                self.events.push_back(MediaEvent::Progress);
                self.events.push_back(MediaEvent::CanPlay);
            }
            Err(e) => {
                warn!(url, error = %e, "cannot open source");
                self.events.push_back(MediaEvent::Error);
            }
        }
    }

    fn stop_current(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.duration = None;
        self.ended = false;
        self.last_reported = Duration::ZERO;
    }
}

impl MediaSink for RodioSink {
    fn set_source(&mut self, url: Option<&str>) {
        self.stop_current();
        self.src = url.map(str::to_string);
        // Rebinding pauses silently; no pause signal is emitted.
        self.paused = true;
        if let Some(url) = url {
            self.load(url);
        }
    }

    fn source(&self) -> Option<String> {
        self.src.clone()
    }

    fn can_play_type(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        NATIVE_TYPES.iter().any(|t| *t == mime)
    }

    fn play(&mut self) -> Result<(), SinkError> {
        if self.ended {
            // Playing again after the end restarts the track.
            if let Some(src) = self.src.clone() {
                self.stop_current();
                self.load(&src);
            }
        }
        let Some(sink) = self.sink.as_ref() else {
            return Err(SinkError::NoSource);
        };
        sink.play();
        if self.paused {
            self.paused = false;
            self.events.push_back(MediaEvent::Play);
            self.events.push_back(MediaEvent::Playing);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if !self.paused {
            self.paused = true;
            self.events.push_back(MediaEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn seek(&mut self, position: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        self.events.push_back(MediaEvent::Seeking);
        if let Err(e) = sink.try_seek(position) {
            debug!(error = %e, "seek not supported by source");
        }
        self.ended = false;
        self.last_reported = sink.get_pos();
        self.events.push_back(MediaEvent::Seeked);
        self.events.push_back(MediaEvent::TimeUpdate);
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|s| s.get_pos())
            .unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn buffered(&self) -> Option<Duration> {
        // Local files are fully available once decoded.
        self.sink.as_ref().and(self.duration)
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.effective_volume());
        }
        self.events.push_back(MediaEvent::VolumeChange);
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.effective_volume());
        }
        self.events.push_back(MediaEvent::VolumeChange);
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if let Some(sink) = self.sink.as_ref() {
            if !self.paused && !self.ended {
                let pos = sink.get_pos();
                if pos != self.last_reported {
                    self.last_reported = pos;
                    self.events.push_back(MediaEvent::TimeUpdate);
                }
                if sink.empty() {
                    self.ended = true;
                    self.paused = true;
                    self.events.push_back(MediaEvent::TimeUpdate);
                    self.events.push_back(MediaEvent::Pause);
                    self.events.push_back(MediaEvent::Ended);
                }
            }
        }
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Mono 16-bit PCM WAV with `samples` zero samples.
    fn wav(sample_rate: u32, samples: u32) -> Vec<u8> {
        let data_len = samples * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(out.len() + data_len as usize, 0);
        out
    }

    #[test]
    fn tagged_duration_reads_the_audio_properties() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        fs::write(&path, wav(8000, 16000)).unwrap();

        let d = tagged_duration(&path).expect("wav has a duration");
        assert!(
            d >= Duration::from_millis(1990) && d <= Duration::from_millis(2010),
            "{d:?}"
        );
    }

    #[test]
    fn tagged_duration_is_none_for_unreadable_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        fs::write(&path, b"not audio at all").unwrap();
        assert_eq!(tagged_duration(&path), None);

        assert_eq!(tagged_duration(&dir.path().join("missing.flac")), None);
    }
}
