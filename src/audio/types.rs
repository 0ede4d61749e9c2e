//! Audio-related small types and handles.
//!
//! This module defines the commands, shared playback info and errors used
//! by the preview player.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug)]
pub enum AudioCmd {
    /// Stop whatever is playing and start the given file.
    Play(PathBuf),
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback immediately.
    Stop,
    /// Stop and end the audio thread.
    Quit,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// File being previewed, if any.
    pub path: Option<PathBuf>,
    /// Whether audio is currently coming out.
    pub playing: bool,
    /// Elapsed playback time for the current file.
    pub elapsed: Duration,
    /// Last playback failure, shown in the status line.
    pub error: Option<String>,
}

impl PlaybackInfo {
    /// Nothing is loaded any more; the next play request starts from scratch.
    pub fn finish(&mut self) {
        self.path = None;
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
