//! Preview playback.
//!
//! A background thread owns the `rodio` output stream and plays one file at
//! a time. The UI sends [`AudioCmd`]s and reads a shared [`PlaybackInfo`].

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
