use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackError, PlaybackHandle};

const TICK: Duration = Duration::from_millis(200);

/// Elapsed-time accounting across pauses.
#[derive(Debug, Default)]
pub(super) struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    pub(super) fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.accumulated = Duration::ZERO;
    }

    pub(super) fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub(super) fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(super) fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(st) => self.accumulated + now.saturating_duration_since(st),
            None => self.accumulated,
        }
    }
}

struct Preview {
    stream: OutputStream,
    sink: Option<Sink>,
    clock: Clock,
    volume: f32,
    playback_info: PlaybackHandle,
}

impl Preview {
    fn play(&mut self, path: std::path::PathBuf) {
        self.stop();

        match create_sink(&self.stream, &path, self.volume) {
            Ok(sink) => {
                sink.play();
                self.sink = Some(sink);
                self.clock.start(Instant::now());
                log::debug!("previewing {}", path.display());
                if let Ok(mut info) = self.playback_info.lock() {
                    info.path = Some(path);
                    info.playing = true;
                    info.elapsed = Duration::ZERO;
                    info.error = None;
                }
            }
            Err(err) => {
                log::warn!("{err}");
                if let Ok(mut info) = self.playback_info.lock() {
                    info.path = None;
                    info.playing = false;
                    info.error = Some(err.to_string());
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let now = Instant::now();
        let playing = if self.clock.is_running() {
            sink.pause();
            self.clock.pause(now);
            false
        } else {
            sink.play();
            self.clock.resume(now);
            true
        };
        if let Ok(mut info) = self.playback_info.lock() {
            info.playing = playing;
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.clock.reset();
        if let Ok(mut info) = self.playback_info.lock() {
            info.finish();
        }
    }

    /// Publish elapsed time and notice when the file ran out.
    fn tick(&mut self) {
        let finished = self
            .sink
            .as_ref()
            .is_some_and(|s| self.clock.is_running() && s.empty());
        if finished {
            self.sink = None;
            self.clock.reset();
            log::debug!("preview finished");
            if let Ok(mut info) = self.playback_info.lock() {
                info.finish();
            }
            return;
        }
        if self.sink.is_some() {
            if let Ok(mut info) = self.playback_info.lock() {
                info.elapsed = self.clock.elapsed(Instant::now());
            }
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                let err = PlaybackError::Device(err.to_string());
                log::error!("{err}");
                run_without_device(&rx, &playback_info, &err);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut preview = Preview {
            stream,
            sink: None,
            clock: Clock::default(),
            volume,
            playback_info,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Play(path)) => preview.play(path),
                Ok(AudioCmd::TogglePause) => preview.toggle_pause(),
                Ok(AudioCmd::Stop) => preview.stop(),
                Ok(AudioCmd::Quit) => {
                    preview.stop();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => preview.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Answer every play request with the device error until told to quit.
fn run_without_device(rx: &Receiver<AudioCmd>, playback_info: &PlaybackHandle, err: &PlaybackError) {
    let report = |playback_info: &PlaybackHandle| {
        if let Ok(mut info) = playback_info.lock() {
            info.error = Some(err.to_string());
        }
    };
    report(playback_info);

    for cmd in rx.iter() {
        match cmd {
            AudioCmd::Play(_) => report(playback_info),
            AudioCmd::Quit => break,
            AudioCmd::TogglePause | AudioCmd::Stop => {}
        }
    }
}
