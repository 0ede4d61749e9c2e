use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::LoftyTagStore;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let log_path = logging::init(&settings.logging);

    let args: Vec<_> = env::args_os().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: beetsheet <FILE|DIR>...");
        std::process::exit(1);
    }

    let store = LoftyTagStore;
    let startup = startup::load_inputs(&args, &settings.library, &store);
    if startup.collection.is_empty() {
        for p in &startup.missing {
            eprintln!("beetsheet: {}: not found", p.display());
        }
        for f in &startup.failures {
            eprintln!("beetsheet: {}: {}", f.path.display(), f.error);
        }
        eprintln!("beetsheet: no readable audio files given");
        std::process::exit(1);
    }

    let status = startup.status();
    let mut app = App::new(startup.collection, Box::new(store), &settings);
    if let Some(msg) = status.or_else(|| log_path.map(|p| format!("logging to {}", p.display()))) {
        app.set_status(msg);
    }

    let audio_player = AudioPlayer::new(&settings.audio);
    app.set_playback_handle(audio_player.playback_handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &audio_player, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if run_result.is_err() {
        audio_player.shutdown();
    }
    log::info!("exiting with {} unsaved track(s)", app.dirty_count());
    run_result
}
