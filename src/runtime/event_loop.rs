use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Mode};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::TagField;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// What the loop has to do after a key was handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Play(PathBuf),
    TogglePause,
    Stop,
}

/// Main terminal event loop: handles input, draws the UI and forwards
/// preview commands to the audio thread. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, app, state) {
                    Action::None => {}
                    Action::Quit => {
                        audio_player.shutdown();
                        break;
                    }
                    Action::Play(path) => audio_player.play(path),
                    Action::TogglePause => {
                        let _ = audio_player.send(AudioCmd::TogglePause);
                    }
                    Action::Stop => {
                        let _ = audio_player.send(AudioCmd::Stop);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Path currently loaded in the preview player.
fn playing_path(app: &App) -> Option<PathBuf> {
    app.playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().and_then(|info| info.path.clone()))
}

/// `p`: resume/pause the track under the cursor if it is the one loaded,
/// otherwise start it.
fn play_pause(app: &App) -> Action {
    let Some(current) = app.current_path() else {
        return Action::None;
    };
    if playing_path(app).as_ref() == Some(&current) {
        Action::TogglePause
    } else {
        Action::Play(current)
    }
}

pub fn handle_key(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> Action {
    match app.mode {
        Mode::Normal => handle_normal_key(key, app, state),
        Mode::EditCell | Mode::BulkEdit(_) => {
            handle_input_key(key, app);
            Action::None
        }
        Mode::BrowseArt => {
            handle_browser_key(key, app);
            Action::None
        }
        Mode::Preview => handle_preview_key(key, app),
    }
}

fn handle_normal_key(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if key.code != KeyCode::Char('q') {
        app.cancel_quit();
    }
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            if app.request_quit() {
                return Action::Quit;
            }
        }
        KeyCode::Char('a') if ctrl => app.begin_bulk_edit(TagField::Artist),
        KeyCode::Char('l') if ctrl => app.begin_bulk_edit(TagField::Album),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first_row();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last_row(),
        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_row(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_column(),
        KeyCode::Char('l') | KeyCode::Right => app.next_column(),
        KeyCode::Char(' ') => app.toggle_selection_at_cursor(),
        KeyCode::Char('a') => app.select_all(),
        KeyCode::Char('u') => app.clear_selection(),
        KeyCode::Char('e') | KeyCode::Enter => app.begin_cell_edit(),
        KeyCode::Char('b') => {
            let field = app.current_field();
            app.begin_bulk_edit(field);
        }
        KeyCode::Char('t') => app.guess_title_at_cursor(),
        KeyCode::Char('T') => app.guess_titles_for_targets(),
        KeyCode::Char('c') => app.open_art_browser(),
        KeyCode::Char('K') => app.open_preview(),
        KeyCode::Char('p') => return play_pause(app),
        KeyCode::Char('x') => return Action::Stop,
        KeyCode::Char('s') => {
            app.save();
        }
        _ => {}
    }

    Action::None
}

fn handle_input_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_input(c),
        _ => {}
    }
}

fn handle_browser_key(key: KeyEvent, app: &mut App) {
    if key.code == KeyCode::Esc {
        app.close_browser();
        return;
    }
    if key.code == KeyCode::Enter {
        app.browser_enter();
        return;
    }
    let Some(browser) = app.browser.as_mut() else {
        app.close_browser();
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => browser.next(),
        KeyCode::Char('k') | KeyCode::Up => browser.prev(),
        KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => browser.up(),
        KeyCode::Char('.') => browser.toggle_hidden(),
        _ => {}
    }
}

fn handle_preview_key(key: KeyEvent, app: &mut App) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('K') | KeyCode::Char('q') => {
            app.close_preview();
            Action::None
        }
        KeyCode::Char('p') => play_pause(app),
        KeyCode::Char('x') => Action::Stop,
        _ => Action::None,
    }
}
