//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded tracks, the
//! table cursor, the input mode and preview state. The cover art picker's
//! directory listing lives in `app::browser`.

mod browser;
mod model;

pub use browser::{BrowserEntry, EntryKind, FileBrowser};
pub use model::*;
