use super::load::{default_config_path, default_log_path, resolve_config_path};
use crate::library::TagField;
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_beetsheet_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BEETSHEET_CONFIG_PATH", "/tmp/beetsheet-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/beetsheet-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("beetsheet")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("beetsheet")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_state_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/beetsheet/beetsheet.log")
    );

    let _g3 = EnvGuard::set("XDG_STATE_HOME", "/tmp/state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/state/beetsheet/beetsheet.log")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(
        s.ui.columns,
        vec![TagField::Artist, TagField::Album, TagField::Title]
    );
    assert!(s.library.extensions.iter().any(|e| e == "flac"));
    assert!(s.art.extensions.iter().any(|e| e == "png"));
    assert_eq!(s.logging.level, "info");
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.ui.columns.clear();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.art.preview_rows = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.max_depth = Some(0);
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_column_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ui]
header_text = "hello"
columns = ["album_artist", "title", "genre"]

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
max_depth = 3

[art]
extensions = ["png"]
start_dir = "/srv/covers"
preview_cols = 20
preview_rows = 10

[audio]
volume = 0.5

[logging]
level = "debug"
file = "/tmp/beetsheet.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BEETSHEET_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("BEETSHEET__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.columns,
        vec![TagField::AlbumArtist, TagField::Title, TagField::Genre]
    );
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.art.extensions, vec!["png".to_string()]);
    assert_eq!(
        s.art.start_dir.as_deref(),
        Some(std::path::Path::new("/srv/covers"))
    );
    assert_eq!((s.art.preview_cols, s.art.preview_rows), (20, 10));
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/beetsheet.log"))
    );
}

#[test]
fn settings_missing_file_uses_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("absent.toml");
    let _g1 = EnvGuard::set("BEETSHEET_CONFIG_PATH", cfg_path.to_str().unwrap());

    let s = Settings::load().unwrap();
    assert_eq!(s.ui.columns.len(), 3);
    assert!(s.library.recursive);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 0.9
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BEETSHEET_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("BEETSHEET__AUDIO__VOLUME", "0.25");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 0.25);
}
