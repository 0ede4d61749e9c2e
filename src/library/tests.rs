use std::path::Path;

use super::testing::{MemoryTagStore, paths, payload};
use super::*;

fn two_tracks() -> (MemoryTagStore, TrackCollection) {
    let store = MemoryTagStore::default()
        .with_file("/m/a.mp3", &[(TagField::Artist, "X")])
        .with_file("/m/b.mp3", &[(TagField::Artist, "Y")]);
    let (collection, failures) = TrackCollection::load(paths(&["/m/a.mp3", "/m/b.mp3"]), &store);
    assert!(failures.is_empty());
    (store, collection)
}

fn is_dirty(c: &TrackCollection, p: &str) -> bool {
    c.get(Path::new(p)).unwrap().is_dirty()
}

#[test]
fn load_keeps_order_and_starts_clean() {
    let (_, c) = two_tracks();
    let order: Vec<_> = c.iter().map(|r| r.path().to_path_buf()).collect();
    assert_eq!(order, paths(&["/m/a.mp3", "/m/b.mp3"]));
    assert!(c.iter().all(|r| !r.is_dirty() && !r.is_selected()));
    assert_eq!(c.get(Path::new("/m/a.mp3")).unwrap().field(TagField::Artist), "X");
}

#[test]
fn load_skips_unreadable_files_without_failing_the_rest() {
    let store = MemoryTagStore::default().with_file("/m/a.mp3", &[]);
    let (c, failures) = TrackCollection::load(paths(&["/m/a.mp3", "/m/cover.jpg"]), &store);

    assert_eq!(c.len(), 1);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, Path::new("/m/cover.jpg"));
    assert!(matches!(failures[0].error, LoadError::Unsupported(_)));
}

#[test]
fn duplicate_paths_keep_the_first_record() {
    let store = MemoryTagStore::default()
        .with_file("/m/a.mp3", &[])
        .with_file("/m/b.mp3", &[]);
    let (c, failures) =
        TrackCollection::load(paths(&["/m/a.mp3", "/m/b.mp3", "/m/a.mp3"]), &store);

    assert_eq!(c.len(), 2);
    assert_eq!(c.position(Path::new("/m/a.mp3")), Some(0));
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].error, LoadError::Duplicate));
}

#[test]
fn setting_the_same_value_is_not_a_change() {
    let (_, mut c) = two_tracks();
    let mut session = EditSession::new(&mut c);

    assert!(!session.apply_single(Path::new("/m/a.mp3"), TagField::Artist, "X"));
    assert!(session.changed().is_empty());
    assert!(!is_dirty(&c, "/m/a.mp3"));

    let changed = c.set_field_bulk(&paths(&["/m/a.mp3", "/m/b.mp3"]), TagField::Artist, "Y");
    assert_eq!(changed, paths(&["/m/a.mp3"]));
    assert!(is_dirty(&c, "/m/a.mp3"));
    assert!(!is_dirty(&c, "/m/b.mp3"));
}

#[test]
fn missing_field_equals_empty_string() {
    let (_, mut c) = two_tracks();
    let mut session = EditSession::new(&mut c);
    assert!(!session.apply_single(Path::new("/m/a.mp3"), TagField::Genre, ""));
    assert!(session.apply_single(Path::new("/m/a.mp3"), TagField::Genre, "Jazz"));
}

#[test]
fn selection_is_independent_of_dirty_state() {
    let (store, mut c) = two_tracks();
    c.select(Path::new("/m/a.mp3"));
    c.toggle_selected(Path::new("/m/b.mp3"));
    assert!(c.iter().all(|r| !r.is_dirty()));
    assert_eq!(c.selected_paths(), paths(&["/m/a.mp3", "/m/b.mp3"]));

    c.deselect(Path::new("/m/b.mp3"));
    EditSession::new(&mut c).apply_single(Path::new("/m/a.mp3"), TagField::Title, "T");
    let outcome = SaveCoordinator::new(&store).save(&mut c);

    assert_eq!(outcome.saved(), 1);
    assert_eq!(c.selected_paths(), paths(&["/m/a.mp3"]));
}

#[test]
fn selected_records_follow_collection_order() {
    let (_, mut c) = two_tracks();
    c.select(Path::new("/m/b.mp3"));
    c.select(Path::new("/m/a.mp3"));
    let names: Vec<_> = c.selected_records().map(|r| r.file_name()).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3"]);

    c.clear_selection();
    assert!(c.selected_paths().is_empty());
    c.select_all();
    assert_eq!(c.selected_paths().len(), 2);
}

#[test]
fn bulk_edit_then_partial_save_failure() {
    let (store, mut c) = two_tracks();
    let ab = paths(&["/m/a.mp3", "/m/b.mp3"]);

    let changed = EditSession::new(&mut c).apply_bulk(&ab, TagField::Artist, "Z");
    assert_eq!(changed, ab);
    assert!(is_dirty(&c, "/m/a.mp3") && is_dirty(&c, "/m/b.mp3"));

    store.fail_writes_to("/m/b.mp3");
    let outcome = SaveCoordinator::new(&store).save(&mut c);

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results[0].is_ok());
    assert!(!outcome.results[1].is_ok());
    assert_eq!(outcome.saved(), 1);
    assert_eq!(outcome.failed(), 1);
    assert!(!is_dirty(&c, "/m/a.mp3"));
    assert!(is_dirty(&c, "/m/b.mp3"));
    assert_eq!(store.stored_field("/m/a.mp3", TagField::Artist).as_deref(), Some("Z"));
    assert_eq!(store.stored_field("/m/b.mp3", TagField::Artist).as_deref(), Some("Y"));
    // In-memory value of the failed record is kept for a later retry.
    assert_eq!(c.get(Path::new("/m/b.mp3")).unwrap().field(TagField::Artist), "Z");

    let summary = outcome.summary();
    assert!(summary.starts_with("1 saved, 1 failed: b.mp3:"), "{summary}");

    store.allow_writes_to("/m/b.mp3");
    let retry = SaveCoordinator::new(&store).save(&mut c);
    assert_eq!(retry.saved(), 1);
    assert_eq!(c.dirty_count(), 0);
}

#[test]
fn save_only_touches_dirty_records_in_order() {
    let (store, mut c) = two_tracks();
    EditSession::new(&mut c).apply_single(Path::new("/m/b.mp3"), TagField::Album, "B");

    let outcome = SaveCoordinator::new(&store).save(&mut c);
    assert_eq!(store.writes(), paths(&["/m/b.mp3"]));
    assert_eq!(outcome.summary(), "1 saved");

    let again = SaveCoordinator::new(&store).save(&mut c);
    assert!(again.is_empty());
    assert_eq!(again.summary(), "nothing to save");
}

#[test]
fn save_paths_limits_the_batch() {
    let (store, mut c) = two_tracks();
    let ab = paths(&["/m/a.mp3", "/m/b.mp3"]);
    EditSession::new(&mut c).apply_bulk(&ab, TagField::Genre, "Rock");

    let outcome = SaveCoordinator::new(&store).save_paths(&mut c, &paths(&["/m/b.mp3"]));
    assert_eq!(outcome.saved(), 1);
    assert!(is_dirty(&c, "/m/a.mp3"));
    assert!(!is_dirty(&c, "/m/b.mp3"));
}

#[test]
fn art_always_dirties_even_with_identical_bytes() {
    let (store, mut c) = two_tracks();
    let art = payload(b"png-bytes");

    let touched = EditSession::new(&mut c).apply_art(&paths(&["/m/a.mp3"]), &art);
    assert_eq!(touched, paths(&["/m/a.mp3"]));
    SaveCoordinator::new(&store).save(&mut c);
    assert!(!is_dirty(&c, "/m/a.mp3"));
    assert!(c.get(Path::new("/m/a.mp3")).unwrap().has_embedded_art());
    assert!(c.get(Path::new("/m/a.mp3")).unwrap().art().is_none());
    assert_eq!(store.stored_art("/m/a.mp3").as_deref(), Some(&b"png-bytes"[..]));

    EditSession::new(&mut c).apply_art(&paths(&["/m/a.mp3"]), &art);
    assert!(is_dirty(&c, "/m/a.mp3"));
}

#[test]
fn title_guesses_only_report_real_changes() {
    let store = MemoryTagStore::default()
        .with_file("/m/01 - First_Song.mp3", &[(TagField::Title, "First Song")])
        .with_file("/m/02 - Second.mp3", &[(TagField::Title, "old")]);
    let all = paths(&["/m/01 - First_Song.mp3", "/m/02 - Second.mp3"]);
    let (mut c, _) = TrackCollection::load(all.clone(), &store);

    let mut session = EditSession::new(&mut c);
    let changed = session.apply_title_guesses(&all);
    assert_eq!(changed, paths(&["/m/02 - Second.mp3"]));
    assert_eq!(session.changed(), changed);
    assert_eq!(
        c.get(Path::new("/m/02 - Second.mp3")).unwrap().field(TagField::Title),
        "Second"
    );
}

#[test]
fn edits_ignore_unknown_paths() {
    let (_, mut c) = two_tracks();
    let mut session = EditSession::new(&mut c);
    assert!(!session.apply_single(Path::new("/nope.mp3"), TagField::Title, "x"));
    assert!(session.apply_bulk(&paths(&["/nope.mp3"]), TagField::Title, "x").is_empty());
    assert!(session.apply_art(&paths(&["/nope.mp3"]), &payload(b"x")).is_empty());
}
