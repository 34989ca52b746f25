//! Playlist and sound management tests

mod common;

use common::Harness;
use soundboard_core::{DocumentStore, PlaylistCategory, SoundId, SoundSelection};
use soundboard_playback::PlaybackError;
use std::fs;

#[tokio::test]
async fn reorder_preserves_focused_sound_identity() {
    let h = Harness::new(&["A", "B", "C"]);
    let a = h.id(0);
    h.controller.focus_sound(&a).unwrap();

    h.panel.reorder_sounds(0, 2).await.unwrap();

    let playlist = h.documents.playlist(&h.playlist.id).unwrap();
    let names: Vec<&str> = playlist.sounds.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);

    let sorts: Vec<i64> = playlist.sounds.iter().map(|s| s.sort).collect();
    assert_eq!(sorts, vec![100_000, 200_000, 300_000]);

    assert!(h.controller.is_focused(&a));
    let slots = h.panel.slots();
    assert_eq!(slots[2].id, a);
    assert!(slots[2].active);
    assert!(!slots[0].active);
}

#[tokio::test]
async fn reorder_out_of_range_is_a_no_op() {
    let h = Harness::new(&["A", "B"]);
    h.panel.reorder_sounds(0, 2).await.unwrap();
    h.panel.reorder_sounds(5, 0).await.unwrap();

    let playlist = h.documents.playlist(&h.playlist.id).unwrap();
    assert_eq!(playlist.sounds[0].name, "A");
}

#[tokio::test]
async fn deleting_playlist_purges_local_preferences() {
    let h = Harness::new(&["A", "B"]);
    let other = h.documents.seed_playlist("Forest", &["Birds"]);
    let pl = h.playlist_id();

    h.panel.set_slot_image(&h.id(0), "icons/a.webp").unwrap();
    h.panel.set_playlist_volume(&pl, 0.3).unwrap();
    h.preferences
        .set_slot_image(&other.id, &other.sounds[0].id, "icons/birds.webp")
        .unwrap();
    h.controller.toggle_play(&h.id(1)).await.unwrap();

    h.panel.delete_playlist(&pl).await.unwrap();

    assert!(h.documents.playlist(&pl).is_none());
    assert!(!h.preferences.has_entries(&pl));
    assert_eq!(h.preferences.playlist_volume(&pl), 1.0);
    assert_eq!(h.controller.current_playlist(), None);
    assert_eq!(h.controller.focus(), None);

    // Other playlists keep theirs
    assert_eq!(
        h.preferences
            .slot_image(&other.id, &other.sounds[0].id)
            .as_deref(),
        Some("icons/birds.webp")
    );
}

#[tokio::test]
async fn deleting_playlist_stops_its_sounds_first() {
    let h = Harness::new(&["A", "B"]);
    h.controller.toggle_play(&h.id(0)).await.unwrap();

    h.panel.delete_playlist(&h.playlist_id()).await.unwrap();

    let stops: Vec<_> = h
        .documents
        .update_log()
        .into_iter()
        .filter(|r| r.update.playing == Some(false))
        .map(|r| r.sound_id)
        .collect();
    assert_eq!(stops, vec![h.id(0)]);
}

#[tokio::test]
async fn deleting_missing_playlist_is_an_error() {
    let h = Harness::new(&["A"]);
    let err = h
        .panel
        .delete_playlist(&"nope".into())
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::PlaylistNotFound(_)));
}

#[tokio::test]
async fn removing_sound_purges_only_its_image() {
    let h = Harness::new(&["A", "B"]);
    let pl = h.playlist_id();
    h.panel.set_slot_image(&h.id(0), "a.webp").unwrap();
    h.panel.set_slot_image(&h.id(1), "b.webp").unwrap();
    h.panel.set_playlist_volume(&pl, 0.6).unwrap();
    h.controller.toggle_play(&h.id(0)).await.unwrap();

    h.panel.remove_sound(&h.id(0)).await.unwrap();

    assert_eq!(h.panel.slot_image(&h.id(0)), None);
    assert_eq!(h.panel.slot_image(&h.id(1)).as_deref(), Some("b.webp"));
    assert_eq!(h.preferences.playlist_volume(&pl), 0.6);
    assert_eq!(h.controller.focus().unwrap().sound_id, None);
    assert_eq!(h.documents.playlist(&pl).unwrap().sounds.len(), 1);
}

#[tokio::test]
async fn remote_sound_deletion_clears_focus_and_image() {
    let mut h = Harness::new(&["A", "B"]);
    let pl = h.playlist_id();
    h.controller.focus_sound(&h.id(1)).unwrap();
    h.panel.set_slot_image(&h.id(1), "b.webp").unwrap();

    h.documents.delete_sounds(&pl, &[h.id(1)]).await.unwrap();
    h.pump().await;

    assert_eq!(h.controller.focus().unwrap().sound_id, None);
    assert_eq!(h.preferences.slot_image(&pl, &h.id(1)), None);
}

#[tokio::test]
async fn remote_playlist_deletion_clears_current_and_preferences() {
    let mut h = Harness::new(&["A"]);
    let pl = h.playlist_id();
    h.controller.focus_sound(&h.id(0)).unwrap();
    h.panel.set_playlist_volume(&pl, 0.2).unwrap();
    h.panel.toggle_volume_expanded(&pl);

    h.documents.delete_playlist(&pl).await.unwrap();
    h.pump().await;

    assert_eq!(h.controller.current_playlist(), None);
    assert!(!h.preferences.has_entries(&pl));
}

#[tokio::test]
async fn stale_focus_is_cleared_on_tick() {
    let h = Harness::new(&["A", "B"]);
    h.controller.focus_sound(&h.id(1)).unwrap();

    // Deleted elsewhere; the notification has not been handled yet
    h.documents
        .delete_sounds(&h.playlist.id, &[h.id(1)])
        .await
        .unwrap();
    h.controller.tick();

    assert_eq!(h.controller.focus().unwrap().sound_id, None);
}

#[tokio::test]
async fn create_playlist_selects_it() {
    let h = Harness::new(&["A"]);
    h.controller.focus_sound(&h.id(0)).unwrap();

    let created = h.panel.create_playlist("  Dungeon ").await.unwrap();
    assert_eq!(created.name, "Dungeon");
    assert_eq!(created.category, PlaylistCategory::Music);
    assert_eq!(h.controller.current_playlist(), Some(created.id));
    assert_eq!(h.controller.focus().unwrap().sound_id, None);
}

#[tokio::test]
async fn create_playlist_rejects_blank_name() {
    let h = Harness::new(&[]);
    let err = h.panel.create_playlist("   ").await.unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidInput(_)));
    assert_eq!(h.documents.playlists().len(), 1);
}

#[tokio::test]
async fn set_category_changes_icon() {
    let h = Harness::new(&["A"]);
    h.panel
        .set_category(&h.playlist_id(), PlaylistCategory::Environment)
        .await
        .unwrap();

    let items = h.panel.playlist_items();
    assert_eq!(items[0].icon, "🌲");
}

#[tokio::test]
async fn add_unsaved_sound_focuses_it() {
    let h = Harness::new(&["A"]);
    let sound = h
        .panel
        .add_sound(SoundSelection::unsaved("sfx/Door%20Creak.wav"))
        .await
        .unwrap();

    assert_eq!(sound.name, "Door Creak");
    assert_eq!(sound.path, "sfx/Door%20Creak.wav");
    assert_eq!(sound.volume, 0.5);
    assert!(sound.sort > h.sound(0).sort);
    assert!(h.controller.is_focused(&sound.id));
}

#[tokio::test]
async fn add_replicated_sound_copies_from_other_playlist() {
    let h = Harness::new(&["A"]);
    let other = h.documents.seed_playlist("Forest", &["Birds"]);
    let birds = &other.sounds[0];

    let copy = h
        .panel
        .add_sound(SoundSelection::Replicated {
            id: birds.id.clone(),
            playlist_id: other.id.clone(),
        })
        .await
        .unwrap();

    assert_ne!(copy.id, birds.id);
    assert_eq!(copy.name, birds.name);
    assert_eq!(copy.path, birds.path);
    assert!(h.controller.is_focused(&copy.id));
    assert_eq!(h.documents.playlist(&other.id).unwrap().sounds.len(), 1);
}

#[tokio::test]
async fn add_sound_requires_a_playlist() {
    let h = Harness::new(&["A"]);
    h.documents.delete_playlist(&h.playlist_id()).await.unwrap();

    let err = h
        .panel
        .add_sound(SoundSelection::unsaved("a.ogg"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::PlaylistNotFound(_)));
    assert_eq!(h.controller.current_playlist(), None);
}

#[tokio::test]
async fn import_folder_adds_audio_files() {
    let h = Harness::new(&[]);
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rain.ogg"), b"").unwrap();
    fs::write(dir.path().join("Thunder%20Clap.MP3"), b"").unwrap();
    fs::write(dir.path().join("cover.png"), b"").unwrap();

    let created = h.panel.import_folder(dir.path()).await.unwrap();
    let mut names: Vec<_> = created.iter().map(|s| s.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Thunder Clap", "rain"]);
    assert!(created.iter().all(|s| s.volume == 0.5));
    assert_eq!(h.controller.focus().unwrap().sound_id, None);
}

#[tokio::test]
async fn import_empty_folder_is_a_notice() {
    let h = Harness::new(&[]);
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let err = h.panel.import_folder(dir.path()).await.unwrap_err();
    assert!(matches!(err, PlaybackError::NoAudioFiles(_)));
}

#[tokio::test]
async fn import_files_filters_by_extension() {
    let h = Harness::new(&[]);
    let created = h
        .panel
        .import_files(&[
            "music/intro.flac".to_string(),
            "music/readme.md".to_string(),
            "music/outro.WEBM".to_string(),
        ])
        .await
        .unwrap();

    let names: Vec<_> = created.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["intro", "outro"]);

    let err = h
        .panel
        .import_files(&["a.txt".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::NoAudioFiles(_)));
}

#[tokio::test]
async fn slots_and_playlist_items_reflect_state() {
    let h = Harness::new(&["A", "B"]);
    let pl = h.playlist_id();
    h.panel.set_slot_image(&h.id(1), "b.webp").unwrap();
    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.panel.set_playlist_volume(&pl, 0.7).unwrap();
    assert!(h.panel.toggle_volume_expanded(&pl));

    let slots = h.panel.slots();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].index, 0);
    assert!(slots[0].playing && slots[0].active);
    assert_eq!(slots[1].image.as_deref(), Some("b.webp"));
    assert!(!slots[1].playing && !slots[1].active);

    let items = h.panel.playlist_items();
    assert_eq!(items.len(), 1);
    assert!(items[0].selected && items[0].playing && items[0].volume_expanded);
    assert_eq!(items[0].volume, 0.7);
    assert_eq!(items[0].icon, "🎵");

    assert!(!h.panel.toggle_volume_expanded(&pl));
}

#[tokio::test]
async fn picker_groups_matches_by_playlist() {
    let h = Harness::new(&["Tavern Crowd", "Fireplace"]);
    h.documents.seed_playlist("Forest", &["Birds", "Campfire"]);
    h.documents.seed_playlist("Dungeon", &["Drips"]);

    let groups = h.panel.picker_entries("FIRE");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].playlist_name, "Tavern");
    assert_eq!(groups[0].sounds[0].name, "Fireplace");
    assert_eq!(groups[1].playlist_name, "Forest");
    assert_eq!(groups[1].sounds[0].name, "Campfire");

    let all: usize = h
        .panel
        .picker_entries("")
        .iter()
        .map(|g| g.sounds.len())
        .sum();
    assert_eq!(all, 5);
}

#[test]
fn slot_image_requires_existing_sound() {
    let h = Harness::new(&["A"]);
    let err = h
        .panel
        .set_slot_image(&SoundId::new("ghost"), "x.webp")
        .unwrap_err();
    assert!(matches!(err, PlaybackError::SoundNotFound(_)));
}

#[test]
fn selecting_another_playlist_clears_focus() {
    let h = Harness::new(&["A"]);
    let other = h.documents.seed_playlist("Forest", &["Birds"]);
    h.controller.focus_sound(&h.id(0)).unwrap();

    assert!(!h.panel.select_playlist(&h.playlist_id()).unwrap());
    assert!(h.controller.is_focused(&h.id(0)));

    assert!(h.panel.select_playlist(&other.id).unwrap());
    assert_eq!(h.controller.focus().unwrap().sound_id, None);
}
