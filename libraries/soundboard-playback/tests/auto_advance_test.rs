//! Natural end-of-track handling
//!
//! A `playing: false` notification with no manual-stop marker is a natural
//! end: the focused, non-repeating sound hands over to the next one. The
//! playlist stops at its last sound; only next/prev wrap around.

mod common;

use common::Harness;
use soundboard_core::{DocumentStore, SoundUpdate};
use std::time::Duration;

async fn play_first(h: &mut Harness) {
    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.pump().await;
}

#[tokio::test(start_paused = true)]
async fn natural_end_advances_to_next_sound() {
    let mut h = Harness::new(&["A", "B", "C"]);
    play_first(&mut h).await;

    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(1)));
    assert!(h.sound(1).playing);
    assert!(!h.sound(0).playing);
    assert!(!h.sound(2).playing);

    let last = h.documents.update_log().pop().unwrap();
    assert_eq!(last.sound_id, h.id(1));
    assert_eq!(last.update, SoundUpdate::new().playing(true));
}

#[tokio::test(start_paused = true)]
async fn natural_end_of_last_sound_does_not_wrap() {
    let mut h = Harness::new(&["A", "B"]);
    h.controller.toggle_play(&h.id(1)).await.unwrap();
    h.pump().await;
    h.documents.clear_update_log();

    h.documents.finish_sound(&h.playlist.id, &h.id(1)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(1)));
    assert!(!h.sound(0).playing);
    assert!(!h.sound(1).playing);
    assert!(h.documents.update_log().is_empty());

    // The buttons do wrap
    assert_eq!(h.controller.next(), Some(h.id(0)));
}

#[tokio::test(start_paused = true)]
async fn playlist_plays_through_then_stops() {
    let mut h = Harness::new(&["A", "B", "C"]);
    play_first(&mut h).await;

    for i in 0..3 {
        assert!(h.sound(i).playing);
        h.documents.finish_sound(&h.playlist.id, &h.id(i)).unwrap();
        h.pump().await;
    }

    assert!(!h.controller.is_playlist_playing(&h.playlist_id()));
    assert!(h.controller.is_focused(&h.id(2)));
}

#[tokio::test(start_paused = true)]
async fn manual_pause_does_not_advance() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;

    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(0)));
    assert!(!h.sound(1).playing);
}

#[tokio::test(start_paused = true)]
async fn manual_stop_does_not_advance() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;

    h.controller.stop().await.unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(0)));
    assert!(!h.sound(0).playing);
    assert!(!h.sound(1).playing);
}

#[tokio::test(start_paused = true)]
async fn marker_is_consumed_exactly_once() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;

    // Manual pause consumes its marker
    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.pump().await;
    assert!(!h.sound(1).playing);

    // A later natural end is not mistaken for a manual stop
    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.pump().await;
    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(1)));
    assert!(h.sound(1).playing);
}

#[tokio::test(start_paused = true)]
async fn unconsumed_marker_expires() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;

    // The pause notification is lost, so its marker is never consumed
    h.controller.toggle_play(&h.id(0)).await.unwrap();
    h.drop_events();

    // Resumed by another participant
    h.documents
        .update_sound(&h.playlist.id, &h.id(0), SoundUpdate::new().playing(true))
        .await
        .unwrap();
    h.pump().await;

    tokio::time::advance(Duration::from_secs(3)).await;
    h.controller.tick();

    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(1)));
    assert!(h.sound(1).playing);
}

#[tokio::test(start_paused = true)]
async fn repeating_sound_does_not_advance() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;
    h.controller.toggle_loop().await.unwrap();
    h.pump().await;

    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(0)));
    assert!(!h.sound(1).playing);
}

#[tokio::test(start_paused = true)]
async fn unfocused_sound_ending_does_not_advance() {
    let mut h = Harness::new(&["A", "B", "C"]);
    play_first(&mut h).await;
    h.controller.next();
    h.controller.next();

    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.pump().await;

    assert!(h.controller.is_focused(&h.id(2)));
    assert!(!h.sound(1).playing);
    assert!(!h.sound(2).playing);
}

#[tokio::test(start_paused = true)]
async fn sound_in_another_playlist_ending_does_not_advance() {
    let mut h = Harness::new(&["A", "B"]);
    let other = h.documents.seed_playlist("Forest", &["Birds", "Wind"]);
    play_first(&mut h).await;

    h.documents
        .update_sound(&other.id, &other.sounds[0].id, SoundUpdate::new().playing(true))
        .await
        .unwrap();
    h.pump().await;
    h.documents
        .finish_sound(&other.id, &other.sounds[0].id)
        .unwrap();
    h.pump().await;

    let wind = h.documents.sound(&other.id, &other.sounds[1].id).unwrap();
    assert!(!wind.playing);
    assert!(h.controller.is_focused(&h.id(0)));
}

#[tokio::test(start_paused = true)]
async fn failed_advance_is_logged_not_raised() {
    let mut h = Harness::new(&["A", "B"]);
    play_first(&mut h).await;

    h.documents.finish_sound(&h.playlist.id, &h.id(0)).unwrap();
    h.documents.fail_next_writes(1);
    h.pump().await;

    // Focus moved; the play request was rejected and nothing is retried
    assert!(h.controller.is_focused(&h.id(1)));
    assert!(!h.sound(1).playing);
}
