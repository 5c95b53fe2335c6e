//! Integration tests for the playback coordinator
//!
//! These tests drive real selection, navigation and download scenarios
//! against a mocked backend and a recording transport. Timer behavior runs
//! on tokio's paused clock, so retries and settle delays are deterministic.

use melody_core::{CoreError, MockMusicApi, PlayableTrack, PlaybackOutcome, TrackDescriptor, TrackId, UserId};
use melody_playback::{
    Acquisition, AudioTransport, CoordinatorMessage, PlaybackConfig, PlaybackCoordinator,
    PlaybackError, PlaybackEvent, PlaybackState, RepeatMode, Selection, Transition,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

// ===== Test Helpers =====

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Attach(String),
    Detach,
    Play,
    Pause,
    Seek(Duration),
    Volume(u8),
}

/// Transport operation made to fail
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fault {
    None,
    Attach,
    Play,
}

/// Transport that records every call
struct RecordingTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    attached: bool,
    fault: Fault,
}

impl AudioTransport for RecordingTransport {
    fn attach(&mut self, track: &PlayableTrack) -> melody_playback::Result<()> {
        assert!(!self.attached, "attach while another source is attached");
        if self.fault == Fault::Attach {
            return Err(PlaybackError::Transport("unsupported media".into()));
        }
        self.attached = true;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Attach(track.media_locator.clone()));
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
        self.calls.lock().unwrap().push(Call::Detach);
    }

    fn play(&mut self) -> melody_playback::Result<()> {
        if self.fault == Fault::Play {
            return Err(PlaybackError::Transport("output device busy".into()));
        }
        self.calls.lock().unwrap().push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) -> melody_playback::Result<()> {
        self.calls.lock().unwrap().push(Call::Seek(position));
        Ok(())
    }

    fn set_volume(&mut self, level: u8) {
        self.calls.lock().unwrap().push(Call::Volume(level));
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

fn track(id: i64) -> TrackDescriptor {
    TrackDescriptor::new(TrackId::new(id), format!("Track {id}"), "Artist")
}

fn locator(id: i64) -> String {
    format!("https://files.example.com/{id}.mp3")
}

fn ready(id: TrackId) -> PlaybackOutcome {
    PlaybackOutcome::Ready {
        media_locator: locator(id.get()),
        handle: None,
    }
}

/// Backend where every track is immediately playable
fn ready_api() -> MockMusicApi {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .returning(|t| Ok(ready(t.id)));
    api
}

/// Backend where `deferred` keeps answering "accepted" for `accepted_polls`
/// requests before becoming ready; other tracks are ready at once
fn deferring_api(deferred: i64, accepted_polls: usize) -> (MockMusicApi, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut api = MockMusicApi::new();
    api.expect_request_playback().returning(move |t| {
        if t.id == TrackId::new(deferred) {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < accepted_polls {
                return Ok(PlaybackOutcome::Accepted);
            }
        }
        Ok(ready(t.id))
    });
    (api, calls)
}

fn coordinator(api: MockMusicApi) -> (PlaybackCoordinator, Arc<Mutex<Vec<Call>>>) {
    faulty_coordinator(api, Fault::None)
}

fn faulty_coordinator(
    api: MockMusicApi,
    fault: Fault,
) -> (PlaybackCoordinator, Arc<Mutex<Vec<Call>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let transport = RecordingTransport {
        calls: Arc::clone(&calls),
        attached: false,
        fault,
    };
    let coordinator =
        PlaybackCoordinator::new(Arc::new(api), Box::new(transport), PlaybackConfig::default())
            .with_rng_seed(42);
    (coordinator, calls)
}

fn current_id(coordinator: &PlaybackCoordinator) -> Option<i64> {
    coordinator.current_track().map(|t| t.id().get())
}

// ===== Selection =====

#[tokio::test(start_paused = true)]
async fn test_ready_track_starts_playing() {
    let (mut coordinator, calls) = coordinator(ready_api());

    let selection = coordinator.select_track(track(1)).await.unwrap();

    assert_eq!(selection, Selection::Playing);
    assert_eq!(coordinator.state(), PlaybackState::Playing);
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            Call::Volume(80),
            Call::Detach,
            Call::Attach(locator(1)),
            Call::Play
        ]
    );

    let events = coordinator.drain_events();
    assert!(events.contains(&PlaybackEvent::TrackChanged {
        track_id: TrackId::new(1),
        previous_track_id: None,
    }));
    assert!(coordinator.drain_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_selecting_current_track_toggles_without_network() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|t| Ok(ready(t.id)));
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(1)).await.unwrap();

    assert_eq!(
        coordinator.select_track(track(1)).await.unwrap(),
        Selection::Toggled
    );
    assert_eq!(coordinator.state(), PlaybackState::Paused);

    assert_eq!(
        coordinator.select_track(track(1)).await.unwrap(),
        Selection::Toggled
    );
    assert_eq!(coordinator.state(), PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_switching_tracks_detaches_before_attaching() {
    let (mut coordinator, calls) = coordinator(ready_api());

    coordinator.select_track(track(1)).await.unwrap();
    calls.lock().unwrap().clear();
    coordinator.select_track(track(2)).await.unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Call::Detach, Call::Attach(locator(2)), Call::Play]
    );
    assert!(coordinator.drain_events().contains(&PlaybackEvent::TrackChanged {
        track_id: TrackId::new(2),
        previous_track_id: Some(TrackId::new(1)),
    }));
}

#[tokio::test(start_paused = true)]
async fn test_failed_resolution_leaves_session_unchanged() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback().returning(|t| {
        if t.id == TrackId::new(2) {
            Err(CoreError::Server {
                status: 500,
                message: "failed to process track".into(),
            })
        } else {
            Ok(ready(t.id))
        }
    });
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(1)).await.unwrap();
    let before = coordinator.session().clone();

    let selection = coordinator.select_track(track(2)).await.unwrap();

    assert_eq!(selection, Selection::Failed);
    assert_eq!(coordinator.session(), &before);
    assert!(coordinator.pending().is_empty());
    assert!(matches!(
        coordinator.acquisition(TrackId::new(2)),
        Acquisition::Failed { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_attach_failure_unloads_track() {
    let (mut coordinator, calls) = faulty_coordinator(ready_api(), Fault::Attach);

    let result = coordinator.select_track(track(1)).await;

    assert!(matches!(result, Err(PlaybackError::Transport(_))));
    assert!(coordinator.current_track().is_none());
    assert_eq!(coordinator.state(), PlaybackState::Idle);
    assert!(!calls.lock().unwrap().contains(&Call::Play));
    assert!(coordinator.drain_events().contains(&PlaybackEvent::StateChanged {
        state: PlaybackState::Idle
    }));
}

#[tokio::test(start_paused = true)]
async fn test_play_failure_keeps_track_paused() {
    let (mut coordinator, _) = faulty_coordinator(ready_api(), Fault::Play);

    let result = coordinator.select_track(track(1)).await;

    assert!(matches!(result, Err(PlaybackError::Transport(_))));
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.state(), PlaybackState::Paused);
    let events = coordinator.drain_events();
    assert!(events.contains(&PlaybackEvent::TrackChanged {
        track_id: TrackId::new(1),
        previous_track_id: None,
    }));
    assert!(events.contains(&PlaybackEvent::StateChanged {
        state: PlaybackState::Paused
    }));
}

#[tokio::test(start_paused = true)]
async fn test_toggle_play_without_track_fails() {
    let (mut coordinator, _) = coordinator(MockMusicApi::new());

    assert!(matches!(
        coordinator.toggle_play(),
        Err(PlaybackError::NoTrackLoaded)
    ));
    assert_eq!(coordinator.state(), PlaybackState::Idle);
}

// ===== Download Queue =====

#[tokio::test(start_paused = true)]
async fn test_accepted_track_enters_download_queue_once() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|_| Ok(PlaybackOutcome::Accepted));
    let (mut coordinator, _) = coordinator(api);
    let start = Instant::now();

    let first = coordinator.select_track(track(7)).await.unwrap();
    let second = coordinator.select_track(track(7)).await.unwrap();

    assert_eq!(first, Selection::Downloading);
    assert_eq!(second, Selection::Ignored);
    assert_eq!(coordinator.downloads().len(), 1);
    assert_eq!(coordinator.pending().len(), 1);

    let entry = coordinator.pending().get(TrackId::new(7)).unwrap();
    assert_eq!(entry.total_wait, Duration::from_secs(15));
    assert_eq!(entry.deadline, start + Duration::from_secs(15));
    assert!(!entry.completed);

    // Nothing is loaded while downloading
    assert_eq!(coordinator.state(), PlaybackState::Idle);
    assert_eq!(
        coordinator.drain_events(),
        vec![PlaybackEvent::DownloadQueued {
            track_id: TrackId::new(7)
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_progress_ring_follows_wait_budget() {
    let (api, _) = deferring_api(7, usize::MAX);
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();
    assert_eq!(coordinator.progress(TrackId::new(7)), Some(0.0));

    tokio::time::advance(Duration::from_secs(3)).await;
    let progress = coordinator.progress(TrackId::new(7)).unwrap();
    assert!((progress - 0.2).abs() < 0.01, "progress was {progress}");

    assert_eq!(coordinator.progress(TrackId::new(8)), None);
}

#[tokio::test(start_paused = true)]
async fn test_background_completion_settles_and_refreshes_library() {
    let (mut api, _) = deferring_api(2, 1);
    api.expect_fetch_library()
        .times(1)
        .returning(|_| Ok(vec![track(1), track(2)]));
    let (mut coordinator, _) = coordinator(api);
    coordinator.set_user(UserId::new(123456));
    let start = Instant::now();

    coordinator.select_track(track(1)).await.unwrap();
    assert_eq!(
        coordinator.select_track(track(2)).await.unwrap(),
        Selection::Downloading
    );
    coordinator.drain_events();

    // Retry after 5s finds the track ready
    let retry = coordinator.next_message().await.unwrap();
    assert!(matches!(retry, CoordinatorMessage::Retry { .. }));
    assert!(Instant::now() - start >= Duration::from_secs(5));
    coordinator.handle_message(retry).await;

    let entry = coordinator.pending().get(TrackId::new(2)).unwrap();
    assert!(entry.completed);
    assert_eq!(coordinator.progress(TrackId::new(2)), Some(1.0));
    assert_eq!(
        coordinator.acquisition(TrackId::new(2)),
        Acquisition::Ready {
            locator: locator(2)
        }
    );

    // Settle 1.5s later clears the entry and reloads the library
    let settle = coordinator.next_message().await.unwrap();
    assert!(matches!(settle, CoordinatorMessage::Settle { .. }));
    assert!(Instant::now() - start >= Duration::from_millis(6500));
    coordinator.handle_message(settle).await;

    assert!(coordinator.pending().is_empty());
    let ids: Vec<i64> = coordinator
        .library()
        .tracks()
        .iter()
        .map(|t| t.id.get())
        .collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(coordinator.is_favorite(TrackId::new(2)));

    // Unrelated playback continued untouched
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.state(), PlaybackState::Playing);

    let events = coordinator.drain_events();
    assert!(events.contains(&PlaybackEvent::DownloadCompleted {
        track_id: TrackId::new(2)
    }));
    assert!(events.contains(&PlaybackEvent::PendingCleared {
        track_id: TrackId::new(2)
    }));
    assert!(events.contains(&PlaybackEvent::LibraryRefreshed { tracks: 2 }));
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_exhaustion_marks_failed() {
    let (api, calls) = deferring_api(7, usize::MAX);
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();

    while !coordinator.pending().is_empty() {
        let message = coordinator.next_message().await.unwrap();
        coordinator.handle_message(message).await;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        coordinator.acquisition(TrackId::new(7)),
        Acquisition::Failed {
            reason: "timed out".to_string()
        }
    );
    assert!(coordinator.downloads().contains(TrackId::new(7)));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(coordinator.run_pending().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_on_retry_ends_download() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut api = MockMusicApi::new();
    api.expect_request_playback().times(2).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(PlaybackOutcome::Accepted)
        } else {
            Err(CoreError::Server {
                status: 500,
                message: "failed to process track".into(),
            })
        }
    });
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();
    coordinator.drain_events();

    let retry = coordinator.next_message().await.unwrap();
    coordinator.handle_message(retry).await;

    assert!(coordinator.pending().is_empty());
    assert!(matches!(
        coordinator.acquisition(TrackId::new(7)),
        Acquisition::Failed { .. }
    ));
    assert!(coordinator.downloads().contains(TrackId::new(7)));
    let events = coordinator.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::DownloadFailed { track_id, .. } if *track_id == TrackId::new(7)
    )));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(coordinator.run_pending().await, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_downloads_cancels_retries() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|_| Ok(PlaybackOutcome::Accepted));
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();
    assert_eq!(coordinator.clear_downloads(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(coordinator.run_pending().await, 0);
    assert!(coordinator.pending().is_empty());
    assert!(coordinator.downloads().is_empty());
    assert_eq!(
        coordinator.acquisition(TrackId::new(7)),
        Acquisition::NotRequested
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_download_keeps_queue_entry() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|_| Ok(PlaybackOutcome::Accepted));
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();
    assert!(coordinator.cancel_download(TrackId::new(7)));
    assert!(!coordinator.cancel_download(TrackId::new(7)));

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(coordinator.run_pending().await, 0);
    assert!(coordinator.downloads().contains(TrackId::new(7)));
    assert!(coordinator.pending().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_retry_message_is_dropped() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|_| Ok(PlaybackOutcome::Accepted));
    let (mut coordinator, _) = coordinator(api);

    coordinator.select_track(track(7)).await.unwrap();
    let retry = coordinator.next_message().await.unwrap();

    coordinator.clear_downloads();
    coordinator.handle_message(retry).await;

    assert!(coordinator.pending().is_empty());
}

// ===== Navigation =====

#[tokio::test(start_paused = true)]
async fn test_repeat_one_restarts_current_track() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback()
        .times(1)
        .returning(|t| Ok(ready(t.id)));
    let (mut coordinator, calls) = coordinator(api);
    coordinator.set_library(vec![track(1), track(2)]);

    coordinator.select_track(track(1)).await.unwrap();
    coordinator.set_repeat(RepeatMode::One);
    coordinator.on_time_update(Duration::from_secs(42), Some(Duration::from_secs(180)));

    let transition = coordinator.next().await.unwrap();

    assert_eq!(transition, Transition::Restarted);
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.session().position, Duration::ZERO);
    assert_eq!(coordinator.state(), PlaybackState::Playing);
    assert_eq!(
        calls.lock().unwrap().last(),
        Some(&Call::Seek(Duration::ZERO))
    );
}

#[tokio::test(start_paused = true)]
async fn test_library_end_with_repeat_off_stops() {
    let (mut coordinator, _) = coordinator(ready_api());
    coordinator.set_library(vec![track(1), track(2), track(3)]);

    coordinator.select_track(track(2)).await.unwrap();

    assert_eq!(
        coordinator.next().await.unwrap(),
        Transition::Selected(Selection::Playing)
    );
    assert_eq!(current_id(&coordinator), Some(3));

    assert_eq!(coordinator.next().await.unwrap(), Transition::Stopped);
    assert_eq!(current_id(&coordinator), Some(3));
    assert_eq!(coordinator.state(), PlaybackState::Paused);
}

#[tokio::test(start_paused = true)]
async fn test_track_end_with_downloading_successor_pauses() {
    let (api, _) = deferring_api(2, usize::MAX);
    let (mut coordinator, calls) = coordinator(api);
    coordinator.set_library(vec![track(1), track(2)]);
    coordinator.select_track(track(1)).await.unwrap();
    calls.lock().unwrap().clear();
    coordinator.drain_events();

    let transition = coordinator.on_track_ended().await.unwrap();

    assert_eq!(transition, Transition::Selected(Selection::Downloading));
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.state(), PlaybackState::Paused);
    assert!(calls.lock().unwrap().is_empty());
    assert!(coordinator.drain_events().contains(&PlaybackEvent::StateChanged {
        state: PlaybackState::Paused
    }));

    // A single press resumes the ended track
    coordinator.toggle_play().unwrap();
    assert_eq!(coordinator.state(), PlaybackState::Playing);
    assert_eq!(*calls.lock().unwrap(), vec![Call::Play]);
}

#[tokio::test(start_paused = true)]
async fn test_track_end_with_failing_successor_pauses() {
    let mut api = MockMusicApi::new();
    api.expect_request_playback().returning(|t| {
        if t.id == TrackId::new(2) {
            Err(CoreError::network("connection reset"))
        } else {
            Ok(ready(t.id))
        }
    });
    let (mut coordinator, _) = coordinator(api);
    coordinator.set_library(vec![track(1), track(2)]);
    coordinator.select_track(track(1)).await.unwrap();

    let transition = coordinator.on_track_ended().await.unwrap();

    assert_eq!(transition, Transition::Selected(Selection::Failed));
    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.state(), PlaybackState::Paused);
}

#[tokio::test(start_paused = true)]
async fn test_library_end_with_repeat_all_wraps() {
    let (mut coordinator, _) = coordinator(ready_api());
    coordinator.set_library(vec![track(1), track(2), track(3)]);
    coordinator.set_repeat(RepeatMode::All);

    coordinator.select_track(track(3)).await.unwrap();
    coordinator.on_track_ended().await.unwrap();

    assert_eq!(current_id(&coordinator), Some(1));
    assert_eq!(coordinator.state(), PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_prev_at_start_wraps_even_with_shuffle() {
    let (mut coordinator, _) = coordinator(ready_api());
    coordinator.set_library(vec![track(1), track(2), track(3)]);
    coordinator.set_shuffle(true);

    coordinator.select_track(track(1)).await.unwrap();
    coordinator.prev().await.unwrap();

    assert_eq!(current_id(&coordinator), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_current_track_outside_library() {
    let (mut coordinator, _) = coordinator(ready_api());
    coordinator.set_library(vec![track(1), track(2)]);

    coordinator.select_track(track(9)).await.unwrap();

    assert_eq!(coordinator.next().await.unwrap(), Transition::Stopped);
    coordinator.prev().await.unwrap();
    assert_eq!(current_id(&coordinator), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_without_track_or_library_is_noop() {
    let (mut coordinator, _) = coordinator(ready_api());
    coordinator.set_library(vec![track(1)]);

    assert_eq!(coordinator.next().await.unwrap(), Transition::None);
    assert_eq!(coordinator.prev().await.unwrap(), Transition::None);

    coordinator.select_track(track(1)).await.unwrap();
    coordinator.set_library(Vec::new());
    coordinator.set_repeat(RepeatMode::One);
    assert_eq!(coordinator.next().await.unwrap(), Transition::None);
}

#[tokio::test(start_paused = true)]
async fn test_shuffle_picks_library_members() {
    let (mut coordinator, _) = coordinator(ready_api());
    let library: Vec<_> = (1..=5).map(track).collect();
    coordinator.set_library(library);
    coordinator.set_shuffle(true);

    coordinator.select_track(track(1)).await.unwrap();
    for _ in 0..20 {
        coordinator.next().await.unwrap();
        let id = current_id(&coordinator).unwrap();
        assert!((1..=5).contains(&id));
        assert_eq!(coordinator.state(), PlaybackState::Playing);
    }
}

#[tokio::test(start_paused = true)]
async fn test_seek_is_clamped_to_track_duration() {
    let (mut coordinator, calls) = coordinator(ready_api());

    coordinator
        .select_track(track(1).with_duration(180))
        .await
        .unwrap();
    coordinator.seek(Duration::from_secs(500)).unwrap();

    assert_eq!(coordinator.session().position, Duration::from_secs(180));
    assert_eq!(
        calls.lock().unwrap().last(),
        Some(&Call::Seek(Duration::from_secs(180)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_modes_and_volume() {
    let (mut coordinator, calls) = coordinator(MockMusicApi::new());

    assert_eq!(coordinator.toggle_repeat(), RepeatMode::All);
    assert_eq!(coordinator.toggle_repeat(), RepeatMode::One);
    assert_eq!(coordinator.toggle_repeat(), RepeatMode::Off);
    assert!(coordinator.toggle_shuffle());
    assert!(!coordinator.toggle_shuffle());

    coordinator.set_volume(250);
    assert_eq!(coordinator.session().volume, 100);
    assert_eq!(calls.lock().unwrap().last(), Some(&Call::Volume(100)));

    assert!(matches!(
        coordinator.seek(Duration::from_secs(1)),
        Err(PlaybackError::NoTrackLoaded)
    ));
}

// ===== Library & Likes =====

#[tokio::test(start_paused = true)]
async fn test_library_refresh_failure_clears_library() {
    let mut api = MockMusicApi::new();
    api.expect_fetch_library()
        .returning(|_| Err(CoreError::network("offline")));
    let (mut coordinator, _) = coordinator(api);
    coordinator.set_library(vec![track(1)]);

    assert!(matches!(
        coordinator.refresh_library().await,
        Err(PlaybackError::NoUser)
    ));
    assert_eq!(coordinator.library().len(), 1);

    coordinator.set_user(UserId::new(1));
    assert!(coordinator.refresh_library().await.is_err());
    assert!(coordinator.library().is_empty());
    assert!(!coordinator.is_favorite(TrackId::new(1)));
}

#[tokio::test(start_paused = true)]
async fn test_like_is_reverted_on_failure() {
    let mut api = MockMusicApi::new();
    api.expect_like()
        .times(1)
        .returning(|_, _| Err(CoreError::network("offline")));
    let (mut coordinator, _) = coordinator(api);
    coordinator.set_user(UserId::new(1));

    let result = coordinator.toggle_like(&track(5)).await;

    assert!(result.is_err());
    assert!(!coordinator.is_favorite(TrackId::new(5)));
    assert_eq!(
        coordinator.drain_events(),
        vec![
            PlaybackEvent::FavoriteChanged {
                track_id: TrackId::new(5),
                liked: true
            },
            PlaybackEvent::FavoriteChanged {
                track_id: TrackId::new(5),
                liked: false
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_like_and_unlike_round_trip() {
    let mut api = MockMusicApi::new();
    api.expect_like().times(1).returning(|_, _| Ok(()));
    api.expect_unlike().times(1).returning(|_, _| Ok(()));
    let (mut coordinator, _) = coordinator(api);
    coordinator.set_user(UserId::new(1));

    assert!(coordinator.toggle_like(&track(5)).await.unwrap());
    assert!(coordinator.is_favorite(TrackId::new(5)));
    assert!(!coordinator.toggle_like(&track(5)).await.unwrap());
    assert!(!coordinator.is_favorite(TrackId::new(5)));
}
