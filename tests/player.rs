use spriteplay::{
    DisplaySink, FrameRate, FrameSequence, FrameSequencePlayer, PlayerConfig, PlayerState,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

type Shown = Vec<(Instant, Option<&'static str>)>;

#[derive(Default)]
struct Recorder {
    label: &'static str,
    shown: Mutex<Shown>,
}

impl Recorder {
    fn labelled(label: &'static str) -> Self {
        Self {
            label,
            shown: Mutex::default(),
        }
    }

    fn take(&self) -> Shown {
        std::mem::take(&mut *self.shown.lock().unwrap())
    }
}

impl DisplaySink<&'static str> for Recorder {
    fn show(&self, frame: Option<&&'static str>) {
        self.shown
            .lock()
            .unwrap()
            .push((Instant::now(), frame.copied()));
    }
}

fn sheet(frames: &[&'static str]) -> FrameSequence<&'static str> {
    FrameSequence::from(frames.to_vec())
}

fn player() -> FrameSequencePlayer<&'static str, Recorder> {
    FrameSequencePlayer::new(Recorder::default(), PlayerConfig::default())
}

fn frames_of(shown: &Shown) -> Vec<Option<&'static str>> {
    shown.iter().map(|(_, frame)| *frame).collect()
}

fn offsets_ms(shown: &Shown, origin: Instant) -> Vec<u128> {
    shown
        .iter()
        .map(|(at, _)| at.duration_since(origin).as_millis())
        .collect()
}

fn assert_gaps_at_least(shown: &Shown, gap: Duration) {
    for pair in shown.windows(2) {
        assert!(
            pair[1].0.duration_since(pair[0].0) >= gap,
            "frames closer than {gap:?}"
        );
    }
}

fn assert_offsets_near(actual: &[u128], expected: &[u128]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(*e) <= 5, "{actual:?} vs {expected:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn one_pass_shows_each_frame_once_then_goes_idle() {
    let mut player = player();
    let origin = Instant::now();
    player.start_animation(sheet(&["s1", "s2", "s3"]), false).await;

    sleep(Duration::from_secs(2)).await;
    let shown = player.sink().take();

    assert_eq!(frames_of(&shown), [Some("s1"), Some("s2"), Some("s3")]);
    assert_offsets_near(&offsets_ms(&shown, origin), &[0, 100, 200]);
    assert_gaps_at_least(&shown, Duration::from_millis(100));
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn looping_cycles_until_stopped() {
    let mut player = player();
    player.start_animation(sheet(&["a", "b", "c"]), true).await;

    sleep(Duration::from_millis(1050)).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    player.stop_animation().await;
    let shown = player.sink().take();

    let expected: Vec<_> = ["a", "b", "c"]
        .iter()
        .cycle()
        .take(11)
        .map(|f| Some(*f))
        .collect();
    assert_eq!(frames_of(&shown), expected);
    assert_gaps_at_least(&shown, Duration::from_millis(100));

    sleep(Duration::from_secs(1)).await;
    assert!(player.sink().take().is_empty());
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn empty_sequences_are_ignored() {
    let mut player = player();
    player.start_animation(sheet(&[]), true).await;
    player.play_one_shot_animation(sheet(&[])).await;
    sleep(Duration::from_secs(1)).await;

    assert!(player.sink().take().is_empty());
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.frames().is_none());
}

#[tokio::test(start_paused = true)]
async fn empty_sequence_leaves_the_current_run_alone() {
    let mut player = player();
    player.start_animation(sheet(&["a", "b"]), true).await;
    sleep(Duration::from_millis(50)).await;

    player.start_animation(sheet(&[]), false).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    assert!(player.is_looping());

    sleep(Duration::from_millis(100)).await;
    assert_eq!(frames_of(&player.sink().take()), [Some("a"), Some("b")]);
}

#[tokio::test(start_paused = true)]
async fn first_frame_is_shown_without_playing() {
    let player = player();
    player.set_first_frame(Some(&sheet(&["a", "b", "c"])));
    sleep(Duration::from_secs(1)).await;
    assert_eq!(frames_of(&player.sink().take()), [Some("a")]);
    assert_eq!(player.state(), PlayerState::Idle);

    player.set_first_frame(Some(&sheet(&[])));
    player.set_first_frame(None);
    assert_eq!(frames_of(&player.sink().take()), [None, None]);
}

#[tokio::test(start_paused = true)]
async fn restarting_cancels_the_previous_run_first() {
    let mut player = player();
    let origin = Instant::now();
    player.start_animation(sheet(&["a1", "a2", "a3"]), true).await;
    sleep(Duration::from_millis(150)).await;

    player.start_animation(sheet(&["b1", "b2"]), false).await;
    sleep(Duration::from_secs(1)).await;
    let shown = player.sink().take();

    assert_eq!(
        frames_of(&shown),
        [Some("a1"), Some("a2"), Some("b1"), Some("b2")]
    );
    assert_offsets_near(&offsets_ms(&shown, origin), &[0, 100, 150, 250]);
}

#[tokio::test(start_paused = true)]
async fn one_shot_replaces_a_looping_run() {
    let mut player = player();
    player.start_animation(sheet(&["a", "b"]), true).await;
    sleep(Duration::from_millis(50)).await;

    player.play_one_shot_animation(sheet(&["x", "y"])).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: false });
    sleep(Duration::from_secs(1)).await;

    assert_eq!(
        frames_of(&player.sink().take()),
        [Some("a"), Some("x"), Some("y")]
    );
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn frame_rate_change_applies_from_the_next_wait() {
    let mut player = player();
    let origin = Instant::now();
    player.start_animation(sheet(&["x", "y", "z"]), false).await;

    sleep(Duration::from_millis(50)).await;
    player
        .set_frame_rate(FrameRate::from_duration(Duration::from_millis(300)).unwrap())
        .await;
    sleep(Duration::from_secs(2)).await;

    let shown = player.sink().take();
    assert_eq!(frames_of(&shown), [Some("x"), Some("y"), Some("z")]);
    assert_offsets_near(&offsets_ms(&shown, origin), &[0, 100, 400]);
}

#[tokio::test(start_paused = true)]
async fn turning_loop_off_restarts_the_same_sequence_once() {
    let mut player = player();
    let origin = Instant::now();
    player.start_animation(sheet(&["a", "b", "c"]), true).await;
    sleep(Duration::from_millis(150)).await;

    player.set_loop(false).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: false });
    sleep(Duration::from_secs(2)).await;

    let shown = player.sink().take();
    assert_eq!(
        frames_of(&shown),
        [Some("a"), Some("b"), Some("a"), Some("b"), Some("c")]
    );
    assert_offsets_near(&offsets_ms(&shown, origin), &[0, 100, 150, 250, 350]);
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(!player.is_looping());
}

#[tokio::test(start_paused = true)]
async fn turning_loop_on_keeps_a_one_shot_going() {
    let mut player = player();
    player.play_one_shot_animation(sheet(&["a", "b"])).await;
    sleep(Duration::from_millis(50)).await;

    player.set_loop(true).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    sleep(Duration::from_millis(500)).await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    player.stop_animation().await;
}

#[tokio::test(start_paused = true)]
async fn reset_clears_the_index_but_not_the_display() {
    let mut player = player();
    player.play_one_shot_animation(sheet(&["a", "b", "c"])).await;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(player.current_index(), 2);
    player.sink().take();

    player.reset_animation();
    assert_eq!(player.current_index(), 0);
    sleep(Duration::from_secs(1)).await;
    assert!(player.sink().take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn resume_continues_from_the_recorded_frame() {
    let mut player = player();
    player.start_animation(sheet(&["a", "b", "c", "d"]), true).await;
    sleep(Duration::from_millis(250)).await;
    player.stop_animation().await;
    assert_eq!(player.current_index(), 2);

    player.resume_animation().await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    sleep(Duration::from_millis(150)).await;
    player.stop_animation().await;

    assert_eq!(
        frames_of(&player.sink().take()),
        [Some("a"), Some("b"), Some("c"), Some("c"), Some("d")]
    );
}

#[tokio::test(start_paused = true)]
async fn resuming_an_interrupted_one_shot_finishes_the_pass() {
    let mut player = player();
    player.play_one_shot_animation(sheet(&["a", "b", "c"])).await;
    sleep(Duration::from_millis(120)).await;
    player.stop_animation().await;
    assert_eq!(player.current_index(), 1);

    player.resume_animation().await;
    assert_eq!(player.state(), PlayerState::Playing { looping: false });
    sleep(Duration::from_secs(5)).await;

    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(
        frames_of(&player.sink().take()),
        [Some("a"), Some("b"), Some("b"), Some("c")]
    );
}

#[tokio::test(start_paused = true)]
async fn resume_follows_a_loop_change_made_while_idle() {
    let mut player = player();
    player.play_one_shot_animation(sheet(&["a", "b"])).await;
    sleep(Duration::from_millis(50)).await;
    player.stop_animation().await;

    player.set_loop(true).await;
    player.resume_animation().await;
    assert_eq!(player.state(), PlayerState::Playing { looping: true });
    player.stop_animation().await;
}

#[tokio::test(start_paused = true)]
async fn resume_after_reset_starts_over() {
    let mut player = player();
    player.start_animation(sheet(&["a", "b", "c"]), false).await;
    sleep(Duration::from_millis(150)).await;
    player.stop_animation().await;
    player.reset_animation();
    player.sink().take();

    player.resume_animation().await;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(
        frames_of(&player.sink().take()),
        [Some("a"), Some("b"), Some("c")]
    );
}

#[tokio::test(start_paused = true)]
async fn resume_without_frames_does_nothing() {
    let mut player = player();
    player.resume_animation().await;
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.sink().take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_player_stops_playback() {
    let recorder = Arc::new(Recorder::default());
    let mut player = FrameSequencePlayer::new(Arc::clone(&recorder), PlayerConfig::default());
    player.start_animation(sheet(&["a", "b"]), true).await;
    sleep(Duration::from_millis(150)).await;

    drop(player);
    sleep(Duration::from_secs(1)).await;
    assert_eq!(frames_of(&recorder.take()), [Some("a"), Some("b")]);
}

#[tokio::test(start_paused = true)]
async fn attach_prefers_the_configured_sink() {
    let config = PlayerConfig {
        frame_rate: FrameRate::from_secs_f32(0.05).unwrap(),
        looping: false,
    };
    let player: FrameSequencePlayer<&'static str, Recorder> = FrameSequencePlayer::attach(
        Some(Recorder::labelled("configured")),
        || Recorder::labelled("discovered"),
        config,
    );
    assert_eq!(player.sink().label, "configured");
    assert!(!player.is_looping());
    assert_eq!(player.frame_rate().await.as_duration(), Duration::from_millis(50));

    let player: FrameSequencePlayer<&'static str, Recorder> =
        FrameSequencePlayer::attach(None, || Recorder::labelled("discovered"), config);
    assert_eq!(player.sink().label, "discovered");
}
