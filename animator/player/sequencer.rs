use crate::player::frames::{FrameRate, FrameSequence};
use crate::player::playback::Playback;
use crate::player::sink::DisplaySink;
use log::{debug, error};
use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::{self, JoinHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing { looping: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub state: PlayerState,
    pub frame_rate: FrameRate,
    pub looping: bool,
    pub current_index: usize,
}

impl PlaybackStatus {
    pub fn is_running(&self) -> bool {
        matches!(self.state, PlayerState::Playing { .. })
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            PlayerState::Idle => "idle",
            PlayerState::Playing { looping: true } => "playing (loop)",
            PlayerState::Playing { looping: false } => "playing (once)",
        };
        write!(
            f,
            "{state}, frame {}, {} per frame, loop {}",
            self.current_index,
            self.frame_rate,
            if self.looping { "on" } else { "off" }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub frame_rate: FrameRate,
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::DEFAULT,
            looping: true,
        }
    }
}

struct Run<T> {
    stop: watch::Sender<()>,
    handle: JoinHandle<()>,
    frames: FrameSequence<T>,
    looping: bool,
}

impl<T> Run<T> {
    fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Plays frame sequences into a [`DisplaySink`], one run at a time.
///
/// Every operation that launches a run first cancels the previous one and
/// waits for its task to end, so the sink never sees interleaved writes.
/// Dropping the player stops playback at the next frame boundary.
pub struct FrameSequencePlayer<T, S> {
    sink: Arc<S>,
    frame_rate: Arc<RwLock<FrameRate>>,
    current_index: Arc<AtomicUsize>,
    looping: bool,
    /// Loop mode of the last launched run, or the last `set_loop` value.
    resume_looping: bool,
    frames: Option<FrameSequence<T>>,
    run: Option<Run<T>>,
}

impl<T, S> FrameSequencePlayer<T, S>
where
    T: Send + Sync + 'static,
    S: DisplaySink<T>,
{
    pub fn new(sink: S, config: PlayerConfig) -> Self {
        Self {
            sink: Arc::new(sink),
            frame_rate: Arc::new(RwLock::new(config.frame_rate)),
            current_index: Arc::new(AtomicUsize::new(0)),
            looping: config.looping,
            resume_looping: config.looping,
            frames: None,
            run: None,
        }
    }

    /// Binds to `sink` if one was configured, otherwise to whatever
    /// `discover` finds.
    pub fn attach<F>(sink: Option<S>, discover: F, config: PlayerConfig) -> Self
    where
        F: FnOnce() -> S,
    {
        Self::new(sink.unwrap_or_else(discover), config)
    }

    pub async fn start_animation(&mut self, frames: FrameSequence<T>, looping: bool) {
        if frames.is_empty() {
            return;
        }
        self.cancel().await;
        self.looping = looping;
        debug!(
            "Starting animation of {} frames, loop {}",
            frames.len(),
            looping
        );
        self.launch(frames, looping, 0);
    }

    pub async fn stop_animation(&mut self) {
        self.cancel().await;
    }

    /// Shows the first frame without playing, or clears the display when
    /// there is nothing to show.
    pub fn set_first_frame(&self, frames: Option<&FrameSequence<T>>) {
        self.sink.show(frames.and_then(FrameSequence::first));
    }

    pub async fn play_one_shot_animation(&mut self, frames: FrameSequence<T>) {
        if frames.is_empty() {
            return;
        }
        self.cancel().await;
        debug!("Playing {} frames once", frames.len());
        self.launch(frames, false, 0);
    }

    pub async fn set_frame_rate(&self, frame_rate: FrameRate) {
        *self.frame_rate.write().await = frame_rate;
    }

    pub fn reset_animation(&self) {
        self.current_index.store(0, Ordering::SeqCst);
    }

    pub async fn set_loop(&mut self, should_loop: bool) {
        self.looping = should_loop;
        self.resume_looping = should_loop;
        let frames = match &self.run {
            Some(run) if run.is_active() => run.frames.clone(),
            _ => return,
        };
        self.cancel().await;
        debug!("Restarting animation with loop {}", should_loop);
        self.launch(frames, should_loop, 0);
    }

    /// Continues the last sequence from the recorded frame index, in the
    /// loop mode that run was launched with.
    pub async fn resume_animation(&mut self) {
        if self.state() != PlayerState::Idle {
            return;
        }
        let Some(frames) = self.frames.clone() else {
            return;
        };
        self.cancel().await;
        let start_at = self.current_index();
        debug!("Resuming animation at frame {}", start_at);
        self.launch(frames, self.resume_looping, start_at);
    }

    pub fn state(&self) -> PlayerState {
        match &self.run {
            Some(run) if run.is_active() => PlayerState::Playing {
                looping: run.looping,
            },
            _ => PlayerState::Idle,
        }
    }

    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state(),
            frame_rate: self.frame_rate().await,
            looping: self.looping,
            current_index: self.current_index(),
        }
    }

    pub async fn frame_rate(&self) -> FrameRate {
        *self.frame_rate.read().await
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn current_index(&self) -> usize {
        self.current_index.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> Option<&FrameSequence<T>> {
        self.frames.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn launch(&mut self, frames: FrameSequence<T>, looping: bool, start_at: usize) {
        let (stop, stop_receiver) = watch::channel(());
        let playback = Playback {
            frames: frames.clone(),
            sink: Arc::clone(&self.sink),
            frame_rate: Arc::clone(&self.frame_rate),
            current_index: Arc::clone(&self.current_index),
            looping,
            start_at,
        };
        let handle = task::spawn(playback.run(stop_receiver));
        self.frames = Some(frames.clone());
        self.resume_looping = looping;
        self.run = Some(Run {
            stop,
            handle,
            frames,
            looping,
        });
    }

    async fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            let _ = run.stop.send(());
            if let Err(e) = run.handle.await {
                error!("Playback task ended abnormally: {}", e);
            }
        }
    }
}

impl<T, S> Drop for FrameSequencePlayer<T, S> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            let _ = run.stop.send(());
        }
    }
}
