use crate::player::frames::{FrameRate, FrameSequence};
use crate::player::sink::DisplaySink;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::time::sleep;

/// Everything one playback task needs, moved into the task on launch.
pub(crate) struct Playback<T, S> {
    pub frames: FrameSequence<T>,
    pub sink: Arc<S>,
    pub frame_rate: Arc<RwLock<FrameRate>>,
    pub current_index: Arc<AtomicUsize>,
    pub looping: bool,
    pub start_at: usize,
}

impl<T, S> Playback<T, S>
where
    T: Send + Sync + 'static,
    S: DisplaySink<T>,
{
    /// Writes frames in order, holding each for the frame rate read at the
    /// start of its wait. Returns after one pass unless looping, or as soon as
    /// `stop` fires or its sender is dropped.
    pub async fn run(self, mut stop: watch::Receiver<()>) {
        let len = self.frames.len();
        if len == 0 {
            return;
        }
        let mut index = self.start_at % len;

        loop {
            self.current_index.store(index, Ordering::SeqCst);
            self.sink.show(self.frames.get(index));

            let hold = self.frame_rate.read().await.as_duration();
            tokio::select! {
                biased;
                _ = stop.changed() => {
                    debug!("Playback cancelled on frame {}", index);
                    return;
                }
                () = sleep(hold) => {}
            }

            index += 1;
            if index == len {
                if !self.looping {
                    debug!("One pass over {} frames finished", len);
                    return;
                }
                index = 0;
            }
        }
    }
}
