use std::sync::Arc;
use tokio::sync::watch;

/// The display element that shows the current frame.
///
/// `None` clears the element. Implementations must not block: `show` is
/// called from the playback task between frame holds.
pub trait DisplaySink<T>: Send + Sync + 'static {
    fn show(&self, frame: Option<&T>);
}

impl<T, S: DisplaySink<T>> DisplaySink<T> for Arc<S> {
    fn show(&self, frame: Option<&T>) {
        (**self).show(frame);
    }
}

/// A single "current frame" slot that others can watch.
#[derive(Debug)]
pub struct FrameSlot<T> {
    current: watch::Sender<Option<T>>,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.current.subscribe()
    }
}

impl<T: Clone> FrameSlot<T> {
    pub fn current(&self) -> Option<T> {
        self.current.borrow().clone()
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DisplaySink<T> for FrameSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn show(&self, frame: Option<&T>) {
        self.current.send_replace(frame.cloned());
    }
}
