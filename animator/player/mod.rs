pub mod frames;
mod playback;
pub mod sequencer;
pub mod sink;

pub use self::frames::{FrameRate, FrameSequence};
pub use self::sequencer::{FrameSequencePlayer, PlaybackStatus, PlayerConfig, PlayerState};
pub use self::sink::{DisplaySink, FrameSlot};
