//! Sprite sheet animation driver.
//!
//! A [`FrameSequencePlayer`] cycles an ordered [`FrameSequence`] into a
//! [`DisplaySink`] at a fixed [`FrameRate`], optionally looping. Playback runs
//! as a single tokio task per player which is cancelled and awaited before any
//! new run begins.

pub mod config;
pub mod error;
pub mod player;

pub use crate::error::AnimatorError;
pub use crate::player::{
    DisplaySink, FrameRate, FrameSequence, FrameSequencePlayer, FrameSlot, PlaybackStatus,
    PlayerConfig, PlayerState,
};
