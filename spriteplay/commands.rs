use log::{info, warn};
use spriteplay::{DisplaySink, FrameRate, FrameSequence, FrameSequencePlayer, PlaybackStatus};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum AnimatorCommand {
    Start {
        frames: FrameSequence<String>,
        looping: bool,
    },
    Stop,
    SetFirstFrame(Option<FrameSequence<String>>),
    PlayOnce(FrameSequence<String>),
    SetFrameRate(FrameRate),
    Reset,
    Resume,
    SetLoop(bool),
    Status(oneshot::Sender<PlaybackStatus>),
}

/// Owns the player and applies commands in arrival order. Playback stops
/// once every sender is gone.
pub async fn listen_for_commands<S>(
    mut player: FrameSequencePlayer<String, S>,
    mut command_receiver: mpsc::Receiver<AnimatorCommand>,
) where
    S: DisplaySink<String>,
{
    while let Some(command) = command_receiver.recv().await {
        match command {
            AnimatorCommand::Start { frames, looping } => {
                info!("Start animation, {} frames, loop {}", frames.len(), looping);
                player.start_animation(frames, looping).await;
            }
            AnimatorCommand::Stop => {
                info!("Stop animation");
                player.stop_animation().await;
            }
            AnimatorCommand::SetFirstFrame(frames) => {
                player.set_first_frame(frames.as_ref());
            }
            AnimatorCommand::PlayOnce(frames) => {
                info!("Play {} frames once", frames.len());
                player.play_one_shot_animation(frames).await;
            }
            AnimatorCommand::SetFrameRate(frame_rate) => {
                info!("Frame rate set to {}", frame_rate);
                player.set_frame_rate(frame_rate).await;
            }
            AnimatorCommand::Reset => {
                player.reset_animation();
            }
            AnimatorCommand::Resume => {
                info!("Resume animation");
                player.resume_animation().await;
            }
            AnimatorCommand::SetLoop(looping) => {
                info!("Loop set to {}", looping);
                player.set_loop(looping).await;
            }
            AnimatorCommand::Status(reply) => {
                if reply.send(player.status().await).is_err() {
                    warn!("Status requester went away");
                }
            }
        }
    }

    info!("Command channel closed, stopping playback");
    player.stop_animation().await;
}
