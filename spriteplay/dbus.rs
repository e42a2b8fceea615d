use crate::commands::AnimatorCommand;
use crate::error::App;
use log::{error, info};
use spriteplay::config::SheetLibrary;
use spriteplay::{FrameRate, FrameSequence};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use zbus::{fdo, interface, ConnectionBuilder};

pub const SERVICE_NAME: &str = "org.spriteplay.Animator";
pub const OBJECT_PATH: &str = "/org/spriteplay/Animator";

pub struct AnimatorDBus {
    tx: mpsc::Sender<AnimatorCommand>,
    stop_signal: watch::Sender<()>,
    sheets: Arc<SheetLibrary>,
}

impl AnimatorDBus {
    async fn send(&self, command: AnimatorCommand) -> fdo::Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|e| fdo::Error::Failed(e.to_string()))
    }

    fn sheet(&self, name: &str) -> fdo::Result<FrameSequence<String>> {
        self.sheets
            .get(name)
            .cloned()
            .map_err(|e| fdo::Error::InvalidArgs(e.to_string()))
    }
}

#[interface(name = "org.spriteplay.Animator")]
impl AnimatorDBus {
    #[allow(clippy::unused_self)]
    fn test_connection(&self) {}

    async fn start(&self, sheet: String, looping: bool) -> fdo::Result<()> {
        let frames = self.sheet(&sheet)?;
        self.send(AnimatorCommand::Start { frames, looping }).await
    }

    async fn stop_animation(&self) -> fdo::Result<()> {
        self.send(AnimatorCommand::Stop).await
    }

    /// An empty sheet name clears the display.
    async fn set_first_frame(&self, sheet: String) -> fdo::Result<()> {
        let frames = if sheet.is_empty() {
            None
        } else {
            Some(self.sheet(&sheet)?)
        };
        self.send(AnimatorCommand::SetFirstFrame(frames)).await
    }

    async fn play_once(&self, sheet: String) -> fdo::Result<()> {
        let frames = self.sheet(&sheet)?;
        self.send(AnimatorCommand::PlayOnce(frames)).await
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn set_frame_rate(&self, seconds: f64) -> fdo::Result<()> {
        let frame_rate = FrameRate::from_secs_f32(seconds as f32)
            .map_err(|e| fdo::Error::InvalidArgs(e.to_string()))?;
        self.send(AnimatorCommand::SetFrameRate(frame_rate)).await
    }

    async fn reset(&self) -> fdo::Result<()> {
        self.send(AnimatorCommand::Reset).await
    }

    async fn resume(&self) -> fdo::Result<()> {
        self.send(AnimatorCommand::Resume).await
    }

    async fn set_loop(&self, looping: bool) -> fdo::Result<()> {
        self.send(AnimatorCommand::SetLoop(looping)).await
    }

    async fn status(&self) -> fdo::Result<String> {
        let (reply, receiver) = oneshot::channel();
        self.send(AnimatorCommand::Status(reply)).await?;
        let status = receiver
            .await
            .map_err(|e| fdo::Error::Failed(e.to_string()))?;
        Ok(status.to_string())
    }

    fn list_sheets(&self) -> Vec<String> {
        self.sheets.names()
    }

    async fn quit(&self) -> fdo::Result<()> {
        self.send(AnimatorCommand::Stop).await?;
        if let Err(e) = self.stop_signal.send(()) {
            error!("Failed to send stop signal: {}", e);
        }
        Ok(())
    }
}

pub async fn run_dbus_server(
    command_sender: mpsc::Sender<AnimatorCommand>,
    stop_signal: watch::Sender<()>,
    sheets: Arc<SheetLibrary>,
) -> Result<(), App> {
    let mut stop_receiver = stop_signal.subscribe();
    let animator_dbus = AnimatorDBus {
        tx: command_sender,
        stop_signal: stop_signal.clone(),
        sheets,
    };

    let _connection = ConnectionBuilder::session()?
        .name(SERVICE_NAME)?
        .serve_at(OBJECT_PATH, animator_dbus)?
        .build()
        .await?;
    info!("Serving {} on the session bus", SERVICE_NAME);

    tokio::select! {
        _ = stop_receiver.changed() => {
            info!("Stop signal received, shutting down DBus server...");
        }
    }

    Ok(())
}
