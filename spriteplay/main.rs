mod commands;
mod dbus;
mod error;
mod screen;

use crate::error::App;
use crate::screen::Screen;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use log::{error, info, warn};
use spriteplay::config::{Config, SAMPLE_CONFIG};
use spriteplay::FrameSequencePlayer;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::signal;
use tokio::time::{self, Duration};
use tokio::{
    sync::{mpsc, watch},
    task,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), App> {
    let home_dir = std::env::var("HOME")?;
    let config_dir = format!("{home_dir}/.config/spriteplay");
    let log_dir = format!("{config_dir}/logs");
    fs::create_dir_all(&log_dir).await?;

    let config_path = format!("{config_dir}/config.toml");
    if !Path::new(&config_path).exists() {
        fs::write(&config_path, SAMPLE_CONFIG).await?;
    }
    let config = Config::load_from_file(&config_path).await?;

    let _logger = Logger::try_with_str(&config.log.level)?
        .log_to_file(FileSpec::default().directory(&log_dir))
        .rotate(
            Criterion::Size(1_000_000),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(3),
        )
        .duplicate_to_stderr(Duplicate::None)
        .start()?;
    info!("Loaded config from {}", config_path);

    let sheets = Arc::new(config.sheet_library());
    if sheets.is_empty() {
        warn!("No sheets configured in {}", config_path);
    } else {
        info!("Loaded sheets: {}", sheets.names().join(", "));
    }

    let screen = config.display.target.map(Screen::from_target);
    let player = FrameSequencePlayer::attach(screen, Screen::discover, config.player);
    info!("Displaying frames on {:?}", player.sink());

    let (command_sender, command_receiver) = mpsc::channel(8);
    let (stop_sender, stop_receiver) = watch::channel(());

    let player_task = task::spawn(commands::listen_for_commands(player, command_receiver));

    task::spawn({
        let stop_signal = stop_sender.clone();
        async move {
            if let Err(e) =
                dbus::run_dbus_server(command_sender, stop_signal.clone(), sheets).await
            {
                error!("DBus server error: {}", e);
                let _ = stop_signal.send(());
            }
        }
    });

    wait_for_shutdown(stop_receiver).await;
    let _ = stop_sender.send(());
    match time::timeout(SHUTDOWN_GRACE, player_task).await {
        Ok(joined) => joined?,
        Err(_) => warn!("Playback did not stop within {:?}", SHUTDOWN_GRACE),
    }
    info!("spriteplay exited");
    Ok(())
}

async fn wait_for_shutdown(mut stop_receiver: watch::Receiver<()>) {
    tokio::select! {
        _ = stop_receiver.changed() => {
            info!("Stop requested");
        }
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted");
        }
    }
}
