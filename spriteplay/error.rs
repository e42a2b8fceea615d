use flexi_logger::FlexiLoggerError;
use spriteplay::AnimatorError;
use std::io;
use thiserror::Error;
use tokio::task::JoinError;
use zbus::Error as ZbusError;

#[derive(Error, Debug)]
pub enum App {
    #[error("Animator error: {0}")]
    Animator(#[from] AnimatorError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Logger initialization error: {0}")]
    Logger(#[from] FlexiLoggerError),

    #[error("ZBus error: {0}")]
    Zbus(#[from] ZbusError),

    #[error("Join task error: {0}")]
    JoinTask(#[from] JoinError),
}
