use log::info;
use spriteplay::config::DisplayTarget;
use spriteplay::DisplaySink;
use std::io::{self, IsTerminal, Write};

/// Where the daemon shows frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Redraws the current line of stdout.
    Terminal,
    Log,
}

impl Screen {
    pub fn from_target(target: DisplayTarget) -> Self {
        match target {
            DisplayTarget::Terminal => Screen::Terminal,
            DisplayTarget::Log => Screen::Log,
        }
    }

    pub fn discover() -> Self {
        if io::stdout().is_terminal() {
            Screen::Terminal
        } else {
            Screen::Log
        }
    }
}

impl DisplaySink<String> for Screen {
    fn show(&self, frame: Option<&String>) {
        match self {
            Screen::Terminal => {
                let mut stdout = io::stdout().lock();
                let _ = write!(stdout, "\r\x1b[2K{}", frame.map_or("", String::as_str));
                let _ = stdout.flush();
            }
            Screen::Log => match frame {
                Some(frame) => info!("Frame: {}", frame),
                None => info!("Display cleared"),
            },
        }
    }
}
