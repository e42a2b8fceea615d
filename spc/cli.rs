mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::App;
use tokio::process::Command;
use zbus::{proxy, Connection};

type StdResult<T> = std::result::Result<T, App>;

#[proxy(
    interface = "org.spriteplay.Animator",
    default_service = "org.spriteplay.Animator",
    default_path = "/org/spriteplay/Animator"
)]
trait Animator {
    async fn test_connection(&self) -> zbus::Result<()>;
    async fn start(&self, sheet: &str, looping: bool) -> zbus::Result<()>;
    async fn stop_animation(&self) -> zbus::Result<()>;
    async fn set_first_frame(&self, sheet: &str) -> zbus::Result<()>;
    async fn play_once(&self, sheet: &str) -> zbus::Result<()>;
    async fn set_frame_rate(&self, seconds: f64) -> zbus::Result<()>;
    async fn reset(&self) -> zbus::Result<()>;
    async fn resume(&self) -> zbus::Result<()>;
    async fn set_loop(&self, looping: bool) -> zbus::Result<()>;
    async fn status(&self) -> zbus::Result<String>;
    async fn list_sheets(&self) -> zbus::Result<Vec<String>>;
    async fn quit(&self) -> zbus::Result<()>;
}

#[derive(Parser)]
#[command(name = "spc", about = "Control the spriteplay animator.", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the spriteplay daemon")]
    Launch,

    #[command(about = "Play a sheet")]
    Play(PlayCommand),

    #[command(about = "Stop the running animation")]
    Stop,

    #[command(about = "Show the first frame of a sheet, or clear the display")]
    First(FirstCommand),

    #[command(about = "Set the seconds each frame is held")]
    Rate(RateCommand),

    #[command(about = "Turn looping on or off")]
    Loop(LoopCommand),

    #[command(about = "Reset the frame counter")]
    Reset,

    #[command(about = "Continue the last sheet from the current frame")]
    Resume,

    #[command(about = "Show playback status")]
    Status,

    #[command(about = "List configured sheets")]
    Sheets,

    #[command(about = "Shut down spriteplay")]
    Quit,
}

#[derive(Parser)]
struct PlayCommand {
    #[arg(help = "Sheet name from the config")]
    sheet: String,
    #[arg(short = 'o', long = "once", help = "Play a single pass")]
    once: bool,
    #[arg(
        short = 'n',
        long = "no-loop",
        conflicts_with = "once",
        help = "Start without looping"
    )]
    no_loop: bool,
}

#[derive(Parser)]
struct FirstCommand {
    #[arg(help = "Sheet name; omit to clear the display")]
    sheet: Option<String>,
}

#[derive(Parser)]
struct RateCommand {
    #[arg(allow_negative_numbers = true, help = "Seconds between frames")]
    seconds: f64,
}

#[derive(Parser)]
struct LoopCommand {
    #[arg(value_enum)]
    mode: Toggle,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    let cli = Cli::parse();
    let connection = Connection::session().await?;
    let proxy = AnimatorProxy::new(&connection).await?;
    handle_command(cli, &proxy).await
}

async fn handle_command(cli: Cli, proxy: &AnimatorProxy<'_>) -> StdResult<()> {
    if let Commands::Launch = cli.command {
        return launch_spriteplay(proxy).await;
    }
    if !is_spriteplay_running(proxy).await {
        eprintln!("spriteplay is not running");
        return Ok(());
    }

    match cli.command {
        Commands::Launch => Ok(()),
        Commands::Play(play_cmd) => {
            let result = if play_cmd.once {
                proxy.play_once(&play_cmd.sheet).await
            } else {
                proxy.start(&play_cmd.sheet, !play_cmd.no_loop).await
            };
            report(result, &format!("Playing {}", play_cmd.sheet))
        }
        Commands::Stop => report(proxy.stop_animation().await, "Stopped"),
        Commands::First(first_cmd) => {
            let sheet = first_cmd.sheet.unwrap_or_default();
            let done = if sheet.is_empty() {
                "Display cleared".to_string()
            } else {
                format!("Showing first frame of {sheet}")
            };
            report(proxy.set_first_frame(&sheet).await, &done)
        }
        Commands::Rate(rate_cmd) => report(
            proxy.set_frame_rate(rate_cmd.seconds).await,
            &format!("Frame rate set to {}s", rate_cmd.seconds),
        ),
        Commands::Loop(loop_cmd) => {
            let looping = matches!(loop_cmd.mode, Toggle::On);
            report(
                proxy.set_loop(looping).await,
                if looping { "Loop on" } else { "Loop off" },
            )
        }
        Commands::Reset => report(proxy.reset().await, "Frame counter reset"),
        Commands::Resume => report(proxy.resume().await, "Resumed"),
        Commands::Status => {
            println!("{}", proxy.status().await?);
            Ok(())
        }
        Commands::Sheets => {
            let sheets = proxy.list_sheets().await?;
            if sheets.is_empty() {
                println!("No sheets configured");
            }
            for sheet in sheets {
                println!("{sheet}");
            }
            Ok(())
        }
        Commands::Quit => report(proxy.quit().await, "spriteplay has exited"),
    }
}

/// Prints service-side rejections (unknown sheet, bad rate) instead of failing.
fn report(result: zbus::Result<()>, done: &str) -> StdResult<()> {
    match result {
        Ok(()) => {
            println!("{done}");
            Ok(())
        }
        Err(zbus::Error::MethodError(_, Some(message), _)) => {
            eprintln!("{message}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn is_spriteplay_running(proxy: &AnimatorProxy<'_>) -> bool {
    proxy.test_connection().await.is_ok()
}

async fn launch_spriteplay(proxy: &AnimatorProxy<'_>) -> StdResult<()> {
    if is_spriteplay_running(proxy).await {
        println!("spriteplay is already running");
        return Ok(());
    }

    let current_exe_path = std::env::current_exe()?;
    let exe_dir = current_exe_path.parent().ok_or_else(|| {
        App::InvalidInput("Failed to get the directory of the executable".to_string())
    })?;
    let spriteplay_path = exe_dir.join("spriteplay");

    if !spriteplay_path.exists() {
        return Err(App::InvalidInput(
            "spriteplay executable not found in the same directory".to_string(),
        ));
    }

    let child = Command::new(spriteplay_path).spawn()?;
    println!("spriteplay started, process ID: {:?}", child.id());
    Ok(())
}
