mod config;
mod render;

use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    input::Direction, load_or_create_device_id, today_date_key, HttpPuzzleService, InputKey,
    InteractionLayer, PuzzleService, SessionController, SessionError, SessionOptions,
    SystemClock, VerifyOutcome,
};
use shared::domain::{CellPos, DeviceId, Difficulty};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::{load_settings, Settings};

/// Time given to the detached progress beacon before the runtime shuts down.
const BEACON_GRACE: Duration = Duration::from_millis(500);

const HELP: &str = "commands: <row> <col> select | 1-9 digit | 0, del delete | up/down/left/right \
                    | n toggle notes | check | share | help | quit";

#[derive(Parser, Debug)]
#[command(about = "Play today's sudoku in the terminal")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    device_id_path: Option<PathBuf>,
    /// Share link a friend sent you.
    #[arg(long)]
    challenge: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play today's puzzle (default).
    Play,
    /// List past puzzles for this device.
    History {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 30)]
        limit: u32,
    },
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    Difficulty::parse(raw).ok_or_else(|| format!("unknown difficulty '{raw}'"))
}

fn merge_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(v) = &args.server_url {
        settings.server_url = v.clone();
    }
    if let Some(v) = args.difficulty {
        settings.difficulty = v;
    }
    if let Some(v) = &args.device_id_path {
        settings.device_id_path = v.clone();
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = merge_args(load_settings(), &args);

    let device_id = load_or_create_device_id(&settings.device_id_path)?;
    let service = Arc::new(HttpPuzzleService::new(settings.server_url.clone()));
    info!(server_url = %service.server_url(), device_id = %device_id, "desktop: starting");

    match args.command {
        Some(Command::History { skip, limit }) => {
            let entries = service
                .fetch_history(&device_id, skip, limit)
                .await
                .context("failed to fetch history")?;
            print!("{}", render::render_history(&entries));
            Ok(())
        }
        Some(Command::Play) | None => play(service, &settings, device_id, args.challenge).await,
    }
}

async fn play(
    service: Arc<HttpPuzzleService>,
    settings: &Settings,
    device_id: DeviceId,
    challenge_link: Option<String>,
) -> Result<()> {
    let options = SessionOptions {
        difficulty: settings.difficulty,
        sync_interval: settings.sync_interval(),
        share_base_url: settings.share_base_url.clone(),
        challenge_link,
    };

    let controller = match SessionController::load(
        service,
        Arc::new(SystemClock),
        device_id,
        today_date_key(),
        options,
    )
    .await
    {
        Ok(controller) => controller,
        Err(SessionError::Expired(detail)) => {
            println!("{detail}");
            return Ok(());
        }
        Err(err) => return Err(err).context("could not load today's puzzle"),
    };

    if let Some(challenge) = controller.challenge() {
        println!("{}", render::render_challenge(&challenge));
    }
    controller.start_background_tasks().await;

    let mut layer = InteractionLayer::new();
    let mut last_solved = None;
    println!("{HELP}");
    redraw(&controller, &mut layer).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "quit" | "q" | "exit" => break,
            "help" | "?" => println!("{HELP}"),
            "check" | "verify" => {
                let result = controller.verify().await;
                layer.show_verification(&result, Instant::now());
                if result.outcome == VerifyOutcome::Solved {
                    let link = controller
                        .build_share_link(&result)
                        .map_err(|err| warn!("desktop: share link unavailable: {err}"))
                        .ok();
                    print!("{}", render::render_result(&result, link.as_deref()));
                    last_solved = Some(result);
                }
            }
            "share" => match &last_solved {
                Some(result) => match controller.build_share_link(result) {
                    Ok(link) => println!("{link}"),
                    Err(err) => println!("{err}"),
                },
                None => println!("solve the puzzle first"),
            },
            other => handle_input(&controller, &mut layer, other).await,
        }
        redraw(&controller, &mut layer).await;
    }

    controller.teardown().await;
    tokio::time::sleep(BEACON_GRACE).await;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineInput {
    Select { row: usize, col: usize },
    Key(InputKey),
}

fn parse_line(line: &str) -> Option<LineInput> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if let [row, col] = parts.as_slice() {
        let row = row.parse::<usize>().ok()?.checked_sub(1)?;
        let col = col.parse::<usize>().ok()?.checked_sub(1)?;
        let pos = CellPos::new(row, col)?;
        return Some(LineInput::Select {
            row: pos.row,
            col: pos.col,
        });
    }

    let key = match line {
        "del" => InputKey::Delete,
        "up" => InputKey::Move(Direction::Up),
        "down" => InputKey::Move(Direction::Down),
        "left" => InputKey::Move(Direction::Left),
        "right" => InputKey::Move(Direction::Right),
        other => InputKey::parse(other)?,
    };
    Some(LineInput::Key(key))
}

async fn handle_input(controller: &SessionController, layer: &mut InteractionLayer, line: &str) {
    match parse_line(line) {
        Some(LineInput::Select { row, col }) => {
            if !layer.select(controller, row, col).await {
                println!("r{}c{} cannot be selected now", row + 1, col + 1);
            }
        }
        Some(LineInput::Key(key)) => {
            layer.handle_key(controller, key).await;
        }
        None => println!("unrecognized input '{line}' (type help)"),
    }
}

async fn redraw(controller: &SessionController, layer: &mut InteractionLayer) {
    let snapshot = controller.snapshot().await;
    print!("{}", render::render_board(&snapshot, layer.selection()));
    println!("{}", render::render_status(&snapshot));
    if let Some(message) = layer.message(Instant::now()) {
        println!("{message}");
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
