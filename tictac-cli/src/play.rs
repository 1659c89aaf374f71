//! Play command - interactive game on stdin/stdout
//!
//! A one-second tick polls the move timer while stdin is read line by line.
//! Both branches call into the synchronous core.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use tictac_core::{GameConfig, GameMode, HeuristicOpponent, Session, BOARD_SIZE};

/// Refresh interval of the move timer
const TICK: Duration = Duration::from_secs(1);

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => GameMode::SinglePlayer,
            ModeArg::Multi => GameMode::MultiPlayer,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Game mode (overrides the config file)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Seconds allowed per move (overrides the config file)
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<f64>,

    /// JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A parsed line of user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move { row: usize, col: usize },
    Restart,
    ToggleMode,
    Help,
    Quit,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;
    let opponent = config.opponent.build();
    let session = Session::new(config, opponent, Instant::now());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(play_loop(session))
}

fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(mode) = args.mode {
        config = config.with_mode(mode.into());
    }
    if let Some(secs) = args.time_limit {
        config = config.with_time_limit_secs(secs);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

async fn play_loop(mut session: Session<HeuristicOpponent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    print_help();
    render(&session);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.tick(Instant::now()) {
                    render(&session);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    render(&session);
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle_command(&mut session, command),
                    Err(err) => println!("{}", err),
                }
            }
        }
    }

    Ok(())
}

fn handle_command(session: &mut Session<HeuristicOpponent>, command: Command) {
    let now = Instant::now();
    match command {
        Command::Move { row, col } => {
            if !session.human_can_move() && !session.state().is_game_over() {
                println!("Wait for your turn.");
                return;
            }
            match session.human_move(row, col, now) {
                Ok(report) => {
                    if let Some(reply) = report.reply {
                        println!("Computer plays {}", reply);
                    }
                }
                Err(err) => println!("Move ignored: {}", err),
            }
        }
        Command::Restart => session.restart(now),
        Command::ToggleMode => {
            let mode = session.mode().toggled();
            session.set_mode(mode, now);
        }
        Command::Help => print_help(),
        Command::Quit => {}
    }
    render(session);
}

// ============================================================================
// UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["q"] | ["quit"] => Command::Quit,
        ["r"] | ["restart"] => Command::Restart,
        ["m"] | ["mode"] => Command::ToggleMode,
        ["h"] | ["help"] | ["?"] => Command::Help,
        [row, col] => {
            let row: usize = row.parse().with_context(|| format!("Bad row: {}", row))?;
            let col: usize = col.parse().with_context(|| format!("Bad column: {}", col))?;
            Command::Move { row, col }
        }
        _ => bail!("Unknown command: {} (type h for help)", line.trim()),
    };
    Ok(command)
}

fn render(session: &Session<HeuristicOpponent>) {
    let state = session.state();
    let now = Instant::now();

    println!();
    println!("Mode: {}", state.mode());
    print!("{}", state.board());
    if state.is_game_over() {
        println!("{}", state.status());
        println!("Type r to restart.");
    } else {
        println!("Current turn: Player {}", state.turn());
        println!(
            "Time remaining for current move: {:.1} seconds",
            state.remaining(now).as_secs_f64()
        );
    }
}

fn print_help() {
    println!("Enter moves as `row col` (0-{}).", BOARD_SIZE - 1);
    println!("Commands: r = restart, m = switch mode, h = help, q = quit");
}
