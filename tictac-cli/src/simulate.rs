//! Simulate command - self-play between two opponents
//!
//! - run(): orchestration
//! - play_match(), report_results(): phases
//! - play_single_game(), compute_statistics(): steps

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use tictac_core::{
    GameMode, GameState, HeuristicOpponent, Opponent, Player, Pos, RandomOpponent, ScanOrder,
    Status,
};

/// Simulated time between moves; well inside the deadline
const MOVE_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Win-or-block, corners, then random
    Heuristic,
    /// Heuristic with its own symbol scanned first
    HeuristicSelfFirst,
    /// Uniformly random empty cell
    Random,
}

impl Strategy {
    fn build(self, seed: u64) -> Box<dyn Opponent> {
        match self {
            Strategy::Heuristic => Box::new(HeuristicOpponent::with_seed(seed)),
            Strategy::HeuristicSelfFirst => Box::new(
                HeuristicOpponent::with_seed(seed).with_scan_order(ScanOrder::SelfFirst),
            ),
            Strategy::Random => Box::new(RandomOpponent::with_seed(seed)),
        }
    }
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Strategy playing X
    #[arg(long, value_enum, default_value = "random")]
    pub x: Strategy,

    /// Strategy playing O
    #[arg(long, value_enum, default_value = "heuristic")]
    pub o: Strategy,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    status: Status,
    moves: Vec<Pos>,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    x: Strategy,
    o: Strategy,
    x_wins: usize,
    o_wins: usize,
    ties: usize,
    avg_moves: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    if args.games == 0 {
        bail!("--games must be at least 1");
    }

    tracing::info!(
        "Starting simulation: X={:?} vs O={:?} ({} games)",
        args.x,
        args.o,
        args.games
    );

    let results = play_match(&args, seed);
    report_results(&results, &args)?;

    Ok(())
}

// ============================================================================
// PHASES
// ============================================================================

fn play_match(args: &SimulateArgs, seed: Option<u64>) -> MatchResults {
    let mut rng = create_rng(seed);
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(args.games as u64)
    };

    let mut games = Vec::with_capacity(args.games);
    for game_num in 0..args.games {
        let mut x = args.x.build(rng.gen());
        let mut o = args.o.build(rng.gen());
        let record = play_single_game(game_num + 1, x.as_mut(), o.as_mut());

        tracing::debug!(
            "Game {}: {:?} ({} moves)",
            record.game_number,
            record.status,
            record.moves.len()
        );

        games.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    compute_statistics(args.x, args.o, games)
}

fn report_results(results: &MatchResults, args: &SimulateArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// STEPS
// ============================================================================

/// Play one game to completion; the simulated clock never reaches the deadline
fn play_single_game(game_number: usize, x: &mut dyn Opponent, o: &mut dyn Opponent) -> GameRecord {
    let mut now = Instant::now();
    let mut state = GameState::new(GameMode::MultiPlayer, now);
    let mut moves = Vec::new();

    while !state.is_game_over() {
        let player = state.turn();
        let choice = match player {
            Player::X => x.choose_move(state.board(), player),
            Player::O => o.choose_move(state.board(), player),
        };
        let Some(pos) = choice else {
            break;
        };

        now += MOVE_INTERVAL;
        if state.try_apply_move(pos, now).is_err() {
            tracing::warn!("Opponent chose unplayable cell {}", pos);
            break;
        }
        moves.push(pos);
    }

    GameRecord {
        game_number,
        status: state.status(),
        moves,
    }
}

fn compute_statistics(x: Strategy, o: Strategy, games: Vec<GameRecord>) -> MatchResults {
    let count = |wanted: fn(&Status) -> bool| games.iter().filter(|g| wanted(&g.status)).count();

    let x_wins = count(|s| matches!(s, Status::Won(Player::X)));
    let o_wins = count(|s| matches!(s, Status::Won(Player::O)));
    let ties = count(|s| matches!(s, Status::Tie));

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        x,
        o,
        x_wins,
        o_wins,
        ties,
        avg_moves,
        games,
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games") {
        bar.set_style(style);
    }
    bar
}

fn print_text_results(results: &MatchResults) {
    let total = results.games.len().max(1) as f32;
    let pct = |n: usize| 100.0 * n as f32 / total;

    println!("X ({:?}) vs O ({:?})", results.x, results.o);
    println!("  X wins: {:>5} ({:.1}%)", results.x_wins, pct(results.x_wins));
    println!("  O wins: {:>5} ({:.1}%)", results.o_wins, pct(results.o_wins));
    println!("  Ties:   {:>5} ({:.1}%)", results.ties, pct(results.ties));
    println!("  Average moves per game: {:.1}", results.avg_moves);
}
