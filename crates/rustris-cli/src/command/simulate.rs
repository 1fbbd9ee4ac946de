use std::{path::PathBuf, thread, time::Duration};

use anyhow::Context;
use rand::Rng;
use rustris_engine::{
    Board, EventLoop, GameConfig, GameEvent, GameSession, InputEvent, PieceSeed,
};
use tracing::{error, info};

use crate::{
    schema::{EventScript, ScriptEvent, SessionReport},
    util::{self, Output},
};

/// Inputs a simulated player chooses from. Pause is left out so a
/// simulated game always progresses.
const PLAYER_INPUTS: [InputEvent; 6] = [
    InputEvent::MoveLeft,
    InputEvent::MoveRight,
    InputEvent::RotateCw,
    InputEvent::RotateCcw,
    InputEvent::SoftDrop,
    InputEvent::HardDrop,
];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Game configuration file (JSON format)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece seed as 32 hexadecimal digits; random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Starting board (JSON array of row strings); its size overrides the config
    #[arg(long)]
    board: Option<PathBuf>,
    /// Stop after this many events even if the game is not over
    #[arg(long, default_value_t = 10_000)]
    max_events: usize,
    /// Fraction of events that are gravity ticks (virtual time only)
    #[arg(long, default_value_t = 0.3)]
    tick_ratio: f64,
    /// Run on the real-time event loop instead of virtual time
    #[arg(long)]
    realtime: bool,
    /// Milliseconds between simulated inputs in real-time mode
    #[arg(long, default_value_t = 50)]
    input_interval_ms: u64,
    /// Write the handled events as a replayable script
    #[arg(long)]
    record: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&arg.tick_ratio),
        "tick ratio must be between 0 and 1, got {}",
        arg.tick_ratio
    );

    let config = util::load_config(arg.config.as_deref())?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let board: Option<Board> = arg
        .board
        .as_deref()
        .map(|path| util::read_json_file("board", path))
        .transpose()?;
    let session = match board.clone() {
        Some(board) => GameSession::with_board(config, seed, board),
        None => GameSession::with_seed(config, seed),
    }
    .context("Invalid configuration")?;
    let config = session.config().clone();
    info!(%seed, realtime = arg.realtime, "starting simulation");

    let (session, events) = if arg.realtime {
        run_realtime(session, arg)
    } else {
        run_virtual(session, arg)
    };
    info!(
        score = session.stats().score(),
        lines = session.stats().total_cleared_lines(),
        game_over = session.is_game_over(),
        "simulation finished"
    );

    if let Some(path) = &arg.record {
        let script = record_script(seed, config, board, &events);
        Output::save_json(&script, Some(path.clone()))?;
    }
    Output::save_json(&SessionReport::new(&session, events.len()), arg.output.clone())
}

fn record_script(
    seed: PieceSeed,
    config: GameConfig,
    board: Option<Board>,
    events: &[GameEvent],
) -> EventScript {
    EventScript {
        seed,
        config: Some(config),
        board,
        events: events.iter().copied().map(ScriptEvent::from).collect(),
    }
}

fn random_input(rng: &mut impl Rng) -> InputEvent {
    PLAYER_INPUTS[rng.random_range(0..PLAYER_INPUTS.len())]
}

fn random_event(rng: &mut impl Rng, tick_ratio: f64) -> GameEvent {
    if rng.random_bool(tick_ratio) {
        GameEvent::Tick
    } else {
        GameEvent::Input(random_input(rng))
    }
}

fn run_virtual(mut session: GameSession, arg: &SimulateArg) -> (GameSession, Vec<GameEvent>) {
    let mut rng = rand::rng();
    let mut events = vec![];
    while !session.is_game_over() && events.len() < arg.max_events {
        let event = random_event(&mut rng, arg.tick_ratio);
        session.handle(event);
        events.push(event);
    }
    (session, events)
}

fn run_realtime(session: GameSession, arg: &SimulateArg) -> (GameSession, Vec<GameEvent>) {
    let (event_loop, sender) = EventLoop::new(session);
    let interval = Duration::from_millis(arg.input_interval_ms);
    let max_inputs = arg.max_events;

    let player = thread::spawn(move || {
        let mut rng = rand::rng();
        for _ in 0..max_inputs {
            thread::sleep(interval);
            if sender.send(random_input(&mut rng)).is_err() {
                break;
            }
        }
    });

    let mut events = vec![];
    let session = event_loop.run(|_, event, _| events.push(event));
    if player.join().is_err() {
        error!("input thread panicked");
    }
    (session, events)
}

#[cfg(test)]
mod tests {
    use rustris_engine::{BoardConfig, Cell, ColorId};

    use crate::command::replay;

    use super::*;

    fn arg() -> SimulateArg {
        SimulateArg {
            config: None,
            seed: None,
            board: None,
            max_events: 3000,
            tick_ratio: 0.3,
            realtime: false,
            input_interval_ms: 50,
            record: None,
            output: None,
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            board: BoardConfig {
                columns: 8,
                rows: 16,
                block_size: 20,
            },
            preview_len: 3,
            ..GameConfig::default()
        }
    }

    /// Plays `session` randomly, records it, sends the script through JSON
    /// and replays it into a fresh session.
    fn play_and_replay(session: GameSession, board: Option<Board>) -> (GameSession, GameSession) {
        let seed = session.seed();
        let config = session.config().clone();
        let (played, events) = run_virtual(session, &arg());

        let script = record_script(seed, config, board, &events);
        let json = serde_json::to_string(&script).unwrap();
        let script: EventScript = serde_json::from_str(&json).unwrap();

        let mut replayed = script
            .start_session(script.config.clone().unwrap())
            .unwrap();
        let handled = replay::replay_events(&mut replayed, &script.events);
        assert_eq!(handled, events.len());
        (played, replayed)
    }

    #[test]
    fn test_replaying_recorded_script_reproduces_game() {
        let seed = PieceSeed::from_bytes([42; 16]);
        let session = GameSession::with_seed(config(), seed).unwrap();
        let (played, replayed) = play_and_replay(session, None);

        assert!(played.stats().completed_pieces() > 0);
        assert_eq!(replayed.board(), played.board());
        assert_eq!(replayed.stats(), played.stats());
        assert_eq!(replayed.phase(), played.phase());
        assert_eq!(replayed.config(), played.config());
    }

    #[test]
    fn test_replay_with_starting_board() {
        let mut board = Board::new(8, 16);
        let garbage = Cell::Occupied(ColorId::new(20).unwrap());
        for row in 12..16 {
            for col in (0..8).filter(|&col| col != row % 8) {
                board.set_cell(col, row, garbage).unwrap();
            }
        }
        let seed = PieceSeed::from_bytes([9; 16]);
        let session = GameSession::with_board(config(), seed, board.clone()).unwrap();
        let (played, replayed) = play_and_replay(session, Some(board));

        assert_eq!(replayed.board(), played.board());
        assert_eq!(replayed.stats(), played.stats());
        assert_eq!(replayed.phase(), played.phase());
    }

    #[test]
    fn test_virtual_run_stops_at_max_events() {
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([1; 16]))
            .unwrap();
        let arg = SimulateArg {
            max_events: 5,
            tick_ratio: 1.0,
            ..arg()
        };
        let (session, events) = run_virtual(session, &arg);
        assert_eq!(events, vec![GameEvent::Tick; 5]);
        assert!(session.phase().is_falling());
    }
}
