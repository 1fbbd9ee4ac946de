use std::path::PathBuf;

use anyhow::Context;
use rustris_engine::{GameEvent, GameSession};
use tracing::{info, warn};

use crate::{
    schema::{EventScript, ScriptEvent, SessionReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the event script (JSON format)
    script_file: PathBuf,
    /// Game configuration file, overriding the one stored in the script
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        script_file,
        config,
        output,
    } = arg;

    let script: EventScript = util::read_json_file("script", script_file)?;
    let config = match config {
        Some(path) => util::load_config(Some(path))?,
        None => script.config.clone().unwrap_or_default(),
    };
    info!(
        seed = %script.seed,
        events = script.events.len(),
        "replaying {}",
        script_file.display()
    );

    let mut session = script
        .start_session(config)
        .with_context(|| format!("Invalid configuration for {}", script_file.display()))?;
    let handled = replay_events(&mut session, &script.events);

    Output::save_json(&SessionReport::new(&session, handled), output.clone())
}

/// Feeds `events` to `session` in order, stopping at game over.
///
/// Returns the number of events handled.
pub(crate) fn replay_events(session: &mut GameSession, events: &[ScriptEvent]) -> usize {
    let mut handled = 0;
    for &event in events {
        if session.is_game_over() {
            warn!(
                remaining = events.len() - handled,
                "game over before end of script"
            );
            break;
        }
        session.handle(GameEvent::from(event));
        handled += 1;
    }
    handled
}
