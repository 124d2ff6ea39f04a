//! Game lifecycle management
//!
//! Guards the pending -> running transition so at most one engine run is
//! ever issued per game id, then drives the run on a background task.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashSet;
use thiserror::Error;

use arena_core::types::{Agent, GameConfig};
use arena_engine::TournamentEngine;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("game {0} has already been started")]
    AlreadyStarted(String),
    #[error("roster must contain at least 2 agents")]
    RosterTooSmall,
}

/// Starts engine runs, at most once per game id.
pub struct GameLauncher {
    engine: Arc<TournamentEngine>,
    started: Mutex<FxHashSet<String>>,
}

impl GameLauncher {
    pub fn new(engine: Arc<TournamentEngine>) -> Self {
        Self {
            engine,
            started: Mutex::new(FxHashSet::default()),
        }
    }

    /// Launch a game on a background task. The roster is frozen at call
    /// time; a second start for the same id is rejected.
    pub fn start(
        &self,
        game_id: &str,
        agents: Vec<Agent>,
        config: GameConfig,
    ) -> Result<(), LaunchError> {
        if agents.len() < 2 {
            return Err(LaunchError::RosterTooSmall);
        }
        {
            let mut started = self.started.lock().unwrap();
            if !started.insert(game_id.to_string()) {
                return Err(LaunchError::AlreadyStarted(game_id.to_string()));
            }
        }

        tracing::info!(game_id, agents = agents.len(), "launching game");
        let engine = self.engine.clone();
        let game_id = game_id.to_string();
        tokio::spawn(async move {
            engine.run_game(&game_id, agents, config).await;
        });
        Ok(())
    }

    pub fn is_started(&self, game_id: &str) -> bool {
        self.started.lock().unwrap().contains(game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ChallengeRegistry;
    use arena_engine::{GameEvent, MemorySink};

    fn make_agents(count: usize) -> Vec<Agent> {
        (0..count)
            .map(|i| Agent {
                id: format!("agent-{}", i),
                display_id: format!("display-{}", i),
                name: format!("Agent {}", i),
                personality: "calm".to_string(),
                system_prompt: "secret".to_string(),
                avatar_seed: format!("seed-{}", i),
            })
            .collect()
    }

    fn launcher_with_sink() -> (GameLauncher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(ChallengeRegistry::with_defaults());
        let engine = Arc::new(TournamentEngine::new(registry, sink.clone()));
        (GameLauncher::new(engine), sink)
    }

    #[tokio::test]
    async fn test_second_start_for_same_id_is_rejected() {
        let (launcher, _sink) = launcher_with_sink();
        launcher
            .start("g1", make_agents(2), GameConfig::elimination().with_seed(1))
            .unwrap();
        let err = launcher
            .start("g1", make_agents(2), GameConfig::elimination().with_seed(1))
            .unwrap_err();
        assert!(matches!(err, LaunchError::AlreadyStarted(_)));
        assert!(launcher.is_started("g1"));
    }

    #[tokio::test]
    async fn test_roster_of_one_is_rejected() {
        let (launcher, _sink) = launcher_with_sink();
        let err = launcher
            .start("g1", make_agents(1), GameConfig::elimination())
            .unwrap_err();
        assert!(matches!(err, LaunchError::RosterTooSmall));
        assert!(!launcher.is_started("g1"));
    }

    #[tokio::test]
    async fn test_launched_game_runs_to_terminal_event() {
        let (launcher, sink) = launcher_with_sink();
        launcher
            .start("g1", make_agents(2), GameConfig::elimination().with_seed(7))
            .unwrap();

        // The run happens on a spawned task; poll until it finishes
        for _ in 0..100 {
            if sink
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameEnd { .. }))
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("game never reached a terminal event");
    }
}
