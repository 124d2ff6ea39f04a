//! Simulate command - run a local tournament with scripted agents
//!
//! Useful for exercising the engine without a model provider: each
//! agent answers every prompt with a canned submission, so runs are
//! fully offline and reproducible with --seed.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use arena_core::types::{Agent, GameConfig, GameMode};
use arena_core::ChallengeRegistry;
use arena_engine::{
    sanitize, EventSink, FanoutSink, GameEvent, MemorySink, QueryHandler, TournamentEngine,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of agents in the roster
    #[arg(long, default_value = "4")]
    pub agents: usize,

    /// Tournament mode: elimination or round-robin
    #[arg(long, default_value = "elimination")]
    pub mode: String,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print every sanitized event instead of a summary
    #[arg(long)]
    pub verbose: bool,
}

/// Run simulate command
pub fn run(args: SimulateArgs) -> Result<()> {
    if args.agents < 2 {
        anyhow::bail!("need at least 2 agents, got {}", args.agents);
    }
    let mode = parse_mode(&args.mode)?;

    let roster = build_roster(args.agents);
    let mut config = GameConfig {
        mode,
        ..GameConfig::default()
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let memory = Arc::new(MemorySink::new());
    let mut sinks: Vec<Arc<dyn EventSink>> = vec![memory.clone()];
    if args.verbose {
        sinks.push(Arc::new(PrinterSink));
    }

    let engine = TournamentEngine::new(
        Arc::new(ChallengeRegistry::with_defaults()),
        Arc::new(FanoutSink::new(sinks)),
    )
    .with_query_handler(Arc::new(ScriptedHandler::new(args.seed)));

    let game_id = Uuid::new_v4().to_string();
    tracing::info!(game_id = %game_id, agents = args.agents, "starting simulation");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(engine.run_game(&game_id, roster, config));

    report(&memory.events());
    Ok(())
}

fn parse_mode(mode: &str) -> Result<GameMode> {
    match mode {
        "elimination" => Ok(GameMode::Elimination),
        "round-robin" | "round_robin" => Ok(GameMode::RoundRobin),
        other => anyhow::bail!("unknown mode: {} (use elimination or round-robin)", other),
    }
}

fn build_roster(count: usize) -> Vec<Agent> {
    const NAMES: [&str; 8] = [
        "Vesper", "Quill", "Marlow", "Sable", "Orrin", "Petra", "Lazlo", "Wren",
    ];
    (0..count)
        .map(|i| {
            let name = NAMES[i % NAMES.len()];
            Agent {
                id: Uuid::new_v4().to_string(),
                display_id: format!("sim-{}", i + 1),
                name: name.to_string(),
                personality: "scripted".to_string(),
                system_prompt: format!("You are {}, a scripted competitor.", name),
                avatar_seed: format!("{}-{}", name.to_lowercase(), i),
            }
        })
        .collect()
}

/// Print the final standings from the collected event stream.
fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::GameEnd {
                winner,
                final_standings,
                ..
            } => {
                println!("\nWinner: {} ({})", winner.name, winner.display_id);
                println!("\n{:<4} {:<12} {:<10} {:>6}", "#", "Agent", "Display", "Score");
                for standing in final_standings {
                    let out = match standing.eliminated_round {
                        Some(round) => format!("out R{}", round),
                        None => String::new(),
                    };
                    println!(
                        "{:<4} {:<12} {:<10} {:>6}  {}",
                        standing.placement, standing.name, standing.display_id, standing.score, out
                    );
                }
            }
            GameEvent::GameError { error, .. } => {
                println!("\nGame failed: {}", error);
            }
            _ => {}
        }
    }
}

/// Prints each sanitized event as it is emitted.
struct PrinterSink;

impl EventSink for PrinterSink {
    fn publish(&self, event: &GameEvent) {
        if let Some(payload) = sanitize(event) {
            let rendered =
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
            println!("{} {}", event.event_type(), rendered);
        }
    }
}

const SUBMISSIONS: [&str; 3] = [
    "Position: I argue this holds because the evidence is consistent.\n\n\
     Therefore, since each premise supports the conclusion, the claim stands. \
     Choice: ALLY. Round 1: COOPERATE. Round 2: COOPERATE. Round 3: COOPERATE.",
    "Answer: the key consideration is incentive alignment, because repeated \
     interaction rewards trust.\n\nReasoning: a tit-for-tat stance with payoff \
     awareness dominates. Choice: ALLY. Round 1: COOPERATE. Round 2: DEFECT. \
     Round 3: COOPERATE.",
    "The crimson light shimmered over the silent harbor, and a distant bell \
     whispered through the mist. \"Stay,\" she said. Thus the night held its \
     breath. Choice: NEUTRAL. Round 1: DEFECT. Round 2: COOPERATE.",
];

/// Stand-in for a model provider: picks a canned submission with a
/// seedable rng so runs with the same --seed replay identically.
struct ScriptedHandler {
    rng: Mutex<ChaCha8Rng>,
}

impl ScriptedHandler {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl QueryHandler for ScriptedHandler {
    async fn query(&self, _agent_id: &str, _prompt: &str) -> Result<String> {
        let index = self.rng.lock().unwrap().gen_range(0..SUBMISSIONS.len());
        Ok(SUBMISSIONS[index].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("elimination").unwrap(), GameMode::Elimination);
        assert_eq!(parse_mode("round-robin").unwrap(), GameMode::RoundRobin);
        assert!(parse_mode("bracket").is_err());
    }

    #[test]
    fn test_build_roster_unique_ids() {
        let roster = build_roster(6);
        assert_eq!(roster.len(), 6);
        let mut ids: Vec<&str> = roster.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[tokio::test]
    async fn test_scripted_handler_replays_with_same_seed() {
        let first = ScriptedHandler::new(Some(7));
        let second = ScriptedHandler::new(Some(7));
        for _ in 0..10 {
            let a = first.query("agent-1", "prompt").await.unwrap();
            let b = second.query("agent-1", "prompt").await.unwrap();
            assert_eq!(a, b);
        }
    }
}
