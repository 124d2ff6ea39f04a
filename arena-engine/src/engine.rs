//! Tournament orchestration state machine
//!
//! One `run_game` invocation owns one isolated `GameState` from start to
//! terminal event; no cross-game state lives on the engine. Every run
//! ends in exactly one of `game:end` or `game:error` - internal failures
//! never propagate past this boundary.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use arena_core::pairing::create_matchups;
use arena_core::registry::{challenge_info, Challenge, ChallengeContext, ChallengeRegistry, RegistryError};
use arena_core::scorer::NormalizedScore;
use arena_core::types::{
    ActiveAgent, Agent, GameConfig, GameMode, MatchupKind, PublicAgent, RoundResult, Standing,
};

use crate::events::{GameEvent, MatchupSummary};
use crate::query::{QueryHandler, FAILED_RESPONSE};
use crate::sink::EventSink;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Per-game mutable state, owned exclusively by one engine run.
struct GameState {
    game_id: String,
    agents: Vec<ActiveAgent>,
    current_round: u32,
    config: GameConfig,
}

impl GameState {
    fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.eliminated).count()
    }
}

/// Drives a game through rounds, scoring, and elimination, emitting the
/// event stream consumed by persistence, broadcast, and rating.
pub struct TournamentEngine {
    registry: Arc<ChallengeRegistry>,
    sink: Arc<dyn EventSink>,
    query: Option<Arc<dyn QueryHandler>>,
}

impl TournamentEngine {
    pub fn new(registry: Arc<ChallengeRegistry>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry,
            sink,
            query: None,
        }
    }

    pub fn with_query_handler(mut self, handler: Arc<dyn QueryHandler>) -> Self {
        self.query = Some(handler);
        self
    }

    /// Run a game to completion. Always emits a terminal event; per-game
    /// state is discarded afterwards.
    pub async fn run_game(&self, game_id: &str, agents: Vec<Agent>, config: GameConfig) {
        let mut state = GameState {
            game_id: game_id.to_string(),
            agents: agents.into_iter().map(ActiveAgent::new).collect(),
            current_round: 0,
            config,
        };

        let total_rounds = total_rounds(state.agents.len());
        self.sink.publish(&GameEvent::GameStart {
            game_id: state.game_id.clone(),
            agents: state.agents.iter().map(ActiveAgent::to_public).collect(),
            rounds: total_rounds,
        });

        let mut rng = match state.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        match self.run_rounds(&mut state, total_rounds, &mut rng).await {
            Ok(()) => {
                let winner = winner_of(&state);
                tracing::info!(
                    game_id = %state.game_id,
                    winner = %winner.display_id,
                    rounds = state.current_round,
                    "game finished"
                );
                self.sink.publish(&GameEvent::GameEnd {
                    game_id: state.game_id.clone(),
                    winner,
                    final_standings: standings_of(&state),
                });
            }
            Err(err) => {
                tracing::error!(game_id = %state.game_id, error = %err, "game failed");
                self.sink.publish(&GameEvent::GameError {
                    game_id: state.game_id.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    async fn run_rounds(
        &self,
        state: &mut GameState,
        total_rounds: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), EngineError> {
        while state.alive_count() > 1 && state.current_round < total_rounds {
            self.run_round(state, rng).await?;
        }
        Ok(())
    }

    async fn run_round(
        &self,
        state: &mut GameState,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), EngineError> {
        state.current_round += 1;
        let round = state.current_round;

        let matchups = create_matchups(&state.agents, round);
        self.sink.publish(&GameEvent::RoundStart {
            game_id: state.game_id.clone(),
            round,
            matchups: matchups
                .iter()
                .map(|m| MatchupSummary {
                    kind: m.kind,
                    agent_display_ids: m
                        .agents
                        .iter()
                        .map(|&i| state.agents[i].agent.display_id.clone())
                        .collect(),
                })
                .collect(),
        });

        let challenge = self.registry.get_random(rng)?;
        self.sink.publish(&GameEvent::ChallengeStart {
            game_id: state.game_id.clone(),
            challenge: challenge_info(challenge.as_ref()),
        });

        let mut results: Vec<RoundResult> = Vec::new();

        for matchup in &matchups {
            match matchup.kind {
                MatchupKind::Bye => {
                    // The bye agent gets the average of scores already
                    // recorded this round, or 50 if it resolved first
                    let average = if results.is_empty() {
                        50.0
                    } else {
                        results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64
                    };
                    let score = NormalizedScore::new(average);
                    let agent = &mut state.agents[matchup.agents[0]];
                    agent.score += score.value();
                    results.push(RoundResult {
                        agent_id: agent.agent.id.clone(),
                        display_id: agent.agent.display_id.clone(),
                        score: score.value(),
                        response: None,
                    });
                }
                MatchupKind::HeadToHead => {
                    // Clone the matchup's agents so the scoring context
                    // stays stable while cumulative scores mutate
                    let participants: Vec<ActiveAgent> = matchup
                        .agents
                        .iter()
                        .map(|&i| state.agents[i].clone())
                        .collect();

                    for &index in &matchup.agents {
                        let result = self
                            .play_turn(state, index, challenge.as_ref(), &participants, round)
                            .await;
                        results.push(result);
                    }
                }
            }
        }

        self.sink.publish(&GameEvent::RoundEnd {
            game_id: state.game_id.clone(),
            round,
            results,
        });

        self.apply_elimination(state, round);
        Ok(())
    }

    /// Query one agent, score its submission, and record the outcome.
    async fn play_turn(
        &self,
        state: &mut GameState,
        index: usize,
        challenge: &dyn Challenge,
        participants: &[ActiveAgent],
        round: u32,
    ) -> RoundResult {
        let context = ChallengeContext {
            round,
            agents: participants,
            criteria: challenge.description(),
        };
        let prompt = challenge.generate_prompt(&context);

        let (agent_id, display_id, name) = {
            let agent = &state.agents[index].agent;
            (agent.id.clone(), agent.display_id.clone(), agent.name.clone())
        };

        self.sink.publish(&GameEvent::AgentQuery {
            game_id: state.game_id.clone(),
            agent_id: agent_id.clone(),
            prompt: prompt.clone(),
        });

        // A slow or failing query degrades to a sentinel submission
        // instead of aborting the round
        let response = match &self.query {
            Some(handler) => match handler.query(&agent_id, &prompt).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(
                        game_id = %state.game_id,
                        agent = %display_id,
                        error = %err,
                        "query failed, using sentinel submission"
                    );
                    FAILED_RESPONSE.to_string()
                }
            },
            None => format!("[Agent {} response placeholder]", name),
        };

        let score = challenge.score_response(&response, &context).await;
        state.agents[index].score += score.value();

        self.sink.publish(&GameEvent::AgentResponse {
            game_id: state.game_id.clone(),
            display_id: display_id.clone(),
            response: response.clone(),
            score: score.value(),
        });

        RoundResult {
            agent_id,
            display_id,
            score: score.value(),
            response: Some(response),
        }
    }

    /// In elimination mode, drop the lowest cumulative scorer while more
    /// than two agents remain alive. Ties break by roster order.
    fn apply_elimination(&self, state: &mut GameState, round: u32) {
        if state.config.mode != GameMode::Elimination || state.alive_count() <= 2 {
            return;
        }

        // min_by_key keeps the last minimum on ties; ties must break by
        // roster order, so fold with a strict comparison instead
        let mut lowest: Option<usize> = None;
        for (i, agent) in state.agents.iter().enumerate() {
            if agent.eliminated {
                continue;
            }
            match lowest {
                Some(best) if agent.score >= state.agents[best].score => {}
                _ => lowest = Some(i),
            }
        }

        if let Some(index) = lowest {
            let agent = &mut state.agents[index];
            agent.eliminated = true;
            agent.eliminated_round = Some(round);
            let display_id = agent.agent.display_id.clone();
            tracing::debug!(game_id = %state.game_id, agent = %display_id, round, "eliminated");
            self.sink.publish(&GameEvent::Elimination {
                game_id: state.game_id.clone(),
                display_id,
                round,
            });
        }
    }
}

/// 1 round for up to two agents, otherwise ceil(log2(count)).
fn total_rounds(agent_count: usize) -> u32 {
    if agent_count <= 2 {
        1
    } else {
        usize::BITS - (agent_count - 1).leading_zeros()
    }
}

/// Alive agent with the highest score; ties break by roster order.
fn winner_of(state: &GameState) -> PublicAgent {
    let mut best: Option<&ActiveAgent> = None;
    for agent in state.agents.iter().filter(|a| !a.eliminated) {
        match best {
            Some(current) if agent.score <= current.score => {}
            _ => best = Some(agent),
        }
    }
    // Roster is frozen non-empty by the lifecycle collaborator; fall
    // back to the first agent if everyone was eliminated
    best.or_else(|| state.agents.first())
        .map(ActiveAgent::to_public)
        .unwrap_or(PublicAgent {
            display_id: String::new(),
            name: String::new(),
            avatar_seed: String::new(),
            score: 0,
            eliminated: false,
        })
}

/// Standings sorted by score descending; placement is 1-based rank.
fn standings_of(state: &GameState) -> Vec<Standing> {
    let mut ranked: Vec<&ActiveAgent> = state.agents.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
        .iter()
        .enumerate()
        .map(|(i, a)| Standing {
            agent_id: a.agent.id.clone(),
            display_id: a.agent.display_id.clone(),
            name: a.agent.name.clone(),
            score: a.score,
            placement: i as u32 + 1,
            eliminated_round: a.eliminated_round,
        })
        .collect()
}
