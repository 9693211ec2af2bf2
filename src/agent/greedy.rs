use super::Agent;
use crate::game::{Action, GameEngine, Observation};

/// Heads for the food while avoiding immediate collisions
///
/// Looks one cell ahead only, so it can still trap itself in its own body.
#[derive(Debug, Default)]
pub struct GreedyAgent;

impl GreedyAgent {
    pub fn new() -> Self {
        Self
    }

    /// Choose from a precomputed observation
    pub fn choose(obs: &Observation) -> Action {
        let safe: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|&action| !obs.danger(action))
            .collect();

        // Straight is first in ALL, so ties keep the heading
        safe.iter()
            .copied()
            .find(|&action| obs.food_towards(obs.heading.turned(action)))
            .or_else(|| safe.first().copied())
            .unwrap_or(Action::Straight)
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        "greedy"
    }

    fn act(&mut self, engine: &GameEngine) -> Action {
        Self::choose(&Observation::from_engine(engine))
    }
}
