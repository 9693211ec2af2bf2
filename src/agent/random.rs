use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::Agent;
use crate::game::{Action, GameEngine};

/// Picks uniformly among the three relative actions
pub struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _engine: &GameEngine) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}
