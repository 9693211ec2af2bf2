//! Decision-making agents that drive the engine
//!
//! The engine makes no assumption about where actions come from; these are
//! reference agents for the watch and bench front ends.

pub mod greedy;
pub mod random;

pub use greedy::GreedyAgent;
pub use random::RandomAgent;

use crate::game::{Action, GameEngine};

/// Produces one action per tick from a read-only view of the engine
pub trait Agent {
    /// Short identifier for logs and the HUD
    fn name(&self) -> &str;

    fn act(&mut self, engine: &GameEngine) -> Action;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn act(&mut self, engine: &GameEngine) -> Action {
        (**self).act(engine)
    }
}
