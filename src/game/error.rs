use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Wall hits, self-collisions and timeouts are normal episode endings and are
/// reported through [`super::StepResult`], not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("board is full, no free cell for food ({attempts} random draws)")]
    FoodUnplaceable { attempts: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("state does not match configuration: {0}")]
    StateMismatch(String),
}
