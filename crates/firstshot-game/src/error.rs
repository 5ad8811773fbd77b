//! Gameplay errors

/// Errors raised by the gameplay layer
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("player character has not been spawned")]
    CharacterNotSpawned,

    #[error("invalid projectile launch: {0}")]
    InvalidLaunch(String),
}
