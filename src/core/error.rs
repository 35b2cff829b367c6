//! Engine error type.
//!
//! Only configuration-time and persistence-boundary operations return
//! errors. A card that finds no valid target is not an error: it resolves
//! to a no-op outcome. Misuse of the round protocol (resolving without a
//! snapshot, touching an ended sequence) is a programming error and panics.

/// Errors raised while building or restoring engine state.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown card type: {0}")]
    UnknownCardType(String),

    #[error("unknown item type: {0}")]
    UnknownItemType(String),

    #[error("unknown faction relation: {0}")]
    UnknownRelation(String),

    #[error("invalid rules config: {0}")]
    InvalidConfig(String),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EngineError::UnknownCardType("fireball".into());
        assert_eq!(err.to_string(), "unknown card type: fireball");

        let err = EngineError::InvalidConfig("poison duration must be at least 1".into());
        assert!(err.to_string().starts_with("invalid rules config"));
    }
}
