//! Error types for salon setup and the simulation runner.
//!
//! Steady-state monitor operations never fail; everything here is raised
//! while configuring the salon or while spawning and joining its threads.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SalonError {
    #[error("invalid capacity: waiting room needs at least one chair (got {waiting_slots})")]
    InvalidCapacity { waiting_slots: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to spawn {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} thread panicked")]
    AgentPanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = SalonError::InvalidCapacity { waiting_slots: 0 };
        assert!(err.to_string().contains("got 0"));

        let err = SalonError::AgentPanicked("client-3".to_string());
        assert_eq!(err.to_string(), "client-3 thread panicked");
    }
}
