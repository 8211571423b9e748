//! Run configuration, loadable from a TOML file and overridable from the CLI.

use std::path::Path;

use serde::Deserialize;

use crate::error::SalonError;
use crate::pace::Pace;
use crate::types::Capacity;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SalonConfig {
    pub waiting_chairs: usize,
    pub clients: usize,
    /// How long the salon stays open before the owner calls `shutdown`.
    pub open_ms: u64,
    pub service_ms: u64,
    pub walk_ms: u64,
    pub regrow_ms: u64,
    /// Random extra delay added to every service, walk and regrowth.
    pub jitter_ms: u64,
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            waiting_chairs: 2,
            clients: 5,
            open_ms: 1500,
            service_ms: 40,
            walk_ms: 60,
            regrow_ms: 120,
            jitter_ms: 20,
        }
    }
}

impl SalonConfig {
    /// Read a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, SalonError> {
        let text = std::fs::read_to_string(path).map_err(|source| SalonError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SalonError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), SalonError> {
        if self.clients == 0 {
            return Err(SalonError::InvalidConfig(
                "clients must be > 0".to_string(),
            ));
        }
        if self.waiting_chairs == 0 {
            return Err(SalonError::InvalidConfig(
                "waiting_chairs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn capacity(&self) -> Result<Capacity, SalonError> {
        Capacity::new(self.waiting_chairs)
    }

    pub fn haircut_pace(&self) -> Pace {
        Pace::from_millis(self.service_ms, self.jitter_ms)
    }

    pub fn walk_pace(&self) -> Pace {
        Pace::from_millis(self.walk_ms, self.jitter_ms)
    }

    pub fn regrow_pace(&self) -> Pace {
        Pace::from_millis(self.regrow_ms, self.jitter_ms)
    }
}
