//! Device configuration.
//!
//! Device records are supplied by the caller, typically from a JSON file:
//!
//! ```json
//! {
//!   "devices": [
//!     { "name": "hall", "kind": "dimmer", "addresses": [7] },
//!     { "name": "south-blinds", "kind": "directional-group", "addresses": [20, 120, 242] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::{Device, DeviceKind};
use crate::protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Device '{name}' is invalid: {source}")]
    Device {
        name: String,
        #[source]
        source: ProtocolError,
    },

    #[error("Device name '{0}' is used more than once")]
    DuplicateName(String),
}

/// One configured device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub kind: DeviceKind,
    /// Own address first; groups add group and central addresses.
    pub addresses: Vec<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl BusConfig {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Build device records in configuration order.
    pub fn devices(&self) -> Result<Vec<(String, Device)>, ConfigError> {
        let mut seen = HashSet::new();
        self.devices
            .iter()
            .map(|config| {
                if !seen.insert(config.name.as_str()) {
                    return Err(ConfigError::DuplicateName(config.name.clone()));
                }
                let device =
                    Device::new(config.kind, &config.addresses).map_err(|source| {
                        ConfigError::Device {
                            name: config.name.clone(),
                            source,
                        }
                    })?;
                Ok((config.name.clone(), device))
            })
            .collect()
    }
}
