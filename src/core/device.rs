//! Device records owned by the caller and mutated by the engine.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use super::state::{DeviceState, State};
use crate::protocol::{Address, ProtocolError};

/// Kind of bus device. Selects the transition table that drives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    Switch,
    Dimmer,
    Directional,
    DirectionalGroup,
}

impl DeviceKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Dimmer => "dimmer",
            Self::Directional => "directional",
            Self::DirectionalGroup => "directional-group",
        }
    }

    /// Whether the kind's transition table defines `state`.
    pub fn supports(self, state: DeviceState) -> bool {
        self.table().state(state).is_some()
    }

    /// Number of addresses a device of this kind occupies.
    ///
    /// A directional group listens on its own address, its group address
    /// and the central address, in that order.
    pub const fn address_count(self) -> usize {
        match self {
            Self::DirectionalGroup => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of an address slot on a multi-address device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressRole {
    Own = 0,
    Group = 1,
    Central = 2,
}

impl AddressRole {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-kind auxiliary fields kept next to the symbolic state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Auxiliary {
    Switch,
    Dimmer {
        brightness: f64,
        /// Last non-zero brightness, restored on toggle.
        memory: Option<f64>,
    },
    Directional {
        /// Direction travelled before the last stop.
        memory: Option<DeviceState>,
    },
}

impl Auxiliary {
    fn initial(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Switch => Self::Switch,
            DeviceKind::Dimmer => Self::Dimmer {
                brightness: 0.0,
                memory: None,
            },
            DeviceKind::Directional | DeviceKind::DirectionalGroup => {
                Self::Directional { memory: None }
            }
        }
    }

    /// Whether these fields belong to `kind` and hold values its actions can produce.
    fn fits(&self, kind: DeviceKind) -> bool {
        let level = |value: f64| (0.0..=1.0).contains(&value);
        match (self, kind) {
            (Self::Switch, DeviceKind::Switch) => true,
            (Self::Dimmer { brightness, memory }, DeviceKind::Dimmer) => {
                level(*brightness) && memory.is_none_or(level)
            }
            (
                Self::Directional { memory },
                DeviceKind::Directional | DeviceKind::DirectionalGroup,
            ) => memory.is_none_or(DeviceState::is_moving),
            _ => false,
        }
    }
}

/// Serialized form of a [`Device`], validated on the way in.
#[derive(Deserialize)]
struct RawDevice {
    addresses: Vec<i64>,
    kind: DeviceKind,
    #[serde(default)]
    state: DeviceState,
    aux: Option<Auxiliary>,
}

impl RawDevice {
    fn into_device(self) -> Result<Device, ProtocolError> {
        let mut device = Device::new(self.kind, &self.addresses)?;

        if !self.kind.supports(self.state) {
            return Err(ProtocolError::UnsupportedState {
                kind: self.kind.to_string(),
                state: self.state.name().to_string(),
            });
        }
        device.state = self.state;

        if let Some(aux) = self.aux {
            if !aux.fits(self.kind) {
                return Err(ProtocolError::InvalidAuxiliary {
                    kind: self.kind.to_string(),
                });
            }
            device.aux = aux;
        }
        Ok(device)
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawDevice::deserialize(deserializer)?
            .into_device()
            .map_err(de::Error::custom)
    }
}

/// A bus device as seen by the engine.
///
/// Deserializing runs the same checks as [`Device::new`], and also rejects a
/// state or auxiliary fields the kind cannot have.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Device {
    addresses: Vec<Address>,
    kind: DeviceKind,
    pub state: DeviceState,
    pub aux: Auxiliary,
}

impl Device {
    /// Create a device in the `undefined` state.
    ///
    /// ```rust
    /// use homebus::core::{Device, DeviceKind, DeviceState};
    ///
    /// let blind = Device::new(DeviceKind::DirectionalGroup, &[4, 200, 242]).unwrap();
    /// assert_eq!(blind.state, DeviceState::Undefined);
    /// assert!(Device::new(DeviceKind::Switch, &[1, 2]).is_err());
    /// ```
    pub fn new(kind: DeviceKind, addresses: &[i64]) -> Result<Self, ProtocolError> {
        if addresses.len() != kind.address_count() {
            return Err(ProtocolError::InvalidAddressCount {
                kind: kind.to_string(),
                expected: kind.address_count(),
                found: addresses.len(),
            });
        }
        let addresses = addresses
            .iter()
            .map(|a| Address::new(*a))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            addresses,
            kind,
            state: DeviceState::Undefined,
            aux: Auxiliary::initial(kind),
        })
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Address in slot `index` (0 is the device's own address).
    pub fn address(&self, index: usize) -> Option<Address> {
        self.addresses.get(index).copied()
    }

    /// Slot of `address` on this device, if it listens there.
    pub fn address_index(&self, address: Address) -> Option<usize> {
        self.addresses.iter().position(|a| *a == address)
    }

    pub fn listens_on(&self, address: Address) -> bool {
        self.addresses.contains(&address)
    }

    /// Current brightness of a dimmer, `None` for other kinds.
    pub fn brightness(&self) -> Option<f64> {
        match self.aux {
            Auxiliary::Dimmer { brightness, .. } => Some(brightness),
            _ => None,
        }
    }
}
