//! Command catalog: symbolic command names and their protocol codes.
//!
//! Codes are not unique. `on` and `up` share code 3, `off` and `down` share
//! code 12. A raw code only has a meaning together with the kind of device
//! it was addressed to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ProtocolError;

/// Symbolic bus command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    Toggle,
    UpStop,
    DownStop,
    On,
    Up,
    Off,
    Down,
    Stop,
}

const CATALOG: [Command; 8] = [
    Command::Toggle,
    Command::UpStop,
    Command::DownStop,
    Command::On,
    Command::Up,
    Command::Off,
    Command::Down,
    Command::Stop,
];

impl Command {
    /// Numeric protocol code for this command.
    pub const fn code(self) -> u8 {
        match self {
            Self::Toggle => 0,
            Self::UpStop => 1,
            Self::DownStop => 2,
            Self::On | Self::Up => 3,
            Self::Off | Self::Down => 12,
            Self::Stop => 15,
        }
    }

    /// Symbolic name as used on the scripting side, e.g. `"up-stop"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::UpStop => "up-stop",
            Self::DownStop => "down-stop",
            Self::On => "on",
            Self::Up => "up",
            Self::Off => "off",
            Self::Down => "down",
            Self::Stop => "stop",
        }
    }

    /// Every catalog entry, in catalog order.
    pub fn all() -> &'static [Command] {
        &CATALOG
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| ProtocolError::InvalidCommand(s.to_string()))
    }
}

/// Look up the protocol code for a symbolic name.
pub fn name_to_code(name: &str) -> Option<u8> {
    name.parse::<Command>().ok().map(Command::code)
}

/// Whether `name` is a known command name.
pub fn is_valid_name(name: &str) -> bool {
    name.parse::<Command>().is_ok()
}

/// All commands sharing `code`. Only useful for introspection; the
/// meaning of a code is decided by the receiving device's kind.
pub fn commands_for_code(code: u8) -> Vec<Command> {
    CATALOG.iter().copied().filter(|c| c.code() == code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_map_to_codes() {
        assert_eq!(name_to_code("toggle"), Some(0));
        assert_eq!(name_to_code("up-stop"), Some(1));
        assert_eq!(name_to_code("down-stop"), Some(2));
        assert_eq!(name_to_code("on"), Some(3));
        assert_eq!(name_to_code("off"), Some(12));
        assert_eq!(name_to_code("stop"), Some(15));
        assert_eq!(name_to_code("dim"), None);
    }

    #[test]
    fn colliding_codes_are_documented() {
        assert_eq!(Command::On.code(), Command::Up.code());
        assert_eq!(Command::Off.code(), Command::Down.code());
        assert_eq!(commands_for_code(3), vec![Command::On, Command::Up]);
        assert_eq!(commands_for_code(12), vec![Command::Off, Command::Down]);
        assert!(commands_for_code(13).is_empty());
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_name("down"));
        assert!(!is_valid_name("Down"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn parse_and_display_agree() {
        for command in Command::all() {
            let parsed: Command = command.to_string().parse().unwrap();
            assert_eq!(parsed, *command);
        }
    }

    #[test]
    fn unknown_name_is_an_invalid_command() {
        let err = "sideways".parse::<Command>().unwrap_err();
        assert_eq!(err, ProtocolError::InvalidCommand("sideways".to_string()));
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_string(&Command::DownStop).unwrap();
        assert_eq!(json, "\"down-stop\"");
    }
}
