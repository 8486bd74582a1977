//! The KMBox command vocabulary.
//!
//! Every command is a line of ASCII text terminated by a single `\n`. The
//! device sends nothing back. These strings are what the firmware parses and
//! must stay byte-for-byte as they are.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Line terminator appended to every command.
pub const TERMINATOR: u8 = b'\n';

/// Mouse buttons understood by `km.click`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Index used on the wire.
    pub fn code(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown button name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mouse button '{0}' (expected left, right or middle)")]
pub struct ParseButtonError(String);

impl FromStr for MouseButton {
    type Err = ParseButtonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(ParseButtonError(s.to_string())),
        }
    }
}

/// A single device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Relative pointer movement. Values are passed through unchecked.
    Move { x: i32, y: i32 },
    /// Press and release a button.
    Click(MouseButton),
}

impl Command {
    /// Replace the contents of `buf` with the encoded command line.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        use std::io::Write;

        buf.clear();
        // Writing into a Vec cannot fail.
        let _ = write!(buf, "{self}");
        buf.push(TERMINATOR);
    }

    /// The encoded command line in a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(24);
        self.encode_into(&mut buf);
        buf
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { x, y } => write!(f, "km.move({x},{y})"),
            Command::Click(button) => write!(f, "km.click({})", button.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_move_text() {
        assert_eq!(Command::Move { x: 10, y: -5 }.to_string(), "km.move(10,-5)");
        assert_eq!(
            Command::Move { x: i32::MIN, y: i32::MAX }.to_string(),
            "km.move(-2147483648,2147483647)"
        );
    }

    #[test]
    fn test_click_bytes() {
        assert_eq!(Command::Click(MouseButton::Left).to_bytes(), b"km.click(0)\n");
        assert_eq!(Command::Click(MouseButton::Right).to_bytes(), b"km.click(1)\n");
        assert_eq!(Command::Click(MouseButton::Middle).to_bytes(), b"km.click(2)\n");
    }

    #[test]
    fn test_encode_into_reuses_buffer() {
        let mut buf = b"stale contents".to_vec();
        Command::Move { x: 1, y: 2 }.encode_into(&mut buf);
        assert_eq!(buf, b"km.move(1,2)\n");
        assert_eq!(buf.iter().filter(|&&b| b == TERMINATOR).count(), 1);
    }

    #[test]
    fn test_button_parse() {
        assert_eq!("left".parse::<MouseButton>(), Ok(MouseButton::Left));
        assert_eq!("RIGHT".parse::<MouseButton>(), Ok(MouseButton::Right));
        assert_eq!("Middle".parse::<MouseButton>(), Ok(MouseButton::Middle));
        assert!("side".parse::<MouseButton>().is_err());
    }

    #[test]
    fn test_button_display_roundtrips_parse() {
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            assert_eq!(button.to_string().parse::<MouseButton>(), Ok(button));
        }
    }
}
