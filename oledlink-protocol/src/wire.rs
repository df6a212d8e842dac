//! Decoding of captured transactions
//!
//! Turns the bytes following the address byte of one transaction back into
//! either a list of commands or a block of display data. Used to check what
//! a simulated bus observed.

use heapless::Vec;

use crate::command::{cmd, CONTROL_COMMAND, CONTROL_COMMAND_STREAM, CONTROL_DATA};

/// Maximum commands decoded from one transaction
pub const MAX_COMMANDS: usize = 16;

/// Errors that can occur while decoding a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Transaction carried no bytes after the address
    Empty,
    /// Byte in control position is not a known control byte
    UnknownControl(u8),
    /// Control byte announced a command that never arrived
    Truncated,
    /// More than [`MAX_COMMANDS`] commands
    TooManyCommands,
}

/// One decoded transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet<'a> {
    /// Command bytes, control bytes removed
    Commands(Vec<u8, MAX_COMMANDS>),
    /// GDDRAM bytes following a data control byte
    Data(&'a [u8]),
}

impl Packet<'_> {
    /// Page selected by a select-page packet
    pub fn selected_page(&self) -> Option<u8> {
        match self {
            Packet::Commands(c) => match c.as_slice() {
                [cmd::SET_LOW_COLUMN, cmd::SET_HIGH_COLUMN, page]
                    if page & 0xF0 == cmd::SET_PAGE_ADDR =>
                {
                    Some(page & 0x0F)
                }
                _ => None,
            },
            Packet::Data(_) => None,
        }
    }

    /// Level set by a brightness packet
    pub fn brightness(&self) -> Option<u8> {
        match self {
            Packet::Commands(c) => match c.as_slice() {
                [cmd::SET_CONTRAST, level] => Some(*level),
                _ => None,
            },
            Packet::Data(_) => None,
        }
    }

    /// Data bytes, if this is a data packet
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Packet::Data(d) => Some(d),
            Packet::Commands(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Next byte is a control byte
    Control,
    /// Got 0x80, next byte is a single command
    Command,
    /// Got 0x00, every remaining byte is a command
    CommandStream,
}

/// Decode the bytes of one transaction (address byte excluded)
pub fn decode(bytes: &[u8]) -> Result<Packet<'_>, DecodeError> {
    match bytes.first() {
        None => return Err(DecodeError::Empty),
        Some(&CONTROL_DATA) => return Ok(Packet::Data(&bytes[1..])),
        Some(_) => {}
    }

    let mut commands = Vec::new();
    let mut state = DecodeState::Control;

    for &byte in bytes {
        match state {
            DecodeState::Control => {
                state = match byte {
                    CONTROL_COMMAND => DecodeState::Command,
                    CONTROL_COMMAND_STREAM => DecodeState::CommandStream,
                    other => return Err(DecodeError::UnknownControl(other)),
                };
            }
            DecodeState::Command => {
                commands
                    .push(byte)
                    .map_err(|_| DecodeError::TooManyCommands)?;
                state = DecodeState::Control;
            }
            DecodeState::CommandStream => {
                commands
                    .push(byte)
                    .map_err(|_| DecodeError::TooManyCommands)?;
            }
        }
    }

    if state == DecodeState::Command {
        return Err(DecodeError::Truncated);
    }

    Ok(Packet::Commands(commands))
}
