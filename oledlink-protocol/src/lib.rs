//! SSD1306 Two-Wire Protocol
//!
//! This crate defines the byte packets the display driver sends to an
//! SSD1306-class OLED controller, and a decoder that turns captured
//! transactions back into commands for testing.
//!
//! # Packet Overview
//!
//! Every transaction starts with the device address, followed by control
//! bytes telling the controller how to interpret what comes next:
//! ```text
//! Command packet:  ┌──────┬─────┬──────┬─────┬─────┐
//!                  │ 0x80 │ CMD │ 0x80 │ CMD │ ... │
//!                  └──────┴─────┴──────┴─────┴─────┘
//! Data packet:     ┌──────┬───────────────────────┐
//!                  │ 0x40 │ GDDRAM bytes (1 page) │
//!                  └──────┴───────────────────────┘
//! ```
//!
//! Command packets are sent as a transaction prefix with no payload; data
//! packets use [`DATA_PREFIX`] as the prefix and the page bytes as the
//! payload.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod wire;

pub use command::{
    brightness, select_page, BRIGHTNESS_LEN, BRINGUP_SEQUENCE, CONTROL_COMMAND,
    CONTROL_COMMAND_STREAM, CONTROL_DATA, DATA_PREFIX, SELECT_PAGE_LEN,
};
pub use wire::{decode, DecodeError, Packet, MAX_COMMANDS};
