//! Non-blocking display link for SSD1306-class OLED controllers
//!
//! This crate moves a frame buffer to the display over a two-wire bus
//! without stalling the main program:
//!
//! - Interrupt-driven bus state machine, one hardware event per step
//! - Single-slot transaction scheduler with one queued request
//! - Completion dispatch, inline or through a task queue
//! - Advisory busy lock serializing refresh, brightness and drawing
//! - Page refresh sequencer chained through transaction completions
//!
//! # Flow
//!
//! ```text
//!  main program                 Bus                       interrupt
//!  ────────────                 ───                       ─────────
//!  Display::refresh ──lock──▶ submit(select page 0) ──▶ START
//!                                                        on_interrupt × n
//!                             ◀── completion ─────────── STOP
//!  transfer page 0 ─────────▶ submit(0x40 + page) ────▶ START
//!                                   ...
//!  last page done ──unlock
//! ```
//!
//! Pixel drawing lives in `oledlink-raster`, command bytes in
//! `oledlink-protocol` and the hardware seam in `oledlink-hal`.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod display;
pub mod error;
pub mod lock;

pub use bus::{
    Bus, BusState, Completion, CompletionQueue, Rejected, Submitted, Token, Transaction,
    TransactionClient, MAX_DATA_LEN, MAX_PREFIX_LEN,
};
pub use config::DisplayConfig;
pub use display::Display;
pub use error::Error;
pub use lock::BusyLock;
