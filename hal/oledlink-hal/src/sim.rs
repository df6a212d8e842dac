//! Recording controller for host-side testing
//!
//! [`SimTwi`] accepts every [`TwiController`] call and records it. Tests
//! drive the bus engine by calling its interrupt entry point in a loop,
//! then inspect what would have appeared on the wire.

extern crate std;

use std::vec::Vec;

use crate::i2c::{ClockDivider, TwiController};

/// One recorded controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Peripheral enabled with the given divider
    Enable(ClockDivider),
    /// START condition
    Start,
    /// Byte loaded into the data register
    Write(u8),
    /// STOP condition
    Stop,
}

/// Bytes sent between one START and its STOP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTransaction {
    /// 7-bit device address (address byte shifted right)
    pub address: u8,
    /// Bytes following the address byte
    pub bytes: Vec<u8>,
    /// Whether a STOP closed this transaction
    pub stopped: bool,
}

/// Simulated TWI master that records everything it is asked to do
#[derive(Debug, Default, Clone)]
pub struct SimTwi {
    events: Vec<BusEvent>,
}

impl SimTwi {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded operations, oldest first
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of bytes written to the data register
    pub fn bytes_written(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BusEvent::Write(_)))
            .count()
    }

    /// Split the recording into START..STOP transactions
    ///
    /// A transaction still open at the end of the recording is returned
    /// with `stopped == false`. Writes outside any transaction are ignored.
    pub fn transactions(&self) -> Vec<WireTransaction> {
        let mut out = Vec::new();
        let mut current: Option<(Option<u8>, Vec<u8>)> = None;

        for event in &self.events {
            match *event {
                BusEvent::Enable(_) => {}
                BusEvent::Start => {
                    if let Some((address, bytes)) = current.take() {
                        out.push(WireTransaction {
                            address: address.unwrap_or(0),
                            bytes,
                            stopped: false,
                        });
                    }
                    current = Some((None, Vec::new()));
                }
                BusEvent::Write(byte) => {
                    if let Some((address, bytes)) = current.as_mut() {
                        match address {
                            None => *address = Some(byte >> 1),
                            Some(_) => bytes.push(byte),
                        }
                    }
                }
                BusEvent::Stop => {
                    if let Some((address, bytes)) = current.take() {
                        out.push(WireTransaction {
                            address: address.unwrap_or(0),
                            bytes,
                            stopped: true,
                        });
                    }
                }
            }
        }

        if let Some((address, bytes)) = current {
            out.push(WireTransaction {
                address: address.unwrap_or(0),
                bytes,
                stopped: false,
            });
        }

        out
    }
}

impl TwiController for SimTwi {
    fn enable(&mut self, divider: ClockDivider) {
        self.events.push(BusEvent::Enable(divider));
    }

    fn start(&mut self) {
        self.events.push(BusEvent::Start);
    }

    fn write(&mut self, byte: u8) {
        self.events.push(BusEvent::Write(byte));
    }

    fn stop(&mut self) {
        self.events.push(BusEvent::Stop);
    }
}
