//! Bus protocol states
//!
//! ```text
//! ┌──────────────┬──────────────────────┬───────────────────────────────┐
//! │ State        │ Action on interrupt  │ Next                          │
//! ├──────────────┼──────────────────────┼───────────────────────────────┤
//! │ Idle / Stop  │ STOP                 │ Idle (queued request starts)  │
//! │ SlaveAddress │ write address << 1   │ WritePrefix, WriteByte, Stop  │
//! │ WritePrefix  │ write prefix byte    │ itself, WriteByte, Stop       │
//! │ WriteByte    │ write payload byte   │ itself, Stop                  │
//! └──────────────┴──────────────────────┴───────────────────────────────┘
//! ```
//!
//! A transaction with `p` prefix and `d` payload bytes takes `p + d + 2`
//! interrupts from START to STOP.

/// Position of the state machine within a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No transaction in flight
    #[default]
    Idle,
    /// Last byte sent; next event issues the stop condition
    Stop,
    /// Start condition issued; next event sends the address byte
    SlaveAddress,
    /// Sending prefix bytes
    WritePrefix,
    /// Sending payload bytes
    WriteByte,
}

impl BusState {
    /// Whether a new transaction can start right away
    pub fn is_idle(self) -> bool {
        self == BusState::Idle
    }

    /// State entered after the address byte has been written
    pub(crate) fn after_address(prefix_len: usize, data_len: usize) -> Self {
        match (prefix_len, data_len) {
            (0, 0) => BusState::Stop,
            (0, _) => BusState::WriteByte,
            _ => BusState::WritePrefix,
        }
    }

    /// State entered after the last prefix byte has been written
    pub(crate) fn after_prefix(data_len: usize) -> Self {
        if data_len == 0 {
            BusState::Stop
        } else {
            BusState::WriteByte
        }
    }
}
