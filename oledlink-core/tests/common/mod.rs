//! Shared helpers for bus and display integration tests
#![allow(dead_code)]

use std::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use oledlink_core::{Bus, CompletionQueue, Token, TransactionClient};
use oledlink_hal::sim::{SimTwi, WireTransaction};
use oledlink_hal::I2cConfig;

/// Upper bound on interrupts before a test is considered hung
const EVENT_LIMIT: usize = 100_000;

/// Bus on a fresh recorder, with the enable event already cleared
pub fn new_bus<'a>() -> Bus<'a, SimTwi> {
    let bus = Bus::new(SimTwi::new(), &I2cConfig::STANDARD);
    bus.with_controller(|twi| twi.clear());
    bus
}

/// Fire interrupts until the bus is idle, returning how many were needed
pub fn settle(bus: &Bus<'_, SimTwi>) -> usize {
    let mut events = 0;
    while !bus.is_idle() {
        bus.on_interrupt();
        events += 1;
        assert!(events < EVENT_LIMIT, "bus never went idle");
    }
    events
}

/// Like [`settle`], but completions go through `queue` and are dispatched
/// whenever the bus runs dry or the queue holds a STOP back
pub fn settle_deferred<'a, const N: usize>(
    bus: &Bus<'a, SimTwi>,
    queue: &CompletionQueue<'a, N>,
) -> usize {
    let mut events = 0;
    loop {
        if bus.is_idle() {
            if queue.dispatch_pending() == 0 {
                return events;
            }
            continue;
        }
        if bus.on_interrupt_deferred(queue) {
            events += 1;
        } else {
            assert!(queue.dispatch_pending() > 0, "held back with nothing queued");
        }
        assert!(events < EVENT_LIMIT, "bus never went idle");
    }
}

/// Everything the recorder saw, split into transactions
pub fn wire(bus: &Bus<'_, SimTwi>) -> Vec<WireTransaction> {
    bus.with_controller(|twi| twi.transactions())
}

/// Client that records the tokens it receives, from any context
pub struct Recorder {
    tokens: Mutex<CriticalSectionRawMutex, RefCell<Vec<Token>>>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self {
            tokens: Mutex::new(RefCell::new(Vec::new())),
        }
    }
}

impl Recorder {
    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.lock(|tokens| tokens.borrow().clone())
    }

    pub fn count(&self) -> usize {
        self.tokens.lock(|tokens| tokens.borrow().len())
    }
}

impl<'a> TransactionClient<'a> for Recorder {
    fn transaction_complete(&'a self, token: Token) {
        self.tokens.lock(|tokens| tokens.borrow_mut().push(token));
    }
}
