//! Interrupt-driven two-wire transaction engine
//!
//! A [`Bus`] owns the bus controller and runs one transaction at a time.
//! Submission arms the hardware with a START; every following hardware
//! event calls [`Bus::on_interrupt`], which moves the state machine one
//! step. When the STOP is issued the transaction's completion is handed to
//! its client.
//!
//! ```text
//!           ┌──────────────────────── Bus ─────────────────────────┐
//! submit ──▶│ active: Option<Transaction>  queued: Option<...>      │
//!           │ state:  BusState             twi: T                   │
//!           └───────────────▲──────────────────────┬───────────────┘
//!                           │                      │ completion
//!                    on_interrupt()                ▼
//!                                         client.transaction_complete
//! ```
//!
//! Everything lives behind one critical-section mutex. Completions are
//! delivered after the mutex is released, so a client may submit its next
//! transaction from its completion handler.
//!
//! A `Bus` is `Sync` whenever its controller is `Send`, so the interrupt
//! handler and the tasks that submit can share it through a `static`.

mod queue;
mod state;
mod transaction;

pub use queue::{CompletionQueue, COMPLETION_QUEUE_SIZE};
pub use state::BusState;
pub use transaction::{
    Completion, Token, Transaction, TransactionClient, MAX_DATA_LEN, MAX_PREFIX_LEN,
};

use core::cell::RefCell;
use core::hint::spin_loop;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use oledlink_hal::{I2cConfig, TwiController};

/// How an accepted request was scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Submitted {
    /// Bus was idle; START has been issued
    Started,
    /// Parked until the in-flight transaction stops
    Queued,
}

/// Request the bus could not take, handed back to the caller
#[derive(Debug)]
pub struct Rejected<'a>(pub Transaction<'a>);

struct Engine<'a, T> {
    twi: T,
    state: BusState,
    active: Option<Transaction<'a>>,
    queued: Option<Transaction<'a>>,
}

impl<'a, T: TwiController> Engine<'a, T> {
    fn submit(&mut self, tx: Transaction<'a>) -> Result<Submitted, Rejected<'a>> {
        if self.state.is_idle() {
            self.begin(tx);
            return Ok(Submitted::Started);
        }
        if tx.is_fast_fail() || self.queued.is_some() {
            return Err(Rejected(tx));
        }
        self.queued = Some(tx);
        Ok(Submitted::Queued)
    }

    fn begin(&mut self, tx: Transaction<'a>) {
        self.active = Some(tx);
        self.state = BusState::SlaveAddress;
        self.twi.start();
    }

    /// Advance by one hardware event
    fn step(&mut self) -> Option<Completion<'a>> {
        match self.state {
            BusState::Idle | BusState::Stop => self.finish(),
            BusState::SlaveAddress => {
                let Some(tx) = self.active.as_ref() else {
                    return self.finish();
                };
                self.twi.write(tx.address_byte());
                self.state = BusState::after_address(tx.prefix().len(), tx.data().len());
                None
            }
            BusState::WritePrefix => {
                let Some(tx) = self.active.as_mut() else {
                    return self.finish();
                };
                if let Some(byte) = tx.next_prefix_byte() {
                    self.twi.write(byte);
                }
                if tx.prefix_done() {
                    self.state = BusState::after_prefix(tx.data().len());
                }
                None
            }
            BusState::WriteByte => {
                let Some(tx) = self.active.as_mut() else {
                    return self.finish();
                };
                if let Some(byte) = tx.next_data_byte() {
                    self.twi.write(byte);
                }
                if tx.data_done() {
                    self.state = BusState::Stop;
                }
                None
            }
        }
    }

    /// Completion the next event hands out, if that event issues the STOP
    fn completion_due(&self) -> Option<Completion<'a>> {
        match self.state {
            BusState::Idle | BusState::Stop => self.active.as_ref()?.completion().copied(),
            _ => None,
        }
    }

    fn finish(&mut self) -> Option<Completion<'a>> {
        self.twi.stop();
        self.state = BusState::Idle;
        let completion = self.active.take().and_then(|mut tx| tx.take_completion());
        if let Some(next) = self.queued.take() {
            self.begin(next);
        }
        completion
    }
}

/// Single-slot transaction scheduler and bus state machine
pub struct Bus<'a, T> {
    engine: Mutex<CriticalSectionRawMutex, RefCell<Engine<'a, T>>>,
}

impl<'a, T: TwiController> Bus<'a, T> {
    /// Take ownership of the controller and enable it at `config`'s clock
    pub fn new(mut twi: T, config: &I2cConfig) -> Self {
        twi.enable(config.divider());
        Self {
            engine: Mutex::new(RefCell::new(Engine {
                twi,
                state: BusState::Idle,
                active: None,
                queued: None,
            })),
        }
    }

    /// Offer a transaction to the bus
    ///
    /// Starts it immediately if the bus is idle. Otherwise a fast-fail
    /// request is handed back untouched, and any other request waits in
    /// the single queued slot (handed back if that slot is taken too).
    /// Safe to call from interrupt context.
    pub fn submit(&self, tx: Transaction<'a>) -> Result<Submitted, Rejected<'a>> {
        let result = self.engine.lock(|engine| engine.borrow_mut().submit(tx));
        #[cfg(feature = "defmt")]
        match &result {
            Ok(Submitted::Queued) => defmt::trace!("bus busy, request queued"),
            Err(Rejected(tx)) => defmt::debug!("bus busy, rejected request to {=u8:#x}", tx.address()),
            Ok(Submitted::Started) => {}
        }
        result
    }

    /// Submit, retrying until the bus accepts the request
    pub fn submit_spinning(&self, mut tx: Transaction<'a>) -> Submitted {
        loop {
            match self.submit(tx) {
                Ok(submitted) => return submitted,
                Err(Rejected(back)) => {
                    tx = back;
                    spin_loop();
                }
            }
        }
    }

    /// Handle one bus interrupt, delivering any completion in place
    pub fn on_interrupt(&self) {
        if let Some(completion) = self.advance() {
            completion.deliver();
        }
    }

    /// Handle one bus interrupt, posting any completion to `queue`
    ///
    /// Returns `false` when the event would issue a STOP whose completion
    /// does not fit in `queue`. Nothing is written in that case and the bus
    /// stays in [`BusState::Stop`], so completions reach the queue in the
    /// order their transactions finished. Call again once a task has
    /// dispatched.
    pub fn on_interrupt_deferred<const N: usize>(&self, queue: &CompletionQueue<'a, N>) -> bool {
        self.engine.lock(|engine| {
            let mut engine = engine.borrow_mut();
            if let Some(completion) = engine.completion_due() {
                if queue.try_post(completion).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("completion queue full, holding stop");
                    return false;
                }
            }
            // any completion this releases is already queued
            engine.step();
            true
        })
    }

    fn advance(&self) -> Option<Completion<'a>> {
        self.engine.lock(|engine| engine.borrow_mut().step())
    }

    /// Current state machine phase
    pub fn state(&self) -> BusState {
        self.engine.lock(|engine| engine.borrow().state)
    }

    /// Whether no transaction is in flight
    pub fn is_idle(&self) -> bool {
        self.state().is_idle()
    }

    /// Whether a request is waiting for the in-flight one to stop
    pub fn has_queued(&self) -> bool {
        self.engine.lock(|engine| engine.borrow().queued.is_some())
    }

    /// Run `f` with the controller, inside the critical section
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.engine.lock(|engine| f(&mut engine.borrow_mut().twi))
    }
}
