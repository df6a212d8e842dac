//! Deferred completion delivery
//!
//! In inline mode a completion runs inside the interrupt handler. With a
//! [`CompletionQueue`] the handler only posts the completion and a task
//! delivers it later, keeping interrupt latency short.
//!
//! ```text
//! interrupt:  bus.on_interrupt_deferred(&queue) ──post──▶ [ channel ]
//! task:       queue.dispatch().await ◀──────────receive──────┘
//!                  └─▶ client.transaction_complete(token)
//! ```
//!
//! Completions leave the queue in the order they were posted. A full queue
//! never delivers out of turn: the bus holds its STOP back until a task
//! has made room (see [`Bus::on_interrupt_deferred`]).
//!
//! [`Bus::on_interrupt_deferred`]: super::Bus::on_interrupt_deferred

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use super::transaction::Completion;

/// Default queue depth
pub const COMPLETION_QUEUE_SIZE: usize = 4;

/// Completions waiting for task context
pub struct CompletionQueue<'a, const N: usize = COMPLETION_QUEUE_SIZE> {
    channel: Channel<CriticalSectionRawMutex, Completion<'a>, N>,
}

impl<'a, const N: usize> CompletionQueue<'a, N> {
    /// Empty queue; usable in a `static`
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a completion, handing it back if there is no room
    pub(crate) fn try_post(&self, completion: Completion<'a>) -> Result<(), Completion<'a>> {
        self.channel
            .try_send(completion)
            .map_err(|TrySendError::Full(completion)| completion)
    }

    /// Wait for the next completion and deliver it
    pub async fn dispatch(&self) {
        let completion = self.channel.receive().await;
        completion.deliver();
    }

    /// Deliver everything queued so far, returning how many ran
    pub fn dispatch_pending(&self) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.channel.try_receive() {
            completion.deliver();
            delivered += 1;
        }
        delivered
    }

    /// Completions waiting for dispatch
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for CompletionQueue<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::bus::transaction::{Token, TransactionClient};
    use core::cell::RefCell;
    use embassy_sync::blocking_mutex::Mutex;
    use std::vec::Vec;

    struct Log {
        tokens: Mutex<CriticalSectionRawMutex, RefCell<Vec<u16>>>,
    }

    impl Log {
        fn new() -> Self {
            Self {
                tokens: Mutex::new(RefCell::new(Vec::new())),
            }
        }

        fn tokens(&self) -> Vec<u16> {
            self.tokens.lock(|tokens| tokens.borrow().clone())
        }
    }

    impl<'a> TransactionClient<'a> for Log {
        fn transaction_complete(&'a self, token: Token) {
            self.tokens.lock(|tokens| tokens.borrow_mut().push(token.value()));
        }
    }

    #[test]
    fn test_post_then_dispatch_pending() {
        let log = Log::new();
        let queue: CompletionQueue<'_, 2> = CompletionQueue::new();

        assert!(queue.try_post(Completion::new(&log, Token::new(1))).is_ok());
        assert!(queue.try_post(Completion::new(&log, Token::new(2))).is_ok());
        assert_eq!(queue.len(), 2);
        assert!(queue.is_full());
        assert!(log.tokens().is_empty());

        assert_eq!(queue.dispatch_pending(), 2);
        assert!(queue.is_empty());
        assert_eq!(log.tokens(), [1, 2]);
    }

    #[test]
    fn test_full_queue_hands_completion_back() {
        let log = Log::new();
        let queue: CompletionQueue<'_, 1> = CompletionQueue::new();

        assert!(queue.try_post(Completion::new(&log, Token::new(1))).is_ok());
        let back = queue.try_post(Completion::new(&log, Token::new(2)));
        assert_eq!(back.map_err(|c| c.token()), Err(Token::new(2)));
        // nothing runs until a task dispatches
        assert!(log.tokens().is_empty());
        assert_eq!(queue.len(), 1);

        embassy_futures::block_on(queue.dispatch());
        assert_eq!(log.tokens(), [1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_usable_as_static() {
        static QUEUE: CompletionQueue<'static, 2> = CompletionQueue::new();
        static LOG: Mutex<CriticalSectionRawMutex, RefCell<Vec<u16>>> =
            Mutex::new(RefCell::new(Vec::new()));

        struct StaticLog;

        impl TransactionClient<'static> for StaticLog {
            fn transaction_complete(&'static self, token: Token) {
                LOG.lock(|log| log.borrow_mut().push(token.value()));
            }
        }

        static CLIENT: StaticLog = StaticLog;

        assert!(QUEUE.try_post(Completion::new(&CLIENT, Token::new(7))).is_ok());
        let worker = std::thread::spawn(|| QUEUE.dispatch_pending());
        assert_eq!(worker.join().ok(), Some(1));
        assert_eq!(LOG.lock(|log| log.borrow().clone()), [7]);
    }
}
