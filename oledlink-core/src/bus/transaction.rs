//! Transaction requests and completions
//!
//! A [`Transaction`] is one START..STOP exchange: an address byte, an
//! optional prefix (command or data-mode control bytes) and an optional
//! payload. Bytes are copied in when the request is built, so the caller's
//! buffers are free again as soon as the constructor returns.

use core::fmt;

use heapless::Vec;

use crate::config::MAX_ADDRESS;
use crate::error::Error;

/// Prefix capacity of one transaction
pub const MAX_PREFIX_LEN: usize = 16;

/// Payload capacity of one transaction (one full page of a 255 column panel)
pub const MAX_DATA_LEN: usize = 255;

/// Opaque value handed back to the client when a transaction completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Token(u16);

impl Token {
    /// Wrap a client-chosen value
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

/// Receiver of transaction completions
///
/// Called exactly once per completed transaction that carried a
/// [`Completion`]. The call happens outside the bus critical section, so the
/// client may submit its next transaction from here.
///
/// Completions may run in interrupt context, so clients are referenced as
/// `dyn TransactionClient + Sync`.
pub trait TransactionClient<'a> {
    fn transaction_complete(&'a self, token: Token);
}

/// Who to notify when a transaction finishes
#[derive(Clone, Copy)]
pub struct Completion<'a> {
    client: &'a (dyn TransactionClient<'a> + Sync),
    token: Token,
}

impl<'a> Completion<'a> {
    /// Pair `client` with the `token` it will receive
    pub fn new(client: &'a (dyn TransactionClient<'a> + Sync), token: Token) -> Self {
        Self { client, token }
    }

    pub fn token(&self) -> Token {
        self.token
    }

    /// Hand the token to the client
    pub fn deliver(self) {
        self.client.transaction_complete(self.token);
    }
}

impl fmt::Debug for Completion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// One bus exchange: address, prefix, payload, stop
#[derive(Debug, Clone)]
pub struct Transaction<'a> {
    address: u8,
    prefix: Vec<u8, MAX_PREFIX_LEN>,
    data: Vec<u8, MAX_DATA_LEN>,
    completion: Option<Completion<'a>>,
    fast_fail: bool,
    /// Bytes after the address already written, prefix first
    sent: usize,
}

impl<'a> Transaction<'a> {
    /// Build a request, copying `prefix` and `data`
    ///
    /// Returns [`Error::InvalidParameter`] for an address above 7 bits and
    /// [`Error::Overflow`] when either part exceeds its capacity.
    pub fn new(address: u8, prefix: &[u8], data: &[u8]) -> Result<Self, Error> {
        if address > MAX_ADDRESS {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            address,
            prefix: Vec::from_slice(prefix).map_err(|_| Error::Overflow)?,
            data: Vec::from_slice(data).map_err(|_| Error::Overflow)?,
            completion: None,
            fast_fail: false,
            sent: 0,
        })
    }

    /// Prefix-only request, the shape of every command packet
    pub fn command(address: u8, prefix: &[u8]) -> Result<Self, Error> {
        Self::new(address, prefix, &[])
    }

    /// Notify `client` with `token` once the stop condition is issued
    pub fn with_completion(
        mut self,
        client: &'a (dyn TransactionClient<'a> + Sync),
        token: Token,
    ) -> Self {
        self.completion = Some(Completion::new(client, token));
        self
    }

    /// Reject instead of queueing when the bus is busy
    pub fn with_fast_fail(mut self, fast_fail: bool) -> Self {
        self.fast_fail = fast_fail;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn completion(&self) -> Option<&Completion<'a>> {
        self.completion.as_ref()
    }

    pub fn is_fast_fail(&self) -> bool {
        self.fast_fail
    }

    /// Address byte with the write direction bit
    pub(crate) fn address_byte(&self) -> u8 {
        self.address << 1
    }

    pub(crate) fn next_prefix_byte(&mut self) -> Option<u8> {
        let byte = *self.prefix.get(self.sent)?;
        self.sent += 1;
        Some(byte)
    }

    pub(crate) fn next_data_byte(&mut self) -> Option<u8> {
        let index = self.sent.checked_sub(self.prefix.len())?;
        let byte = *self.data.get(index)?;
        self.sent += 1;
        Some(byte)
    }

    pub(crate) fn prefix_done(&self) -> bool {
        self.sent >= self.prefix.len()
    }

    pub(crate) fn data_done(&self) -> bool {
        self.sent >= self.prefix.len() + self.data.len()
    }

    pub(crate) fn take_completion(&mut self) -> Option<Completion<'a>> {
        self.completion.take()
    }
}
