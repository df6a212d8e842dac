//! Page refresh sequencer
//!
//! A refresh is a chain of transactions linked by their completions:
//!
//! ```text
//!  refresh ─▶ select page 0 ─done─▶ transfer page 0 ─done─┐
//!          ┌──────────────────────────────────────────────┘
//!          └▶ select page 1 ─done─▶ transfer page 1 ─done─▶ ... ─▶ unlock
//! ```
//!
//! Page bytes are copied out of the frame buffer when each transfer is
//! submitted, so drawing between refreshes never tears a page in flight.

use oledlink_hal::TwiController;
use oledlink_protocol::{select_page, DATA_PREFIX};
use portable_atomic::Ordering;

use super::{Display, SELECT_PAGE, TRANSFER_PAGE};
use crate::bus::Transaction;
use crate::error::Error;

impl<'a, T: TwiController + Send> Display<'a, T> {
    /// Send the whole frame buffer, waiting for the lock first
    ///
    /// Returns as soon as the first transaction is accepted. The lock stays
    /// held until the last page has been transferred.
    pub fn refresh(&'a self) -> Result<(), Error> {
        self.lock.spin_acquire();
        self.cursor.store(0, Ordering::Relaxed);
        match self.select_request(0) {
            Ok(tx) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("refresh: {} pages", self.pages);
                self.bus.submit_spinning(tx);
                Ok(())
            }
            Err(err) => {
                self.lock.release();
                Err(err)
            }
        }
    }

    /// Send the whole frame buffer unless the display or bus is busy
    pub fn try_refresh(&'a self) -> Result<(), Error> {
        self.lock.try_acquire()?;
        self.cursor.store(0, Ordering::Relaxed);
        match self.select_request(0) {
            Ok(tx) => self.start_locked(tx.with_fast_fail(true)),
            Err(err) => {
                self.lock.release();
                Err(err)
            }
        }
    }

    /// Select-page completion: transfer the page at the cursor
    pub(super) fn page_selected(&'a self) {
        let page = self.cursor.load(Ordering::Relaxed);
        match self.transfer_request(page) {
            Ok(tx) => {
                self.cursor.store(page + 1, Ordering::Relaxed);
                self.bus.submit_spinning(tx);
            }
            Err(_err) => self.abort_refresh(),
        }
    }

    /// Transfer completion: select the next page or finish
    pub(super) fn page_transferred(&'a self) {
        let next = self.cursor.load(Ordering::Relaxed);
        if next >= self.pages {
            #[cfg(feature = "defmt")]
            defmt::trace!("refresh complete");
            self.lock.release();
            return;
        }
        match self.select_request(next) {
            Ok(tx) => {
                self.bus.submit_spinning(tx);
            }
            Err(_err) => self.abort_refresh(),
        }
    }

    fn abort_refresh(&self) {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "refresh aborted at page {}",
            self.cursor.load(Ordering::Relaxed)
        );
        self.lock.release();
    }

    fn select_request(&'a self, page: u8) -> Result<Transaction<'a>, Error> {
        Ok(Transaction::command(self.config.address, &select_page(page))?
            .with_completion(self, SELECT_PAGE))
    }

    fn transfer_request(&'a self, page: u8) -> Result<Transaction<'a>, Error> {
        let frame = self.frame.try_lock().map_err(|_| Error::Busy)?;
        let bytes = frame.page(page).ok_or(Error::Bounds)?;
        let tx = Transaction::new(self.config.address, &DATA_PREFIX, bytes)?;
        Ok(tx.with_completion(self, TRANSFER_PAGE))
    }
}
