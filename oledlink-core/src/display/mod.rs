//! SSD1306 display driver
//!
//! A [`Display`] borrows the bus and a caller-owned frame buffer. Drawing
//! happens in memory through the rasterizer; [`Display::refresh`] then
//! streams the buffer to the panel page by page while the caller carries on.
//!
//! # Locking
//!
//! Refresh, brightness changes and drawing each take the display's
//! [`BusyLock`]. Refresh and brightness release it from their final
//! transaction completion, so the lock stays held while bytes are still on
//! the wire. The blocking variants spin on the lock; the `try_` variants
//! return [`Error::Busy`] instead.
//!
//! Completions arrive in interrupt context, so the page cursor is atomic
//! and the frame buffer sits behind an `embassy-sync` mutex. A `Display`
//! over a `Send` controller is `Sync` and can live in a `static`.

mod refresh;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use oledlink_hal::TwiController;
use oledlink_protocol::{brightness, BRINGUP_SEQUENCE};
use oledlink_raster::FrameBuffer;
use portable_atomic::AtomicU8;

use crate::bus::{Bus, Token, Transaction, TransactionClient};
use crate::config::DisplayConfig;
use crate::error::Error;
use crate::lock::BusyLock;

/// Completion tokens, one per kind of transaction the display sends
const BRIGHTNESS: Token = Token::new(0);
const SELECT_PAGE: Token = Token::new(1);
const TRANSFER_PAGE: Token = Token::new(2);

/// One physical panel on the bus
pub struct Display<'a, T> {
    bus: &'a Bus<'a, T>,
    config: DisplayConfig,
    pages: u8,
    /// Next page to transfer; only meaningful while a refresh holds the lock
    cursor: AtomicU8,
    lock: BusyLock,
    frame: Mutex<CriticalSectionRawMutex, FrameBuffer<'a>>,
}

impl<'a, T: TwiController + Send> Display<'a, T> {
    /// Bind a panel to `bus` and schedule its bring-up sequence
    ///
    /// `buffer` must hold at least [`DisplayConfig::buffer_len`] bytes.
    /// Bring-up is submitted fast-fail with no completion; if the bus is
    /// busy this returns [`Error::Busy`] and nothing is sent.
    pub fn new(
        bus: &'a Bus<'a, T>,
        config: DisplayConfig,
        buffer: &'a mut [u8],
    ) -> Result<Self, Error> {
        config.validate()?;
        let frame = FrameBuffer::new(config.width, config.height, buffer)?;

        let bringup = Transaction::command(config.address, &BRINGUP_SEQUENCE)?.with_fast_fail(true);
        bus.submit(bringup).map_err(|_| Error::Busy)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "display {=u8:#x}: {}x{}, bring-up scheduled",
            config.address,
            config.width,
            config.height
        );

        Ok(Self {
            bus,
            config,
            pages: config.pages(),
            cursor: AtomicU8::new(0),
            lock: BusyLock::new(),
            frame: Mutex::new(frame),
        })
    }

    /// Set panel contrast, waiting for the lock
    ///
    /// Returns once the command is accepted; the lock is released when it
    /// has been sent.
    pub fn set_brightness(&'a self, level: u8) -> Result<(), Error> {
        let tx = self.brightness_request(level)?;
        self.lock.spin_acquire();
        self.bus.submit_spinning(tx);
        Ok(())
    }

    /// Set panel contrast unless the display or bus is busy
    pub fn try_set_brightness(&'a self, level: u8) -> Result<(), Error> {
        let tx = self.brightness_request(level)?.with_fast_fail(true);
        self.lock.try_acquire()?;
        self.start_locked(tx)
    }

    /// Run `f` on the frame buffer, waiting for the lock
    pub fn draw<R>(&self, f: impl FnOnce(&mut FrameBuffer<'a>) -> R) -> Result<R, Error> {
        self.lock.spin_acquire();
        let result = self.with_frame(f);
        self.lock.release();
        result
    }

    /// Run `f` on the frame buffer unless another operation holds the lock
    pub fn try_draw<R>(&self, f: impl FnOnce(&mut FrameBuffer<'a>) -> R) -> Result<R, Error> {
        self.lock.try_acquire()?;
        let result = self.with_frame(f);
        self.lock.release();
        result
    }

    /// Read the frame buffer without taking the lock
    pub fn inspect<R>(&self, f: impl FnOnce(&FrameBuffer<'a>) -> R) -> Result<R, Error> {
        let frame = self.frame.try_lock().map_err(|_| Error::Busy)?;
        Ok(f(&frame))
    }

    /// Panel width in pixels
    pub fn width(&self) -> u8 {
        self.config.width
    }

    pub fn height(&self) -> u8 {
        self.config.height
    }

    /// Number of 8-row pages a refresh transfers
    pub fn page_count(&self) -> u8 {
        self.pages
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Whether a refresh, brightness change or draw holds the lock
    pub fn is_busy(&self) -> bool {
        self.lock.is_locked()
    }

    fn brightness_request(&'a self, level: u8) -> Result<Transaction<'a>, Error> {
        Ok(Transaction::command(self.config.address, &brightness(level))?
            .with_completion(self, BRIGHTNESS))
    }

    /// Submit the first transaction of a locked operation, unlocking on rejection
    fn start_locked(&self, tx: Transaction<'a>) -> Result<(), Error> {
        match self.bus.submit(tx) {
            Ok(_) => Ok(()),
            Err(_) => {
                self.lock.release();
                Err(Error::Busy)
            }
        }
    }

    fn with_frame<R>(&self, f: impl FnOnce(&mut FrameBuffer<'a>) -> R) -> Result<R, Error> {
        let mut frame = self.frame.try_lock().map_err(|_| Error::Busy)?;
        Ok(f(&mut *frame))
    }
}

impl<'a, T: TwiController + Send> TransactionClient<'a> for Display<'a, T> {
    fn transaction_complete(&'a self, token: Token) {
        match token {
            SELECT_PAGE => self.page_selected(),
            TRANSFER_PAGE => self.page_transferred(),
            BRIGHTNESS => self.lock.release(),
            _ => {}
        }
    }
}
