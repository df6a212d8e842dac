//! Display refresh, brightness and locking against the simulated controller

mod common;

use common::{new_bus, settle, settle_deferred, wire};
use oledlink_core::{CompletionQueue, Display, DisplayConfig, Error};
use oledlink_hal::sim::WireTransaction;
use oledlink_protocol::{decode, BRINGUP_SEQUENCE};
use oledlink_raster::DrawParams;
use portable_atomic::{AtomicBool, Ordering};
use proptest::prelude::*;

/// Wire transactions after bring-up, as (selected page, data) pairs
fn page_writes(txs: &[WireTransaction]) -> Vec<(u8, Vec<u8>)> {
    txs.chunks(2)
        .map(|pair| {
            let page = decode(&pair[0].bytes)
                .unwrap()
                .selected_page()
                .expect("select-page expected");
            let data = decode(&pair[1].bytes)
                .unwrap()
                .data()
                .expect("page data expected")
                .to_vec();
            (page, data)
        })
        .collect()
}

#[test]
fn test_full_white_128x64() {
    let bus = new_bus();
    let mut buf = [0u8; 1024];
    let display = Display::new(&bus, DisplayConfig::SSD1306_128X64, &mut buf).unwrap();
    settle(&bus);

    display
        .draw(|fb| fb.rectangle(0, 0, 127, 63, DrawParams::FILL | DrawParams::ON))
        .unwrap()
        .unwrap();
    display.refresh().unwrap();
    settle(&bus);
    assert!(!display.is_busy());

    let txs = wire(&bus);
    assert_eq!(txs[0].bytes, BRINGUP_SEQUENCE);
    let writes = page_writes(&txs[1..]);
    assert_eq!(writes.len(), 8);
    for (expected, (page, data)) in writes.iter().enumerate() {
        assert_eq!(usize::from(*page), expected);
        assert_eq!(data.len(), 128);
        assert!(data.iter().all(|&b| b == 0xFF));
    }
    assert!(txs.iter().all(|t| t.address == 0x3C && t.stopped));
}

#[test]
fn test_refresh_sends_buffer_contents() {
    let bus = new_bus();
    let mut buf = [0u8; 512];
    let display = Display::new(&bus, DisplayConfig::SSD1306_128X32, &mut buf).unwrap();
    settle(&bus);

    display
        .draw(|fb| {
            fb.line(0, 0, 127, 31, DrawParams::ON)?;
            fb.circle(64, 16, 10, DrawParams::ON)
        })
        .unwrap()
        .unwrap();
    display.refresh().unwrap();
    settle(&bus);

    let writes = page_writes(&wire(&bus)[1..]);
    assert_eq!(writes.len(), 4);
    for (page, data) in writes {
        let expected = display.inspect(|fb| fb.page(page).unwrap().to_vec()).unwrap();
        assert_eq!(data, expected);
    }
}

#[test]
fn test_brightness_waits_for_refresh() {
    let bus = new_bus();
    let mut buf = [0u8; 1024];
    let display = Display::new(&bus, DisplayConfig::default(), &mut buf).unwrap();
    settle(&bus);
    bus.with_controller(|twi| twi.clear());

    display.refresh().unwrap();

    // keep asking while the refresh is on the wire
    let mut rejected = 0;
    while display.is_busy() {
        assert_eq!(display.try_set_brightness(128), Err(Error::Busy));
        rejected += 1;
        bus.on_interrupt();
    }
    assert!(rejected > 0);

    display.try_set_brightness(128).unwrap();
    settle(&bus);
    assert!(!display.is_busy());

    let txs = wire(&bus);
    assert_eq!(txs.len(), 17);
    assert_eq!(page_writes(&txs[..16]).len(), 8);
    assert_eq!(decode(&txs[16].bytes).unwrap().brightness(), Some(128));
}

#[test]
fn test_second_refresh_rejected_until_first_finishes() {
    let bus = new_bus();
    let mut buf = [0u8; 512];
    let display = Display::new(&bus, DisplayConfig::SSD1306_128X32, &mut buf).unwrap();
    settle(&bus);

    display.refresh().unwrap();
    assert_eq!(display.try_refresh(), Err(Error::Busy));
    assert_eq!(display.try_draw(|fb| fb.clear()), Err(Error::Busy));
    settle(&bus);

    display.try_refresh().unwrap();
    settle(&bus);
    // bring-up plus two refreshes of four pages
    assert_eq!(wire(&bus).len(), 1 + 2 * 8);
}

#[test]
fn test_deferred_refresh() {
    let bus = new_bus();
    let mut buf = [0u8; 512];
    let display = Display::new(&bus, DisplayConfig::SSD1306_128X32, &mut buf).unwrap();
    let queue: CompletionQueue<'_> = CompletionQueue::new();
    settle_deferred(&bus, &queue);

    display.draw(|fb| fb.fill(true)).unwrap();
    display.refresh().unwrap();
    settle_deferred(&bus, &queue);
    assert!(!display.is_busy());

    let writes = page_writes(&wire(&bus)[1..]);
    let pages: Vec<u8> = writes.iter().map(|(page, _)| *page).collect();
    assert_eq!(pages, [0, 1, 2, 3]);
    assert!(writes.iter().all(|(_, data)| data == &vec![0xFF; 128]));
}

#[test]
fn test_refresh_driven_from_another_thread() {
    let bus = new_bus();
    let mut buf = [0u8; 512];
    let display = Display::new(&bus, DisplayConfig::SSD1306_128X32, &mut buf).unwrap();
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        // stands in for the bus interrupt handler
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                if bus.is_idle() {
                    std::thread::yield_now();
                } else {
                    bus.on_interrupt();
                }
            }
        });

        display.draw(|fb| fb.fill(true)).unwrap();
        display.refresh().unwrap();
        // spins until the refresh chain releases the lock
        display.set_brightness(0x7F).unwrap();
        while display.is_busy() || !bus.is_idle() {
            std::thread::yield_now();
        }
        done.store(true, Ordering::Release);
    });

    let txs = wire(&bus);
    assert_eq!(txs[0].bytes, BRINGUP_SEQUENCE);
    let writes = page_writes(&txs[1..9]);
    let pages: Vec<u8> = writes.iter().map(|(page, _)| *page).collect();
    assert_eq!(pages, [0, 1, 2, 3]);
    assert!(writes.iter().all(|(_, data)| data == &vec![0xFF; 128]));
    assert_eq!(decode(&txs[9].bytes).unwrap().brightness(), Some(0x7F));
    assert_eq!(txs.len(), 10);
}

#[test]
fn test_odd_height_rounds_pages_up() {
    let bus = new_bus();
    let mut buf = [0u8; 3 * 32];
    let display = Display::new(&bus, DisplayConfig::new(32, 20, 0x3D), &mut buf).unwrap();
    settle(&bus);
    assert_eq!(display.page_count(), 3);

    display.refresh().unwrap();
    settle(&bus);
    let txs = wire(&bus);
    assert!(txs.iter().all(|t| t.address == 0x3D));
    let writes = page_writes(&txs[1..]);
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|(_, data)| data.len() == 32));
}

#[test]
fn test_invalid_config_rejected() {
    let bus = new_bus();
    let mut buf = [0u8; 1024];
    let result = Display::new(&bus, DisplayConfig::new(128, 64, 0x90), &mut buf);
    assert_eq!(result.err(), Some(Error::InvalidParameter));
    assert!(bus.is_idle());
}

proptest! {
    #[test]
    fn refresh_writes_every_page_once_in_order(
        width in 1u8..=64,
        height in 1u8..=64,
        seed: u64,
    ) {
        let bus = new_bus();
        let config = DisplayConfig::new(width, height, 0x3C);
        let mut buf = vec![0u8; config.buffer_len()];
        let display = Display::new(&bus, config, &mut buf).unwrap();
        settle(&bus);

        display.draw(|fb| {
            for x in 0..width {
                for y in 0..height {
                    let bit = (seed >> ((u32::from(x) * 7 + u32::from(y)) % 64)) & 1;
                    fb.set_pixel(x, y, bit == 1).unwrap();
                }
            }
        }).unwrap();
        display.refresh().unwrap();
        settle(&bus);
        prop_assert!(!display.is_busy());

        let writes = page_writes(&wire(&bus)[1..]);
        prop_assert_eq!(writes.len(), usize::from(config.pages()));
        for (index, (page, data)) in writes.iter().enumerate() {
            prop_assert_eq!(usize::from(*page), index);
            let expected = display.inspect(|fb| fb.page(*page).unwrap().to_vec()).unwrap();
            prop_assert_eq!(data, &expected);
        }
    }
}
