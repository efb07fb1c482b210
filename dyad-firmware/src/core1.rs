//! Consumer core: display ownership, FIFO interrupt, indicator loop.
//!
//! The panel and the drainer live in one interrupt-owned cell: the FIFO
//! handler is their sole accessor once armed. The core's main loop is just
//! the indicator blinker, preempted by the handler whenever the channel
//! goes non-empty.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use defmt::*;
use embassy_executor::Executor;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::interrupt;
use embassy_rp::peripherals::I2C1;
use embassy_time::{block_for, Duration};
use static_cell::StaticCell;

use dyad_core::drain::Drainer;
use dyad_core::traits::{TextPanel, WordFifo};

use crate::fifo::{self, SioFifo};
use crate::oled::Oled;
use crate::tasks;

type DisplayBus = I2c<'static, I2C1, Blocking>;

/// Set once core 1 has armed its FIFO interrupt. The producer must not
/// push before this goes true: a push into an unarmed core would sit in
/// the FIFO with nobody notified until arming happens to catch up.
pub static CORE1_READY: AtomicBool = AtomicBool::new(false);

/// Everything the FIFO handler owns. Held in the cell between wakes; the
/// handler takes it out, works with the cross-core lock released, and puts
/// it back before returning.
struct ConsumerState {
    panel: Oled<DisplayBus>,
    drainer: Drainer,
}

static STATE: Mutex<RefCell<Option<ConsumerState>>> = Mutex::new(RefCell::new(None));
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

/// Core 1 entry: bring up the panel, arm the interrupt, blink forever
pub fn run(i2c: DisplayBus, ok_led: Output<'static>, fault_led: Output<'static>) -> ! {
    info!("dyad core 1 starting");

    let mut panel = Oled::new(i2c);
    match panel.init() {
        Ok(()) => info!("display initialized"),
        // A dead panel is not fatal to the channel: keep draining so the
        // producer is never wedged against a full FIFO
        Err(_) => warn!("display init failed, running headless"),
    }

    panel.fill(false);
    panel.draw_text(10, 20, "DYAD READY");
    let _ = panel.flush();
    block_for(Duration::from_millis(1500));

    // Hand the handler its state before arming it
    critical_section::with(|cs| {
        STATE.borrow_ref_mut(cs).replace(ConsumerState {
            panel,
            drainer: Drainer::new(),
        });
    });
    fifo::arm_consumer_irq();
    CORE1_READY.store(true, Ordering::Release);
    info!("fifo interrupt armed");

    let executor1 = EXECUTOR1.init(Executor::new());
    executor1.run(|spawner| {
        spawner
            .spawn(tasks::indicator_task(ok_led, fault_led))
            .unwrap();
    })
}

/// Fires while core 1's read FIFO is non-empty. Drains to empty, rendering
/// every complete message, then re-arms via the sticky-flag clear.
///
/// The critical sections here only move the state in and out of its cell.
/// The drain itself, with its blocking I2C flush per message, runs with the
/// cross-core spinlock released: holding it across the bus traffic would
/// spin core 0's time driver and executor behind a display transfer. The
/// handler cannot preempt itself, so the empty cell is unobservable.
#[interrupt]
fn SIO_IRQ_PROC1() {
    let taken = critical_section::with(|cs| STATE.borrow_ref_mut(cs).take());

    let Some(mut state) = taken else {
        // Not initialized: discard so the interrupt deasserts
        let mut fifo = SioFifo;
        while fifo.try_pop().is_some() {}
        fifo.clear_pending_signal();
        return;
    };

    let stats = state.drainer.drain(&mut SioFifo, &mut state.panel);
    if stats.decode_errors > 0 || stats.display_errors > 0 {
        warn!(
            "drain: {} messages, {} decode errors, {} display errors",
            stats.messages, stats.decode_errors, stats.display_errors
        );
    } else {
        trace!("drain: {} messages", stats.messages);
    }

    critical_section::with(|cs| {
        STATE.borrow_ref_mut(cs).replace(state);
    });
}
