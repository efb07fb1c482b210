//! RP2040 SIO inter-core FIFO.
//!
//! The SIO block gives each core a write port into the other core's 8-deep
//! read FIFO, plus a status register with valid/ready bits and sticky
//! overflow/underflow flags. The interrupt line for a core asserts while
//! its read FIFO is non-empty; clearing the sticky flags after draining to
//! empty re-arms it for the next push.

use dyad_core::traits::WordFifo;
use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::pac;

/// The calling core's view of the FIFO pair.
///
/// Zero-sized: the SIO registers are banked per core, so the same type
/// serves the producer on core 0 and the consumer on core 1.
pub struct SioFifo;

impl WordFifo for SioFifo {
    fn try_push(&mut self, word: u32) -> bool {
        let sio = pac::SIO;
        if !sio.fifo_st().read().rdy() {
            return false;
        }
        sio.fifo_wr().write_value(word);
        // Wake the other core in case it is parked in WFE
        cortex_m::asm::sev();
        true
    }

    fn try_pop(&mut self) -> Option<u32> {
        let sio = pac::SIO;
        if sio.fifo_st().read().vld() {
            Some(sio.fifo_rd().read())
        } else {
            None
        }
    }

    fn has_pending(&self) -> bool {
        pac::SIO.fifo_st().read().vld()
    }

    fn clear_pending_signal(&mut self) {
        // Write-clear the sticky overflow/underflow flags, as the SDK's
        // multicore_fifo_clear_irq() does
        pac::SIO.fifo_st().write(|w| {
            w.set_roe(true);
            w.set_wof(true);
        });
    }
}

/// Arm the consumer core's FIFO interrupt.
///
/// Must run on core 1, after the display is ready to be driven from the
/// handler and before the producer's first push - the composition root
/// upholds that ordering through [`crate::core1::CORE1_READY`].
pub fn arm_consumer_irq() {
    SioFifo.clear_pending_signal();
    interrupt::SIO_IRQ_PROC1.unpend();
    unsafe { interrupt::SIO_IRQ_PROC1.enable() };
}
