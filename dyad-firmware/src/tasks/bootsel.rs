//! Bootloader re-entry button.
//!
//! Pressing button B drops the board back into the USB mass-storage
//! bootloader, so reflashing never needs the BOOTSEL-while-plugging dance.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

/// Debounce window after the falling edge
const DEBOUNCE_MS: u64 = 30;

#[embassy_executor::task]
pub async fn bootsel_task(mut button: Input<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_low() {
            break;
        }
    }

    info!("button B pressed, rebooting to bootloader");
    embassy_rp::rom_data::reset_to_usb_boot(0, 0);
    loop {
        cortex_m::asm::wfe();
    }
}
