//! Health indicator loop on core 1.
//!
//! Blinks exactly one of the two LED channels, selected from the shared
//! health flag. The flag is sampled once per full blink cycle, so a flip
//! mid-cycle takes effect at the next cycle boundary and the blink phase
//! never glitches.

use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use dyad_core::health::{Indicator, BLINK_PHASE_MS};

use crate::HEALTH;

#[embassy_executor::task]
pub async fn indicator_task(mut ok_led: Output<'static>, mut fault_led: Output<'static>) {
    let mut ticker = Ticker::every(Duration::from_millis(BLINK_PHASE_MS));

    loop {
        let led = match Indicator::for_health(HEALTH.load()) {
            Indicator::Ok => {
                fault_led.set_low();
                &mut ok_led
            }
            Indicator::Fault => {
                ok_led.set_low();
                &mut fault_led
            }
        };

        led.set_high();
        ticker.next().await;
        led.set_low();
        ticker.next().await;
    }
}
