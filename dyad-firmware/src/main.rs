//! Dyad - Dual-core environmental monitor firmware
//!
//! Core 0 samples the environment (ADC channel 0 plus an AHT20/BMP280 pair
//! on I2C0) and pushes encoded measurements through the SIO inter-core
//! FIFO. Core 1 owns the SSD1306 panel on I2C1: a FIFO interrupt drains
//! and renders incoming messages while the core's main loop blinks the RGB
//! health indicator off a shared atomic flag.
//!
//! Board wiring follows the BitDogLab pinout: button B on GPIO6 re-enters
//! the USB mass-storage bootloader, ADC input on GPIO26, OLED on
//! GPIO14/15, indicator LEDs on GPIO11 (ok) and GPIO13 (fault).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Executor;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::I2C0;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dyad_core::health::HealthFlag;

mod core1;
mod fifo;
mod font;
mod oled;
mod sensors;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// Sensor health published by the producer core, observed by the consumer
/// core's indicator loop. Lives outside the message channel on purpose:
/// the indicator must keep blinking even when no message arrives.
pub static HEALTH: HealthFlag = HealthFlag::new();

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("dyad core 0 starting");

    let p = embassy_rp::init(Default::default());

    // Everything the consumer core owns is created here and moved across:
    // the display bus (blocking - the flush runs in interrupt context) and
    // the two indicator LEDs.
    let display_i2c = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c::Config::default());
    let ok_led = Output::new(p.PIN_11, Level::Low);
    let fault_led = Output::new(p.PIN_13, Level::Low);

    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || core1::run(display_i2c, ok_led, fault_led),
    );
    info!("core 1 launched");

    // Producer-side peripherals stay on core 0
    let sensor_i2c = I2c::new_async(p.I2C0, p.PIN_1, p.PIN_0, Irqs, i2c::Config::default());
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let adc_pin = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let bootsel_button = Input::new(p.PIN_6, Pull::Up);

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        spawner
            .spawn(tasks::producer_task(adc, adc_pin, sensor_i2c))
            .unwrap();
        spawner.spawn(tasks::bootsel_task(bootsel_button)).unwrap();
    })
}
