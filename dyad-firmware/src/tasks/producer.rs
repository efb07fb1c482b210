//! Producer loop on core 0.
//!
//! Fixed 250 ms cadence: every tick reads the ADC and pushes one scalar
//! word; every fourth tick also runs a sensor cycle and pushes the encoded
//! report burst. Pushes block against FIFO backpressure, which paces the
//! producer to the consumer instead of dropping measurements.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker, Timer};
use heapless::Vec;

use dyad_core::sampler::Sampler;
use dyad_core::traits::WordFifo;
use dyad_protocol::{Message, WordEncoder, MAX_MESSAGE_WORDS};

use crate::core1::CORE1_READY;
use crate::fifo::SioFifo;
use crate::sensors::EnvSensors;
use crate::HEALTH;

/// Scalar sampling period
const ADC_PERIOD_MS: u64 = 250;
/// A report goes out every this many scalar ticks (1 Hz at 250 ms)
const REPORT_EVERY_TICKS: u32 = 4;

#[embassy_executor::task]
pub async fn producer_task(
    mut adc: Adc<'static, Async>,
    mut adc_pin: Channel<'static>,
    sensor_i2c: I2c<'static, I2C0, embassy_rp::i2c::Async>,
) {
    // Nothing may enter the channel until the consumer's interrupt is armed
    while !CORE1_READY.load(core::sync::atomic::Ordering::Acquire) {
        Timer::after_millis(10).await;
    }
    info!("producer starting");

    let mut sensors = EnvSensors::new(sensor_i2c);
    sensors.init().await;

    let mut fifo = SioFifo;
    let mut encoder = WordEncoder::new();
    let mut sampler = Sampler::new();
    let mut words: Vec<u32, MAX_MESSAGE_WORDS> = Vec::new();

    let mut ticker = Ticker::every(Duration::from_millis(ADC_PERIOD_MS));
    let mut tick: u32 = 0;

    loop {
        ticker.next().await;
        tick = tick.wrapping_add(1);

        match adc.read(&mut adc_pin).await {
            Ok(raw) => {
                trace!("adc raw {}", raw);
                encoder.encode_into(&Message::AdcRaw(raw), &mut words);
                push_all(&mut fifo, &words);
            }
            Err(_) => warn!("adc read failed"),
        }

        if tick % REPORT_EVERY_TICKS != 0 {
            continue;
        }

        let chemical = sensors.read_chemical().await;
        let barometric = sensors.read_barometric().await;
        let report = sampler.cycle(chemical, barometric);
        HEALTH.store(report.sensors_ok);

        info!(
            "report: t={} rh={} p={} ok={}",
            report.temperature_c, report.humidity_rh, report.pressure_kpa, report.sensors_ok
        );

        encoder.encode_into(&Message::Report(report), &mut words);
        push_all(&mut fifo, &words);
    }
}

/// Push an encoded message word by word, blocking on a full FIFO. The
/// longest burst is five words against an eight-deep FIFO, so a drained
/// consumer always accepts a whole message without blocking.
fn push_all(fifo: &mut SioFifo, words: &[u32]) {
    for &word in words {
        fifo.push_blocking(word);
    }
}
