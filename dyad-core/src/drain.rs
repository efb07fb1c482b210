//! Consumer-side drain protocol.
//!
//! Runs in interrupt context on the consumer core whenever the channel
//! signals non-empty. The notification is edge-triggered, so one wake can
//! cover any number of queued messages: the handler pops until the channel
//! reports empty, decodes as it goes, redraws the panel for every complete
//! message, and only then re-arms the notification. Exiting before empty
//! would strand words until the next push.

use dyad_protocol::{Message, WordDecoder};

use crate::render;
use crate::traits::{TextPanel, WordFifo};

/// Counters for one drain pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainStats {
    /// Complete messages decoded and rendered
    pub messages: u32,
    /// Words rejected by the decoder
    pub decode_errors: u32,
    /// Panel flushes that failed on the bus
    pub display_errors: u32,
}

/// Drives the drain loop and holds decoder state across wakes.
///
/// The decoder must live here rather than in the handler: the interrupt can
/// fire mid-burst, leaving a half-collected report to be finished on the
/// next wake.
#[derive(Debug)]
pub struct Drainer {
    decoder: WordDecoder,
}

impl Default for Drainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drainer {
    pub const fn new() -> Self {
        Self {
            decoder: WordDecoder::new(),
        }
    }

    /// Report bursts lost to sequence gaps since startup
    pub fn missed_reports(&self) -> u32 {
        self.decoder.missed_reports()
    }

    /// Drain the channel to empty, render every decoded message, and
    /// re-arm the notification.
    ///
    /// Decode errors are counted, never fatal: the decoder resynchronizes
    /// on the next tagged word. A display bus error likewise only bumps a
    /// counter - the next message redraws the whole frame anyway.
    pub fn drain<F, P>(&mut self, fifo: &mut F, panel: &mut P) -> DrainStats
    where
        F: WordFifo,
        P: TextPanel,
    {
        let mut stats = DrainStats::default();

        while fifo.has_pending() {
            let Some(word) = fifo.try_pop() else { break };
            match self.decoder.feed(word) {
                Ok(Some(message)) => {
                    stats.messages += 1;
                    let drawn = match message {
                        Message::AdcRaw(raw) => render::draw_adc(panel, raw),
                        Message::Report(report) => render::draw_report(panel, &report),
                    };
                    if drawn.is_err() {
                        stats.display_errors += 1;
                    }
                }
                Ok(None) => {}
                Err(_) => stats.decode_errors += 1,
            }
        }

        fifo.clear_pending_signal();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RecordingPanel, SimFifo};
    use dyad_protocol::{SensorReport, WordEncoder, MAX_MESSAGE_WORDS};
    use heapless::Vec;

    fn push_message(fifo: &mut SimFifo, encoder: &mut WordEncoder, message: &Message) {
        let mut words: Vec<u32, MAX_MESSAGE_WORDS> = Vec::new();
        encoder.encode_into(message, &mut words);
        for &word in &words {
            assert!(fifo.try_push(word));
        }
    }

    fn sample_report(ok: bool) -> SensorReport {
        SensorReport {
            temperature_c: 24.5,
            humidity_rh: 55.0,
            pressure_kpa: 95.0,
            sensors_ok: ok,
        }
    }

    #[test]
    fn test_single_wake_drains_whole_burst() {
        // Two scalars queued before the handler runs: one notification,
        // one drain, both rendered in order
        let mut fifo = SimFifo::new();
        let mut encoder = WordEncoder::new();
        let mut drainer = Drainer::new();
        let mut panel = RecordingPanel::new();

        push_message(&mut fifo, &mut encoder, &Message::AdcRaw(100));
        push_message(&mut fifo, &mut encoder, &Message::AdcRaw(200));
        assert!(fifo.notified());

        let stats = drainer.drain(&mut fifo, &mut panel);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.decode_errors, 0);
        assert!(!fifo.has_pending());
        assert!(!fifo.notified());
        assert_eq!(panel.flush_count(), 2);
        assert!(panel.has_text("ADC: 100"));
        assert!(panel.has_text("ADC: 200"));
    }

    #[test]
    fn test_report_renders_environment_lines() {
        let mut fifo = SimFifo::new();
        let mut encoder = WordEncoder::new();
        let mut drainer = Drainer::new();
        let mut panel = RecordingPanel::new();

        push_message(&mut fifo, &mut encoder, &Message::Report(sample_report(true)));
        let stats = drainer.drain(&mut fifo, &mut panel);

        assert_eq!(stats.messages, 1);
        assert!(panel.has_text("T: 24.5 C"));
        assert!(panel.has_text("RH: 55.0 %"));
        assert!(panel.has_text("P: 95.0 KPA"));
    }

    #[test]
    fn test_burst_split_across_two_wakes() {
        // The interrupt fires after the header lands; the payload arrives
        // before a second wake. The decoder must carry its state across.
        let mut fifo = SimFifo::new();
        let mut encoder = WordEncoder::new();
        let mut drainer = Drainer::new();
        let mut panel = RecordingPanel::new();

        let mut words: Vec<u32, MAX_MESSAGE_WORDS> = Vec::new();
        encoder.encode_into(&Message::Report(sample_report(true)), &mut words);

        assert!(fifo.try_push(words[0]));
        let stats = drainer.drain(&mut fifo, &mut panel);
        assert_eq!(stats.messages, 0);
        assert_eq!(stats.decode_errors, 0);

        for &word in &words[1..] {
            assert!(fifo.try_push(word));
        }
        let stats = drainer.drain(&mut fifo, &mut panel);
        assert_eq!(stats.messages, 1);
        assert_eq!(panel.flush_count(), 1);
    }

    #[test]
    fn test_garbage_word_is_counted_not_fatal() {
        let mut fifo = SimFifo::new();
        let mut encoder = WordEncoder::new();
        let mut drainer = Drainer::new();
        let mut panel = RecordingPanel::new();

        assert!(fifo.try_push(0xDEAD_BEEF));
        push_message(&mut fifo, &mut encoder, &Message::AdcRaw(7));

        let stats = drainer.drain(&mut fifo, &mut panel);
        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.messages, 1);
        assert!(panel.has_text("ADC: 7"));
    }

    #[test]
    fn test_state_moved_out_per_wake_keeps_decoder_state() {
        // The interrupt handler takes its drainer and panel out of a
        // shared cell, drains with the lock released, and puts them back.
        // A burst split across two such wakes must still decode: the
        // half-collected report has to survive the ownership round trip.
        let mut cell = Some((Drainer::new(), RecordingPanel::new()));
        let mut fifo = SimFifo::new();
        let mut encoder = WordEncoder::new();

        let mut words: Vec<u32, MAX_MESSAGE_WORDS> = Vec::new();
        encoder.encode_into(&Message::Report(sample_report(true)), &mut words);

        assert!(fifo.try_push(words[0]));
        let (mut drainer, mut panel) = cell.take().unwrap();
        assert_eq!(drainer.drain(&mut fifo, &mut panel).messages, 0);
        cell = Some((drainer, panel));

        for &word in &words[1..] {
            assert!(fifo.try_push(word));
        }
        let (mut drainer, mut panel) = cell.take().unwrap();
        assert_eq!(drainer.drain(&mut fifo, &mut panel).messages, 1);
        assert!(panel.has_text("T: 24.5 C"));
    }

    #[test]
    fn test_drain_on_empty_channel_is_a_no_op() {
        let mut fifo = SimFifo::new();
        let mut drainer = Drainer::new();
        let mut panel = RecordingPanel::new();

        let stats = drainer.drain(&mut fifo, &mut panel);
        assert_eq!(stats, DrainStats::default());
        assert_eq!(panel.flush_count(), 0);
    }
}
