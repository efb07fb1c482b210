//! Message shapes crossing the inter-core FIFO.

use crate::report::SensorReport;

/// Word tag (bits 31:28): scalar ADC sample
pub const TAG_ADC: u32 = 0x1;
/// Word tag (bits 31:28): report burst header
pub const TAG_REPORT: u32 = 0x2;

/// Bit position of the tag nibble
pub const TAG_SHIFT: u32 = 28;

/// Full-scale count of the 12-bit converter
pub const ADC_MAX_COUNT: u16 = 4095;

/// Payload words in a report burst (three f32 bit patterns)
pub const REPORT_PAYLOAD_WORDS: usize = 3;

/// Complete report burst: header + payload + checksum
pub const REPORT_BURST_WORDS: usize = REPORT_PAYLOAD_WORDS + 2;

/// Upper bound on the encoded size of any single message, in words
pub const MAX_MESSAGE_WORDS: usize = REPORT_BURST_WORDS;

/// Messages exchanged between the producer core and the consumer core
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Raw 12-bit ADC sample (0-4095); the consumer derives the voltage
    AdcRaw(u16),
    /// Full environment report, copied by value
    Report(SensorReport),
}

impl Message {
    /// Number of FIFO words this message encodes to
    pub fn word_count(&self) -> usize {
        match self {
            Message::AdcRaw(_) => 1,
            Message::Report(_) => REPORT_BURST_WORDS,
        }
    }
}
