//! Word-level encoding and decoding.
//!
//! The encoder turns a [`Message`] into a short run of 32-bit words; the
//! decoder is a resynchronizing state machine fed one word at a time, in the
//! order the FIFO delivers them. Report bursts carry a wrapping sequence
//! number so the consumer can tell when a burst went missing, and an XOR
//! checksum so a desynchronized stream is caught rather than decoded into
//! garbage readings.

use heapless::Vec;

use crate::message::{
    Message, ADC_MAX_COUNT, MAX_MESSAGE_WORDS, REPORT_PAYLOAD_WORDS, TAG_ADC, TAG_REPORT,
    TAG_SHIFT,
};
#[cfg(test)]
use crate::message::REPORT_BURST_WORDS;
use crate::report::SensorReport;

/// Errors that can occur while decoding the word stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Word carried a tag this build does not understand
    UnknownTag,
    /// Tagged word had bits set outside its defined fields
    InvalidWord,
    /// Report burst checksum mismatch; the burst is discarded
    InvalidChecksum,
}

/// Stateful encoder for the producer side.
///
/// Holds the report sequence counter; scalar samples are unsequenced.
#[derive(Debug, Clone)]
pub struct WordEncoder {
    next_seq: u8,
}

impl Default for WordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl WordEncoder {
    /// Create an encoder with the sequence counter at zero
    pub const fn new() -> Self {
        Self { next_seq: 0 }
    }

    /// Encode `message` into `out`, replacing any previous contents.
    ///
    /// The words must be pushed onto the FIFO in order, without interleaving
    /// other messages. `out` has capacity for the largest burst, so encoding
    /// cannot fail.
    pub fn encode_into(&mut self, message: &Message, out: &mut Vec<u32, MAX_MESSAGE_WORDS>) {
        out.clear();
        match message {
            Message::AdcRaw(raw) => {
                let raw = (*raw).min(ADC_MAX_COUNT) as u32;
                let _ = out.push((TAG_ADC << TAG_SHIFT) | raw);
            }
            Message::Report(report) => {
                let seq = self.next_seq;
                self.next_seq = self.next_seq.wrapping_add(1);

                let header = (TAG_REPORT << TAG_SHIFT)
                    | ((REPORT_PAYLOAD_WORDS as u32) << 16)
                    | ((seq as u32) << 8)
                    | (report.sensors_ok as u32);
                let payload = [
                    report.temperature_c.to_bits(),
                    report.humidity_rh.to_bits(),
                    report.pressure_kpa.to_bits(),
                ];
                let checksum = payload.iter().fold(header, |acc, w| acc ^ w);

                let _ = out.push(header);
                for word in payload {
                    let _ = out.push(word);
                }
                let _ = out.push(checksum);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a tagged word
    Idle,
    /// Collecting report payload words
    Payload,
    /// Waiting for the burst checksum
    Checksum,
}

/// Stateful decoder for the consumer side.
///
/// State persists across drain passes: the consumer interrupt can fire after
/// the header word of a burst has been pushed but before its payload, so a
/// single burst may span two wakes.
#[derive(Debug, Clone)]
pub struct WordDecoder {
    state: DecodeState,
    header: u32,
    payload: Vec<u32, REPORT_PAYLOAD_WORDS>,
    last_seq: Option<u8>,
    missed_reports: u32,
}

impl Default for WordDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl WordDecoder {
    /// Create a decoder waiting for its first tagged word
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            header: 0,
            payload: Vec::new(),
            last_seq: None,
            missed_reports: 0,
        }
    }

    /// Drop any partially collected burst and resynchronize on the next
    /// tagged word
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.header = 0;
        self.payload.clear();
    }

    /// Report bursts observed missing via sequence-number gaps.
    ///
    /// The FIFO itself never drops words, so a nonzero count points at a
    /// producer restart or a decoder resynchronization.
    pub fn missed_reports(&self) -> u32 {
        self.missed_reports
    }

    /// Feed one word from the FIFO.
    ///
    /// Returns `Ok(Some(message))` when a complete message is decoded,
    /// `Ok(None)` when more words are needed, or `Err` on a protocol
    /// violation (the decoder resynchronizes itself).
    pub fn feed(&mut self, word: u32) -> Result<Option<Message>, DecodeError> {
        match self.state {
            DecodeState::Idle => match word >> TAG_SHIFT {
                TAG_ADC => {
                    if word & 0x0FFF_F000 != 0 {
                        return Err(DecodeError::InvalidWord);
                    }
                    Ok(Some(Message::AdcRaw((word & 0x0FFF) as u16)))
                }
                TAG_REPORT => {
                    // Reserved bits 27:24 and 7:1 must be clear, same
                    // strictness as the scalar word: a corrupted header is
                    // cheaper to reject here than at the checksum
                    if word & 0x0F00_00FE != 0 {
                        return Err(DecodeError::InvalidWord);
                    }
                    let count = (word >> 16) as usize & 0xFF;
                    if count != REPORT_PAYLOAD_WORDS {
                        return Err(DecodeError::InvalidWord);
                    }
                    self.header = word;
                    self.payload.clear();
                    self.state = DecodeState::Payload;
                    Ok(None)
                }
                _ => Err(DecodeError::UnknownTag),
            },
            DecodeState::Payload => {
                // Cannot overflow: capacity equals the declared payload size
                let _ = self.payload.push(word);
                if self.payload.is_full() {
                    self.state = DecodeState::Checksum;
                }
                Ok(None)
            }
            DecodeState::Checksum => {
                let expected = self.payload.iter().fold(self.header, |acc, w| acc ^ w);
                if word != expected {
                    self.reset();
                    return Err(DecodeError::InvalidChecksum);
                }

                let seq = (self.header >> 8) as u8;
                if let Some(prev) = self.last_seq {
                    self.missed_reports += u32::from(seq.wrapping_sub(prev).wrapping_sub(1));
                }
                self.last_seq = Some(seq);

                let report = SensorReport {
                    temperature_c: f32::from_bits(self.payload[0]),
                    humidity_rh: f32::from_bits(self.payload[1]),
                    pressure_kpa: f32::from_bits(self.payload[2]),
                    sensors_ok: self.header & 1 != 0,
                };

                self.reset();
                Ok(Some(Message::Report(report)))
            }
        }
    }
}
