//! Inter-core word channel contract.
//!
//! Models the RP2040 SIO FIFO: word-sized slots, bounded depth, strict FIFO
//! order, and an edge-triggered "became non-empty" notification on the
//! consumer side. The channel never drops a word; a full channel pushes the
//! cost back onto the producer instead.

/// Hardware FIFO depth on the RP2040 (words, per direction)
pub const FIFO_DEPTH: usize = 8;

/// One direction of the inter-core channel.
///
/// Exactly one execution context may push and exactly one may pop; the
/// implementations rely on that single-producer/single-consumer split.
pub trait WordFifo {
    /// Enqueue `word` if a slot is free. Returns false when the channel is
    /// full; the word is then NOT enqueued.
    fn try_push(&mut self, word: u32) -> bool;

    /// Dequeue the oldest word, or `None` when the channel is empty.
    /// Never blocks.
    fn try_pop(&mut self) -> Option<u32>;

    /// True while at least one word is waiting. Drives the consumer's drain
    /// loop; never blocks.
    fn has_pending(&self) -> bool;

    /// Acknowledge the "became non-empty" notification, re-arming it for
    /// the next empty-to-nonempty transition.
    ///
    /// Must be called after draining to empty: the notification is
    /// edge-triggered, so a burst of pushes raises it once and the handler
    /// has to drain every pending word before re-arming.
    fn clear_pending_signal(&mut self);

    /// Enqueue `word`, spinning until a slot frees up.
    ///
    /// This is the only backpressure mechanism in the system: a stalled
    /// consumer stalls the producer here, indefinitely, rather than losing
    /// a message. There is no timeout.
    fn push_blocking(&mut self, word: u32) {
        while !self.try_push(word) {
            core::hint::spin_loop();
        }
    }
}
