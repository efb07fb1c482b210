//! Display sink contract.
//!
//! Renderers always issue the same call protocol per update: one `fill`,
//! any number of `draw_text` calls at fixed pixel coordinates, one `flush`.
//! Partial updates do not exist; the flush is the dominant latency cost on
//! the consumer core.

/// Errors that can occur with the display sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// I2C transaction with the panel failed
    Bus,
}

/// A text-capable framebuffer panel
pub trait TextPanel {
    /// Fill the whole framebuffer with on or off pixels
    fn fill(&mut self, on: bool);

    /// Draw a text run with its top-left corner at pixel (`x`, `y`).
    /// Text past the right edge is clipped, not wrapped.
    fn draw_text(&mut self, x: u8, y: u8, text: &str);

    /// Push the framebuffer to the physical panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}
