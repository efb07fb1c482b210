//! SSD1306 OLED display driver.
//!
//! Driver for 128x64 SSD1306 panels over I2C, rendering 6x8 text into a
//! page-organized framebuffer. Uses the blocking I2C interface because the
//! flush runs inside the FIFO interrupt handler.

use dyad_core::traits::{DisplayError, TextPanel};
use embedded_hal::i2c::I2c;

use crate::font;

/// SSD1306 I2C address
const SSD1306_ADDR: u8 = 0x3C;

const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_ENTIRE_ON: u8 = 0xA4;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_MEM_MODE: u8 = 0x20;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SSD1306 driver with a local framebuffer
pub struct Oled<I2C> {
    i2c: I2C,
    /// 1 bit per pixel, organized as 8 pages of 128 column bytes
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C> Oled<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Initialize the panel
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE | 0x00,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEM_MODE,
            0x02,                  // Page addressing
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_ENTIRE_ON,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(SSD1306_ADDR, &[0x00, cmd])
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let mask = 1 << (y % 8);
        if on {
            self.buffer[y / 8][x] |= mask;
        } else {
            self.buffer[y / 8][x] &= !mask;
        }
    }

    fn send_frame(&mut self) -> Result<(), I2C::Error> {
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8)?;
            self.command(cmd::SET_LOW_COLUMN)?;
            self.command(cmd::SET_HIGH_COLUMN)?;

            // 0x40 control byte, then one page of column data
            let mut chunk = [0u8; WIDTH + 1];
            chunk[0] = 0x40;
            chunk[1..].copy_from_slice(&self.buffer[page]);
            self.i2c.write(SSD1306_ADDR, &chunk)?;
        }
        Ok(())
    }
}

impl<I2C> TextPanel for Oled<I2C>
where
    I2C: I2c,
{
    fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        for page in self.buffer.iter_mut() {
            page.fill(value);
        }
    }

    fn draw_text(&mut self, x: u8, y: u8, text: &str) {
        let mut col = x as usize;
        for ch in text.chars() {
            if col + font::GLYPH_WIDTH > WIDTH {
                break;
            }
            let glyph = font::get_glyph(ch);
            for (dx, column) in glyph.iter().enumerate() {
                for dy in 0..8 {
                    if column & (1 << dy) != 0 {
                        self.set_pixel(col + dx, y as usize + dy, true);
                    }
                }
            }
            col += font::GLYPH_WIDTH;
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.send_frame().map_err(|_| DisplayError::Bus)
    }
}
