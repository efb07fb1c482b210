//! AHT20 + BMP280 environmental sensor pair on the shared I2C0 bus.
//!
//! Both drivers are minimal: trigger-and-read for the AHT20, forced-free
//! continuous mode with on-chip calibration readout for the BMP280. Read
//! failures surface as `None` so the sampling policy can keep stale values
//! and clear the validity flag instead of wedging the cycle.

use defmt::*;
use embassy_time::Timer;
use embedded_hal_async::i2c::I2c;

use dyad_core::sampler::{BarometricReading, ChemicalReading};

const AHT20_ADDR: u8 = 0x38;
const BMP280_ADDR: u8 = 0x76;

/// AHT20 measurement delay per datasheet (75 ms typical, margin added)
const AHT20_MEASURE_MS: u64 = 80;

/// BMP280 factory calibration, read once at init
#[derive(Debug, Clone, Copy, Default)]
struct Bmp280Calibration {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
    dig_p1: u16,
    dig_p2: i16,
    dig_p3: i16,
    dig_p4: i16,
    dig_p5: i16,
    dig_p6: i16,
    dig_p7: i16,
    dig_p8: i16,
    dig_p9: i16,
}

impl Bmp280Calibration {
    fn from_registers(raw: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]);
        Self {
            dig_t1: u(0),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u(6),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        }
    }
}

/// Both environmental sensors behind one bus handle
pub struct EnvSensors<I2C> {
    i2c: I2C,
    calibration: Bmp280Calibration,
    bmp280_present: bool,
}

impl<I2C> EnvSensors<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            calibration: Bmp280Calibration::default(),
            bmp280_present: false,
        }
    }

    /// Bring up both sensors. Either may be absent; reads against a missing
    /// sensor just keep returning `None`.
    pub async fn init(&mut self) {
        // AHT20: calibrate command, then settle
        match self.i2c.write(AHT20_ADDR, &[0xBE, 0x08, 0x00]).await {
            Ok(()) => Timer::after_millis(10).await,
            Err(_) => warn!("aht20 init failed"),
        }

        // BMP280: normal mode, temp+pressure oversampling x1, 1s standby
        let ctrl = self.i2c.write(BMP280_ADDR, &[0xF4, 0x27]).await;
        let cfg = self.i2c.write(BMP280_ADDR, &[0xF5, 0xA0]).await;

        let mut cal = [0u8; 24];
        match (ctrl, cfg, self.i2c.write_read(BMP280_ADDR, &[0x88], &mut cal).await) {
            (Ok(()), Ok(()), Ok(())) => {
                self.calibration = Bmp280Calibration::from_registers(&cal);
                self.bmp280_present = true;
            }
            _ => warn!("bmp280 init failed"),
        }
    }

    /// One humidity/temperature measurement, or `None` on any bus error or
    /// a sensor stuck busy.
    pub async fn read_chemical(&mut self) -> Option<ChemicalReading> {
        self.i2c
            .write(AHT20_ADDR, &[0xAC, 0x33, 0x00])
            .await
            .ok()?;
        Timer::after_millis(AHT20_MEASURE_MS).await;

        let mut buf = [0u8; 6];
        self.i2c.read(AHT20_ADDR, &mut buf).await.ok()?;
        if buf[0] & 0x80 != 0 {
            // Still converting
            return None;
        }

        let raw_rh = ((buf[1] as u32) << 12) | ((buf[2] as u32) << 4) | ((buf[3] as u32) >> 4);
        let raw_t = (((buf[3] as u32) & 0x0F) << 16) | ((buf[4] as u32) << 8) | buf[5] as u32;

        Some(ChemicalReading {
            humidity_rh: raw_rh as f32 / (1 << 20) as f32 * 100.0,
            temperature_c: raw_t as f32 / (1 << 20) as f32 * 200.0 - 50.0,
        })
    }

    /// One pressure/temperature measurement through the Bosch compensation
    /// formulas, or `None` on bus error.
    pub async fn read_barometric(&mut self) -> Option<BarometricReading> {
        if !self.bmp280_present {
            return None;
        }

        let mut buf = [0u8; 6];
        self.i2c
            .write_read(BMP280_ADDR, &[0xF7], &mut buf)
            .await
            .ok()?;

        let adc_p = ((buf[0] as i32) << 12) | ((buf[1] as i32) << 4) | ((buf[2] as i32) >> 4);
        let adc_t = ((buf[3] as i32) << 12) | ((buf[4] as i32) << 4) | ((buf[5] as i32) >> 4);

        let (temp_centi, t_fine) = self.compensate_temperature(adc_t);
        let pressure_pa = self.compensate_pressure(adc_p, t_fine)?;

        Some(BarometricReading {
            temperature_c: temp_centi as f32 / 100.0,
            pressure_kpa: pressure_pa as f32 / 1000.0,
        })
    }

    /// Datasheet integer temperature compensation. Returns (0.01 degC, t_fine).
    fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let c = &self.calibration;
        let var1 = (((adc_t >> 3) - ((c.dig_t1 as i32) << 1)) * c.dig_t2 as i32) >> 11;
        let var2 = (((((adc_t >> 4) - c.dig_t1 as i32) * ((adc_t >> 4) - c.dig_t1 as i32)) >> 12)
            * c.dig_t3 as i32)
            >> 14;
        let t_fine = var1 + var2;
        ((t_fine * 5 + 128) >> 8, t_fine)
    }

    /// Datasheet 64-bit pressure compensation. Returns Pa, or `None` on a
    /// division-by-zero guard (uncalibrated part).
    fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> Option<u32> {
        let c = &self.calibration;
        let mut var1 = t_fine as i64 - 128000;
        let mut var2 = var1 * var1 * c.dig_p6 as i64;
        var2 += (var1 * c.dig_p5 as i64) << 17;
        var2 += (c.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * c.dig_p3 as i64) >> 8) + ((var1 * c.dig_p2 as i64) << 12);
        var1 = ((1i64 << 47) + var1) * c.dig_p1 as i64 >> 33;
        if var1 == 0 {
            return None;
        }
        let mut p = 1048576i64 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = ((c.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
        var2 = ((c.dig_p8 as i64) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((c.dig_p7 as i64) << 4);
        // p is in Q24.8 Pa
        Some((p >> 8) as u32)
    }
}
