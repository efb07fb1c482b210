//! Fixed-format display rendering.
//!
//! Decoded values become fixed text lines at fixed pixel coordinates, in
//! the font's uppercase repertoire. Buffers are generously oversized for
//! the formatted content; there is no wrapping or overflow handling, a
//! too-long line is simply clipped by the panel.

use core::fmt::Write;

use dyad_protocol::SensorReport;
use heapless::String;

use crate::traits::{DisplayError, TextPanel};

/// ADC reference voltage
pub const ADC_VREF: f32 = 3.3;
/// Full-scale count of the 12-bit converter
pub const ADC_FULL_SCALE: f32 = 4095.0;

/// Convert a raw 12-bit sample to volts
pub fn adc_to_voltage(raw: u16) -> f32 {
    f32::from(raw) * ADC_VREF / ADC_FULL_SCALE
}

/// Redraw the panel with a scalar ADC sample
pub fn draw_adc<P: TextPanel>(panel: &mut P, raw: u16) -> Result<(), DisplayError> {
    let mut line: String<20> = String::new();

    panel.fill(false);

    let _ = write!(line, "ADC: {}", raw);
    panel.draw_text(25, 10, &line);

    line.clear();
    let _ = write!(line, "V: {:.2} V", adc_to_voltage(raw));
    panel.draw_text(25, 30, &line);

    panel.flush()
}

/// Redraw the panel with a full environment report
pub fn draw_report<P: TextPanel>(panel: &mut P, report: &SensorReport) -> Result<(), DisplayError> {
    let mut line: String<20> = String::new();

    panel.fill(false);

    let _ = write!(line, "T: {:.1} C", report.temperature_c);
    panel.draw_text(8, 8, &line);

    line.clear();
    let _ = write!(line, "RH: {:.1} %", report.humidity_rh);
    panel.draw_text(8, 24, &line);

    line.clear();
    let _ = write!(line, "P: {:.1} KPA", report.pressure_kpa);
    panel.draw_text(8, 40, &line);

    if !report.sensors_ok {
        panel.draw_text(8, 56, "SENSOR FAULT");
    }

    panel.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PanelOp, RecordingPanel};

    #[test]
    fn test_adc_decode_to_voltage() {
        // v * 3.3 / 4095
        assert!((adc_to_voltage(2048) - 1.650).abs() < 0.001);
        assert_eq!(adc_to_voltage(0), 0.0);
        assert!((adc_to_voltage(4095) - 3.3).abs() < 0.0001);
    }

    #[test]
    fn test_adc_update_call_protocol() {
        // Always fill, then draw, then a single flush
        let mut panel = RecordingPanel::new();
        draw_adc(&mut panel, 2048).unwrap();

        assert_eq!(panel.ops.first(), Some(&PanelOp::Fill(false)));
        assert_eq!(panel.ops.last(), Some(&PanelOp::Flush));
        assert_eq!(
            panel.ops.iter().filter(|op| **op == PanelOp::Flush).count(),
            1
        );
        assert!(panel.has_text("ADC: 2048"));
        assert!(panel.has_text("V: 1.65 V"));
    }

    #[test]
    fn test_report_lines() {
        let mut panel = RecordingPanel::new();
        let report = SensorReport {
            temperature_c: 24.5,
            humidity_rh: 55.0,
            pressure_kpa: 95.0,
            sensors_ok: true,
        };
        draw_report(&mut panel, &report).unwrap();

        assert!(panel.has_text("T: 24.5 C"));
        assert!(panel.has_text("RH: 55.0 %"));
        assert!(panel.has_text("P: 95.0 KPA"));
        assert!(!panel.has_text("SENSOR FAULT"));
    }

    #[test]
    fn test_invalid_report_shows_fault_line() {
        let mut panel = RecordingPanel::new();
        let report = SensorReport {
            sensors_ok: false,
            ..SensorReport::zeroed()
        };
        draw_report(&mut panel, &report).unwrap();
        assert!(panel.has_text("SENSOR FAULT"));
    }
}
