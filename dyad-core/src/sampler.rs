//! Producer-side sampling cycle policy.
//!
//! One cycle folds whatever the sensors delivered over the previous report:
//! a sensor that failed to answer keeps its stale fields, and the validity
//! flag summarizes the cycle. No cycle is ever aborted and no report is
//! ever suppressed; a known-bad report still goes downstream with its
//! `sensors_ok` bit cleared.

use dyad_protocol::SensorReport;

/// A fresh reading from the humidity/temperature sensor (AHT20)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChemicalReading {
    pub temperature_c: f32,
    pub humidity_rh: f32,
}

/// A fresh reading from the barometer (BMP280)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarometricReading {
    pub temperature_c: f32,
    pub pressure_kpa: f32,
}

/// Folds sensor reads into consecutive reports.
///
/// Validity policy: `sensors_ok` is the conjunction of three independent
/// gates - fresh humidity read, fresh barometric read, pressure > 0 kPa.
/// Any one failing clears the flag; there is no precedence between them.
#[derive(Debug, Clone)]
pub struct Sampler {
    last: SensorReport,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub const fn new() -> Self {
        Self {
            last: SensorReport::zeroed(),
        }
    }

    /// The most recent report produced (or the zeroed startup record)
    pub fn last(&self) -> &SensorReport {
        &self.last
    }

    /// Run one sampling cycle.
    ///
    /// `None` for either sensor means a transient read failure: the report
    /// keeps that sensor's previous values and the validity flag is
    /// cleared. Temperature comes from the chemical sensor; the barometer's
    /// own temperature is used only as a fresh fallback when the chemical
    /// read failed.
    pub fn cycle(
        &mut self,
        chemical: Option<ChemicalReading>,
        barometric: Option<BarometricReading>,
    ) -> SensorReport {
        let mut report = self.last;

        match chemical {
            Some(reading) => {
                report.temperature_c = reading.temperature_c;
                report.humidity_rh = reading.humidity_rh;
            }
            None => {
                if let Some(baro) = barometric {
                    report.temperature_c = baro.temperature_c;
                }
            }
        }

        if let Some(baro) = barometric {
            report.pressure_kpa = baro.pressure_kpa;
        }

        let pressure_plausible = barometric.map_or(false, |b| b.pressure_kpa > 0.0);
        report.sensors_ok = chemical.is_some() && pressure_plausible;

        self.last = report;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chem(t: f32, rh: f32) -> Option<ChemicalReading> {
        Some(ChemicalReading {
            temperature_c: t,
            humidity_rh: rh,
        })
    }

    fn baro(t: f32, p: f32) -> Option<BarometricReading> {
        Some(BarometricReading {
            temperature_c: t,
            pressure_kpa: p,
        })
    }

    #[test]
    fn test_all_fresh_reads_are_ok() {
        let mut sampler = Sampler::new();
        let report = sampler.cycle(chem(24.5, 55.0), baro(24.0, 95.0));
        assert!(report.sensors_ok);
        assert_eq!(report.temperature_c, 24.5);
        assert_eq!(report.humidity_rh, 55.0);
        assert_eq!(report.pressure_kpa, 95.0);
    }

    #[test]
    fn test_negative_pressure_gate_dominates() {
        // Humidity read succeeded, but the pressure is physically impossible
        let mut sampler = Sampler::new();
        let report = sampler.cycle(chem(24.5, 55.0), baro(24.0, -1.0));
        assert!(!report.sensors_ok);
        // The known-bad value is still delivered
        assert_eq!(report.pressure_kpa, -1.0);
    }

    #[test]
    fn test_humidity_failure_dominates() {
        let mut sampler = Sampler::new();
        let report = sampler.cycle(None, baro(24.0, 95.0));
        assert!(!report.sensors_ok);
    }

    #[test]
    fn test_stale_values_retained_on_chemical_failure() {
        let mut sampler = Sampler::new();
        sampler.cycle(chem(24.5, 55.0), baro(24.0, 95.0));

        let report = sampler.cycle(None, baro(25.0, 96.0));
        assert!(!report.sensors_ok);
        // Humidity stays stale, temperature falls back to the fresh
        // barometer value, pressure updates
        assert_eq!(report.humidity_rh, 55.0);
        assert_eq!(report.temperature_c, 25.0);
        assert_eq!(report.pressure_kpa, 96.0);
    }

    #[test]
    fn test_stale_pressure_retained_on_barometric_failure() {
        let mut sampler = Sampler::new();
        sampler.cycle(chem(24.5, 55.0), baro(24.0, 95.0));

        let report = sampler.cycle(chem(24.6, 54.0), None);
        assert!(!report.sensors_ok);
        assert_eq!(report.pressure_kpa, 95.0);
        assert_eq!(report.temperature_c, 24.6);
    }

    #[test]
    fn test_flag_recovers_on_next_good_cycle() {
        let mut sampler = Sampler::new();
        assert!(!sampler.cycle(None, None).sensors_ok);
        assert!(sampler.cycle(chem(24.5, 55.0), baro(24.0, 95.0)).sensors_ok);
    }
}
