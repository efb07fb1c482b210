//! The environment report record carried by report bursts.

/// One complete set of environmental readings.
///
/// Written by the producer core once per sampling cycle and shipped to the
/// consumer core by value. The consumer only ever sees copies; the producer
/// keeps its own previous record for stale-value retention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReport {
    /// Air temperature in °C
    pub temperature_c: f32,
    /// Relative humidity in %RH
    pub humidity_rh: f32,
    /// Barometric pressure in kPa
    pub pressure_kpa: f32,
    /// True when every sensor read in the producing cycle was fresh and the
    /// pressure was physically plausible (> 0 kPa)
    pub sensors_ok: bool,
}

impl SensorReport {
    /// The record before any sensor has been read. Marked not-ok so the
    /// consumer never mistakes startup zeros for a measurement.
    pub const fn zeroed() -> Self {
        Self {
            temperature_c: 0.0,
            humidity_rh: 0.0,
            pressure_kpa: 0.0,
            sensors_ok: false,
        }
    }
}

impl Default for SensorReport {
    fn default() -> Self {
        Self::zeroed()
    }
}
