/// CO2 estimation from primary pollutant readings.
///
/// Station feeds do not report CO2, so it is estimated as a weighted linear
/// combination of PM2.5, PM10, NO2, and CO on top of an ambient baseline.
/// Missing inputs contribute zero, which biases sparse stations toward the
/// baseline. The output is always clamped to a physically plausible band.

use crate::model::PollutantReading;

/// Lower bound of the estimate, ppm.
pub const CO2_MIN_PPM: f64 = 350.0;
/// Upper bound of the estimate, ppm.
pub const CO2_MAX_PPM: f64 = 2000.0;
/// Ambient baseline, ppm.
pub const CO2_BASELINE_PPM: f64 = 400.0;

const WEIGHT_PM25: f64 = 1.8;
const WEIGHT_PM10: f64 = 0.4;
const WEIGHT_NO2: f64 = 1.2;
const WEIGHT_CO: f64 = 50.0;
const FACTOR_DIVISOR: f64 = 20.0;

/// Estimates CO2 (ppm) from the four primary pollutants. Any input may be
/// `None`; non-finite inputs are treated as missing.
pub fn estimate_composite(
    pm25: Option<f64>,
    pm10: Option<f64>,
    no2: Option<f64>,
    co: Option<f64>,
) -> f64 {
    let term = |value: Option<f64>, weight: f64| {
        value.filter(|v| v.is_finite()).map(|v| v * weight).unwrap_or(0.0)
    };

    let factor = term(pm25, WEIGHT_PM25)
        + term(pm10, WEIGHT_PM10)
        + term(no2, WEIGHT_NO2)
        + term(co, WEIGHT_CO);
    let raw = CO2_BASELINE_PPM + factor / FACTOR_DIVISOR;

    // Finite inputs can still overflow to +/-inf; both ends clamp. NaN only
    // arises from inf - inf and falls back to the baseline.
    let bounded = if raw.is_nan() {
        CO2_BASELINE_PPM
    } else {
        raw.clamp(CO2_MIN_PPM, CO2_MAX_PPM)
    };

    (bounded * 100.0).round() / 100.0
}

/// Primary pollutant averages picked out of a station's readings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrimaryPollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
}

impl PrimaryPollutants {
    /// Classifies readings by case-insensitive id substring, checked in the
    /// order `pm2`, `pm10`, `no2`, `co`. The first reading with an average
    /// wins for each class.
    pub fn from_readings(readings: &[PollutantReading]) -> Self {
        let mut primary = PrimaryPollutants::default();

        for reading in readings {
            let Some(avg) = reading.avg else { continue };
            let id = reading.id.to_lowercase();

            let slot = if id.contains("pm2") {
                &mut primary.pm25
            } else if id.contains("pm10") {
                &mut primary.pm10
            } else if id.contains("no2") {
                &mut primary.no2
            } else if id.contains("co") {
                &mut primary.co
            } else {
                continue;
            };

            if slot.is_none() {
                *slot = Some(avg);
            }
        }

        primary
    }

    pub fn estimate_co2(&self) -> f64 {
        estimate_composite(self.pm25, self.pm10, self.no2, self.co)
    }
}

/// Convenience: classify a station's readings and estimate CO2.
pub fn estimate_from_readings(readings: &[PollutantReading]) -> f64 {
    PrimaryPollutants::from_readings(readings).estimate_co2()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
