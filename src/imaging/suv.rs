//! Standardized uptake value from PET calibration metadata
//!
//! Body-weight SUV: the modality value (activity concentration, Bq/ml) is
//! normalized by the injected dose decayed to the series acquisition time and
//! scaled by the patient's weight.

use chrono::NaiveTime;

/// DICOM `TM` value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DicomTime(NaiveTime);

impl DicomTime {
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hours, minutes, seconds).map(Self)
    }

    /// Parse `HHMMSS.FFFFFF` and its truncated forms (`HH`, `HHMM`, `HHMMSS`),
    /// plus the legacy colon-separated `HH:MM:SS.F`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (whole, fraction) = match value.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (value, None),
        };

        let digits: String = whole.chars().filter(|c| *c != ':').collect();
        if digits.is_empty()
            || digits.len() > 6
            || digits.len() % 2 != 0
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let field = |start: usize| -> Option<u32> {
            match digits.get(start..start + 2) {
                Some(two) => two.parse().ok(),
                None => Some(0),
            }
        };
        let hours = field(0)?;
        let minutes = field(2)?;
        let seconds = field(4)?;

        let nanos = match fraction {
            None => 0,
            Some(f) if !f.is_empty() && f.len() <= 9 && f.bytes().all(|b| b.is_ascii_digit()) => {
                format!("{f:0<9}").parse().ok()?
            }
            Some(_) => return None,
        };

        NaiveTime::from_hms_nano_opt(hours, minutes, seconds, nanos).map(Self)
    }

    /// Signed seconds from `earlier` to `self`, without wrapping at midnight
    pub fn seconds_since(&self, earlier: &DicomTime) -> Option<f64> {
        self.0
            .signed_duration_since(earlier.0)
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
    }
}

/// PET calibration fields used for SUV
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetCalibration {
    /// Patient weight in kilograms
    pub patient_weight_kg: Option<f64>,
    /// Radiopharmaceutical injection start time
    pub radiopharmaceutical_start_time: Option<DicomTime>,
    /// Injected dose in becquerels
    pub radionuclide_total_dose: Option<f64>,
    /// Radionuclide half life in seconds
    pub radionuclide_half_life: Option<f64>,
    /// Series acquisition time
    pub series_time: Option<DicomTime>,
}

/// Modality code of PET images
pub const PET_MODALITY: &str = "PT";

/// Body-weight SUV for `modality_value`, `None` unless the image is PET and
/// every calibration field is present and non-zero
pub fn calculate_suv(
    modality_value: f64,
    modality: Option<&str>,
    calibration: Option<&PetCalibration>,
) -> Option<f64> {
    if modality != Some(PET_MODALITY) {
        return None;
    }
    let calibration = calibration?;
    let non_zero = |v: Option<f64>| v.filter(|v| *v != 0.0);

    let weight = non_zero(calibration.patient_weight_kg)?;
    let total_dose = non_zero(calibration.radionuclide_total_dose)?;
    let half_life = non_zero(calibration.radionuclide_half_life)?;
    let start = calibration.radiopharmaceutical_start_time?;
    let acquisition = calibration.series_time?;

    let duration = acquisition.seconds_since(&start)?;
    let corrected_dose = total_dose * (-duration * std::f64::consts::LN_2 / half_life).exp();

    Some(modality_value * weight / corrected_dose * 1000.0)
}
