//! Sampling parameter validation.
//!
//! Runs before the pipeline call so an out-of-range request never reaches
//! the backend.

use multiverse_backend::SamplingParams;
use multiverse_common::{MultiverseError, Result};

pub const MAX_LENGTH_MIN: usize = 50;
pub const MAX_LENGTH_MAX: usize = 1000;
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 1.0);
pub const TOP_P_RANGE: (f64, f64) = (0.0, 1.0);
pub const REPETITION_PENALTY_RANGE: (f64, f64) = (1.0, 2.0);

pub fn validate(params: &SamplingParams) -> Result<()> {
    if params.max_length < MAX_LENGTH_MIN || params.max_length > MAX_LENGTH_MAX {
        return Err(MultiverseError::ParamOutOfRange {
            param: "max_length",
            value: params.max_length as f64,
            min: MAX_LENGTH_MIN as f64,
            max: MAX_LENGTH_MAX as f64,
        });
    }
    check_range("temperature", params.temperature, TEMPERATURE_RANGE)?;
    check_range("top_p", params.top_p, TOP_P_RANGE)?;
    check_range(
        "repetition_penalty",
        params.repetition_penalty,
        REPETITION_PENALTY_RANGE,
    )?;
    Ok(())
}

fn check_range(param: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    // NaN compares false against both bounds
    if value.is_nan() || value < min || value > max {
        return Err(MultiverseError::ParamOutOfRange {
            param,
            value,
            min,
            max,
        });
    }
    Ok(())
}
