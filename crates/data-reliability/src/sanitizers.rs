use thiserror::Error;
use tracing::debug;

/// Anything above this is a corrupted feed value, not a yield.
const CORRUPTED_YIELD: f64 = 1000.0;
/// Above this the value is implausible as either a percent or a fraction.
const IMPLAUSIBLE_YIELD: f64 = 50.0;
/// Highest yield (as a fraction) we are willing to display.
const MAX_YIELD_FRACTION: f64 = 0.25;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum YieldRejection {
    #[error("dividend yield missing")]
    Missing,

    #[error("dividend yield {0} is not a finite number")]
    NotFinite(f64),

    #[error("dividend yield {0} is negative")]
    Negative(f64),

    #[error("dividend yield {0} looks corrupted")]
    Corrupted(f64),

    #[error("dividend yield {0} is implausible as a percent or a fraction")]
    Implausible(f64),

    #[error("dividend yield {0}% exceeds the 25% ceiling")]
    AboveCeiling(f64),
}

/// Normalize a raw dividend yield to a fraction, explaining any discard.
///
/// Values in `[0, 1]` are already fractions. Values in `(1, 50]` are read as
/// percents and divided by 100, then rejected if the result exceeds 0.25.
pub fn classify_dividend_yield(raw: Option<f64>) -> Result<f64, YieldRejection> {
    let raw = raw.ok_or(YieldRejection::Missing)?;
    if !raw.is_finite() {
        return Err(YieldRejection::NotFinite(raw));
    }
    if raw < 0.0 {
        return Err(YieldRejection::Negative(raw));
    }
    if raw > CORRUPTED_YIELD {
        return Err(YieldRejection::Corrupted(raw));
    }
    if raw > IMPLAUSIBLE_YIELD {
        return Err(YieldRejection::Implausible(raw));
    }
    if raw > 1.0 {
        let fraction = raw / 100.0;
        if fraction > MAX_YIELD_FRACTION {
            return Err(YieldRejection::AboveCeiling(raw));
        }
        return Ok(fraction);
    }
    Ok(raw)
}

/// Normalize a raw dividend yield to a fraction in `[0, 0.25]`, or discard it.
pub fn sanitize_dividend_yield(raw: Option<f64>) -> Option<f64> {
    match classify_dividend_yield(raw) {
        Ok(fraction) => Some(fraction),
        Err(YieldRejection::Missing) => None,
        Err(reason) => {
            debug!(%reason, "discarding dividend yield");
            None
        }
    }
}
