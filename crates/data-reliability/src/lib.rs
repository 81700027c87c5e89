//! Guards between untrusted agent output and rendered reports.
//!
//! Validators decide whether a record is plausible enough to show,
//! sanitizers normalize known-noisy scalars, temporal filters drop stale or
//! fabricated entries, and formatters render whatever survives with an
//! `"N/A"` fallback. Nothing here panics or returns an error on bad input.

pub mod dates;
pub mod formatters;
pub mod placeholders;
pub mod sanitizers;
pub mod temporal;
pub mod validators;


pub use dates::parse_record_date;
pub use formatters::*;
pub use placeholders::PlaceholderNames;
pub use sanitizers::{classify_dividend_yield, sanitize_dividend_yield, YieldRejection};
pub use temporal::*;
pub use validators::*;
