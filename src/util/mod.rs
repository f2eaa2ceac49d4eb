//! Utility functions
//!
//! Numeric text conversion, Unicode classification and index arithmetic
//! shared by the runtime and the built-ins.

pub mod atof;
pub mod dtoa;
pub mod unicode;

/// Resolve a relative index against a length
///
/// Negative values count back from `len`; the result is clamped to
/// `0..=len`. `relative` must already be integral (`ToIntegerOrInfinity`).
pub fn relative_index(relative: f64, len: u64) -> u64 {
    let len_f = len as f64;
    if relative < 0.0 {
        (len_f + relative).max(0.0) as u64
    } else {
        relative.min(len_f) as u64
    }
}
