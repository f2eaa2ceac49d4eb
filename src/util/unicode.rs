//! Unicode utilities
//!
//! Character classes used by numeric parsing and UTF-16 helpers.

/// Check if a code point is a line terminator
#[inline]
pub fn is_line_terminator(c: u32) -> bool {
    matches!(c, 0x000A | 0x000D | 0x2028 | 0x2029)
}

/// Check if a code point is whitespace (`WhiteSpace` or `LineTerminator`)
#[inline]
pub fn is_whitespace(c: u32) -> bool {
    matches!(
        c,
        0x0009  // Tab
        | 0x000B // Vertical Tab
        | 0x000C // Form Feed
        | 0x0020 // Space
        | 0x00A0 // No-Break Space
        | 0xFEFF // BOM
    ) || is_line_terminator(c)
        || is_unicode_space(c)
}

/// Check if a code point is a Unicode space character (category Zs)
#[inline]
pub fn is_unicode_space(c: u32) -> bool {
    matches!(c, 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000)
}

/// Check if a code unit is a leading (high) surrogate
#[inline]
pub fn is_lead_surrogate(u: u16) -> bool {
    (0xD800..=0xDBFF).contains(&u)
}

/// Check if a code unit is a trailing (low) surrogate
#[inline]
pub fn is_trail_surrogate(u: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&u)
}

/// Strip leading and trailing whitespace code units
pub fn trim_whitespace(units: &[u16]) -> &[u16] {
    let start = units
        .iter()
        .position(|&u| !is_whitespace(u32::from(u)))
        .unwrap_or(units.len());
    let end = units
        .iter()
        .rposition(|&u| !is_whitespace(u32::from(u)))
        .map_or(start, |i| i + 1);
    &units[start..end.max(start)]
}
