//! Number to string conversion
//!
//! Implements `Number::toString` for radix 10 on top of the shortest
//! round-trip digit generation of `core::fmt`, and an exact digit loop for
//! the other radixes.

/// Convert an unsigned integer to string with given radix (2-36)
///
/// Writes the digits into `buf` and returns the number of bytes written.
pub fn u64_to_str_radix(buf: &mut [u8], mut val: u64, radix: u32) -> usize {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if buf.is_empty() || !(2..=36).contains(&radix) {
        return 0;
    }

    let mut i = 0;
    loop {
        if i >= buf.len() {
            break;
        }
        buf[i] = DIGITS[(val % radix as u64) as usize];
        i += 1;
        val /= radix as u64;
        if val == 0 {
            break;
        }
    }

    buf[..i].reverse();
    i
}

/// Shortest decimal digits `d1..dk` and exponent `n` such that the value is
/// `0.d1..dk * 10^n`
fn shortest_digits(value: f64) -> (String, i32) {
    let formatted = format!("{:e}", value);
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent + 1)
}

/// `Number::toString(x)` in radix 10
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let mut out = String::new();
    let value = if value < 0.0 {
        out.push('-');
        -value
    } else {
        value
    };

    let (digits, n) = shortest_digits(value);
    let k = digits.len() as i32;

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let e = n - 1;
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if e >= 0 { '+' } else { '-' });
        out.push_str(&e.unsigned_abs().to_string());
    }
    out
}

/// Maximum fraction digits produced for non-decimal radixes
const MAX_FRACTION_DIGITS: usize = 52;

/// `Number.prototype.toString(radix)` for radix 2..=36
///
/// Radix 10 defers to [`number_to_string`]. Callers validate the radix.
pub fn number_to_string_radix(value: f64, radix: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if radix == 10 || !value.is_finite() || !(2..=36).contains(&radix) {
        return number_to_string(value);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    let value = value.abs();
    let int_part = value.trunc();
    let r = f64::from(radix);

    if int_part <= 9_007_199_254_740_992.0 {
        let mut buf = [0u8; 64];
        let n = u64_to_str_radix(&mut buf, int_part as u64, radix);
        out.extend(buf[..n].iter().map(|&b| b as char));
    } else {
        let mut digits = Vec::new();
        let mut n = int_part;
        while n >= 1.0 {
            digits.push(DIGITS[(n % r) as usize]);
            n = (n / r).trunc();
        }
        out.extend(digits.iter().rev().map(|&b| b as char));
    }

    let mut frac = value - int_part;
    if frac > 0.0 {
        out.push('.');
        let mut produced = 0;
        while frac > 0.0 && produced < MAX_FRACTION_DIGITS {
            frac *= r;
            let digit = frac.trunc();
            frac -= digit;
            out.push(DIGITS[digit as usize] as char);
            produced += 1;
        }
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_to_str_radix() {
        let mut buf = [0u8; 64];

        let n = u64_to_str_radix(&mut buf, 255, 16);
        assert_eq!(&buf[..n], b"ff");

        let n = u64_to_str_radix(&mut buf, 255, 2);
        assert_eq!(&buf[..n], b"11111111");

        let n = u64_to_str_radix(&mut buf, 35, 36);
        assert_eq!(&buf[..n], b"z");

        let n = u64_to_str_radix(&mut buf, 0, 7);
        assert_eq!(&buf[..n], b"0");
    }

    #[test]
    fn test_number_to_string_integers() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-7.0), "-7");
        assert_eq!(number_to_string(4294967295.0), "4294967295");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
    }

    #[test]
    fn test_number_to_string_fractions() {
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1.2345e-10), "1.2345e-10");
        assert_eq!(number_to_string(123.456), "123.456");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_number_to_string_special() {
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(number_to_string(5e-324), "5e-324");
    }

    #[test]
    fn test_number_to_string_radix() {
        assert_eq!(number_to_string_radix(255.0, 16), "ff");
        assert_eq!(number_to_string_radix(-255.0, 2), "-11111111");
        assert_eq!(number_to_string_radix(0.5, 2), "0.1");
        assert_eq!(number_to_string_radix(35.0, 36), "z");
        assert_eq!(number_to_string_radix(0.0, 8), "0");
        assert_eq!(number_to_string_radix(f64::NAN, 16), "NaN");
        assert_eq!(number_to_string_radix(12.0, 10), "12");
    }
}
