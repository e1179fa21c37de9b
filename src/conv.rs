use core::fmt;
use core::str::FromStr;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::ctx::Condition;
use crate::dec::Decimal;

/// An error returned when parsing a decimal from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
}

impl ParseError {
    pub(crate) const fn empty() -> Self {
        Self {
            kind: ErrorKind::Empty,
        }
    }

    pub(crate) const fn invalid() -> Self {
        Self {
            kind: ErrorKind::Invalid,
        }
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Empty => write!(f, "cannot parse decimal from empty string"),
            ErrorKind::Invalid => write!(f, "invalid decimal literal"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    Empty,
    Invalid,
}

/// Parser states.
///
/// Signs are legal only at the entry states (`Start` and
/// `ExponentStart`); a decimal point is legal only before the
/// exponent marker.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Start,
    Integer,
    Fraction,
    ExponentStart,
    Exponent,
}

fn parse_str(s: &str) -> Result<Decimal, ParseError> {
    if s.is_empty() {
        return Err(ParseError::empty());
    }

    // The special literals are matched verbatim before the
    // digit scan.
    match s {
        "NaN" => return Ok(Decimal::nan()),
        "sNaN" => return Ok(Decimal::snan()),
        "Infinity" | "+Infinity" => return Ok(Decimal::infinity()),
        "-Infinity" => return Ok(Decimal::neg_infinity()),
        _ => {}
    }

    let mut coeff = BigInt::zero();
    let mut mant_digits = 0u64;
    let mut frac_digits = 0i64;
    let mut exp: i64 = 0;
    let mut exp_digits = 0u64;
    let mut neg = false;
    let mut exp_neg = false;
    let mut state = State::Start;

    for &c in s.as_bytes() {
        state = match (state, c) {
            (State::Start, b'+' | b'-') => {
                neg = c == b'-';
                State::Integer
            }
            (State::Start | State::Integer, b'0'..=b'9') => {
                coeff = coeff * 10 + (c - b'0');
                mant_digits += 1;
                State::Integer
            }
            (State::Start | State::Integer, b'.') => State::Fraction,
            (State::Fraction, b'0'..=b'9') => {
                coeff = coeff * 10 + (c - b'0');
                mant_digits += 1;
                frac_digits += 1;
                State::Fraction
            }
            (State::Integer | State::Fraction, b'e' | b'E') => State::ExponentStart,
            (State::ExponentStart, b'+' | b'-') => {
                exp_neg = c == b'-';
                State::Exponent
            }
            (State::ExponentStart | State::Exponent, b'0'..=b'9') => {
                exp = exp
                    .checked_mul(10)
                    .and_then(|e| e.checked_add(i64::from(c - b'0')))
                    .ok_or(ParseError::invalid())?;
                exp_digits += 1;
                State::Exponent
            }
            _ => return Err(ParseError::invalid()),
        };
    }

    if mant_digits == 0 {
        return Err(ParseError::invalid());
    }
    // An exponent marker with no digits after it.
    if matches!(state, State::ExponentStart | State::Exponent) && exp_digits == 0 {
        return Err(ParseError::invalid());
    }

    if exp_neg {
        exp = -exp;
    }
    let exp = exp.checked_sub(frac_digits).ok_or(ParseError::invalid())?;
    if neg {
        coeff = -coeff;
    }
    Ok(Decimal::finite(coeff, exp))
}

impl Decimal {
    /// Parses a decimal from a string.
    ///
    /// Accepts an optional sign, digits with an optional `.`
    /// fraction, an optional `e`/`E` signed exponent, and the
    /// literals `NaN`, `sNaN`, `Infinity`, `+Infinity`, and
    /// `-Infinity`.
    ///
    /// Parsing never fails: malformed input yields a quiet NaN
    /// and raises `CONVERSION_SYNTAX`. Use [`FromStr`] for a
    /// `Result`.
    pub fn parse(s: &str) -> Self {
        match parse_str(s) {
            Ok(d) => d,
            Err(_) => Self::invalid(Condition::CONVERSION_SYNTAX),
        }
    }

    /// Formats the value without an exponent suffix.
    ///
    /// A positive exponent pads with trailing zeros; a
    /// negative exponent inserts a decimal point, prepending
    /// `0.` and zeros as needed.
    pub fn to_plain_string(&self) -> String {
        if let Some(s) = self.special_str() {
            return s.into();
        }
        let digits = self.coeff.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };

        if self.exp >= 0 {
            if self.coeff.is_zero() {
                return "0".into();
            }
            let zeros = "0".repeat(self.exp as usize);
            return format!("{sign}{digits}{zeros}");
        }

        let n = digits.len() as i64;
        if self.exp > -n {
            let point = (n + self.exp) as usize;
            format!("{sign}{}.{}", &digits[..point], &digits[point..])
        } else {
            let zeros = "0".repeat((-self.exp - n) as usize);
            format!("{sign}0.{zeros}{digits}")
        }
    }

    /// Formats the value in scientific notation: one leading
    /// digit, a fraction, and an always-signed `E` exponent.
    pub fn to_scientific_string(&self) -> String {
        self.exp_string('E')
    }

    /// Formats the value in engineering notation: scientific,
    /// but with the exponent lowered to a multiple of three by
    /// shifting up to two digits left of the decimal point.
    pub fn to_engineering_string(&self) -> String {
        if let Some(s) = self.special_str() {
            return s.into();
        }
        let sign = if self.is_negative() { "-" } else { "" };

        if self.coeff.is_zero() {
            // Lift the exponent to the next multiple of three
            // by padding fraction zeros.
            let rem = self.exp.rem_euclid(3);
            let pad = (3 - rem) % 3;
            let target = self.exp + pad;
            return if pad == 0 {
                format!("0E{}", signed_exp(target))
            } else {
                format!("0.{}E{}", "0".repeat(pad as usize), signed_exp(target))
            };
        }

        let mut digits = self.coeff.magnitude().to_string();
        let adj = self.adjusted_exponent();
        let m = adj.rem_euclid(3);
        let eng = adj - m;
        let int_len = (m + 1) as usize;
        while digits.len() < int_len {
            digits.push('0');
        }
        if digits.len() == int_len {
            format!("{sign}{digits}E{}", signed_exp(eng))
        } else {
            format!(
                "{sign}{}.{}E{}",
                &digits[..int_len],
                &digits[int_len..],
                signed_exp(eng),
            )
        }
    }

    fn exp_string(&self, e: char) -> String {
        if let Some(s) = self.special_str() {
            return s.into();
        }
        let digits = self.coeff.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let adj = self.adjusted_exponent();
        if digits.len() == 1 {
            format!("{sign}{digits}{e}{}", signed_exp(adj))
        } else {
            format!(
                "{sign}{}.{}{e}{}",
                &digits[..1],
                &digits[1..],
                signed_exp(adj),
            )
        }
    }

    fn special_str(&self) -> Option<&'static str> {
        if self.is_signaling() {
            Some("sNaN")
        } else if self.is_nan() {
            Some("NaN")
        } else if self.is_infinite() {
            Some(if self.is_negative() {
                "-Infinity"
            } else {
                "+Infinity"
            })
        } else {
            None
        }
    }
}

/// Formats an exponent with a mandatory sign.
fn signed_exp(e: i64) -> String {
    if e < 0 {
        e.to_string()
    } else {
        format!("+{e}")
    }
}

impl FromStr for Decimal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}

impl fmt::Display for Decimal {
    /// Uses plain notation when `exponent <= 0` and the
    /// adjusted exponent is at least -6, scientific notation
    /// otherwise. This is the classic to-scientific-string
    /// boundary.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() && self.exp <= 0 && self.adjusted_exponent() >= -6 {
            f.write_str(&self.to_plain_string())
        } else {
            f.write_str(&self.to_scientific_string())
        }
    }
}

impl fmt::LowerExp for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exp_string('e'))
    }
}

impl fmt::UpperExp for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exp_string('E'))
    }
}
