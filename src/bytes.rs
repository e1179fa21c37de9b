//! A compact, variable-length byte codec.
//!
//! This is a storage format, not an interchange format; for the
//! IEEE 754-2008 bit patterns see [`interchange`][crate::interchange].

use num_bigint::BigInt;

use crate::ctx::Condition;
use crate::dec::Decimal;

impl Decimal {
    /// Serializes the value.
    ///
    /// Special values are a single byte: `0` for NaN, `1` for
    /// `+Infinity`, `2` for `-Infinity`. A finite value is the
    /// exponent as an 8-byte big-endian two's-complement
    /// integer followed by the significand as a variable-length
    /// big-endian two's-complement integer.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.is_nan() {
            return vec![0];
        }
        if self.is_infinite() {
            return vec![if self.is_negative() { 2 } else { 1 }];
        }
        let coeff = self.coeff.to_signed_bytes_be();
        let mut buf = Vec::with_capacity(8 + coeff.len());
        buf.extend_from_slice(&self.exp.to_be_bytes());
        buf.extend_from_slice(&coeff);
        buf
    }

    /// Deserializes a value encoded by [`to_bytes`][Self::to_bytes].
    ///
    /// A buffer that is not a valid encoding yields a quiet NaN
    /// and raises `CONVERSION_SYNTAX`.
    pub fn from_bytes(buf: &[u8]) -> Self {
        match buf {
            [0] => Self::nan(),
            [1] => Self::infinity(),
            [2] => Self::neg_infinity(),
            _ if buf.len() >= 9 => {
                // Split never fails at this length.
                let (exp, coeff) = buf.split_at(8);
                let exp = i64::from_be_bytes(exp.try_into().unwrap());
                Self::finite(BigInt::from_signed_bytes_be(coeff), exp)
            }
            _ => Self::invalid(Condition::CONVERSION_SYNTAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::{clear_status, take_status};

    #[test]
    fn test_specials() {
        assert_eq!(Decimal::nan().to_bytes(), [0]);
        assert_eq!(Decimal::snan().to_bytes(), [0]);
        assert_eq!(Decimal::infinity().to_bytes(), [1]);
        assert_eq!(Decimal::neg_infinity().to_bytes(), [2]);

        assert!(Decimal::from_bytes(&[0]).is_nan());
        assert!(Decimal::from_bytes(&[1]).is_positive());
        assert!(Decimal::from_bytes(&[1]).is_infinite());
        assert!(Decimal::from_bytes(&[2]).is_negative());
    }

    #[test]
    fn test_finite_layout() {
        // -7.50 is coefficient -750, exponent -2.
        let buf = Decimal::parse("-7.50").to_bytes();
        assert_eq!(
            buf,
            [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xfd, 0x12],
        );
        assert_eq!(Decimal::from_bytes(&buf), Decimal::parse("-7.50"));
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            "0",
            "1",
            "-1",
            "12.345",
            "1E+9",
            "-1234567890123456789012345678901234567890E-70",
            "255",
            "-256",
        ];
        for s in cases {
            let v = Decimal::parse(s);
            let got = Decimal::from_bytes(&v.to_bytes());
            assert_eq!(got, v, "{s}");
            assert_eq!(got.exponent(), v.exponent(), "{s}");
        }
    }

    #[test]
    fn test_bad_lengths() {
        for buf in [&[][..], &[3][..], &[1, 2][..], &[0; 8][..]] {
            clear_status();
            assert!(Decimal::from_bytes(buf).is_nan(), "{buf:?}");
            assert!(take_status().contains(Condition::CONVERSION_SYNTAX));
        }
    }
}
