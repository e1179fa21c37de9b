use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::ctx::{raise, Condition, Context, RoundingMode};
use crate::dec::Decimal;
use crate::util;

impl Decimal {
    /// Rounds the value to at most `ctx.precision()` digits.
    ///
    /// Infinities pass through unchanged; NaNs pass through
    /// and raise `INVALID_OPERATION`. A value that already
    /// fits the precision is returned unchanged, so rounding
    /// is idempotent.
    pub fn round(&self, ctx: &Context) -> Self {
        if self.is_nan() {
            raise(Condition::INVALID_OPERATION);
            return self.clone();
        }
        if self.is_infinite() {
            return self.clone();
        }

        let prec = u64::from(ctx.precision());
        if self.digits <= prec {
            return self.clone();
        }

        // `d` digits must be discarded.
        let d = self.digits - prec;
        let pow = util::ten_pow(d);
        let (q, r) = self.coeff.div_rem(&pow);
        let Some(exp) = i64::try_from(d)
            .ok()
            .and_then(|d| self.exp.checked_add(d))
        else {
            return Self::invalid(Condition::INVALID_OPERATION);
        };
        if r.is_zero() {
            return Self::finite(q, exp);
        }

        // Two candidates: `q1` toward zero, `q2` away from it.
        let negative = self.coeff.is_negative();
        let step = if negative {
            -BigInt::one()
        } else {
            BigInt::one()
        };
        let q1 = q;
        let q2 = &q1 + &step;

        let coeff = match ctx.rounding_mode() {
            RoundingMode::TowardZero => q1,
            RoundingMode::AwayFromZero => q2,
            RoundingMode::TowardNegativeInf => {
                if negative {
                    q2
                } else {
                    q1
                }
            }
            RoundingMode::TowardPositiveInf => {
                if negative {
                    q1
                } else {
                    q2
                }
            }
            mode => {
                // Distance from the discarded tail to each
                // candidate decides; ties go to the even
                // candidate or away from zero, per mode.
                let d1 = r.abs();
                let d2 = &pow - &d1;
                match d1.cmp(&d2) {
                    core::cmp::Ordering::Less => q1,
                    core::cmp::Ordering::Greater => q2,
                    core::cmp::Ordering::Equal => match mode {
                        RoundingMode::ToNearestAway => q2,
                        _ => {
                            // ToNearestEven
                            if q1.is_even() {
                                q1
                            } else {
                                q2
                            }
                        }
                    },
                }
            }
        };

        // Rounding away can carry out, e.g. 999.9 at four
        // digits of precision becomes 1000 at three.
        if util::digits(&coeff) > prec {
            let coeff = coeff / BigInt::from(10);
            return Self::finite(coeff, exp.saturating_add(1));
        }
        Self::finite(coeff, exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::{clear_status, take_status};

    fn dec(s: &str) -> Decimal {
        Decimal::parse(s)
    }

    fn ctx(prec: u32, mode: RoundingMode) -> Context {
        Context::new(prec, mode)
    }

    #[test]
    fn test_round_exact_fit() {
        let c = ctx(7, RoundingMode::ToNearestEven);
        let d = dec("1234.567");
        let got = d.round(&c);
        assert_eq!(got, d);
        assert_eq!(got.exponent(), -3);
    }

    #[test]
    fn test_round_tie_break() {
        // 12345.5 to five significant digits.
        let v = dec("12345.5");
        let got = v.round(&ctx(5, RoundingMode::ToNearestEven));
        assert_eq!(got, dec("12346"));
        let got = v.round(&ctx(5, RoundingMode::TowardZero));
        assert_eq!(got, dec("12345"));

        // 12344.5: the tie now goes down to the even 12344.
        let v = dec("12344.5");
        let got = v.round(&ctx(5, RoundingMode::ToNearestEven));
        assert_eq!(got, dec("12344"));
        let got = v.round(&ctx(5, RoundingMode::ToNearestAway));
        assert_eq!(got, dec("12345"));
    }

    #[test]
    fn test_round_directed() {
        let v = dec("1.2301");
        assert_eq!(v.round(&ctx(3, RoundingMode::TowardZero)), dec("1.23"));
        assert_eq!(v.round(&ctx(3, RoundingMode::AwayFromZero)), dec("1.24"));
        assert_eq!(
            v.round(&ctx(3, RoundingMode::TowardNegativeInf)),
            dec("1.23"),
        );
        assert_eq!(
            v.round(&ctx(3, RoundingMode::TowardPositiveInf)),
            dec("1.24"),
        );

        let v = dec("-1.2301");
        assert_eq!(v.round(&ctx(3, RoundingMode::TowardZero)), dec("-1.23"));
        assert_eq!(v.round(&ctx(3, RoundingMode::AwayFromZero)), dec("-1.24"));
        assert_eq!(
            v.round(&ctx(3, RoundingMode::TowardNegativeInf)),
            dec("-1.24"),
        );
        assert_eq!(
            v.round(&ctx(3, RoundingMode::TowardPositiveInf)),
            dec("-1.23"),
        );
    }

    #[test]
    fn test_round_carry_out() {
        // 999.9 rounded to three digits carries all the way
        // out: the quotient 999 rounds to 1000, which has four
        // digits again.
        let got = dec("999.9").round(&ctx(3, RoundingMode::ToNearestEven));
        assert_eq!(got, dec("1000"));
        assert_eq!(got.precision(), 3);
        assert_eq!(got.exponent(), 1);

        let got = dec("-999.9").round(&ctx(3, RoundingMode::ToNearestEven));
        assert_eq!(got, dec("-1000"));
    }

    #[test]
    fn test_round_idempotent() {
        let cases = ["12345.5", "999.9", "-0.0012345", "7", "1E+30"];
        for mode in [
            RoundingMode::ToNearestEven,
            RoundingMode::ToNearestAway,
            RoundingMode::TowardZero,
            RoundingMode::AwayFromZero,
            RoundingMode::TowardNegativeInf,
            RoundingMode::TowardPositiveInf,
        ] {
            for s in cases {
                let c = ctx(4, mode);
                let once = dec(s).round(&c);
                let twice = once.round(&c);
                assert_eq!(once, twice, "{s} {mode:?}");
                assert_eq!(once.coefficient(), twice.coefficient(), "{s} {mode:?}");
            }
        }
    }

    #[test]
    fn test_round_specials() {
        let c = ctx(5, RoundingMode::ToNearestEven);
        assert!(Decimal::infinity().round(&c).is_infinite());

        clear_status();
        assert!(Decimal::nan().round(&c).is_nan());
        assert!(take_status().contains(Condition::INVALID_OPERATION));
    }

    #[test]
    fn test_round_zero() {
        let c = ctx(5, RoundingMode::ToNearestEven);
        let z = Decimal::zero().round(&c);
        assert!(z.is_zero());
        assert_eq!(z.precision(), 1);
    }
}
