use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Rem, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use crate::ctx::{raise, Condition, Context, RoundingMode};
use crate::macros::{forward_ref_binop, forward_ref_unop};
use crate::util;

/// Distinguishes finite numbers from the special values.
///
/// A value is exactly one of finite, infinite, or NaN.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Kind {
    Finite,
    Infinite,
    QNan,
    SNan,
}

/// An arbitrary-precision decimal number.
///
/// A finite value is `coeff × 10^exp` where `coeff` is an
/// arbitrary-precision signed integer and `exp` is a signed
/// exponent. There is no fixed precision: addition,
/// subtraction, and multiplication are always exact, as is
/// division when the quotient has a terminating decimal
/// expansion. Inexact operations take a [`Context`] describing
/// the target precision and [rounding mode][RoundingMode].
///
/// Values are immutable. Every operation returns a new value.
///
/// # Special values
///
/// `Decimal` has positive and negative infinities and quiet
/// and signaling NaNs. Operations never panic on value-domain
/// errors (malformed text, 0/0, ∞−∞, and so on); they return a
/// NaN and raise a [`Condition`] in the thread-local status.
/// See [`take_status`][crate::take_status].
///
/// # Signed zero
///
/// The sign lives in the coefficient, so `-0` and `0` are the
/// same value; negating a zero is a no-op.
#[derive(Clone)]
pub struct Decimal {
    /// The significand. For special values it only carries a
    /// sign marker in [-1, 1].
    pub(crate) coeff: BigInt,
    /// For finite values, the power of ten multiplying `coeff`.
    /// Always zero for special values.
    pub(crate) exp: i64,
    /// The number of decimal digits in `|coeff|`. A zero
    /// significand has one digit.
    pub(crate) digits: u64,
    pub(crate) kind: Kind,
}

impl Decimal {
    /// Creates a finite decimal `coeff × 10^exp`.
    pub fn new(coeff: impl Into<BigInt>, exp: i64) -> Self {
        Self::finite(coeff.into(), exp)
    }

    pub(crate) fn finite(coeff: BigInt, exp: i64) -> Self {
        let digits = util::digits(&coeff);
        Self {
            coeff,
            exp,
            digits,
            kind: Kind::Finite,
        }
    }

    fn special(kind: Kind, sign: i8) -> Self {
        debug_assert!(!matches!(kind, Kind::Finite));

        Self {
            coeff: BigInt::from(sign),
            exp: 0,
            digits: 1,
            kind,
        }
    }

    /// Returns a zero.
    pub fn zero() -> Self {
        Self::finite(BigInt::zero(), 0)
    }

    /// Returns a one.
    pub fn one() -> Self {
        Self::finite(BigInt::one(), 0)
    }

    /// Returns a quiet NaN.
    pub fn nan() -> Self {
        Self::special(Kind::QNan, 0)
    }

    /// Returns a signaling NaN.
    pub fn snan() -> Self {
        Self::special(Kind::SNan, 0)
    }

    /// Returns positive infinity.
    pub fn infinity() -> Self {
        Self::special(Kind::Infinite, 1)
    }

    /// Returns negative infinity.
    pub fn neg_infinity() -> Self {
        Self::special(Kind::Infinite, -1)
    }

    /// Returns a quiet NaN after raising `cond`.
    pub(crate) fn invalid(cond: Condition) -> Self {
        raise(cond);
        Self::nan()
    }

    /// Converts a binary float to an exact decimal.
    ///
    /// Every finite `f64` is a (possibly negative) integer
    /// multiple of a power of two, so the conversion never
    /// loses precision: `m × 2^e` with `e < 0` is re-expressed
    /// as `m × 5^-e × 10^e`.
    pub fn from_f64(x: f64) -> Self {
        if x.is_nan() {
            return Self::nan();
        }
        if x.is_infinite() {
            return if x.is_sign_negative() {
                Self::neg_infinity()
            } else {
                Self::infinity()
            };
        }

        let bits = x.to_bits();
        let sign = (bits >> 63) != 0;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & ((1 << 52) - 1);
        let (mant, exp2) = if biased == 0 {
            // Subnormal, or zero.
            (frac, -1074)
        } else {
            (frac | (1 << 52), biased - 1075)
        };
        if mant == 0 {
            return Self::zero();
        }

        let mut coeff = BigInt::from(mant);
        let exp = if exp2 >= 0 {
            coeff <<= exp2 as usize;
            0
        } else {
            coeff *= BigInt::from(5u8).pow(exp2.unsigned_abs());
            exp2
        };
        if sign {
            coeff = -coeff;
        }
        Self::finite(coeff, exp)
    }

    /// Converts the decimal to the nearest binary float.
    ///
    /// The conversion is lossy: an `f64` has about 15.9 decimal
    /// digits of precision.
    pub fn to_f64(&self) -> f64 {
        match self.kind {
            Kind::QNan | Kind::SNan => f64::NAN,
            Kind::Infinite => {
                if self.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
            // `f64` parsing performs correct rounding, so go
            // through the scientific string form.
            Kind::Finite => self
                .to_scientific_string()
                .parse()
                .unwrap_or(f64::NAN),
        }
    }

    /// Returns the significand.
    ///
    /// For special values this is only a sign marker.
    pub fn coefficient(&self) -> &BigInt {
        &self.coeff
    }

    /// Returns the power of ten multiplying the significand.
    ///
    /// Always zero for special values.
    pub fn exponent(&self) -> i64 {
        self.exp
    }

    /// Returns the number of decimal digits in the significand.
    ///
    /// A zero significand has one digit.
    pub fn precision(&self) -> u64 {
        self.digits
    }

    /// Returns the exponent the value would have in normalized
    /// scientific notation, `precision + exponent - 1`.
    pub fn adjusted_exponent(&self) -> i64 {
        // `digits` is at least 1, so the subtraction cannot
        // wrap.
        self.exp.saturating_add(self.digits as i64 - 1)
    }

    /// Reports whether the value is neither infinite nor NaN.
    pub fn is_finite(&self) -> bool {
        matches!(self.kind, Kind::Finite)
    }

    /// Reports whether the value is an infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self.kind, Kind::Infinite)
    }

    /// Reports whether the value is a quiet or signaling NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.kind, Kind::QNan | Kind::SNan)
    }

    /// Reports whether the value is a signaling NaN.
    pub fn is_signaling(&self) -> bool {
        matches!(self.kind, Kind::SNan)
    }

    /// Reports whether the value is a zero.
    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.coeff.is_zero()
    }

    /// Reports whether the value is strictly less than zero.
    ///
    /// Zero and NaN are neither positive nor negative.
    pub fn is_negative(&self) -> bool {
        !self.is_nan() && self.coeff.sign() == Sign::Minus
    }

    /// Reports whether the value is strictly greater than zero.
    ///
    /// Zero and NaN are neither positive nor negative.
    pub fn is_positive(&self) -> bool {
        !self.is_nan() && self.coeff.sign() == Sign::Plus
    }

    /// Returns the sign of the value: -1, 0, or +1.
    ///
    /// NaN has sign 0.
    pub fn signum(&self) -> i32 {
        match self.coeff.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        let mut out = self.clone();
        out.coeff = out.coeff.abs();
        out
    }

    /// Propagates NaN operands.
    ///
    /// A signaling NaN raises `INVALID_OPERATION` and quiets.
    fn check_nans(&self, rhs: &Self) -> Option<Self> {
        if self.is_signaling() || rhs.is_signaling() {
            Some(Self::invalid(Condition::INVALID_OPERATION))
        } else if self.is_nan() || rhs.is_nan() {
            Some(Self::nan())
        } else {
            None
        }
    }

    /// Exact addition after exponent alignment.
    ///
    /// The operand with the larger exponent is scaled by
    /// `10^Δ`, which is always exact; the result exponent is
    /// the smaller of the two input exponents.
    fn add_finite(&self, rhs: &Self) -> Self {
        debug_assert!(self.is_finite() && rhs.is_finite());

        let (coeff, exp) = match self.exp.cmp(&rhs.exp) {
            Ordering::Equal => (&self.coeff + &rhs.coeff, self.exp),
            Ordering::Greater => {
                let shift = self.exp.abs_diff(rhs.exp);
                (&self.coeff * util::ten_pow(shift) + &rhs.coeff, rhs.exp)
            }
            Ordering::Less => {
                let shift = rhs.exp.abs_diff(self.exp);
                (&self.coeff + &rhs.coeff * util::ten_pow(shift), self.exp)
            }
        };
        Self::finite(coeff, exp)
    }

    fn add_impl(&self, rhs: &Self) -> Self {
        if let Some(nan) = self.check_nans(rhs) {
            return nan;
        }
        match (self.is_infinite(), rhs.is_infinite()) {
            (true, true) => {
                if self.signum() == rhs.signum() {
                    self.clone()
                } else {
                    Self::invalid(Condition::INVALID_OPERATION)
                }
            }
            (true, false) => self.clone(),
            (false, true) => rhs.clone(),
            (false, false) => self.add_finite(rhs),
        }
    }

    fn mul_impl(&self, rhs: &Self) -> Self {
        if let Some(nan) = self.check_nans(rhs) {
            return nan;
        }
        if self.is_infinite() || rhs.is_infinite() {
            if self.is_zero() || rhs.is_zero() {
                return Self::invalid(Condition::INVALID_OPERATION);
            }
            let sign = if self.is_negative() != rhs.is_negative() {
                -1
            } else {
                1
            };
            return Self::special(Kind::Infinite, sign);
        }
        let Some(exp) = self.exp.checked_add(rhs.exp) else {
            return Self::invalid(Condition::INVALID_OPERATION);
        };
        Self::finite(&self.coeff * &rhs.coeff, exp)
    }

    /// Exact addition, then rounding per `ctx`.
    pub fn add_with(&self, rhs: &Self, ctx: &Context) -> Self {
        self.add_impl(rhs).round(ctx)
    }

    /// Exact subtraction, then rounding per `ctx`.
    pub fn sub_with(&self, rhs: &Self, ctx: &Context) -> Self {
        self.add_impl(&rhs.neg_impl()).round(ctx)
    }

    /// Exact multiplication, then rounding per `ctx`.
    pub fn mul_with(&self, rhs: &Self, ctx: &Context) -> Self {
        self.mul_impl(rhs).round(ctx)
    }

    fn neg_impl(&self) -> Self {
        let mut out = self.clone();
        out.coeff = -out.coeff;
        out
    }

    /// Divides `self` by `rhs`.
    ///
    /// If the quotient has a terminating decimal expansion the
    /// result is exact and no context is required (it is still
    /// rounded per `ctx` when one is given). Otherwise a
    /// context is mandatory: without one the result is NaN and
    /// `DIVISION_IMPOSSIBLE` is raised.
    ///
    /// The `/` operator is equivalent to `divide(rhs, None)`.
    ///
    /// For a non-terminating quotient the tie-break uses only
    /// the last discarded digit, not the exact remainder, so
    /// a `ToNearestEven` tie with non-zero digits further down
    /// rounds as if it were an exact tie.
    pub fn divide(&self, rhs: &Self, ctx: Option<&Context>) -> Self {
        if let Some(nan) = self.check_nans(rhs) {
            return nan;
        }
        match (self.is_infinite(), rhs.is_infinite()) {
            (true, true) => return Self::invalid(Condition::INVALID_OPERATION),
            (true, false) => {
                let sign = if self.is_negative() != rhs.is_negative() {
                    -1
                } else {
                    1
                };
                return Self::special(Kind::Infinite, sign);
            }
            (false, true) => return Self::zero(),
            (false, false) => {}
        }
        if rhs.is_zero() {
            return if self.is_zero() {
                Self::invalid(Condition::DIVISION_UNDEFINED)
            } else {
                raise(Condition::DIVISION_BY_ZERO);
                Self::special(Kind::Infinite, if self.is_negative() { -1 } else { 1 })
            };
        }

        let Some(exp) = self.exp.checked_sub(rhs.exp) else {
            return Self::invalid(Condition::INVALID_OPERATION);
        };
        if self.is_zero() {
            return Self::finite(BigInt::zero(), exp);
        }

        let amag = self.coeff.magnitude();
        let bmag = rhs.coeff.magnitude();
        let neg = self.is_negative() != rhs.is_negative();

        // Reduce the divisor by gcd, then strip its factors of
        // two and five. If nothing else remains, the expansion
        // terminates.
        let g = amag.gcd(bmag);
        let reduced = bmag / &g;
        let (rest, count2) = util::strip_factor(reduced, 2);
        let (rest, count5) = util::strip_factor(rest, 5);

        if rest.is_one() {
            // Terminating: scale the dividend so the divisor
            // divides it exactly.
            let m = count2.max(count5);
            let q = (amag * util::ten_pow(m).magnitude()) / bmag;
            let Some(exp) = i64::try_from(m)
                .ok()
                .and_then(|m| exp.checked_sub(m))
            else {
                return Self::invalid(Condition::INVALID_OPERATION);
            };
            let out = Self::finite(signed(q, neg), exp);
            return match ctx {
                Some(ctx) => out.round(ctx),
                None => out,
            };
        }

        let Some(ctx) = ctx else {
            return Self::invalid(Condition::DIVISION_IMPOSSIBLE);
        };

        // Infinite expansion: compute a quotient with a couple
        // of guard digits, then trim down to the context
        // precision one digit at a time.
        let prec = u64::from(ctx.precision());
        let shift = (rhs.digits + prec + 2).saturating_sub(self.digits);
        let mut q = (amag * util::ten_pow(shift).magnitude()) / bmag;
        let mut exp = {
            let Some(exp) = i64::try_from(shift)
                .ok()
                .and_then(|s| exp.checked_sub(s))
            else {
                return Self::invalid(Condition::INVALID_OPERATION);
            };
            exp
        };

        let ten = BigUint::from(10u8);
        let mut last = 0u8;
        while util::digits_uint(&q) > prec {
            let (quo, rem) = q.div_rem(&ten);
            last = rem.to_u8().unwrap_or(0);
            q = quo;
            exp += 1;
        }

        let round_up = match ctx.rounding_mode() {
            RoundingMode::TowardZero => false,
            RoundingMode::AwayFromZero => last != 0,
            RoundingMode::TowardNegativeInf => neg && last != 0,
            RoundingMode::TowardPositiveInf => !neg && last != 0,
            RoundingMode::ToNearestEven => last > 5 || (last == 5 && q.is_odd()),
            RoundingMode::ToNearestAway => last >= 5,
        };
        if round_up {
            q += 1u8;
            if util::digits_uint(&q) > prec {
                // Carry out, e.g. 999…9 + 1.
                q /= &ten;
                exp += 1;
            }
        }
        Self::finite(signed(q, neg), exp)
    }

    /// Truncating integer division with remainder.
    ///
    /// The operands are aligned to a common exponent; the
    /// quotient is an integer and the remainder satisfies
    /// `self == quotient × rhs + remainder`.
    pub fn div_rem(&self, rhs: &Self) -> (Self, Self) {
        if let Some(nan) = self.check_nans(rhs) {
            return (nan.clone(), nan);
        }
        if self.is_infinite() || rhs.is_zero() {
            let nan = Self::invalid(Condition::INVALID_OPERATION);
            return (nan.clone(), nan);
        }
        if rhs.is_infinite() {
            return (Self::zero(), self.clone());
        }

        let exp = self.exp.min(rhs.exp);
        let a = &self.coeff * util::ten_pow(self.exp.abs_diff(exp));
        let b = &rhs.coeff * util::ten_pow(rhs.exp.abs_diff(exp));
        let (q, r) = a.div_rem(&b);
        (Self::finite(q, 0), Self::finite(r, exp))
    }

    /// Raises the value to an integer power.
    ///
    /// A non-negative `n` multiplies exactly: the significand
    /// is raised to `n` and the exponent is multiplied by `n`.
    /// A negative `n` is computed as the reciprocal via
    /// [`divide`][Self::divide], so a context is required
    /// whenever the reciprocal does not terminate.
    ///
    /// `x^0 == 1` for every non-NaN `x`, including zero and
    /// the infinities.
    pub fn pow(&self, n: i64, ctx: Option<&Context>) -> Self {
        if self.is_signaling() {
            return Self::invalid(Condition::INVALID_OPERATION);
        }
        if self.is_nan() {
            return Self::nan();
        }
        if n == 0 {
            return Self::one();
        }
        if self.is_infinite() {
            if n < 0 {
                return Self::zero();
            }
            let sign = if self.is_negative() && n % 2 != 0 { -1 } else { 1 };
            return Self::special(Kind::Infinite, sign);
        }
        if n < 0 {
            let denom = self.pow_unsigned(n.unsigned_abs());
            return Self::one().divide(&denom, ctx);
        }
        let out = self.pow_unsigned(n.unsigned_abs());
        match ctx {
            Some(ctx) => out.round(ctx),
            None => out,
        }
    }

    fn pow_unsigned(&self, n: u64) -> Self {
        debug_assert!(self.is_finite());
        debug_assert!(n > 0);

        let Some(exp) = i64::try_from(n)
            .ok()
            .and_then(|n| self.exp.checked_mul(n))
        else {
            return Self::invalid(Condition::INVALID_OPERATION);
        };
        Self::finite(Pow::pow(&self.coeff, n), exp)
    }

    /// Three-way comparison by numeric value.
    ///
    /// Returns `None` if either operand is NaN; a signaling
    /// NaN additionally raises `INVALID_OPERATION`. Trailing
    /// zeros do not matter: `7.0` compares equal to `7`.
    pub fn compare(&self, rhs: &Self) -> Option<Ordering> {
        if self.is_signaling() || rhs.is_signaling() {
            raise(Condition::INVALID_OPERATION);
            return None;
        }
        if self.is_nan() || rhs.is_nan() {
            return None;
        }

        let (sa, sb) = (self.signum(), rhs.signum());
        match (self.is_infinite(), rhs.is_infinite()) {
            (true, true) => return Some(sa.cmp(&sb)),
            (true, false) => {
                return Some(if sa > 0 { Ordering::Greater } else { Ordering::Less })
            }
            (false, true) => {
                return Some(if sb > 0 { Ordering::Less } else { Ordering::Greater })
            }
            (false, false) => {}
        }
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        if sa == 0 {
            return Some(Ordering::Equal);
        }

        // Same sign, both finite and non-zero. Compare the
        // magnitude order first so that values of wildly
        // different scale (say 1E+999999999 versus 1) never
        // materialize a scaled significand.
        let adj_a = self.exp as i128 + self.digits as i128;
        let adj_b = rhs.exp as i128 + rhs.digits as i128;
        if adj_a != adj_b {
            let ord = adj_a.cmp(&adj_b);
            return Some(if sa < 0 { ord.reverse() } else { ord });
        }

        // Equal magnitude order: align and compare exactly.
        let exp = self.exp.min(rhs.exp);
        let a = &self.coeff * util::ten_pow(self.exp.abs_diff(exp));
        let b = &rhs.coeff * util::ten_pow(rhs.exp.abs_diff(exp));
        Some(a.cmp(&b))
    }

    /// Returns the smaller of two values, by [`compare`][Self::compare].
    ///
    /// Returns NaN if either operand is NaN.
    pub fn min(&self, rhs: &Self) -> Self {
        match self.compare(rhs) {
            Some(Ordering::Greater) => rhs.clone(),
            Some(_) => self.clone(),
            None => Self::nan(),
        }
    }

    /// Returns the larger of two values, by [`compare`][Self::compare].
    ///
    /// Returns NaN if either operand is NaN.
    pub fn max(&self, rhs: &Self) -> Self {
        match self.compare(rhs) {
            Some(Ordering::Less) => rhs.clone(),
            Some(_) => self.clone(),
            None => Self::nan(),
        }
    }
}

/// Applies a sign to a magnitude.
fn signed(mag: BigUint, neg: bool) -> BigInt {
    if neg {
        -BigInt::from(mag)
    } else {
        BigInt::from(mag)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        self.add_impl(rhs)
    }
}
forward_ref_binop!(impl Add, add for Decimal, Decimal);

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        self.add_impl(&rhs.neg_impl())
    }
}
forward_ref_binop!(impl Sub, sub for Decimal, Decimal);

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        self.mul_impl(rhs)
    }
}
forward_ref_binop!(impl Mul, mul for Decimal, Decimal);

impl Div<&Decimal> for &Decimal {
    type Output = Decimal;

    fn div(self, rhs: &Decimal) -> Decimal {
        self.divide(rhs, None)
    }
}
forward_ref_binop!(impl Div, div for Decimal, Decimal);

impl Rem<&Decimal> for &Decimal {
    type Output = Decimal;

    fn rem(self, rhs: &Decimal) -> Decimal {
        self.div_rem(rhs).1
    }
}
forward_ref_binop!(impl Rem, rem for Decimal, Decimal);

impl Neg for &Decimal {
    type Output = Decimal;

    /// Negates the value.
    ///
    /// Negating a zero is a no-op: there is no negative zero.
    fn neg(self) -> Decimal {
        self.neg_impl()
    }
}
forward_ref_unop!(impl Neg, neg for Decimal);

impl PartialEq for Decimal {
    /// Value equality: `7.0 == 7`. Any NaN operand makes every
    /// comparison except `!=` false.
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl Zero for Decimal {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        self.is_zero()
    }
}

impl One for Decimal {
    fn one() -> Self {
        Self::one()
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for Decimal {
    fn from(coeff: BigInt) -> Self {
        Self::finite(coeff, 0)
    }
}

impl From<f64> for Decimal {
    fn from(x: f64) -> Self {
        Self::from_f64(x)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Decimal {
                fn from(n: $ty) -> Self {
                    Self::finite(BigInt::from(n), 0)
                }
            }
        )+
    };
}
impl_from_int!(i32, u32, i64, u64, i128, u128);

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = u8::from(self.is_negative());
        match self.kind {
            Kind::QNan => write!(f, "[{sign},qNaN]"),
            Kind::SNan => write!(f, "[{sign},sNaN]"),
            Kind::Infinite => write!(f, "[{sign},inf]"),
            Kind::Finite => write!(f, "[{sign},{},{}]", self.coeff.magnitude(), self.exp),
        }
    }
}
