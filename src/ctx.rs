use core::cell::Cell;

use bitflags::bitflags;

/// Rounding mode and working precision for inexact operations.
///
/// A `Context` never modifies a [`Decimal`][crate::Decimal] in
/// place; operations taking a context return a new, rounded
/// value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Context {
    rounding: RoundingMode,
    precision: u32,
}

impl Context {
    /// The precision and rounding of IEEE 754-2008 decimal32.
    pub const DECIMAL32: Self = Self::new(7, RoundingMode::ToNearestEven);
    /// The precision and rounding of IEEE 754-2008 decimal64.
    pub const DECIMAL64: Self = Self::new(16, RoundingMode::ToNearestEven);
    /// The precision and rounding of IEEE 754-2008 decimal128.
    pub const DECIMAL128: Self = Self::new(34, RoundingMode::ToNearestEven);

    /// Creates a context with the given precision and rounding
    /// mode.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero. A zero-digit result is
    /// not representable, so this is a bug in the caller.
    pub const fn new(precision: u32, rounding: RoundingMode) -> Self {
        assert!(precision > 0, "context precision must be non-zero");

        Self {
            rounding,
            precision,
        }
    }

    /// Returns the same context with a different rounding mode.
    pub const fn with_rounding_mode(self, mode: RoundingMode) -> Self {
        let mut ctx = self;
        ctx.rounding = mode;
        ctx
    }

    /// Returns the same context with a different precision.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero.
    pub const fn with_precision(self, precision: u32) -> Self {
        Self::new(precision, self.rounding)
    }

    /// Returns the rounding mode.
    pub const fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    /// Returns the precision in decimal digits.
    pub const fn precision(&self) -> u32 {
        self.precision
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::DECIMAL128
    }
}

/// How to choose the result when a value must be shortened to
/// fewer digits than it has.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub enum RoundingMode {
    /// IEEE 754-2008 roundTiesToEven.
    ///
    /// - Under 0.5 rounds down.
    /// - Over 0.5 rounds up.
    /// - Exactly 0.5 rounds to the nearest even.
    #[default]
    ToNearestEven,
    /// IEEE 754-2008 roundTiesToAway.
    ///
    /// Like [`ToNearestEven`][Self::ToNearestEven], except that
    /// 0.5 rounds away from zero.
    ToNearestAway,
    /// IEEE 754-2008 roundTowardZero.
    ///
    /// AKA truncation.
    TowardZero,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Rounds away from zero if any digit is discarded.
    AwayFromZero,
    /// IEEE 754-2008 roundTowardNegative.
    ///
    /// AKA floor.
    TowardNegativeInf,
    /// IEEE 754-2008 roundTowardPositive.
    ///
    /// AKA ceiling.
    TowardPositiveInf,
}

bitflags! {
    /// An exceptional condition raised during or after an
    /// operation.
    ///
    /// Conditions accumulate in thread-local state; see
    /// [`status`], [`take_status`], and [`clear_status`].
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Condition: u32 {
        /// Occurs when a string is converted to a decimal and
        /// does not have a valid syntax, or when a byte
        /// encoding cannot be decoded.
        const CONVERSION_SYNTAX = 0x1;
        /// Occurs when division is attempted with a finite,
        /// non-zero dividend and a divisor with a value of
        /// zero.
        const DIVISION_BY_ZERO = 0x2;
        /// Occurs when a quotient has an infinite decimal
        /// expansion and no context was supplied to round it.
        const DIVISION_IMPOSSIBLE = 0x4;
        /// Occurs when division is attempted in which both the
        /// dividend and divisor are zero.
        const DIVISION_UNDEFINED = 0x8;
        /// Occurs when:
        ///
        /// - An operand to an operation is a signaling NaN.
        /// - An attempt is made to add or subtract infinities
        ///   of opposite signs.
        /// - An attempt is made to multiply zero by an infinity
        ///   of either sign.
        /// - An attempt is made to divide an infinity by an
        ///   infinity.
        /// - The dividend of an integer-division or remainder
        ///   operation is an infinity, or its divisor is zero.
        /// - A NaN is rounded.
        const INVALID_OPERATION = 0x10;
        /// Occurs when the adjusted exponent, after rounding,
        /// would be greater than the maximum allowed exponent
        /// of an interchange format.
        const OVERFLOW = 0x20;
    }
}

std::thread_local! {
    static STATUS: Cell<u32> = const { Cell::new(0) };
}

/// Adds `cond` to the current thread's status.
pub(crate) fn raise(cond: Condition) {
    STATUS.with(|s| s.set(s.get() | cond.bits()));
}

/// Returns the conditions raised on the current thread since
/// the last [`clear_status`] or [`take_status`].
pub fn status() -> Condition {
    Condition::from_bits_retain(STATUS.with(Cell::get))
}

/// Returns the accumulated conditions and clears them.
pub fn take_status() -> Condition {
    Condition::from_bits_retain(STATUS.with(|s| s.replace(0)))
}

/// Clears the accumulated conditions.
pub fn clear_status() {
    STATUS.with(|s| s.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builders() {
        let ctx = Context::new(5, RoundingMode::TowardZero);
        assert_eq!(ctx.precision(), 5);
        assert_eq!(ctx.rounding_mode(), RoundingMode::TowardZero);

        let ctx = ctx
            .with_precision(9)
            .with_rounding_mode(RoundingMode::AwayFromZero);
        assert_eq!(ctx.precision(), 9);
        assert_eq!(ctx.rounding_mode(), RoundingMode::AwayFromZero);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Context::DECIMAL32.precision(), 7);
        assert_eq!(Context::DECIMAL64.precision(), 16);
        assert_eq!(Context::DECIMAL128.precision(), 34);
        for ctx in [
            Context::DECIMAL32,
            Context::DECIMAL64,
            Context::DECIMAL128,
        ] {
            assert_eq!(ctx.rounding_mode(), RoundingMode::ToNearestEven);
        }
    }

    #[test]
    #[should_panic(expected = "precision must be non-zero")]
    fn test_zero_precision() {
        let _ = Context::DECIMAL32.with_precision(0);
    }

    #[test]
    fn test_status() {
        clear_status();
        assert_eq!(status(), Condition::empty());

        raise(Condition::DIVISION_UNDEFINED);
        raise(Condition::INVALID_OPERATION);
        assert_eq!(
            status(),
            Condition::DIVISION_UNDEFINED | Condition::INVALID_OPERATION
        );

        let taken = take_status();
        assert_eq!(
            taken,
            Condition::DIVISION_UNDEFINED | Condition::INVALID_OPERATION
        );
        assert_eq!(status(), Condition::empty());
    }
}
