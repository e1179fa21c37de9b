//! IEEE 754-2008 decimal interchange formats.
//!
//! The three widths share one pack/unpack engine working in
//! `u128`, parameterized by a [`Layout`] describing the width.
//!
//! Bit layout, from the top: a sign bit, a five-bit combination
//! field, an exponent continuation, and the trailing
//! significand. The combination field distinguishes finite
//! values from infinities and NaNs and, for finite values,
//! merges the top two biased-exponent bits with the most
//! significant digit. A leading digit of 8 or 9 only has one
//! significant low bit, which frees one bit for the exponent
//! (the "large significand" form).

use num_bigint::BigInt;

use crate::ctx::{raise, Condition, Context, RoundingMode};
use crate::dec::Decimal;
use crate::util::{self, POW10};

pub(crate) mod dpd;

/// How an interchange format stores its significand.
///
/// The exponent and special-value bits are identical in both;
/// only the significand field differs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Encoding {
    /// Binary integer decimal: the significand is a plain
    /// binary integer.
    Bid,
    /// Densely packed decimal: the significand is a leading
    /// digit in the combination field plus 10-bit declets.
    Dpd,
}

/// One interchange width.
///
/// Everything else (field positions, the biased-exponent limit,
/// the declet count) derives from these four constants.
struct Layout {
    /// Total width in bits.
    bits: u32,
    /// Biased exponent width, including the two bits folded
    /// into the combination field.
    exp_bits: u32,
    /// Significand capacity in decimal digits.
    digits: u32,
    /// Exponent bias.
    bias: i64,
}

const D32: Layout = Layout {
    bits: 32,
    exp_bits: 8,
    digits: 7,
    bias: 101,
};

const D64: Layout = Layout {
    bits: 64,
    exp_bits: 10,
    digits: 16,
    bias: 398,
};

const D128: Layout = Layout {
    bits: 128,
    exp_bits: 14,
    digits: 34,
    bias: 6176,
};

impl Layout {
    const fn sign_shift(&self) -> u32 {
        self.bits - 1
    }

    /// Position of the five-bit combination field.
    const fn comb_shift(&self) -> u32 {
        self.bits - 6
    }

    /// Exponent continuation width: the biased exponent minus
    /// the two bits in the combination field.
    const fn econ_bits(&self) -> u32 {
        self.exp_bits - 2
    }

    /// Trailing significand width.
    const fn trailing_bits(&self) -> u32 {
        self.bits - 6 - self.econ_bits()
    }

    /// Largest biased exponent. The top quarter of the
    /// two-bit space marks specials, so this is 3/4 of
    /// `2^exp_bits`, less one.
    const fn exp_limit(&self) -> i64 {
        3 * (1 << self.econ_bits()) - 1
    }

    const fn declets(&self) -> u32 {
        (self.digits - 1) / 3
    }

    const fn max_coeff(&self) -> u128 {
        POW10[self.digits as usize] - 1
    }
}

const fn mask(bits: u32) -> u128 {
    (1 << bits) - 1
}

fn pack(d: &Decimal, lt: &Layout, enc: Encoding) -> u128 {
    let sign = u128::from(d.is_negative()) << lt.sign_shift();
    if d.is_nan() {
        let mut bits = sign | 0x1f << lt.comb_shift();
        if d.is_signaling() {
            bits |= 1 << (lt.sign_shift() - 6);
        }
        return bits;
    }
    if d.is_infinite() {
        return sign | 0x1e << lt.comb_shift();
    }

    let rounded = d.round(&Context::new(lt.digits, RoundingMode::ToNearestEven));
    let mut coeff = u128::try_from(rounded.coefficient().magnitude())
        .expect("rounded significand fits in 128 bits");
    let mut exp = rounded.exponent();

    // Fold the exponent into the format's range. Too large:
    // pad the significand with trailing zeros, overflowing to
    // infinity if it runs out of room. Too small: drop trailing
    // digits, bottoming out at zero.
    let max_exp = lt.exp_limit() - lt.bias;
    let min_exp = -lt.bias;
    if coeff == 0 {
        exp = exp.clamp(min_exp, max_exp);
    } else if exp > max_exp {
        let shift = exp.abs_diff(max_exp);
        if shift > u64::from(lt.digits) - rounded.precision() {
            raise(Condition::OVERFLOW);
            return sign | 0x1e << lt.comb_shift();
        }
        coeff *= POW10[shift as usize];
        exp = max_exp;
    } else if exp < min_exp {
        let shift = exp.abs_diff(min_exp);
        coeff = match POW10.get(shift as usize) {
            Some(&p) => coeff / p,
            None => 0,
        };
        exp = min_exp;
    }
    debug_assert!(coeff <= lt.max_coeff());
    let biased = (exp + lt.bias) as u128;

    let t = lt.trailing_bits();
    match enc {
        Encoding::Bid => {
            if coeff < 1 << (t + 3) {
                sign | biased << (t + 3) | coeff
            } else {
                // The significand's top bits are the implied
                // `100`; the exponent shifts down two.
                sign | 0b11 << (lt.sign_shift() - 2) | biased << (t + 1) | (coeff & mask(t + 1))
            }
        }
        Encoding::Dpd => {
            let msd = coeff / POW10[(lt.digits - 1) as usize];
            let mut rest = coeff % POW10[(lt.digits - 1) as usize];
            let mut declets: u128 = 0;
            for i in 0..lt.declets() {
                let declet = dpd::pack((rest % 1000) as u16);
                declets |= u128::from(declet) << (10 * i);
                rest /= 1000;
            }
            let exphi = biased >> lt.econ_bits();
            let comb = if msd <= 7 {
                exphi << 3 | msd
            } else {
                0b11000 | exphi << 1 | (msd & 1)
            };
            sign | comb << lt.comb_shift() | (biased & mask(lt.econ_bits())) << t | declets
        }
    }
}

fn unpack(bits: u128, lt: &Layout, enc: Encoding) -> Decimal {
    let neg = bits >> lt.sign_shift() & 1 == 1;
    let comb = util::get_bits(bits, lt.comb_shift(), lt.sign_shift());
    if comb == 0x1f {
        // Payloads are dropped; the model doesn't carry them.
        return if bits >> (lt.sign_shift() - 6) & 1 == 1 {
            Decimal::snan()
        } else {
            Decimal::nan()
        };
    }
    if comb == 0x1e {
        return if neg {
            Decimal::neg_infinity()
        } else {
            Decimal::infinity()
        };
    }

    let t = lt.trailing_bits();
    let (biased, coeff) = match enc {
        Encoding::Bid => {
            if comb >> 3 == 0b11 {
                let biased = util::get_bits(bits, t + 1, t + 1 + lt.exp_bits);
                (biased, 1 << (t + 3) | (bits & mask(t + 1)))
            } else {
                let biased = util::get_bits(bits, t + 3, t + 3 + lt.exp_bits);
                (biased, bits & mask(t + 3))
            }
        }
        Encoding::Dpd => {
            let (exphi, msd) = if comb >= 0b11000 {
                (comb >> 1 & 0b11, 8 + (comb & 1))
            } else {
                (comb >> 3, comb & 0b111)
            };
            let biased = exphi << lt.econ_bits() | util::get_bits(bits, t, t + lt.econ_bits());
            let mut coeff = msd;
            for i in (0..lt.declets()).rev() {
                let code = (bits >> (10 * i)) as u16 & 0x3ff;
                coeff = coeff * 1000 + u128::from(dpd::unpack(code));
            }
            (biased, coeff)
        }
    };

    // A significand over the digit capacity is non-canonical
    // and reads as zero.
    let coeff = if coeff > lt.max_coeff() { 0 } else { coeff };
    let coeff = if neg {
        -BigInt::from(coeff)
    } else {
        BigInt::from(coeff)
    };
    Decimal::finite(coeff, biased as i64 - lt.bias)
}

impl Decimal {
    /// Packs the value into the 32-bit interchange format.
    ///
    /// The value is rounded to seven digits with
    /// [`ToNearestEven`][RoundingMode::ToNearestEven]. An
    /// exponent beyond the format's range overflows to infinity
    /// and raises [`OVERFLOW`][Condition::OVERFLOW], or
    /// underflows toward zero by dropping trailing digits.
    pub fn to_decimal32(&self, enc: Encoding) -> u32 {
        pack(self, &D32, enc) as u32
    }

    /// Packs the value into the 64-bit interchange format.
    ///
    /// Rounds to 16 digits; see [`to_decimal32`][Self::to_decimal32].
    pub fn to_decimal64(&self, enc: Encoding) -> u64 {
        pack(self, &D64, enc) as u64
    }

    /// Packs the value into the 128-bit interchange format.
    ///
    /// Rounds to 34 digits; see [`to_decimal32`][Self::to_decimal32].
    pub fn to_decimal128(&self, enc: Encoding) -> u128 {
        pack(self, &D128, enc)
    }

    /// Unpacks a 32-bit interchange bit pattern. Exact.
    pub fn from_decimal32(bits: u32, enc: Encoding) -> Self {
        unpack(u128::from(bits), &D32, enc)
    }

    /// Unpacks a 64-bit interchange bit pattern. Exact.
    pub fn from_decimal64(bits: u64, enc: Encoding) -> Self {
        unpack(u128::from(bits), &D64, enc)
    }

    /// Unpacks a 128-bit interchange bit pattern. Exact.
    pub fn from_decimal128(bits: u128, enc: Encoding) -> Self {
        unpack(bits, &D128, enc)
    }
}
