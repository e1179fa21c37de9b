use num_bigint::{BigInt, BigUint};
use num_traits::{Pow, Zero};

/// Powers of ten that fit in a `u128`.
///
/// 10^38 is the largest power of ten representable in 128 bits,
/// so the table covers exponents in [0, 38].
pub(crate) const POW10: [u128; 39] = {
    let mut table = [0u128; 39];
    let mut i = 0;
    let mut p: u128 = 1;
    while i < 39 {
        table[i] = p;
        if i < 38 {
            p *= 10;
        }
        i += 1;
    }
    table
};

/// Returns 10^n.
pub(crate) fn ten_pow(n: u64) -> BigInt {
    if let Some(&p) = POW10.get(n as usize) {
        BigInt::from(p)
    } else {
        BigInt::from(10u8).pow(n)
    }
}

/// Returns the number of decimal digits in `n`.
///
/// `n` must be non-zero.
const fn digits_u128(n: u128) -> u64 {
    debug_assert!(n > 0);

    // `bits * log10(2)` slightly underestimates, so the result
    // is either `est` or `est+1` (or `est+2` right at a power
    // of ten boundary).
    let bits = 128 - n.leading_zeros();
    let est = ((bits as u64) * 1233) >> 12;
    if est < 38 && n >= POW10[(est + 1) as usize] {
        est + 2
    } else if est <= 38 && n >= POW10[est as usize] {
        est + 1
    } else {
        est
    }
}

/// Returns the number of decimal digits in `|n|`.
///
/// Zero has one digit.
pub(crate) fn digits(n: &BigInt) -> u64 {
    digits_uint(n.magnitude())
}

/// Returns the number of decimal digits in `n`.
///
/// Zero has one digit.
pub(crate) fn digits_uint(n: &BigUint) -> u64 {
    if n.is_zero() {
        return 1;
    }
    if let Ok(small) = u128::try_from(n) {
        return digits_u128(small);
    }

    // Same estimate as `digits_u128`, but the drift grows with
    // the bit length (1233/4096 undershoots log10(2) by about
    // 4.6e-6 per bit), so the correction must loop.
    let mut est = (n.bits() * 1233) >> 12;
    let mut pow = ten_pow(est);
    while *n >= *pow.magnitude() {
        est += 1;
        pow *= 10;
    }
    est
}

/// Strips all factors of `f` from `n`, returning the reduced
/// value and the number of factors removed.
///
/// `n` must be non-zero and `f` must be at least 2.
pub(crate) fn strip_factor(n: BigUint, f: u32) -> (BigUint, u64) {
    debug_assert!(!n.is_zero());
    debug_assert!(f >= 2);

    let f = BigUint::from(f);
    let mut n = n;
    let mut count = 0;
    loop {
        let (q, r) = num_integer::div_rem(n.clone(), f.clone());
        if !r.is_zero() {
            return (n, count);
        }
        n = q;
        count += 1;
    }
}

/// Extracts bits `[lo, hi)` of `x`.
pub(crate) const fn get_bits(x: u128, lo: u32, hi: u32) -> u128 {
    debug_assert!(lo < hi);
    debug_assert!(hi <= 128);

    let mask = if hi == 128 {
        u128::MAX
    } else {
        (1 << hi) - 1
    };
    (x & mask) >> lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_u128() {
        for d in 1..=38u32 {
            let lo = 10u128.pow(d - 1);
            assert_eq!(digits_u128(lo), u64::from(d), "10^{}", d - 1);
            if d > 1 {
                assert_eq!(digits_u128(lo - 1), u64::from(d) - 1);
            }
            assert_eq!(digits_u128(lo + 1), u64::from(d));
        }
        assert_eq!(digits_u128(1), 1);
        assert_eq!(digits_u128(9), 1);
        assert_eq!(digits_u128(u128::MAX), 39);
    }

    #[test]
    fn test_digits_bigint() {
        assert_eq!(digits(&BigInt::from(0)), 1);
        assert_eq!(digits(&BigInt::from(-999)), 3);

        let mut n = BigInt::from(1);
        for d in 1..200u64 {
            assert_eq!(digits(&n), d, "digit count of 10^{}", d - 1);
            if d > 1 {
                assert_eq!(digits(&(&n - 1)), d - 1);
            }
            n *= 10;
        }
    }

    #[test]
    fn test_digits_huge() {
        // At a few hundred thousand bits the log10(2) estimate
        // is short by more than one digit, so a single-step
        // correction undercounts.
        let n = BigInt::from(10).pow(100_000u32);
        assert_eq!(digits(&n), 100_001);
        assert_eq!(digits(&(&n - 1)), 100_000);
        assert_eq!(digits(&-(&n * 7i32)), 100_001);
    }

    #[test]
    fn test_ten_pow() {
        let mut want = BigInt::from(1);
        for n in 0..100 {
            assert_eq!(ten_pow(n), want);
            want *= 10;
        }
    }

    #[test]
    fn test_strip_factor() {
        let (rest, count) = strip_factor(BigUint::from(40u32), 2);
        assert_eq!((rest, count), (BigUint::from(5u32), 3));

        let (rest, count) = strip_factor(BigUint::from(40u32), 5);
        assert_eq!((rest, count), (BigUint::from(8u32), 1));

        let (rest, count) = strip_factor(BigUint::from(7u32), 2);
        assert_eq!((rest, count), (BigUint::from(7u32), 0));
    }

    #[test]
    fn test_get_bits() {
        let x = 0xA23003D0u128;
        assert_eq!(get_bits(x, 0, 10), 0x3D0);
        assert_eq!(get_bits(x, 31, 32), 1);
        assert_eq!(get_bits(x, 26, 31), 0b01000);
    }
}
