//! The densely packed decimal declet codec.
//!
//! A declet stores three decimal digits in 10 bits. A digit in
//! [0, 7] needs three bits; a digit in {8, 9} carries only its
//! low bit, since its high bit is implied. The encoding is an
//! eight-way case split on which of the hundreds, tens, and
//! ones digits is large, steered by bit 3 and up to four
//! selector bits below it.
//!
//! See IEEE 754-2008 section 3.5.2 and Cowlishaw, "Densely
//! packed decimal encoding" (2002).

/// Packs three decimal digits into a declet.
///
/// `d` must be in [0, 999]. The result is always canonical.
pub(crate) const fn pack(d: u16) -> u16 {
    debug_assert!(d <= 999);

    let h = d / 100;
    let t = (d / 10) % 10;
    let o = d % 10;

    match (h > 7, t > 7, o > 7) {
        // Three small digits, packed verbatim. Bit 3 is zero.
        (false, false, false) => h << 7 | t << 4 | o,
        // One large digit: its low bit lands in the slot the
        // selector bits leave open.
        (false, false, true) => h << 7 | t << 4 | 0b1000 | (o & 1),
        (false, true, false) => h << 7 | (o & 0b110) << 4 | (t & 1) << 4 | 0b1010 | (o & 1),
        (true, false, false) => (o & 0b110) << 7 | (h & 1) << 7 | t << 4 | 0b1100 | (o & 1),
        // Two large digits: the remaining small digit spreads
        // across the freed slots.
        (true, true, false) => (o & 0b110) << 7 | (h & 1) << 7 | (t & 1) << 4 | 0b1110 | (o & 1),
        (true, false, true) => (t & 0b110) << 7 | (h & 1) << 7 | 0b0100000 | (t & 1) << 4 | 0b1110 | (o & 1),
        (false, true, true) => h << 7 | 0b1000000 | (t & 1) << 4 | 0b1110 | (o & 1),
        // Three large digits: only the three low bits matter.
        (true, true, true) => (h & 1) << 7 | 0b1100000 | (t & 1) << 4 | 0b1110 | (o & 1),
    }
}

/// Unpacks a declet into three decimal digits.
///
/// Every `code` in [0, 1023] decodes to a value in [0, 999];
/// the 24 non-canonical codes alias canonical ones by ignoring
/// their don't-care bits.
pub(crate) fn unpack(code: u16) -> u16 {
    debug_assert!(code <= 0x3ff);

    let b = |hi: u32, lo: u32| -> u16 { (code >> lo) & ((1 << (hi - lo + 1)) - 1) };

    let (h, t, o) = if code & 0b1000 == 0 {
        // Three small digits.
        (b(9, 7), b(6, 4), b(2, 0))
    } else {
        match b(2, 1) {
            0b00 => (b(9, 7), b(6, 4), 8 + b(0, 0)),
            0b01 => (b(9, 7), 8 + b(4, 4), b(6, 5) << 1 | b(0, 0)),
            0b10 => (8 + b(7, 7), b(6, 4), b(9, 8) << 1 | b(0, 0)),
            _ => match b(6, 5) {
                0b00 => (8 + b(7, 7), 8 + b(4, 4), b(9, 8) << 1 | b(0, 0)),
                0b01 => (8 + b(7, 7), b(9, 8) << 1 | b(4, 4), 8 + b(0, 0)),
                0b10 => (b(9, 7), 8 + b(4, 4), 8 + b(0, 0)),
                _ => (8 + b(7, 7), 8 + b(4, 4), 8 + b(0, 0)),
            },
        }
    };
    h * 100 + t * 10 + o
}
