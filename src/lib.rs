//! `bigdec` is an arbitrary-precision decimal arithmetic crate
//! with IEEE 754-2008 interchange encodings.
//!
//! A [`Decimal`] is `coefficient × 10^exponent` with an
//! arbitrary-precision coefficient. Addition, subtraction, and
//! multiplication are always exact; division is exact when the
//! quotient terminates and otherwise needs a [`Context`] naming
//! a precision and [`RoundingMode`].
//!
//! Value-domain failures (bad syntax, `0/0`, `∞ − ∞`) never
//! panic. They produce a NaN and raise a [`Condition`] in a
//! thread-local status, readable with [`status`] and
//! [`take_status`].
//!
//! ```
//! use bigdec::{Context, Decimal, Encoding};
//!
//! let a = Decimal::parse("23.456");
//! let b = Decimal::parse("3849.235");
//! assert_eq!(&a + &b, Decimal::parse("3872.691"));
//!
//! let third = a.divide(&b, Some(&Context::DECIMAL64));
//! assert_eq!(third.to_string(), "0.006093678354270394");
//!
//! // IEEE 754-2008 decimal32, densely packed decimal.
//! let bits = Decimal::parse("-7.50").to_decimal32(Encoding::Dpd);
//! assert_eq!(bits, 0xA23003D0);
//! ```

#![allow(clippy::unusual_byte_groupings)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::transmute_ptr_to_ptr)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

mod bytes;
mod conv;
mod ctx;
mod dec;
mod interchange;
mod macros;
mod round;
mod util;

pub use conv::ParseError;
pub use ctx::{clear_status, status, take_status, Condition, Context, RoundingMode};
pub use dec::Decimal;
pub use interchange::Encoding;
