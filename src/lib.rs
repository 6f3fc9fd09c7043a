// SPDX-License-Identifier: MPL-2.0

//! Arbitrary-precision signed integers with two interchangeable internal
//! representations.
//!
//! [`Binary`] stores a magnitude as a little-endian vector of fixed-width
//! words (base 2^W). [`Factorial`] stores the same abstract values in the
//! factorial number system: a bit-packed sequence of coefficients `d_i`
//! with `0 <= d_i <= i`, so that the magnitude is `Σ d_i · i!`. Both forms
//! parse and print the same decimal grammar, compare the same way and
//! support the same arithmetic; for every pair of operands the two forms
//! agree as abstract integers.
//!
//! ```
//! use factoradic::{Binary, Factorial, isqrt};
//!
//! let a: Binary = "123456789012345678901234567890".parse().unwrap();
//! let b: Binary = "98765432109876543210987654321".parse().unwrap();
//! assert_eq!((&a + &b).to_string(), "222222221122222222112222222211");
//!
//! let f: Factorial = "-42".parse().unwrap();
//! assert_eq!((&f * &f).to_string(), "1764");
//!
//! let n: Binary = "99".parse().unwrap();
//! assert_eq!(isqrt(&n).unwrap().to_string(), "9");
//! ```

pub mod decimal;
pub mod num;

mod error;

pub use error::{Error, Result};
pub use num::{abs, binary::Binary, factorial::Factorial, isqrt, pow, Integer};
