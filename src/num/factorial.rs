// SPDX-License-Identifier: MPL-2.0

//! Factorial number system representation.
//!
//! The magnitude is `Σ d_i · i!` over coefficients `0 <= d_i <= i`,
//! bit-packed into the word vector by [`codec`](crate::num::codec). The
//! base at position `i` is `i + 1`, so addition and subtraction ripple
//! with a per-position radix; multiplication and division convert through
//! the decimal kernel and back.

use std::fmt;

use itertools::Itertools;

use crate::decimal::{self, Trim};
use crate::error::{Error, Result};
use crate::num::codec;
use crate::num::storage::Storage;
use crate::num::word::Word;

/// An arbitrary-precision signed integer stored in the factorial number
/// system.
///
/// The canonical zero has an empty word vector. A nonzero value keeps its
/// highest populated coefficient index in the storage's aux field, its
/// top coefficient is nonzero, and the word vector holds exactly the
/// words its coefficients occupy.
#[derive(Clone, Default)]
pub struct Factorial<W: Word = u8> {
    pub(crate) storage: Storage<W>,
}

impl<W: Word> fmt::Debug for Factorial<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coefficients = (0..=self.storage.aux()).map(|i| self.digit(i)).join(", ");
        write!(
            f,
            "Factorial {{ {}[{coefficients}] }}",
            if self.is_negative() { "-" } else { "" },
        )
    }
}

impl<W: Word> Factorial<W> {
    pub fn is_zero(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.storage.sign()
    }

    /// Sets the sign; a zero magnitude stays positive.
    pub fn set_sign(&mut self, negative: bool) {
        self.storage.set_sign(negative && !self.is_zero());
    }

    pub(crate) fn with_sign(mut self, negative: bool) -> Self {
        self.set_sign(negative);
        self
    }

    /// Coefficient `index`, or `None` once its bit slice lies beyond the
    /// stored words.
    fn read(&self, index: u64) -> Option<u64> {
        codec::extract(&self.storage, index).ok().flatten()
    }

    /// Coefficient `index`, defaulting the unpopulated tail to 0.
    fn digit(&self, index: u64) -> u64 {
        self.read(index).unwrap_or(0)
    }

    /// The ripple kernels only produce in-base coefficients, so a write
    /// can fail solely on a broken internal invariant.
    fn write(&mut self, index: u64, value: u64) {
        codec::put(&mut self.storage, index, value)
            .expect("ripple kernels keep coefficients within base");
    }

    /// Restores the canonical form: the word vector is cut down to the
    /// words covering the top nonzero coefficient (emptied entirely for
    /// zero), aux points at that coefficient, zero is positive.
    fn canonicalize(&mut self) {
        let top = (1..=self.storage.aux())
            .rev()
            .find(|&index| self.digit(index) != 0);
        match top {
            None => {
                self.storage.clear();
                self.storage.set_aux(0);
                self.storage.set_sign(false);
            }
            Some(top) => {
                let bits = codec::offset(top) + u128::from(codec::width(top));
                let words = bits.div_ceil(u128::from(W::BITS)) as usize;
                self.storage.words_mut().truncate(words);
                self.storage.set_aux(top);
            }
        }
    }

    // ---- decimal bridge ----

    pub(crate) fn from_decimal(s: &str) -> Result<Self> {
        if !decimal::is_valid_integral(s) {
            return Err(Error::Parse(s.to_owned()));
        }
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits == "0" {
            return Ok(Self::default());
        }

        // d_i is the remainder of successive division by i + 1
        let mut coefficients: Vec<u64> = Vec::new();
        let mut value = digits.to_owned();
        let mut index = 0u64;
        while value != "0" {
            let (quotient, remainder) = decimal::div_small(&value, index + 1)?;
            coefficients.push(remainder);
            value = quotient;
            index += 1;
        }
        decimal::trim_zeros(&mut coefficients, 0, Trim::Trailing);

        let mut out = Self::default();
        for (index, &coefficient) in coefficients.iter().enumerate() {
            codec::put(&mut out.storage, index as u64, coefficient)?;
        }
        Ok(out.with_sign(negative))
    }

    pub(crate) fn to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_owned();
        }

        let mut sum = "0".to_owned();
        let mut factorial = "1".to_owned(); // 0!
        for index in 0..=self.storage.aux() {
            let coefficient = self.digit(index);
            if coefficient != 0 {
                sum = decimal::add(&sum, &decimal::mul_small(&factorial, coefficient));
            }
            factorial = decimal::mul_small(&factorial, index + 1);
        }

        if self.is_negative() {
            format!("-{sum}")
        } else {
            sum
        }
    }

    // ---- native bridge ----

    pub(crate) fn from_parts(magnitude: u64, negative: bool) -> Self {
        let mut out = Self::default();
        let mut rest = magnitude;
        let mut base = 1u64;
        while rest != 0 {
            out.write(base - 1, rest % base);
            rest /= base;
            base += 1;
        }
        out.with_sign(negative)
    }

    /// Rebuilds `Σ d_i · i!` with checked steps; any digit the running
    /// factorial can no longer carry means the value exceeds `u64`.
    pub(crate) fn to_u64_abs(&self) -> Result<u64> {
        let mut result = 0u64;
        let mut factorial = 1u64;
        let top = self.storage.aux();
        for index in 0..=top {
            let coefficient = self.digit(index);
            if coefficient != 0 {
                let term = factorial.checked_mul(coefficient).ok_or(Error::Overflow)?;
                result = result.checked_add(term).ok_or(Error::Overflow)?;
            }
            if index < top {
                factorial = match factorial.checked_mul(index + 1) {
                    Some(next) => next,
                    None => {
                        if (index + 1..=top).any(|i| self.digit(i) != 0) {
                            return Err(Error::Overflow);
                        }
                        break;
                    }
                };
            }
        }
        Ok(result)
    }

    // ---- comparison ----

    pub(crate) fn cmp_abs(&self, other: &Self) -> std::cmp::Ordering {
        let top = self.storage.aux().max(other.storage.aux());
        for index in (0..=top).rev() {
            let ordering = self.digit(index).cmp(&other.digit(index));
            if ordering.is_ne() {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    }

    pub(crate) fn cmp_value(&self, other: &Self) -> std::cmp::Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (negative, _) => {
                let ordering = self.cmp_abs(other);
                if negative {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    }

    // ---- magnitude kernels ----

    /// Mixed-radix ripple: position `i` wraps at base `i + 1`.
    pub(crate) fn add_abs(&self, rhs: &Self) -> Self {
        let mut out = Self::default();
        let mut carry = 0u64;
        let mut index = 0u64;
        loop {
            let a = self.read(index);
            let b = rhs.read(index);
            if a.is_none() && b.is_none() && carry == 0 {
                break;
            }

            let base = index + 1;
            let mut sum = a.unwrap_or(0) + b.unwrap_or(0) + carry;
            carry = 0;
            if sum >= base {
                carry = 1;
                sum -= base;
            }
            out.write(index, sum);
            index += 1;
        }
        out.canonicalize();
        out
    }

    pub(crate) fn sub_abs(&self, rhs: &Self) -> Self {
        assert!(
            self.cmp_abs(rhs).is_ge(),
            "magnitude subtraction needs |lhs| >= |rhs|"
        );
        let mut out = Self::default();
        let mut borrow = 0u64;
        let mut index = 0u64;
        loop {
            let a = self.read(index);
            let b = rhs.read(index);
            if a.is_none() && b.is_none() && borrow == 0 {
                break;
            }

            let base = index + 1;
            let minuend = a.unwrap_or(0);
            let subtrahend = b.unwrap_or(0) + borrow;
            let diff = if minuend < subtrahend {
                borrow = 1;
                minuend + base - subtrahend
            } else {
                borrow = 0;
                minuend - subtrahend
            };
            out.write(index, diff);
            index += 1;
        }
        out.canonicalize();
        out
    }

    /// Multiplication runs in decimal: format, multiply, parse back.
    /// Slow, but exact for any operand size.
    pub(crate) fn mul_values(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::default();
        }
        let product = decimal::mul(&self.magnitude_decimal(), &rhs.magnitude_decimal());
        Self::from_magnitude(&product).with_sign(self.is_negative() != rhs.is_negative())
    }

    pub(crate) fn div_values(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::default());
        }
        let (quotient, _) = decimal::div(&self.magnitude_decimal(), &rhs.magnitude_decimal())?;
        Ok(Self::from_magnitude(&quotient).with_sign(self.is_negative() != rhs.is_negative()))
    }

    /// The long division already yields the remainder string; it keeps
    /// the dividend's sign.
    pub(crate) fn rem_values(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::default());
        }
        let (_, remainder) = decimal::div(&self.magnitude_decimal(), &rhs.magnitude_decimal())?;
        Ok(Self::from_magnitude(&remainder).with_sign(self.is_negative()))
    }

    fn magnitude_decimal(&self) -> String {
        let mut s = self.to_decimal();
        if s.starts_with('-') {
            s.remove(0);
        }
        s
    }

    fn from_magnitude(digits: &str) -> Self {
        Self::from_decimal(digits).expect("decimal kernel emits normalized strings")
    }
}
