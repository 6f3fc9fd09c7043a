// SPDX-License-Identifier: MPL-2.0

//! Base-2^W representation: the magnitude as a little-endian word vector.

use std::fmt;
use std::fmt::Write as _;

use itertools::{EitherOrBoth, Itertools};

use crate::decimal::{self, Trim};
use crate::error::{Error, Result};
use crate::num::storage::Storage;
use crate::num::word::Word;

/// An arbitrary-precision signed integer stored in base 2^W.
///
/// Word 0 is least significant. The canonical zero is a single zero word
/// with a positive sign; nonzero values carry no high-order zero words.
#[derive(Clone)]
pub struct Binary<W: Word = u8> {
    pub(crate) storage: Storage<W>,
}

impl<W: Word> Default for Binary<W> {
    fn default() -> Self {
        Self {
            storage: Storage::from_words(vec![W::default()]),
        }
    }
}

impl<W: Word> fmt::Debug for Binary<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary {{ {}0x[", if self.is_negative() { "-" } else { "" })?;
        for (pos, word) in self.storage.words().iter().rev().with_position() {
            write!(f, "{word:0width$x}", width = W::BITS as usize / 4)?;
            if matches!(pos, itertools::Position::First | itertools::Position::Middle) {
                f.write_str(", ")?;
            }
        }
        write!(f, "] }}")
    }
}

impl<W: Word> Binary<W> {
    pub fn is_zero(&self) -> bool {
        self.storage.words().iter().all(|&word| word == W::default())
    }

    pub fn is_negative(&self) -> bool {
        self.storage.sign()
    }

    /// Sets the sign; a zero magnitude stays positive.
    pub fn set_sign(&mut self, negative: bool) {
        self.storage.set_sign(negative && !self.is_zero());
    }

    pub(crate) fn from_words(words: Vec<W>) -> Self {
        let mut out = Self {
            storage: Storage::from_words(words),
        };
        out.canonicalize();
        out
    }

    pub(crate) fn with_sign(mut self, negative: bool) -> Self {
        self.set_sign(negative);
        self
    }

    /// Restores the canonical form: no high-order zero words (the single
    /// word `[0]` for zero) and a positive zero.
    pub(crate) fn canonicalize(&mut self) {
        let words = self.storage.words_mut();
        if words.is_empty() {
            words.push(W::default());
        }
        decimal::trim_zeros(words, W::default(), Trim::Trailing);
        if self.is_zero() {
            self.storage.set_sign(false);
        }
    }

    /// Number of significant magnitude bits; 0 for zero.
    pub(crate) fn bit_len(&self) -> u64 {
        let top = match self.storage.words().last() {
            Some(word) => word.bit_len(),
            None => return 0,
        };
        (self.storage.len() as u64 - 1) * u64::from(W::BITS) + u64::from(top)
    }

    fn magnitude_bit(&self, i: u64) -> bool {
        let word_idx = (i / u64::from(W::BITS)) as usize;
        let bit_idx = (i % u64::from(W::BITS)) as u32;
        self.storage
            .words()
            .get(word_idx)
            .is_some_and(|word| word.bit(bit_idx))
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

        // peel one bit per halving, least significant first
        let mut words = Vec::new();
        let mut word = 0u64;
        let mut bit = 0u32;
        let mut value = digits.to_owned();
        while value != "0" {
            let (quotient, remainder) = decimal::div_small(&value, 2)?;
            value = quotient;
            word |= remainder << bit;
            bit += 1;
            if bit == W::BITS {
                words.push(W::from_u64_lossy(word));
                word = 0;
                bit = 0;
            }
        }
        if bit != 0 {
            words.push(W::from_u64_lossy(word));
        }

        Ok(Self::from_words(words).with_sign(negative))
    }

    pub(crate) fn to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_owned();
        }
        let sign = if self.is_negative() { "-" } else { "" };

        // a magnitude that fits one native word prints directly
        if self.bit_len() <= u64::from(u64::BITS) {
            let magnitude = self.magnitude_u64();
            return format!("{sign}{magnitude}");
        }

        // little-endian base-10^9 chunks, fed bit by bit from the top:
        // chunks = chunks * 2 + bit
        const BASE: u64 = 1_000_000_000;
        let mut chunks = vec![0u32];
        for word in self.storage.words().iter().rev() {
            for i in (0..W::BITS).rev() {
                let mut carry = u64::from(word.bit(i));
                for chunk in &mut chunks {
                    let value = u64::from(*chunk) * 2 + carry;
                    *chunk = (value % BASE) as u32;
                    carry = value / BASE;
                }
                if carry != 0 {
                    chunks.push(carry as u32);
                }
            }
        }

        let mut out = String::with_capacity(chunks.len() * 9 + 1);
        out.push_str(sign);
        for (pos, chunk) in chunks.iter().rev().with_position() {
            if matches!(pos, itertools::Position::First | itertools::Position::Only) {
                write!(out, "{chunk}").expect("writing to a String cannot fail");
            } else {
                write!(out, "{chunk:09}").expect("writing to a String cannot fail");
            }
        }
        out
    }

    // ---- native bridge ----

    /// Magnitude assuming it fits; callers check `bit_len` first.
    fn magnitude_u64(&self) -> u64 {
        self.storage
            .words()
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, word)| {
                acc | (word.to_u64() << (i as u32 * W::BITS))
            })
    }

    pub(crate) fn from_parts(magnitude: u64, negative: bool) -> Self {
        if magnitude == 0 {
            return Self::default();
        }
        let mut words = Vec::new();
        let mut rest = magnitude;
        while rest != 0 {
            words.push(W::from_u64_lossy(rest));
            rest = rest.checked_shr(W::BITS).unwrap_or(0);
        }
        Self::from_words(words).with_sign(negative)
    }

    pub(crate) fn to_u64_abs(&self) -> Result<u64> {
        if self.bit_len() > u64::from(u64::BITS) {
            return Err(Error::Overflow);
        }
        Ok(self.magnitude_u64())
    }

    // ---- comparison ----

    pub(crate) fn cmp_abs(&self, other: &Self) -> std::cmp::Ordering {
        // canonical forms: more words means strictly larger
        self.storage
            .len()
            .cmp(&other.storage.len())
            .then_with(|| {
                self.storage
                    .words()
                    .iter()
                    .rev()
                    .cmp(other.storage.words().iter().rev())
            })
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

    pub(crate) fn add_abs(&self, rhs: &Self) -> Self {
        let mut words = Vec::with_capacity(self.storage.len().max(rhs.storage.len()) + 1);
        let mut carry = false;
        for pair in self
            .storage
            .words()
            .iter()
            .zip_longest(rhs.storage.words().iter())
        {
            let (a, b) = match pair {
                EitherOrBoth::Both(&a, &b) => (a, b),
                EitherOrBoth::Left(&a) => (a, W::default()),
                EitherOrBoth::Right(&b) => (W::default(), b),
            };
            let (sum, next) = a.carrying_add(b, carry);
            words.push(sum);
            carry = next;
        }
        if carry {
            words.push(W::from(1u8));
        }
        Self::from_words(words)
    }

    pub(crate) fn sub_abs(&self, rhs: &Self) -> Self {
        assert!(
            self.cmp_abs(rhs).is_ge(),
            "magnitude subtraction needs |lhs| >= |rhs|"
        );
        let mut words = Vec::with_capacity(self.storage.len());
        let mut borrow = false;
        for pair in self
            .storage
            .words()
            .iter()
            .zip_longest(rhs.storage.words().iter())
        {
            let (a, b) = match pair {
                EitherOrBoth::Both(&a, &b) => (a, b),
                EitherOrBoth::Left(&a) => (a, W::default()),
                EitherOrBoth::Right(_) => unreachable!("lhs has at least as many words"),
            };
            let (diff, next) = a.borrowing_sub(b, borrow);
            words.push(diff);
            borrow = next;
        }
        debug_assert!(!borrow, "no borrow can remain when |lhs| >= |rhs|");
        Self::from_words(words)
    }

    pub(crate) fn mul_values(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::default();
        }
        let mut acc = Self::default();
        for (word_idx, word) in rhs.storage.words().iter().enumerate() {
            for bit_idx in 0..W::BITS {
                if word.bit(bit_idx) {
                    let position = word_idx as u64 * u64::from(W::BITS) + u64::from(bit_idx);
                    let shifted =
                        Self::from_words(shifted_words(self.storage.words(), position));
                    acc = acc.add_abs(&shifted);
                }
            }
        }
        acc.with_sign(self.is_negative() != rhs.is_negative())
    }

    /// Restoring long division over the dividend's bits, most significant
    /// first: shift the running remainder, pull in the next bit, subtract
    /// the divisor when it fits and record a quotient bit.
    pub(crate) fn div_values(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::default());
        }

        let mut remainder = Self::default();
        let mut quotient_words = vec![W::default(); self.storage.len()];

        for i in (0..self.bit_len()).rev() {
            remainder = Self::from_words(shifted_words(remainder.storage.words(), 1));
            if self.magnitude_bit(i) {
                let low = remainder.storage.words_mut();
                low[0] = low[0] | W::from(1u8);
            }
            if remainder.cmp_abs(rhs).is_ge() {
                remainder = remainder.sub_abs(rhs);
                let word_idx = (i / u64::from(W::BITS)) as usize;
                let bit_idx = (i % u64::from(W::BITS)) as u32;
                quotient_words[word_idx] = quotient_words[word_idx] | (W::from(1u8) << bit_idx);
            }
        }

        Ok(Self::from_words(quotient_words)
            .with_sign(self.is_negative() != rhs.is_negative()))
    }

    /// `a − (a/b)·b`; the remainder keeps the dividend's sign.
    pub(crate) fn rem_values(&self, rhs: &Self) -> Result<Self> {
        let quotient = self.div_values(rhs)?;
        let mut remainder = self.signed_sub(&quotient.mul_values(rhs));
        remainder.set_sign(self.is_negative());
        Ok(remainder)
    }
}

/// The word vector shifted left by `shift` bits: whole words first, then
/// an in-word shift carrying the spilled high bits upward.
fn shifted_words<W: Word>(words: &[W], shift: u64) -> Vec<W> {
    if words.is_empty() || shift == 0 {
        return words.to_vec();
    }
    let word_shift = (shift / u64::from(W::BITS)) as usize;
    let bit_shift = (shift % u64::from(W::BITS)) as u32;

    let mut out = vec![W::default(); words.len() + word_shift];
    out[word_shift..].copy_from_slice(words);

    if bit_shift != 0 {
        let mut carry = W::default();
        for slot in out.iter_mut().skip(word_shift) {
            let current = *slot;
            *slot = (current << bit_shift) | carry;
            carry = current >> (W::BITS - bit_shift);
        }
        if carry != W::default() {
            out.push(carry);
        }
    }
    out
}
