// SPDX-License-Identifier: MPL-2.0

//! Schoolbook arithmetic on decimal digit strings.
//!
//! All functions operate on sign-free, leading-zero-free ASCII strings;
//! `"0"` is the only value that starts with a zero. Both big-integer
//! kernels funnel their base conversions through this module, and the
//! factorial form also uses it as its multiply/divide backend.

use itertools::{EitherOrBoth, Itertools};

use crate::error::{Error, Result};

/// Which end of a container to strip zeros from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    Leading,
    Trailing,
}

/// Accepts an optional leading `-` followed by one or more digits, with no
/// leading zero in a multi-digit run. `"0"` and `"-0"` are valid, `"01"`,
/// `"-"` and `""` are not.
pub fn is_valid_integral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    digits.bytes().all(|b| b.is_ascii_digit())
}

/// Unsigned comparison: `a >= b`. Length decides first, then the usual
/// lexicographic order (both operands are normalized).
pub fn ge(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        a.len() > b.len()
    } else {
        a >= b
    }
}

/// Strips `zero` elements from one end of `c`. A container that would
/// become empty is restored to a single zero element, so the result is
/// always a valid normalized number (this also serves the word vectors of
/// the binary form, where `zero` is a numeric word).
pub fn trim_zeros<T: Copy + PartialEq>(c: &mut Vec<T>, zero: T, mode: Trim) {
    if c.is_empty() {
        return;
    }
    match mode {
        Trim::Leading => {
            let run = c.iter().take_while(|&&elem| elem == zero).count();
            c.drain(..run);
        }
        Trim::Trailing => {
            while c.last() == Some(&zero) {
                c.pop();
            }
        }
    }
    if c.is_empty() {
        c.push(zero);
    }
}

pub fn add(a: &str, b: &str) -> String {
    let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0;
    for pair in a.bytes().rev().zip_longest(b.bytes().rev()) {
        let (da, db) = match pair {
            EitherOrBoth::Both(x, y) => (x - b'0', y - b'0'),
            EitherOrBoth::Left(x) => (x - b'0', 0),
            EitherOrBoth::Right(y) => (0, y - b'0'),
        };
        let sum = da + db + carry;
        out.push(sum % 10 + b'0');
        carry = sum / 10;
    }
    if carry != 0 {
        out.push(carry + b'0');
    }
    out.reverse();
    trim_zeros(&mut out, b'0', Trim::Leading);
    into_string(out)
}

/// `a - b` for `a >= b`; anything else is an underflow error.
pub fn sub(a: &str, b: &str) -> Result<String> {
    if b == "0" {
        return Ok(a.to_owned());
    }
    if a == b {
        return Ok("0".to_owned());
    }
    if !ge(a, b) {
        return Err(Error::Underflow);
    }

    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i16;
    for pair in a.bytes().rev().zip_longest(b.bytes().rev()) {
        let (da, db) = match pair {
            EitherOrBoth::Both(x, y) => (i16::from(x - b'0'), i16::from(y - b'0')),
            EitherOrBoth::Left(x) => (i16::from(x - b'0'), 0),
            EitherOrBoth::Right(_) => unreachable!("minuend has at least as many digits"),
        };
        let mut diff = da - db - borrow;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u8 + b'0');
    }
    out.reverse();
    trim_zeros(&mut out, b'0', Trim::Leading);
    Ok(into_string(out))
}

pub fn mul(a: &str, b: &str) -> String {
    if a == "0" || b == "0" {
        return "0".to_owned();
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    // acc[i + j + 1] collects a_i * b_j, carries ripple into acc[i + j]
    let mut acc = vec![0u32; a.len() + b.len()];
    for (i, &da) in a.iter().enumerate().rev() {
        let da = u32::from(da - b'0');
        for (j, &db) in b.iter().enumerate().rev() {
            let db = u32::from(db - b'0');
            let sum = da * db + acc[i + j + 1];
            acc[i + j + 1] = sum % 10;
            acc[i + j] += sum / 10;
        }
    }

    let mut out = acc.into_iter().map(|d| d as u8 + b'0').collect_vec();
    trim_zeros(&mut out, b'0', Trim::Leading);
    into_string(out)
}

/// `a * factor` with a native factor, one ripple pass.
pub fn mul_small(a: &str, factor: u64) -> String {
    if factor == 0 || a == "0" {
        return "0".to_owned();
    }
    if factor == 1 {
        return a.to_owned();
    }

    let mut out = Vec::with_capacity(a.len() + 20);
    let mut carry: u128 = 0;
    for digit in a.bytes().rev() {
        let product = u128::from(digit - b'0') * u128::from(factor) + carry;
        out.push((product % 10) as u8 + b'0');
        carry = product / 10;
    }
    while carry > 0 {
        out.push((carry % 10) as u8 + b'0');
        carry /= 10;
    }
    out.reverse();
    into_string(out)
}

/// `a / divisor` with a native divisor; returns the quotient string and
/// the remainder as a native integer.
pub fn div_small(a: &str, divisor: u64) -> Result<(String, u64)> {
    if divisor == 0 {
        return Err(Error::DivisionByZero);
    }
    if a.is_empty() || a == "0" {
        return Ok(("0".to_owned(), 0));
    }

    let mut quotient = Vec::with_capacity(a.len());
    let mut remainder: u128 = 0;
    for digit in a.bytes() {
        let acc = remainder * 10 + u128::from(digit - b'0');
        quotient.push((acc / u128::from(divisor)) as u8 + b'0');
        remainder = acc % u128::from(divisor);
    }
    trim_zeros(&mut quotient, b'0', Trim::Leading);
    Ok((into_string(quotient), remainder as u64))
}

/// School long division: `(a / b, a % b)`, both normalized. `a < b` gives
/// `("0", a)` without doing any work.
pub fn div(a: &str, b: &str) -> Result<(String, String)> {
    if b == "0" {
        return Err(Error::DivisionByZero);
    }
    if a == "0" {
        return Ok(("0".to_owned(), "0".to_owned()));
    }
    if !ge(a, b) {
        return Ok(("0".to_owned(), a.to_owned()));
    }

    let mut quotient = Vec::with_capacity(a.len());
    let mut remainder = String::new();
    for digit in a.chars() {
        remainder.push(digit);
        trim_leading_in_place(&mut remainder);

        let mut count = 0u8;
        while ge(&remainder, b) {
            remainder = sub(&remainder, b)?;
            count += 1;
        }
        quotient.push(count + b'0');
    }
    trim_zeros(&mut quotient, b'0', Trim::Leading);
    Ok((into_string(quotient), remainder))
}

fn trim_leading_in_place(s: &mut String) {
    while s.len() > 1 && s.starts_with('0') {
        s.remove(0);
    }
}

fn into_string(digits: Vec<u8>) -> String {
    String::from_utf8(digits).expect("decimal digits are ASCII")
}
