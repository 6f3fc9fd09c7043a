//! Bit-packed coefficient codec for the factorial representation.
//!
//! Coefficient `d_i` is bounded by its base (`d_i <= i`), so it occupies
//! exactly `bit_len(i)` bits. The coefficients are laid out back to back
//! in the storage's word vector, treated as one little-endian bit stream:
//! bit 0 of word 0 is stream bit 0. `d_0` has width zero and is never
//! materialized.

use crate::error::{Error, Result};
use crate::num::storage::Storage;
use crate::num::word::Word;

/// Largest coefficient index the codec will address; the aux field of the
/// storage has exactly 63 bits to record it.
pub(crate) const MAX_INDEX: u64 = (1 << 63) - 1;

/// Width in bits of coefficient `index`: the bit length of `index` itself,
/// since the coefficient never exceeds it.
pub(crate) const fn width(index: u64) -> u32 {
    u64::BITS - index.leading_zeros()
}

/// Starting bit of coefficient `index`: `Σ width(k)` for `k = 1..index`.
/// Closed form: with `N = index - 1 > 0`, `M = ⌊log2 N⌋` and
/// `P = 2^(M+1)`, the sum is `N + (M·N − (P − M − 2))`. Computed in
/// `u128` because the sum outgrows 64 bits long before `MAX_INDEX`.
pub(crate) fn offset(index: u64) -> u128 {
    if index <= 1 {
        return 0;
    }
    let n = u128::from(index) - 1;
    let m = 127 - u128::from(n.leading_zeros());
    let p = 1u128 << (m + 1);
    n + (m * n - (p - m - 2))
}

/// Reads coefficient `index`, or `None` when its bit slice lies (partly)
/// beyond the current storage. Index 0 is always present and always 0.
pub(crate) fn extract<W: Word>(storage: &Storage<W>, index: u64) -> Result<Option<u64>> {
    if index > MAX_INDEX {
        return Err(Error::IndexOutOfRange(index));
    }
    let size = width(index);
    if size == 0 {
        return Ok(Some(0));
    }

    let start = offset(index);
    let stream_bits = storage.len() as u128 * u128::from(W::BITS);
    if start >= stream_bits || start + u128::from(size) > stream_bits {
        return Ok(None);
    }

    let mut result = 0u64;
    let mut done = 0u32;
    let mut cursor = start as u64;
    while done < size {
        let word_idx = (cursor / u64::from(W::BITS)) as usize;
        let bit_in_word = (cursor % u64::from(W::BITS)) as u32;
        let available = W::BITS - bit_in_word;
        let step = (size - done).min(available);

        let mut chunk = storage.words()[word_idx].to_u64() >> bit_in_word;
        if step < 64 {
            chunk &= (1u64 << step) - 1;
        }
        result |= chunk << done;

        done += step;
        cursor += u64::from(step);
    }
    Ok(Some(result))
}

/// Writes coefficient `index`, growing the storage to cover its bit slice
/// and leaving every surrounding bit untouched. Raises the storage's aux
/// hint to `index` if it was below. Writing 0 at index 0 is a no-op.
pub(crate) fn put<W: Word>(storage: &mut Storage<W>, index: u64, value: u64) -> Result<()> {
    if index > MAX_INDEX {
        return Err(Error::IndexOutOfRange(index));
    }
    let size = width(index);
    if size == 0 {
        return Ok(());
    }
    if value > index {
        return Err(Error::CoefficientTooLarge { index, value });
    }
    if storage.aux() < index {
        storage.set_aux(index);
    }

    let start = offset(index);
    let words_needed = (start + u128::from(size)).div_ceil(u128::from(W::BITS));
    let words_needed =
        usize::try_from(words_needed).expect("coefficient slice exceeds addressable storage");
    if words_needed > storage.len() {
        storage.resize(words_needed);
    }

    let mut done = 0u32;
    let mut cursor = start as u64;
    while done < size {
        let word_idx = (cursor / u64::from(W::BITS)) as usize;
        let bit_in_word = (cursor % u64::from(W::BITS)) as u32;
        let available = W::BITS - bit_in_word;
        let step = (size - done).min(available);

        let mask = if step == 64 { u64::MAX } else { (1u64 << step) - 1 };
        let chunk = (value >> done) & mask;

        let word = storage.words()[word_idx].to_u64();
        let merged = (word & !(mask << bit_in_word)) | (chunk << bit_in_word);
        storage.words_mut()[word_idx] = W::from_u64_lossy(merged);

        done += step;
        cursor += u64::from(step);
    }
    Ok(())
}
