/*
 * Copyright (C) 2021 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base85.
 *
 * base85 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base85 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base85. If not, see <https://www.gnu.org/licenses/>.
 */

//! Functions and types for encoding base-85 data.

use super::digit::Digit;
use super::group;
use super::iter::Flatten;
use super::{BYTES_PER_GROUP, DIGITS_PER_GROUP};

use core::array;
use core::iter::FusedIterator;
use core::slice::Chunks;

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

/// Returns the number of characters [`encode_into`] produces for `size`
/// bytes of input, not counting the null terminator, or [`None`] if that
/// number overflows [`usize`].
///
/// A trailing partial group always takes a full 5 characters.
pub const fn encoded_len(size: usize) -> Option<usize> {
    let partial = (size % BYTES_PER_GROUP != 0) as usize;
    let groups = size / BYTES_PER_GROUP + partial;
    groups.checked_mul(DIGITS_PER_GROUP)
}

/// Encodes `src` into `dest`, followed by a null terminator.
///
/// Returns the index of the terminator, which is also the length of the
/// encoded text. If `src.len()` is not a multiple of 4, the last group is
/// padded with zero bytes.
///
/// # Panics
///
/// Panics if `dest` is shorter than <code>[encoded_len]\(src.len()) +
/// 1</code>.
pub fn encode_into(dest: &mut [u8], src: &[u8]) -> usize {
    let len = match encoded_len(src.len()) {
        Some(len) if len < dest.len() => len,
        _ => panic!(
            "destination too small: {} bytes for {} bytes of input",
            dest.len(),
            src.len(),
        ),
    };
    dest.chunks_exact_mut(DIGITS_PER_GROUP)
        .zip(src.chunks(BYTES_PER_GROUP))
        .for_each(|(out, bytes)| {
            let digits = group::to_digits(group::pack(bytes));
            out.copy_from_slice(&digits.map(Digit::to_ascii));
        });
    dest[len] = 0;
    len
}

struct BytesToUnflatDigits<'a>(Chunks<'a, u8>);

type BytesToUnflatDigitsItem = array::IntoIter<u8, DIGITS_PER_GROUP>;

impl<'a> Iterator for BytesToUnflatDigits<'a> {
    type Item = BytesToUnflatDigitsItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|bytes| {
            let digits = group::to_digits(group::pack(bytes));
            IntoIterator::into_iter(digits.map(Digit::to_ascii))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> FusedIterator for BytesToUnflatDigits<'a> {}

/// Iterator returned by [`encode_to_bytes`].
pub struct Encoder<'a>(
    Flatten<BytesToUnflatDigits<'a>, BytesToUnflatDigitsItem>,
);

impl<'a> Encoder<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        let chunks = bytes.chunks(BYTES_PER_GROUP);
        Self(Flatten::new(BytesToUnflatDigits(chunks)))
    }
}

impl<'a> Iterator for Encoder<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Groups are produced lazily, so the count is the rest of the
        // current group plus 5 per remaining chunk of input.
        let pending = self.0.sub().map_or(0, ExactSizeIterator::len);
        let len = self.0.outer().0.len() * DIGITS_PER_GROUP + pending;
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for Encoder<'a> {}

impl<'a> FusedIterator for Encoder<'a> {}

/// Iterator returned by [`encode_to_chars`].
pub struct CharEncoder<'a>(Encoder<'a>);

impl<'a> Iterator for CharEncoder<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, |b, c| f(b, char::from(c)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for CharEncoder<'a> {}

impl<'a> FusedIterator for CharEncoder<'a> {}

/// Encodes `bytes` as ASCII base-85 characters. No terminator is produced.
pub fn encode_to_bytes(bytes: &[u8]) -> Encoder<'_> {
    Encoder::new(bytes)
}

/// Like [`encode_to_bytes`], but yields [`char`]s.
pub fn encode_to_chars(bytes: &[u8]) -> CharEncoder<'_> {
    CharEncoder(Encoder::new(bytes))
}

/// Encodes `bytes` into a new [`String`]. Rust strings carry their length,
/// so no null terminator is added.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string(bytes: &[u8]) -> String {
    encode_to_chars(bytes).collect()
}

/// Encodes `bytes` into a new [`Vec`], followed by a null terminator, as
/// [`encode_into`] would.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_vec(bytes: &[u8]) -> Vec<u8> {
    let encoder = encode_to_bytes(bytes);
    let mut text = Vec::with_capacity(encoder.len() + 1);
    text.extend(encoder);
    text.push(0);
    text
}
