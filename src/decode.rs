/*
 * Copyright (C) 2021-2022 taylor.fish <contact@taylor.fish>
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

//! Functions and types for decoding base-85 data.
//!
//! Input text is treated like a C string: decoding ends at the first byte
//! that is not a base-85 digit, which is normally the null terminator, or
//! at the end of the slice. Ending there is only valid at a group boundary.

use super::digit::Digit;
use super::group;
use super::iter::Flatten;
use super::{BYTES_PER_GROUP, DIGITS_PER_GROUP};

use core::array;
use core::fmt::{self, Formatter};
use core::iter::{FusedIterator, Take};

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// An error encountered while decoding base-85 text.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A group was started, but the byte at `offset` ended it before its
    /// fifth digit. `offset` may equal the input length.
    IncompleteGroup { offset: usize },
    /// The group starting at `offset` has a value above `u32::MAX`, and
    /// [`DecodeConfig::reject_overflow`] was true.
    Overflow { offset: usize },
    /// Decoding stopped at `byte`, which is not the null terminator, and
    /// [`DecodeConfig::require_terminator`] was true.
    TrailingData { offset: usize, byte: u8 },
}

use DecodeError as Error;

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::IncompleteGroup { offset } => {
                write!(f, "incomplete group: no digit at offset {}", offset)
            }
            Self::Overflow { offset } => {
                write!(f, "group at offset {} exceeds 32 bits", offset)
            }
            Self::TrailingData { offset, byte } => write!(
                f,
                "unexpected byte ({:#04x}) at offset {} after last group",
                byte, offset,
            ),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for DecodeError {}

/// Used by the `decode_*_with` functions to configure the decoding process.
#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub struct DecodeConfig {
    /// Whether to reject groups whose value does not fit in 32 bits, such
    /// as `|NsC1`. If false, only the low 32 bits are kept. [default: false]
    pub reject_overflow: bool,
    /// Whether decoding must end at a null byte or at the end of the input.
    /// If false, any non-digit at a group boundary ends the data and
    /// whatever follows it is ignored. [default: false]
    pub require_terminator: bool,
}

impl DecodeConfig {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            reject_overflow: false,
            require_terminator: false,
        }
    }

    /// Returns a configuration with every check enabled.
    pub const fn strict() -> Self {
        Self {
            reject_overflow: true,
            require_terminator: true,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the largest number of bytes that `text_len` bytes of base-85
/// text can decode to. A destination of this size is always large enough
/// for [`decode_into`].
pub const fn max_decoded_len(text_len: usize) -> usize {
    text_len / DIGITS_PER_GROUP * BYTES_PER_GROUP
}

fn check_end(
    src: &[u8],
    pos: usize,
    config: DecodeConfig,
) -> DecodeResult<()> {
    match src.get(pos) {
        Some(&byte) if byte != 0 && config.require_terminator => {
            Err(Error::TrailingData {
                offset: pos,
                byte,
            })
        }
        _ => Ok(()),
    }
}

/// Reads the group starting at `pos`. Returns `Ok(None)` if the data ends
/// there. All five digits are read before anything is returned, which is
/// what makes in-place decoding possible.
fn read_group(
    src: &[u8],
    pos: usize,
    config: DecodeConfig,
) -> DecodeResult<Option<u32>> {
    let digit_at = |i: usize| src.get(i).copied().and_then(Digit::from_ascii);
    let first = if let Some(d) = digit_at(pos) {
        d
    } else {
        return check_end(src, pos, config).map(|_| None);
    };

    let mut digits = [first; DIGITS_PER_GROUP];
    for (i, d) in digits.iter_mut().enumerate().skip(1) {
        *d = digit_at(pos + i).ok_or(Error::IncompleteGroup {
            offset: pos + i,
        })?;
    }

    let value = group::from_digits(digits);
    match u32::try_from(value) {
        Ok(value) => Ok(Some(value)),
        Err(_) if config.reject_overflow => {
            Err(Error::Overflow {
                offset: pos,
            })
        }
        Err(_) => Ok(Some(value as u32)),
    }
}

/// Decodes the base-85 text in `src` into `dest`.
///
/// Returns the number of bytes written, which is always a multiple of 4.
/// Decoding ends at the first non-digit byte (normally a null terminator)
/// or at the end of `src`; that point must fall on a group boundary.
///
/// On error, `dest` may have been partly written.
///
/// # Panics
///
/// Panics if `dest` is too small for the decoded data. A `dest` of
/// <code>[max_decoded_len]\(src.len())</code> bytes is always enough.
pub fn decode_into(dest: &mut [u8], src: &[u8]) -> DecodeResult<usize> {
    decode_into_with(dest, src, DecodeConfig::new())
}

/// Like [`decode_into`], but takes a configuration object.
pub fn decode_into_with(
    dest: &mut [u8],
    src: &[u8],
    config: DecodeConfig,
) -> DecodeResult<usize> {
    decode_groups(
        Separate {
            src,
            dest,
        },
        config,
    )
}

/// Decodes the base-85 text in `buf`, writing the result to the start of
/// `buf`. This behaves exactly like [`decode_into`] with the same buffer as
/// source and destination.
///
/// Returns the number of decoded bytes at the start of `buf`. Bytes after
/// them are left over from the text. On error, `buf` may have been partly
/// overwritten.
pub fn decode_in_place(buf: &mut [u8]) -> DecodeResult<usize> {
    decode_in_place_with(buf, DecodeConfig::new())
}

/// Like [`decode_in_place`], but takes a configuration object.
pub fn decode_in_place_with(
    buf: &mut [u8],
    config: DecodeConfig,
) -> DecodeResult<usize> {
    decode_groups(InPlace(buf), config)
}

/// Source text and destination of a decode, which may be the same memory.
trait Buffers {
    fn text(&self) -> &[u8];
    fn output(&mut self) -> &mut [u8];
}

struct Separate<'s, 'd> {
    src: &'s [u8],
    dest: &'d mut [u8],
}

impl Buffers for Separate<'_, '_> {
    fn text(&self) -> &[u8] {
        self.src
    }

    fn output(&mut self) -> &mut [u8] {
        &mut *self.dest
    }
}

struct InPlace<'a>(&'a mut [u8]);

impl Buffers for InPlace<'_> {
    fn text(&self) -> &[u8] {
        &*self.0
    }

    fn output(&mut self) -> &mut [u8] {
        &mut *self.0
    }
}

fn decode_groups<B: Buffers>(
    mut buffers: B,
    config: DecodeConfig,
) -> DecodeResult<usize> {
    let mut read = 0;
    let mut written = 0;
    // Each group advances `read` by 5 and `written` by 4, so when both
    // buffers are the same, the bytes written for a group never reach past
    // the digits just read.
    while let Some(value) = read_group(buffers.text(), read, config)? {
        debug_assert!(written + BYTES_PER_GROUP <= read + DIGITS_PER_GROUP);
        buffers.output()[written..written + BYTES_PER_GROUP]
            .copy_from_slice(&group::unpack(value));
        read += DIGITS_PER_GROUP;
        written += BYTES_PER_GROUP;
    }
    Ok(written)
}

struct GroupsToUnflatBytes<'a> {
    src: &'a [u8],
    pos: usize,
    config: DecodeConfig,
    done: bool,
}

type GroupsToUnflatBytesItem =
    Take<array::IntoIter<DecodeResult<u8>, BYTES_PER_GROUP>>;

impl<'a> Iterator for GroupsToUnflatBytes<'a> {
    type Item = GroupsToUnflatBytesItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_group(self.src, self.pos, self.config) {
            Ok(Some(value)) => {
                self.pos += DIGITS_PER_GROUP;
                let bytes = group::unpack(value).map(Ok);
                Some(IntoIterator::into_iter(bytes).take(BYTES_PER_GROUP))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                let arr = [Err(e), Ok(0), Ok(0), Ok(0)];
                Some(IntoIterator::into_iter(arr).take(1))
            }
        }
    }
}

impl<'a> FusedIterator for GroupsToUnflatBytes<'a> {}

/// Iterator returned by [`decode_bytes`].
///
/// Yields at most one error, after which iteration ends.
pub struct Decoder<'a>(
    Flatten<GroupsToUnflatBytes<'a>, GroupsToUnflatBytesItem>,
);

impl<'a> Decoder<'a> {
    pub(crate) fn new(src: &'a [u8], config: DecodeConfig) -> Self {
        Self(Flatten::new(GroupsToUnflatBytes {
            src,
            pos: 0,
            config,
            done: false,
        }))
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = DecodeResult<u8>;

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
        let pending = self.0.sub().map_or(0, |sub| sub.len());
        let groups = self.0.outer();
        let remaining = if groups.done {
            0
        } else {
            groups.src.len().saturating_sub(groups.pos)
        };
        // Unread text can also end in a single error item.
        let error = (remaining > 0) as usize;
        (pending, Some(pending + max_decoded_len(remaining) + error))
    }
}

impl<'a> FusedIterator for Decoder<'a> {}

/// Decodes base-85 text lazily. See [`decode_into`] for how the end of the
/// data is found.
pub fn decode_bytes(src: &[u8]) -> Decoder<'_> {
    decode_bytes_with(src, DecodeConfig::new())
}

/// Like [`decode_bytes`], but takes a configuration object.
pub fn decode_bytes_with(src: &[u8], config: DecodeConfig) -> Decoder<'_> {
    Decoder::new(src, config)
}

/// Decodes base-85 text into a new [`Vec`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec<T: AsRef<[u8]>>(src: T) -> DecodeResult<Vec<u8>> {
    let src = src.as_ref();
    let mut bytes = vec![0; max_decoded_len(src.len())];
    let len = decode_into(&mut bytes, src)?;
    bytes.truncate(len);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let mut dest = [0xaa; 4];
        assert_eq!(decode_into(&mut dest, b""), Ok(0));
        assert_eq!(decode_into(&mut dest, b"\0"), Ok(0));
        assert_eq!(dest, [0xaa; 4]);
    }

    #[test]
    fn one_group() {
        let mut dest = [0; 4];
        assert_eq!(decode_into(&mut dest, b"009C6\0"), Ok(4));
        assert_eq!(dest, [0, 1, 2, 3]);
    }

    #[test]
    fn stops_at_first_non_digit() {
        let mut dest = [0; 8];
        assert_eq!(decode_into(&mut dest, b"009C6\0009C6"), Ok(4));
        assert_eq!(decode_into(&mut dest, b"009C6 009C6"), Ok(4));
        assert_eq!(decode_into(&mut dest, b"009C6\n"), Ok(4));
    }

    #[test]
    fn incomplete_groups() {
        let mut dest = [0; 8];
        for len in 1..DIGITS_PER_GROUP {
            let mut text = *b"00000\0";
            text[len] = 0;
            assert_eq!(
                decode_into(&mut dest, &text),
                Err(Error::IncompleteGroup {
                    offset: len,
                }),
            );
            assert_eq!(
                decode_into(&mut dest, &text[..len]),
                Err(Error::IncompleteGroup {
                    offset: len,
                }),
            );
        }
    }

    #[test]
    fn invalid_byte_mid_group() {
        let mut dest = [0; 8];
        let text = [b'0', 0xff, b'1', b'2', b'3', 0];
        assert_eq!(
            decode_into(&mut dest, &text),
            Err(Error::IncompleteGroup {
                offset: 1,
            }),
        );
    }

    #[test]
    fn second_group_incomplete() {
        let mut dest = [0; 8];
        assert_eq!(
            decode_into(&mut dest, b"aaaaaa"),
            Err(Error::IncompleteGroup {
                offset: 6,
            }),
        );
    }

    #[test]
    fn overflow_wraps_by_default() {
        let mut dest = [0; 4];
        assert_eq!(decode_into(&mut dest, b"|NsC0"), Ok(4));
        assert_eq!(dest, [0xff; 4]);
        assert_eq!(decode_into(&mut dest, b"|NsC1"), Ok(4));
        assert_eq!(dest, [0; 4]);
    }

    #[test]
    fn overflow_rejected_when_configured() {
        let config = DecodeConfig {
            reject_overflow: true,
            ..DecodeConfig::new()
        };
        let mut dest = [0; 8];
        assert_eq!(decode_into_with(&mut dest, b"|NsC0", config), Ok(4));
        assert_eq!(
            decode_into_with(&mut dest, b"00000~~~~~", config),
            Err(Error::Overflow {
                offset: 5,
            }),
        );
    }

    #[test]
    fn trailing_data_rejected_when_configured() {
        let config = DecodeConfig {
            require_terminator: true,
            ..DecodeConfig::new()
        };
        let mut dest = [0; 8];
        assert_eq!(decode_into_with(&mut dest, b"009C6", config), Ok(4));
        assert_eq!(decode_into_with(&mut dest, b"009C6\0.", config), Ok(4));
        assert_eq!(
            decode_into_with(&mut dest, b"009C6\n", config),
            Err(Error::TrailingData {
                offset: 5,
                byte: b'\n',
            }),
        );
    }

    #[test]
    fn in_place() {
        let mut buf = *b"009C61ONa4\0";
        assert_eq!(decode_in_place(&mut buf), Ok(8));
        assert_eq!(&buf[..8], &[0, 1, 2, 3, 4, 0, 0, 0]);
    }

    #[test]
    fn in_place_error() {
        let mut buf = *b"009C61ON\0";
        assert_eq!(
            decode_in_place(&mut buf),
            Err(Error::IncompleteGroup {
                offset: 8,
            }),
        );
    }

    #[test]
    #[should_panic]
    fn destination_too_small() {
        let mut dest = [0; 4];
        let _ = decode_into(&mut dest, b"009C6009C6");
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut decoder = decode_bytes(b"009C6009");
        for b in 0..4 {
            assert_eq!(decoder.next(), Some(Ok(b)));
        }
        assert_eq!(
            decoder.next(),
            Some(Err(Error::IncompleteGroup {
                offset: 8,
            })),
        );
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn iterator_size_hint() {
        let mut decoder = decode_bytes(b"009C6009C6\0");
        assert_eq!(decoder.size_hint(), (0, Some(9)));
        decoder.next();
        assert_eq!(decoder.size_hint(), (3, Some(8)));
        assert_eq!(decoder.by_ref().count(), 7);
        assert_eq!(decoder.size_hint(), (0, Some(0)));
    }

    #[test]
    fn size_hint_counts_error_item() {
        for text in [&b"009"[..], b"009C6009", b"009C6\n", b"|NsC1"] {
            let decoder = decode_bytes_with(text, DecodeConfig::strict());
            let (lower, upper) = decoder.size_hint();
            let mut count = 0;
            let mut last = None;
            for item in decoder {
                count += 1;
                last = Some(item);
            }
            assert!(matches!(last, Some(Err(_))), "{:?}", text);
            assert!(lower <= count, "{:?}", text);
            assert!(count <= upper.unwrap(), "{:?}", text);
        }
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn display() {
        use alloc::string::ToString;

        let e = Error::TrailingData {
            offset: 3,
            byte: b' ',
        };
        assert_eq!(
            e.to_string(),
            "unexpected byte (0x20) at offset 3 after last group",
        );
    }

    #[cfg(feature = "std")]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn in_place_matches_separate_buffer(
                data in proptest::collection::vec(any::<u8>(), 0..64),
            ) {
                let mut text = crate::encode::encode_to_vec(&data);
                let mut dest = vec![0; max_decoded_len(text.len())];
                let expected = decode_into(&mut dest, &text);
                let actual = decode_in_place(&mut text);
                prop_assert_eq!(expected, actual);
                let len = actual.unwrap();
                prop_assert_eq!(&dest[..len], &text[..len]);
            }

            #[test]
            fn iterator_matches_slice_decoder(
                text in proptest::collection::vec(any::<u8>(), 0..32),
                config in (any::<bool>(), any::<bool>()),
            ) {
                let config = DecodeConfig {
                    reject_overflow: config.0,
                    require_terminator: config.1,
                };
                let mut dest = vec![0; max_decoded_len(text.len())];
                let expected = decode_into_with(&mut dest, &text, config)
                    .map(|len| dest[..len].to_vec());
                let actual: DecodeResult<Vec<u8>> =
                    decode_bytes_with(&text, config).collect();
                prop_assert_eq!(expected, actual);
            }
        }
    }
}
