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

//! RFC 1924 Base85 encoding.
//!
//! Every 4 bytes of input become 5 characters from the alphabet
//! `0-9`, `A-Z`, `a-z`, ``!#$%&()*+-;<=>?@^_`{|}~``. A trailing group of
//! 1 to 3 bytes is padded with zero bytes and still encoded as 5 characters,
//! so the decoded output is always a multiple of 4 bytes long; callers that
//! encode data of other lengths must keep track of the original length.
//!
//! ```
//! let mut text = [0; 11];
//! let len = base85::encode_into(&mut text, b"\x00\x01\x02\x03\x04");
//! assert_eq!(&text[..len], b"009C61ONa4");
//! assert_eq!(text[len], 0);
//!
//! let mut bytes = [0; 8];
//! let len = base85::decode_into(&mut bytes, &text).unwrap();
//! assert_eq!(&bytes[..len], b"\x00\x01\x02\x03\x04\x00\x00\x00");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

#[macro_use]
mod digit;
pub mod decode;
pub mod encode;
mod group;
mod iter;

#[cfg(feature = "alloc")]
extern crate alloc;

const BYTES_PER_GROUP: usize = 4;
const DIGITS_PER_GROUP: usize = 5;

pub use digit::ALPHABET;

pub use decode::decode_bytes;
pub use decode::decode_in_place;
pub use decode::decode_into;
#[cfg(feature = "alloc")]
pub use decode::decode_to_vec;

pub use encode::encode_into;
pub use encode::encode_to_bytes;
pub use encode::encode_to_chars;
#[cfg(feature = "alloc")]
pub use encode::encode_to_string;
#[cfg(feature = "alloc")]
pub use encode::encode_to_vec;
pub use encode::encoded_len;
