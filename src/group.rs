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

use super::digit::{Digit, POW85};
use super::{BYTES_PER_GROUP, DIGITS_PER_GROUP};

/// Reads up to 4 bytes as the most significant bytes of a big-endian `u32`.
/// Missing low-order bytes are zero.
pub fn pack(bytes: &[u8]) -> u32 {
    debug_assert!(bytes.len() <= BYTES_PER_GROUP);
    let mut group = [0; BYTES_PER_GROUP];
    group[..bytes.len()].copy_from_slice(bytes);
    u32::from_be_bytes(group)
}

pub fn unpack(value: u32) -> [u8; BYTES_PER_GROUP] {
    value.to_be_bytes()
}

/// Splits `value` into base-85 digits, most significant first.
pub fn to_digits(mut value: u32) -> [Digit; DIGITS_PER_GROUP] {
    let mut digits = [const_digit!(0); DIGITS_PER_GROUP];
    digits.iter_mut().zip(POW85).for_each(|(d, pow)| {
        // SAFETY: `u32::MAX / 85^4` is 82, and after each step `value` is
        // less than the current power, i.e. less than 85 times the next one.
        *d = unsafe { Digit::new_unchecked((value / pow) as u8) };
        value %= pow;
    });
    digits
}

/// Inverse of [`to_digits`]. Five digits can exceed `u32::MAX`, so the sum
/// is returned unreduced.
pub fn from_digits(digits: [Digit; DIGITS_PER_GROUP]) -> u64 {
    digits
        .iter()
        .zip(POW85)
        .map(|(d, pow)| u64::from(u8::from(*d)) * u64::from(pow))
        .sum()
}
