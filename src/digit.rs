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

/// The RFC 1924 alphabet. The character at index `i` represents the
/// base-85 digit `i`.
pub const ALPHABET: [u8; 85] = *b"\
    0123456789\
    ABCDEFGHIJKLMNOPQRSTUVWXYZ\
    abcdefghijklmnopqrstuvwxyz\
    !#$%&()*+-;<=>?@^_`{|}~";

/// Entry in [`DIGIT_VALUES`] for bytes outside the alphabet.
pub const NOT_A_DIGIT: u8 = 85;

/// Maps each byte to its digit value, or to [`NOT_A_DIGIT`].
pub static DIGIT_VALUES: [u8; 256] = invert(&ALPHABET);

/// 85^4 down to 85^0.
pub const POW85: [u32; 5] = [85 * 85 * 85 * 85, 85 * 85 * 85, 85 * 85, 85, 1];

const fn invert(alphabet: &[u8; 85]) -> [u8; 256] {
    let mut table = [NOT_A_DIGIT; 256];
    let mut i = 0;
    while i < alphabet.len() {
        table[alphabet[i] as usize] = i as u8;
        i += 1;
    }
    table
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

macro_rules! const_digit {
    ($n:expr) => {{
        use crate::digit::Digit;
        const DIGIT: Digit = Digit::__const($n);
        DIGIT
    }};
}

impl Digit {
    pub fn new(x: u8) -> Option<Self> {
        (x < 85).then(|| Self(x))
    }

    /// # Safety
    ///
    /// `x` must be less than 85.
    pub unsafe fn new_unchecked(x: u8) -> Self {
        debug_assert!(x < 85);
        Self(x)
    }

    #[doc(hidden)]
    pub const fn __const(n: u8) -> Self {
        const BOUNDS_CHECK: [u8; 1] = [0];
        Self(n + BOUNDS_CHECK[(n >= 85) as usize])
    }

    /// Looks up `c` in the alphabet. `NOT_A_DIGIT` fails the range check in
    /// [`Self::new`], so non-alphabet bytes give `None`.
    pub fn from_ascii(c: u8) -> Option<Self> {
        Self::new(DIGIT_VALUES[usize::from(c)])
    }

    pub fn to_ascii(self) -> u8 {
        ALPHABET[usize::from(self.0)]
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> u8 {
        d.0
    }
}
