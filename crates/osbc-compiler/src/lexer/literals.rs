// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Escape sequence decoding for character and string literals.
//!
//! | Escape | Value |
//! |--------|-------|
//! | `\'` `\"` `\?` `\\` | the character itself |
//! | `\a` `\b` `\e` `\f` | 7, 8, 27, 12 |
//! | `\n` `\r` `\t` `\v` | 10, 13, 9, 11 |
//! | `\0`..`\7` | octal, one to three digits |
//! | `\x` | hexadecimal, any number of digits |
//!
//! Anything else is [`LexError::InvalidSequence`]; a backslash at the very
//! end of a line is [`LexError::UnexpectedEol`].

use super::LexError;

/// Decodes the escape sequence starting at the backslash under `position`.
///
/// On success `position` is left just past the sequence.
pub(crate) fn read_escape(line: &str, position: &mut usize) -> Result<u32, LexError> {
    let bytes = line.as_bytes();

    *position += 1; // backslash

    let Some(&b) = bytes.get(*position) else {
        return Err(LexError::UnexpectedEol);
    };

    let value = match b {
        b'\'' | b'"' | b'?' | b'\\' => u32::from(b),

        b'a' => 0x07,
        b'b' => 0x08,
        b'e' => 0x1B,
        b'f' => 0x0C,
        b'n' => 0x0A,
        b'r' => 0x0D,
        b't' => 0x09,
        b'v' => 0x0B,

        b'0'..=b'7' => return read_digits(bytes, position, 8, 3),

        b'x' => {
            *position += 1;
            return read_digits(bytes, position, 16, usize::MAX);
        }

        _ => {
            // Step over the offending character so the caller can resync.
            let width = line[*position..].chars().next().map_or(1, char::len_utf8);
            *position += width;
            return Err(LexError::InvalidSequence);
        }
    };

    *position += 1;
    Ok(value)
}

/// Reads between one and `max_digits` digits in the given radix.
fn read_digits(
    bytes: &[u8],
    position: &mut usize,
    radix: u32,
    max_digits: usize,
) -> Result<u32, LexError> {
    let mut value: u32 = 0;
    let mut count = 0;

    while count < max_digits {
        let Some(digit) = bytes
            .get(*position)
            .and_then(|&b| char::from(b).to_digit(radix))
        else {
            break;
        };

        value = value.wrapping_mul(radix).wrapping_add(digit);
        *position += 1;
        count += 1;
    }

    if count == 0 {
        return Err(LexError::InvalidSequence);
    }

    Ok(value)
}
