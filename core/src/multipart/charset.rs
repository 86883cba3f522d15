/*
 * charset.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Partitore, an incremental multipart body decoder.
 *
 * Partitore is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Partitore is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Partitore.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Charsets that can label header text and extended attribute values.

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// A charset a multipart message can name: the decoder default, a part's
/// `charset=` attribute, or the charset segment of an RFC 5987 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    UsAscii,
    Iso8859_1,
    Utf16Le,
    Utf16Be,
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Utf8
    }
}

impl Charset {
    /// Look up a charset by its (case-insensitive) label. None for labels
    /// that are unknown or not supported.
    pub fn for_label(label: &str) -> Option<Charset> {
        let lower = label.trim().to_ascii_lowercase();
        match lower.as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "us-ascii" | "ascii" => Some(Charset::UsAscii),
            "iso-8859-1" | "iso_8859-1" | "latin1" | "l1" => Some(Charset::Iso8859_1),
            "utf-16le" => Some(Charset::Utf16Le),
            "utf-16be" | "utf-16" => Some(Charset::Utf16Be),
            _ => None,
        }
    }

    /// Decode bytes to text, replacing unmappable input with U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { REPLACEMENT_CHAR })
                .collect(),
            Charset::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Utf16Le | Charset::Utf16Be => {
                let mut units = Vec::with_capacity(bytes.len() / 2);
                for pair in bytes.chunks_exact(2) {
                    let unit = if self == Charset::Utf16Le {
                        u16::from_le_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_be_bytes([pair[0], pair[1]])
                    };
                    units.push(unit);
                }
                let mut s = String::from_utf16_lossy(&units);
                if bytes.len() % 2 != 0 {
                    s.push(REPLACEMENT_CHAR);
                }
                s
            }
        }
    }

    /// Encode text to bytes. Characters outside the charset become `?`.
    pub fn encode(self, s: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => s.as_bytes().to_vec(),
            Charset::UsAscii => s
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Charset::Iso8859_1 => s
                .chars()
                .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
                .collect(),
            Charset::Utf16Le => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Charset::Utf16Be => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }
}
