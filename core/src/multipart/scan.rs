/*
 * scan.rs
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

//! Byte-level scan primitives: control skipping, line reading, delimiter
//! matching. "Need more data" is a `None` return; the caller restores the
//! reader offset it saved on entry.

use memchr::{memchr, memmem};

use crate::multipart::charset::Charset;
use crate::multipart::error::MultipartError;
use crate::multipart::window::InputWindow;

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';

/// ISO control bytes plus ASCII whitespace: the classes skipped between a
/// part boundary and the surrounding line structure.
fn is_control_or_space(b: u8) -> bool {
    b <= 0x20 || (0x7f..=0x9f).contains(&b)
}

/// Advance the reader past leading control/whitespace bytes. None if the
/// window is exhausted before a regular byte appears.
pub(crate) fn skip_control_characters(win: &mut InputWindow) -> Option<()> {
    let mut i = win.reader_offset();
    let end = win.writer_offset();
    while i < end {
        if !is_control_or_space(win.get_byte(i)) {
            win.set_reader_offset(i);
            return Some(());
        }
        i += 1;
    }
    None
}

/// Consume exactly one CRLF or LF. A lone CR, or a CR at the end of the
/// window, leaves the reader untouched and returns false.
pub(crate) fn skip_one_line(win: &mut InputWindow) -> bool {
    let pos = win.reader_offset();
    if win.readable_bytes() == 0 {
        return false;
    }
    match win.get_byte(pos) {
        LF => {
            win.set_reader_offset(pos + 1);
            true
        }
        CR => {
            if pos + 1 < win.writer_offset() && win.get_byte(pos + 1) == LF {
                win.set_reader_offset(pos + 2);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Read one text line, decoding it under `charset` and consuming the CRLF
/// or LF terminator. None when no complete line is buffered yet.
pub(crate) fn read_line(win: &mut InputWindow, charset: Charset) -> Option<String> {
    let pos = win.reader_offset();
    let hay = &win.as_slice()[pos..win.writer_offset()];
    let lf = memchr(LF, hay)?;
    let line_len = if lf > 0 && hay[lf - 1] == CR { lf - 1 } else { lf };
    if line_len == 0 {
        return None;
    }
    let line = charset.decode(&hay[..line_len]);
    win.set_reader_offset(pos + lf + 1);
    Some(line)
}

/// Locate the next `--boundary` delimiter and classify it as opening or
/// closing, returning the matched delimiter string (with the trailing `--`
/// for the closing form). Advances past the delimiter and its line
/// terminator; the terminator is mandatory for the opening form but
/// tolerated as absent on the closing form (Adobe Flash uploader).
///
/// `Ok(None)` when more input could still complete a delimiter; the
/// reader is left where it was. `NoDelimiter` once the buffered bytes rule
/// both forms out.
pub(crate) fn read_delimiter(
    win: &mut InputWindow,
    delimiter: &str,
    charset: Charset,
) -> Result<Option<String>, MultipartError> {
    let saved = win.reader_offset();
    let bdelimiter = charset.encode(delimiter);
    let found = {
        let hay = &win.as_slice()[saved..win.writer_offset()];
        match memmem::find(hay, &bdelimiter) {
            Some(i) => i,
            None => return Ok(None),
        }
    };
    let end = win.writer_offset();
    let mut pos = saved + found + bdelimiter.len();
    if pos >= end {
        return Ok(None);
    }
    let b = win.get_byte(pos);
    pos += 1;
    match b {
        CR => {
            if pos >= end {
                return Ok(None);
            }
            if win.get_byte(pos) == LF {
                win.set_reader_offset(pos + 1);
                Ok(Some(delimiter.to_string()))
            } else {
                // CR not followed by LF rules out the opening form and
                // there is no closing --
                Err(MultipartError::NoDelimiter)
            }
        }
        LF => {
            win.set_reader_offset(pos);
            Ok(Some(delimiter.to_string()))
        }
        b'-' => {
            if pos >= end {
                return Ok(None);
            }
            if win.get_byte(pos) != b'-' {
                return Err(MultipartError::NoDelimiter);
            }
            pos += 1;
            let closing = format!("{}--", delimiter);
            if pos >= end {
                // end of input right after --boundary--: accept
                win.set_reader_offset(pos);
                return Ok(Some(closing));
            }
            match win.get_byte(pos) {
                CR => {
                    if pos + 1 >= end {
                        return Ok(None);
                    }
                    if win.get_byte(pos + 1) == LF {
                        win.set_reader_offset(pos + 2);
                        Ok(Some(closing))
                    } else {
                        Err(MultipartError::NoDelimiter)
                    }
                }
                LF => {
                    win.set_reader_offset(pos + 1);
                    Ok(Some(closing))
                }
                _ => {
                    // no terminator after the closing form: accept and
                    // leave the byte for the epilogue
                    win.set_reader_offset(pos);
                    Ok(Some(closing))
                }
            }
        }
        _ => Err(MultipartError::NoDelimiter),
    }
}
