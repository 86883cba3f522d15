/*
 * error.rs
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

//! Decode errors.

use std::fmt;

/// Errors from `add()`, `next()` or the event accessors. Apart from
/// `IllegalState` (accessor misuse), all of these mean the input stream is
/// unusable and the decoder should be closed.
#[derive(Debug)]
pub enum MultipartError {
    /// `add()` would leave more than the configured number of unread bytes.
    LimitExceeded(usize),
    /// The buffered bytes rule out a delimiter where one was required.
    NoDelimiter,
    /// Malformed header line (value end precedes value start).
    InvalidHeader,
    /// `Content-Transfer-Encoding` other than `7bit`, `8bit` or `binary`.
    UnknownTransferEncoding(String),
    /// Unknown or syntactically invalid charset name in a header.
    InvalidCharset(String),
    /// `multipart/mixed` inside an already mixed part.
    NestedMixed,
    /// `multipart/mixed` without a `boundary` attribute.
    MissingBoundary,
    /// Accessor called at the wrong event.
    IllegalState(&'static str),
}

impl fmt::Display for MultipartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultipartError::LimitExceeded(limit) => {
                write!(f, "undecoded data limit exceeded ({} bytes)", limit)
            }
            MultipartError::NoDelimiter => write!(f, "no multipart delimiter found"),
            MultipartError::InvalidHeader => write!(f, "invalid header"),
            MultipartError::UnknownTransferEncoding(value) => {
                write!(f, "transfer encoding unknown: {}", value)
            }
            MultipartError::InvalidCharset(name) => {
                write!(f, "invalid or unsupported charset: {}", name)
            }
            MultipartError::NestedMixed => {
                write!(f, "mixed multipart found in a previous mixed multipart")
            }
            MultipartError::MissingBoundary => {
                write!(f, "no boundary found for multipart/mixed")
            }
            MultipartError::IllegalState(what) => write!(f, "illegal state: {}", what),
        }
    }
}

impl std::error::Error for MultipartError {}
