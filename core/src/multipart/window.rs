/*
 * window.rs
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

//! Owned window of undecoded input bytes.
//!
//! # Buffer contract
//!
//! Scans index the window through `reader_offset()`/`writer_offset()`
//! without consuming anything; a scan that runs out of data must put the
//! reader back where it found it. Bytes leave the window only through
//! `read_split()`, and the consumed prefix is discarded on the next
//! `add()`, which is also where the undecoded-limit guard runs.

use bytes::{Buf, Bytes, BytesMut};

use crate::multipart::error::MultipartError;

pub(crate) struct InputWindow {
    buf: BytesMut,
    pos: usize,
    limit: usize,
}

impl InputWindow {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            pos: 0,
            limit,
        }
    }

    /// Append a chunk. The consumed prefix is compacted away first; the
    /// bytes still unread from previous adds must fit within the limit.
    pub fn add(&mut self, chunk: &[u8]) -> Result<(), MultipartError> {
        if self.pos >= self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        } else {
            self.buf.advance(self.pos);
            self.pos = 0;
            if self.buf.len() > self.limit {
                return Err(MultipartError::LimitExceeded(self.limit));
            }
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn readable_bytes(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn reader_offset(&self) -> usize {
        self.pos
    }

    pub fn writer_offset(&self) -> usize {
        self.buf.len()
    }

    pub fn set_reader_offset(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos;
    }

    pub fn get_byte(&self, i: usize) -> u8 {
        self.buf[i]
    }

    /// The whole window, indexed by the same absolute offsets as
    /// `get_byte`. Bytes below `reader_offset()` are already consumed.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Detach the next `n` unread bytes as an owned slice and advance the
    /// reader past them. Offsets saved before this call are invalidated.
    pub fn read_split(&mut self, n: usize) -> Bytes {
        self.buf.advance(self.pos);
        self.pos = 0;
        self.buf.split_to(n).freeze()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn release(&mut self) {
        self.buf = BytesMut::new();
        self.pos = 0;
    }
}
