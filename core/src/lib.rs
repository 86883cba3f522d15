/*
 * lib.rs
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

//! Partitore core: incremental, pull-style decoding of multipart HTTP
//! message bodies.
//!
//! The decoder accepts input as a sequence of arbitrary byte chunks and
//! produces a deterministic event stream of part boundaries, part headers
//! and part payload bytes. Splitting the input differently never changes
//! the events or the bytes:
//!
//! ```
//! use partitore_core::multipart::{Event, MultipartDecoder};
//!
//! let mut decoder = MultipartDecoder::builder().for_multipart_boundary("X");
//! decoder.add(b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhello\r\n--X--")
//!     .unwrap();
//! assert_eq!(decoder.next().unwrap(), Some(Event::BeginField));
//! assert_eq!(decoder.next().unwrap(), Some(Event::Header));
//! assert_eq!(decoder.header_name().unwrap(), "Content-Disposition");
//! assert_eq!(decoder.next().unwrap(), Some(Event::HeadersComplete));
//! assert_eq!(decoder.next().unwrap(), Some(Event::Content));
//! assert_eq!(&decoder.decoded_content().unwrap()[..], b"hello");
//! assert_eq!(decoder.next().unwrap(), Some(Event::FieldComplete));
//! assert_eq!(decoder.next().unwrap(), None);
//! ```

pub mod multipart;
