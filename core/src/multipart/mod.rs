/*
 * mod.rs
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

//! Incremental decoding of `multipart/form-data` and nested
//! `multipart/mixed` bodies (pull model, chunk-split tolerant).

mod charset;
mod decoder;
mod disposition;
mod error;
mod parm;
mod scan;
mod window;

pub use charset::Charset;
pub use decoder::{Builder, Event, MultipartDecoder, DEFAULT_UNDECODED_LIMIT};
pub use disposition::ContentDisposition;
pub use error::MultipartError;
pub use parm::{parse_parameters, ParmVisitor};
