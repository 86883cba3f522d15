/*
 * decoder.rs
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

//! Pull decoder for multipart bodies: feed chunks with `add()`, drain
//! events with `next()` until it returns `Ok(None)`, then feed more.
//! The same event stream and content bytes come out for every way of
//! splitting the input into chunks.

use bytes::Bytes;

use crate::multipart::charset::Charset;
use crate::multipart::disposition::ContentDisposition;
use crate::multipart::error::MultipartError;
use crate::multipart::parm::{parse_parameters, ParmVisitor};
use crate::multipart::scan::{self, CR, LF};
use crate::multipart::window::InputWindow;

/// Default bound on the bytes left undecoded between `add()` calls.
pub const DEFAULT_UNDECODED_LIMIT: usize = 4096;

/// Parse events. Emitted in the order
/// `(BeginField Header* HeadersComplete Content* FieldComplete)*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    BeginField,
    Header,
    HeadersComplete,
    Content,
    FieldComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    HeaderDelimiter,
    Disposition,
    Content,
    ContentDone,
    PreEpilogue,
}

enum DelimiterType {
    Disposition,
    CloseDelimiter,
}

/// Configures and creates multipart decoders.
pub struct Builder {
    charset: Charset,
    undecoded_limit: usize,
}

impl Builder {
    fn new() -> Self {
        Self {
            charset: Charset::Utf8,
            undecoded_limit: DEFAULT_UNDECODED_LIMIT,
        }
    }

    /// Default charset for header text.
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Maximum number of undecoded bytes retained across `add()` calls.
    /// Chunks of any size may be added; at most this many bytes may
    /// remain unread before the next add.
    pub fn undecoded_limit(mut self, undecoded_limit: usize) -> Self {
        self.undecoded_limit = undecoded_limit;
        self
    }

    /// Create a decoder for the given multipart boundary token, excluding
    /// the two preceding dashes.
    pub fn for_multipart_boundary(self, boundary: &str) -> MultipartDecoder {
        MultipartDecoder::new(format!("--{}", boundary), self.charset, self.undecoded_limit)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental decoder for `multipart/form-data` (and nested
/// `multipart/mixed`) bodies.
pub struct MultipartDecoder {
    /// Top-level delimiter, with the leading `--`.
    boundary: String,
    charset: Charset,
    window: InputWindow,
    state: State,
    /// Payload slice pending pickup after a Content event.
    part_data: Option<Bytes>,
    part_charset: Option<Charset>,
    /// Delimiter of an active multipart/mixed wrapper, with leading `--`.
    mixed_boundary: Option<String>,
    header_name: Option<String>,
    header_value: Option<String>,
    received_length: u64,
}

impl MultipartDecoder {
    pub fn builder() -> Builder {
        Builder::new()
    }

    fn new(boundary: String, charset: Charset, undecoded_limit: usize) -> Self {
        Self {
            boundary,
            charset,
            window: InputWindow::new(undecoded_limit),
            state: State::HeaderDelimiter,
            part_data: None,
            part_charset: None,
            mixed_boundary: None,
            header_name: None,
            header_value: None,
            received_length: 0,
        }
    }

    /// Append a chunk of body bytes for `next()` to parse.
    pub fn add(&mut self, chunk: &[u8]) -> Result<(), MultipartError> {
        self.window.add(chunk)
    }

    /// Attempt to parse some input and return the next event. `Ok(None)`
    /// means more input is needed; every byte already added is still
    /// buffered and a later `add()`/`next()` resumes where this one left
    /// off.
    pub fn next(&mut self) -> Result<Option<Event>, MultipartError> {
        self.header_name = None;
        self.header_value = None;
        loop {
            match self.state {
                State::HeaderDelimiter => match self.find_header_delimiter()? {
                    None => return Ok(None),
                    Some(DelimiterType::Disposition) => {
                        self.state = State::Disposition;
                        return Ok(Some(Event::BeginField));
                    }
                    Some(DelimiterType::CloseDelimiter) => {
                        self.state = State::PreEpilogue;
                    }
                },
                State::Disposition => {
                    if scan::skip_one_line(&mut self.window) {
                        // blank line: no more headers
                        self.state = State::Content;
                        return Ok(Some(Event::HeadersComplete));
                    }
                    let saved = self.window.reader_offset();
                    if scan::skip_control_characters(&mut self.window).is_none() {
                        self.window.set_reader_offset(saved);
                        return Ok(None);
                    }
                    let line = match scan::read_line(&mut self.window, self.charset) {
                        Some(line) => line,
                        None => {
                            self.window.set_reader_offset(saved);
                            return Ok(None);
                        }
                    };
                    self.parse_header(&line)?;
                    return Ok(Some(Event::Header));
                }
                State::Content => {
                    self.part_data = None;
                    let delimiter = self.active_delimiter().to_string();
                    if self.load_content(&delimiter) {
                        self.state = State::ContentDone;
                        if self.part_data.is_some() {
                            return Ok(Some(Event::Content));
                        }
                    } else if self.part_data.is_some() {
                        return Ok(Some(Event::Content));
                    } else {
                        return Ok(None);
                    }
                }
                State::ContentDone => {
                    self.clear_part_data();
                    self.state = State::HeaderDelimiter;
                    return Ok(Some(Event::FieldComplete));
                }
                State::PreEpilogue => return Ok(None),
            }
        }
    }

    /// Name of the header delivered by the last event. Valid only
    /// immediately after a `Header` event.
    pub fn header_name(&self) -> Result<&str, MultipartError> {
        self.header_name
            .as_deref()
            .ok_or(MultipartError::IllegalState("not in a header"))
    }

    /// Raw value of the header delivered by the last event. Valid only
    /// immediately after a `Header` event.
    pub fn header_value(&self) -> Result<&str, MultipartError> {
        if self.header_name.is_none() {
            return Err(MultipartError::IllegalState("not in a header"));
        }
        Ok(self.header_value.as_deref().unwrap_or(""))
    }

    /// Parsed representation of the current header value, for headers
    /// with a structured value (`Content-Disposition`). `Ok(None)` for
    /// other headers. Valid only immediately after a `Header` event.
    pub fn parsed_header_value(&self) -> Result<Option<ContentDisposition>, MultipartError> {
        let name = self
            .header_name
            .as_deref()
            .ok_or(MultipartError::IllegalState("not in a header"))?;
        if name.eq_ignore_ascii_case("content-disposition") {
            let value = self.header_value.as_deref().unwrap_or("");
            Ok(Some(ContentDisposition::parse(value)))
        } else {
            Ok(None)
        }
    }

    /// Take the payload slice announced by a `Content` event. Each slice
    /// can be taken at most once. Only the identity
    /// `Content-Transfer-Encoding` is supported, so decoded bytes equal
    /// the bytes on the wire.
    pub fn decoded_content(&mut self) -> Result<Bytes, MultipartError> {
        self.part_data
            .take()
            .ok_or(MultipartError::IllegalState("not a content event"))
    }

    /// True while the current part sits inside a `multipart/mixed`
    /// wrapper.
    pub fn is_mixed(&self) -> bool {
        self.mixed_boundary.is_some()
    }

    /// Bytes currently held by the decoder's buffers.
    pub fn allocated_capacity(&self) -> usize {
        self.window.capacity() + self.part_data.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    /// Release all buffered bytes and park the decoder; `next()` returns
    /// `Ok(None)` from now on.
    pub fn close(&mut self) {
        self.window.release();
        self.part_data = None;
        self.state = State::PreEpilogue;
    }

    fn active_delimiter(&self) -> &str {
        self.mixed_boundary.as_deref().unwrap_or(&self.boundary)
    }

    fn current_charset(&self) -> Charset {
        self.part_charset.unwrap_or(self.charset)
    }

    fn clear_part_data(&mut self) {
        self.part_data = None;
        self.part_charset = None;
        self.mixed_boundary = None;
        self.received_length = 0;
    }

    /// Consume the next `--boundary` or `--boundary--` line, skipping any
    /// preamble control/whitespace before it.
    fn find_header_delimiter(&mut self) -> Result<Option<DelimiterType>, MultipartError> {
        let saved = self.window.reader_offset();
        if scan::skip_control_characters(&mut self.window).is_none() {
            self.window.set_reader_offset(saved);
            return Ok(None);
        }
        let delimiter = self.active_delimiter().to_string();
        match scan::read_delimiter(&mut self.window, &delimiter, self.charset) {
            Ok(Some(matched)) => {
                if matched == delimiter {
                    Ok(Some(DelimiterType::Disposition))
                } else {
                    Ok(Some(DelimiterType::CloseDelimiter))
                }
            }
            Ok(None) => {
                self.window.set_reader_offset(saved);
                Ok(None)
            }
            Err(e) => {
                self.window.set_reader_offset(saved);
                Err(e)
            }
        }
    }

    /// Split one header line, record it for the accessors and interpret
    /// the headers that affect decoding.
    fn parse_header(&mut self, header_line: &str) -> Result<(), MultipartError> {
        let (name, value) = split_header(header_line)?;
        let name = name.to_string();
        let value = value.to_string();
        if name.eq_ignore_ascii_case("content-transfer-encoding") {
            match value.as_str() {
                "7bit" => {
                    // implied charset only replaces an explicit one
                    if self.part_charset.is_some() {
                        self.part_charset = Some(Charset::UsAscii);
                    }
                }
                "8bit" => {
                    if self.part_charset.is_some() {
                        self.part_charset = Some(Charset::Iso8859_1);
                    }
                }
                "binary" => {}
                other => {
                    return Err(MultipartError::UnknownTransferEncoding(other.to_string()));
                }
            }
        } else if name.eq_ignore_ascii_case("content-type") {
            let mut visitor = ContentTypeVisitor {
                already_mixed: self.mixed_boundary.is_some(),
                mixed: false,
                boundary_wanted: false,
                charset_wanted: false,
                mixed_boundary: None,
                part_charset: None,
            };
            parse_parameters(&value, &mut visitor)?;
            if let Some(mixed_boundary) = visitor.mixed_boundary {
                self.mixed_boundary = Some(mixed_boundary);
            }
            if let Some(part_charset) = visitor.part_charset {
                self.part_charset = Some(part_charset);
            }
            if visitor.mixed && self.mixed_boundary.is_none() {
                return Err(MultipartError::MissingBoundary);
            }
        }
        self.header_name = Some(name);
        self.header_value = Some(value);
        Ok(())
    }

    /// Scan the window for the active delimiter, detaching the longest
    /// payload prefix that cannot belong to it. Returns true when the
    /// delimiter was reached; the delimiter itself stays in the window so
    /// the following delimiter step can classify it.
    fn load_content(&mut self, delimiter: &str) -> bool {
        let bdelimiter = self.current_charset().encode(delimiter);
        // j is the match position within bdelimiter, or:
        // -2 if a CR or LF is expected next
        // -1 if an LF is expected next because a CR was just seen
        let mut j: isize = if self.received_length > 0 { -2 } else { 0 };
        let reader = self.window.reader_offset();
        let mut field_end = reader;
        let mut delimiter_found = false;
        for i in reader..self.window.writer_offset() {
            let b = self.window.get_byte(i);
            if j >= 0 {
                if b == bdelimiter[j as usize] {
                    if j as usize == bdelimiter.len() - 1 {
                        delimiter_found = true;
                        break;
                    }
                    j += 1;
                } else {
                    j = -2;
                }
            }
            if j < 0 {
                if b == CR {
                    field_end = i;
                    j = -1;
                } else if b == LF {
                    if j == -2 {
                        field_end = i;
                    }
                    j = 0;
                } else {
                    j = -2;
                }
            }
        }
        let n = field_end - reader;
        if n > 0 {
            let data = self.window.read_split(n);
            self.received_length += data.len() as u64;
            self.part_data = Some(data);
        }
        delimiter_found
    }
}

struct ContentTypeVisitor {
    already_mixed: bool,
    mixed: bool,
    boundary_wanted: bool,
    charset_wanted: bool,
    mixed_boundary: Option<String>,
    part_charset: Option<Charset>,
}

impl ParmVisitor for ContentTypeVisitor {
    fn visit_type(&mut self, value: &str) -> Result<(), MultipartError> {
        self.mixed = value.eq_ignore_ascii_case("multipart/mixed");
        if self.mixed && self.already_mixed {
            return Err(MultipartError::NestedMixed);
        }
        Ok(())
    }

    fn visit_attribute(&mut self, attribute: &str) -> Result<bool, MultipartError> {
        self.boundary_wanted = self.mixed && attribute.eq_ignore_ascii_case("boundary");
        self.charset_wanted = !self.mixed && attribute.eq_ignore_ascii_case("charset");
        Ok(self.boundary_wanted || self.charset_wanted)
    }

    fn visit_attribute_value(
        &mut self,
        _attribute: &str,
        value: &str,
    ) -> Result<(), MultipartError> {
        if self.boundary_wanted {
            self.mixed_boundary = Some(format!("--{}", value));
        } else if self.charset_wanted {
            match Charset::for_label(value) {
                Some(charset) => self.part_charset = Some(charset),
                None => return Err(MultipartError::InvalidCharset(value.to_string())),
            }
        }
        Ok(())
    }
}

fn find_non_whitespace(s: &str, from: usize) -> usize {
    let bytes = s.as_bytes();
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn find_end_of_string(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    i
}

/// Split a header line into name and value. The name runs up to the first
/// `:` or whitespace; the value is trimmed on both sides. An empty value
/// is allowed, but trailing content that ends before the value starts is
/// not.
fn split_header(line: &str) -> Result<(&str, &str), MultipartError> {
    let bytes = line.as_bytes();
    let name_start = find_non_whitespace(line, 0);
    let mut name_end = name_start;
    while name_end < bytes.len() {
        let b = bytes[name_end];
        if b == b':' || b.is_ascii_whitespace() {
            break;
        }
        name_end += 1;
    }
    let mut colon_end = name_end;
    while colon_end < bytes.len() {
        if bytes[colon_end] == b':' {
            colon_end += 1;
            break;
        }
        colon_end += 1;
    }
    let value_start = find_non_whitespace(line, colon_end);
    let value_end = find_end_of_string(line);
    if value_end < value_start {
        return Err(MultipartError::InvalidHeader);
    }
    Ok((&line[name_start..name_end], &line[value_start..value_end]))
}
