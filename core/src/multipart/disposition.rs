/*
 * disposition.rs
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

//! Parsed `Content-Disposition` header value (field name and file name).

use crate::multipart::error::MultipartError;
use crate::multipart::parm::{parse_parameters, ParmVisitor};

/// Parsed representation of a `Content-Disposition` header value, built
/// once per `parsed_header_value()` call. Extended (`*`) attributes are
/// decoded; only `name` and `filename` are retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    name: Option<String>,
    file_name: Option<String>,
}

impl ContentDisposition {
    pub(crate) fn parse(header_value: &str) -> ContentDisposition {
        let mut visitor = DispositionVisitor {
            name: None,
            file_name: None,
        };
        // the visitor hooks are infallible, so the parse is too
        let _ = parse_parameters(header_value, &mut visitor);
        ContentDisposition {
            name: visitor.name,
            file_name: visitor.file_name,
        }
    }

    /// The field name given in the header, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The file name given in the header, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

struct DispositionVisitor {
    name: Option<String>,
    file_name: Option<String>,
}

impl ParmVisitor for DispositionVisitor {
    fn visit_type(&mut self, _value: &str) -> Result<(), MultipartError> {
        Ok(())
    }

    fn decode_extended_attribute(&mut self, _attribute: &str) -> bool {
        true
    }

    fn visit_attribute(&mut self, attribute: &str) -> Result<bool, MultipartError> {
        Ok(attribute.eq_ignore_ascii_case("filename") || attribute.eq_ignore_ascii_case("name"))
    }

    fn visit_attribute_value(
        &mut self,
        attribute: &str,
        value: &str,
    ) -> Result<(), MultipartError> {
        if attribute.eq_ignore_ascii_case("filename") {
            self.file_name = Some(value.to_string());
        } else {
            self.name = Some(value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only() {
        let d = ContentDisposition::parse("form-data; name=\"text\"");
        assert_eq!(d.name(), Some("text"));
        assert_eq!(d.file_name(), None);
    }

    #[test]
    fn name_and_filename() {
        let d = ContentDisposition::parse("form-data; name=\"file1\"; filename=\"a.txt\"");
        assert_eq!(d.name(), Some("file1"));
        assert_eq!(d.file_name(), Some("a.txt"));
    }

    #[test]
    fn extended_filename() {
        let d = ContentDisposition::parse("form-data; name=\"f\"; filename*=UTF-8''%C3%B6");
        assert_eq!(d.name(), Some("f"));
        assert_eq!(d.file_name(), Some("\u{f6}"));
    }

    #[test]
    fn unrelated_attributes_are_ignored() {
        let d = ContentDisposition::parse("attachment; size=42; name=f");
        assert_eq!(d.name(), Some("f"));
        assert_eq!(d.file_name(), None);
    }

    #[test]
    fn parse_is_idempotent() {
        let value = "form-data; name=\"f\"; filename=\"a.txt\"";
        assert_eq!(ContentDisposition::parse(value), ContentDisposition::parse(value));
    }
}
