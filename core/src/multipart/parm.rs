/*
 * parm.rs
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

//! Parser for `Content-` header values of the form
//! `type; attribute=value; attribute*=charset'lang'pct-encoded`.

use percent_encoding::percent_decode_str;

use crate::multipart::charset::Charset;
use crate::multipart::error::MultipartError;

/// Visitor for parameter parsing events. An error returned from any hook
/// aborts the parse and propagates to the caller.
pub trait ParmVisitor {
    /// Visit the type, the portion before the first `;`.
    fn visit_type(&mut self, value: &str) -> Result<(), MultipartError>;

    /// Whether an attribute whose key ends in `*` should be decoded as an
    /// RFC 5987 extended value. The key passed here still carries the `*`.
    fn decode_extended_attribute(&mut self, _attribute: &str) -> bool {
        false
    }

    /// Visit an attribute key (without any trailing `*`). Returns true iff
    /// the value should be parsed and delivered.
    fn visit_attribute(&mut self, attribute: &str) -> Result<bool, MultipartError>;

    /// Visit an attribute value. Only called when `visit_attribute`
    /// returned true and the value could be parsed.
    fn visit_attribute_value(&mut self, attribute: &str, value: &str)
        -> Result<(), MultipartError>;
}

fn find_from(s: &str, needle: char, from: usize) -> Option<usize> {
    s[from..].find(needle).map(|i| from + i)
}

/// Percent-decode with `+` as space, then interpret the bytes under
/// `charset`.
fn decode_component(s: &str, charset: Charset) -> String {
    let with_spaces = s.replace('+', " ");
    let bytes: Vec<u8> = percent_decode_str(&with_spaces).collect();
    charset.decode(&bytes)
}

/// Parse a parameterized header value, delivering the pieces to `visitor`.
///
/// A syntax error that prevents parsing further (missing closing quote
/// material, missing `'` delimiters of an extended value) ends the parse
/// without an error; attributes seen before it remain delivered. An
/// extended value naming an unknown charset is skipped silently.
pub fn parse_parameters<V: ParmVisitor>(
    header_value: &str,
    visitor: &mut V,
) -> Result<(), MultipartError> {
    let len = header_value.len();
    let bytes = header_value.as_bytes();
    let type_end = header_value.find(';').unwrap_or(len);
    visitor.visit_type(&header_value[..type_end])?;

    let mut parameter_start = type_end + 1;
    while parameter_start < len {
        let attribute_end = match find_from(header_value, '=', parameter_start) {
            Some(i) => i,
            None => break,
        };
        while bytes[parameter_start].is_ascii_whitespace() {
            parameter_start += 1;
        }
        let attribute = &header_value[parameter_start..attribute_end];
        let extended = attribute.ends_with('*') && visitor.decode_extended_attribute(attribute);
        let trimmed_attribute = if extended {
            &attribute[..attribute.len() - 1]
        } else {
            attribute
        };
        let need_value = visitor.visit_attribute(trimmed_attribute)?;

        let mut parameter_value: Option<String> = None;
        let mut parameter_value_end = attribute_end + 1;
        if extended {
            // charset'language'pct-encoded
            let first_quote = match find_from(header_value, '\'', parameter_value_end) {
                Some(i) => i,
                None => break,
            };
            let second_quote = match find_from(header_value, '\'', first_quote + 1) {
                Some(i) => i,
                None => break,
            };
            parameter_value_end = find_from(header_value, ';', second_quote + 1).unwrap_or(len);
            if need_value {
                let label = &header_value[attribute_end + 1..first_quote];
                let charset = if label.is_empty() {
                    Some(Charset::Utf8)
                } else {
                    Charset::for_label(label)
                };
                if let Some(charset) = charset {
                    parameter_value = Some(decode_component(
                        &header_value[second_quote + 1..parameter_value_end],
                        charset,
                    ));
                }
            }
        } else if header_value[parameter_value_end..].starts_with('"') {
            let tail = &header_value[parameter_value_end..];
            let mut value = String::new();
            let mut quoted = false;
            let mut end_rel = tail.len();
            let mut chars = tail.char_indices();
            while let Some((i, c)) = chars.next() {
                if c == '"' {
                    quoted = !quoted;
                } else if !quoted && c == ';' {
                    end_rel = i;
                    break;
                } else if quoted && c == '\\' {
                    match chars.next() {
                        Some((_, escaped)) => {
                            if need_value {
                                value.push(escaped);
                            }
                        }
                        None => {
                            if need_value {
                                value.push(c);
                            }
                        }
                    }
                } else if need_value {
                    value.push(c);
                }
            }
            parameter_value_end += end_rel;
            if need_value {
                parameter_value = Some(value);
            }
        } else {
            let end = find_from(header_value, ';', parameter_value_end).unwrap_or(len);
            if need_value {
                parameter_value = Some(header_value[attribute_end + 1..end].to_string());
            }
            parameter_value_end = end;
        }
        if let Some(value) = parameter_value {
            visitor.visit_attribute_value(trimmed_attribute, &value)?;
        }
        parameter_start = parameter_value_end + 1;
    }
    Ok(())
}
