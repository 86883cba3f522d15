/*
 * decoder_stream.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Integration tests for the multipart decoder: whole-body decoding,
 * chunk-split equivalence, and the event-grammar / content-reconstruction
 * properties.
 */

use proptest::prelude::*;

use partitore_core::multipart::{Event, MultipartDecoder, MultipartError};

const BOUNDARY: &str = "wCv6rZqJt5mY";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DecodedPart {
    headers: Vec<(String, String)>,
    content: Vec<u8>,
}

/// Drive a decoder over the given chunks, asserting the event grammar
/// `(BeginField Header* HeadersComplete Content* FieldComplete)*` along
/// the way, and collect the decoded parts.
fn decode_parts(boundary: &str, chunks: &[Vec<u8>]) -> Result<Vec<DecodedPart>, MultipartError> {
    let mut decoder = MultipartDecoder::builder().for_multipart_boundary(boundary);
    let mut parts = Vec::new();
    let mut current: Option<DecodedPart> = None;
    let mut in_content = false;
    for chunk in chunks {
        decoder.add(chunk)?;
        while let Some(event) = decoder.next()? {
            match event {
                Event::BeginField => {
                    assert!(current.is_none(), "BeginField inside an open field");
                    current = Some(DecodedPart::default());
                    in_content = false;
                }
                Event::Header => {
                    assert!(!in_content, "Header after HeadersComplete");
                    let part = current.as_mut().expect("Header outside a field");
                    part.headers.push((
                        decoder.header_name().unwrap().to_string(),
                        decoder.header_value().unwrap().to_string(),
                    ));
                }
                Event::HeadersComplete => {
                    assert!(current.is_some(), "HeadersComplete outside a field");
                    assert!(!in_content, "HeadersComplete twice");
                    in_content = true;
                }
                Event::Content => {
                    assert!(in_content, "Content before HeadersComplete");
                    let data = decoder.decoded_content().unwrap();
                    current.as_mut().unwrap().content.extend_from_slice(&data);
                }
                Event::FieldComplete => {
                    assert!(in_content, "FieldComplete before HeadersComplete");
                    parts.push(current.take().unwrap());
                    in_content = false;
                }
            }
        }
    }
    assert!(current.is_none(), "field left open at end of input");
    Ok(parts)
}

fn one_chunk(body: &[u8]) -> Vec<Vec<u8>> {
    vec![body.to_vec()]
}

fn byte_at_a_time(body: &[u8]) -> Vec<Vec<u8>> {
    body.iter().map(|&b| vec![b]).collect()
}

#[test]
fn two_form_fields() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhello\r\n\
                 --X\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\nworld\r\n--X--";
    let parts = decode_parts("X", &one_chunk(body)).unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].headers.len(), 1);
    assert_eq!(parts[0].headers[0].0, "Content-Disposition");
    assert_eq!(parts[0].headers[0].1, "form-data; name=\"a\"");
    assert_eq!(parts[0].content, b"hello");
    assert_eq!(parts[1].headers[0].1, "form-data; name=\"b\"");
    assert_eq!(parts[1].content, b"world");
}

#[test]
fn file_upload_with_filename() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\n\
                 Content-Type: text/plain\r\n\r\nContent of a.txt.\n\r\n--X--\r\n";
    let parts = decode_parts("X", &one_chunk(body)).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].headers.len(), 2);
    assert_eq!(parts[0].content, b"Content of a.txt.\n");
}

#[test]
fn extended_filename() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"f\"; filename*=UTF-8''%C3%B6\r\n\r\nx\r\n--X--";
    let mut decoder = MultipartDecoder::builder().for_multipart_boundary("X");
    decoder.add(body).unwrap();
    assert_eq!(decoder.next().unwrap(), Some(Event::BeginField));
    assert_eq!(decoder.next().unwrap(), Some(Event::Header));
    let disposition = decoder.parsed_header_value().unwrap().unwrap();
    assert_eq!(disposition.name(), Some("f"));
    assert_eq!(disposition.file_name(), Some("\u{f6}"));
}

#[test]
fn quoted_escapes_in_disposition() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"va\\\"l1\"\r\n\r\nx\r\n--X--";
    let mut decoder = MultipartDecoder::builder().for_multipart_boundary("X");
    decoder.add(body).unwrap();
    assert_eq!(decoder.next().unwrap(), Some(Event::BeginField));
    assert_eq!(decoder.next().unwrap(), Some(Event::Header));
    let disposition = decoder.parsed_header_value().unwrap().unwrap();
    assert_eq!(disposition.name(), Some("va\"l1"));
}

#[test]
fn byte_at_a_time_matches_single_chunk() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhello\r\n\
                 --X\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\nworld\r\n--X--";
    let joint = decode_parts("X", &one_chunk(body)).unwrap();
    let split = decode_parts("X", &byte_at_a_time(body)).unwrap();
    assert_eq!(joint, split);
}

#[test]
fn unterminated_closing_delimiter() {
    let body = b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhello\r\n--X--";
    let mut decoder = MultipartDecoder::builder().for_multipart_boundary("X");
    decoder.add(body).unwrap();
    let mut events = Vec::new();
    while let Some(event) = decoder.next().unwrap() {
        if event == Event::Content {
            decoder.decoded_content().unwrap();
        }
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            Event::BeginField,
            Event::Header,
            Event::HeadersComplete,
            Event::Content,
            Event::FieldComplete,
        ]
    );
    assert_eq!(decoder.next().unwrap(), None);
}

#[test]
fn leading_crlf_before_first_delimiter_is_tolerated() {
    let body = b"\r\n--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhi\r\n--X--";
    let parts = decode_parts("X", &one_chunk(body)).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].content, b"hi");
}

#[test]
fn long_real_world_boundary() {
    // three-field body with a browser-style boundary
    let boundary = "---------------------------9051914041544843365972754266";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\ntext default\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file1\"; filename=\"a.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nContent of a.txt.\n\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file2\"; filename=\"a.html\"\r\n\
         Content-Type: text/html\r\n\r\n<!DOCTYPE html><title>Content of a.html.</title>\n\r\n\
         --{b}--",
        b = boundary
    );
    let parts = decode_parts(boundary, &one_chunk(body.as_bytes())).unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].content, b"text default");
    assert_eq!(parts[1].content, b"Content of a.txt.\n");
    assert_eq!(
        parts[2].content,
        b"<!DOCTYPE html><title>Content of a.html.</title>\n"
    );
    assert_eq!(parts[1].headers[1], ("Content-Type".to_string(), "text/plain".to_string()));
}

#[test]
fn content_spanning_many_chunks_reassembles() {
    let mut body = Vec::new();
    body.extend_from_slice(b"--X\r\nContent-Disposition: form-data; name=\"f\"\r\n\r\n");
    let payload: Vec<u8> = (0..512u32)
        .flat_map(|i| format!("line {}\r\n", i).into_bytes())
        .collect();
    body.extend_from_slice(&payload);
    body.extend_from_slice(b"\r\n--X--");
    let chunks: Vec<Vec<u8>> = body.chunks(7).map(|c| c.to_vec()).collect();
    let parts = decode_parts("X", &chunks).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].content, payload);
}

#[test]
fn undecoded_limit_is_deterministic() {
    let mut decoder = MultipartDecoder::builder()
        .undecoded_limit(64)
        .for_multipart_boundary("X");
    // a headerless run with no line breaks cannot be consumed
    decoder.add(&[b'a'; 80]).unwrap();
    assert_eq!(decoder.next().unwrap(), None);
    assert!(matches!(
        decoder.add(b"b"),
        Err(MultipartError::LimitExceeded(64))
    ));
}

// --- property tests --------------------------------------------------------

/// Payload bytes that cannot collide with a delimiter: anything printable
/// plus CR/LF, minus `-`.
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop::sample::select(
        (b' '..=b'~')
            .filter(|&b| b != b'-')
            .chain([b'\r', b'\n'])
            .collect::<Vec<u8>>(),
    );
    prop::collection::vec(byte, 0..64)
}

fn parts_strategy() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::vec(("[a-z]{1,8}", payload_strategy()), 1..4)
}

fn build_body(parts: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, payload) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn split_body(body: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = cuts.iter().map(|&c| c % (body.len() + 1)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    let mut chunks = Vec::new();
    let mut prev = 0;
    for &cut in &cuts {
        chunks.push(body[prev..cut].to_vec());
        prev = cut;
    }
    chunks.push(body[prev..].to_vec());
    chunks
}

proptest! {
    /// Any chunking of a body yields the same events and the same part
    /// contents as feeding it whole, and the contents reassemble the
    /// original payloads byte for byte.
    #[test]
    fn chunk_splitting_equivalence(
        parts in parts_strategy(),
        cuts in prop::collection::vec(0usize..4096, 0..8),
    ) {
        let body = build_body(&parts);
        let joint = decode_parts(BOUNDARY, &one_chunk(&body)).unwrap();
        let split = decode_parts(BOUNDARY, &split_body(&body, &cuts)).unwrap();
        prop_assert_eq!(&joint, &split);

        prop_assert_eq!(joint.len(), parts.len());
        for (decoded, (name, payload)) in joint.iter().zip(parts.iter()) {
            prop_assert_eq!(&decoded.content, payload);
            let expected_disposition = format!("form-data; name=\"{}\"", name);
            prop_assert_eq!(
                decoded.headers[0].1.as_str(),
                expected_disposition.as_str()
            );
        }
    }

    /// Feeding one byte per add() call loses nothing: the reader offset is
    /// restored whenever next() reports that more input is needed.
    #[test]
    fn single_byte_chunks_reassemble(parts in parts_strategy()) {
        let body = build_body(&parts);
        let decoded = decode_parts(BOUNDARY, &byte_at_a_time(&body)).unwrap();
        prop_assert_eq!(decoded.len(), parts.len());
        for (decoded, (_, payload)) in decoded.iter().zip(parts.iter()) {
            prop_assert_eq!(&decoded.content, payload);
        }
    }
}
