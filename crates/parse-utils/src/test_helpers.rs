// Copyright (C) 2024-present The RouteWire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helper methods to make writing tests easier

use crate::{
    ReadablePdu, ReadablePduWithOneInput, Span, WritablePdu, WritablePduWithOneInput,
};
use std::fmt::Debug;

/// Glue a set of byte slices into one owned wire buffer
pub fn combine(v: Vec<&[u8]>) -> Vec<u8> {
    v.iter()
        .flat_map(|x| x.iter())
        .copied()
        .collect::<Vec<u8>>()
}

/// Parse the given buffer and assert that it's parsed completely (no bytes
/// left in the buffer) into the expected value
pub fn test_parsed_completely<'a, T, E>(input: &'a [u8], expected: &T) -> T
where
    T: ReadablePdu<'a, E> + PartialEq + Debug,
    E: Debug,
{
    let span = Span::new(input);
    let result = T::from_wire(span);
    assert!(result.is_ok(), "Message failed parsing, while expecting it to pass: {result:?}");
    let (remainder, parsed) = result.unwrap();
    assert_eq!(&parsed, expected);
    assert_eq!(
        remainder.fragment().len(),
        0,
        "Only part of the buffer is parsed: {remainder:?}"
    );
    parsed
}

/// Parse the given buffer with one external input and assert that it's
/// parsed completely into the expected value
pub fn test_parsed_completely_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected: &T,
) -> T
where
    T: ReadablePduWithOneInput<'a, I, E> + PartialEq + Debug,
    E: Debug,
{
    let span = Span::new(input);
    let result = T::from_wire(span, parser_input);
    assert!(result.is_ok(), "Message failed parsing, while expecting it to pass: {result:?}");
    let (remainder, parsed) = result.unwrap();
    assert_eq!(&parsed, expected);
    assert_eq!(
        remainder.fragment().len(),
        0,
        "Only part of the buffer is parsed: {remainder:?}"
    );
    parsed
}

/// Parse the given buffer and assert it raises the expected located error
pub fn test_parse_error<'a, T, E>(input: &'a [u8], expected_error: &E)
where
    T: ReadablePdu<'a, E> + Debug,
    E: Debug + PartialEq,
{
    let span = Span::new(input);
    let result = T::from_wire(span);
    assert!(result.is_err(), "Message parsed, while expecting it to fail: {result:?}");
    match result.err().expect("parse error") {
        nom::Err::Incomplete(needed) => {
            panic!("Expected a located parsing error, got Incomplete({needed:?})")
        }
        nom::Err::Error(error) | nom::Err::Failure(error) => assert_eq!(&error, expected_error),
    }
}

/// Parse the given buffer with one external input and assert it raises the
/// expected located error
pub fn test_parse_error_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected_error: &E,
) where
    T: ReadablePduWithOneInput<'a, I, E> + Debug,
    E: Debug + PartialEq,
{
    let span = Span::new(input);
    let result = T::from_wire(span, parser_input);
    assert!(result.is_err(), "Message parsed, while expecting it to fail: {result:?}");
    match result.err().expect("parse error") {
        nom::Err::Incomplete(needed) => {
            panic!("Expected a located parsing error, got Incomplete({needed:?})")
        }
        nom::Err::Error(error) | nom::Err::Failure(error) => assert_eq!(&error, expected_error),
    }
}

/// Write the given PDU and assert the produced wire bytes (and the reported
/// length) match the expected buffer
pub fn test_write<T, E>(input: &T, expected: &[u8]) -> Result<(), E>
where
    T: WritablePdu<E>,
    E: Debug,
{
    let mut buf: Vec<u8> = Vec::with_capacity(input.len());
    input.write(&mut buf)?;
    assert_eq!(buf, expected);
    assert_eq!(input.len(), expected.len(), "PDU reported length doesn't match the written buffer");
    Ok(())
}

/// Write the given PDU with one external input and assert the produced wire
/// bytes match the expected buffer
pub fn test_write_with_one_input<T, I, E>(
    input: &T,
    writer_input: I,
    expected: &[u8],
) -> Result<(), E>
where
    I: Copy,
    T: WritablePduWithOneInput<I, E>,
    E: Debug,
{
    let mut buf: Vec<u8> = Vec::with_capacity(input.len(writer_input));
    input.write(&mut buf, writer_input)?;
    assert_eq!(buf, expected);
    assert_eq!(
        input.len(writer_input),
        expected.len(),
        "PDU reported length doesn't match the written buffer"
    );
    Ok(())
}
