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

use crate::BinarySpan;
use nom::{InputIter, InputLength, InputTake, Slice};

#[test]
fn test_new_starts_at_zero() {
    let buffer: &[u8] = &[0x01, 0x02, 0x03];
    let span = BinarySpan::new(buffer);
    assert_eq!(span.location_offset(), 0);
    assert_eq!(*span.fragment(), buffer);
    assert_eq!(span.input_len(), 3);
}

#[test]
fn test_slice_advances_offset() {
    let buffer: &[u8] = &[0x0a, 0x0b, 0x0c, 0x0d];
    let span = BinarySpan::new(buffer);

    let rest = span.slice(1..);
    assert_eq!(rest.location_offset(), 1);
    assert_eq!(*rest.fragment(), &buffer[1..]);

    let middle = rest.slice(1..3);
    assert_eq!(middle.location_offset(), 2);
    assert_eq!(*middle.fragment(), &buffer[2..4]);

    // An empty slice keeps pointing at where it was taken
    let empty = middle.slice(2..);
    assert_eq!(empty.location_offset(), 4);
    assert_eq!(empty.input_len(), 0);
}

#[test]
fn test_take_split() {
    let buffer: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05];
    let span = BinarySpan::new(buffer);
    let (rest, taken) = span.take_split(2);

    assert_eq!(taken.location_offset(), 0);
    assert_eq!(*taken.fragment(), &buffer[..2]);
    assert_eq!(rest.location_offset(), 2);
    assert_eq!(*rest.fragment(), &buffer[2..]);

    let taken_again = rest.take(1);
    assert_eq!(taken_again.location_offset(), 2);
    assert_eq!(*taken_again.fragment(), &buffer[2..3]);
}

#[test]
fn test_iteration_delegates_to_fragment() {
    let buffer: &[u8] = &[0x10, 0x20, 0x30];
    let span = BinarySpan::new(buffer);
    assert_eq!(span.iter_elements().collect::<Vec<u8>>(), vec![0x10, 0x20, 0x30]);
    assert_eq!(span.position(|x| x == 0x20), Some(1));
    assert_eq!(span.position(|x| x == 0x40), None);
}

#[test]
fn test_equality_includes_offset() {
    let buffer: &[u8] = &[0x01, 0x02, 0x02];
    let span = BinarySpan::new(buffer);
    // Same bytes, different positions
    let first = span.slice(1..2);
    let second = span.slice(2..3);
    assert_eq!(*first.fragment(), *second.fragment());
    assert_ne!(first, second);

    let first_again = span.slice(1..2);
    assert_eq!(first, first_again);
}

#[test]
fn test_raw_offset_construction() {
    let buffer: &[u8] = &[0xff, 0xfe];
    let span = unsafe { BinarySpan::new_from_raw_offset(16, buffer) };
    assert_eq!(span.location_offset(), 16);
    assert_eq!(span.slice(1..).location_offset(), 17);
}
