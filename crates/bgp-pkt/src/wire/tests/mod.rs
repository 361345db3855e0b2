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

use crate::{
    iana::{BgpMessageType, UndefinedBgpMessageType},
    wire::{
        deserializer::{BgpMessageParsingError, LocatedBgpMessageParsingError},
        serializer::BgpMessageWritingError,
    },
    BgpMessage,
};
use routewire_parse_utils::{
    test_helpers::{
        combine, test_parse_error_with_one_input, test_parsed_completely_with_one_input,
        test_write,
    },
    Span,
};

mod codec;
mod keepalive;
mod open;

pub(crate) const BGP_MARKER: &[u8] = &[0xff; 16];
pub(crate) const MY_AS: &[u8] = &[0x01, 0x02];
pub(crate) const HOLD_TIME: &[u8] = &[0x00, 0xb4];
pub(crate) const BGP_ID: &[u8] = &[0xc0, 0x00, 0x02, 0x01];

#[test]
fn test_bgp_message_not_synchronized_marker() {
    let bad_marker = [0x00; 16];
    let invalid_wire = combine(vec![&bad_marker, &[0x00, 0x13, 0x04]]);

    let invalid = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(0, &invalid_wire[0..]) },
        BgpMessageParsingError::ConnectionNotSynchronized(0u128),
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &invalid_wire,
        19,
        &invalid,
    );
}

#[test]
fn test_bgp_message_length_bounds() -> Result<(), BgpMessageWritingError> {
    // The shortest message is a keepalive message to test with
    let good_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04]]);

    // Message length field doesn't match what the transport handed over
    let length_mismatch_wire = combine(vec![BGP_MARKER, &[0x00, 0x14, 0x01]]);

    // The length is less than the min BGP length
    let less_than_min_wire = combine(vec![BGP_MARKER, &[0x00, 0x12, 0x01]]);

    // KEEPALIVE must be exactly 19 octets
    let keepalive_exact_wire = combine(vec![BGP_MARKER, &[0x00, 0x14, 0x04, 0x00]]);

    // OPEN below its 29-octet minimum
    let open_less_than_min_wire = combine(vec![BGP_MARKER, &[0x00, 0x1c, 0x01], &[0x00; 9]]);

    // Above the 4,096 maximum
    let keepalive_overflow_wire = combine(vec![BGP_MARKER, &[0x10, 0x01, 0x04], &[0x00; 0x0fee]]);

    let good = BgpMessage::KeepAlive;
    let length_mismatch = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(16, &length_mismatch_wire[16..]) },
        BgpMessageParsingError::BadMessageLength(20),
    );
    let less_than_min = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(16, &less_than_min_wire[16..]) },
        BgpMessageParsingError::BadMessageLength(18),
    );
    let keepalive_exact = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(16, &keepalive_exact_wire[16..]) },
        BgpMessageParsingError::BadMessageLength(20),
    );
    let open_less_than_min = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(16, &open_less_than_min_wire[16..]) },
        BgpMessageParsingError::BadMessageLength(28),
    );
    let keepalive_overflow = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(16, &keepalive_overflow_wire[16..]) },
        BgpMessageParsingError::BadMessageLength(4097),
    );

    test_parsed_completely_with_one_input(&good_wire, 19, &good);
    test_write(&good, &good_wire)?;
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &length_mismatch_wire,
        19,
        &length_mismatch,
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &less_than_min_wire,
        18,
        &less_than_min,
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &keepalive_exact_wire,
        20,
        &keepalive_exact,
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &open_less_than_min_wire,
        28,
        &open_less_than_min,
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &keepalive_overflow_wire,
        4097,
        &keepalive_overflow,
    );
    Ok(())
}

#[test]
fn test_bgp_message_undefined_message_type() {
    let invalid_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x06]]);
    let invalid = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(18, &invalid_wire[18..]) },
        BgpMessageParsingError::UndefinedBgpMessageType(UndefinedBgpMessageType(0x06)),
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &invalid_wire,
        19,
        &invalid,
    );
}

#[test]
fn test_bgp_message_route_refresh_not_supported() {
    // Route-Refresh is a registered type code, but this codec doesn't parse
    // its body and must reject it at dispatch
    let invalid_wire = combine(vec![BGP_MARKER, &[0x00, 0x17, 0x05, 0x00, 0x01, 0x00, 0x01]]);
    let invalid = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(18, &invalid_wire[18..]) },
        BgpMessageParsingError::UnsupportedMessageType(BgpMessageType::RouteRefresh),
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &invalid_wire,
        23,
        &invalid,
    );
}
