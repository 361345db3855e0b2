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
    codec::BgpMessageCodec,
    open::{BgpOpenMessageParameter, BGP_VERSION},
    wire::{
        deserializer::{
            open::BgpOpenMessageParsingError, BgpMessageParsingError,
            LocatedBgpMessageParsingError,
        },
        serializer::BgpMessageWritingError,
        tests::{BGP_ID, BGP_MARKER, HOLD_TIME, MY_AS},
    },
    BgpMessage, BgpOpenMessage,
};
use nom::error::ErrorKind;
use routewire_parse_utils::{
    test_helpers::{
        combine, test_parse_error_with_one_input, test_parsed_completely_with_one_input,
        test_write,
    },
    Span,
};
use std::net::Ipv4Addr;

#[test]
fn test_open_no_params() -> Result<(), BgpMessageWritingError> {
    let good_wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1d, 0x01],
        &[BGP_VERSION],
        MY_AS,
        HOLD_TIME,
        BGP_ID,
        &[0x00],
    ]);
    let good = BgpMessage::Open(BgpOpenMessage::new(
        258,
        180,
        Ipv4Addr::new(192, 0, 2, 1),
        vec![],
    ));

    test_parsed_completely_with_one_input(&good_wire, 29, &good);
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_open_with_params() -> Result<(), BgpMessageWritingError> {
    // One opaque parameter: type 2 (capabilities), six value octets
    let good_wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x25, 0x01],
        &[BGP_VERSION],
        MY_AS,
        HOLD_TIME,
        BGP_ID,
        &[0x08],
        &[0x02, 0x06, 0x01, 0x04, 0x00, 0x01, 0x00, 0x01],
    ]);
    let good = BgpMessage::Open(BgpOpenMessage::new(
        258,
        180,
        Ipv4Addr::new(192, 0, 2, 1),
        vec![BgpOpenMessageParameter::new(
            2,
            vec![0x01, 0x04, 0x00, 0x01, 0x00, 0x01],
        )],
    ));

    test_parsed_completely_with_one_input(&good_wire, 37, &good);
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_open_unsupported_version() {
    let invalid_wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1d, 0x01],
        &[0x05],
        MY_AS,
        HOLD_TIME,
        BGP_ID,
        &[0x00],
    ]);
    let invalid = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(19, &invalid_wire[19..]) },
        BgpMessageParsingError::BgpOpenMessageParsingError(
            BgpOpenMessageParsingError::UnsupportedVersionNumber(5),
        ),
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &invalid_wire,
        29,
        &invalid,
    );

    // The response carries the largest supported version as its payload
    let response = BgpMessageCodec::deserialize(&invalid_wire, 29)
        .err()
        .expect("version 5 must be rejected");
    assert_eq!(response.header().length(), 23);
    assert_eq!(response.message().error_code(), 2);
    assert_eq!(response.message().error_subcode(), 1);
    assert_eq!(response.message().data(), &[0x00, BGP_VERSION]);
}

#[test]
fn test_open_param_overruns_window() {
    // opt_params_len claims three octets but the parameter header alone
    // declares four octets of value
    let invalid_wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x20, 0x01],
        &[BGP_VERSION],
        MY_AS,
        HOLD_TIME,
        BGP_ID,
        &[0x03],
        &[0x02, 0x04, 0xaa],
    ]);
    let response = BgpMessageCodec::deserialize(&invalid_wire, 32)
        .err()
        .expect("truncated parameter must be rejected");
    assert_eq!(response.header().length(), 21);
    assert_eq!(response.message().error_code(), 2);
    assert_eq!(response.message().error_subcode(), 0);
    assert_eq!(response.message().data(), &[]);
}

#[test]
fn test_open_trailing_bytes_after_params() {
    // opt_params_len consumes less than the message length provides
    let invalid_wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1e, 0x01],
        &[BGP_VERSION],
        MY_AS,
        HOLD_TIME,
        BGP_ID,
        &[0x00],
        &[0xaa],
    ]);
    let invalid = LocatedBgpMessageParsingError::new(
        unsafe { Span::new_from_raw_offset(29, &invalid_wire[29..]) },
        BgpMessageParsingError::NomError(ErrorKind::NonEmpty),
    );
    test_parse_error_with_one_input::<BgpMessage, u16, LocatedBgpMessageParsingError<'_>>(
        &invalid_wire,
        30,
        &invalid,
    );
}
