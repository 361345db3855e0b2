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
    iana::BgpMessageType,
    path_attribute::{
        AsPath, AsPathSegment, AsPathSegmentType, AttributeFlags, NextHop, Origin, PathAttribute,
        PathAttributeValue, UnknownAttribute,
    },
    wire::{serializer::BgpMessageWritingError, tests::BGP_MARKER},
    BgpMessage, BgpNotificationMessage, BgpOpenMessage, BgpUpdateMessage,
};
use routewire_parse_utils::test_helpers::combine;
use std::net::Ipv4Addr;

#[test]
fn test_declared_length_out_of_bounds() {
    // Too small, and too small to even hold a marker: the size check runs
    // before any byte of the buffer is inspected
    let short_buffer = [0x00u8; 10];
    let response = BgpMessageCodec::deserialize(&short_buffer, 10)
        .err()
        .expect("an 10-octet message must be rejected");
    assert_eq!(response.header().length(), 21);
    assert_eq!(response.header().message_type(), BgpMessageType::Notification);
    assert_eq!(response.message().error_code(), 1);
    assert_eq!(response.message().error_subcode(), 1);
    assert_eq!(response.message().data(), &[]);

    // Too large
    let long_buffer = vec![0xffu8; 4097];
    let response = BgpMessageCodec::deserialize(&long_buffer, 4097)
        .err()
        .expect("a 4097-octet message must be rejected");
    assert_eq!(response.message().error_code(), 1);
    assert_eq!(response.message().error_subcode(), 1);
    assert_eq!(response.message().data(), &[]);
}

#[test]
fn test_marker_corruption() {
    let mut front_corrupt = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04]]);
    front_corrupt[0] = 0x00;
    let mut back_corrupt = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04]]);
    back_corrupt[15] = 0xfe;

    for wire in [front_corrupt, back_corrupt] {
        let response = BgpMessageCodec::deserialize(&wire, 19)
            .err()
            .expect("corrupted marker must be rejected");
        assert_eq!(response.header().length(), 21);
        assert_eq!(response.message().error_code(), 1);
        assert_eq!(response.message().error_subcode(), 1);
        assert_eq!(response.message().data(), &[]);
    }
}

#[test]
fn test_header_length_disagreement() {
    // The length field says 19, the transport handed over 20
    let wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04, 0x00]]);
    let response = BgpMessageCodec::deserialize(&wire, 20)
        .err()
        .expect("length disagreement must be rejected");
    assert_eq!(response.header().length(), 23);
    assert_eq!(response.message().error_code(), 1);
    assert_eq!(response.message().error_subcode(), 2);
    // Diagnostic data is the offending length field, big endian
    assert_eq!(response.message().data(), &[0x00, 0x13]);
}

#[test]
fn test_bad_message_type_diagnostic() {
    // The diagnostic octet is the unrecognized type itself
    let undefined_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x06]]);
    let response = BgpMessageCodec::deserialize(&undefined_wire, 19)
        .err()
        .expect("type 6 must be rejected");
    assert_eq!(response.header().length(), 22);
    assert_eq!(response.message().error_code(), 1);
    assert_eq!(response.message().error_subcode(), 3);
    assert_eq!(response.message().data(), &[0x06]);

    let route_refresh_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x05]]);
    let response = BgpMessageCodec::deserialize(&route_refresh_wire, 19)
        .err()
        .expect("route-refresh must be rejected");
    assert_eq!(response.message().error_subcode(), 3);
    assert_eq!(response.message().data(), &[0x05]);
}

#[test]
fn test_malformed_as_path_through_codec() {
    let wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1e, 0x02],
        &[0x00, 0x00],
        &[0x00, 0x07],
        &[0x40, 0x02, 0x04, 0x02, 0x03, 0x00, 0x64],
    ]);
    let response = BgpMessageCodec::deserialize(&wire, 30)
        .err()
        .expect("overrunning as-path segment must be rejected");
    assert_eq!(response.message().error_code(), 3);
    assert_eq!(response.message().error_subcode(), 11);
}

#[test]
fn test_attribute_length_overrun_through_codec() {
    // NEXT_HOP declares four value octets, its section window holds three
    let wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1d, 0x02],
        &[0x00, 0x00],
        &[0x00, 0x06],
        &[0x40, 0x03, 0x04, 0xc0, 0x00, 0x02],
    ]);
    let response = BgpMessageCodec::deserialize(&wire, 29)
        .err()
        .expect("attribute overrunning its window must be rejected");
    assert_eq!(response.message().error_code(), 3);
    assert_eq!(response.message().error_subcode(), 5);
}

#[test]
fn test_attribute_flags_error_through_codec() {
    let wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1b, 0x02],
        &[0x00, 0x00],
        &[0x00, 0x04],
        &[0xc0, 0x01, 0x01, 0x00],
    ]);
    let response = BgpMessageCodec::deserialize(&wire, 27)
        .err()
        .expect("mis-flagged origin must be rejected");
    assert_eq!(response.message().error_code(), 3);
    assert_eq!(response.message().error_subcode(), 4);
    assert_eq!(response.message().data(), &[0xc0, 0x01]);
}

#[test]
fn test_unrecognized_well_known_through_codec() {
    let wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1b, 0x02],
        &[0x00, 0x00],
        &[0x00, 0x04],
        &[0x40, 0x63, 0x01, 0xaa],
    ]);
    let response = BgpMessageCodec::deserialize(&wire, 27)
        .err()
        .expect("unrecognized well-known attribute must be rejected");
    assert_eq!(response.message().error_code(), 3);
    assert_eq!(response.message().error_subcode(), 2);
    assert_eq!(response.message().data(), &[0x63]);
}

#[test]
fn test_invalid_origin_through_codec() {
    let wire = combine(vec![
        BGP_MARKER,
        &[0x00, 0x1b, 0x02],
        &[0x00, 0x00],
        &[0x00, 0x04],
        &[0x40, 0x01, 0x01, 0x07],
    ]);
    let response = BgpMessageCodec::deserialize(&wire, 27)
        .err()
        .expect("origin value 7 must be rejected");
    assert_eq!(response.message().error_code(), 3);
    assert_eq!(response.message().error_subcode(), 6);
    assert_eq!(response.message().data(), &[0x07]);
}

#[test]
fn test_error_response_is_transmittable() -> Result<(), BgpMessageWritingError> {
    let wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x06]]);
    let response = BgpMessageCodec::deserialize(&wire, 19)
        .err()
        .expect("type 6 must be rejected");
    let header_length = response.header().length();

    // The framed header matches the bytes the response serializes to, and
    // those bytes parse back as the same notification
    let message = response.into_message();
    let serialized = BgpMessageCodec::serialize(&message)?;
    assert_eq!(serialized.len(), header_length as usize);
    let reparsed = BgpMessageCodec::deserialize(&serialized, header_length);
    assert_eq!(reparsed, Ok(message));
    Ok(())
}

#[test]
fn test_codec_round_trips() -> Result<(), BgpMessageWritingError> {
    let messages = vec![
        BgpMessage::KeepAlive,
        BgpMessage::Open(BgpOpenMessage::new(
            258,
            180,
            Ipv4Addr::new(192, 0, 2, 1),
            vec![],
        )),
        BgpMessage::Update(BgpUpdateMessage::new(
            vec!["203.0.113.0/24".parse().expect("valid prefix")],
            vec![
                PathAttribute::new(PathAttributeValue::Origin(Origin::Incomplete), 0)
                    .expect("valid origin attribute"),
                PathAttribute::new(
                    PathAttributeValue::AsPath(AsPath::new(vec![AsPathSegment::new(
                        AsPathSegmentType::AsSet,
                        vec![64512, 64513],
                    )])),
                    0,
                )
                .expect("valid as-path attribute"),
                PathAttribute::new(
                    PathAttributeValue::NextHop(NextHop::new(Ipv4Addr::new(10, 0, 0, 1))),
                    0,
                )
                .expect("valid next-hop attribute"),
                PathAttribute::with_flags(
                    AttributeFlags::from_byte(0xc0),
                    PathAttributeValue::UnknownAttribute(UnknownAttribute::new(
                        0x63,
                        vec![0x01, 0x02, 0x03],
                    )),
                ),
            ],
            vec!["198.51.100.0/25".parse().expect("valid prefix")],
        )),
        BgpMessage::Notification(BgpNotificationMessage::cease_error(vec![0x09])),
    ];

    for message in messages {
        let wire = BgpMessageCodec::serialize(&message)?;
        let parsed = BgpMessageCodec::deserialize(&wire, wire.len() as u16);
        assert_eq!(parsed, Ok(message));
    }
    Ok(())
}

#[test]
fn test_serialize_rejects_oversize_message() {
    let oversize = BgpMessage::Update(BgpUpdateMessage::new(
        vec![],
        vec![PathAttribute::with_flags(
            AttributeFlags::from_byte(0xd0),
            PathAttributeValue::UnknownAttribute(UnknownAttribute::new(0x63, vec![0x00; 5000])),
        )],
        vec![],
    ));
    let result = BgpMessageCodec::serialize(&oversize);
    assert_eq!(
        result,
        Err(BgpMessageWritingError::BgpMessageLengthOverflow(5027))
    );
}
