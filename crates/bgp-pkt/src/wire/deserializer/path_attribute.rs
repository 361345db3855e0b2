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

//! Deserializer for BGP Path Attributes

use crate::{
    iana::{PathAttributeType, UndefinedPathAttributeType, UpdateMessageErrorSubCode},
    notification::BgpNotificationMessage,
    path_attribute::{
        Aggregator, AsPath, AsPathSegment, AsPathSegmentType, AtomicAggregate, AttributeFlags,
        AttributeType, LocalPreference, MultiExitDiscriminator, NextHop, Origin, PathAttribute,
        PathAttributeLength, PathAttributeValue, UndefinedAsPathSegmentType, UndefinedOrigin,
        UnknownAttribute, ATTRIBUTE_OPTION_EXTENDED_LENGTH, ATTRIBUTE_OPTION_PARTIAL,
    },
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use routewire_parse_utils::{
    parse_into_located_one_input, parse_till_empty, ErrorKindSerdeDeref, ReadablePdu,
    ReadablePduWithOneInput, Span,
};
use routewire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

const ORIGIN_LEN: u16 = 1;
const NEXT_HOP_LEN: u16 = 4;
const MULTI_EXIT_DISCRIMINATOR_LEN: u16 = 4;
const LOCAL_PREFERENCE_LEN: u16 = 4;
const ATOMIC_AGGREGATE_LEN: u16 = 0;
const AGGREGATOR_LEN: u16 = 6;

#[inline]
const fn check_length(attr_len: PathAttributeLength, expected: u16) -> bool {
    match attr_len {
        PathAttributeLength::U8(len) => len as u16 == expected,
        PathAttributeLength::U16(len) => len == expected,
    }
}

#[inline]
fn parse_attribute_length<'a, E: nom::error::ParseError<Span<'a>>>(
    buf: Span<'a>,
    extended_length: bool,
) -> IResult<Span<'a>, PathAttributeLength, E> {
    if extended_length {
        let (buf, raw) = be_u16(buf)?;
        Ok((buf, PathAttributeLength::U16(raw)))
    } else {
        let (buf, raw) = be_u8(buf)?;
        Ok((buf, PathAttributeLength::U8(raw)))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PathAttributeParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// The wire flag octet differs from the canonical flags for the type
    /// code; carries the offending flags and type code octets
    InvalidAttributeFlags { flags: u8, type_code: u8 },
    /// Attribute type this implementation doesn't recognize and cannot
    /// retain: either flagged well-known, or optional non-transitive
    UnrecognizedWellKnownAttribute(u8),
    OriginError(#[from_located(module = "self")] OriginParsingError),
    AsPathError(#[from_located(module = "self")] AsPathParsingError),
    NextHopError(#[from_located(module = "self")] NextHopParsingError),
    MultiExitDiscriminatorError(
        #[from_located(module = "self")] MultiExitDiscriminatorParsingError,
    ),
    LocalPreferenceError(#[from_located(module = "self")] LocalPreferenceParsingError),
    AtomicAggregateError(#[from_located(module = "self")] AtomicAggregateParsingError),
    AggregatorError(#[from_located(module = "self")] AggregatorParsingError),
    UnknownAttributeError(#[from_located(module = "self")] UnknownAttributeParsingError),
}

impl<'a> ReadablePdu<'a, LocatedPathAttributeParsingError<'a>> for PathAttribute {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedPathAttributeParsingError<'a>> {
        let input = buf;
        let (buf, flags_byte) = be_u8(buf)?;
        let buf_before_code = buf;
        let (buf, type_code) = be_u8(buf)?;
        let flags = AttributeFlags::from_byte(flags_byte);
        let extended_length = flags.extended_length();

        match PathAttributeType::try_from(type_code) {
            Ok(code) => {
                // The canonical flag octet for this code, with the
                // caller-settable bits taken from the wire; anything else in
                // the wire octet is a flags error
                let mut options = 0u8;
                if flags.partial() {
                    options |= ATTRIBUTE_OPTION_PARTIAL;
                }
                if extended_length {
                    options |= ATTRIBUTE_OPTION_EXTENDED_LENGTH;
                }
                if AttributeType::from_code(code, options).flags() != flags {
                    return Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
                        input,
                        PathAttributeParsingError::InvalidAttributeFlags {
                            flags: flags_byte,
                            type_code,
                        },
                    )));
                }
                let (buf, value) = match code {
                    PathAttributeType::Origin => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::Origin(value))
                    }
                    PathAttributeType::AsPath => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::AsPath(value))
                    }
                    PathAttributeType::NextHop => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::NextHop(value))
                    }
                    PathAttributeType::MultiExitDiscriminator => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::MultiExitDiscriminator(value))
                    }
                    PathAttributeType::LocalPreference => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::LocalPreference(value))
                    }
                    PathAttributeType::AtomicAggregate => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::AtomicAggregate(value))
                    }
                    PathAttributeType::Aggregator => {
                        let (buf, value) = parse_into_located_one_input(buf, extended_length)?;
                        (buf, PathAttributeValue::Aggregator(value))
                    }
                };
                Ok((buf, PathAttribute::with_flags(flags, value)))
            }
            Err(UndefinedPathAttributeType(code)) => {
                // An unrecognized optional transitive attribute is retained
                // as an opaque blob and must survive re-encoding unchanged;
                // anything else unrecognized kills the UPDATE
                if flags.optional() && flags.transitive() {
                    let (buf, value) =
                        parse_into_located_one_input(buf_before_code, extended_length)?;
                    Ok((
                        buf,
                        PathAttribute::with_flags(
                            flags,
                            PathAttributeValue::UnknownAttribute(value),
                        ),
                    ))
                } else {
                    Err(nom::Err::Error(LocatedPathAttributeParsingError::new(
                        input,
                        PathAttributeParsingError::UnrecognizedWellKnownAttribute(code),
                    )))
                }
            }
        }
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum OriginParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidOriginLength(PathAttributeLength),
    UndefinedOrigin(#[from_external] UndefinedOrigin),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedOriginParsingError<'a>> for Origin {
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedOriginParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, ORIGIN_LEN) {
            return Err(nom::Err::Error(LocatedOriginParsingError::new(
                input,
                OriginParsingError::InvalidOriginLength(length),
            )));
        }
        let (buf, origin) = nom::combinator::map_res(be_u8, Origin::try_from)(buf)?;
        Ok((buf, origin))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum AsPathParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    /// A segment with a zero AS count makes the whole path malformed
    /// (RFC 7606)
    ZeroSegmentLength,
    /// A segment claiming more AS numbers than its attribute value carries
    InvalidSegmentLength { expecting: usize, found: usize },
    UndefinedAsPathSegmentType(#[from_external] UndefinedAsPathSegmentType),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedAsPathParsingError<'a>> for AsPath {
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedAsPathParsingError<'a>> {
        let (buf, segments_buf) = if extended_length {
            nom::multi::length_data(be_u16)(buf)?
        } else {
            nom::multi::length_data(be_u8)(buf)?
        };
        let (_, segments) = parse_till_empty(segments_buf)?;
        Ok((buf, AsPath::new(segments)))
    }
}

impl<'a> ReadablePdu<'a, LocatedAsPathParsingError<'a>> for AsPathSegment {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedAsPathParsingError<'a>> {
        let (buf, segment_type) =
            nom::combinator::map_res(be_u8, AsPathSegmentType::try_from)(buf)?;
        let before = buf;
        let (buf, count) = be_u8(buf)?;
        if count == 0 {
            return Err(nom::Err::Error(LocatedAsPathParsingError::new(
                before,
                AsPathParsingError::ZeroSegmentLength,
            )));
        }
        let count = count as usize;
        let expecting = count * 2;
        if buf.len() < expecting {
            return Err(nom::Err::Error(LocatedAsPathParsingError::new(
                buf,
                AsPathParsingError::InvalidSegmentLength {
                    expecting,
                    found: buf.len(),
                },
            )));
        }
        let (buf, as_numbers) = nom::multi::many_m_n(count, count, be_u16)(buf)?;
        Ok((buf, AsPathSegment::new(segment_type, as_numbers)))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum NextHopParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidNextHopLength(PathAttributeLength),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedNextHopParsingError<'a>> for NextHop {
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedNextHopParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, NEXT_HOP_LEN) {
            return Err(nom::Err::Error(LocatedNextHopParsingError::new(
                input,
                NextHopParsingError::InvalidNextHopLength(length),
            )));
        }
        let (buf, address) = be_u32(buf)?;
        Ok((buf, NextHop::new(Ipv4Addr::from(address))))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum MultiExitDiscriminatorParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidLength(PathAttributeLength),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedMultiExitDiscriminatorParsingError<'a>>
    for MultiExitDiscriminator
{
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedMultiExitDiscriminatorParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, MULTI_EXIT_DISCRIMINATOR_LEN) {
            return Err(nom::Err::Error(
                LocatedMultiExitDiscriminatorParsingError::new(
                    input,
                    MultiExitDiscriminatorParsingError::InvalidLength(length),
                ),
            ));
        }
        let (buf, metric) = be_u32(buf)?;
        Ok((buf, MultiExitDiscriminator::new(metric)))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum LocalPreferenceParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidLength(PathAttributeLength),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedLocalPreferenceParsingError<'a>>
    for LocalPreference
{
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedLocalPreferenceParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, LOCAL_PREFERENCE_LEN) {
            return Err(nom::Err::Error(LocatedLocalPreferenceParsingError::new(
                input,
                LocalPreferenceParsingError::InvalidLength(length),
            )));
        }
        let (buf, preference) = be_u32(buf)?;
        Ok((buf, LocalPreference::new(preference)))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum AtomicAggregateParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidLength(PathAttributeLength),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedAtomicAggregateParsingError<'a>>
    for AtomicAggregate
{
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedAtomicAggregateParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, ATOMIC_AGGREGATE_LEN) {
            return Err(nom::Err::Error(LocatedAtomicAggregateParsingError::new(
                input,
                AtomicAggregateParsingError::InvalidLength(length),
            )));
        }
        Ok((buf, AtomicAggregate))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum AggregatorParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    InvalidAggregatorLength(PathAttributeLength),
}

impl<'a> ReadablePduWithOneInput<'a, bool, LocatedAggregatorParsingError<'a>> for Aggregator {
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedAggregatorParsingError<'a>> {
        let input = buf;
        let (buf, length) = parse_attribute_length(buf, extended_length)?;
        if !check_length(length, AGGREGATOR_LEN) {
            return Err(nom::Err::Error(LocatedAggregatorParsingError::new(
                input,
                AggregatorParsingError::InvalidAggregatorLength(length),
            )));
        }
        let (buf, asn) = be_u16(buf)?;
        let (buf, origin) = be_u32(buf)?;
        Ok((buf, Aggregator::new(asn, Ipv4Addr::from(origin))))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum UnknownAttributeParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
}

/// The buffer starts at the attribute type code octet, so the retained blob
/// records which code it came from
impl<'a> ReadablePduWithOneInput<'a, bool, LocatedUnknownAttributeParsingError<'a>>
    for UnknownAttribute
{
    fn from_wire(
        buf: Span<'a>,
        extended_length: bool,
    ) -> IResult<Span<'a>, Self, LocatedUnknownAttributeParsingError<'a>> {
        let (buf, code) = be_u8(buf)?;
        let (buf, value) = if extended_length {
            nom::multi::length_data(be_u16)(buf)?
        } else {
            nom::multi::length_data(be_u8)(buf)?
        };
        Ok((
            buf,
            UnknownAttribute::new(code, (*value.fragment()).to_vec()),
        ))
    }
}

impl From<PathAttributeParsingError> for BgpNotificationMessage {
    fn from(value: PathAttributeParsingError) -> Self {
        match value {
            // Flags/type-code octets truncated by the enclosing attribute
            // window
            PathAttributeParsingError::NomError(_) => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::MalformedAttributeList,
                    vec![],
                )
            }
            PathAttributeParsingError::InvalidAttributeFlags { flags, type_code } => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::AttributeFlagsError,
                    vec![flags, type_code],
                )
            }
            PathAttributeParsingError::UnrecognizedWellKnownAttribute(code) => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::UnrecognizedWellKnownAttribute,
                    vec![code],
                )
            }
            PathAttributeParsingError::OriginError(error) => match error {
                OriginParsingError::UndefinedOrigin(UndefinedOrigin(origin)) => {
                    BgpNotificationMessage::update_message_error(
                        UpdateMessageErrorSubCode::InvalidOriginAttribute,
                        vec![origin],
                    )
                }
                OriginParsingError::NomError(_) | OriginParsingError::InvalidOriginLength(_) => {
                    BgpNotificationMessage::update_message_error(
                        UpdateMessageErrorSubCode::AttributeLengthError,
                        vec![],
                    )
                }
            },
            PathAttributeParsingError::AsPathError(error) => match error {
                // The declared attribute length overran the enclosing window
                AsPathParsingError::NomError(_) => BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::AttributeLengthError,
                    vec![],
                ),
                AsPathParsingError::ZeroSegmentLength
                | AsPathParsingError::InvalidSegmentLength { .. }
                | AsPathParsingError::UndefinedAsPathSegmentType(_) => {
                    BgpNotificationMessage::update_message_error(
                        UpdateMessageErrorSubCode::MalformedAsPath,
                        vec![],
                    )
                }
            },
            PathAttributeParsingError::NextHopError(error) => match error {
                NextHopParsingError::InvalidNextHopLength(_) => {
                    BgpNotificationMessage::update_message_error(
                        UpdateMessageErrorSubCode::InvalidNextHopAttribute,
                        vec![],
                    )
                }
                NextHopParsingError::NomError(_) => BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::AttributeLengthError,
                    vec![],
                ),
            },
            PathAttributeParsingError::MultiExitDiscriminatorError(_)
            | PathAttributeParsingError::LocalPreferenceError(_)
            | PathAttributeParsingError::AtomicAggregateError(_)
            | PathAttributeParsingError::AggregatorError(_)
            | PathAttributeParsingError::UnknownAttributeError(_) => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::AttributeLengthError,
                    vec![],
                )
            }
        }
    }
}
