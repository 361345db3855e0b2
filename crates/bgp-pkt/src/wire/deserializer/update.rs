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

//! Deserializer for BGP Update message

use crate::{
    iana::{PathAttributeType, UpdateMessageErrorSubCode},
    notification::BgpNotificationMessage,
    path_attribute::PathAttribute,
    wire::deserializer::{path_attribute::PathAttributeParsingError, Ipv4PrefixParsingError},
    BgpUpdateMessage,
};
use nom::{error::ErrorKind, number::complete::be_u16, IResult};
use routewire_parse_utils::{
    parse_till_empty_into_located, ErrorKindSerdeDeref, ReadablePdu, Span,
};
use routewire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};

/// BGP Update Message Parsing errors
#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpUpdateMessageParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    Ipv4PrefixError(
        #[from_located(module = "crate::wire::deserializer")] Ipv4PrefixParsingError,
    ),
    PathAttributeError(
        #[from_located(module = "crate::wire::deserializer::path_attribute")]
        PathAttributeParsingError,
    ),
    /// The UPDATE announces NLRI but lacks this well-known mandatory
    /// attribute
    MissingWellKnownAttribute(PathAttributeType),
}

impl<'a> ReadablePdu<'a, LocatedBgpUpdateMessageParsingError<'a>> for BgpUpdateMessage {
    fn from_wire(
        buf: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedBgpUpdateMessageParsingError<'a>> {
        let input = buf;
        // Three length-delimited sections in strict sequence: each window
        // must be consumed exactly, and nothing may read past it
        let (buf, withdrawn_buf) = nom::multi::length_data(be_u16)(buf)?;
        let (_, withdrawn_routes) = parse_till_empty_into_located(withdrawn_buf)?;
        let (buf, path_attributes_buf) = nom::multi::length_data(be_u16)(buf)?;
        let (_, path_attributes): (_, Vec<PathAttribute>) =
            parse_till_empty_into_located(path_attributes_buf)?;
        let (buf, nlri) = parse_till_empty_into_located(buf)?;

        // ORIGIN, AS_PATH, and NEXT_HOP are mandatory whenever routes are
        // announced; an UPDATE carrying only withdrawals needs none of them
        if !nlri.is_empty() {
            for mandatory in [
                PathAttributeType::Origin,
                PathAttributeType::AsPath,
                PathAttributeType::NextHop,
            ] {
                if !path_attributes
                    .iter()
                    .any(|attr| attr.type_code() == u8::from(mandatory))
                {
                    return Err(nom::Err::Error(LocatedBgpUpdateMessageParsingError::new(
                        input,
                        BgpUpdateMessageParsingError::MissingWellKnownAttribute(mandatory),
                    )));
                }
            }
        }

        Ok((
            buf,
            BgpUpdateMessage::new(withdrawn_routes, path_attributes, nlri),
        ))
    }
}

impl From<BgpUpdateMessageParsingError> for BgpNotificationMessage {
    fn from(value: BgpUpdateMessageParsingError) -> Self {
        match value {
            // Section length fields overrunning the body, or a prefix
            // overrunning its section window
            BgpUpdateMessageParsingError::NomError(_)
            | BgpUpdateMessageParsingError::Ipv4PrefixError(_) => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::MalformedAttributeList,
                    vec![],
                )
            }
            BgpUpdateMessageParsingError::PathAttributeError(error) => error.into(),
            BgpUpdateMessageParsingError::MissingWellKnownAttribute(attribute_type) => {
                BgpNotificationMessage::update_message_error(
                    UpdateMessageErrorSubCode::MissingWellKnownAttribute,
                    vec![attribute_type.into()],
                )
            }
        }
    }
}
