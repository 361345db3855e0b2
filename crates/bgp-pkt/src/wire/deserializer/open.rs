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

//! Deserializer for BGP Open message

use crate::{
    iana::OpenMessageErrorSubCode,
    notification::BgpNotificationMessage,
    open::{BgpOpenMessageParameter, BGP_VERSION},
    BgpOpenMessage,
};
use nom::{
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};
use routewire_parse_utils::{
    parse_till_empty_into_located, ErrorKindSerdeDeref, ReadablePdu, Span,
};
use routewire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// BGP Open Message Parsing errors
#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpOpenMessageParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
    UnsupportedVersionNumber(u8),
    ParameterError(#[from_located(module = "self")] BgpParameterParsingError),
}

/// BGP Open Message optional parameter parsing errors
#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpParameterParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
}

impl<'a> ReadablePdu<'a, LocatedBgpOpenMessageParsingError<'a>> for BgpOpenMessage {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedBgpOpenMessageParsingError<'a>> {
        let (buf, _) = nom::combinator::map_res(be_u8, |version| {
            if version == BGP_VERSION {
                Ok(version)
            } else {
                Err(BgpOpenMessageParsingError::UnsupportedVersionNumber(version))
            }
        })(buf)?;
        let (buf, my_as) = be_u16(buf)?;
        let (buf, hold_time) = be_u16(buf)?;
        let (buf, bgp_id) = be_u32(buf)?;
        let bgp_id = Ipv4Addr::from(bgp_id);
        // The parameters sequence must occupy exactly opt_params_len octets;
        // a parameter reading past that window is a malformed message
        let (buf, params_buf) = nom::multi::length_data(be_u8)(buf)?;
        let (_, params) = parse_till_empty_into_located(params_buf)?;
        Ok((buf, BgpOpenMessage::new(my_as, hold_time, bgp_id, params)))
    }
}

impl<'a> ReadablePdu<'a, LocatedBgpParameterParsingError<'a>> for BgpOpenMessageParameter {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedBgpParameterParsingError<'a>> {
        let (buf, param_type) = be_u8(buf)?;
        let (buf, value) = nom::multi::length_data(be_u8)(buf)?;
        Ok((
            buf,
            BgpOpenMessageParameter::new(param_type, (*value.fragment()).to_vec()),
        ))
    }
}

impl From<BgpOpenMessageParsingError> for BgpNotificationMessage {
    fn from(value: BgpOpenMessageParsingError) -> Self {
        match value {
            // The diagnostic payload is the largest version this
            // implementation supports, as a two-octet value
            BgpOpenMessageParsingError::UnsupportedVersionNumber(_) => {
                BgpNotificationMessage::open_message_error(
                    OpenMessageErrorSubCode::UnsupportedVersionNumber,
                    vec![0, BGP_VERSION],
                )
            }
            // Truncated fixed fields or a parameter overrunning the
            // opt_params_len window; RFC 4271 has no closer subcode
            BgpOpenMessageParsingError::NomError(_)
            | BgpOpenMessageParsingError::ParameterError(_) => {
                BgpNotificationMessage::open_message_error(
                    OpenMessageErrorSubCode::Unspecific,
                    vec![],
                )
            }
        }
    }
}
