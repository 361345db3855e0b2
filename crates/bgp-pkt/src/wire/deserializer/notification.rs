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

//! Deserializer for BGP Notification message

use crate::BgpNotificationMessage;
use nom::{error::ErrorKind, number::complete::be_u8, IResult};
use routewire_parse_utils::{ErrorKindSerdeDeref, ReadablePdu, Span};
use routewire_serde_macros::LocatedError;
use serde::{Deserialize, Serialize};

/// BGP Notification Message Parsing errors
#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum BgpNotificationMessageParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),
}

/// Code, subcode, and diagnostic data are taken as-is: validating what a
/// peer chose to put in its NOTIFICATION would only discard diagnostics.
/// Header validation already guarantees the two code octets are present.
impl<'a> ReadablePdu<'a, LocatedBgpNotificationMessageParsingError<'a>> for BgpNotificationMessage {
    fn from_wire(
        buf: Span<'a>,
    ) -> IResult<Span<'a>, Self, LocatedBgpNotificationMessageParsingError<'a>> {
        let (buf, error_code) = be_u8(buf)?;
        let (buf, error_subcode) = be_u8(buf)?;
        let (buf, data) = nom::bytes::complete::take(buf.len())(buf)?;
        Ok((
            buf,
            BgpNotificationMessage::new(error_code, error_subcode, (*data.fragment()).to_vec()),
        ))
    }
}
