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

//! The message-level codec: one complete buffer in, a typed [`BgpMessage`]
//! or a ready-to-send [`BgpErrorResponse`] out.
//!
//! This is the single place where a parsing failure becomes an outgoing
//! NOTIFICATION: every validation error raised anywhere in the wire layer is
//! converted through `From<BgpMessageParsingError> for
//! BgpNotificationMessage` and framed by [`BgpErrorResponse::new`], so the
//! response header is always consistent with its payload. Per RFC 4271, the
//! caller is expected to transmit the response and then tear the session
//! down; the teardown itself is the session layer's job.

use crate::{
    iana::{BgpMessageType, MessageHeaderErrorSubCode},
    notification::BgpNotificationMessage,
    wire::{
        deserializer::{
            BgpMessageParsingError, BGP_MAX_MESSAGE_LENGTH, BGP_MIN_MESSAGE_LENGTH,
            BGP_NOTIFICATION_MIN_MESSAGE_LENGTH,
        },
        serializer::BgpMessageWritingError,
    },
    BgpHeader, BgpMessage,
};
use routewire_parse_utils::{ReadablePduWithOneInput, Span, WritablePdu};
use serde::{Deserialize, Serialize};

/// A fully framed NOTIFICATION ready for transmission in response to a
/// malformed incoming message: the header the codec wants on the wire plus
/// the notification body.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpErrorResponse {
    header: BgpHeader,
    message: BgpNotificationMessage,
}

impl BgpErrorResponse {
    /// Frames a notification: header type is NOTIFICATION and header length
    /// is the 21-octet minimum plus the diagnostic data length
    pub fn new(message: BgpNotificationMessage) -> Self {
        let length = BGP_NOTIFICATION_MIN_MESSAGE_LENGTH + message.data().len() as u16;
        Self {
            header: BgpHeader::new(length, BgpMessageType::Notification),
            message,
        }
    }

    pub const fn header(&self) -> &BgpHeader {
        &self.header
    }

    pub const fn message(&self) -> &BgpNotificationMessage {
        &self.message
    }

    /// The response as a [`BgpMessage`], for serialization and transmission
    pub fn into_message(self) -> BgpMessage {
        BgpMessage::Notification(self.message)
    }
}

impl From<BgpMessageParsingError> for BgpErrorResponse {
    fn from(value: BgpMessageParsingError) -> Self {
        Self::new(value.into())
    }
}

/// Stateless codec over complete, length-delimited message buffers. Every
/// call is independent; nothing is retained between calls and nothing in a
/// returned value borrows from the input buffer.
pub struct BgpMessageCodec;

impl BgpMessageCodec {
    /// Decodes one message from `buffer`. `declared_length` is the total
    /// message length the transport read off the wire; it must match the
    /// length field inside the header exactly.
    ///
    /// Validation order: declared length bounds, synchronization marker,
    /// header length/type consistency, then the body deserializer for the
    /// message type. The first violation wins and is returned as a
    /// [`BgpErrorResponse`]; later checks never run on input an earlier
    /// check rejected.
    ///
    /// An out-of-bounds declared length is reported under the
    /// connection-not-synchronized subcode, before the marker is inspected.
    pub fn deserialize(buffer: &[u8], declared_length: u16) -> Result<BgpMessage, BgpErrorResponse> {
        if !(BGP_MIN_MESSAGE_LENGTH..=BGP_MAX_MESSAGE_LENGTH).contains(&declared_length) {
            return Err(BgpErrorResponse::new(
                BgpNotificationMessage::message_header_error(
                    MessageHeaderErrorSubCode::ConnectionNotSynchronized,
                    vec![],
                ),
            ));
        }
        let window = buffer.get(..declared_length as usize).unwrap_or(buffer);
        match BgpMessage::from_wire(Span::new(window), declared_length) {
            Ok((_, message)) => Ok(message),
            Err(nom::Err::Incomplete(_)) => Err(BgpErrorResponse::new(
                BgpNotificationMessage::message_header_error(
                    MessageHeaderErrorSubCode::Unspecific,
                    vec![],
                ),
            )),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                let (_, error): (Span<'_>, BgpMessageParsingError) = err.into();
                Err(BgpErrorResponse::from(error))
            }
        }
    }

    /// Encodes a message into its wire representation, the structural
    /// inverse of [`Self::deserialize`]
    pub fn serialize(message: &BgpMessage) -> Result<Vec<u8>, BgpMessageWritingError> {
        let mut buf = Vec::with_capacity(message.len());
        message.write(&mut buf)?;
        Ok(buf)
    }
}
