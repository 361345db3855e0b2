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

//! BGP-4 PDU data representation as defined by [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271),
//! together with its wire-format serializer/deserializer and the
//! notification-building codec on top of them.
//!
//! The crate is a pure message codec: it turns one complete, length-delimited
//! buffer into a typed [`BgpMessage`] (or a ready-to-send error response) and
//! back. Connection handling, the peer state machine, and route selection
//! live in the layers above.

use crate::iana::BgpMessageType;
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
pub mod codec;
pub mod iana;
pub mod notification;
pub mod open;
pub mod path_attribute;
pub mod update;
#[cfg(feature = "serde")]
pub mod wire;

pub use crate::{
    notification::BgpNotificationMessage, open::BgpOpenMessage, update::BgpUpdateMessage,
};

/// Value of the 16-octet synchronization marker opening every BGP message.
/// Historically used for authentication, now fixed to all ones.
pub const BGP_MARKER: [u8; 16] = [0xff; 16];

/// BGP message wire format as defined by [RFC4271](https://datatracker.ietf.org/doc/html/rfc4271#section-4.1)
/// Here we don't keep the length and type in memory. The type is inferred by
/// the enum value, while the length is computed at serialization time.
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                                                               +
/// |                                                               |
/// +                                                               +
/// |                           Marker                              |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Length               |      Type     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The variant set is closed on purpose: dispatching over it is exhaustive,
/// so supporting Route-Refresh some day is a compile-time-checked extension
/// rather than a silent gap.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BgpMessage {
    Open(BgpOpenMessage),
    Update(BgpUpdateMessage),
    Notification(BgpNotificationMessage),
    KeepAlive,
}

impl BgpMessage {
    /// Get the BGP message IANA type
    pub const fn get_type(&self) -> BgpMessageType {
        match self {
            Self::Open(_) => BgpMessageType::Open,
            Self::Update(_) => BgpMessageType::Update,
            Self::Notification(_) => BgpMessageType::Notification,
            Self::KeepAlive => BgpMessageType::KeepAlive,
        }
    }
}

/// The fixed-size header of a BGP message, minus the constant marker.
///
/// Parsed messages don't carry their header around ([`BgpMessage`] infers
/// both fields), but error responses do: the codec hands back the exact
/// header of the NOTIFICATION it wants on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpHeader {
    length: u16,
    message_type: BgpMessageType,
}

impl BgpHeader {
    pub const fn new(length: u16, message_type: BgpMessageType) -> Self {
        Self {
            length,
            message_type,
        }
    }

    /// Total message length in octets, the header itself included
    pub const fn length(&self) -> u16 {
        self.length
    }

    pub const fn message_type(&self) -> BgpMessageType {
        self.message_type
    }

    pub const fn marker(&self) -> [u8; 16] {
        BGP_MARKER
    }
}
