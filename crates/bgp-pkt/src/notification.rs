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

//! Representations for BGP Notification message

use crate::iana::{
    BgpErrorNotificationCode, MessageHeaderErrorSubCode, OpenMessageErrorSubCode,
    UpdateMessageErrorSubCode,
};
use serde::{Deserialize, Serialize};

/// BGP Notification message
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Error code    | Error subcode |   Data (variable)             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Code and subcode are kept as raw octets: a received NOTIFICATION is
/// diagnostic information for the session layer, and rejecting one because
/// this implementation doesn't know its code would drop exactly the
/// information the peer was trying to convey. The typed constructors below
/// are for building outgoing notifications from the registered codes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgpNotificationMessage {
    error_code: u8,
    error_subcode: u8,
    data: Vec<u8>,
}

impl BgpNotificationMessage {
    pub const fn new(error_code: u8, error_subcode: u8, data: Vec<u8>) -> Self {
        Self {
            error_code,
            error_subcode,
            data,
        }
    }

    pub fn message_header_error(sub_code: MessageHeaderErrorSubCode, data: Vec<u8>) -> Self {
        Self::new(
            BgpErrorNotificationCode::MessageHeaderError.into(),
            sub_code.into(),
            data,
        )
    }

    pub fn open_message_error(sub_code: OpenMessageErrorSubCode, data: Vec<u8>) -> Self {
        Self::new(
            BgpErrorNotificationCode::OpenMessageError.into(),
            sub_code.into(),
            data,
        )
    }

    pub fn update_message_error(sub_code: UpdateMessageErrorSubCode, data: Vec<u8>) -> Self {
        Self::new(
            BgpErrorNotificationCode::UpdateMessageError.into(),
            sub_code.into(),
            data,
        )
    }

    /// Hold-timer expiry has no defined subcodes, subcode 0 is sent
    pub fn hold_timer_expired_error(data: Vec<u8>) -> Self {
        Self::new(BgpErrorNotificationCode::HoldTimerExpired.into(), 0, data)
    }

    /// FSM errors have no defined subcodes in RFC 4271, subcode 0 is sent
    pub fn finite_state_machine_error(data: Vec<u8>) -> Self {
        Self::new(
            BgpErrorNotificationCode::FiniteStateMachineError.into(),
            0,
            data,
        )
    }

    pub fn cease_error(data: Vec<u8>) -> Self {
        Self::new(BgpErrorNotificationCode::Cease.into(), 0, data)
    }

    pub const fn error_code(&self) -> u8 {
        self.error_code
    }

    pub const fn error_subcode(&self) -> u8 {
        self.error_subcode
    }

    /// Opaque diagnostic payload, passed through unchanged
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
