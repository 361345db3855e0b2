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

//! Serializer library for BGP's wire protocol

pub mod notification;
pub mod open;
pub mod path_attribute;
pub mod update;

use byteorder::{NetworkEndian, WriteBytesExt};
use routewire_parse_utils::WritablePdu;
use routewire_serde_macros::WritingError;

use crate::{
    wire::{
        deserializer::{BGP_MAX_MESSAGE_LENGTH, BGP_MIN_MESSAGE_LENGTH},
        serializer::{
            notification::BgpNotificationMessageWritingError, open::BgpOpenMessageWritingError,
            update::BgpUpdateMessageWritingError,
        },
    },
    BgpMessage,
};

/// Round a prefix bit length up to the number of octets it occupies on the
/// wire
#[inline]
pub(crate) fn round_len(len: u8) -> u8 {
    len.div_ceil(8)
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpMessageWritingError {
    /// The size of the written message is larger than the 4,096 octets
    /// RFC 4271 allows
    BgpMessageLengthOverflow(usize),

    StdIOError(#[from_std_io_error] String),

    OpenError(#[from] BgpOpenMessageWritingError),

    UpdateError(#[from] BgpUpdateMessageWritingError),

    NotificationError(#[from] BgpNotificationMessageWritingError),
}

impl WritablePdu<BgpMessageWritingError> for BgpMessage {
    const BASE_LENGTH: usize = BGP_MIN_MESSAGE_LENGTH as usize;

    fn len(&self) -> usize {
        let body_len = match self {
            Self::Open(open) => open.len(),
            Self::Update(update) => update.len(),
            Self::Notification(notification) => notification.len(),
            Self::KeepAlive => 0,
        };
        Self::BASE_LENGTH + body_len
    }

    fn write<T: std::io::Write>(&self, writer: &mut T) -> Result<(), BgpMessageWritingError> {
        let len = self.len();
        if len > BGP_MAX_MESSAGE_LENGTH as usize {
            return Err(BgpMessageWritingError::BgpMessageLengthOverflow(len));
        }
        writer.write_all(&u128::MAX.to_be_bytes())?;
        writer.write_u16::<NetworkEndian>(len as u16)?;
        writer.write_u8(self.get_type().into())?;
        match self {
            Self::Open(open) => open.write(writer)?,
            Self::Update(update) => update.write(writer)?,
            Self::Notification(notification) => notification.write(writer)?,
            Self::KeepAlive => {}
        }
        Ok(())
    }
}
