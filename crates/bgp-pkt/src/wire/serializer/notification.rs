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

//! Serializer for BGP Notification message

use crate::BgpNotificationMessage;
use byteorder::WriteBytesExt;
use routewire_parse_utils::WritablePdu;
use routewire_serde_macros::WritingError;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpNotificationMessageWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<BgpNotificationMessageWritingError> for BgpNotificationMessage {
    /// One octet each for the error code and subcode
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + self.data().len()
    }

    fn write<T: std::io::Write>(
        &self,
        writer: &mut T,
    ) -> Result<(), BgpNotificationMessageWritingError> {
        writer.write_u8(self.error_code())?;
        writer.write_u8(self.error_subcode())?;
        writer.write_all(self.data())?;
        Ok(())
    }
}
