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

//! Serializer for BGP Open message

use crate::{open::BgpOpenMessageParameter, BgpOpenMessage};
use byteorder::{NetworkEndian, WriteBytesExt};
use routewire_parse_utils::WritablePdu;
use routewire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpOpenMessageWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePdu<BgpOpenMessageWritingError> for BgpOpenMessage {
    /// Base length is 10 = 1 (bgp ver) + 2 (my as) + 2 (hold time) +
    /// 4 (bgp-id) + 1 (params len)
    const BASE_LENGTH: usize = 10;

    fn len(&self) -> usize {
        let params_length: usize = self.params().iter().map(BgpOpenMessageParameter::len).sum();
        Self::BASE_LENGTH + params_length
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpOpenMessageWritingError> {
        writer.write_u8(self.version())?;
        writer.write_u16::<NetworkEndian>(self.my_as())?;
        writer.write_u16::<NetworkEndian>(self.hold_time())?;
        writer.write_u32::<NetworkEndian>(self.bgp_id().into())?;
        let params_length: usize = self.params().iter().map(BgpOpenMessageParameter::len).sum();
        writer.write_u8(params_length as u8)?;
        for param in self.params() {
            param.write(writer)?;
        }
        Ok(())
    }
}

impl WritablePdu<BgpOpenMessageWritingError> for BgpOpenMessageParameter {
    /// One octet for the parameter type and a second for the length
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + self.value().len()
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpOpenMessageWritingError> {
        writer.write_u8(self.param_type())?;
        writer.write_u8(self.value().len() as u8)?;
        writer.write_all(self.value())?;
        Ok(())
    }
}
