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

//! Serializer for BGP Update message

use crate::{
    wire::serializer::{path_attribute::PathAttributeWritingError, round_len},
    BgpUpdateMessage,
};
use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::Ipv4Net;
use routewire_parse_utils::WritablePdu;
use routewire_serde_macros::WritingError;
use std::io::Write;

/// One octet of bit length plus the covered prefix octets
#[inline]
pub(crate) fn ipv4_prefix_len(prefix: &Ipv4Net) -> usize {
    1 + round_len(prefix.prefix_len()) as usize
}

#[inline]
pub(crate) fn write_ipv4_prefix<T: Write>(
    writer: &mut T,
    prefix: &Ipv4Net,
) -> Result<(), std::io::Error> {
    let octets = round_len(prefix.prefix_len()) as usize;
    writer.write_u8(prefix.prefix_len())?;
    writer.write_all(&prefix.network().octets()[..octets])?;
    Ok(())
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum BgpUpdateMessageWritingError {
    StdIOError(#[from_std_io_error] String),
    PathAttributeError(#[from] PathAttributeWritingError),
}

impl WritablePdu<BgpUpdateMessageWritingError> for BgpUpdateMessage {
    /// 2 octets withdrawn-routes length + 2 octets total path attribute
    /// length
    const BASE_LENGTH: usize = 4;

    fn len(&self) -> usize {
        let withdrawn_len: usize = self.withdrawn_routes().iter().map(ipv4_prefix_len).sum();
        let attrs_len: usize = self.path_attributes().iter().map(|attr| attr.len()).sum();
        let nlri_len: usize = self.nlri().iter().map(ipv4_prefix_len).sum();
        Self::BASE_LENGTH + withdrawn_len + attrs_len + nlri_len
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), BgpUpdateMessageWritingError> {
        let withdrawn_len: usize = self.withdrawn_routes().iter().map(ipv4_prefix_len).sum();
        writer.write_u16::<NetworkEndian>(withdrawn_len as u16)?;
        for prefix in self.withdrawn_routes() {
            write_ipv4_prefix(writer, prefix)?;
        }
        let attrs_len: usize = self.path_attributes().iter().map(|attr| attr.len()).sum();
        writer.write_u16::<NetworkEndian>(attrs_len as u16)?;
        for attr in self.path_attributes() {
            attr.write(writer)?;
        }
        for prefix in self.nlri() {
            write_ipv4_prefix(writer, prefix)?;
        }
        Ok(())
    }
}
