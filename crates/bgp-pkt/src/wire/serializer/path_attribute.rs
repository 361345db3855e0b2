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

//! Serializer for BGP Path Attributes

use crate::{
    iana::PathAttributeType,
    path_attribute::{
        Aggregator, AsPath, AsPathSegment, AtomicAggregate, LocalPreference,
        MultiExitDiscriminator, NextHop, Origin, PathAttribute, PathAttributeValue,
        UnknownAttribute,
    },
};
use byteorder::{NetworkEndian, WriteBytesExt};
use routewire_parse_utils::{WritablePdu, WritablePduWithOneInput};
use routewire_serde_macros::WritingError;
use std::io::Write;

/// Writes the attribute length field: the value length in octets, in one
/// octet or in two when the extended-length flag is set
#[inline]
fn write_length<T, E, W>(pdu: &T, extended_length: bool, writer: &mut W) -> Result<(), E>
where
    T: WritablePduWithOneInput<bool, E>,
    E: From<std::io::Error>,
    W: Write,
{
    let length = pdu.len(extended_length) - if extended_length { 2 } else { 1 };
    if extended_length {
        writer.write_u16::<NetworkEndian>(length as u16)?;
    } else {
        writer.write_u8(length as u8)?;
    }
    Ok(())
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum PathAttributeWritingError {
    StdIOError(#[from_std_io_error] String),
    OriginError(#[from] OriginWritingError),
    AsPathError(#[from] AsPathWritingError),
    NextHopError(#[from] NextHopWritingError),
    MultiExitDiscriminatorError(#[from] MultiExitDiscriminatorWritingError),
    LocalPreferenceError(#[from] LocalPreferenceWritingError),
    AtomicAggregateError(#[from] AtomicAggregateWritingError),
    AggregatorError(#[from] AggregatorWritingError),
    UnknownAttributeError(#[from] UnknownAttributeWritingError),
}

impl WritablePdu<PathAttributeWritingError> for PathAttribute {
    /// One octet each for the flags and the type code
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        let value_len = match self.value() {
            PathAttributeValue::Origin(value) => value.len(self.extended_length()),
            PathAttributeValue::AsPath(value) => value.len(self.extended_length()),
            PathAttributeValue::NextHop(value) => value.len(self.extended_length()),
            PathAttributeValue::MultiExitDiscriminator(value) => {
                value.len(self.extended_length())
            }
            PathAttributeValue::LocalPreference(value) => value.len(self.extended_length()),
            PathAttributeValue::AtomicAggregate(value) => value.len(self.extended_length()),
            PathAttributeValue::Aggregator(value) => value.len(self.extended_length()),
            PathAttributeValue::UnknownAttribute(value) => value.len(self.extended_length()),
        };
        Self::BASE_LENGTH + value_len
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), PathAttributeWritingError> {
        writer.write_u8(self.flags().byte())?;
        match self.value() {
            PathAttributeValue::Origin(value) => {
                writer.write_u8(PathAttributeType::Origin.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::AsPath(value) => {
                writer.write_u8(PathAttributeType::AsPath.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::NextHop(value) => {
                writer.write_u8(PathAttributeType::NextHop.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::MultiExitDiscriminator(value) => {
                writer.write_u8(PathAttributeType::MultiExitDiscriminator.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::LocalPreference(value) => {
                writer.write_u8(PathAttributeType::LocalPreference.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::AtomicAggregate(value) => {
                writer.write_u8(PathAttributeType::AtomicAggregate.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::Aggregator(value) => {
                writer.write_u8(PathAttributeType::Aggregator.into())?;
                value.write(writer, self.extended_length())?;
            }
            PathAttributeValue::UnknownAttribute(value) => {
                writer.write_u8(value.code())?;
                value.write(writer, self.extended_length())?;
            }
        }
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum OriginWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, OriginWritingError> for Origin {
    /// One octet length field and one octet value
    const BASE_LENGTH: usize = 2;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), OriginWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_u8((*self).into())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum AsPathWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, AsPathWritingError> for AsPath {
    /// One octet length field
    const BASE_LENGTH: usize = 1;

    fn len(&self, extended_length: bool) -> usize {
        let segments_len: usize = self.segments().iter().map(AsPathSegment::len).sum();
        Self::BASE_LENGTH + usize::from(extended_length) + segments_len
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), AsPathWritingError> {
        write_length(self, extended_length, writer)?;
        for segment in self.segments() {
            segment.write(writer)?;
        }
        Ok(())
    }
}

impl WritablePdu<AsPathWritingError> for AsPathSegment {
    /// One octet segment type and one octet AS count
    const BASE_LENGTH: usize = 2;

    fn len(&self) -> usize {
        Self::BASE_LENGTH + 2 * self.as_numbers().len()
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), AsPathWritingError> {
        writer.write_u8(self.segment_type().into())?;
        writer.write_u8(self.as_numbers().len() as u8)?;
        for as_number in self.as_numbers() {
            writer.write_u16::<NetworkEndian>(*as_number)?;
        }
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum NextHopWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, NextHopWritingError> for NextHop {
    /// One octet length field and four octets of IPv4 address
    const BASE_LENGTH: usize = 5;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), NextHopWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_all(&self.next_hop().octets())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum MultiExitDiscriminatorWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, MultiExitDiscriminatorWritingError> for MultiExitDiscriminator {
    /// One octet length field and a four-octet metric
    const BASE_LENGTH: usize = 5;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), MultiExitDiscriminatorWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_u32::<NetworkEndian>(self.metric())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum LocalPreferenceWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, LocalPreferenceWritingError> for LocalPreference {
    /// One octet length field and a four-octet preference
    const BASE_LENGTH: usize = 5;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), LocalPreferenceWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_u32::<NetworkEndian>(self.preference())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum AtomicAggregateWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, AtomicAggregateWritingError> for AtomicAggregate {
    /// One octet length field; the value itself is empty
    const BASE_LENGTH: usize = 1;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), AtomicAggregateWritingError> {
        write_length(self, extended_length, writer)?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum AggregatorWritingError {
    StdIOError(#[from_std_io_error] String),
}

impl WritablePduWithOneInput<bool, AggregatorWritingError> for Aggregator {
    /// One octet length field, a two-octet AS number, and a four-octet
    /// speaker address
    const BASE_LENGTH: usize = 7;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length)
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), AggregatorWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_u16::<NetworkEndian>(self.asn())?;
        writer.write_all(&self.origin().octets())?;
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum UnknownAttributeWritingError {
    StdIOError(#[from_std_io_error] String),
}

/// The type code octet is written by [`PathAttribute`], so only the length
/// field and the retained value octets are emitted here
impl WritablePduWithOneInput<bool, UnknownAttributeWritingError> for UnknownAttribute {
    /// One octet length field
    const BASE_LENGTH: usize = 1;

    fn len(&self, extended_length: bool) -> usize {
        Self::BASE_LENGTH + usize::from(extended_length) + self.value().len()
    }

    fn write<T: Write>(
        &self,
        writer: &mut T,
        extended_length: bool,
    ) -> Result<(), UnknownAttributeWritingError> {
        write_length(self, extended_length, writer)?;
        writer.write_all(self.value())?;
        Ok(())
    }
}
