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

//! Contains the definitions for the [`PathAttribute`]s that can be carried
//! in [`crate::update::BgpUpdateMessage`], and the attribute-flags codec
//! that derives a canonical flag octet from an attribute type code.

use crate::iana::{PathAttributeType, UndefinedPathAttributeType};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use strum_macros::{Display, FromRepr};

/// Bit 0 of the options octet: request the partial flag. Honored only for
/// `AGGREGATOR`, forced to zero for every other type code.
pub const ATTRIBUTE_OPTION_PARTIAL: u8 = 0b01;

/// Bit 1 of the options octet: request a two-octet attribute length field.
/// Honored only for `AS_PATH` and `AGGREGATOR`, forced to zero otherwise.
pub const ATTRIBUTE_OPTION_EXTENDED_LENGTH: u8 = 0b10;

/// The attribute flags octet. The four defined flags sit in bits 7..4 and
/// are accessed through the mask constants; bits 3..0 are reserved on the
/// wire and always kept at zero in memory, so the in-memory byte is also the
/// wire byte on any platform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AttributeFlags(u8);

impl AttributeFlags {
    pub const OPTIONAL: u8 = 0x80;
    pub const TRANSITIVE: u8 = 0x40;
    pub const PARTIAL: u8 = 0x20;
    pub const EXTENDED_LENGTH: u8 = 0x10;

    const DEFINED_BITS: u8 = 0xf0;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds flags from a raw wire octet, discarding the reserved bits
    pub const fn from_byte(value: u8) -> Self {
        Self(value & Self::DEFINED_BITS)
    }

    /// The wire representation of the flags
    pub const fn byte(self) -> u8 {
        self.0
    }

    /// Optional bit: the attribute is optional (`true`) or well-known
    /// (`false`)
    pub const fn optional(self) -> bool {
        self.0 & Self::OPTIONAL == Self::OPTIONAL
    }

    /// Transitive bit: an optional attribute is transitive (`true`) or
    /// non-transitive (`false`). For well-known attributes the bit is always
    /// `true`.
    pub const fn transitive(self) -> bool {
        self.0 & Self::TRANSITIVE == Self::TRANSITIVE
    }

    /// Partial bit: the information in an optional transitive attribute is
    /// partial (`true`) or complete (`false`)
    pub const fn partial(self) -> bool {
        self.0 & Self::PARTIAL == Self::PARTIAL
    }

    /// Extended-length bit: the attribute length field is two octets
    /// (`true`) or one (`false`)
    pub const fn extended_length(self) -> bool {
        self.0 & Self::EXTENDED_LENGTH == Self::EXTENDED_LENGTH
    }

    pub fn set_optional(&mut self, value: bool) {
        self.set(Self::OPTIONAL, value)
    }

    pub fn set_transitive(&mut self, value: bool) {
        self.set(Self::TRANSITIVE, value)
    }

    pub fn set_partial(&mut self, value: bool) {
        self.set(Self::PARTIAL, value)
    }

    pub fn set_extended_length(&mut self, value: bool) {
        self.set(Self::EXTENDED_LENGTH, value)
    }

    fn set(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

/// An attribute type: the flags octet plus the type code, with the flags
/// derived canonically from the code.
///
/// | type code | name | optional | transitive | partial | extended length |
/// |---|---|---|---|---|---|
/// | 1 | ORIGIN | no | yes | no | no |
/// | 2 | AS_PATH | no | yes | no | options bit 1 |
/// | 3 | NEXT_HOP | no | yes | no | no |
/// | 4 | MULTI_EXIT_DISC | yes | no | no | no |
/// | 5 | LOCAL_PREF | no | yes | no | no |
/// | 6 | ATOMIC_AGGREGATE | no | yes | no | no |
/// | 7 | AGGREGATOR | yes | yes | options bit 0 | options bit 1 |
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributeType {
    flags: AttributeFlags,
    type_code: PathAttributeType,
}

impl AttributeType {
    /// Builds the attribute type for a raw type code. Fails when the code is
    /// not one of the seven known attribute types. `options` bits that the
    /// table above doesn't list for the code are silently ignored.
    pub fn new(type_code: u8, options: u8) -> Result<Self, UndefinedPathAttributeType> {
        let type_code = PathAttributeType::try_from(type_code)?;
        Ok(Self::from_code(type_code, options))
    }

    /// Same as [`Self::new`] for an already-validated type code
    pub fn from_code(type_code: PathAttributeType, options: u8) -> Self {
        let mut byte = match type_code {
            PathAttributeType::Origin
            | PathAttributeType::AsPath
            | PathAttributeType::NextHop
            | PathAttributeType::LocalPreference
            | PathAttributeType::AtomicAggregate => AttributeFlags::TRANSITIVE,
            PathAttributeType::MultiExitDiscriminator => AttributeFlags::OPTIONAL,
            PathAttributeType::Aggregator => AttributeFlags::OPTIONAL | AttributeFlags::TRANSITIVE,
        };
        if type_code == PathAttributeType::Aggregator && options & ATTRIBUTE_OPTION_PARTIAL != 0 {
            byte |= AttributeFlags::PARTIAL;
        }
        if matches!(
            type_code,
            PathAttributeType::AsPath | PathAttributeType::Aggregator
        ) && options & ATTRIBUTE_OPTION_EXTENDED_LENGTH != 0
        {
            byte |= AttributeFlags::EXTENDED_LENGTH;
        }
        Self {
            flags: AttributeFlags::from_byte(byte),
            type_code,
        }
    }

    pub const fn flags(&self) -> AttributeFlags {
        self.flags
    }

    pub const fn type_code(&self) -> PathAttributeType {
        self.type_code
    }
}

/// Path Attribute
///
/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attr. Flags  |Attr. Type Code| Path value (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PathAttribute {
    flags: AttributeFlags,
    value: PathAttributeValue,
}

impl PathAttribute {
    /// Builds an attribute whose flag octet is derived from the canonical
    /// table for the value's type code. Fails for
    /// [`PathAttributeValue::UnknownAttribute`] values, whose flags cannot
    /// be derived; build those with [`Self::with_flags`] instead.
    pub fn new(
        value: PathAttributeValue,
        options: u8,
    ) -> Result<PathAttribute, UndefinedPathAttributeType> {
        let attr_type = AttributeType::new(value.type_code(), options)?;
        Ok(Self {
            flags: attr_type.flags(),
            value,
        })
    }

    /// Builds an attribute carrying an explicit flag octet, bypassing the
    /// canonical table. The deserializer uses this after it has validated
    /// the wire flags, and it is the only way to re-frame a retained
    /// unknown attribute.
    pub const fn with_flags(flags: AttributeFlags, value: PathAttributeValue) -> Self {
        Self { flags, value }
    }

    pub const fn flags(&self) -> AttributeFlags {
        self.flags
    }

    pub const fn value(&self) -> &PathAttributeValue {
        &self.value
    }

    pub fn type_code(&self) -> u8 {
        self.value.type_code()
    }

    pub const fn optional(&self) -> bool {
        self.flags.optional()
    }

    pub const fn transitive(&self) -> bool {
        self.flags.transitive()
    }

    pub const fn partial(&self) -> bool {
        self.flags.partial()
    }

    pub const fn extended_length(&self) -> bool {
        self.flags.extended_length()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PathAttributeValue {
    Origin(Origin),
    AsPath(AsPath),
    NextHop(NextHop),
    MultiExitDiscriminator(MultiExitDiscriminator),
    LocalPreference(LocalPreference),
    AtomicAggregate(AtomicAggregate),
    Aggregator(Aggregator),
    UnknownAttribute(UnknownAttribute),
}

impl PathAttributeValue {
    /// The wire type code of this value. For unknown attributes, the code
    /// observed on the wire.
    pub fn type_code(&self) -> u8 {
        match self {
            Self::Origin(_) => PathAttributeType::Origin.into(),
            Self::AsPath(_) => PathAttributeType::AsPath.into(),
            Self::NextHop(_) => PathAttributeType::NextHop.into(),
            Self::MultiExitDiscriminator(_) => PathAttributeType::MultiExitDiscriminator.into(),
            Self::LocalPreference(_) => PathAttributeType::LocalPreference.into(),
            Self::AtomicAggregate(_) => PathAttributeType::AtomicAggregate.into(),
            Self::Aggregator(_) => PathAttributeType::Aggregator.into(),
            Self::UnknownAttribute(attr) => attr.code(),
        }
    }
}

/// The length field of a path attribute: one octet, or two when the
/// extended-length flag is set
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PathAttributeLength {
    U8(u8),
    U16(u16),
}

impl From<PathAttributeLength> for u16 {
    fn from(value: PathAttributeLength) -> Self {
        match value {
            PathAttributeLength::U8(len) => len.into(),
            PathAttributeLength::U16(len) => len,
        }
    }
}

/// ORIGIN is a well-known mandatory attribute that defines the origin of the
/// path information.
///
/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  len=1        | value         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Origin {
    IGP = 0,
    EGP = 1,
    Incomplete = 2,
}

impl From<Origin> for u8 {
    fn from(value: Origin) -> Self {
        value as u8
    }
}

/// Error type used in [`TryFrom`] for [`Origin`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedOrigin(pub u8);

impl TryFrom<u8> for Origin {
    type Error = UndefinedOrigin;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedOrigin(value)),
        }
    }
}

/// `AS_PATH` is a well-known mandatory attribute that is composed of a
/// sequence of AS path segments
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AsPath {
    segments: Vec<AsPathSegment>,
}

impl AsPath {
    pub const fn new(segments: Vec<AsPathSegment>) -> Self {
        Self { segments }
    }

    pub const fn segments(&self) -> &Vec<AsPathSegment> {
        &self.segments
    }
}

/// AS Path Segment Type
///
/// ```text
/// 0
/// 0 1 2 3 4 5 6 7 8
/// +-+-+-+-+-+-+-+-+
/// | set=1 or seq=2|
/// +-+-+-+-+-+-+-+-+
/// ```
#[repr(u8)]
#[derive(Display, FromRepr, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AsPathSegmentType {
    AsSet = 1,
    AsSequence = 2,
}

impl From<AsPathSegmentType> for u8 {
    fn from(value: AsPathSegmentType) -> Self {
        value as u8
    }
}

/// Error type used in [`TryFrom`] for [`AsPathSegmentType`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedAsPathSegmentType(pub u8);

impl TryFrom<u8> for AsPathSegmentType {
    type Error = UndefinedAsPathSegmentType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedAsPathSegmentType(value)),
        }
    }
}

/// Each AS path segment is represented by a triple:
/// <path segment type, path segment length, path segment value>.
/// AS numbers are two octets each.
///
/// ```text
/// 0                   1
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  segment type | len           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | 1.  as number (2 octets)      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | .....                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | len.  as number (2 octets)    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AsPathSegment {
    segment_type: AsPathSegmentType,
    as_numbers: Vec<u16>,
}

impl AsPathSegment {
    pub const fn new(segment_type: AsPathSegmentType, as_numbers: Vec<u16>) -> Self {
        Self {
            segment_type,
            as_numbers,
        }
    }

    pub const fn segment_type(&self) -> AsPathSegmentType {
        self.segment_type
    }

    pub const fn as_numbers(&self) -> &Vec<u16> {
        &self.as_numbers
    }
}

/// `NEXT_HOP` is a well-known mandatory attribute carrying the address of
/// the router to use as the next hop to the destinations listed in the NLRI.
/// Whether the address is usable is session policy; the codec only checks
/// the structural four-octet shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NextHop {
    next_hop: Ipv4Addr,
}

impl NextHop {
    pub const fn new(next_hop: Ipv4Addr) -> Self {
        Self { next_hop }
    }

    pub const fn next_hop(&self) -> Ipv4Addr {
        self.next_hop
    }
}

/// `MULTI_EXIT_DISC` is an optional non-transitive attribute used to
/// discriminate among multiple exit points to a neighboring AS
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MultiExitDiscriminator {
    metric: u32,
}

impl MultiExitDiscriminator {
    pub const fn new(metric: u32) -> Self {
        Self { metric }
    }

    pub const fn metric(&self) -> u32 {
        self.metric
    }
}

/// `LOCAL_PREF` is a well-known attribute communicating the local speaker's
/// degree of preference for an advertised route
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LocalPreference {
    preference: u32,
}

impl LocalPreference {
    pub const fn new(preference: u32) -> Self {
        Self { preference }
    }

    pub const fn preference(&self) -> u32 {
        self.preference
    }
}

/// `ATOMIC_AGGREGATE` is a well-known discretionary attribute of length 0;
/// its presence alone is the signal
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AtomicAggregate;

/// `AGGREGATOR` is an optional transitive attribute carrying the AS number
/// and the speaker address that formed the aggregate route
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Aggregator {
    asn: u16,
    origin: Ipv4Addr,
}

impl Aggregator {
    pub const fn new(asn: u16, origin: Ipv4Addr) -> Self {
        Self { asn, origin }
    }

    pub const fn asn(&self) -> u16 {
        self.asn
    }

    pub const fn origin(&self) -> Ipv4Addr {
        self.origin
    }
}

/// Path attribute with a type code this implementation doesn't recognize.
/// Per RFC 4271 an unrecognized optional transitive attribute must be kept
/// and passed along unchanged, so the raw value octets are retained and
/// re-encoded verbatim.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnknownAttribute {
    code: u8,
    value: Vec<u8>,
}

impl UnknownAttribute {
    pub const fn new(code: u8, value: Vec<u8>) -> Self {
        Self { code, value }
    }

    /// Attribute type code as observed on the wire
    pub const fn code(&self) -> u8 {
        self.code
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_type_canonical_table() {
        // (type code, options) -> expected flag octet
        let table = [
            (1, 0x00, 0x40),
            (2, 0x00, 0x40),
            (3, 0x00, 0x40),
            (4, 0x00, 0x80),
            (5, 0x00, 0x40),
            (6, 0x00, 0x40),
            (7, 0x00, 0xc0),
        ];
        for (code, options, expected) in table {
            let attr_type = AttributeType::new(code, options).expect("known attribute type");
            assert_eq!(attr_type.flags().byte(), expected, "type code {code}");
            assert_eq!(u8::from(attr_type.type_code()), code);
        }
    }

    #[test]
    fn test_attribute_type_options_honored_selectively() {
        // Partial is honored only for AGGREGATOR
        let aggregator = AttributeType::new(7, ATTRIBUTE_OPTION_PARTIAL).expect("aggregator");
        assert!(aggregator.flags().partial());
        assert_eq!(aggregator.flags().byte(), 0xe0);
        for code in [1, 2, 3, 4, 5, 6] {
            let attr_type = AttributeType::new(code, ATTRIBUTE_OPTION_PARTIAL).expect("known");
            assert!(!attr_type.flags().partial(), "type code {code}");
        }

        // Extended length is honored only for AS_PATH and AGGREGATOR
        let as_path = AttributeType::new(2, ATTRIBUTE_OPTION_EXTENDED_LENGTH).expect("as path");
        assert!(as_path.flags().extended_length());
        assert_eq!(as_path.flags().byte(), 0x50);
        let aggregator =
            AttributeType::new(7, ATTRIBUTE_OPTION_EXTENDED_LENGTH).expect("aggregator");
        assert!(aggregator.flags().extended_length());
        for code in [1, 3, 4, 5, 6] {
            let attr_type =
                AttributeType::new(code, ATTRIBUTE_OPTION_EXTENDED_LENGTH).expect("known");
            assert!(!attr_type.flags().extended_length(), "type code {code}");
        }

        // Unrelated option bits are ignored entirely
        let origin = AttributeType::new(1, 0xfc).expect("origin");
        assert_eq!(origin.flags().byte(), 0x40);
    }

    #[test]
    fn test_attribute_type_undefined_code() {
        assert_eq!(AttributeType::new(0, 0), Err(UndefinedPathAttributeType(0)));
        assert_eq!(AttributeType::new(8, 0), Err(UndefinedPathAttributeType(8)));
        assert_eq!(
            AttributeType::new(255, 0),
            Err(UndefinedPathAttributeType(255))
        );
    }

    #[test]
    fn test_attribute_flags_accessors() {
        let mut flags = AttributeFlags::empty();
        assert_eq!(flags.byte(), 0x00);
        flags.set_optional(true);
        assert_eq!(flags.byte(), 0x80);
        flags.set_transitive(true);
        assert_eq!(flags.byte(), 0xc0);
        flags.set_partial(true);
        assert_eq!(flags.byte(), 0xe0);
        flags.set_extended_length(true);
        assert_eq!(flags.byte(), 0xf0);
        assert!(flags.optional() && flags.transitive() && flags.partial());
        flags.set_optional(false);
        assert_eq!(flags.byte(), 0x70);
        assert!(!flags.optional());

        // Reserved low bits never survive construction
        assert_eq!(AttributeFlags::from_byte(0x4f).byte(), 0x40);
    }

    #[test]
    fn test_path_attribute_new_rejects_unknown_value() {
        let unknown =
            PathAttributeValue::UnknownAttribute(UnknownAttribute::new(0xf0, vec![1, 2, 3]));
        assert_eq!(
            PathAttribute::new(unknown, 0),
            Err(UndefinedPathAttributeType(0xf0))
        );
    }

    #[test]
    fn test_path_attribute_flag_shortcuts() {
        let attr = PathAttribute::new(
            PathAttributeValue::Aggregator(Aggregator::new(64512, Ipv4Addr::new(192, 0, 2, 1))),
            ATTRIBUTE_OPTION_PARTIAL | ATTRIBUTE_OPTION_EXTENDED_LENGTH,
        )
        .expect("aggregator attribute");
        assert!(attr.optional());
        assert!(attr.transitive());
        assert!(attr.partial());
        assert!(attr.extended_length());
        assert_eq!(attr.type_code(), 7);
    }
}
