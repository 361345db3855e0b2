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

//! A minimal location-aware input for `nom` parsers of binary protocols.
//!
//! [`BinarySpan`] plays the same role as `nom_locate`'s `LocatedSpan`, minus
//! the line/column bookkeeping: binary protocols only ever report byte
//! offsets, and skipping the newline scan keeps slicing cheap.

#[cfg(test)]
mod tests;

use nom::{AsBytes, InputIter, InputLength, InputTake, Offset, Slice};
use std::ops::{RangeFrom, RangeTo};

/// A fragment of an input buffer together with its byte offset from the
/// start of that buffer. Offsets survive slicing, so an error raised deep
/// inside a nested TLV still points at the absolute position in the
/// original message.
#[derive(Debug, Clone, Copy)]
pub struct BinarySpan<T> {
    offset: usize,
    fragment: T,
}

impl<T> BinarySpan<T> {
    pub const fn new(buffer: T) -> Self {
        Self {
            offset: 0,
            fragment: buffer,
        }
    }

    /// Builds a span claiming to start `offset` bytes into some buffer.
    ///
    /// # Safety
    /// The caller must guarantee the offset is consistent with the fragment:
    /// code computing relative positions assumes any index below the offset
    /// was valid in the original buffer.
    pub const unsafe fn new_from_raw_offset(offset: usize, fragment: T) -> Self {
        Self { offset, fragment }
    }

    #[inline]
    pub const fn location_offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn fragment(&self) -> &T {
        &self.fragment
    }
}

impl<T, R> Slice<R> for BinarySpan<T>
where
    T: Slice<R> + Offset + AsBytes + Slice<RangeTo<usize>>,
{
    #[inline]
    fn slice(&self, range: R) -> Self {
        let next_fragment = self.fragment.slice(range);
        let consumed_len = self.fragment.offset(&next_fragment);
        BinarySpan {
            offset: self.offset + consumed_len,
            fragment: next_fragment,
        }
    }
}

impl<T: InputIter> InputIter for BinarySpan<T> {
    type Item = T::Item;
    type Iter = T::Iter;
    type IterElem = T::IterElem;

    #[inline]
    fn iter_indices(&self) -> Self::Iter {
        self.fragment.iter_indices()
    }

    #[inline]
    fn iter_elements(&self) -> Self::IterElem {
        self.fragment.iter_elements()
    }

    #[inline]
    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.fragment.position(predicate)
    }

    #[inline]
    fn slice_index(&self, count: usize) -> Result<usize, nom::Needed> {
        self.fragment.slice_index(count)
    }
}

impl<T: InputLength> InputLength for BinarySpan<T> {
    #[inline]
    fn input_len(&self) -> usize {
        self.fragment.input_len()
    }
}

impl<T> InputTake for BinarySpan<T>
where
    Self: Slice<RangeFrom<usize>> + Slice<RangeTo<usize>>,
{
    #[inline]
    fn take(&self, count: usize) -> Self {
        self.slice(..count)
    }

    #[inline]
    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.slice(count..), self.slice(..count))
    }
}

impl<T> core::ops::Deref for BinarySpan<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.fragment
    }
}

impl<T: AsBytes> AsBytes for BinarySpan<T> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.fragment.as_bytes()
    }
}

impl<T: AsBytes + PartialEq> PartialEq for BinarySpan<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.fragment == other.fragment
    }
}

impl<T: AsBytes + Eq> Eq for BinarySpan<T> {}

impl<T: AsBytes> From<T> for BinarySpan<T> {
    #[inline]
    fn from(buffer: T) -> Self {
        Self::new(buffer)
    }
}
