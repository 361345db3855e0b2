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

use crate::{
    codec::BgpMessageCodec,
    wire::{serializer::BgpMessageWritingError, tests::BGP_MARKER},
    BgpMessage,
};
use routewire_parse_utils::test_helpers::{
    combine, test_parsed_completely_with_one_input, test_write,
};

#[test]
fn test_keepalive() -> Result<(), BgpMessageWritingError> {
    let good_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04]]);
    let good = BgpMessage::KeepAlive;

    test_parsed_completely_with_one_input(&good_wire, 19, &good);
    test_write(&good, &good_wire)?;
    Ok(())
}

#[test]
fn test_keepalive_through_codec() {
    let good_wire = combine(vec![BGP_MARKER, &[0x00, 0x13, 0x04]]);
    let parsed = BgpMessageCodec::deserialize(&good_wire, 19);
    assert_eq!(parsed, Ok(BgpMessage::KeepAlive));

    let serialized = BgpMessageCodec::serialize(&BgpMessage::KeepAlive).expect("serialize");
    assert_eq!(serialized, good_wire);
}
