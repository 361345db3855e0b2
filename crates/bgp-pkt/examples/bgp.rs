//! Simple example of constructing BGP messages, serializing them to wire
//! format, and feeding buffers back through the codec.

use std::net::Ipv4Addr;

use routewire_bgp_pkt::{
    codec::BgpMessageCodec,
    open::BgpOpenMessage,
    path_attribute::{
        AsPath, AsPathSegment, AsPathSegmentType, NextHop, Origin, PathAttribute,
        PathAttributeValue,
    },
    update::BgpUpdateMessage,
    BgpMessage,
};

pub fn main() {
    // Construct a new BGP open message
    let open = BgpMessage::Open(BgpOpenMessage::new(
        64512,
        180,
        Ipv4Addr::new(10, 0, 0, 1),
        vec![],
    ));

    // Serialize the message into its BGP binary format and read it back
    let wire = BgpMessageCodec::serialize(&open).expect("serialize open");
    let parsed = BgpMessageCodec::deserialize(&wire, wire.len() as u16).expect("parse open");
    assert_eq!(open, parsed);

    // An update announcing one prefix
    let update = BgpMessage::Update(BgpUpdateMessage::new(
        vec![],
        vec![
            PathAttribute::new(PathAttributeValue::Origin(Origin::IGP), 0)
                .expect("origin attribute"),
            PathAttribute::new(
                PathAttributeValue::AsPath(AsPath::new(vec![AsPathSegment::new(
                    AsPathSegmentType::AsSequence,
                    vec![64512, 64620],
                )])),
                0,
            )
            .expect("as-path attribute"),
            PathAttribute::new(
                PathAttributeValue::NextHop(NextHop::new(Ipv4Addr::new(10, 0, 0, 1))),
                0,
            )
            .expect("next-hop attribute"),
        ],
        vec!["198.51.100.0/24".parse().expect("prefix")],
    ));
    let wire = BgpMessageCodec::serialize(&update).expect("serialize update");
    let parsed = BgpMessageCodec::deserialize(&wire, wire.len() as u16).expect("parse update");
    assert_eq!(update, parsed);
    println!("round-tripped {} octets of UPDATE", wire.len());

    // A corrupted buffer yields a ready-to-send NOTIFICATION instead
    let mut corrupted = wire.clone();
    corrupted[0] = 0x00;
    let response = BgpMessageCodec::deserialize(&corrupted, corrupted.len() as u16)
        .expect_err("corrupted marker");
    println!(
        "error response: code {} subcode {} ({} octets on the wire)",
        response.message().error_code(),
        response.message().error_subcode(),
        response.header().length(),
    );
}
