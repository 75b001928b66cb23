use nesterator_core::{
    Error,
    address_space::{AddressSpace, Port},
};
use proptest::prelude::*;

const BASE: u16 = 0x1000;

/// Port device that records the folded addresses it sees.
#[derive(Default)]
struct Recorder {
    reads: Vec<u16>,
    writes: Vec<(u16, u8)>,
}

impl Port for Recorder {
    fn read_port(&mut self, addr: u16) -> u8 {
        self.reads.push(addr);
        addr as u8
    }

    fn write_port(&mut self, addr: u16, value: u8) {
        self.writes.push((addr, value));
    }
}

proptest! {
    #[test]
    fn every_mirror_sees_the_same_byte(
        len in 1usize..256,
        times in 1u32..16,
        pick in any::<u32>(),
        value in any::<u8>(),
    ) {
        let mut space = AddressSpace::mirrored(
            AddressSpace::block(BASE, len).expect("block"),
            times,
        )
        .expect("mirror");
        let span = len as u32 * times;
        prop_assert_eq!(space.range().len(), span);

        let addr = BASE + (pick % span) as u16;
        space.write(addr, value);
        let offset = (addr - BASE) as usize % len;
        for copy in 0..times as usize {
            let alias = BASE + (copy * len + offset) as u16;
            prop_assert_eq!(space.read(alias), value);
        }
    }

    #[test]
    fn contiguous_children_compose(sizes in prop::collection::vec(1usize..512, 1..8)) {
        let mut start = BASE;
        let mut children = Vec::new();
        for &size in &sizes {
            children.push(AddressSpace::block(start, size).expect("block"));
            start += size as u16;
        }
        let mut space = AddressSpace::composite(children).expect("composite");
        prop_assert_eq!(space.range().start(), BASE as u32);
        prop_assert_eq!(space.range().end(), start as u32);

        // Tag the first and last byte of every child and read them back.
        let mut at = BASE;
        for (index, &size) in sizes.iter().enumerate() {
            space.write(at, index as u8);
            space.write(at + size as u16 - 1, index as u8);
            at += size as u16;
        }
        let mut at = BASE;
        for (index, &size) in sizes.iter().enumerate() {
            prop_assert_eq!(space.read(at + size as u16 - 1), index as u8);
            prop_assert_eq!(space.read(at), index as u8);
            at += size as u16;
        }
    }

    #[test]
    fn gaps_and_overlaps_are_rejected(first in 1usize..256, shift in 1u16..64, grow in any::<bool>()) {
        let second = if grow {
            BASE + first as u16 + shift
        } else {
            BASE + first as u16 - shift.min(first as u16)
        };
        let children = vec![
            AddressSpace::block(BASE, first).expect("block"),
            AddressSpace::block(second, 16).expect("block"),
        ];
        let joined = AddressSpace::composite(children);
        let rejected = matches!(joined, Err(Error::NonContiguous { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn mirror_of_aliases_its_target(offset in 0u16..0x100, value in any::<u8>()) {
        let mut space = AddressSpace::composite(vec![
            AddressSpace::block(0x0000, 0x100).expect("block"),
            AddressSpace::mirror_of(0x0000, 0x0100, 0x100).expect("mirror"),
        ])
        .expect("composite");
        space.write(0x0100 + offset, value);
        prop_assert_eq!(space.read(offset), value);
        prop_assert_eq!(space.read(0x0100 + offset), value);
    }

    #[test]
    fn ports_see_folded_addresses(addr in 0x2000u16..0x4000, value in any::<u8>()) {
        let mut space = AddressSpace::mirrored(
            AddressSpace::port(0x2000, 8).expect("port"),
            1024,
        )
        .expect("mirror");
        let mut device = Recorder::default();
        let folded = 0x2000 + (addr & 7);

        prop_assert_eq!(space.read_via(addr, &mut device), folded as u8);
        space.write_via(addr, value, &mut device);
        prop_assert_eq!(device.reads, vec![folded]);
        prop_assert_eq!(device.writes, vec![(folded, value)]);
    }
}

#[test]
fn empty_composites_and_zero_mirrors_are_rejected() {
    assert!(matches!(
        AddressSpace::composite(Vec::new()),
        Err(Error::EmptyComposite)
    ));
    let block = AddressSpace::block(BASE, 16).expect("block");
    assert!(matches!(
        AddressSpace::mirrored(block, 0),
        Err(Error::InvalidMirror { .. })
    ));
}

#[test]
fn spaces_past_the_top_of_the_bus_are_rejected() {
    let block = AddressSpace::block(0xF000, 0x1000).expect("block");
    assert!(matches!(
        AddressSpace::mirrored(block, 2),
        Err(Error::InvalidRange { .. })
    ));
    assert!(AddressSpace::block(0xFF00, 0x200).is_err());
}

#[test]
#[should_panic(expected = "outside")]
fn out_of_range_access_panics() {
    let space = AddressSpace::block(BASE, 16).expect("block");
    space.read(BASE + 16);
}

#[test]
#[should_panic(expected = "without an attached device")]
fn plain_reads_refuse_port_windows() {
    let space = AddressSpace::port(0x2000, 8).expect("port");
    space.read(0x2003);
}
