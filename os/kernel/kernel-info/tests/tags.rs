use kernel_info::boot::{
    FramebufferTag, SmpInfo, SmpTag, Tag, TerminalFlags, TerminalTag, struct_ids,
};
use kernel_info::tags::{MAX_TAGS, TagList, TagListError};

const UNKNOWN: u64 = 0xdead_beef_0000_0001;

fn addr<T>(value: &T) -> u64 {
    core::ptr::from_ref(value).expose_provenance() as u64
}

/// Builds a terminated chain of payload-less tags in host memory.
fn chain(ids: &[u64]) -> Vec<Box<Tag>> {
    let mut tags: Vec<Box<Tag>> = ids.iter().map(|&id| Box::new(Tag::new(id, 0))).collect();
    for i in 1..tags.len() {
        let next = addr(&*tags[i]);
        tags[i - 1].next = next;
    }
    tags
}

fn list(tags: &[Box<Tag>]) -> TagList<'_> {
    let head = tags.first().map_or(0, |tag| addr(&**tag));
    unsafe { TagList::from_raw(head) }
}

#[test]
fn empty_list_finds_nothing() {
    let empty = TagList::empty();
    assert!(empty.is_empty());
    assert!(empty.find(struct_ids::TERMINAL).is_none());
    assert_eq!(empty.iter().count(), 0);
    assert_eq!(empty.validate(), Ok(0));

    let null = unsafe { TagList::from_raw(0) };
    assert!(null.is_empty());
    assert!(null.get::<TerminalTag>().is_none());
}

#[test]
fn absent_identifier_is_not_found() {
    let tags = chain(&[struct_ids::TERMINAL, struct_ids::SMP, struct_ids::FRAMEBUFFER]);
    let list = list(&tags);

    assert!(list.find(UNKNOWN).is_none());
    assert!(list.find(struct_ids::KERNEL_BASE_ADDRESS).is_none());

    // A previous hit must not leak into the next lookup.
    assert!(list.find(struct_ids::SMP).is_some());
    assert!(list.find(UNKNOWN).is_none());
}

#[test]
fn present_identifier_is_found_at_any_position() {
    let ids = [struct_ids::TERMINAL, struct_ids::SMP, struct_ids::FRAMEBUFFER];
    let tags = chain(&ids);
    let list = list(&tags);

    for (position, id) in ids.iter().enumerate() {
        let found = list.find(*id).expect("tag is present");
        assert!(core::ptr::eq(found, &*tags[position]), "position {position}");
        assert_eq!(found.identifier, *id);
    }
}

#[test]
fn first_match_wins() {
    let tags = chain(&[UNKNOWN, struct_ids::SMP, struct_ids::SMP]);
    let list = list(&tags);
    let found = list.find(struct_ids::SMP).expect("tag is present");
    assert!(core::ptr::eq(found, &*tags[1]));
}

#[test]
fn find_is_idempotent() {
    let tags = chain(&[struct_ids::FRAMEBUFFER, struct_ids::TERMINAL]);
    let list = list(&tags);

    let first = list.find(struct_ids::TERMINAL);
    let second = list.find(struct_ids::TERMINAL);
    assert!(core::ptr::eq(first.unwrap(), second.unwrap()));
    assert_eq!(list.find(UNKNOWN), list.find(UNKNOWN));
    assert_eq!(list.validate(), Ok(2));
}

#[test]
fn iteration_follows_list_order() {
    let ids = [3, 1, 4, 1, 5];
    let tags = chain(&ids);
    let seen: Vec<u64> = list(&tags).iter().map(|tag| tag.identifier).collect();
    assert_eq!(seen, ids);
}

#[test]
fn self_loop_is_reported_as_cycle() {
    let mut tags = chain(&[UNKNOWN]);
    let own = addr(&*tags[0]);
    tags[0].next = own;
    let list = list(&tags);

    assert_eq!(list.validate(), Err(TagListError::Cycle { address: own }));
    assert!(list.find(struct_ids::TERMINAL).is_none());
    assert_eq!(list.iter().count(), MAX_TAGS);
}

#[test]
fn cycle_behind_a_tail_is_reported() {
    let mut tags = chain(&[1, 2, 3, 4]);
    let back = addr(&*tags[1]);
    tags[3].next = back;
    let list = list(&tags);

    let Err(TagListError::Cycle { address }) = list.validate() else {
        panic!("cycle not detected");
    };
    let ring: Vec<u64> = tags[1..].iter().map(|tag| addr(&**tag)).collect();
    assert!(ring.contains(&address));

    // Lookups still terminate and still find reachable tags.
    assert_eq!(list.find(4).map(|tag| tag.identifier), Some(4));
    assert!(list.find(UNKNOWN).is_none());
}

#[test]
fn overly_long_list_is_rejected_and_traversal_bounded() {
    let ids: Vec<u64> = (0..300).collect();
    let tags = chain(&ids);
    let list = list(&tags);

    assert_eq!(list.validate(), Err(TagListError::TooLong { limit: MAX_TAGS }));
    assert_eq!(list.iter().count(), MAX_TAGS);
    assert!(list.find(299).is_none());
    assert!(list.find(255).is_some());
}

#[test]
fn typed_lookup_reads_payload() {
    let mut framebuffer = Box::new(FramebufferTag {
        tag: Tag::new(struct_ids::FRAMEBUFFER, 0),
        framebuffer_addr: 0xfd00_0000,
        framebuffer_width: 1024,
        framebuffer_height: 768,
        framebuffer_pitch: 4096,
        framebuffer_bpp: 32,
        memory_model: 1,
        red_mask_size: 8,
        red_mask_shift: 16,
        green_mask_size: 8,
        green_mask_shift: 8,
        blue_mask_size: 8,
        blue_mask_shift: 0,
        unused: 0,
    });
    let terminal = Box::new(TerminalTag {
        tag: Tag::new(struct_ids::TERMINAL, 0),
        flags: TerminalFlags::new().with_dimensions_valid(true).into_bits(),
        cols: 80,
        rows: 24,
        term_write: 0x1000,
        max_length: 0,
    });
    framebuffer.tag.next = addr(&*terminal);
    let list = unsafe { TagList::from_raw(addr(&*framebuffer)) };

    let term = list.get::<TerminalTag>().expect("terminal tag");
    assert!(core::ptr::eq(term, &*terminal));
    assert_eq!((term.cols, term.rows), (80, 24));
    assert!(term.flags().dimensions_valid());
    assert!(!term.flags().max_length_valid());

    let fb = list.get::<FramebufferTag>().expect("framebuffer tag");
    assert_eq!(fb.framebuffer_addr, 0xfd00_0000);
    assert_eq!(fb.framebuffer_pitch, 4096);

    assert!(list.get::<SmpTag>().is_none());
}

#[repr(C)]
struct SmpFixture {
    tag: SmpTag,
    cpus: [SmpInfo; 2],
}

#[test]
fn smp_records_follow_the_tag() {
    let cpu = |id: u32| SmpInfo {
        processor_id: id,
        lapic_id: id * 2,
        target_stack: 0,
        goto_address: 0,
        extra_argument: 0,
    };
    let fixture = Box::new(SmpFixture {
        tag: SmpTag {
            tag: Tag::new(struct_ids::SMP, 0),
            flags: 0,
            bsp_lapic_id: 0,
            unused: 0,
            cpu_count: 2,
        },
        cpus: [cpu(0), cpu(1)],
    });
    let list = unsafe { TagList::from_raw(addr(&*fixture)) };

    let smp = list.get::<SmpTag>().expect("smp tag");
    let cpus = unsafe { smp.cpus() };
    assert_eq!(cpus.len(), 2);
    assert_eq!(cpus[1].processor_id, 1);
    assert_eq!(cpus[1].lapic_id, 2);
}
