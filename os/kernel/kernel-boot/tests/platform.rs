mod common;

use common::*;
use kernel_boot::platform::PlatformSummary;
use kernel_info::boot::{FiveLevelPagingTag, SmpInfo, SmpTag, Tag, struct_ids};
use kernel_info::tags::TagList;

#[repr(C)]
struct SmpFixture {
    tag: SmpTag,
    cpus: [SmpInfo; 2],
}

#[test]
fn platform_tags_are_collected() {
    let cpu = |id: u32| SmpInfo {
        processor_id: id,
        lapic_id: id,
        target_stack: 0,
        goto_address: 0,
        extra_argument: 0,
    };
    let mut smp = Box::new(SmpFixture {
        tag: SmpTag {
            tag: Tag::new(struct_ids::SMP, 0),
            flags: 0,
            bsp_lapic_id: 0,
            unused: 0,
            cpu_count: 2,
        },
        cpus: [cpu(0), cpu(1)],
    });
    let mut paging = Box::new(FiveLevelPagingTag {
        tag: Tag::new(struct_ids::FIVE_LEVEL_PAGING, 0),
    });
    let mut framebuffer = framebuffer_tag();
    let head = link(&mut [&mut smp.tag.tag, &mut paging.tag, &mut framebuffer.tag]);

    let summary = PlatformSummary::collect(&unsafe { TagList::from_raw(head) });
    assert_eq!(summary.cpu_count, Some(2));
    assert_eq!(summary.bsp_lapic_id, Some(0));
    assert!(summary.five_level_paging);
    assert_eq!(summary.kernel_virtual_base, None);
    assert_eq!(summary.framebuffer.map(|fb| fb.width), Some(1024));
    summary.log();
}

#[test]
fn nothing_reported_means_defaults() {
    let summary = PlatformSummary::collect(&TagList::empty());
    assert_eq!(summary, PlatformSummary::default());
}
