mod common;

use common::*;
use kernel_boot::banner::{BuildInfo, COPYRIGHT, LOGO, WELCOME};
use kernel_boot::{BootMachine, BootModule, BootOutcome, BootState, ConsoleBinding, Fatal};
use kernel_info::boot::{BootInfo, KernelBaseAddressTag, Tag, struct_ids};
use kernel_info::tags::TagListError;

const BUILD: BuildInfo = BuildInfo {
    version: "0.0.0",
    date: "2021-07-01",
    time: "12:00:00",
    compiler: "rustc 1.91.0",
};

fn bring_up() -> [Step; 3] {
    [Step::ok("GDT"), Step::ok("IDT"), Step::ok("PIC")]
}

fn modules(steps: &mut [Step]) -> Vec<&mut dyn BootModule> {
    steps.iter_mut().map(|s| s as &mut dyn BootModule).collect()
}

#[test]
fn terminal_and_framebuffer_boot_to_idle() {
    let mut terminal = terminal_tag(80, 24, None);
    let mut framebuffer = framebuffer_tag();
    let head = link(&mut [&mut terminal.tag, &mut framebuffer.tag]);
    let info = BootInfo::new("Limine", "2.0", head);

    let mut steps = bring_up();
    let mut bound = None;
    let mut machine = BootMachine::new().with_build(BUILD);
    let outcome = unsafe {
        machine.run(&raw const info, &mut modules(&mut steps), |binding| {
            bound = Some(*binding);
        })
    };

    assert_eq!(outcome, BootOutcome::Idle { modules: 3 });
    assert_eq!(machine.state(), BootState::Idle);
    assert!(matches!(bound, Some(ConsoleBinding::Terminal(t)) if t.columns == Some(80)));

    let banner = format!(
        "{LOGO}version 0.0.0\nbuilt 2021-07-01 12:00:00 UTC with rustc 1.91.0\n{COPYRIGHT}\n\
         info: Bootloader: Limine 2.0\n"
    );
    let lines: String = ["GDT", "IDT", "PIC"]
        .iter()
        .map(|name| status_line(name, 46))
        .collect();
    assert_eq!(output(), format!("{banner}{lines}{WELCOME}"));
}

#[test]
fn empty_store_halts_without_output() {
    let info = BootInfo::new("Limine", "2.0", 0);
    let mut steps = bring_up();
    let mut bound = false;
    let mut machine = BootMachine::new();

    let outcome = unsafe { machine.run(&raw const info, &mut modules(&mut steps), |_| bound = true) };

    assert!(matches!(
        outcome,
        BootOutcome::Halted(Fatal::MissingMandatoryTag { .. })
    ));
    assert_eq!(machine.state(), BootState::Halted);
    assert!(!bound);
    assert!(steps.iter().all(|s| !s.ran));
    assert_eq!(write_calls(), 0);
    assert_eq!(output(), "");
}

#[test]
fn null_handoff_halts() {
    let mut machine = BootMachine::new();
    let outcome = unsafe { machine.run(core::ptr::null(), &mut [], |_| {}) };
    assert_eq!(outcome, BootOutcome::Halted(Fatal::MissingHandoff));
    assert_eq!(machine.state(), BootState::Halted);
    assert_eq!(write_calls(), 0);
}

#[test]
fn cyclic_tag_list_halts_before_binding() {
    let mut terminal = terminal_tag(80, 24, None);
    let mut framebuffer = framebuffer_tag();
    let head = link(&mut [&mut terminal.tag, &mut framebuffer.tag]);
    framebuffer.tag.next = head;
    let info = BootInfo::new("Limine", "2.0", head);

    let mut machine = BootMachine::new();
    let outcome = unsafe { machine.run(&raw const info, &mut [], |_| {}) };

    assert!(matches!(
        outcome,
        BootOutcome::Halted(Fatal::MalformedTagList(TagListError::Cycle { .. }))
    ));
    assert_eq!(write_calls(), 0);
}

#[test]
fn failing_module_halts_after_partial_output() {
    let mut terminal = terminal_tag(80, 24, None);
    let head = link(&mut [&mut terminal.tag]);
    let info = BootInfo::new("Limine", "2.0", head);

    let mut steps = [
        Step::ok("GDT"),
        Step::failing("IDT", "vector table rejected"),
        Step::ok("PIC"),
    ];
    let mut machine = BootMachine::new();
    let outcome = unsafe { machine.run(&raw const info, &mut modules(&mut steps), |_| {}) };

    assert_eq!(
        outcome,
        BootOutcome::Halted(Fatal::ModuleInit {
            module: "IDT",
            reason: "vector table rejected"
        })
    );
    assert_eq!(machine.state(), BootState::Halted);
    assert!(!steps[2].ran);
    assert_eq!(output().matches("Initializing").count(), 2);
    assert_eq!(output().matches("OK ").count(), 1);
    assert!(!output().contains(WELCOME));
}

#[test]
fn framebuffer_only_boot_renders_through_the_renderer() {
    let mut framebuffer = framebuffer_tag();
    let mut base = Box::new(KernelBaseAddressTag {
        tag: Tag::new(struct_ids::KERNEL_BASE_ADDRESS, 0),
        physical_base_address: 0x20_0000,
        virtual_base_address: 0xffff_ffff_8000_0000,
    });
    let head = link(&mut [&mut base.tag, &mut framebuffer.tag]);
    let info = BootInfo::new("Limine", "2.0", head);

    let mut renderer = TextRenderer::default();
    let mut steps = bring_up();
    let outcome = {
        let mut machine = BootMachine::new().with_renderer(&mut renderer);
        unsafe { machine.run(&raw const info, &mut modules(&mut steps), |_| {}) }
    };

    assert_eq!(outcome, BootOutcome::Idle { modules: 3 });
    assert_eq!(write_calls(), 0);
    let text = String::from_utf8(renderer.text).unwrap();
    assert!(text.contains("info: Bootloader: Limine 2.0\n"));
    assert!(text.contains(&status_line("PIC", 46)));
    assert!(text.ends_with(WELCOME));
}

#[test]
fn halting_before_binding_leaves_every_surface_untouched() {
    let mut framebuffer = framebuffer_tag();
    let head = link(&mut [&mut framebuffer.tag]);
    framebuffer.tag.next = head;
    let info = BootInfo::new("Limine", "2.0", head);

    let mut renderer = TextRenderer::default();
    let outcome = {
        let mut machine = BootMachine::new().with_renderer(&mut renderer);
        unsafe { machine.run(&raw const info, &mut [], |_| {}) }
    };

    assert!(matches!(outcome, BootOutcome::Halted(Fatal::MalformedTagList(_))));
    assert!(renderer.text.is_empty());
    assert!(renderer.target.is_none());
    assert_eq!(write_calls(), 0);
}
