mod support;

use std::cell::Cell;
use std::rc::Rc;

use colony_act::{Act, ActStatus, Domain, Sequence};
use colony_core::{Blackboard, TickContext};
use colony_trace::{enable_log, take_log};

use support::{ctx, drive, RecordingWorld, Scripted};

use ActStatus::{Failure, Running, Success};

#[test]
fn rejected_guard_fails_without_building_child() {
    let mut domain = Domain::new(
        "dig-if-designated",
        |_ctx: &TickContext, _agent: u64, world: &RecordingWorld, _bb: &Blackboard| world.flag,
        |_ctx: &TickContext, _agent: u64, _world: &RecordingWorld, _bb: &Blackboard| {
            panic!("child must not be constructed when the guard rejects")
        },
    );
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();
    enable_log(&mut bb);

    assert_eq!(domain.step(&ctx(0), 1, &mut world, &mut bb), Failure);
    assert!(domain.is_rejected());
    assert_eq!(domain.step(&ctx(1), 1, &mut world, &mut bb), Failure);
    assert_eq!(take_log(&mut bb).tags(), vec!["act.domain.reject"]);
}

#[test]
fn guard_is_evaluated_exactly_once() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let mut domain = Domain::with_child(
        "guarded",
        move |_ctx: &TickContext, _agent: u64, world: &RecordingWorld, _bb: &Blackboard| {
            counter.set(counter.get() + 1);
            world.flag
        },
        Scripted::boxed("work", &[Running, Running, Success]),
    );
    let mut world = RecordingWorld {
        flag: true,
        ..Default::default()
    };
    let mut bb = Blackboard::new();

    assert_eq!(domain.step(&ctx(0), 1, &mut world, &mut bb), Running);
    assert!(domain.is_entered());

    // The guard would now reject, but it is never consulted again.
    world.flag = false;
    assert_eq!(domain.step(&ctx(1), 1, &mut world, &mut bb), Running);
    assert_eq!(domain.step(&ctx(2), 1, &mut world, &mut bb), Success);
    assert_eq!(world.stepped, vec!["work", "work", "work"]);
    assert_eq!(calls.get(), 1);
}

#[test]
fn guard_runs_once_per_instantiation() {
    let make = || {
        Domain::new(
            "counted",
            |_ctx: &TickContext, _agent: u64, _world: &RecordingWorld, _bb: &Blackboard| true,
            |_ctx: &TickContext, _agent: u64, _world: &RecordingWorld, _bb: &Blackboard| {
                Scripted::boxed("child", &[Running, Success])
            },
        )
    };
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();

    for _ in 0..2 {
        let mut domain = make();
        let seen = drive(&mut domain, &mut world, &mut bb, 10);
        assert_eq!(seen, vec![Running, Success]);
    }
    assert_eq!(world.stepped, vec!["child", "child", "child", "child"]);
}

#[test]
fn child_failure_is_forwarded_unchanged() {
    let mut domain = Domain::with_child(
        "forward",
        |_ctx: &TickContext, _agent: u64, _world: &RecordingWorld, _bb: &Blackboard| true,
        Scripted::boxed("fails", &[Running, Failure]),
    );
    let mut world = RecordingWorld::default();
    let mut bb = Blackboard::new();

    assert_eq!(drive(&mut domain, &mut world, &mut bb, 10), vec![Running, Failure]);
}

#[test]
fn domain_guards_a_sequence() {
    let child = Sequence::new(
        "go-then-dig",
        vec![Scripted::boxed("go", &[Success]), Scripted::boxed("dig", &[Success])],
    );
    let mut domain = Domain::with_child(
        "kill-voxel",
        |_ctx: &TickContext, _agent: u64, world: &RecordingWorld, _bb: &Blackboard| world.flag,
        Box::new(child),
    );
    let mut world = RecordingWorld {
        flag: true,
        ..Default::default()
    };
    let mut bb = Blackboard::new();

    assert_eq!(drive(&mut domain, &mut world, &mut bb, 10), vec![Running, Success]);
    assert_eq!(world.stepped, vec!["go", "dig"]);
}
