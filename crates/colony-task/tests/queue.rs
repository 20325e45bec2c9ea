mod support;

use colony_act::ActStatus;
use colony_core::Blackboard;
use colony_task::{Priority, TaskQueue, TaskState};
use support::{ctx, Job, Yard};

fn run_to_empty(queue: &mut TaskQueue<Yard>, world: &mut Yard, bb: &mut Blackboard) -> Vec<String> {
    let mut finished = Vec::new();
    for tick in 0..64 {
        let Some(step) = queue.step(&ctx(tick), 1, world, bb) else {
            break;
        };
        if let Some(report) = step.report {
            finished.push(report.name);
        }
    }
    finished
}

#[test]
fn higher_priority_runs_first() {
    let mut queue = TaskQueue::new();
    queue.enqueue(Job::new("sweep", Priority::Low).boxed());
    queue.enqueue(Job::new("dig", Priority::High).boxed());
    queue.enqueue(Job::new("haul", Priority::Medium).boxed());

    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    assert_eq!(run_to_empty(&mut queue, &mut world, &mut bb), ["dig", "haul", "sweep"]);
    assert!(queue.is_empty());
}

#[test]
fn equal_priorities_keep_insertion_order() {
    let mut queue = TaskQueue::new();
    queue.enqueue(Job::new("first", Priority::Medium).boxed());
    queue.enqueue(Job::new("second", Priority::Medium).boxed());
    queue.enqueue(Job::new("idle", Priority::Idle).boxed());
    queue.enqueue(Job::new("third", Priority::Medium).boxed());

    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    assert_eq!(
        run_to_empty(&mut queue, &mut world, &mut bb),
        ["first", "second", "third", "idle"]
    );
}

#[test]
fn active_task_is_not_preempted() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();

    queue.enqueue(Job::new("long", Priority::Low).running(2).boxed());
    let step = queue.step(&ctx(0), 1, &mut world, &mut bb).unwrap();
    assert!(step.activated);
    assert_eq!(step.status, ActStatus::Running);

    queue.enqueue(Job::new("urgent", Priority::Urgent).boxed());
    let step = queue.step(&ctx(1), 1, &mut world, &mut bb).unwrap();
    assert!(!step.activated);
    assert_eq!(queue.active_task().map(|t| t.name().to_owned()).as_deref(), Some("long"));

    assert_eq!(run_to_empty(&mut queue, &mut world, &mut bb), ["long", "urgent"]);
    assert_eq!(world.log, ["long", "long", "long", "urgent"]);
}

#[test]
fn next_task_activates_on_the_following_step() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    queue.enqueue(Job::new("a", Priority::Medium).boxed());
    queue.enqueue(Job::new("b", Priority::Medium).boxed());

    let step = queue.step(&ctx(0), 1, &mut world, &mut bb).unwrap();
    assert_eq!(step.status, ActStatus::Success);
    assert_eq!(queue.active_id(), None);
    assert_eq!(world.log, ["a"]);
}

#[test]
fn failed_task_is_reported_and_removed() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    let id = queue.enqueue(Job::new("blocked", Priority::High).running(1).failing().boxed());

    queue.step(&ctx(0), 1, &mut world, &mut bb);
    let step = queue.step(&ctx(1), 1, &mut world, &mut bb).unwrap();
    let report = step.report.unwrap();
    assert_eq!(report.id, id);
    assert_eq!(report.state, TaskState::Failed);
    assert_eq!(report.steps, 2);
    assert!(queue.is_empty());
    assert!(queue.step(&ctx(2), 1, &mut world, &mut bb).is_none());
}

#[test]
fn cancel_drops_the_active_tree_without_stepping_it() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    let long = queue.enqueue(Job::new("long", Priority::High).running(10).boxed());
    queue.enqueue(Job::new("next", Priority::Low).boxed());

    queue.step(&ctx(0), 1, &mut world, &mut bb);
    assert_eq!(queue.state_of(long), Some(TaskState::Active));

    let report = queue.cancel(long).unwrap();
    assert_eq!(report.state, TaskState::Canceled);
    assert_eq!(report.steps, 1);
    assert_eq!(queue.state_of(long), None);

    let step = queue.step(&ctx(1), 1, &mut world, &mut bb).unwrap();
    assert!(step.activated);
    assert_eq!(world.log, ["long", "next"]);
}

#[test]
fn cancel_pending_and_unknown() {
    let mut queue = TaskQueue::new();
    let a = queue.enqueue(Job::new("a", Priority::Medium).boxed());
    let b = queue.enqueue(Job::new("b", Priority::Medium).boxed());

    assert_eq!(queue.cancel(b).map(|r| r.state), Some(TaskState::Canceled));
    assert!(queue.cancel(b).is_none());
    assert_eq!(queue.state_of(a), Some(TaskState::Queued));
    assert_eq!(queue.len(), 1);
}

#[test]
fn cancel_all_reports_active_first() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    queue.enqueue(Job::new("low", Priority::Low).boxed());
    queue.enqueue(Job::new("busy", Priority::High).running(5).boxed());
    queue.step(&ctx(0), 1, &mut world, &mut bb);

    let names: Vec<_> = queue.cancel_all().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["busy", "low"]);
    assert!(queue.is_empty());
}

#[test]
fn contains_matches_by_name() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    queue.enqueue(Job::new("dig 1,2,3", Priority::Medium).running(3).boxed());

    assert!(queue.contains(&Job::new("dig 1,2,3", Priority::Urgent)));
    assert!(!queue.contains(&Job::new("dig 4,5,6", Priority::Medium)));

    queue.step(&ctx(0), 1, &mut world, &mut bb);
    assert!(queue.contains(&Job::new("dig 1,2,3", Priority::Low)));
}

#[test]
fn take_hands_the_task_back() {
    let mut queue = TaskQueue::new();
    let id = queue.enqueue(Job::new("haul", Priority::Medium).boxed());
    let task = queue.take(id).unwrap();
    assert_eq!(task.name(), "haul");
    assert!(queue.is_empty());
}

#[test]
fn lifecycle_is_traced() {
    let mut queue = TaskQueue::new();
    let mut world = Yard::default();
    let mut bb = Blackboard::new();
    colony_trace::enable_log(&mut bb);

    let id = queue.enqueue(Job::new("dig", Priority::High).running(1).boxed());
    run_to_empty(&mut queue, &mut world, &mut bb);

    let log = colony_trace::take_log(&mut bb);
    assert_eq!(log.tags(), ["task.activate", "task.success"]);
    let done = &log.events[1];
    assert_eq!(done.tick, 1);
    assert_eq!(done.agent, 1);
    assert_eq!(done.a, id.0);
    assert_eq!(done.b, Priority::High.rank() as u64);
}
