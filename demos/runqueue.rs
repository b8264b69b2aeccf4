//! Virtual-runtime run-queue built on the leftmost-cached tree.
//!
//! Each task carries its own link; the queue never allocates. Picking
//! the next task is an O(1) read of the cached leftmost node, and a
//! finished slice re-enqueues the task further right by advancing its
//! virtual runtime in proportion to its weight.
//!
//! Run with `cargo run --example runqueue`.

use std::ptr::NonNull;

use bumpalo::Bump;
use rblink::{intrusive_adapter, Adapter, CachedRbTree, RbNode, Side};

struct Task {
    name: &'static str,
    weight: u64,
    vruntime: u64,
    link: RbNode,
}

intrusive_adapter!(TaskAdapter = Task { link });

// Descent by vruntime, ties to the right; tracks whether the task
// lands leftmost so the queue's cache stays exact.
unsafe fn enqueue(queue: &mut CachedRbTree, task: NonNull<Task>) {
    let vruntime = task.as_ref().vruntime;
    let link = TaskAdapter::link_of(task);
    let mut parent = None;
    let mut side = Side::Left;
    let mut is_leftmost = true;
    let mut cur = queue.tree().root();
    while let Some(c) = cur {
        parent = Some(c);
        if vruntime < TaskAdapter::container_of(c).as_ref().vruntime {
            side = Side::Left;
            cur = c.as_ref().left();
        } else {
            side = Side::Right;
            is_leftmost = false;
            cur = c.as_ref().right();
        }
    }
    queue.link_node(link, parent, side, is_leftmost);
    queue.insert_fixup(link);
}

fn main() {
    let bump = Bump::new();
    let mut queue = CachedRbTree::new();

    let tasks = [
        ("compactor", 1u64),
        ("flusher", 2),
        ("checkpointer", 4),
        ("vacuum", 8),
    ];

    unsafe {
        for (name, weight) in tasks {
            let task = NonNull::from(bump.alloc(Task {
                name,
                weight,
                vruntime: 0,
                link: RbNode::new(),
            }));
            enqueue(&mut queue, task);
        }

        const SLICE: u64 = 1_000;
        for tick in 0..16 {
            let link = queue.first().expect("queue is never empty here");
            let mut task = TaskAdapter::container_of(link);
            queue.erase(link);

            {
                let t = task.as_mut();
                println!(
                    "tick {tick:2}: running {:<12} vruntime={}",
                    t.name, t.vruntime
                );
                t.vruntime += SLICE * t.weight;
            }
            enqueue(&mut queue, task);
        }
    }
}
