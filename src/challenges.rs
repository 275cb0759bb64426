//! Small puzzles solved on raw chains.

use log::debug;

use crate::node::{ChainNode, NodeArena};

/// Count the cars of a circular train by walking it.
///
/// Each car carries a light, on or off. Starting at `start`, the walk goes
/// forward and switches every light that matches the starting car's original
/// state. Once the starting car's own light has been observed switched, the
/// walk has gone around exactly once. The lights are left switched.
///
/// # Returns
///
/// - `Some(0)` for an empty train.
/// - `Some(count)` for a train whose chain loops back to `start`.
/// - [`None`] if the chain ends, or loops without coming back to `start`.
pub fn count_railcars<N>(arena: &mut NodeArena<bool>, start: Option<N>) -> Option<usize>
where
    N: ChainNode<Payload = bool>,
{
    let Some(start) = start else {
        return Some(0);
    };
    if start.walk(arena).loop_index != Some(0) {
        debug!("train starting at {:?} is not circular", start.node());
        return None;
    }

    let known = *start.payload(arena);
    let mut count = 1;
    let mut curr = start;
    loop {
        curr = curr.next(arena)?;
        if *curr.payload(arena) == known {
            let light = curr.node().payload_mut(arena);
            *light = !*light;
            if *start.payload(arena) != known {
                break;
            }
        }
        count += 1;
    }
    Some(count)
}

/// Link the last node of the chain starting at `head` back to `head`.
///
/// Returns the last node.
pub fn close_loop<N: ChainNode>(arena: &mut NodeArena<N::Payload>, head: N) -> N {
    let tail = head.walk(arena).last().unwrap_or(head);
    N::link(arena, Some(tail), Some(head));
    tail
}

/// Split point of the chain starting at `head`: the last node of the first
/// half and the first node of the second half.
///
/// The first half holds `len / 2` nodes, but never fewer than one.
pub fn halves<N: ChainNode>(arena: &NodeArena<N::Payload>, head: N) -> (N, Option<N>) {
    let len = head.walk(arena).len();
    let mid = head
        .find_by_index(arena, (len / 2).saturating_sub(1) as isize)
        .unwrap_or(head);
    (mid, mid.next(arena))
}

/// Reverse the second half of the chain starting at `head` in place.
///
/// The first `len / 2` nodes stay where they are and the remaining nodes are
/// reattached after them in reverse order. Chains shorter than two nodes are
/// left alone.
///
/// Returns the head, which never changes.
pub fn reverse_second_half<N: ChainNode>(arena: &mut NodeArena<N::Payload>, head: N) -> N {
    if let (mid, Some(second)) = halves(arena, head) {
        let reversed = second.reverse(arena);
        N::link(arena, Some(mid), Some(reversed));
    }
    head
}
