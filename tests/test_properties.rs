use linkwork::{
    BinaryTree, ChainNode, DoubleNode, DoublyLinkedList, LinkedList, NodeArena, SingleNode,
    TreeNode,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn previous_links(arena: &NodeArena<i32>, nodes: &[DoubleNode<i32>]) -> Vec<Option<DoubleNode<i32>>> {
    nodes.iter().map(|node| node.previous(arena)).collect()
}

/// Check the search order below `node`, returning the payloads of its subtree.
fn check_subtree(arena: &NodeArena<i32>, node: TreeNode<i32>) -> Vec<i32> {
    let payload = *node.payload(arena);
    let mut payloads = vec![payload];
    if let Some(left) = node.left(arena) {
        assert_eq!(left.parent(arena), Some(node));
        let below = check_subtree(arena, left);
        assert!(below.iter().all(|&p| p < payload));
        payloads.extend(below);
    }
    if let Some(right) = node.right(arena) {
        assert_eq!(right.parent(arena), Some(node));
        let below = check_subtree(arena, right);
        assert!(below.iter().all(|&p| p >= payload));
        payloads.extend(below);
    }
    payloads
}

proptest! {
    #[test]
    fn tail_insertion_keeps_order(values in prop::collection::vec(any::<i32>(), 0..40)) {
        let arena = &mut NodeArena::default();
        let list = LinkedList::from_values(arena, values.iter().copied());

        prop_assert_eq!(list.len(), values.len());
        prop_assert_eq!(list.iter(arena).copied().collect::<Vec<_>>(), values.clone());

        let expected = values
            .iter()
            .map(|v| format!("{} -> ", v))
            .collect::<String>()
            + "None";
        prop_assert_eq!(list.display(arena).to_string(), expected);
    }

    #[test]
    fn reverse_is_an_involution(values in prop::collection::vec(any::<i32>(), 1..40)) {
        let arena = &mut NodeArena::default();
        let head = DoubleNode::from_sequence(arena, values.iter().copied()).unwrap();
        let nodes = head.walk(arena).nodes;
        let before = previous_links(arena, &nodes);

        let reversed = head.reverse(arena);
        let mut backwards = values.clone();
        backwards.reverse();
        let payloads: Vec<i32> = reversed.walk(arena).nodes.iter().map(|n| *n.payload(arena)).collect();
        prop_assert_eq!(payloads, backwards);

        let restored = reversed.reverse(arena);
        prop_assert_eq!(restored, head);
        prop_assert_eq!(restored.walk(arena).nodes, nodes.clone());
        prop_assert_eq!(previous_links(arena, &nodes), before);
    }

    #[test]
    fn insert_then_delete_round_trips(
        values in prop::collection::vec(any::<i32>(), 0..20),
        position in any::<prop::sample::Index>(),
        value in any::<i32>(),
    ) {
        let arena = &mut NodeArena::default();
        let mut list = DoublyLinkedList::from_values(arena, values.iter().copied());
        let nodes: Vec<_> = list.nodes(arena).collect();
        let index = position.index(values.len() + 1) + 1;

        list.insert_at(arena, index, value).unwrap();
        prop_assert_eq!(list.len(), values.len() + 1);
        let removed = list.delete_at(arena, index).unwrap();
        prop_assert_eq!(arena.remove(removed.node()), Some(value));

        prop_assert_eq!(list.nodes(arena).collect::<Vec<_>>(), nodes.clone());
        prop_assert_eq!(list.tail(), nodes.last().copied());
        let mut prev = None;
        for node in list.nodes(arena) {
            prop_assert_eq!(node.previous(arena), prev);
            prev = Some(node);
        }
        prop_assert_eq!(arena.len(), values.len());
    }

    #[test]
    fn adoption_counts_distinct_nodes(len in 1usize..30, target in any::<prop::sample::Index>(), cyclic in any::<bool>()) {
        let arena = &mut NodeArena::default();
        let head = SingleNode::from_sequence(arena, 0..len).unwrap();
        let nodes = head.walk(arena).nodes;
        let last = nodes[len - 1];
        if cyclic {
            last.set_next(arena, Some(nodes[target.index(len)]));
        }

        let list = LinkedList::adopt(arena, Some(head));
        prop_assert_eq!(list.len(), len);
        prop_assert_eq!(list.tail(), Some(last));
        prop_assert_eq!(list.iter(arena).copied().collect::<Vec<_>>(), (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn bst_keeps_search_order(values in prop::collection::vec(-50i32..50, 0..40)) {
        let arena = &mut NodeArena::default();
        let tree = BinaryTree::from_values(arena, values.iter().copied()).unwrap();

        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(tree.inorder(arena).copied().collect::<Vec<_>>(), sorted);
        prop_assert_eq!(tree.len(), values.len());

        if let Some(root) = tree.root() {
            prop_assert_eq!(root.parent(arena), None);
            prop_assert_eq!(check_subtree(arena, root).len(), values.len());
        }
    }
}
