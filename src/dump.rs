//! Ordered textual serialization of node records to standard output.
//!
//! Ranks print in rank order using a token relay: rank `r` blocks on a
//! one-byte message from rank `r - 1` before writing anything, then sends a
//! token to rank `r + 1`. This differs from the grounding source's version
//! of the same idea only in not using a fixed sleep as a synchronization
//! crutch — the blocking receive already provides the ordering.

use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::tree::NodeRecord;

pub fn format_node(node: &NodeRecord) -> String {
    let left = node.left_id.map(|v| v as i64).unwrap_or(-1);
    let right = node.right_id.map(|v| v as i64).unwrap_or(-1);

    let mut parts = vec![node.id.to_string(), left.to_string(), right.to_string(), node.radius.to_string()];
    parts.extend(node.center.iter().map(|c| c.to_string()));
    parts.join(" ")
}

/// Prints `nodes` in ascending id order, one rank at a time in rank order.
/// Sorting happens here (rather than relying on callers to have pushed
/// records in id order) since the recursion driver creates records in
/// pre-order traversal order, which is not monotonic in id once a subtree
/// is more than one level deep.
pub fn dump_tree_ordered(comm: &SimpleCommunicator, nodes: &[NodeRecord]) {
    let rank = comm.rank();
    let size = comm.size();

    let mut sorted: Vec<&NodeRecord> = nodes.iter().collect();
    sorted.sort_by_key(|node| node.id);

    if rank > 0 {
        let (_token, _status) = comm.process_at_rank(rank - 1).receive_vec::<u8>();
    }

    let mut out = String::new();
    for node in sorted {
        out.push_str(&format_node(node));
        out.push('\n');
    }
    print!("{}", out);

    if rank < size - 1 {
        comm.process_at_rank(rank + 1).send(&[0u8][..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_leaf_node() {
        let node = NodeRecord { id: 3, center: vec![1.0, 2.0], radius: 0.0, left_id: None, right_id: None };
        assert_eq!(format_node(&node), "3 -1 -1 0 1 2");
    }

    #[test]
    fn formats_internal_node() {
        let node = NodeRecord { id: 0, center: vec![0.5], radius: 1.5, left_id: Some(1), right_id: Some(2) };
        assert_eq!(format_node(&node), "0 1 2 1.5 0.5");
    }

    #[test]
    fn sorts_out_of_order_input_by_id() {
        let nodes = vec![
            NodeRecord { id: 4, center: vec![0.0], radius: 0.0, left_id: None, right_id: None },
            NodeRecord { id: 0, center: vec![0.0], radius: 1.0, left_id: Some(1), right_id: Some(2) },
            NodeRecord { id: 2, center: vec![0.0], radius: 0.0, left_id: None, right_id: None },
        ];
        let mut sorted: Vec<&NodeRecord> = nodes.iter().collect();
        sorted.sort_by_key(|n| n.id);
        let ids: Vec<u64> = sorted.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2, 4]);
    }
}
