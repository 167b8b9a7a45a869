//! Task-tree construction and ordering.
//!
//! Turns a flat, pre-filtered slice of task records into an ordered forest
//! for display, plus the inverse pre-order flattening and a depth helper for
//! per-row indentation. Every walk here is iterative (explicit work stacks)
//! and bounded, so deep chains cannot overflow the call stack and malformed
//! parent data (dangling references, cycles) degrades into reported anomalies
//! instead of errors — see [`TreeAnomaly`].

use crate::error::{Result, TaskTreeError};
use crate::types::{TaskForest, TaskNode, TaskRecord, TreeAnomaly};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build an ordered forest from flat task records.
///
/// Each record becomes exactly one node. Records with `parent_id: None` are
/// roots; a `parent_id` that resolves within the input attaches the record to
/// that parent. Sibling groups (roots included) are ordered by code-point
/// comparison on `sort_key`, with ties keeping input order.
///
/// Relational malformation is repaired, not fatal:
/// - a dangling `parent_id` promotes the record to a root
///   ([`TreeAnomaly::DanglingParent`]);
/// - a parent cycle is broken at its earliest-input member, which becomes a
///   root ([`TreeAnomaly::ParentCycle`]).
///
/// The only error is a duplicate id, which would otherwise silently drop a
/// record.
pub fn build_task_tree(records: Vec<TaskRecord>) -> Result<TaskForest> {
    let count = records.len();

    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(count);
    for (pos, record) in records.iter().enumerate() {
        if by_id.insert(record.id.as_str(), pos).is_some() {
            return Err(TaskTreeError::DuplicateTaskId(record.id.clone()));
        }
    }

    // Link children by position. parent_pos mirrors the (possibly repaired)
    // parent edge of every record.
    let mut parent_pos: Vec<Option<usize>> = Vec::with_capacity(count);
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots: Vec<usize> = Vec::new();
    let mut anomalies: Vec<TreeAnomaly> = Vec::new();

    for (pos, record) in records.iter().enumerate() {
        match record.parent_id.as_deref() {
            None => {
                parent_pos.push(None);
                roots.push(pos);
            }
            Some(pid) => match by_id.get(pid).copied() {
                Some(parent) => {
                    parent_pos.push(Some(parent));
                    children[parent].push(pos);
                }
                None => {
                    parent_pos.push(None);
                    roots.push(pos);
                    anomalies.push(TreeAnomaly::DanglingParent {
                        task_id: record.id.clone(),
                        missing_parent_id: pid.to_string(),
                    });
                }
            },
        }
    }

    // Anything a root cannot reach sits on (or hangs off) a parent cycle.
    let mut reachable = vec![false; count];
    let mut stack: Vec<usize> = roots.clone();
    while let Some(pos) = stack.pop() {
        if reachable[pos] {
            continue;
        }
        reachable[pos] = true;
        stack.extend(children[pos].iter().copied());
    }

    for start in 0..count {
        if reachable[start] {
            continue;
        }

        // Walk the parent chain until it revisits itself; that segment is the
        // cycle's ring. Ancestors of an unreachable node are all unreachable,
        // so the walk never escapes into the already-built forest.
        let mut path: Vec<usize> = Vec::new();
        let mut seen: HashMap<usize, usize> = HashMap::new();
        let mut cursor = start;
        let ring_start = loop {
            if let Some(&at) = seen.get(&cursor) {
                break at;
            }
            seen.insert(cursor, path.len());
            path.push(cursor);
            match parent_pos[cursor] {
                Some(next) => cursor = next,
                // Unreachable nodes always carry a linked parent; tolerate a
                // missing one by closing the ring at the current node.
                None => break path.len() - 1,
            }
        };
        let ring = &path[ring_start..];

        // Break the cycle at its earliest-input member and promote it.
        let promoted = ring.iter().copied().min().unwrap_or(start);
        if let Some(parent) = parent_pos[promoted] {
            children[parent].retain(|&child| child != promoted);
        }
        parent_pos[promoted] = None;
        roots.push(promoted);

        let offset = ring.iter().position(|&pos| pos == promoted).unwrap_or(0);
        let ring_ids = (0..ring.len())
            .map(|step| records[ring[(offset + step) % ring.len()]].id.clone())
            .collect();
        anomalies.push(TreeAnomaly::ParentCycle { ring: ring_ids });

        stack.push(promoted);
        while let Some(pos) = stack.pop() {
            if reachable[pos] {
                continue;
            }
            reachable[pos] = true;
            stack.extend(children[pos].iter().copied());
        }
    }

    // Order every sibling group by sort key, input position as tiebreak.
    roots.sort_by(|&a, &b| {
        records[a]
            .sort_key
            .cmp(&records[b].sort_key)
            .then(a.cmp(&b))
    });
    for group in children.iter_mut() {
        group.sort_by(|&a, &b| {
            records[a]
                .sort_key
                .cmp(&records[b].sort_key)
                .then(a.cmp(&b))
        });
    }

    // Materialize owned nodes bottom-up: reverse pre-order guarantees every
    // child slot is complete before its parent collects it.
    let mut order: Vec<usize> = Vec::with_capacity(count);
    let mut walk: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(pos) = walk.pop() {
        order.push(pos);
        walk.extend(children[pos].iter().rev().copied());
    }

    let mut slots: Vec<Option<TaskNode>> = records
        .into_iter()
        .map(|record| {
            Some(TaskNode {
                record,
                children: Vec::new(),
            })
        })
        .collect();

    for &pos in order.iter().rev() {
        if children[pos].is_empty() {
            continue;
        }
        let mut kids = Vec::with_capacity(children[pos].len());
        for &child in &children[pos] {
            if let Some(node) = slots[child].take() {
                kids.push(node);
            }
        }
        if let Some(node) = slots[pos].as_mut() {
            node.children = kids;
        }
    }

    let roots = roots
        .iter()
        .filter_map(|&pos| slots[pos].take())
        .collect();

    Ok(TaskForest { roots, anomalies })
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Pre-order traversal of a forest: each node before its children, siblings
/// left to right. This is the display order implied by sibling sorting.
pub fn flatten_task_tree(roots: &[TaskNode]) -> Vec<&TaskNode> {
    let mut flat = Vec::new();
    let mut stack: Vec<&TaskNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        flat.push(node);
        stack.extend(node.children.iter().rev());
    }
    flat
}

// ---------------------------------------------------------------------------
// Depth
// ---------------------------------------------------------------------------

/// Index records by id for [`task_depth`] lookups. On duplicate ids the last
/// record wins; [`build_task_tree`] is the place that rejects duplicates.
pub fn task_index(records: &[TaskRecord]) -> HashMap<&str, &TaskRecord> {
    records
        .iter()
        .map(|record| (record.id.as_str(), record))
        .collect()
}

/// Zero-based depth of a task: ancestor hops until a record whose parent is
/// `None` or absent from the index. The walk tracks visited ids, so a cyclic
/// chain stops at the first revisit and returns the hops counted to there.
pub fn task_depth(task: &TaskRecord, index: &HashMap<&str, &TaskRecord>) -> usize {
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(task.id.as_str());

    let mut depth = 0;
    let mut cursor = task.parent_id.as_deref();
    while let Some(pid) = cursor {
        if !visited.insert(pid) {
            break;
        }
        match index.get(pid) {
            Some(parent) => {
                depth += 1;
                cursor = parent.parent_id.as_deref();
            }
            None => break,
        }
    }
    depth
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
