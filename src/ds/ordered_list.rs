//! Ordered doubly linked list backed by `SlotArena`.
//!
//! Stores list nodes in a `SlotArena` and links them by `SlotId`, giving
//! stable handles and O(1) insert/remove/move anywhere in the list without
//! raw pointers. Both cache policies use this type as their ordering
//! substrate; it carries no cache-specific logic.
//!
//! ## Architecture
//!
//! ```text
//!   OrderedList { id: ListId(7), arena, head, tail }
//!
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!
//!   NodeRef { list: ListId(7), slot: id_2 }   ← handle returned to callers
//! ```
//!
//! The `None` ends of `head`/`tail` and of each node's links play the role
//! of a sentinel: an empty list is exactly `head == tail == None`.
//!
//! ## Ownership checks
//!
//! Every list gets a process-unique [`ListId`] and every [`NodeRef`] records
//! the list that issued it. A handle is *foreign* when it names another list
//! or a node that has since been removed (the arena generation no longer
//! matches). Operations given a foreign handle are no-ops: they return
//! `None` or `false` and leave the list untouched.
//!
//! ## Performance
//! - `push_front` / `push_back` / `insert_before` / `insert_after`: O(1)
//! - `remove` / `pop_front` / `pop_back`: O(1)
//! - `move_to_front` / `move_to_back` / `move_before` / `move_after`: O(1),
//!   relinking only, no allocation
//! - `iter`: O(n)
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`OrderedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(u64);

impl ListId {
    fn next() -> Self {
        ListId(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a node linked into a specific [`OrderedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    list: ListId,
    slot: SlotId,
}

impl NodeRef {
    /// Returns the id of the list that issued this handle.
    pub fn list_id(self) -> ListId {
        self.list
    }

    /// Returns the underlying arena slot.
    pub fn slot(self) -> SlotId {
        self.slot
    }
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list whose nodes live in a `SlotArena` and are addressed by
/// [`NodeRef`] handles.
#[derive(Debug)]
pub struct OrderedList<T> {
    id: ListId,
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> OrderedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            id: ListId::next(),
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: ListId::next(),
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns this list's identity.
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `node` is currently linked into this list.
    pub fn contains(&self, node: NodeRef) -> bool {
        self.owned_slot(node).is_some()
    }

    /// Returns the first node, or `None` if the list is empty.
    pub fn front(&self) -> Option<NodeRef> {
        self.head.map(|slot| self.node_ref(slot))
    }

    /// Returns the last node, or `None` if the list is empty.
    pub fn back(&self) -> Option<NodeRef> {
        self.tail.map(|slot| self.node_ref(slot))
    }

    /// Returns the value of the first node.
    pub fn front_value(&self) -> Option<&T> {
        self.head
            .and_then(|slot| self.arena.get(slot).map(|node| &node.value))
    }

    /// Returns the value of the last node.
    pub fn back_value(&self) -> Option<&T> {
        self.tail
            .and_then(|slot| self.arena.get(slot).map(|node| &node.value))
    }

    /// Returns the node after `node`, or `None` at the end of the list or if
    /// `node` is foreign.
    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        let slot = self.owned_slot(node)?;
        let next = self.arena.get(slot)?.next?;
        Some(self.node_ref(next))
    }

    /// Returns the node before `node`, or `None` at the start of the list or
    /// if `node` is foreign.
    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        let slot = self.owned_slot(node)?;
        let prev = self.arena.get(slot)?.prev?;
        Some(self.node_ref(prev))
    }

    /// Returns the value for `node`, if it belongs to this list.
    pub fn get(&self, node: NodeRef) -> Option<&T> {
        let slot = self.owned_slot(node)?;
        self.arena.get(slot).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value for `node`, if it belongs to
    /// this list.
    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        let slot = self.owned_slot(node)?;
        self.arena.get_mut(slot).map(|node| &mut node.value)
    }

    /// Returns an iterator over values from front to back.
    pub fn iter(&self) -> OrderedListIter<'_, T> {
        OrderedListIter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator over node handles from front to back.
    pub fn iter_refs(&self) -> OrderedListRefIter<'_, T> {
        OrderedListRefIter {
            list: self,
            current: self.head,
        }
    }

    /// Inserts a new node at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeRef {
        let slot = self.alloc(value);
        self.link_between(slot, None, self.head);
        self.node_ref(slot)
    }

    /// Inserts a new node at the back and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeRef {
        let slot = self.alloc(value);
        self.link_between(slot, self.tail, None);
        self.node_ref(slot)
    }

    /// Inserts `value` immediately before `mark`.
    ///
    /// Returns `None` and drops `value` if `mark` is foreign.
    pub fn insert_before(&mut self, value: T, mark: NodeRef) -> Option<NodeRef> {
        let mark = self.owned_slot(mark)?;
        let prev = self.arena.get(mark)?.prev;
        let slot = self.alloc(value);
        self.link_between(slot, prev, Some(mark));
        Some(self.node_ref(slot))
    }

    /// Inserts `value` immediately after `mark`.
    ///
    /// Returns `None` and drops `value` if `mark` is foreign.
    pub fn insert_after(&mut self, value: T, mark: NodeRef) -> Option<NodeRef> {
        let mark = self.owned_slot(mark)?;
        let next = self.arena.get(mark)?.next;
        let slot = self.alloc(value);
        self.link_between(slot, Some(mark), next);
        Some(self.node_ref(slot))
    }

    /// Unlinks `node` and returns its value; `None` if `node` is foreign.
    pub fn remove(&mut self, node: NodeRef) -> Option<T> {
        let slot = self.owned_slot(node)?;
        self.release(slot)
    }

    /// Removes and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let slot = self.head?;
        self.release(slot)
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let slot = self.tail?;
        self.release(slot)
    }

    /// Moves `node` to the front; returns `false` if `node` is foreign.
    pub fn move_to_front(&mut self, node: NodeRef) -> bool {
        let Some(slot) = self.owned_slot(node) else {
            return false;
        };
        if Some(slot) == self.head {
            return true;
        }
        self.detach(slot);
        self.link_between(slot, None, self.head);
        true
    }

    /// Moves `node` to the back; returns `false` if `node` is foreign.
    pub fn move_to_back(&mut self, node: NodeRef) -> bool {
        let Some(slot) = self.owned_slot(node) else {
            return false;
        };
        if Some(slot) == self.tail {
            return true;
        }
        self.detach(slot);
        self.link_between(slot, self.tail, None);
        true
    }

    /// Moves `node` immediately before `mark`.
    ///
    /// Returns `false` if either handle is foreign or `node == mark`.
    pub fn move_before(&mut self, node: NodeRef, mark: NodeRef) -> bool {
        let (Some(slot), Some(mark)) = (self.owned_slot(node), self.owned_slot(mark)) else {
            return false;
        };
        if slot == mark {
            return false;
        }
        if self.arena.get(slot).and_then(|n| n.next) == Some(mark) {
            return true;
        }
        self.detach(slot);
        let prev = self.arena.get(mark).and_then(|n| n.prev);
        self.link_between(slot, prev, Some(mark));
        true
    }

    /// Moves `node` immediately after `mark`.
    ///
    /// Returns `false` if either handle is foreign or `node == mark`.
    pub fn move_after(&mut self, node: NodeRef, mark: NodeRef) -> bool {
        let (Some(slot), Some(mark)) = (self.owned_slot(node), self.owned_slot(mark)) else {
            return false;
        };
        if slot == mark {
            return false;
        }
        if self.arena.get(slot).and_then(|n| n.prev) == Some(mark) {
            return true;
        }
        self.detach(slot);
        let next = self.arena.get(mark).and_then(|n| n.next);
        self.link_between(slot, Some(mark), next);
        true
    }

    /// Clears the list and frees all nodes. Handles issued before the clear
    /// become foreign.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walks the list and verifies link symmetry, ownership and length.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() {
                return Err(InvariantError::new(format!(
                    "list {:?}: head {:?} and tail {:?} disagree on emptiness",
                    self.id, self.head, self.tail
                )));
            }
            if !self.arena.is_empty() {
                return Err(InvariantError::new(format!(
                    "list {:?}: no head but {} nodes allocated",
                    self.id,
                    self.arena.len()
                )));
            }
            return Ok(());
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.arena.get(slot).ok_or_else(|| {
                InvariantError::new(format!("list {:?}: dangling link to {:?}", self.id, slot))
            })?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "list {:?}: node {:?} has prev {:?}, expected {:?}",
                    self.id, slot, node.prev, prev
                )));
            }
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new(format!(
                    "list {:?}: cycle detected after {} nodes",
                    self.id, count
                )));
            }
            prev = Some(slot);
            current = node.next;
        }

        if self.tail != prev {
            return Err(InvariantError::new(format!(
                "list {:?}: tail {:?} is not the last node {:?}",
                self.id, self.tail, prev
            )));
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "list {:?}: walked {} nodes but {} are allocated",
                self.id,
                count,
                self.arena.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{}", err);
        }
    }

    fn node_ref(&self, slot: SlotId) -> NodeRef {
        NodeRef {
            list: self.id,
            slot,
        }
    }

    fn owned_slot(&self, node: NodeRef) -> Option<SlotId> {
        (node.list == self.id && self.arena.contains(node.slot)).then_some(node.slot)
    }

    fn alloc(&mut self, value: T) -> SlotId {
        self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        })
    }

    fn release(&mut self, slot: SlotId) -> Option<T> {
        self.detach(slot)?;
        self.arena.remove(slot).map(|node| node.value)
    }

    fn detach(&mut self, slot: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(slot)?;
            (node.prev, node.next)
        };

        if let Some(prev_slot) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_slot) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_slot) = next {
            if let Some(next_node) = self.arena.get_mut(next_slot) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(slot) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    /// Links a detached `slot` between `prev` and `next`, which must be
    /// adjacent (or the list ends).
    fn link_between(&mut self, slot: SlotId, prev: Option<SlotId>, next: Option<SlotId>) {
        if let Some(node) = self.arena.get_mut(slot) {
            node.prev = prev;
            node.next = next;
        } else {
            return;
        }

        match prev {
            Some(prev_slot) => {
                if let Some(prev_node) = self.arena.get_mut(prev_slot) {
                    prev_node.next = Some(slot);
                }
            },
            None => self.head = Some(slot),
        }

        match next {
            Some(next_slot) => {
                if let Some(next_node) = self.arena.get_mut(next_slot) {
                    next_node.prev = Some(slot);
                }
            },
            None => self.tail = Some(slot),
        }
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from front to back.
pub struct OrderedListIter<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for OrderedListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let node = self.list.arena.get(slot)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over node handles from front to back.
pub struct OrderedListRefIter<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for OrderedListRefIter<'a, T> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let node = self.list.arena.get(slot)?;
        self.current = node.next;
        Some(self.list.node_ref(slot))
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = OrderedListIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod property_tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        PushFront(u16),
        PushBack(u16),
        InsertBefore(u16, usize),
        InsertAfter(u16, usize),
        Remove(usize),
        MoveToFront(usize),
        MoveToBack(usize),
        MoveBefore(usize, usize),
        MoveAfter(usize, usize),
        PopFront,
        PopBack,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u16>().prop_map(Op::PushFront),
            any::<u16>().prop_map(Op::PushBack),
            (any::<u16>(), any::<usize>()).prop_map(|(v, i)| Op::InsertBefore(v, i)),
            (any::<u16>(), any::<usize>()).prop_map(|(v, i)| Op::InsertAfter(v, i)),
            any::<usize>().prop_map(Op::Remove),
            any::<usize>().prop_map(Op::MoveToFront),
            any::<usize>().prop_map(Op::MoveToBack),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::MoveBefore(a, b)),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::MoveAfter(a, b)),
            Just(Op::PopFront),
            Just(Op::PopBack),
        ]
    }

    /// Mirrors the list in a `VecDeque` of `(handle, value)` pairs.
    fn position(model: &VecDeque<(NodeRef, u16)>, node: NodeRef) -> Option<usize> {
        model.iter().position(|(r, _)| *r == node)
    }

    proptest! {
        /// Property: the list matches a VecDeque model after every operation
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut list = OrderedList::new();
            let mut model: VecDeque<(NodeRef, u16)> = VecDeque::new();
            // every handle ever issued, including removed ones
            let mut issued: Vec<NodeRef> = Vec::new();

            for op in ops {
                let pick = |i: usize, issued: &Vec<NodeRef>| {
                    if issued.is_empty() { None } else { Some(issued[i % issued.len()]) }
                };
                match op {
                    Op::PushFront(v) => {
                        let r = list.push_front(v);
                        model.push_front((r, v));
                        issued.push(r);
                    },
                    Op::PushBack(v) => {
                        let r = list.push_back(v);
                        model.push_back((r, v));
                        issued.push(r);
                    },
                    Op::InsertBefore(v, i) => {
                        if let Some(mark) = pick(i, &issued) {
                            let got = list.insert_before(v, mark);
                            match position(&model, mark) {
                                Some(pos) => {
                                    let r = got.expect("live mark accepted");
                                    model.insert(pos, (r, v));
                                    issued.push(r);
                                },
                                None => prop_assert!(got.is_none()),
                            }
                        }
                    },
                    Op::InsertAfter(v, i) => {
                        if let Some(mark) = pick(i, &issued) {
                            let got = list.insert_after(v, mark);
                            match position(&model, mark) {
                                Some(pos) => {
                                    let r = got.expect("live mark accepted");
                                    model.insert(pos + 1, (r, v));
                                    issued.push(r);
                                },
                                None => prop_assert!(got.is_none()),
                            }
                        }
                    },
                    Op::Remove(i) => {
                        if let Some(node) = pick(i, &issued) {
                            let got = list.remove(node);
                            match position(&model, node) {
                                Some(pos) => {
                                    let (_, v) = model.remove(pos).unwrap();
                                    prop_assert_eq!(got, Some(v));
                                },
                                None => prop_assert_eq!(got, None),
                            }
                        }
                    },
                    Op::MoveToFront(i) => {
                        if let Some(node) = pick(i, &issued) {
                            let moved = list.move_to_front(node);
                            match position(&model, node) {
                                Some(pos) => {
                                    prop_assert!(moved);
                                    let entry = model.remove(pos).unwrap();
                                    model.push_front(entry);
                                },
                                None => prop_assert!(!moved),
                            }
                        }
                    },
                    Op::MoveToBack(i) => {
                        if let Some(node) = pick(i, &issued) {
                            let moved = list.move_to_back(node);
                            match position(&model, node) {
                                Some(pos) => {
                                    prop_assert!(moved);
                                    let entry = model.remove(pos).unwrap();
                                    model.push_back(entry);
                                },
                                None => prop_assert!(!moved),
                            }
                        }
                    },
                    Op::MoveBefore(a, b) => {
                        if let (Some(node), Some(mark)) = (pick(a, &issued), pick(b, &issued)) {
                            let moved = list.move_before(node, mark);
                            match (position(&model, node), position(&model, mark)) {
                                (Some(pos), Some(_)) if node != mark => {
                                    prop_assert!(moved);
                                    let entry = model.remove(pos).unwrap();
                                    let mark_pos = position(&model, mark).unwrap();
                                    model.insert(mark_pos, entry);
                                },
                                _ => prop_assert!(!moved),
                            }
                        }
                    },
                    Op::MoveAfter(a, b) => {
                        if let (Some(node), Some(mark)) = (pick(a, &issued), pick(b, &issued)) {
                            let moved = list.move_after(node, mark);
                            match (position(&model, node), position(&model, mark)) {
                                (Some(pos), Some(_)) if node != mark => {
                                    prop_assert!(moved);
                                    let entry = model.remove(pos).unwrap();
                                    let mark_pos = position(&model, mark).unwrap();
                                    model.insert(mark_pos + 1, entry);
                                },
                                _ => prop_assert!(!moved),
                            }
                        }
                    },
                    Op::PopFront => {
                        prop_assert_eq!(list.pop_front(), model.pop_front().map(|(_, v)| v));
                    },
                    Op::PopBack => {
                        prop_assert_eq!(list.pop_back(), model.pop_back().map(|(_, v)| v));
                    },
                }

                prop_assert!(list.check_invariants().is_ok());
                prop_assert_eq!(list.len(), model.len());
                let refs: Vec<_> = list.iter_refs().collect();
                let expected: Vec<_> = model.iter().map(|(r, _)| *r).collect();
                prop_assert_eq!(refs, expected);
                let vals: Vec<_> = list.iter().copied().collect();
                let expected_vals: Vec<_> = model.iter().map(|(_, v)| *v).collect();
                prop_assert_eq!(vals, expected_vals);
            }
        }

        /// Property: walking next() from front() visits exactly len() nodes
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_forward_walk_visits_len_nodes(
            values in prop::collection::vec(any::<u8>(), 0..64),
            front in prop::collection::vec(any::<bool>(), 0..64)
        ) {
            let mut list = OrderedList::new();
            for (i, v) in values.iter().enumerate() {
                if front.get(i).copied().unwrap_or(false) {
                    list.push_front(*v);
                } else {
                    list.push_back(*v);
                }
            }

            let mut steps = 0usize;
            let mut cursor = list.front();
            while let Some(node) = cursor {
                steps += 1;
                prop_assert!(steps <= list.len());
                cursor = list.next(node);
            }
            prop_assert_eq!(steps, list.len());

            let mut back_steps = 0usize;
            let mut cursor = list.back();
            while let Some(node) = cursor {
                back_steps += 1;
                cursor = list.prev(node);
            }
            prop_assert_eq!(back_steps, list.len());
        }
    }
}
