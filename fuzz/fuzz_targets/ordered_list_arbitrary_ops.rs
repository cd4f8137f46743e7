#![no_main]

use evictkit::ds::{NodeRef, OrderedList};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on OrderedList
//
// Handles are kept after removal on purpose: stale and foreign handles must
// be rejected without corrupting the list.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut list: OrderedList<u32> = OrderedList::new();
    let mut other: OrderedList<u32> = OrderedList::new();
    let foreign = other.push_front(0);
    let mut all_refs: Vec<NodeRef> = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 12;
        let value = u32::from(data[idx + 1]);
        let pick = |refs: &[NodeRef]| {
            if refs.is_empty() {
                None
            } else {
                Some(refs[(value as usize) % refs.len()])
            }
        };

        match op {
            0 => {
                let node = list.push_front(value);
                all_refs.push(node);
                assert_eq!(list.front(), Some(node));
                assert_eq!(list.front_value(), Some(&value));
            },
            1 => {
                let node = list.push_back(value);
                all_refs.push(node);
                assert_eq!(list.back(), Some(node));
            },
            2 => {
                let old_len = list.len();
                match list.pop_front() {
                    Some(_) => assert_eq!(list.len(), old_len - 1),
                    None => assert!(list.is_empty()),
                }
            },
            3 => {
                let old_len = list.len();
                match list.pop_back() {
                    Some(_) => assert_eq!(list.len(), old_len - 1),
                    None => assert!(list.is_empty()),
                }
            },
            4 => {
                if let Some(node) = pick(&all_refs)
                    && list.move_to_front(node)
                {
                    assert_eq!(list.front(), Some(node));
                }
            },
            5 => {
                if let Some(node) = pick(&all_refs)
                    && list.move_to_back(node)
                {
                    assert_eq!(list.back(), Some(node));
                }
            },
            6 => {
                if let Some(node) = pick(&all_refs) {
                    let old_len = list.len();
                    let live = list.contains(node);
                    let removed = list.remove(node);
                    assert_eq!(removed.is_some(), live);
                    if live {
                        assert_eq!(list.len(), old_len - 1);
                        assert!(!list.contains(node));
                    }
                }
            },
            7 => {
                if let Some(mark) = pick(&all_refs)
                    && let Some(node) = list.insert_before(value, mark)
                {
                    all_refs.push(node);
                    assert_eq!(list.next(node), Some(mark));
                }
            },
            8 => {
                if let Some(mark) = pick(&all_refs)
                    && let Some(node) = list.insert_after(value, mark)
                {
                    all_refs.push(node);
                    assert_eq!(list.prev(node), Some(mark));
                }
            },
            9 => {
                if let (Some(node), Some(mark)) = (pick(&all_refs), all_refs.last().copied())
                    && list.move_before(node, mark)
                    && node != mark
                {
                    assert_eq!(list.next(node), Some(mark));
                }
            },
            10 => {
                let len = list.len();
                assert!(!list.move_to_front(foreign));
                assert!(list.remove(foreign).is_none());
                assert!(list.insert_after(value, foreign).is_none());
                assert_eq!(list.len(), len);
            },
            _ => {
                if value % 16 == 0 {
                    list.clear();
                    assert!(list.is_empty());
                    assert_eq!(list.front(), None);
                    assert_eq!(list.back(), None);
                }
            },
        }

        assert!(list.check_invariants().is_ok());
        assert_eq!(list.iter().count(), list.len());
        idx += 2;
    }

    assert_eq!(other.len(), 1);
});
