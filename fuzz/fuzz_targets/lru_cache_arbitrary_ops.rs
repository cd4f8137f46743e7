#![no_main]

use evictkit::policy::lru::LruCore;
use evictkit::traits::{CoreCache, LruCacheTrait, MutableCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LruCore
//
// First byte picks the capacity; the rest is (op, key) pairs.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 16) + 1;
    let mut cache: LruCore<u8, u32> = match LruCore::try_new(capacity) {
        Ok(cache) => cache,
        Err(_) => return,
    };

    for (step, pair) in ops.chunks_exact(2).enumerate() {
        let key = pair[1] % 32;
        match pair[0] % 7 {
            0 => {
                cache.insert(key, step as u32);
                assert_eq!(cache.recency_rank(&key), Some(0));
            },
            1 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.keys().first(), Some(&key));
                }
            },
            2 => {
                let before = cache.keys();
                let _ = cache.peek(&key);
                assert_eq!(cache.keys(), before);
            },
            3 => {
                let had = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), had);
                assert!(!cache.contains(&key));
            },
            4 => {
                let expected = cache.keys().last().copied();
                assert_eq!(cache.pop_lru().map(|(k, _)| k), expected);
            },
            5 => {
                if cache.touch(&key) {
                    assert_eq!(cache.recency_rank(&key), Some(0));
                }
            },
            _ => {
                if pair[1] == 0xff {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            },
        }

        assert!(cache.len() <= cache.capacity());
        assert!(cache.check_invariants().is_ok());
    }
});
