#![no_main]

use evictkit::policy::lfu::LfuCore;
use evictkit::traits::{CoreCache, LfuCacheTrait, MutableCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LfuCore
//
// Checks bucket membership, min frequency and the capacity bound after
// every step.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 16) + 1;
    let mut cache: LfuCore<u8, u32> = match LfuCore::try_new(capacity) {
        Ok(cache) => cache,
        Err(_) => return,
    };

    for (step, pair) in ops.chunks_exact(2).enumerate() {
        let key = pair[1] % 32;
        match pair[0] % 6 {
            0 => {
                let before = cache.frequency(&key);
                cache.insert(key, step as u32);
                let expected = before.map_or(1, |f| f.saturating_add(1));
                assert_eq!(cache.frequency(&key), Some(expected));
            },
            1 => {
                let before = cache.frequency(&key);
                let hit = cache.get(&key).is_some();
                assert_eq!(hit, before.is_some());
                if let Some(f) = before {
                    assert_eq!(cache.frequency(&key), Some(f.saturating_add(1)));
                }
            },
            2 => {
                let before = cache.frequency(&key);
                let _ = cache.peek(&key);
                assert_eq!(cache.frequency(&key), before);
            },
            3 => {
                let had = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), had);
            },
            4 => {
                let min = cache.min_frequency();
                match cache.pop_lfu() {
                    Some((k, _)) => {
                        assert!(!cache.contains(&k));
                        assert!(min.is_some());
                    },
                    None => assert!(min.is_none()),
                }
            },
            _ => {
                if pair[1] == 0xff {
                    cache.clear();
                    assert_eq!(cache.min_frequency(), None);
                }
            },
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.min_frequency().is_none(), cache.is_empty());
        assert!(cache.check_invariants().is_ok());
    }
});
