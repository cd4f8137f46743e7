use evictkit::builder::{CacheBuilder, CachePolicy};

fn main() {
    for policy in [CachePolicy::Lru, CachePolicy::Lfu] {
        let cache = match CacheBuilder::new(2).build::<u32, &str>(policy) {
            Ok(cache) => cache,
            Err(err) => {
                eprintln!("invalid cache config: {}", err);
                return;
            },
        };

        cache.put(1, "one");
        cache.put(2, "two");
        cache.get(&1);
        cache.get(&1);
        cache.get(&2);
        cache.put(3, "three");

        println!(
            "{:?}: contains 1? {}, contains 2? {}",
            policy,
            cache.contains(&1),
            cache.contains(&2)
        );
    }

    if let Err(err) = CacheBuilder::new(0).build::<u32, &str>(CachePolicy::Lru) {
        println!("capacity 0: {}", err);
    }
}

// Expected output:
// Lru: contains 1? false, contains 2? true
// Lfu: contains 1? true, contains 2? false
// capacity 0: capacity must be greater than 0
//
// Explanation: key 1 is read twice, then key 2 once. LRU keeps the most recent
// key (2) and evicts 1; LFU keeps the most frequent key (1, freq 3) and evicts 2.
