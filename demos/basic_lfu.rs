use evictkit::policy::lfu::LfuCache;

fn main() {
    let cache: LfuCache<&str, String> = match LfuCache::try_new(2) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("invalid cache config: {}", err);
            return;
        },
    };

    cache.put("a", "alpha".to_string());
    cache.put("b", "beta".to_string());

    cache.get(&"a");
    cache.put("c", "gamma".to_string());

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!("freq a: {:?}", cache.get_frequency(&"a"));
}

// Expected output:
// contains a? true
// contains b? false
// freq a: Some(2)
//
// Explanation: capacity=2; "a" is accessed before inserting "c", so "b" is evicted.
