pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{ListId, NodeRef, OrderedList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{LfuMetricsSnapshot, LruMetricsSnapshot};
pub use crate::policy::lfu::{LfuCache, LfuCore};
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::traits::{
    ConcurrentCache, CoreCache, LfuCacheTrait, LruCacheTrait, MutableCache,
};
