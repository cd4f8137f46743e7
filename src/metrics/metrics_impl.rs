use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    CoreMetricsReadRecorder, CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder,
    LruMetricsReadRecorder, LruMetricsRecorder,
};

#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub peek_lru_calls: MetricsCell,
    pub peek_lru_found: MetricsCell,
    pub recency_rank_calls: MetricsCell,
    pub recency_rank_found: MetricsCell,
    pub recency_rank_scan_steps: MetricsCell,
}

#[derive(Debug, Default)]
pub struct LfuMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,
    pub pop_lfu_calls: u64,
    pub pop_lfu_found: u64,
    pub promotions: u64,
    pub buckets_created: u64,
    pub buckets_dropped: u64,
    pub min_freq_scan_steps: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub peek_lfu_calls: MetricsCell,
    pub peek_lfu_found: MetricsCell,
    pub frequency_calls: MetricsCell,
    pub frequency_found: MetricsCell,
}

macro_rules! impl_core_recorders {
    ($metrics:ty) => {
        impl CoreMetricsRecorder for $metrics {
            fn record_get_hit(&mut self) {
                self.get_calls += 1;
                self.get_hits += 1;
            }

            fn record_get_miss(&mut self) {
                self.get_calls += 1;
                self.get_misses += 1;
            }

            fn record_insert_call(&mut self) {
                self.insert_calls += 1;
            }

            fn record_insert_new(&mut self) {
                self.insert_new += 1;
            }

            fn record_insert_update(&mut self) {
                self.insert_updates += 1;
            }

            fn record_evict_call(&mut self) {
                self.evict_calls += 1;
            }

            fn record_evicted_entry(&mut self) {
                self.evicted_entries += 1;
            }

            fn record_remove_call(&mut self) {
                self.remove_calls += 1;
            }

            fn record_remove_found(&mut self) {
                self.remove_found += 1;
            }

            fn record_clear(&mut self) {
                self.clear_calls += 1;
            }
        }

        impl CoreMetricsReadRecorder for $metrics {
            fn record_peek_call(&self) {
                self.peek_calls.incr();
            }

            fn record_peek_found(&self) {
                self.peek_found.incr();
            }
        }
    };
}

impl_core_recorders!(LruMetrics);
impl_core_recorders!(LfuMetrics);

impl LruMetricsRecorder for LruMetrics {
    fn record_pop_lru_call(&mut self) {
        self.pop_lru_calls += 1;
    }

    fn record_pop_lru_found(&mut self) {
        self.pop_lru_found += 1;
    }

    fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }
}

impl LruMetricsReadRecorder for LruMetrics {
    fn record_peek_lru_call(&self) {
        self.peek_lru_calls.incr();
    }

    fn record_peek_lru_found(&self) {
        self.peek_lru_found.incr();
    }

    fn record_recency_rank_call(&self) {
        self.recency_rank_calls.incr();
    }

    fn record_recency_rank_found(&self) {
        self.recency_rank_found.incr();
    }

    fn record_recency_rank_scan_step(&self) {
        self.recency_rank_scan_steps.incr();
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_pop_lfu_call(&mut self) {
        self.pop_lfu_calls += 1;
    }

    fn record_pop_lfu_found(&mut self) {
        self.pop_lfu_found += 1;
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_bucket_created(&mut self) {
        self.buckets_created += 1;
    }

    fn record_bucket_dropped(&mut self) {
        self.buckets_dropped += 1;
    }

    fn record_min_freq_scan_step(&mut self) {
        self.min_freq_scan_steps += 1;
    }
}

impl LfuMetricsReadRecorder for LfuMetrics {
    fn record_peek_lfu_call(&self) {
        self.peek_lfu_calls.incr();
    }

    fn record_peek_lfu_found(&self) {
        self.peek_lfu_found.incr();
    }

    fn record_frequency_call(&self) {
        self.frequency_calls.incr();
    }

    fn record_frequency_found(&self) {
        self.frequency_found.incr();
    }
}
