//! Work distribution for the parallel stage.

/// Deal `items` round-robin into at most `partitions` slices.
///
/// Object listings come back in lexical key order, so round-robin
/// dealing spreads hot directories across partitions instead of
/// clumping them. Never returns empty partitions; asking for more
/// partitions than items yields one partition per item.
pub fn repartition<T>(items: Vec<T>, partitions: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    let count = partitions.max(1).min(items.len());
    let mut slots: Vec<Vec<T>> = (0..count).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        slots[index % count].push(item);
    }
    slots
}

/// Worker count when the configuration leaves it unset.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
