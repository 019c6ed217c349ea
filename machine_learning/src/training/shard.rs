use std::ops::Range;

/// The fixed amount of workers an epoch is fanned out to.
pub const SHARDS: usize = 4;

/// Splits `len` samples into `SHARDS` contiguous ranges.
///
/// Properties:
/// - Ranges are contiguous, disjoint and cover `[0..len)` in order.
/// - Every range but the last has `len / SHARDS` samples, the last one absorbs the remainder.
pub fn shard_ranges(len: usize) -> [Range<usize>; SHARDS] {
    let batch = len / SHARDS;

    std::array::from_fn(|i| {
        let start = i * batch;
        let end = if i == SHARDS - 1 { len } else { start + batch };
        start..end
    })
}
