//! Finding non-contiguous subsequences of a draft string matching a
//! pattern's operator signature, within a distance limit (§4.D).

/// Matches farther apart than this in the draft are dropped.
pub const DISTANCE_LIMIT: usize = 50;

/// Enumerate every strictly-increasing position tuple `(i_0 < i_1 < ...)`
/// of length `signature.len()` such that `draft.as_bytes()[i_k] ==
/// signature.as_bytes()[k]` for all `k`, subject to `i_last - i_first <=
/// DISTANCE_LIMIT` whenever `draft.len() > DISTANCE_LIMIT`.
///
/// Implemented as a dynamic program over draft indices, bucketed by partial
/// match length: `buckets[n]` holds every partial match of length `n` still
/// alive, represented as `(first_index, positions)`. At each draft position
/// we extend buckets from the longest partial match down to the shortest,
/// so a single draft index is never consumed by two extensions in the same
/// step (extending a length-`n` match to `n+1` before we've looked at
/// length-`n-1` matches at this same position would let the same index
/// feed two different extensions).
pub fn find_positions(draft: &str, signature: &str) -> Vec<Vec<usize>> {
    let draft: Vec<u8> = draft.bytes().collect();
    let pattern: Vec<u8> = signature.bytes().collect();

    if pattern.is_empty() || draft.len() < pattern.len() {
        return Vec::new();
    }

    let prune = draft.len() > DISTANCE_LIMIT;
    let mut buckets: Vec<Vec<(usize, Vec<usize>)>> = vec![Vec::new(); pattern.len()];
    let mut completed: Vec<Vec<usize>> = Vec::new();

    for (i, &byte) in draft.iter().enumerate() {
        // Highest bucket first: extending length n-1 -> n at this i must
        // not let the same draft index also start a fresh length-1 match
        // that then gets extended again within this same iteration.
        for len in (0..pattern.len()).rev() {
            if pattern[len] != byte {
                continue;
            }
            if len == 0 {
                if pattern.len() == 1 {
                    completed.push(vec![i]);
                } else {
                    buckets[0].push((i, vec![i]));
                }
                continue;
            }
            // Drain-and-refill isn't needed: we only ever read bucket[len-1]
            // entries that existed before this iteration's pushes, since
            // len-1 < len was already processed earlier in this same pass
            // only for len-1's own byte match, not appended to here.
            let extended: Vec<(usize, Vec<usize>)> = buckets[len - 1]
                .iter()
                .filter(|(first, _)| !prune || i - first <= DISTANCE_LIMIT)
                .map(|(first, positions)| {
                    let mut next = positions.clone();
                    next.push(i);
                    (*first, next)
                })
                .collect();

            if len == pattern.len() - 1 {
                for (_, positions) in extended {
                    completed.push(positions);
                }
            } else {
                buckets[len].extend(extended);
            }
        }

        if prune {
            for bucket in &mut buckets {
                bucket.retain(|(first, _)| i + 1 - first <= DISTANCE_LIMIT);
            }
        }
    }

    completed
}
