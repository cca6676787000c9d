use core::cmp::Ordering;

/// Returns the smallest index `i` such that `sorted[i] > value`.
///
/// For a sorted ascending slice this is the insertion point that keeps the
/// slice sorted while placing `value` before any strictly greater element.
/// Returns `0` when `value` is below the first element and `sorted.len()`
/// when it is at or above the last.
pub fn binary_find_insert_index(sorted: &[f64], value: f64) -> usize {
    let mut lo = 0usize;
    let mut hi = sorted.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if sorted[mid] > value {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Like [`binary_find_insert_index`], but compares against adjusted values
/// `sorted[i] + additional_size * (i + 1)`.
///
/// This tolerates a uniform per-item size that is not baked into `sorted`
/// (for example shared margins a host left out of its end-position hints):
/// each element's effective end grows by one `additional_size` per item
/// preceding and including it, which keeps the adjusted sequence ascending
/// whenever `additional_size >= 0`.
pub fn binary_find_insert_index_with_addition_size(
    sorted: &[f64],
    additional_size: f64,
    value: f64,
) -> usize {
    debug_assert!(
        additional_size >= 0.0,
        "negative additional size ({additional_size})"
    );
    let mut lo = 0usize;
    let mut hi = sorted.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let adjusted = sorted[mid] + additional_size * (mid as f64 + 1.0);
        if adjusted > value {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Binary search with a three-way comparator over `0..len`.
///
/// `classify(i)` reports whether element `i` lies entirely before the target
/// (`Less`), entirely after it (`Greater`), or intersects it (`Equal`). The
/// classification must be monotone: some (possibly empty) prefix of `Less`,
/// then at most one run of `Equal`, then `Greater`.
///
/// Returns the index of an intersecting element, or the insertion point in
/// `[0, len]` when no element intersects the target.
pub fn binary_locate(len: usize, mut classify: impl FnMut(usize) -> Ordering) -> usize {
    let mut lo = 0usize;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match classify(mid) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return mid,
        }
    }
    lo
}
