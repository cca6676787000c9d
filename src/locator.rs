use core::cmp::Ordering;

use crate::host::ScrollHost;
use crate::search::binary_locate;
use crate::AlignDirection;

/// Finds the rendered element at a viewport edge.
///
/// Binary search over the currently rendered elements' committed spans: the
/// result is the local index (relative to the window) of the first element
/// intersecting the viewport's leading (`Start`) or trailing (`End`) edge.
/// Elements may be fully before, fully after, or intersecting the edge, so
/// this is a three-way comparator search, not a scalar lookup.
///
/// Returns an index in `[0, rendered_count]`; `rendered_count` means every
/// element lies before the edge.
pub fn locate<H: ScrollHost>(host: &H, direction: AlignDirection) -> usize {
    let scroll = host.scroll_offset();
    let target = match direction {
        AlignDirection::Start => scroll,
        // The trailing edge is exclusive; probe the last contained pixel.
        AlignDirection::End => (scroll + host.client_size() - 1.0).max(scroll),
    };
    locate_at(host, target)
}

fn locate_at<H: ScrollHost>(host: &H, target: f64) -> usize {
    binary_locate(host.rendered_count(), |local| {
        let start = host.item_start(local);
        let end = start + host.item_size(local);
        if end <= target {
            Ordering::Less
        } else if start > target {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}
