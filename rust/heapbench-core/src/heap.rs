//! In-place heap sort over a max-heap.
//!
//! The heap lives in a prefix of the slice. Node `i` has children `2i + 1`
//! and `2i + 2`:
//!
//! ```text
//!           0
//!     1            2
//!  3     4      5     6
//! ```
//!
//! Sorting repeatedly swaps the root (the maximum) behind a shrinking heap
//! boundary, so the sorted suffix grows from the back of the slice.

/// Restore the max-heap property for the subtree rooted at `root`.
///
/// Only indices below `heap_size` take part; anything past it is the sorted
/// suffix and is left untouched. Both child subtrees of `root` must already
/// be max-heaps. A child replaces its parent only when strictly greater, so
/// the root wins ties and the left child wins ties against the right.
///
/// Walks down the tree in a loop, so depth is bounded by `log2(heap_size)`
/// iterations rather than stack frames.
pub fn heapify<T: Ord>(array: &mut [T], heap_size: usize, root: usize) {
    let heap_size = heap_size.min(array.len());
    let mut parent = root;

    while parent < heap_size {
        let left = 2 * parent + 1;
        let right = left + 1;
        let mut largest = parent;

        if left < heap_size && array[left] > array[largest] {
            largest = left;
        }
        if right < heap_size && array[right] > array[largest] {
            largest = right;
        }

        if largest == parent {
            return;
        }
        array.swap(parent, largest);
        parent = largest;
    }
}

/// Sort `array` in non-decreasing order in place.
///
/// O(N log N) for every input ordering and O(1) extra space. Not stable.
pub fn heap_sort<T: Ord>(array: &mut [T]) {
    let len = array.len();
    if len < 2 {
        return;
    }

    // Leaves are already heaps; start from the last parent.
    for root in (0..len / 2).rev() {
        heapify(array, len, root);
    }

    for boundary in (1..len).rev() {
        array.swap(0, boundary);
        heapify(array, boundary, 0);
    }
}

/// Sort a slice of comparable values in place.
pub fn sort<T: Ord>(array: &mut [T]) {
    heap_sort(array);
}

/// True if `array[..heap_size]` is a max-heap.
pub fn is_max_heap<T: Ord>(array: &[T], heap_size: usize) -> bool {
    is_max_heap_at(array, heap_size, 0)
}

/// True if the subtree rooted at `root`, restricted to `array[..heap_size]`,
/// is a max-heap.
pub fn is_max_heap_at<T: Ord>(array: &[T], heap_size: usize, root: usize) -> bool {
    let heap_size = heap_size.min(array.len());
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        if node >= heap_size {
            continue;
        }
        for child in [2 * node + 1, 2 * node + 2] {
            if child < heap_size {
                if array[child] > array[node] {
                    return false;
                }
                pending.push(child);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_scenarios() {
        let mut empty: [i32; 0] = [];
        sort(&mut empty);
        assert!(empty.is_empty());

        let mut single = [5];
        sort(&mut single);
        assert_eq!(single, [5]);

        let mut three = [3, 1, 2];
        sort(&mut three);
        assert_eq!(three, [1, 2, 3]);

        let mut reversed = [5, 4, 3, 2, 1];
        sort(&mut reversed);
        assert_eq!(reversed, [1, 2, 3, 4, 5]);

        let mut dupes = [2, 2, 1, 1];
        sort(&mut dupes);
        assert_eq!(dupes, [1, 1, 2, 2]);
    }

    #[test]
    fn two_elements() {
        let mut arr = [8, 3];
        heap_sort(&mut arr);
        assert_eq!(arr, [3, 8]);
    }

    #[test]
    fn all_same_elements() {
        let mut arr = [3, 3, 3, 3, 3, 3];
        heap_sort(&mut arr);
        assert_eq!(arr, [3, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn strings() {
        let mut arr = ["dog", "cat", "elephant", "ant", "bear"];
        heap_sort(&mut arr);
        assert_eq!(arr, ["ant", "bear", "cat", "dog", "elephant"]);
    }

    #[test]
    fn heapify_sifts_root_down_to_leaf() {
        // Both subtrees of 0 are heaps; the root is the minimum.
        let mut arr = [1, 9, 8, 7, 6, 5, 4];
        heapify(&mut arr, 7, 0);
        assert_eq!(arr, [9, 7, 8, 1, 6, 5, 4]);
        assert!(is_max_heap(&arr, 7));
    }

    #[test]
    fn heapify_root_wins_ties() {
        let mut arr = [4, 4, 4];
        heapify(&mut arr, 3, 0);
        assert_eq!(arr, [4, 4, 4]);
    }

    #[test]
    fn heapify_left_wins_ties_over_right() {
        let mut keys = [Keyed(0, 'r'), Keyed(5, 'a'), Keyed(5, 'b')];
        heapify(&mut keys, 3, 0);
        let tags: Vec<char> = keys.iter().map(|k| k.1).collect();
        assert_eq!(tags, ['a', 'r', 'b']);
    }

    #[test]
    fn heapify_ignores_elements_past_boundary() {
        let mut arr = [1, 2, 100];
        heapify(&mut arr, 2, 0);
        assert_eq!(arr, [2, 1, 100]);
    }

    #[test]
    fn heapify_clamps_oversized_boundary() {
        let mut arr = [1, 3, 2];
        heapify(&mut arr, 10, 0);
        assert_eq!(arr, [3, 1, 2]);
    }

    #[test]
    fn heapify_root_outside_heap_is_noop() {
        let mut arr = [1, 2, 3];
        heapify(&mut arr, 2, 2);
        assert_eq!(arr, [1, 2, 3]);
    }

    #[test]
    fn is_max_heap_detects_violation_deep_in_tree() {
        assert!(is_max_heap(&[9, 7, 8, 1, 6, 5, 4], 7));
        assert!(!is_max_heap(&[9, 7, 8, 1, 6, 5, 10], 7));
        // The violating element is past the boundary.
        assert!(is_max_heap(&[9, 7, 8, 1, 6, 5, 10], 6));
        assert!(is_max_heap_at(&[0, 7, 8, 1, 6, 5, 4], 7, 1));
    }

    /// Orders on the first field only, so ties are visible through the tag.
    #[derive(Debug, Clone, Copy)]
    struct Keyed(i32, char);

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Keyed {}
    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Keyed {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }
}
