#![forbid(unsafe_code)]

//! Applying a finished sort to host data.

/// Move the element at `from` to position `to`, shifting the elements in
/// between by one.
///
/// A negative `to` counts from the end (`-1` is the last position). `to` is
/// clamped into the slice. Returns `false` (and leaves `items` alone) when
/// `from` is out of range.
///
/// ```
/// use reorder::order::array_move;
///
/// let mut items = vec!['a', 'b', 'c', 'd'];
/// assert!(array_move(&mut items, 1, 2));
/// assert_eq!(items, ['a', 'c', 'b', 'd']);
/// assert!(array_move(&mut items, 0, -1));
/// assert_eq!(items, ['c', 'b', 'd', 'a']);
/// ```
pub fn array_move<T>(items: &mut [T], from: usize, to: isize) -> bool {
    let len = items.len();
    if from >= len {
        return false;
    }
    let to = if to < 0 {
        len.saturating_sub(to.unsigned_abs())
    } else {
        to.unsigned_abs().min(len - 1)
    };

    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
    true
}
