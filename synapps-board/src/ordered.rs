//! Ordered-collection operations over columns and task lists.
//!
//! Array order is the source of truth; [`renumber`] is the only place that
//! derives the persisted `position` field from it. Every operation takes its
//! input by reference and returns new lists.

use crate::types::{Column, Task};

/// An entry whose `position` mirrors its index in an ordered list
pub trait Ordered: Clone {
    /// The persisted position
    fn position(&self) -> usize;

    /// Overwrite the persisted position
    fn set_position(&mut self, position: usize);
}

impl Ordered for Column {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Ordered for Task {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Remove the entry at `index`.
///
/// An out-of-bounds index returns the list unchanged and no entry.
pub fn remove_at<T: Clone>(list: &[T], index: usize) -> (Vec<T>, Option<T>) {
    let mut next = list.to_vec();
    if index >= next.len() {
        return (next, None);
    }
    let removed = next.remove(index);
    (next, Some(removed))
}

/// Insert `item` at `index`, clamped to `[0, len]`
pub fn insert_at<T: Clone>(list: &[T], index: usize, item: T) -> Vec<T> {
    let mut next = list.to_vec();
    let index = index.min(next.len());
    next.insert(index, item);
    next
}

/// Reassign every entry's position to its array index
pub fn renumber<T: Ordered>(list: &[T]) -> Vec<T> {
    list.iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut entry = entry.clone();
            entry.set_position(index);
            entry
        })
        .collect()
}

/// Move the entry at `from` to `to` within one list, then renumber.
///
/// Returns `None` when there is no entry at `from`.
pub fn move_within<T: Ordered>(list: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    let (rest, moved) = remove_at(list, from);
    let moved = moved?;
    Some(renumber(&insert_at(&rest, to, moved)))
}

/// Move the entry at `source_index` of `source` into `dest` at `dest_index`.
///
/// `reassign` updates the moved entry's parent reference before insertion.
/// Both resulting lists are renumbered. Returns `None` when there is no entry
/// at `source_index`, in which case nothing was changed.
pub fn transfer<T, F>(
    source: &[T],
    dest: &[T],
    source_index: usize,
    dest_index: usize,
    reassign: F,
) -> Option<(Vec<T>, Vec<T>)>
where
    T: Ordered,
    F: FnOnce(&mut T),
{
    let (rest, moved) = remove_at(source, source_index);
    let mut moved = moved?;
    reassign(&mut moved);
    let dest = insert_at(dest, dest_index, moved);
    Some((renumber(&rest), renumber(&dest)))
}

/// Check that positions are exactly `0..len` in array order
pub fn is_contiguous<T: Ordered>(list: &[T]) -> bool {
    list.iter()
        .enumerate()
        .all(|(index, entry)| entry.position() == index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnId, TaskId};

    fn tasks(ids: &[u64], column: u64) -> Vec<Task> {
        ids.iter()
            .enumerate()
            .map(|(pos, id)| Task::new(*id, format!("task {id}"), column).with_position(pos))
            .collect()
    }

    fn ids(list: &[Task]) -> Vec<u64> {
        list.iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn test_remove_at_out_of_bounds_is_unchanged() {
        let list = tasks(&[1, 2], 1);
        let (next, removed) = remove_at(&list, 2);
        assert!(removed.is_none());
        assert_eq!(next, list);
    }

    #[test]
    fn test_remove_at() {
        let list = tasks(&[1, 2, 3], 1);
        let (next, removed) = remove_at(&list, 1);
        assert_eq!(removed.map(|t| t.id), Some(TaskId(2)));
        assert_eq!(ids(&next), vec![1, 3]);
        // input untouched
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_at_clamps() {
        let list = tasks(&[1, 2], 1);
        let next = insert_at(&list, 99, Task::new(3, "t", 1));
        assert_eq!(ids(&next), vec![1, 2, 3]);
    }

    #[test]
    fn test_renumber_does_not_mutate_input() {
        let list = vec![
            Task::new(1, "a", 1).with_position(5),
            Task::new(2, "b", 1).with_position(5),
        ];
        let next = renumber(&list);
        assert!(is_contiguous(&next));
        assert_eq!(list[0].position, 5);
        assert_eq!(list[1].position, 5);
    }

    #[test]
    fn test_move_within() {
        let list = tasks(&[1, 2, 3], 1);
        let next = move_within(&list, 0, 2).unwrap();
        assert_eq!(ids(&next), vec![2, 3, 1]);
        assert!(is_contiguous(&next));
        assert!(move_within(&list, 3, 0).is_none());
    }

    #[test]
    fn test_transfer_reassigns_and_renumbers() {
        let source = tasks(&[1, 2], 1);
        let dest = tasks(&[3], 2);

        let (source, dest) = transfer(&source, &dest, 0, 1, |t: &mut Task| {
            t.column_id = ColumnId(2)
        })
        .unwrap();

        assert_eq!(ids(&source), vec![2]);
        assert_eq!(ids(&dest), vec![3, 1]);
        assert!(is_contiguous(&source));
        assert!(is_contiguous(&dest));
        assert_eq!(dest[1].column_id, ColumnId(2));
    }

    #[test]
    fn test_transfer_missing_source_is_none() {
        let source = tasks(&[1], 1);
        let dest = tasks(&[], 2);
        assert!(transfer(&source, &dest, 1, 0, |_: &mut Task| {}).is_none());
    }
}
