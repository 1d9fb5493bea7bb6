//! Pending queue of not-yet-dispatched tasks.

use std::collections::HashSet;
use std::hash::Hash;

/// One caller's outstanding request: the key and what completes its handle.
#[derive(Debug)]
pub(crate) struct TaskEntry<K, T> {
    pub(crate) key: K,
    pub(crate) settler: T,
}

/// Insertion-ordered queue holding at most one entry per key.
///
/// Drained wholesale when a batch fires; the drained entries are the batch.
#[derive(Debug)]
pub(crate) struct PendingQueue<K, T> {
    entries: Vec<TaskEntry<K, T>>,
    keys: HashSet<K>,
}

impl<K, T> PendingQueue<K, T>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Appends an entry unless one for the same key is already queued.
    ///
    /// Returns `false` (and drops `settler`) for a duplicate key.
    pub(crate) fn push(&mut self, key: K, settler: T) -> bool {
        if !self.keys.insert(key.clone()) {
            return false;
        }
        self.entries.push(TaskEntry { key, settler });
        true
    }

    /// Takes every queued entry in insertion order, leaving the queue empty.
    pub(crate) fn drain(&mut self) -> Vec<TaskEntry<K, T>> {
        self.keys.clear();
        std::mem::take(&mut self.entries)
    }

}

impl<K, T> PendingQueue<K, T> {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of<K: Clone, T>(entries: &[TaskEntry<K, T>]) -> Vec<K> {
        entries.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Key type without `Hash`, to show the size accessors need no bounds.
    struct Unhashed;

    fn size_of_queue<T>(queue: &PendingQueue<Unhashed, T>) -> (usize, bool) {
        (queue.len(), queue.is_empty())
    }

    #[test]
    fn size_accessors_need_no_key_bounds() {
        let queue: PendingQueue<Unhashed, ()> = PendingQueue {
            entries: vec![TaskEntry {
                key: Unhashed,
                settler: (),
            }],
            keys: HashSet::new(),
        };

        assert_eq!(size_of_queue(&queue), (1, false));
    }

    #[test]
    fn new_queue_is_empty() {
        let queue: PendingQueue<u32, ()> = PendingQueue::new();

        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut queue = PendingQueue::new();
        queue.push(3, "c");
        queue.push(1, "a");
        queue.push(2, "b");

        assert_eq!(keys_of(&queue.drain()), vec![3, 1, 2]);
    }

    #[test]
    fn duplicate_key_is_rejected_and_first_entry_kept() {
        let mut queue = PendingQueue::new();

        assert!(queue.push("k", 1));
        assert!(!queue.push("k", 2));
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained[0].settler, 1);
    }

    #[test]
    fn drain_empties_queue_and_forgets_keys() {
        let mut queue = PendingQueue::new();
        queue.push(1, ());
        queue.push(2, ());

        let drained = queue.drain();

        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.push(1, ()));
    }
}
