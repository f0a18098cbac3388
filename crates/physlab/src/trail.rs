//! Bounded history of past positions, kept only for drawing.

use std::collections::VecDeque;

/// An append-and-evict buffer of recent samples.
///
/// The length never exceeds the capacity; once full, every push drops the
/// oldest sample. A capacity of zero keeps nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail<T> {
    points: VecDeque<T>,
    cap: usize,
}

impl<T: Copy> Trail<T> {
    /// Creates an empty trail holding at most `cap` samples.
    pub fn new(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Appends a sample, evicting the oldest one when full.
    pub fn push(&mut self, point: T) {
        if self.cap == 0 {
            return;
        }
        while self.points.len() >= self.cap {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Removes all samples.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Maximum number of samples retained.
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Current number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<T> {
        self.points.back().copied()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.points.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(i);
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(trail.latest(), Some(4));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut trail = Trail::new(0);
        trail.push(1.0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut trail = Trail::new(2);
        trail.push('a');
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 2);
    }
}
