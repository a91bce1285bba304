//! Timestamp-bucketed animation queue
//!
//! Bucket `i` holds every event of logical timestamp `i`. The queue starts
//! with one empty bucket and only ever grows; playback empties buckets in
//! place instead of removing them.

use std::mem;

use crate::event::AnimationEvent;

#[derive(Debug)]
pub struct AnimationQueue {
    buckets: Vec<Vec<AnimationEvent>>,
    /// Write cursor: the bucket `append` fills
    last_timestamp: usize,
}

impl Default for AnimationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new()],
            last_timestamp: 0,
        }
    }

    /// Add an event to the bucket at the write cursor
    pub fn append(&mut self, event: AnimationEvent) {
        // buckets.len() == last_timestamp + 1 always holds
        self.buckets[self.last_timestamp].push(event);
    }

    /// Open the next timestamp; returns its index
    pub fn start_new_timestamp(&mut self) -> usize {
        self.last_timestamp += 1;
        self.buckets.push(Vec::new());
        self.last_timestamp
    }

    pub fn last_timestamp(&self) -> usize {
        self.last_timestamp
    }

    /// Number of buckets, consumed ones included
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, timestamp: usize) -> Option<&[AnimationEvent]> {
        self.buckets.get(timestamp).map(Vec::as_slice)
    }

    pub fn buckets(&self) -> &[Vec<AnimationEvent>] {
        &self.buckets
    }

    /// Move a bucket's events out, leaving it empty in place
    pub fn take_bucket(&mut self, timestamp: usize) -> Option<Vec<AnimationEvent>> {
        self.buckets.get_mut(timestamp).map(mem::take)
    }

    /// Total number of queued events
    pub fn event_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_empty_bucket() {
        let queue = AnimationQueue::new();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.last_timestamp(), 0);
        assert_eq!(queue.bucket(0).map(|b| b.len()), Some(0));
        assert_eq!(queue.event_count(), 0);
    }

    #[test]
    fn appends_go_to_the_write_cursor() {
        let mut queue = AnimationQueue::new();
        queue.append(AnimationEvent::console("zero"));
        assert_eq!(queue.start_new_timestamp(), 1);
        queue.append(AnimationEvent::console("one-a"));
        queue.append(AnimationEvent::console("one-b"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.bucket(0).unwrap().len(), 1);
        assert_eq!(queue.bucket(1).unwrap().len(), 2);
        assert_eq!(queue.event_count(), 3);
    }

    #[test]
    fn taking_a_bucket_keeps_its_slot() {
        let mut queue = AnimationQueue::new();
        queue.start_new_timestamp();
        queue.append(AnimationEvent::forward(0));

        let taken = queue.take_bucket(1).unwrap();
        assert_eq!(taken.len(), 1);
        assert_eq!(queue.len(), 2);
        assert!(queue.bucket(1).unwrap().is_empty());
        assert!(queue.take_bucket(5).is_none());
    }
}
