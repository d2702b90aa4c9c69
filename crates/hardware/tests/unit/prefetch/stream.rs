//! Stream-Buffer Queue Tests.
//!
//! Drives a `StreamBufferQueue` directly with block keys, checking reseeding,
//! partial consumption, recency promotion, and refill.

use cachesim_core::prefetch::StreamBufferQueue;
use pretty_assertions::assert_eq;

use crate::common::block;

fn keys(queue: &StreamBufferQueue) -> Vec<Vec<u32>> {
    queue.iter().map(|buffer| buffer.keys().collect()).collect()
}

fn mru_keys(queue: &StreamBufferQueue) -> Vec<u32> {
    queue.mru().unwrap().keys().collect()
}

/// Two buffers of three 32-byte blocks, seeded at 10 and 50.
fn two_streams() -> StreamBufferQueue {
    let mut queue = StreamBufferQueue::new(2, 3, 32);
    assert!(queue.probe(10, false).is_none());
    assert_eq!(queue.refill_mru(), 3);
    assert!(queue.probe(50, false).is_none());
    assert_eq!(queue.refill_mru(), 3);
    queue
}

#[test]
fn new_queue_holds_empty_buffers() {
    let queue = StreamBufferQueue::new(3, 4, 64);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.capacity(), 4);
    assert!(queue.iter().all(|buffer| buffer.is_empty() && !buffer.is_valid()));
}

#[test]
fn miss_reseeds_lru_buffer_and_promotes_it() {
    let queue = two_streams();
    assert_eq!(keys(&queue), vec![vec![11, 12, 13], vec![51, 52, 53]]);
    assert_eq!(queue.mru().unwrap().last_key(), 50);
}

#[test]
fn match_consumes_through_the_hit_and_promotes() {
    let mut queue = two_streams();

    let data = queue.probe(12, false).unwrap();

    assert_eq!(data.into_vec(), block(12 << 5, 32));
    assert_eq!(keys(&queue), vec![vec![51, 52, 53], vec![13]]);
    assert_eq!(queue.mru().unwrap().last_key(), 13);

    assert_eq!(queue.refill_mru(), 2);
    assert_eq!(mru_keys(&queue), vec![13, 14, 15]);
}

#[test]
fn cache_hit_without_match_leaves_queue_alone() {
    let mut queue = two_streams();
    let before = keys(&queue);

    assert!(queue.probe(99, true).is_none());

    assert_eq!(keys(&queue), before);
    assert_eq!(queue.mru().unwrap().last_key(), 50);
}

#[test]
fn cache_hit_with_match_still_consumes() {
    let mut queue = two_streams();

    assert!(queue.probe(11, true).is_some());
    assert_eq!(mru_keys(&queue), vec![12, 13]);
}

#[test]
fn most_recent_buffer_wins_a_duplicate_key() {
    let mut queue = StreamBufferQueue::new(2, 4, 32);
    let _ = queue.probe(2, false);
    let _ = queue.refill_mru();
    let _ = queue.probe(0, false);
    let _ = queue.refill_mru();
    assert_eq!(keys(&queue), vec![vec![3, 4, 5, 6], vec![1, 2, 3, 4]]);

    let _ = queue.probe(4, false);

    assert_eq!(keys(&queue), vec![vec![3, 4, 5, 6], vec![]]);
}

#[test]
fn full_buffer_is_cleared_before_reseeded_refill() {
    let mut queue = StreamBufferQueue::new(1, 4, 32);
    let _ = queue.probe(0, false);
    let _ = queue.refill_mru();

    let _ = queue.probe(100, false);

    assert_eq!(queue.refill_mru(), 4);
    assert_eq!(mru_keys(&queue), vec![101, 102, 103, 104]);
}

#[test]
fn partially_drained_buffer_keeps_entries_on_reseed() {
    let mut queue = StreamBufferQueue::new(1, 4, 32);
    let _ = queue.probe(0, false);
    let _ = queue.refill_mru();
    let _ = queue.probe(2, false);
    assert_eq!(mru_keys(&queue), vec![3, 4]);

    let _ = queue.probe(100, false);

    assert_eq!(queue.refill_mru(), 2);
    assert_eq!(mru_keys(&queue), vec![3, 4, 101, 102]);
}

#[test]
fn queue_without_buffers_does_nothing() {
    let mut queue = StreamBufferQueue::new(0, 4, 32);
    assert!(queue.is_empty());
    assert!(queue.probe(7, false).is_none());
    assert_eq!(queue.refill_mru(), 0);
}
