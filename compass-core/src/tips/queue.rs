//! Tip consumption queue
//!
//! Tips are handed out strictly in the order they were declared, each at
//! most once. An empty queue is a hard stop: reusing a tip would
//! cross-contaminate wells.

use core::fmt;

use heapless::Deque;

use crate::geometry::WellLabel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum tips per queue (one full 96-position rack)
pub const MAX_TIPS: usize = 96;

/// Position of a single-use tip in the tip rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TipId(pub WellLabel);

impl TipId {
    /// Rack position of this tip
    pub const fn well(&self) -> WellLabel {
        self.0
    }
}

impl From<WellLabel> for TipId {
    fn from(well: WellLabel) -> Self {
        Self(well)
    }
}

impl fmt::Display for TipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The tip queue ran out before every transfer had a tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TipExhausted {
    /// Tips handed out before the queue ran dry
    pub consumed: u16,
}

impl fmt::Display for TipExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tip queue exhausted after {} tips", self.consumed)
    }
}

/// Queue is full; the rejected tip is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub TipId);

/// Ordered, bounded queue of tips to consume
#[derive(Debug, Clone, Default)]
pub struct TipQueue {
    tips: Deque<TipId, MAX_TIPS>,
    consumed: u16,
}

impl TipQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from tips in consumption order
    pub fn from_tips(tips: &[TipId]) -> Result<Self, QueueFull> {
        let mut queue = Self::new();
        for tip in tips {
            queue.push(*tip)?;
        }
        Ok(queue)
    }

    /// Append a tip to the end of the queue
    pub fn push(&mut self, tip: TipId) -> Result<(), QueueFull> {
        self.tips.push_back(tip).map_err(QueueFull)
    }

    /// Take the next tip
    ///
    /// Fails once every declared tip has been handed out.
    pub fn next_tip(&mut self) -> Result<TipId, TipExhausted> {
        match self.tips.pop_front() {
            Some(tip) => {
                self.consumed += 1;
                Ok(tip)
            }
            None => Err(TipExhausted {
                consumed: self.consumed,
            }),
        }
    }

    /// Tips not yet handed out
    pub fn remaining(&self) -> usize {
        self.tips.len()
    }

    /// Tips handed out so far
    pub fn consumed(&self) -> u16 {
        self.consumed
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    /// Iterate the remaining tips in consumption order
    pub fn iter(&self) -> impl Iterator<Item = &TipId> {
        self.tips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip(s: &str) -> TipId {
        TipId(WellLabel::parse(s).unwrap())
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = TipQueue::from_tips(&[tip("A1"), tip("B1"), tip("C1")]).unwrap();

        assert_eq!(queue.next_tip(), Ok(tip("A1")));
        assert_eq!(queue.next_tip(), Ok(tip("B1")));
        assert_eq!(queue.remaining(), 1);
        assert_eq!(queue.consumed(), 2);
        assert_eq!(queue.next_tip(), Ok(tip("C1")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_exhaustion() {
        let mut queue = TipQueue::from_tips(&[tip("A1")]).unwrap();
        assert!(queue.next_tip().is_ok());

        assert_eq!(queue.next_tip(), Err(TipExhausted { consumed: 1 }));
        // Stays exhausted, never recycles
        assert_eq!(queue.next_tip(), Err(TipExhausted { consumed: 1 }));
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = TipQueue::new();
        assert_eq!(queue.next_tip(), Err(TipExhausted { consumed: 0 }));
    }

    #[test]
    fn test_capacity() {
        let mut queue = TipQueue::new();
        for _ in 0..MAX_TIPS {
            assert!(queue.push(tip("A1")).is_ok());
        }
        assert_eq!(queue.push(tip("B1")), Err(QueueFull(tip("B1"))));
    }
}
