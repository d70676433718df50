use crate::models::PriceSample;
use std::collections::VecDeque;

/// Number of samples the dashboard keeps by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Fixed-capacity FIFO window of the most recent samples, in arrival order.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    samples: VecDeque<PriceSample>,
    capacity: usize,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PriceHistory {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: PriceSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&PriceSample> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }

    /// Lowest and highest price in the window.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.samples.iter().map(|s| s.price).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
    }

    pub fn to_vec(&self) -> Vec<PriceSample> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: i64) -> PriceSample {
        PriceSample::new(1_700_000_000_000 + i, 50_000.0 + i as f64)
    }

    #[test]
    fn keeps_the_most_recent_fifty_in_order() {
        let mut history = PriceHistory::default();
        for i in 0..120 {
            history.push(sample(i));
            assert!(history.len() <= DEFAULT_HISTORY_CAPACITY);
        }

        assert_eq!(history.len(), 50);
        let expected: Vec<PriceSample> = (70..120).map(sample).collect();
        assert_eq!(history.to_vec(), expected);
        assert_eq!(history.first(), Some(&sample(70)));
        assert_eq!(history.last(), Some(&sample(119)));
    }

    #[test]
    fn below_capacity_keeps_everything() {
        let mut history = PriceHistory::with_capacity(3);
        history.push(sample(1));
        history.push(sample(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.to_vec(), vec![sample(1), sample(2)]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = PriceHistory::with_capacity(0);
        history.push(sample(1));
        history.push(sample(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.to_vec(), vec![sample(2)]);
    }

    #[test]
    fn range_spans_window() {
        let mut history = PriceHistory::with_capacity(4);
        assert_eq!(history.range(), None);
        for p in [3.0, 1.0, 4.0, 1.5] {
            history.push(PriceSample::new(0, p));
        }
        assert_eq!(history.range(), Some((1.0, 4.0)));
    }
}
