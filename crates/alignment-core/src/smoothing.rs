//! Bounded moving-average smoothing.
//!
//! Each tracked metric gets its own window. Windows are created lazily
//! on first push and owned by the filter, so two filters never share
//! history.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Default number of samples averaged per channel.
pub const DEFAULT_WINDOW: usize = 3;

/// Named smoothing channels, one per transform field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Scale,
    Rotation,
    Top,
    Left,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Scale, Channel::Rotation, Channel::Top, Channel::Left];
}

/// A bounded FIFO of recent samples and their mean.
#[derive(Debug, Clone)]
pub struct SmoothingChannel {
    window: usize,
    samples: VecDeque<f64>,
    mean: f64,
}

impl SmoothingChannel {
    /// Create an empty channel. A zero window is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window + 1),
            mean: 0.0,
        }
    }

    /// Append a sample, evicting the oldest if the window overflows,
    /// and return the mean of the current contents.
    pub fn push(&mut self, value: f64) -> f64 {
        self.samples.push_back(value);
        if self.samples.len() > self.window {
            self.samples.pop_front();
        }
        self.mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.mean
    }

    /// Mean of the current contents, or `None` before the first push.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.mean)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// A set of independent smoothing channels sharing one window size.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    window: usize,
    channels: HashMap<Channel, SmoothingChannel>,
}

impl SmoothingFilter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            channels: HashMap::new(),
        }
    }

    /// Push a value into `channel` and return that channel's smoothed value.
    pub fn push(&mut self, channel: Channel, value: f64) -> f64 {
        let window = self.window;
        self.channels
            .entry(channel)
            .or_insert_with(|| SmoothingChannel::new(window))
            .push(value)
    }

    /// Inspect a channel; `None` until it has received a sample.
    pub fn channel(&self, channel: Channel) -> Option<&SmoothingChannel> {
        self.channels.get(&channel)
    }

    /// Drop all history.
    pub fn reset(&mut self) {
        self.channels.clear();
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_push_returns_value() {
        let mut filter = SmoothingFilter::default();
        assert_eq!(filter.push(Channel::Scale, 1.7), 1.7);
    }

    #[test]
    fn test_partial_windows_return_partial_mean() {
        let mut filter = SmoothingFilter::default();
        assert_eq!(filter.push(Channel::Top, 10.0), 10.0);
        assert_eq!(filter.push(Channel::Top, 20.0), 15.0);
        assert_eq!(filter.push(Channel::Top, 30.0), 20.0);
    }

    #[test]
    fn test_fourth_push_evicts_oldest() {
        let mut filter = SmoothingFilter::default();
        for v in [10.0, 20.0, 30.0] {
            filter.push(Channel::Left, v);
        }
        assert_eq!(filter.push(Channel::Left, 60.0), (20.0 + 30.0 + 60.0) / 3.0);
        assert_eq!(filter.channel(Channel::Left).unwrap().len(), 3);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut filter = SmoothingFilter::default();
        filter.push(Channel::Scale, 100.0);
        filter.push(Channel::Scale, 200.0);
        assert_eq!(filter.push(Channel::Rotation, 0.25), 0.25);
        assert!(filter.channel(Channel::Top).is_none());
        assert_eq!(filter.channel(Channel::Scale).unwrap().mean(), Some(150.0));
    }

    #[test]
    fn test_separate_filters_do_not_share_history() {
        let mut a = SmoothingFilter::default();
        let mut b = SmoothingFilter::default();
        a.push(Channel::Scale, 4.0);
        assert_eq!(b.push(Channel::Scale, 2.0), 2.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = SmoothingFilter::default();
        filter.push(Channel::Scale, 4.0);
        filter.reset();
        assert_eq!(filter.push(Channel::Scale, 2.0), 2.0);
    }

    #[test]
    fn test_zero_window_behaves_as_one() {
        let mut channel = SmoothingChannel::new(0);
        channel.push(1.0);
        assert_eq!(channel.push(9.0), 9.0);
        assert_eq!(channel.window(), 1);
    }

    proptest! {
        #[test]
        fn window_never_exceeds_limit(values in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
            let mut channel = SmoothingChannel::new(DEFAULT_WINDOW);
            for (i, v) in values.iter().enumerate() {
                let mean = channel.push(*v);
                prop_assert!(channel.len() <= DEFAULT_WINDOW);
                let start = (i + 1).saturating_sub(DEFAULT_WINDOW);
                let tail = &values[start..=i];
                let expected = tail.iter().sum::<f64>() / tail.len() as f64;
                prop_assert!((mean - expected).abs() < 1e-6);
            }
        }
    }
}
