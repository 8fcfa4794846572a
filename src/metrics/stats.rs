//! Point-in-time reservoir statistics.
//!
//! A [`ReservoirStats`] describes one reservoir at one moment: how many events
//! were offered, how many are retained and how the rest were lost. The
//! difference `seen - saved` is the drop count the reporting layer surfaces
//! as a supportability signal.

/// Snapshot of a reservoir's accounting.
///
/// # Examples
///
/// ```
/// use reservoircraft::{EventReservoir, Sample};
///
/// let mut reservoir = EventReservoir::new(2).unwrap();
/// for (tick, priority) in [100.0, 1.0, 2.0, 50.0].into_iter().enumerate() {
///     reservoir.add(Sample::new(priority, tick as u64, ())).unwrap();
/// }
///
/// let stats = reservoir.stats();
/// assert_eq!(stats.seen, 4);
/// assert_eq!(stats.saved, 2);
/// assert_eq!(stats.dropped, 2);
/// assert_eq!(stats.drop_rate(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservoirStats {
    /// Events offered to the reservoir.
    pub seen: u64,
    /// Events currently retained.
    pub saved: u64,
    /// `seen - saved`.
    pub dropped: u64,
    /// Newcomers turned away because they did not beat the minimum.
    pub rejected: u64,
    /// Retained events evicted to make room for a better newcomer.
    pub evicted: u64,
    /// Retention limit, 0 when unbounded.
    pub capacity: u64,
}

impl ReservoirStats {
    /// Fraction of seen events that were not retained, in `[0, 1]`.
    pub fn drop_rate(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.seen as f64
    }

    /// Fraction of capacity in use, or `None` for an unbounded reservoir.
    pub fn fill_ratio(&self) -> Option<f64> {
        if self.capacity == 0 {
            return None;
        }
        Some(self.saved as f64 / self.capacity as f64)
    }

    /// Returns `true` if a bounded reservoir has reached its capacity.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.saved >= self.capacity
    }

    /// Supportability metrics for a reservoir called `name`.
    ///
    /// ```
    /// use reservoircraft::metrics::ReservoirStats;
    ///
    /// let stats = ReservoirStats { seen: 10, saved: 7, dropped: 3, ..Default::default() };
    /// let metrics = stats.supportability("span_events");
    /// assert_eq!(metrics[0].name, "Supportability/span_events/TotalEventsSeen");
    /// assert_eq!(metrics[2].value, 3);
    /// ```
    pub fn supportability(&self, name: &str) -> Vec<SupportabilityMetric> {
        vec![
            SupportabilityMetric::new(name, SEEN_SUFFIX, self.seen),
            SupportabilityMetric::new(name, SENT_SUFFIX, self.saved),
            SupportabilityMetric::new(name, DROPPED_SUFFIX, self.dropped),
        ]
    }
}

/// Metric-name suffix for the seen count.
pub const SEEN_SUFFIX: &str = "TotalEventsSeen";
/// Metric-name suffix for the retained count.
pub const SENT_SUFFIX: &str = "TotalEventsSent";
/// Metric-name suffix for the drop count.
pub const DROPPED_SUFFIX: &str = "Dropped";

/// A named counter reported alongside the harvested events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportabilityMetric {
    /// Full metric name, `Supportability/<reservoir>/<suffix>`.
    pub name: String,
    /// Counter value.
    pub value: u64,
}

impl SupportabilityMetric {
    fn new(reservoir: &str, suffix: &str, value: u64) -> Self {
        Self {
            name: format!("Supportability/{reservoir}/{suffix}"),
            value,
        }
    }
}
