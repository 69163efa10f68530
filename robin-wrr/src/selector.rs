//! Weighted Round Robin item selector (smooth-by-occurrence variant)
//!
//! Items are kept sorted by descending weight. Each selection walks that order and picks the
//! first item whose `occurrences % cycle_weight` is still below its own weight, so heavier items
//! get first refusal at every position. After `cycle_weight` selections every counter is cleared
//! and the pattern repeats, giving each item exactly `weight` turns per cycle.
//!
//! All mutable state (item sequence, per-item occurrences, cycle weight, cycle position) sits
//! behind a single [`parking_lot::Mutex`]. `add`, `reset` and `next` each hold it for their whole
//! duration, so a selection can never observe a cycle weight that disagrees with the registered
//! items. Share an instance across threads through `Arc`.

#![forbid(unsafe_code)]

use std::cmp::Reverse;
use std::fmt;

use parking_lot::Mutex;
use robin_core::{RobinConfig, RobinError, RobinResult};
use tracing::{debug, trace, warn};

/// Registered payload plus its selection bookkeeping.
#[derive(Debug)]
struct WeightedItem<T> {
    item: T,
    weight: u32,
    occurrences: u64,
}

#[derive(Debug)]
struct State<T> {
    items: Vec<WeightedItem<T>>,
    cycle_weight: u64,
    cycle_position: u64,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self { items: Vec::new(), cycle_weight: 0, cycle_position: 0 }
    }
}

impl<T> State<T> {
    fn push(&mut self, item: T, weight: u32) {
        self.cycle_weight += u64::from(weight);
        self.items.push(WeightedItem { item, weight, occurrences: 0 });
    }

    /// Stable, so equal weights keep insertion order.
    fn sort(&mut self) {
        self.items.sort_by_key(|it| Reverse(it.weight));
    }

    fn restart_cycle(&mut self) {
        self.cycle_position = 0;
        for it in &mut self.items {
            it.occurrences = 0;
        }
    }

    /// Index of the selected item, or `None` when nothing is registered.
    fn select(&mut self) -> Option<usize> {
        if self.cycle_weight == 0 {
            return None;
        }
        let cycle_weight = self.cycle_weight;
        let idx = match self
            .items
            .iter()
            .position(|it| it.occurrences % cycle_weight < u64::from(it.weight))
        {
            Some(idx) => idx,
            None => {
                warn!(
                    cycle_weight,
                    cycle_position = self.cycle_position,
                    "no eligible item, restarting cycle"
                );
                self.restart_cycle();
                0
            }
        };

        self.items[idx].occurrences += 1;
        self.cycle_position += 1;
        if self.cycle_position >= cycle_weight {
            trace!(cycle_weight, "cycle exhausted");
            self.restart_cycle();
        }
        Some(idx)
    }
}

/// Thread-safe weighted round-robin selector over payloads of type `T`.
///
/// Example:
/// ```rust
/// use robin_wrr::WeightedSelector;
/// let sel = WeightedSelector::new();
/// sel.add("A", 2).unwrap();
/// sel.add("B", 1).unwrap();
/// let picks: Vec<_> = (0..3).filter_map(|_| sel.next()).collect();
/// assert_eq!(picks, ["A", "A", "B"]);
/// ```
pub struct WeightedSelector<T> {
    state: Mutex<State<T>>,
}

impl<T> Default for WeightedSelector<T> {
    fn default() -> Self {
        Self { state: Mutex::new(State::default()) }
    }
}

impl<T> fmt::Debug for WeightedSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state.lock();
        f.debug_struct("WeightedSelector")
            .field("items", &st.items.len())
            .field("cycle_weight", &st.cycle_weight)
            .field("cycle_position", &st.cycle_position)
            .finish()
    }
}

impl<T> WeightedSelector<T> {
    /// Create an empty selector. Register items via [`add`](Self::add).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` with the given weight and re-sort by descending weight.
    ///
    /// Adding the same logical item twice creates two independent entries.
    /// Fails with [`RobinError::InvalidWeight`] when `weight` is zero, leaving the selector as is.
    pub fn add(&self, item: T, weight: u32) -> RobinResult<()> {
        if weight == 0 {
            warn!(weight, "rejected item");
            return Err(RobinError::InvalidWeight { weight });
        }
        let mut st = self.state.lock();
        st.push(item, weight);
        st.sort();
        debug!(weight, cycle_weight = st.cycle_weight, items = st.items.len(), "item added");
        Ok(())
    }

    /// Register several items under one lock acquisition.
    ///
    /// All weights are checked first; if any is zero nothing is registered.
    pub fn add_all<I>(&self, items: I) -> RobinResult<()>
    where
        I: IntoIterator<Item = (T, u32)>,
    {
        let items: Vec<(T, u32)> = items.into_iter().collect();
        if let Some(&(_, weight)) = items.iter().find(|(_, w)| *w == 0) {
            warn!(weight, "rejected batch");
            return Err(RobinError::InvalidWeight { weight });
        }
        let mut st = self.state.lock();
        let added = items.len();
        for (item, weight) in items {
            st.push(item, weight);
        }
        st.sort();
        debug!(added, cycle_weight = st.cycle_weight, items = st.items.len(), "items added");
        Ok(())
    }

    /// Drop every item and return to the empty state. Idempotent.
    pub fn reset(&self) {
        let mut st = self.state.lock();
        if st.cycle_weight != 0 || !st.items.is_empty() {
            debug!(items = st.items.len(), "selector reset");
        }
        st.items.clear();
        st.cycle_weight = 0;
        st.cycle_position = 0;
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Sum of all registered weights; the period of the selection pattern.
    #[must_use]
    pub fn cycle_weight(&self) -> u64 {
        self.state.lock().cycle_weight
    }

    /// Selections made since the current cycle started.
    #[must_use]
    pub fn cycle_position(&self) -> u64 {
        self.state.lock().cycle_position
    }

    /// Registered weights in selection order (descending).
    #[must_use]
    pub fn weights(&self) -> Vec<u32> {
        self.state.lock().items.iter().map(|it| it.weight).collect()
    }
}

impl<T: Clone> WeightedSelector<T> {
    /// Select the next item.
    ///
    /// Returns `None` without touching any state when the selector is empty.
    #[must_use]
    pub fn next(&self) -> Option<T> {
        let mut st = self.state.lock();
        let idx = st.select()?;
        trace!(idx, cycle_position = st.cycle_position, "item selected");
        Some(st.items[idx].item.clone())
    }

    /// Like [`next`](Self::next) but reports an empty selector as [`RobinError::EmptySelection`].
    pub fn try_next(&self) -> RobinResult<T> {
        self.next().ok_or(RobinError::EmptySelection)
    }

    /// Registered `(item, weight)` pairs in selection order.
    #[must_use]
    pub fn entries(&self) -> Vec<(T, u32)> {
        self.state.lock().items.iter().map(|it| (it.item.clone(), it.weight)).collect()
    }
}

impl WeightedSelector<String> {
    /// Build a selector from the `[[items]]` table of a configuration file.
    pub fn from_config(cfg: &RobinConfig) -> RobinResult<Self> {
        cfg.validate()?;
        let sel = Self::new();
        sel.add_all(cfg.items.iter().map(|it| (it.name.clone(), it.weight)))?;
        Ok(sel)
    }
}
