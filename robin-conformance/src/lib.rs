//! Helpers shared by the conformance tests: drawing whole cycles from a selector and
//! tallying the results.

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::Context;
use robin_core::RobinConfig;
use robin_wrr::WeightedSelector;

/// Draw `n` consecutive selections, failing if the selector runs dry.
pub fn draw<T: Clone>(sel: &WeightedSelector<T>, n: usize) -> anyhow::Result<Vec<T>> {
    (0..n)
        .map(|i| sel.try_next().with_context(|| format!("selection {i} of {n}")))
        .collect()
}

/// Draw exactly one full cycle.
pub fn draw_cycle<T: Clone>(sel: &WeightedSelector<T>) -> anyhow::Result<Vec<T>> {
    let cycle = usize::try_from(sel.cycle_weight()).context("cycle weight exceeds usize")?;
    draw(sel, cycle)
}

/// Count how often each item was picked.
pub fn tally<T: Eq + Hash>(picks: impl IntoIterator<Item = T>) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for pick in picks {
        *counts.entry(pick).or_insert(0) += 1;
    }
    counts
}

/// Build a selector straight from TOML text.
pub fn selector_from_toml(src: &str) -> anyhow::Result<WeightedSelector<String>> {
    let cfg: RobinConfig = src.parse().context("parsing selector config")?;
    WeightedSelector::from_config(&cfg).context("building selector")
}
