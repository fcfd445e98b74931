//! Selection rules for each load balancing strategy
//!
//! Every rule receives the registered entries and a non-empty list of candidate
//! positions into them, already filtered for health and exclusion, and returns
//! the winning position.

use super::metrics::ProviderMetrics;
use rand::seq::SliceRandom;

#[derive(Debug)]
pub(super) struct ProviderEntry {
    pub id: String,
    pub metrics: ProviderMetrics,
}

pub(super) fn round_robin(candidates: &[usize], index: &mut usize) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let pick = candidates[*index % candidates.len()];
    *index = index.wrapping_add(1);
    Some(pick)
}

pub(super) fn least_connections(entries: &[ProviderEntry], candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&i| entries[i].metrics.active_connections)
}

/// Providers without traffic are tried first so they get a measurement
pub(super) fn least_response_time(entries: &[ProviderEntry], candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&i| entries[i].metrics.total_requests == 0)
        .or_else(|| {
            candidates.iter().copied().min_by(|&a, &b| {
                entries[a]
                    .metrics
                    .average_response_time_ms
                    .total_cmp(&entries[b].metrics.average_response_time_ms)
            })
        })
}

pub(super) fn priority(entries: &[ProviderEntry], candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&i| entries[i].metrics.priority)
}

pub(super) fn cost_optimized(entries: &[ProviderEntry], candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .filter_map(|i| entries[i].metrics.cost_per_request.map(|cost| (i, cost)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .or_else(|| candidates.first().copied())
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Shuffled table holding `weight` slots per registered provider
#[derive(Debug, Default)]
pub(super) struct WeightedTable {
    slots: Vec<usize>,
    cursor: usize,
}

impl WeightedTable {
    /// Weights are reduced by their common divisor, so 300:100 takes four slots
    pub fn rebuild(&mut self, entries: &[ProviderEntry]) {
        let divisor = entries
            .iter()
            .map(|entry| entry.metrics.weight)
            .fold(0, gcd)
            .max(1);
        self.slots = entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| {
                std::iter::repeat(i).take((entry.metrics.weight / divisor) as usize)
            })
            .collect();
        self.slots.shuffle(&mut rand::thread_rng());
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Walk the table from the cursor, skipping slots that are not candidates
    pub fn next(&mut self, candidates: &[usize]) -> Option<usize> {
        for _ in 0..self.slots.len() {
            let slot = self.slots[self.cursor % self.slots.len()];
            self.cursor = self.cursor.wrapping_add(1);
            if candidates.contains(&slot) {
                return Some(slot);
            }
        }
        None
    }
}
