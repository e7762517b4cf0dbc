// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fold historical and realtime transactions into one map keyed by id.
//!
//! Merge rules:
//! - Same id within one source: mutations concatenate in arrival order,
//!   the later timestamp wins (see [`Transaction::absorb`])
//! - Across sources: the most recent emission from either source replaces
//!   the unified entry for every id it contains
//!
//! Ids are never removed, so the unified map only grows.

use std::collections::BTreeMap;

use crate::transaction::{Transaction, TransactionId};

/// Transactions keyed by id.
pub type TransactionMap = BTreeMap<TransactionId, Transaction>;

/// Trait for folding transactions into a map.
pub trait Merge {
    /// Folds one transaction in.
    ///
    /// Returns true if the id was not present before.
    fn apply(&mut self, tx: Transaction) -> bool;

    /// Folds several transactions in order.
    ///
    /// Returns the number of ids that were new.
    fn apply_all<I>(&mut self, txs: I) -> usize
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut added = 0;
        for tx in txs {
            if self.apply(tx) {
                added += 1;
            }
        }
        added
    }
}

impl Merge for TransactionMap {
    fn apply(&mut self, tx: Transaction) -> bool {
        match self.get_mut(&tx.id) {
            Some(existing) => {
                existing.absorb(tx);
                false
            }
            None => {
                self.insert(tx.id.clone(), tx);
                true
            }
        }
    }
}

/// Returns the map's transactions oldest first.
pub fn chronological(map: &TransactionMap) -> Vec<Transaction> {
    let mut txs: Vec<Transaction> = map.values().cloned().collect();
    txs.sort_by(Transaction::chronological);
    txs
}

/// Fold state for one history subscription.
///
/// Each source keeps its own running map; every fold re-overlays the
/// source's whole map onto the unified one.
#[derive(Debug, Default)]
pub struct TransactionCompiler {
    history: TransactionMap,
    realtime: TransactionMap,
    unified: TransactionMap,
}

impl TransactionCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the historical transaction list and returns the unified map.
    pub fn apply_history(&mut self, txs: Vec<Transaction>) -> &TransactionMap {
        self.history.apply_all(txs);
        overlay(&mut self.unified, &self.history);
        &self.unified
    }

    /// Folds one realtime transaction and returns the unified map.
    pub fn apply_realtime(&mut self, tx: Transaction) -> &TransactionMap {
        self.realtime.apply(tx);
        overlay(&mut self.unified, &self.realtime);
        &self.unified
    }

    /// Returns the unified map.
    pub fn unified(&self) -> &TransactionMap {
        &self.unified
    }

    /// Returns the number of distinct transaction ids seen.
    pub fn len(&self) -> usize {
        self.unified.len()
    }

    /// Returns true if no transaction has been folded yet.
    pub fn is_empty(&self) -> bool {
        self.unified.is_empty()
    }
}

fn overlay(unified: &mut TransactionMap, emission: &TransactionMap) {
    for (id, tx) in emission {
        unified.insert(id.clone(), tx.clone());
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
