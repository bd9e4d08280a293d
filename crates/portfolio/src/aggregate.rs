//! Pure aggregation over the transaction log.

use core_types::Transaction;
use std::collections::BTreeMap;

/// Net shares per symbol across a slice of transactions.
///
/// Pure over its input — no storage, no clock — which is what makes the
/// oversell rule independently testable. Symbols come out in alphabetical
/// order, keeping iteration and display deterministic.
pub fn aggregate_holdings(transactions: &[Transaction]) -> BTreeMap<String, i64> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for transaction in transactions {
        *totals.entry(transaction.symbol.clone()).or_insert(0) += transaction.shares;
    }
    totals
}
