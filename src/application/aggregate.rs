// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Response Aggregator
//
// Folds the per-provider outcome lists produced by the dispatcher into the
// single JSON object returned to the caller. Every requested provider key
// appears exactly once; the value is always an ordered list of results, even
// for a single-item batch, so callers never branch on response shape.

use serde_json::{Map, Value};

use crate::domain::{ProviderKey, ProviderResult};

/// Merge per-key result lists into one response object.
///
/// Keys are never dropped and items are never reordered within a key.
pub fn aggregate(outcomes: Vec<(ProviderKey, Vec<ProviderResult>)>) -> Value {
    let mut body = Map::with_capacity(outcomes.len());
    for (key, results) in outcomes {
        let list = results
            .into_iter()
            .map(|r| serde_json::to_value(r).unwrap_or(Value::Null))
            .collect();
        body.insert(key.as_str().to_string(), Value::Array(list));
    }
    Value::Object(body)
}
