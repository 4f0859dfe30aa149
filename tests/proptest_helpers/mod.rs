#![allow(dead_code)]

#[path = "../common/mod.rs"]
mod common;

pub use common::*;

use notesketch::plist::{NodeId, Plist, Value};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Scalar leaves the decoder reproduces exactly.
fn arb_leaf() -> BoxedStrategy<PNode> {
    prop_oneof![
        Just(PNode::Null),
        any::<bool>().prop_map(PNode::Bool),
        (-70_000i64..70_000).prop_map(PNode::Int),
        (0i64..=0xFFFF_FFFF).prop_map(PNode::Int),
        any::<i64>().prop_map(PNode::Int),
        (-1.0e9f64..1.0e9).prop_map(PNode::Real),
        (-1.0e9f64..1.0e9).prop_map(PNode::Date),
        "[ -~]{0,40}".prop_map(PNode::Text),
        "\\PC{1,12}".prop_map(PNode::Text),
        proptest::collection::vec(any::<u8>(), 0..64).prop_map(PNode::Data),
    ]
    .boxed()
}

/// Trees without UIDs and without keyed-archive markers.
pub fn arb_plist_tree() -> BoxedStrategy<PNode> {
    arb_leaf()
        .prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..8).prop_map(PNode::Array),
                proptest::collection::vec(inner.clone(), 0..8).prop_map(PNode::Set),
                proptest::collection::btree_map("[a-z]{1,8}", inner, 0..8)
                    .prop_map(|entries| PNode::Dict(entries.into_iter().collect())),
            ]
        })
        .boxed()
}

/// Rebuilds a tree from a decoded arena, for comparison with the input.
pub fn to_tree(plist: &Plist, id: NodeId) -> PNode {
    match plist.get(id) {
        Value::Null => PNode::Null,
        Value::Bool(value) => PNode::Bool(*value),
        Value::Int(value) => PNode::Int(*value),
        Value::Real(value) => PNode::Real(*value),
        Value::Date(value) => PNode::Date(*value),
        Value::Text(value) => PNode::Text(value.clone()),
        Value::Bytes(value) => PNode::Data(value.clone()),
        Value::Array(items) => PNode::Array(items.iter().map(|item| to_tree(plist, *item)).collect()),
        Value::Dict(dict) => PNode::Dict(
            dict.iter()
                .map(|(key, value)| (key.to_string(), to_tree(plist, value)))
                .collect(),
        ),
    }
}

/// Sets decode as arrays; rewrites the input tree the same way.
pub fn sets_as_arrays(node: &PNode) -> PNode {
    match node {
        PNode::Array(items) | PNode::Set(items) => {
            PNode::Array(items.iter().map(sets_as_arrays).collect())
        }
        PNode::Dict(entries) => PNode::Dict(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), sets_as_arrays(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}
