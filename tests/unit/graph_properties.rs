//! Property tests over randomly generated transfer sets

use proptest::prelude::*;
use token_flow_graph::graph::{
    build_graph, partition_graph, spring_layout, LayoutConfig, PartitionConfig,
};
use token_flow_graph::types::TransferRecord;

use crate::common::transfer;

/// Up to 40 transfers between at most 16 addresses, values sometimes missing
fn transfers() -> impl Strategy<Value = Vec<TransferRecord>> {
    prop::collection::vec(
        (0u8..16, 0u8..16, prop::option::of(0u32..1_000_000)),
        1..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (from, to, value))| {
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                transfer(
                    &format!("0x{:02x}", from),
                    &format!("0x{:02x}", to),
                    &value,
                    i as u64,
                )
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn node_and_edge_counts(records in transfers()) {
        let (graph, stats) = build_graph(&records).unwrap();
        prop_assert!(stats.nodes <= 2 * records.len());
        prop_assert_eq!(stats.edges, records.len());
        prop_assert_eq!(graph.edge_count(), records.len());
        prop_assert!(stats.density >= 0.0);
        let missing = records.iter().filter(|r| !r.value.is_amount()).count();
        prop_assert_eq!(stats.unparsed_values, missing);
    }

    #[test]
    fn partition_covers_every_node(records in transfers(), seed in any::<u64>()) {
        let (graph, _) = build_graph(&records).unwrap();
        let config = PartitionConfig { seed, ..PartitionConfig::default() };
        let partition = partition_graph(&graph, &config).unwrap();

        prop_assert_eq!(partition.len(), graph.node_count());
        for address in graph.nodes() {
            let community = partition.get(address);
            prop_assert!(community.is_some());
            prop_assert!(community.unwrap_or(u32::MAX) < partition.community_count());
        }
        prop_assert!(partition.modularity() <= 1.0);
    }

    #[test]
    fn layout_is_finite_and_bounded(records in transfers(), seed in any::<u64>()) {
        let (graph, _) = build_graph(&records).unwrap();
        let config = LayoutConfig { seed, ..LayoutConfig::default() };
        let layout = spring_layout(&graph, &config).unwrap();

        prop_assert_eq!(layout.len(), graph.node_count());
        for (_, position) in layout.iter() {
            prop_assert!(position.is_finite());
            prop_assert!(position.x.abs() <= 1.0 + 1e-9);
            prop_assert!(position.y.abs() <= 1.0 + 1e-9);
        }
    }
}

#[test]
fn self_transfer_is_a_single_node_loop() {
    let records = vec![transfer("0xA", "0xa", "3", 0)];
    let (graph, stats) = build_graph(&records).unwrap();
    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.edges, 1);
    assert_eq!(stats.density, 0.0);
    assert_eq!(graph.degree("0xa"), 2);
}

#[test]
fn parallel_transfers_are_kept() {
    let records = vec![
        transfer("0xA", "0xB", "1", 0),
        transfer("0xA", "0xB", "2", 1),
        transfer("0xB", "0xA", "3", 2),
    ];
    let (_, stats) = build_graph(&records).unwrap();
    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.edges, 3);
    assert_eq!(stats.density, 3.0);
    assert_eq!(stats.mean_degree, 3.0);
}

#[test]
fn exponent_values_do_not_inflate_totals() {
    let records = vec![
        transfer("0xA", "0xB", "1e10000000", 0),
        transfer("0xA", "0xC", "1", 1),
    ];
    let (graph, stats) = build_graph(&records).unwrap();
    assert_eq!(stats.unparsed_values, 1);
    let totals = graph.outgoing_values();
    assert_eq!(totals["0xa"].to_string(), "1");
}
