//! Community detection on graphs with obvious structure

use token_flow_graph::graph::{build_graph, partition_graph, LouvainPartitioner, PartitionConfig};

use crate::common::{transfer, two_cliques_records};

#[test]
fn two_cliques_split_along_bridge() {
    let (graph, _) = build_graph(&two_cliques_records()).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();

    assert_eq!(partition.community_count(), 2);
    for member in ["0x02", "0x03", "0x04"] {
        assert_eq!(partition.get(member), partition.get("0x01"));
    }
    for member in ["0x12", "0x13", "0x14"] {
        assert_eq!(partition.get(member), partition.get("0x11"));
    }
    assert_ne!(partition.get("0x01"), partition.get("0x11"));
    // Ids follow the smallest member address
    assert_eq!(partition.get("0x01"), Some(0));
    assert_eq!(partition.get("0x11"), Some(1));
    assert!(partition.modularity() > 0.3);
}

#[test]
fn seed_controls_reproducibility() {
    let (graph, _) = build_graph(&two_cliques_records()).unwrap();
    let config = PartitionConfig {
        seed: 7,
        ..PartitionConfig::default()
    };
    let first = LouvainPartitioner::with_config(config.clone())
        .partition(&graph)
        .unwrap();
    let second = LouvainPartitioner::with_config(config).partition(&graph).unwrap();
    assert_eq!(first, second);
}

#[test]
fn disconnected_pairs_are_separate_communities() {
    let records = vec![
        transfer("0xA", "0xB", "1", 0),
        transfer("0xC", "0xD", "1", 1),
    ];
    let (graph, _) = build_graph(&records).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();

    assert_eq!(partition.community_count(), 2);
    assert_eq!(partition.get("0xa"), partition.get("0xb"));
    assert_eq!(partition.get("0xc"), partition.get("0xd"));
    assert!((partition.modularity() - 0.5).abs() < 1e-9);
}

#[test]
fn summaries_are_largest_first() {
    let mut records = two_cliques_records();
    records.push(transfer("0x11", "0x15", "1", 100));
    let (graph, _) = build_graph(&records).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();

    let summaries = partition.summaries();
    assert!(!summaries.is_empty());
    for pair in summaries.windows(2) {
        assert!(pair[0].size >= pair[1].size);
    }
    let covered: usize = summaries.iter().map(|s| s.size).sum();
    assert_eq!(covered, graph.node_count());
}
