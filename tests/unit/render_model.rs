//! Render model projection and JSON export

use token_flow_graph::export::{build_render_model, read_render_model, write_render_model};
use token_flow_graph::graph::{build_graph, partition_graph, spring_layout, LayoutConfig, PartitionConfig};
use token_flow_graph::utils::colour::{community_colour, CROSS_COMMUNITY_EDGE_COLOUR};

use crate::common::{transfer, triangle_records, two_cliques_records, TestOutput};

#[test]
fn triangle_sizes_follow_outgoing_values() {
    let records = triangle_records();
    let (graph, _) = build_graph(&records).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();
    let layout = spring_layout(&graph, &LayoutConfig::default()).unwrap();
    let model = build_render_model(&graph, &partition, &layout).unwrap();

    let size = |id: &str| {
        model
            .nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.size)
            .unwrap()
    };
    assert_eq!(size("0xa"), 10.0);
    assert_eq!(size("0xb"), 5.0);
    assert_eq!(size("0xc"), 0.0);

    let missing = model.edges.iter().find(|e| e.label == "0xtx0002").unwrap();
    assert_eq!(missing.size, 0.0);
    assert_eq!(missing.source, "0xc");
    assert_eq!(missing.target, "0xa");
}

#[test]
fn colours_follow_communities() {
    let (graph, _) = build_graph(&two_cliques_records()).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();
    let layout = spring_layout(&graph, &LayoutConfig::default()).unwrap();
    let model = build_render_model(&graph, &partition, &layout).unwrap();

    for node in &model.nodes {
        let community = partition.get(&node.id).unwrap();
        assert_eq!(node.color, community_colour(community));
    }
    for edge in &model.edges {
        let same = partition.get(&edge.source) == partition.get(&edge.target);
        if same {
            assert_eq!(edge.color, community_colour(partition.get(&edge.source).unwrap()));
        } else {
            assert_eq!(edge.color, CROSS_COMMUNITY_EDGE_COLOUR);
        }
    }
    let bridges = model
        .edges
        .iter()
        .filter(|e| e.color == CROSS_COMMUNITY_EDGE_COLOUR)
        .count();
    assert_eq!(bridges, 1);
}

#[test]
fn json_document_reads_back() {
    let output = TestOutput::new().unwrap();
    let records = vec![
        transfer("0xA", "0xB", "1.5", 0),
        transfer("0xB", "0xB", "2", 1),
    ];
    let (graph, _) = build_graph(&records).unwrap();
    let partition = partition_graph(&graph, &PartitionConfig::default()).unwrap();
    let layout = spring_layout(&graph, &LayoutConfig::default()).unwrap();
    let model = build_render_model(&graph, &partition, &layout).unwrap();

    let path = output.path("export/network.json");
    write_render_model(&model, &path).unwrap();
    let reread = read_render_model(&path).unwrap();

    assert_eq!(reread.nodes.len(), model.nodes.len());
    for (read, written) in reread.nodes.iter().zip(&model.nodes) {
        assert_eq!(read.id, written.id);
        assert_eq!(read.color, written.color);
        assert!((read.x - written.x).abs() < 1e-12);
        assert!((read.y - written.y).abs() < 1e-12);
        assert_eq!(read.size, written.size);
    }
    assert_eq!(reread.edges, model.edges);
    let ids: Vec<&str> = reread.node_ids().collect();
    assert_eq!(ids.len(), 2);
}
