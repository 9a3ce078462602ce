// summary.rs
// 拓扑统计信息：按设备种类统计顶点、按链路种类统计边，以及出现过的容量取值。
use crate::graph::TopologyGraph;
use crate::types::{DeviceKind, LinkKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// 拓扑统计摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologySummary {
    pub vertices_by_kind: BTreeMap<DeviceKind, usize>,
    pub edges_by_link: BTreeMap<LinkKind, usize>,
    pub total_vertices: usize,
    pub total_edges: usize,
    /// 升序排列、去重后的边容量（GB/s）
    pub capacities: Vec<f64>,
}

impl TopologySummary {
    pub fn from_graph(graph: &TopologyGraph) -> Self {
        let mut vertices_by_kind = BTreeMap::new();
        for endpoint in graph.nodes() {
            *vertices_by_kind.entry(endpoint.kind).or_insert(0) += 1;
        }

        let mut edges_by_link = BTreeMap::new();
        let mut capacities: Vec<f64> = Vec::new();
        for (_, _, link) in graph.edges() {
            *edges_by_link.entry(link.kind).or_insert(0) += 1;
            capacities.push(link.capacity);
        }
        capacities.sort_by(f64::total_cmp);
        capacities.dedup();

        Self {
            vertices_by_kind,
            edges_by_link,
            total_vertices: graph.node_count(),
            total_edges: graph.edge_count(),
            capacities,
        }
    }

    pub fn vertices(&self, kind: DeviceKind) -> usize {
        self.vertices_by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn edges(&self, kind: LinkKind) -> usize {
        self.edges_by_link.get(&kind).copied().unwrap_or(0)
    }
}
