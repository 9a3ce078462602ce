// builder.rs
// 拓扑构建器，按节点逐个生成 GPU、NVSwitch、mlx5 网卡与 IB 交换机之间的带宽有向图。
use crate::config::TopologyConfig;
use crate::error::{Error, Result};
use crate::graph::TopologyGraph;
use crate::summary::TopologySummary;
use crate::types::{Endpoint, Link, LinkKind};
use log::{debug, info};

/// 构建完成的集群拓扑，构建后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    config: TopologyConfig,
    node_count: usize,
    graph: TopologyGraph,
    /// 计算端点（GPU），节点优先、槽位其次的生成顺序
    compute_nodes: Vec<Endpoint>,
}

impl Topology {
    /// 带容量的有向图
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// 计算端点列表
    pub fn compute_nodes(&self) -> &[Endpoint] {
        &self.compute_nodes
    }

    /// 物理节点数量
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// 生成时使用的配置
    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    /// 拆出 (有向图, 计算端点列表)
    pub fn into_parts(self) -> (TopologyGraph, Vec<Endpoint>) {
        (self.graph, self.compute_nodes)
    }

    /// 按设备种类和链路种类统计
    pub fn summary(&self) -> TopologySummary {
        TopologySummary::from_graph(&self.graph)
    }
}

/// 拓扑构建器
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    pub config: TopologyConfig,
}

impl TopologyBuilder {
    /// 使用给定配置创建构建器
    pub fn new(config: TopologyConfig) -> Self {
        Self { config }
    }

    /// 生成 `node_count` 个节点的集群拓扑
    ///
    /// 每个节点的所有GPU共用一台 NVSwitch。多于一个节点时，每块GPU
    /// 通过同编号的 mlx5 网卡接入共享 IB 交换机 `槽位 % ib_switch_count`；
    /// 单节点时不生成任何网卡和 IB 交换机。
    pub fn build(&self, node_count: usize) -> Result<Topology> {
        if node_count == 0 {
            return Err(Error::InvalidArgument("节点数量必须大于0".to_string()));
        }
        self.config.validate()?;
        let nodes = u32::try_from(node_count)
            .map_err(|_| Error::InvalidArgument(format!("节点数量 {} 超出范围", node_count)))?;

        let gpus = self.config.gpus_per_node;
        let nvlink = Link::new(self.config.nvlink_bandwidth, LinkKind::NvLink);
        let gpu_nic = Link::new(self.config.inter_node_bandwidth, LinkKind::GpuNic);
        let infiniband = Link::new(self.config.inter_node_bandwidth, LinkKind::InfiniBand);
        let multi_node = node_count > 1;

        let mut graph = TopologyGraph::new();
        let mut compute_nodes = Vec::with_capacity(node_count * gpus as usize);

        for node in 0..nodes {
            let nvswitch = Endpoint::nvswitch(node);
            for slot in 0..gpus {
                let gpu = Endpoint::gpu(node, slot);
                compute_nodes.push(gpu);
                graph.add_link_pair(gpu, nvswitch, nvlink);
                if multi_node {
                    graph.add_link_pair(gpu, Endpoint::nic(node, slot), gpu_nic);
                }
            }
            if multi_node {
                // 网卡按槽位分组接入共享 IB 交换机
                for slot in 0..gpus {
                    let ib = Endpoint::ib_switch(slot % self.config.ib_switch_count);
                    graph.add_link_pair(ib, Endpoint::nic(node, slot), infiniband);
                }
            }
            debug!("节点 {} 拓扑生成完成，当前边数 {}", node, graph.edge_count());
        }

        info!(
            "集群拓扑生成完成: {} 个节点, {} 个顶点, {} 条有向边",
            node_count,
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Topology {
            config: self.config.clone(),
            node_count,
            graph,
            compute_nodes,
        })
    }
}

/// 使用 DGX A100 默认参数生成拓扑
///
/// 节点数量必须为正，0 或负数返回 [`Error::InvalidArgument`]。
pub fn build_topology(node_count: i64) -> Result<Topology> {
    let node_count = usize::try_from(node_count)
        .map_err(|_| Error::InvalidArgument(format!("节点数量必须为正，当前为 {}", node_count)))?;
    TopologyBuilder::default().build(node_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceKind, NodeOwner};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn vertices_of_kind(topology: &Topology, kind: DeviceKind) -> Vec<Endpoint> {
        topology.graph().nodes().filter(|ep| ep.kind == kind).copied().collect()
    }

    #[test]
    fn test_single_node_topology() {
        let topology = build_topology(1).unwrap();
        let graph = topology.graph();

        let expected: Vec<Endpoint> = (0..8).map(|slot| Endpoint::gpu(0, slot)).collect();
        assert_eq!(topology.compute_nodes(), expected.as_slice());
        assert_eq!(graph.edge_count(), 16);
        assert_eq!(graph.node_count(), 9);

        let switch = Endpoint::nvswitch(0);
        for (src, dst, link) in graph.edges() {
            assert!(*src == switch || *dst == switch);
            assert_eq!(link.capacity, 300.0);
        }
        assert!(vertices_of_kind(&topology, DeviceKind::Mlx5).is_empty());
        assert!(vertices_of_kind(&topology, DeviceKind::Ib).is_empty());
    }

    #[test]
    fn test_two_node_topology() {
        let topology = build_topology(2).unwrap();
        let graph = topology.graph();

        assert_eq!(topology.compute_nodes().len(), 16);
        assert_eq!(graph.edge_count(), 96);

        for node in 0..2 {
            let nvswitch = Endpoint::nvswitch(node);
            assert_eq!(graph.out_degree(&nvswitch), 8);
            for slot in 0..8 {
                let gpu = Endpoint::gpu(node, slot);
                let nic = Endpoint::nic(node, slot);
                let ib = Endpoint::ib_switch(slot % 2);
                assert_eq!(graph.capacity(&gpu, &nvswitch), Some(300.0));
                assert_eq!(graph.capacity(&nvswitch, &gpu), Some(300.0));
                assert_eq!(graph.capacity(&gpu, &nic), Some(25.0));
                assert_eq!(graph.capacity(&nic, &gpu), Some(25.0));
                assert_eq!(graph.capacity(&ib, &nic), Some(25.0));
                assert_eq!(graph.capacity(&nic, &ib), Some(25.0));
                assert!(!graph.contains_edge(&nic, &Endpoint::ib_switch(1 - slot % 2)));
            }
        }

        // 每台 IB 交换机连接两个节点各4块网卡
        for switch in 0..2 {
            let ib = Endpoint::ib_switch(switch);
            assert_eq!(graph.out_degree(&ib), 8);
            assert!(graph.successors(&ib).all(|(nic, _)| nic.index % 2 == switch));
        }
    }

    #[test]
    fn test_ib_switches_are_shared() {
        for node_count in [2usize, 3, 7] {
            let topology = TopologyBuilder::default().build(node_count).unwrap();
            let switches = vertices_of_kind(&topology, DeviceKind::Ib);
            assert_eq!(switches, vec![Endpoint::ib_switch(0), Endpoint::ib_switch(1)]);
            assert!(switches.iter().all(|ep| ep.owner == NodeOwner::Shared));
            assert_eq!(vertices_of_kind(&topology, DeviceKind::NvSwitch).len(), node_count);
        }
    }

    #[test]
    fn test_compute_node_order() {
        let topology = build_topology(3).unwrap();
        let order: Vec<(i64, u32)> = topology
            .compute_nodes()
            .iter()
            .map(|ep| (ep.owner.index(), ep.index))
            .collect();
        let expected: Vec<(i64, u32)> = (0..3).flat_map(|n| (0..8).map(move |s| (n, s))).collect();
        assert_eq!(order, expected);
        assert!(topology.compute_nodes().iter().all(|ep| ep.kind == DeviceKind::Gpu));
    }

    #[test]
    fn test_random_node_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            let node_count: usize = rng.gen_range(1..=32);
            let first = TopologyBuilder::default().build(node_count).unwrap();
            let second = TopologyBuilder::default().build(node_count).unwrap();

            // 确定性：顶点、边、容量与计算端点顺序完全一致
            assert_eq!(first, second);
            assert_eq!(first.compute_nodes().len(), 8 * node_count);

            let expected_edges = if node_count == 1 { 16 } else { 48 * node_count };
            assert_eq!(first.graph().edge_count(), expected_edges);

            let capacities: BTreeSet<u64> =
                first.graph().edges().map(|(_, _, link)| link.capacity as u64).collect();
            if node_count == 1 {
                assert_eq!(capacities, BTreeSet::from([300]));
            } else {
                assert_eq!(capacities, BTreeSet::from([25, 300]));
            }
        }
    }

    #[test]
    fn test_rebuild_and_merge_does_not_duplicate() {
        let (mut graph, _) = build_topology(2).unwrap().into_parts();
        let (again, _) = build_topology(2).unwrap().into_parts();
        graph.merge(&again);

        assert_eq!(graph, again);
        assert_eq!(graph.edge_count(), 96);
        assert_eq!(graph.egress_capacity(&Endpoint::gpu(0, 0)), 325.0);
    }

    #[test]
    fn test_non_positive_node_count_rejected() {
        assert!(matches!(build_topology(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(build_topology(-3), Err(Error::InvalidArgument(_))));
        assert!(matches!(TopologyBuilder::default().build(0), Err(Error::InvalidArgument(_))));
        // 超出 u32 的节点编号范围，在分配前就返回
        assert!(matches!(
            TopologyBuilder::default().build(u32::MAX as usize + 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_config() {
        let config = TopologyConfig {
            gpus_per_node: 4,
            ib_switch_count: 4,
            nvlink_bandwidth: 600.0,
            inter_node_bandwidth: 50.0,
        };
        let topology = TopologyBuilder::new(config).build(2).unwrap();
        let graph = topology.graph();

        assert_eq!(topology.compute_nodes().len(), 8);
        assert_eq!(graph.edge_count(), 2 * (8 + 8 + 8));
        assert_eq!(vertices_of_kind(&topology, DeviceKind::Ib).len(), 4);
        assert_eq!(graph.capacity(&Endpoint::gpu(1, 3), &Endpoint::nvswitch(1)), Some(600.0));
        assert_eq!(graph.capacity(&Endpoint::nic(1, 3), &Endpoint::ib_switch(3)), Some(50.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let builder = TopologyBuilder::new(TopologyConfig { ib_switch_count: 0, ..Default::default() });
        assert!(matches!(builder.build(2), Err(Error::ConfigError(_))));

        let builder = TopologyBuilder::new(TopologyConfig { ib_switch_count: 16, ..Default::default() });
        assert!(matches!(builder.build(2), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_ib_switch_count_matches_config() {
        for ib_switch_count in 1..=8 {
            let config = TopologyConfig { ib_switch_count, ..Default::default() };
            let topology = TopologyBuilder::new(config).build(2).unwrap();
            assert_eq!(vertices_of_kind(&topology, DeviceKind::Ib).len(), ib_switch_count as usize);
        }
    }

    #[test]
    fn test_link_kinds() {
        let topology = build_topology(2).unwrap();
        let graph = topology.graph();
        let kind_of = |a: Endpoint, b: Endpoint| graph.link(&a, &b).map(|link| link.kind);

        assert_eq!(kind_of(Endpoint::gpu(0, 0), Endpoint::nvswitch(0)), Some(LinkKind::NvLink));
        assert_eq!(kind_of(Endpoint::gpu(0, 0), Endpoint::nic(0, 0)), Some(LinkKind::GpuNic));
        assert_eq!(kind_of(Endpoint::nic(0, 0), Endpoint::ib_switch(0)), Some(LinkKind::InfiniBand));
    }
}
