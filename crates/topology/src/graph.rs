// graph.rs
// 带容量的有向图，使用“邻接表套邻接表”存储：端点 -> (邻居端点 -> 链路)。
use crate::types::{Endpoint, Link};
use std::collections::BTreeMap;

/// 拓扑有向图
///
/// 每个有序端点对最多一条边，重复插入会覆盖旧值而不是叠加。
/// 允许环（例如 GPU -> NVSwitch -> GPU）。底层使用 `BTreeMap`，
/// 遍历顺序只取决于端点本身，相同输入得到相同的遍历结果。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyGraph {
    adjacency: BTreeMap<Endpoint, BTreeMap<Endpoint, Link>>,
}

impl TopologyGraph {
    /// 空图
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一条有向边，两个端点都会被登记为顶点
    ///
    /// 返回该有序端点对上原有的链路（如果存在）。
    pub fn add_edge(&mut self, src: Endpoint, dst: Endpoint, link: Link) -> Option<Link> {
        self.adjacency.entry(dst).or_default();
        self.adjacency.entry(src).or_default().insert(dst, link)
    }

    /// 插入一对方向相反、属性相同的有向边
    pub fn add_link_pair(&mut self, a: Endpoint, b: Endpoint, link: Link) {
        self.add_edge(a, b, link);
        self.add_edge(b, a, link);
    }

    /// 顶点是否存在
    pub fn contains_node(&self, endpoint: &Endpoint) -> bool {
        self.adjacency.contains_key(endpoint)
    }

    /// src -> dst 方向的边是否存在
    pub fn contains_edge(&self, src: &Endpoint, dst: &Endpoint) -> bool {
        self.link(src, dst).is_some()
    }

    /// src -> dst 方向的链路属性
    pub fn link(&self, src: &Endpoint, dst: &Endpoint) -> Option<&Link> {
        self.adjacency.get(src).and_then(|neighbors| neighbors.get(dst))
    }

    /// src -> dst 方向的带宽容量
    pub fn capacity(&self, src: &Endpoint, dst: &Endpoint) -> Option<f64> {
        self.link(src, dst).map(|link| link.capacity)
    }

    /// 出边邻居
    pub fn successors<'a>(&'a self, endpoint: &Endpoint) -> impl Iterator<Item = (&'a Endpoint, &'a Link)> + 'a {
        self.adjacency.get(endpoint).into_iter().flat_map(|neighbors| neighbors.iter())
    }

    /// 入边邻居，需要扫描全图
    pub fn predecessors<'a>(&'a self, endpoint: &'a Endpoint) -> impl Iterator<Item = (&'a Endpoint, &'a Link)> + 'a {
        self.adjacency
            .iter()
            .filter_map(move |(src, neighbors)| neighbors.get(endpoint).map(|link| (src, link)))
    }

    /// 出边数量
    pub fn out_degree(&self, endpoint: &Endpoint) -> usize {
        self.adjacency.get(endpoint).map_or(0, |neighbors| neighbors.len())
    }

    /// 入边数量
    pub fn in_degree(&self, endpoint: &Endpoint) -> usize {
        self.predecessors(endpoint).count()
    }

    /// 所有出边容量之和（GB/s）
    pub fn egress_capacity(&self, endpoint: &Endpoint) -> f64 {
        self.successors(endpoint).map(|(_, link)| link.capacity).sum()
    }

    /// 所有入边容量之和（GB/s）
    pub fn ingress_capacity(&self, endpoint: &Endpoint) -> f64 {
        self.predecessors(endpoint).map(|(_, link)| link.capacity).sum()
    }

    /// 按端点顺序遍历所有顶点
    pub fn nodes(&self) -> impl Iterator<Item = &Endpoint> {
        self.adjacency.keys()
    }

    /// 按 (源, 目的) 顺序遍历所有有向边
    pub fn edges(&self) -> impl Iterator<Item = (&Endpoint, &Endpoint, &Link)> {
        self.adjacency
            .iter()
            .flat_map(|(src, neighbors)| neighbors.iter().map(move |(dst, link)| (src, dst, link)))
    }

    /// 顶点数量
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// 有向边数量
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|neighbors| neighbors.len()).sum()
    }

    /// 是否没有任何顶点
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// 把另一张图的所有边并入本图，同一有序端点对以 `other` 为准
    pub fn merge(&mut self, other: &TopologyGraph) {
        for (src, dst, link) in other.edges() {
            self.add_edge(*src, *dst, *link);
        }
    }
}
