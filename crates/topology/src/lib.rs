// lib.rs
// 集群拓扑模块入口，声明并导出各子模块。
pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod summary;
pub mod types;

pub use builder::{build_topology, Topology, TopologyBuilder};
pub use config::TopologyConfig;
pub use error::{Error, Result};
pub use graph::TopologyGraph;
pub use summary::TopologySummary;
pub use types::{DeviceKind, Endpoint, Link, LinkKind, NodeOwner};
