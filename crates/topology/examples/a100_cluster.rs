//! a100_cluster.rs
//!
//! 生成 1、2、4 个节点的 DGX A100 集群拓扑，打印各类设备数量和链路统计，
//! 并以 JSON 形式输出两节点拓扑的统计摘要。
//!
//! 运行: `RUST_LOG=debug cargo run --example a100_cluster`

use prettytable::{cell, row, Table};
use topology::{build_topology, DeviceKind, Endpoint, LinkKind, Topology};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== DGX A100 集群拓扑 ===");

    let mut table = Table::new();
    table.add_row(row![
        "节点数", "GPU", "NVSwitch", "mlx5", "IB", "NVLink边", "GPU-网卡边", "IB边", "总边数"
    ]);

    let mut topologies = Vec::new();
    for node_count in [1, 2, 4] {
        let topology = build_topology(node_count)?;
        let summary = topology.summary();
        table.add_row(row![
            node_count,
            summary.vertices(DeviceKind::Gpu),
            summary.vertices(DeviceKind::NvSwitch),
            summary.vertices(DeviceKind::Mlx5),
            summary.vertices(DeviceKind::Ib),
            summary.edges(LinkKind::NvLink),
            summary.edges(LinkKind::GpuNic),
            summary.edges(LinkKind::InfiniBand),
            summary.total_edges
        ]);
        topologies.push(topology);
    }
    table.printstd();

    if let Some(two_nodes) = topologies.iter().find(|t| t.node_count() == 2) {
        print_gpu_links(two_nodes, Endpoint::gpu(1, 5));
        println!("\n两节点拓扑摘要:");
        println!("{}", serde_json::to_string_pretty(&two_nodes.summary())?);
    }

    Ok(())
}

fn print_gpu_links(topology: &Topology, gpu: Endpoint) {
    let graph = topology.graph();
    println!("\n{} 的出边:", gpu);
    for (dst, link) in graph.successors(&gpu) {
        println!("  -> {} {:?} {} GB/s", dst, link.kind, link.capacity);
    }
    println!("  总出口带宽: {} GB/s", graph.egress_capacity(&gpu));
}
