//! topology_from_config.rs
//!
//! 从 JSON 配置文件加载拓扑参数（此处为一个4卡/节点、4台IB交换机的假想集群），
//! 生成3节点拓扑并打印每台 IB 交换机连接的网卡。

use std::io::Write;
use topology::{DeviceKind, TopologyBuilder, TopologyConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config_file = tempfile::NamedTempFile::new()?;
    write!(
        config_file,
        r#"{{
    "gpus_per_node": 4,
    "ib_switch_count": 4,
    "nvlink_bandwidth": 600.0,
    "inter_node_bandwidth": 50.0
}}"#
    )?;

    let config = TopologyConfig::from_json_file(config_file.path())?;
    println!("加载配置: {:?}", config);

    let topology = TopologyBuilder::new(config).build(3)?;
    let graph = topology.graph();
    println!(
        "计算端点 {} 个，顶点 {} 个，有向边 {} 条",
        topology.compute_nodes().len(),
        graph.node_count(),
        graph.edge_count()
    );

    for switch in graph.nodes().filter(|ep| ep.kind == DeviceKind::Ib) {
        let nics: Vec<String> = graph.successors(switch).map(|(nic, _)| nic.to_string()).collect();
        println!("{} -> {}", switch, nics.join(", "));
    }

    Ok(())
}
