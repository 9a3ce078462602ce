// config.rs
// 拓扑生成配置结构体及其默认实现，包含每节点GPU数、IB交换机数以及NVLink/节点间带宽。
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A100 节点内 NVLink 带宽（GB/s）
pub const NVLINK_BW: f64 = 300.0;
/// A100 节点间 IB 网络带宽（GB/s）
pub const A100_IB_BW: f64 = 25.0;
/// 每个节点的GPU数量
pub const GPUS_PER_NODE: u32 = 8;
/// IB 交换机数量，按 NIC 槽位奇偶分组
pub const IB_SWITCH_COUNT: u32 = 2;
/// 每个节点允许配置的GPU数量上限
pub const MAX_GPUS_PER_NODE: u32 = 1024;

/// 拓扑生成配置，控制每节点GPU数量、IB交换机数量和链路带宽
///
/// 所有字段都带有默认值，JSON 配置文件中只需写出需要覆盖的字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// 每个节点的GPU数量，每块GPU配一块同编号的 mlx5 网卡
    pub gpus_per_node: u32,
    /// 跨节点共享的 IB 交换机数量，网卡按 `槽位 % ib_switch_count` 接入
    pub ib_switch_count: u32,
    /// GPU <-> NVSwitch 链路带宽（GB/s）
    pub nvlink_bandwidth: f64,
    /// GPU <-> 网卡、网卡 <-> IB 交换机链路带宽（GB/s）
    pub inter_node_bandwidth: f64,
}

impl Default for TopologyConfig {
    /// 默认配置：DGX A100，8块GPU，2台IB交换机，NVLink 300GB/s，IB 25GB/s
    fn default() -> Self {
        Self {
            gpus_per_node: GPUS_PER_NODE,
            ib_switch_count: IB_SWITCH_COUNT,
            nvlink_bandwidth: NVLINK_BW,
            inter_node_bandwidth: A100_IB_BW,
        }
    }
}

impl TopologyConfig {
    /// 从 JSON 字符串解析配置并校验
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: TopologyConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 配置文件读取配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigError(format!("未找到配置文件 {}", path.display())));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// 校验配置是否可用于生成拓扑
    pub fn validate(&self) -> Result<()> {
        if self.gpus_per_node == 0 {
            return Err(Error::ConfigError("gpus_per_node 必须大于0".to_string()));
        }
        if self.gpus_per_node > MAX_GPUS_PER_NODE {
            return Err(Error::ConfigError(format!(
                "gpus_per_node 不能超过 {}，当前为 {}",
                MAX_GPUS_PER_NODE, self.gpus_per_node
            )));
        }
        if self.ib_switch_count == 0 {
            return Err(Error::ConfigError("ib_switch_count 必须大于0".to_string()));
        }
        // 每台交换机至少要接到一块网卡
        if self.ib_switch_count > self.gpus_per_node {
            return Err(Error::ConfigError(format!(
                "ib_switch_count ({}) 不能超过 gpus_per_node ({})",
                self.ib_switch_count, self.gpus_per_node
            )));
        }
        check_bandwidth("nvlink_bandwidth", self.nvlink_bandwidth)?;
        check_bandwidth("inter_node_bandwidth", self.inter_node_bandwidth)?;
        Ok(())
    }
}

fn check_bandwidth(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::ConfigError(format!("{} 必须是正数，当前为 {}", name, value)));
    }
    Ok(())
}
