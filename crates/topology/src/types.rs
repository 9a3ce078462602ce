// types.rs
// 定义拓扑中的通用类型：设备种类、节点归属、端点标识以及链路属性。
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 设备种类，封闭枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceKind {
    /// 计算GPU
    #[serde(rename = "GPU")]
    Gpu,
    /// 节点内GPU互联交换机
    #[serde(rename = "NVSwitch")]
    NvSwitch,
    /// 每块GPU独占的 mlx5 网卡
    #[serde(rename = "mlx5")]
    Mlx5,
    /// 跨节点 InfiniBand 交换机
    #[serde(rename = "IB")]
    Ib,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Gpu,
        DeviceKind::NvSwitch,
        DeviceKind::Mlx5,
        DeviceKind::Ib,
    ];

    /// 设备种类的标准名称
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Gpu => "GPU",
            DeviceKind::NvSwitch => "NVSwitch",
            DeviceKind::Mlx5 => "mlx5",
            DeviceKind::Ib => "IB",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("未知设备种类: {}", s)))
    }
}

/// 端点所属的节点
///
/// `Shared` 表示不归属任何单个节点的全局资源（IB交换机），
/// 对外编号为 -1。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeOwner {
    /// 全局共享资源
    Shared,
    /// 物理节点编号
    Local(u32),
}

impl NodeOwner {
    /// 数值形式的节点编号，共享资源为 -1
    pub fn index(&self) -> i64 {
        match self {
            NodeOwner::Shared => -1,
            NodeOwner::Local(node) => i64::from(*node),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, NodeOwner::Shared)
    }
}

impl fmt::Display for NodeOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// 端点标识符：(节点, 设备种类, 设备编号)
///
/// 按三个字段做值相等比较，可直接作为图的顶点键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub owner: NodeOwner,
    pub kind: DeviceKind,
    pub index: u32,
}

impl Endpoint {
    pub fn new(owner: NodeOwner, kind: DeviceKind, index: u32) -> Self {
        Self { owner, kind, index }
    }

    /// 节点 `node` 上的第 `slot` 块GPU
    pub fn gpu(node: u32, slot: u32) -> Self {
        Self::new(NodeOwner::Local(node), DeviceKind::Gpu, slot)
    }

    /// 节点 `node` 的 NVSwitch，所有GPU共享编号0
    pub fn nvswitch(node: u32) -> Self {
        Self::new(NodeOwner::Local(node), DeviceKind::NvSwitch, 0)
    }

    /// 节点 `node` 上与第 `slot` 块GPU对应的网卡
    pub fn nic(node: u32, slot: u32) -> Self {
        Self::new(NodeOwner::Local(node), DeviceKind::Mlx5, slot)
    }

    /// 第 `switch` 台共享 IB 交换机
    pub fn ib_switch(switch: u32) -> Self {
        Self::new(NodeOwner::Shared, DeviceKind::Ib, switch)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.owner, self.kind, self.index)
    }
}

/// 链路种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkKind {
    /// GPU <-> NVSwitch
    NvLink,
    /// GPU <-> mlx5 网卡
    GpuNic,
    /// mlx5 网卡 <-> IB 交换机
    InfiniBand,
}

/// 有向边属性
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// 带宽容量（GB/s）
    pub capacity: f64,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(capacity: f64, kind: LinkKind) -> Self {
        Self { capacity, kind }
    }
}
