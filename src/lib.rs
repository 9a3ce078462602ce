// lib.rs
// 集群拓扑工作区入口，直接导出 topology 子 crate 的全部接口。
pub use topology::*;
