// error.rs
// 定义拓扑构建通用的错误类型（IO、配置解析、参数校验等）和Result类型。
use std::io;
use thiserror::Error;

/// 拓扑构建通用错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    /// JSON 解析错误
    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),
    /// 调用参数不合法（如节点数量非正）
    #[error("参数错误: {0}")]
    InvalidArgument(String),
    /// 拓扑配置不合法
    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 通用结果类型
pub type Result<T> = std::result::Result<T, Error>;
