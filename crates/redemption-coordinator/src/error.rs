//! 兑换协调器错误类型定义

use std::fmt;

/// 余额已写入之后失败的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    WriteQuantity,
    AppendHistory,
}

impl FlowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WriteQuantity => "write_quantity",
            Self::AppendHistory => "append_history",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 兑换协调器错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("二维码内容无效: {0}")]
    InvalidPayload(String),

    #[error("二维码 {0} 已被扫描")]
    DuplicateScan(String),

    #[error("积分不足: 需要 {required}，当前 {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("权益 {0} 已无库存")]
    OutOfStock(String),

    #[error("{service} 返回 {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{service} 请求失败: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{flow} 在步骤 {step} 失败（已补偿: {compensated}）: {source}")]
    PartialFailure {
        flow: &'static str,
        step: FlowStep,
        compensated: bool,
        compensation_error: Option<String>,
        #[source]
        source: Box<CoordinatorError>,
    },
}

impl CoordinatorError {
    /// 是否为瞬时故障（网络错误或上游 5xx），仅用于读操作重试
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// 上游返回的 HTTP 状态码
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 命令行退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPayload(_) => 2,
            Self::DuplicateScan(_) | Self::InsufficientPoints { .. } | Self::OutOfStock(_) => 3,
            Self::Upstream { .. } | Self::Transport { .. } => 4,
            Self::PartialFailure { .. } => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
