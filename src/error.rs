use std::path::PathBuf;
use thiserror::Error;

/// 需要由執行檔轉換為結束代碼的錯誤
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("找不到必要的外部工具: {}", .missing.join(", "))]
    ToolsMissing { missing: Vec<String> },

    #[error("找不到輸入檔案: {}", .0.display())]
    InputNotFound(PathBuf),
}

impl HighlightError {
    /// 對應的行程結束代碼
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ToolsMissing { .. } => 1,
            Self::InputNotFound(_) => 2,
        }
    }
}
