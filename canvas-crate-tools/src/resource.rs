use std::path::{Path, PathBuf};

/// 统一路径管理
///
/// 所有路径基于工作区根目录（通过 `CARGO_MANIFEST_DIR` 推导）。
///
/// # 使用示例
/// ```ignore
/// let config = CanvasPath::config_path("interop.toml"); // config/interop.toml
/// ```
pub struct CanvasPath {}
impl CanvasPath {
    /// 获取 `config/` 目录下的文件路径
    pub fn config_path(filename: &str) -> PathBuf {
        Self::workspace_path().join("config").join(filename)
    }

    /// 获取工作区根目录
    pub fn workspace_path() -> PathBuf {
        // 从 canvas-crate-tools 到 workspace root
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
    }
}
