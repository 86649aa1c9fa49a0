// Core modules
// 核心模块
pub mod config;
pub mod core;
pub mod platforms;
pub mod transport;

// Re-export main types for easy access
// 重新导出主要类型以便轻松访问
pub use config::ClientConfig;
pub use core::{CanonicalWork, ClientError, Envelope, WorkStatistics};
pub use platforms::douyin::{DouyinApi, UserPostsPage};
pub use platforms::redbook::RedbookApi;
pub use transport::HttpClient;

// Initialize tracing for logging
// 初始化 tracing 用于日志输出
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_thread_ids(true)
        .with_target(false)
        .init();
}
