//! 客户端配置
//!
//! 解析服务地址和请求超时时间，在构造 [`crate::transport::HttpClient`]
//! 时显式传入，不使用全局单例
//!
//! # JSON结构示例
//!
//! ```json
//! {
//!     "server_host": "http://127.0.0.1:8000",
//!     "timeout_ms": 60000
//! }
//! ```

use serde::{Deserialize, Serialize};

/// 默认解析服务地址
const DEFAULT_SERVER_HOST: &str = "http://127.0.0.1:8000";

/// 默认请求超时时间（毫秒）
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// 解析服务地址
    pub server_host: String,

    /// 请求超时时间（毫秒）
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// 创建指向指定服务地址的配置
    pub fn new(server_host: impl Into<String>) -> Self {
        Self {
            server_host: server_host.into(),
            ..Default::default()
        }
    }

    /// 从JSON字符串解析配置
    ///
    /// # 参数
    ///
    /// * `config_json` - JSON格式的配置字符串
    ///
    /// # 返回
    ///
    /// 解析后的 `ClientConfig`，如果解析失败返回默认配置
    pub fn from_json(config_json: &str) -> Self {
        if config_json.is_empty() {
            return Self::default();
        }

        match serde_json::from_str(config_json) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    "[Config] JSON解析失败: {}, 输入: {}",
                    e,
                    &config_json[..config_json.len().min(200)]
                );
                Self::default()
            }
        }
    }

    /// 从环境变量读取配置
    ///
    /// `PARSE_SERVER_HOST` 覆盖服务地址，`PARSE_TIMEOUT_MS` 覆盖超时时间，
    /// 未设置的项保持默认值
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("PARSE_SERVER_HOST") {
            if !host.is_empty() {
                config.server_host = host;
            }
        }

        if let Ok(timeout) = std::env::var("PARSE_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout_ms = ms,
                _ => tracing::warn!("[Config] PARSE_TIMEOUT_MS 无效: {}", timeout),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_host, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_ms, 60_000);
    }

    #[test]
    fn test_from_json() {
        let config = ClientConfig::from_json(
            r#"{"server_host": "http://10.0.0.2:9000", "timeout_ms": 30000}"#,
        );
        assert_eq!(config.server_host, "http://10.0.0.2:9000");
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn test_from_json_partial() {
        // 缺失字段取默认值
        let config = ClientConfig::from_json(r#"{"server_host": "http://10.0.0.2:9000"}"#);
        assert_eq!(config.server_host, "http://10.0.0.2:9000");
        assert_eq!(config.timeout_ms, 60_000);
    }

    #[test]
    fn test_from_json_invalid() {
        let config = ClientConfig::from_json("not json");
        assert_eq!(config, ClientConfig::default());

        let config = ClientConfig::from_json("");
        assert_eq!(config, ClientConfig::default());
    }
}
