//! HTTP传输客户端
//!
//! 负责与解析服务进行HTTP通信
//!
//! # 主要功能
//!
//! - 发送GET/POST/PUT/DELETE请求
//! - 文件上传（multipart）与二进制下载
//! - 请求/响应日志
//! - HTTP状态码到提示消息的映射
//! - 业务错误码检查（响应体内 `code` 非零视为失败）
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use media_parse_client::config::ClientConfig;
//! use media_parse_client::transport::HttpClient;
//!
//! # async fn demo() -> Result<(), media_parse_client::core::ClientError> {
//! let client = HttpClient::new(ClientConfig::default())?;
//! let body = client.get("/douyin/detail", None).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::core::{ClientError, Envelope};

/// 默认Content-Type
const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// HTTP传输客户端
///
/// 持有一个按配置构造的 `reqwest::Client`，
/// 配置在构造时传入并在客户端生命周期内固定
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// 客户端配置
    config: ClientConfig,
    /// 底层HTTP客户端
    inner: reqwest::Client,
}

impl HttpClient {
    /// 创建新的客户端实例
    ///
    /// # 参数
    ///
    /// * `config` - 客户端配置（服务地址、超时时间）
    ///
    /// # 错误
    ///
    /// 底层客户端构建失败时返回 `ClientError::Network`
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { config, inner })
    }

    /// 当前配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 发送GET请求
    ///
    /// # 参数
    ///
    /// * `path` - API端点路径
    /// * `params` - 查询参数，省略时视为空
    ///
    /// # 返回
    ///
    /// 解码后的JSON响应体
    pub async fn get(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<Value, ClientError> {
        let mut request = self.inner.get(self.url(path));
        if let Some(p) = params.filter(|p| !p.is_empty()) {
            request = request.query(&p);
        }
        self.execute(path, request).await
    }

    /// 发送POST请求
    ///
    /// # 参数
    ///
    /// * `path` - API端点路径
    /// * `data` - JSON请求体数据，省略时发送空对象
    pub async fn post(
        &self,
        path: &str,
        data: Option<HashMap<String, Value>>,
    ) -> Result<Value, ClientError> {
        let request = self.inner.post(self.url(path)).json(&data.unwrap_or_default());
        self.execute(path, request).await
    }

    /// 发送PUT请求
    pub async fn put(
        &self,
        path: &str,
        data: Option<HashMap<String, Value>>,
    ) -> Result<Value, ClientError> {
        let request = self.inner.put(self.url(path)).json(&data.unwrap_or_default());
        self.execute(path, request).await
    }

    /// 发送DELETE请求
    pub async fn delete(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<Value, ClientError> {
        let mut request = self.inner.delete(self.url(path));
        if let Some(p) = params.filter(|p| !p.is_empty()) {
            request = request.query(&p);
        }
        self.execute(path, request).await
    }

    /// 上传文件
    ///
    /// 使用 multipart/form-data 编码请求体
    ///
    /// # 参数
    ///
    /// * `path` - API端点路径
    /// * `form` - 表单数据
    pub async fn upload(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ClientError> {
        let request = self.inner.post(self.url(path)).multipart(form);
        self.execute(path, request).await
    }

    /// 下载文件
    ///
    /// 请求二进制响应，不做JSON解码和业务码检查
    ///
    /// # 参数
    ///
    /// * `path` - API端点路径
    /// * `params` - 查询参数
    ///
    /// # 返回
    ///
    /// 响应体字节
    pub async fn download(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<Vec<u8>, ClientError> {
        tracing::info!("[Http] 发起请求: {}", path);

        let mut request = self.inner.get(self.url(path));
        if let Some(p) = params.filter(|p| !p.is_empty()) {
            request = request.query(&p);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("[Http] 网络连接异常,请稍后再试! ({})", e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let msg = status_message(status);
            tracing::error!("[Http] 响应错误: {}", msg);
            return Err(ClientError::Http { status, msg });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        tracing::info!("[Http] 下载完成: {} 字节", bytes.len());
        Ok(bytes.to_vec())
    }

    /// 通用数据请求（POST）
    ///
    /// 发送请求后取出响应体的 `data` 字段并包装为统一返回结构，
    /// 任意失败都转换为 `code: -1` 的失败结果
    pub async fn post_data(
        &self,
        path: &str,
        data: Option<HashMap<String, Value>>,
    ) -> Envelope<Value> {
        match self.post(path, data).await {
            Ok(body) => envelope_from_body(body),
            Err(e) => {
                tracing::error!("[Http] 请求失败: {}", e);
                Envelope::fail(e.to_string())
            }
        }
    }

    /// 通用数据请求（GET）
    pub async fn get_data(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> Envelope<Value> {
        match self.get(path, params).await {
            Ok(body) => envelope_from_body(body),
            Err(e) => {
                tracing::error!("[Http] 请求失败: {}", e);
                Envelope::fail(e.to_string())
            }
        }
    }

    /// 构建完整URL
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server_host, path)
    }

    /// 发送请求并统一处理响应
    ///
    /// 流程：记录请求日志 → 发送 → 状态码检查 → JSON解码 → 业务码检查
    async fn execute(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ClientError> {
        tracing::info!("[Http] 发起请求: {}", path);

        // 预留鉴权头注入点
        // let request = request.header("Authorization", format!("Bearer {}", token));

        let response = request.send().await.map_err(|e| {
            tracing::error!("[Http] 网络连接异常,请稍后再试! ({})", e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let msg = status_message(status);
            tracing::error!("[Http] 响应错误: {}", msg);
            return Err(ClientError::Http { status, msg });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("[Http] 响应解析失败: {}", e);
            ClientError::Decode(e.to_string())
        })?;

        tracing::debug!("[Http] 响应数据: {}", body);

        // code存在且非零视为业务失败
        if let Some(code) = body.get("code").and_then(|v| v.as_i64()) {
            if code != 0 {
                let msg = body
                    .get("msg")
                    .and_then(|v| v.as_str())
                    .unwrap_or("请求失败")
                    .to_string();
                tracing::warn!("[Http] 业务错误: {}", msg);
                return Err(ClientError::Business { code, msg });
            }
        }

        Ok(body)
    }
}

/// 从业务成功的响应体构造统一返回结构
fn envelope_from_body(body: Value) -> Envelope<Value> {
    let msg = body
        .get("msg")
        .and_then(|v| v.as_str())
        .unwrap_or("成功")
        .to_string();
    let data = body.get("data").cloned().unwrap_or(Value::Null);
    Envelope::ok(data, msg)
}

/// HTTP状态码到提示消息的映射
///
/// 仅用于日志和提示展示，不参与控制流
pub fn status_message(status: u16) -> String {
    let msg = match status {
        400 => "请求错误(400)",
        401 => "未授权，请重新登录(401)",
        403 => "拒绝访问(403)",
        404 => "请求出错(404)",
        408 => "请求超时(408)",
        500 => "服务器错误(500)",
        501 => "服务未实现(501)",
        502 => "网络错误(502)",
        503 => "服务不可用(503)",
        504 => "网络超时(504)",
        505 => "HTTP版本不受支持(505)",
        other => return format!("连接出错({})!", other),
    };
    msg.to_string()
}
