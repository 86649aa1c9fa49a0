//! 抖音平台模块
//!
//! 提供抖音作品解析相关的API封装
//!
//! # 模块结构
//!
//! - [`link`] - 分享链接/主页地址解析
//! - [`normalizer`] - 作品数据规范化（核心逻辑）

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::core::{CanonicalWork, ClientError, Envelope};
use crate::transport::HttpClient;

/// 链接解析模块
pub mod link;

/// 作品数据规范化模块
pub mod normalizer;

/// 用户作品列表页
///
/// `works` 保持后端返回顺序；解析失败的条目被跳过并计入 `skipped`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPostsPage {
    /// 规范化后的作品列表
    pub works: Vec<CanonicalWork>,
    /// 解析失败被跳过的条目数
    pub skipped: usize,
    /// 下一页游标
    pub max_cursor: i64,
    /// 是否还有更多
    pub has_more: bool,
}

/// 抖音API封装
///
/// 持有一个显式构造的 [`HttpClient`]，所有操作返回统一的 [`Envelope`]
#[derive(Debug, Clone)]
pub struct DouyinApi {
    /// HTTP传输客户端
    http: HttpClient,
}

impl DouyinApi {
    /// 创建新的API实例
    ///
    /// # 参数
    ///
    /// * `config` - 客户端配置
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// 使用已有的传输客户端创建实例
    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }

    /// 获取抖音作品信息
    ///
    /// 从分享链接中提取作品ID，请求解析服务并规范化返回数据
    ///
    /// # 参数
    ///
    /// * `share_link` - 作品分享链接（视频或图文）
    ///
    /// # 返回
    ///
    /// 规范化后的作品数据；链接无效、必要字段缺失或
    /// 媒体内容为空时返回 `code: -1`
    pub async fn get_detail(&self, share_link: &str) -> Envelope<CanonicalWork> {
        let item_id = match link::extract_item_id(share_link) {
            Some(id) => id,
            None => {
                return ClientError::InvalidLink(share_link.to_string()).into();
            }
        };
        tracing::info!("[Douyin] 解析作品, item_id: {}", item_id);

        let mut params = HashMap::new();
        params.insert("id".to_string(), item_id);

        let body = match self.http.get("/douyin/detail", Some(params)).await {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let item = body.get("data").cloned().unwrap_or(Value::Null);

        let work = match normalizer::normalize_work(&item) {
            Ok(work) => work,
            Err(e) => return e.into(),
        };

        // 视频地址与图片列表都为空视为解析失败
        if work.url.is_empty() && work.images.is_empty() {
            tracing::error!("[Douyin] 视频URL和图片列表都为空");
            return ClientError::EmptyMedia.into();
        }

        Envelope::ok(work, "解析成功")
    }

    /// 获取抖音用户作品列表
    ///
    /// 列表中每条作品独立规范化，单条失败不影响整页结果
    ///
    /// # 参数
    ///
    /// * `sec_user_id` - 用户ID（主页地址中的 `MS4wLjABAAAA...`）
    /// * `max_cursor` - 分页游标，0 表示第一页
    pub async fn get_user_posts(
        &self,
        sec_user_id: &str,
        max_cursor: i64,
    ) -> Envelope<UserPostsPage> {
        tracing::info!(
            "[Douyin] 获取用户作品列表, sec_user_id: {}, max_cursor: {}",
            sec_user_id,
            max_cursor
        );

        let mut data = HashMap::new();
        data.insert(
            "sec_user_id".to_string(),
            Value::String(sec_user_id.to_string()),
        );
        data.insert("max_cursor".to_string(), Value::from(max_cursor));

        let body = match self.http.post("/douyin/getDouyinUserList", Some(data)).await {
            Ok(body) => body,
            Err(e) => return e.into(),
        };

        let list = body
            .pointer("/data/aweme_list")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut works = Vec::new();
        let mut skipped = 0;
        for result in normalizer::normalize_batch(&list) {
            match result {
                Ok(work) => works.push(work),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("[Douyin] 单条作品解析失败: {}", e);
                }
            }
        }
        tracing::info!(
            "[Douyin] 作品列表解析完成: 成功 {}, 跳过 {}",
            works.len(),
            skipped
        );

        let page = UserPostsPage {
            works,
            skipped,
            max_cursor: body
                .pointer("/data/max_cursor")
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
            has_more: body
                .pointer("/data/has_more")
                .and_then(|v| v.as_i64())
                .unwrap_or(0)
                != 0,
        };

        Envelope::ok(page, "解析成功")
    }

    /// 搜索作品
    ///
    /// 透传解析服务的搜索结果，不做数据转换
    pub async fn search(&self, keyword: &str) -> Envelope<Value> {
        let mut params = HashMap::new();
        params.insert("keyword".to_string(), keyword.to_string());
        self.http.get_data("/douyin/search", Some(params)).await
    }

    /// 获取用户信息
    ///
    /// 透传解析服务的用户信息，不做数据转换
    pub async fn get_user(&self, sec_user_id: &str) -> Envelope<Value> {
        let mut params = HashMap::new();
        params.insert("sec_user_id".to_string(), sec_user_id.to_string());
        self.http.get_data("/douyin/user", Some(params)).await
    }

    /// 下载媒体文件
    ///
    /// 通过解析服务代理下载作品的视频/图片内容
    ///
    /// # 参数
    ///
    /// * `media_url` - 规范化结果中的媒体地址（`videoUrl` / `images` 项）
    ///
    /// # 返回
    ///
    /// 文件内容字节
    pub async fn download_file(&self, media_url: &str) -> Result<Vec<u8>, ClientError> {
        let mut params = HashMap::new();
        params.insert("url".to_string(), media_url.to_string());
        self.http.download("/douyin/file/getVideo", Some(params)).await
    }
}
