//! 小红书平台模块
//!
//! 解析服务的小红书接口只做代理转发，本模块不做数据转换，
//! 响应以统一返回结构透传给调用方

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::core::{ClientError, Envelope};
use crate::transport::HttpClient;

/// 小红书API封装
#[derive(Debug, Clone)]
pub struct RedbookApi {
    /// HTTP传输客户端
    http: HttpClient,
}

impl RedbookApi {
    /// 创建新的API实例
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// 使用已有的传输客户端创建实例
    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }

    /// 获取小红书笔记信息
    pub async fn get_note_info(&self, data: HashMap<String, Value>) -> Envelope<Value> {
        self.http.post_data("/redbook/getNoteInfo", Some(data)).await
    }

    /// 获取小红书用户信息
    pub async fn get_profile_info(&self, data: HashMap<String, Value>) -> Envelope<Value> {
        self.http.post_data("/redbook/getProfileInfo", Some(data)).await
    }

    /// 获取小红书用户笔记列表
    pub async fn get_note_list(&self, data: HashMap<String, Value>) -> Envelope<Value> {
        self.http.post_data("/redbook/getNoteList", Some(data)).await
    }
}
