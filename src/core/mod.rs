// Core module - error taxonomy, envelope and canonical work types
// 核心模块：错误类型、统一返回结构、规范化作品数据

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 客户端错误
///
/// 覆盖传输层、业务层和数据解析层的所有失败情况，
/// 内部统一使用 `Result<_, ClientError>` 传播，
/// 只在公开API边界转换为 [`Envelope`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// 请求未能完成（连接失败、超时、响应读取失败）
    #[error("网络连接异常,请稍后再试!")]
    Network(String),

    /// 服务器返回非 2xx 状态码
    #[error("{msg}")]
    Http { status: u16, msg: String },

    /// 2xx 响应体内携带非零业务错误码
    #[error("{msg}")]
    Business { code: i64, msg: String },

    /// 响应体无法解析为JSON
    #[error("响应数据解析失败")]
    Decode(String),

    /// 作品数据缺少必要字段（author / statistics）
    #[error("数据解析失败：缺少必要字段")]
    MissingField(&'static str),

    /// 作品数据结构完整但没有可用的媒体内容
    #[error("解析失败：未找到媒体内容")]
    EmptyMedia,

    /// 链接中未找到作品ID或用户ID
    #[error("链接解析失败: {0}")]
    InvalidLink(String),
}

/// 统一返回结构
///
/// 所有公开API操作都返回该结构：
/// `code` 为 0 表示成功，-1 表示任意失败（缺字段、无媒体、网络/业务错误）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// 0 = 成功; -1 = 失败
    pub code: i32,
    /// 成功时的数据，失败时为 null
    pub data: Option<T>,
    /// 提示消息
    pub msg: String,
}

impl<T> Envelope<T> {
    /// 构造成功结果
    pub fn ok(data: T, msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            data: Some(data),
            msg: msg.into(),
        }
    }

    /// 构造失败结果
    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            code: -1,
            data: None,
            msg: msg.into(),
        }
    }

    /// 是否成功
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

impl<T> From<ClientError> for Envelope<T> {
    fn from(e: ClientError) -> Self {
        Envelope::fail(e.to_string())
    }
}

/// 作品统计数据
///
/// 四个计数缺失时均默认为 0
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkStatistics {
    /// 收藏数
    pub collect_count: i64,
    /// 点赞数
    pub digg_count: i64,
    /// 分享数
    pub share_count: i64,
    /// 评论数
    pub comment_count: i64,
}

/// 规范化后的作品数据
///
/// 由 [`crate::platforms::douyin::normalizer`] 从原始作品JSON构造，
/// 字段名按前端消费的格式序列化（`videoUrl`、`noteCover` 等）
///
/// 四个顶层计数始终与 `statistics` 内的对应字段相等
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalWork {
    /// 作品主页URL（由作品ID构造），无ID时为空串
    pub url: String,
    /// 作品类型："视频" 或 "图集"
    #[serde(rename = "type")]
    pub work_type: String,
    /// 清洗掉文件名非法字符后的标题
    pub title: String,
    /// 码率列表第一个变体的播放地址，缺失时为空串
    pub video_url: String,
    /// 封面图地址，缺失时为空串
    pub note_cover: String,
    /// 背景音乐播放地址
    pub music_url: String,
    /// 背景音乐标题
    pub music_title: String,
    /// 作者昵称
    pub nickname: String,
    /// 作者签名
    pub signature: String,
    /// 作者主页URL（由 sec_uid 构造），缺失时为空串
    pub userhome: String,
    /// 作者唯一标识（unique_id → short_id → 音乐归属人，取第一个非空值）
    pub unique_id: String,
    /// 原始作品ID，未做任何修改
    pub video_id: String,
    /// 图集图片地址列表，已过滤空串
    pub images: Vec<String>,
    /// 统计数据
    pub statistics: WorkStatistics,
    /// 发布时间（Unix毫秒），缺失时为 0
    pub release_time: i64,
    /// 收藏数（= statistics.collect_count）
    pub collection_count: i64,
    /// 点赞数（= statistics.digg_count）
    pub like_count: i64,
    /// 分享数（= statistics.share_count）
    pub share_count: i64,
    /// 评论数（= statistics.comment_count）
    pub comment_count: i64,
}
