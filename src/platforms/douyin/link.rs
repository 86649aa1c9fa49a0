//! 抖音链接解析工具
//!
//! 从分享链接中提取作品ID，从主页地址中提取 sec_user_id，
//! 从媒体地址中派生下载文件名

use once_cell::sync::Lazy;
use regex::Regex;

/// 视频链接中的作品ID
static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"video/(\d+)").unwrap());

/// 图文链接中的作品ID
static NOTE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"note/(\d+)").unwrap());

/// 主页路径中的用户ID
static SEC_USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/user/([^/?]+)").unwrap());

/// sec_user_id 固定前缀，用于校验提取结果
const SEC_UID_PREFIX: &str = "MS4wLjABAAAA";

/// 从分享链接中提取作品ID
///
/// 支持的链接格式：
/// - `https://www.douyin.com/video/7345678901234567890`
/// - `https://www.douyin.com/note/7345678901234567890`
///
/// # 返回
///
/// 作品ID，链接不匹配任何已知模式时返回 `None`
pub fn extract_item_id(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Some(caps) = VIDEO_ID_RE.captures(link) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = NOTE_ID_RE.captures(link) {
        return Some(caps[1].to_string());
    }

    tracing::warn!("[Link] URL格式不匹配任何已知模式: {}", link);
    None
}

/// 从抖音主页URL中提取 sec_user_id
///
/// 支持的URL格式：
/// - `https://www.douyin.com/user/MS4wLjABAAAA...`
///
/// 提取结果必须以 `MS4wLjABAAAA` 开头，否则视为无效
pub fn extract_sec_user_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || !url.contains("douyin.com/user/") {
        return None;
    }

    let sec_user_id = SEC_USER_ID_RE.captures(url)?.get(1)?.as_str();
    if sec_user_id.starts_with(SEC_UID_PREFIX) {
        Some(sec_user_id.to_string())
    } else {
        None
    }
}

/// 从媒体地址派生下载文件名
///
/// 取URL路径最后一段（百分号解码后），并去掉 `!` 之后的处理参数
pub fn filename_from_url(media_url: &str) -> String {
    let path = url::Url::parse(media_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| media_url.to_string());

    let basename = path.rsplit('/').next().unwrap_or("");
    let basename = basename.split('!').next().unwrap_or("");

    urlencoding::decode(basename)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| basename.to_string())
}
