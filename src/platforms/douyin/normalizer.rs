//! 作品数据规范化
//!
//! 将抖音返回的原始作品JSON（嵌套、字段随帖子类型不定缺失）
//! 映射为前端消费的扁平结构 [`CanonicalWork`]
//!
//! # 映射规则
//!
//! - `author` / `statistics` 缺失时立即失败，其余字段缺失一律退化为空串/空列表
//! - 作品主页URL由 `aweme_id` 构造，播放地址取码率列表第一个变体
//! - 标题删除文件名非法字符（下载时直接用作文件名）
//! - `create_time` 由秒转换为毫秒

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::{CanonicalWork, ClientError, WorkStatistics};

/// 文件名非法字符集（直接删除，不做替换）
static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\\\n\r/:*?"<>|]"#).unwrap());

/// 作品主页URL前缀
const VIDEO_HOME_PREFIX: &str = "https://www.douyin.com/video/";

/// 用户主页URL前缀
const USER_HOME_PREFIX: &str = "https://www.douyin.com/user/";

/// 规范化单条作品数据
///
/// # 参数
///
/// * `item` - 原始作品JSON（`/douyin/detail` 的 `data` 字段或
///   用户作品列表 `aweme_list` 的单个元素）
///
/// # 返回
///
/// 规范化后的作品数据
///
/// # 错误
///
/// `author` 或 `statistics` 缺失时返回 `ClientError::MissingField`，
/// 其余字段在任意嵌套层级缺失都不报错，退化为空值
pub fn normalize_work(item: &Value) -> Result<CanonicalWork, ClientError> {
    // author 与 statistics 是所有下游字段的前置条件
    let author = match item.get("author").filter(|v| !v.is_null()) {
        Some(v) => v,
        None => {
            tracing::error!("[Normalize] 缺少必要的数据字段: author");
            return Err(ClientError::MissingField("author"));
        }
    };
    let stats = match item.get("statistics").filter(|v| !v.is_null()) {
        Some(v) => v,
        None => {
            tracing::error!("[Normalize] 缺少必要的数据字段: statistics");
            return Err(ClientError::MissingField("statistics"));
        }
    };

    let music = item.get("music");
    let video = item.get("video");

    // 作者标识：unique_id → short_id → 音乐归属人，取第一个非空值
    let unique_id = [
        author.get("unique_id"),
        author.get("short_id"),
        music.and_then(|m| m.get("owner_handle")),
    ]
    .into_iter()
    .flatten()
    .filter_map(|v| v.as_str())
    .find(|s| !s.is_empty())
    .unwrap_or("")
    .to_string();

    let sec_uid = str_field(author, "sec_uid");
    let userhome = if sec_uid.is_empty() {
        String::new()
    } else {
        format!("{}{}", USER_HOME_PREFIX, sec_uid)
    };

    // aweme_type 数值化后为 0 视为视频，其余（真正非零）视为图集
    let work_type = if coerce_i64(item.get("aweme_type")) == 0 {
        "视频"
    } else {
        "图集"
    }
    .to_string();

    // 图集：每张图取地址列表第一项，过滤空串
    let images: Vec<String> = item
        .get("images")
        .and_then(|v| v.as_array())
        .map(|list| {
            list.iter()
                .map(first_url)
                .filter(|u| !u.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let video_id = id_string(item.get("aweme_id"));
    let url = if video_id.is_empty() {
        String::new()
    } else {
        format!("{}{}", VIDEO_HOME_PREFIX, video_id)
    };

    // 播放地址与封面：任意层级缺失都退化为空串
    let video_url = video
        .and_then(|v| v.get("bit_rate"))
        .and_then(|v| v.as_array())
        .and_then(|v| v.first())
        .and_then(|v| v.get("play_addr"))
        .map(first_url)
        .unwrap_or_default();
    let note_cover = video.and_then(|v| v.get("cover")).map(first_url).unwrap_or_default();

    let title = INVALID_CHARS
        .replace_all(item.get("desc").and_then(|v| v.as_str()).unwrap_or(""), "")
        .into_owned();

    let statistics = WorkStatistics {
        collect_count: coerce_i64(stats.get("collect_count")),
        digg_count: coerce_i64(stats.get("digg_count")),
        share_count: coerce_i64(stats.get("share_count")),
        comment_count: coerce_i64(stats.get("comment_count")),
    };

    let release_time = coerce_i64(item.get("create_time")) * 1000;

    Ok(CanonicalWork {
        url,
        work_type,
        title,
        video_url,
        note_cover,
        music_url: music
            .and_then(|m| m.get("play_url"))
            .map(|p| str_field(p, "uri"))
            .unwrap_or_default(),
        music_title: music.map(|m| str_field(m, "title")).unwrap_or_default(),
        nickname: str_field(author, "nickname"),
        signature: str_field(author, "signature"),
        userhome,
        unique_id,
        video_id,
        images,
        collection_count: statistics.collect_count,
        like_count: statistics.digg_count,
        share_count: statistics.share_count,
        comment_count: statistics.comment_count,
        statistics,
        release_time,
    })
}

/// 批量规范化作品列表
///
/// 每条作品独立解析，单条失败不影响其余条目；
/// 结果顺序与输入顺序一致
pub fn normalize_batch(items: &[Value]) -> Vec<Result<CanonicalWork, ClientError>> {
    items.iter().map(normalize_work).collect()
}

/// 取对象内字符串字段，缺失时返回空串
fn str_field(obj: &Value, key: &str) -> String {
    obj.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

/// 取 `url_list` 第一项
fn first_url(obj: &Value) -> String {
    obj.get("url_list")
        .and_then(|v| v.as_array())
        .and_then(|v| v.first())
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// 作品ID转字符串，保持原始内容
fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 数值化：接受数字和数字字符串，其余（含缺失）视为 0
fn coerce_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 构造一条字段齐全的作品数据
    fn full_item() -> Value {
        json!({
            "aweme_id": "7345678901234567890",
            "aweme_type": 0,
            "desc": "测试视频",
            "create_time": 1700000000,
            "author": {
                "unique_id": "tester",
                "short_id": "10001",
                "nickname": "测试作者",
                "signature": "每天一条",
                "sec_uid": "MS4wLjABAAAAabc123"
            },
            "music": {
                "play_url": { "uri": "https://music.example.com/1.mp3" },
                "title": "原声",
                "owner_handle": "music_owner"
            },
            "video": {
                "bit_rate": [
                    { "play_addr": { "url_list": ["https://v.example.com/hd.mp4", "https://v.example.com/hd2.mp4"] } },
                    { "play_addr": { "url_list": ["https://v.example.com/sd.mp4"] } }
                ],
                "cover": { "url_list": ["https://p.example.com/cover.jpg"] }
            },
            "statistics": {
                "collect_count": 11,
                "digg_count": 22,
                "share_count": 33,
                "comment_count": 44
            }
        })
    }

    #[test]
    fn test_normalize_full_item() {
        let work = normalize_work(&full_item()).unwrap();

        assert_eq!(work.url, "https://www.douyin.com/video/7345678901234567890");
        assert_eq!(work.work_type, "视频");
        assert_eq!(work.title, "测试视频");
        assert_eq!(work.video_url, "https://v.example.com/hd.mp4");
        assert_eq!(work.note_cover, "https://p.example.com/cover.jpg");
        assert_eq!(work.music_url, "https://music.example.com/1.mp3");
        assert_eq!(work.music_title, "原声");
        assert_eq!(work.nickname, "测试作者");
        assert_eq!(work.signature, "每天一条");
        assert_eq!(work.userhome, "https://www.douyin.com/user/MS4wLjABAAAAabc123");
        assert_eq!(work.unique_id, "tester");
        assert_eq!(work.video_id, "7345678901234567890");
        assert!(work.images.is_empty());
        assert_eq!(work.release_time, 1700000000000);
        assert_eq!(work.collection_count, 11);
        assert_eq!(work.like_count, 22);
        assert_eq!(work.share_count, 33);
        assert_eq!(work.comment_count, 44);
    }

    #[test]
    fn test_missing_author_fails() {
        let mut item = full_item();
        item.as_object_mut().unwrap().remove("author");
        match normalize_work(&item) {
            Err(ClientError::MissingField(field)) => assert_eq!(field, "author"),
            other => panic!("期望 MissingField, 得到 {:?}", other),
        }
    }

    #[test]
    fn test_missing_statistics_fails() {
        let mut item = full_item();
        item.as_object_mut().unwrap().remove("statistics");
        assert!(matches!(
            normalize_work(&item),
            Err(ClientError::MissingField("statistics"))
        ));
    }

    #[test]
    fn test_null_substructure_fails() {
        let mut item = full_item();
        item["author"] = Value::Null;
        assert!(normalize_work(&item).is_err());
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(normalize_work(&Value::Null).is_err());
        assert!(normalize_work(&json!({})).is_err());
    }

    #[test]
    fn test_type_classification() {
        let mut item = full_item();

        item["aweme_type"] = json!(0);
        assert_eq!(normalize_work(&item).unwrap().work_type, "视频");

        item["aweme_type"] = json!(2);
        assert_eq!(normalize_work(&item).unwrap().work_type, "图集");

        item["aweme_type"] = json!(68);
        assert_eq!(normalize_work(&item).unwrap().work_type, "图集");

        // 数字字符串同样参与数值化
        item["aweme_type"] = json!("0");
        assert_eq!(normalize_work(&item).unwrap().work_type, "视频");

        item["aweme_type"] = json!("2");
        assert_eq!(normalize_work(&item).unwrap().work_type, "图集");

        // 缺失时数值化为 0，仍视为视频
        item.as_object_mut().unwrap().remove("aweme_type");
        assert_eq!(normalize_work(&item).unwrap().work_type, "视频");
    }

    #[test]
    fn test_title_sanitization() {
        let mut item = full_item();
        item["desc"] = json!("a\\b/c:d*e?f\"g<h>i|j\nk\rl");
        let work = normalize_work(&item).unwrap();
        // 非法字符被删除而不是替换
        assert_eq!(work.title, "abcdefghijkl");

        item["desc"] = json!("正常 标题。");
        assert_eq!(normalize_work(&item).unwrap().title, "正常 标题。");

        item.as_object_mut().unwrap().remove("desc");
        assert_eq!(normalize_work(&item).unwrap().title, "");
    }

    #[test]
    fn test_unique_id_fallback_chain() {
        let mut item = full_item();

        // unique_id 为空串时继续回退
        item["author"]["unique_id"] = json!("");
        assert_eq!(normalize_work(&item).unwrap().unique_id, "10001");

        item["author"].as_object_mut().unwrap().remove("short_id");
        assert_eq!(normalize_work(&item).unwrap().unique_id, "music_owner");

        item["music"].as_object_mut().unwrap().remove("owner_handle");
        assert_eq!(normalize_work(&item).unwrap().unique_id, "");
    }

    #[test]
    fn test_userhome_absent_sec_uid() {
        let mut item = full_item();
        item["author"].as_object_mut().unwrap().remove("sec_uid");
        assert_eq!(normalize_work(&item).unwrap().userhome, "");
    }

    #[test]
    fn test_video_url_absence_degrades() {
        let mut item = full_item();

        item["video"]["bit_rate"] = json!([]);
        assert_eq!(normalize_work(&item).unwrap().video_url, "");

        item["video"]["bit_rate"] = json!([{ "play_addr": { "url_list": [] } }]);
        assert_eq!(normalize_work(&item).unwrap().video_url, "");

        item["video"].as_object_mut().unwrap().remove("bit_rate");
        assert_eq!(normalize_work(&item).unwrap().video_url, "");

        item.as_object_mut().unwrap().remove("video");
        let work = normalize_work(&item).unwrap();
        assert_eq!(work.video_url, "");
        assert_eq!(work.note_cover, "");
    }

    #[test]
    fn test_cover_absence_degrades() {
        let mut item = full_item();
        item["video"]["cover"] = json!({ "url_list": [] });
        assert_eq!(normalize_work(&item).unwrap().note_cover, "");

        item["video"].as_object_mut().unwrap().remove("cover");
        assert_eq!(normalize_work(&item).unwrap().note_cover, "");
    }

    #[test]
    fn test_image_extraction() {
        let mut item = full_item();
        item["aweme_type"] = json!(68);
        item["images"] = json!([
            { "url_list": ["https://p.example.com/1.jpg"] },
            { "url_list": [] },
            {},
            { "url_list": ["https://p.example.com/2.jpg", "https://p.example.com/2b.jpg"] }
        ]);

        let work = normalize_work(&item).unwrap();
        // 每张图取第一项，空串被过滤
        assert_eq!(
            work.images,
            vec![
                "https://p.example.com/1.jpg".to_string(),
                "https://p.example.com/2.jpg".to_string()
            ]
        );
    }

    #[test]
    fn test_statistics_defaults() {
        let mut item = full_item();
        item["statistics"] = json!({ "digg_count": 5 });
        let work = normalize_work(&item).unwrap();

        assert_eq!(work.like_count, 5);
        assert_eq!(work.collection_count, 0);
        assert_eq!(work.share_count, 0);
        assert_eq!(work.comment_count, 0);
        // 顶层计数与嵌套统计保持一致
        assert_eq!(work.statistics.digg_count, work.like_count);
        assert_eq!(work.statistics.collect_count, work.collection_count);
        assert_eq!(work.statistics.share_count, work.share_count);
        assert_eq!(work.statistics.comment_count, work.comment_count);
    }

    #[test]
    fn test_release_time_conversion() {
        let mut item = full_item();
        item["create_time"] = json!(1620000000);
        assert_eq!(normalize_work(&item).unwrap().release_time, 1620000000000);

        item.as_object_mut().unwrap().remove("create_time");
        assert_eq!(normalize_work(&item).unwrap().release_time, 0);
    }

    #[test]
    fn test_numeric_aweme_id() {
        let mut item = full_item();
        item["aweme_id"] = json!(7345678901234567890i64);
        let work = normalize_work(&item).unwrap();
        assert_eq!(work.video_id, "7345678901234567890");
        assert_eq!(work.url, "https://www.douyin.com/video/7345678901234567890");

        item.as_object_mut().unwrap().remove("aweme_id");
        let work = normalize_work(&item).unwrap();
        assert_eq!(work.video_id, "");
        assert_eq!(work.url, "");
    }

    #[test]
    fn test_idempotence() {
        let item = full_item();
        let first = normalize_work(&item).unwrap();
        let second = normalize_work(&item).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_minimal_example() {
        // 最小输入样例：仅作者、单个计数和标题
        let item = json!({
            "author": { "unique_id": "abc" },
            "statistics": { "digg_count": 5 },
            "aweme_type": 0,
            "aweme_id": "123",
            "desc": "Hi/there"
        });

        let work = normalize_work(&item).unwrap();
        assert_eq!(work.unique_id, "abc");
        assert_eq!(work.work_type, "视频");
        assert_eq!(work.title, "Hithere");
        assert_eq!(work.url, "https://www.douyin.com/video/123");
        assert_eq!(work.like_count, 5);
        assert_eq!(work.release_time, 0);
        assert_eq!(work.video_url, "");
        assert!(work.images.is_empty());
    }

    #[test]
    fn test_normalize_batch_order_and_isolation() {
        let first = full_item();
        let broken = json!({ "desc": "没有作者" });
        let mut third = full_item();
        third["aweme_id"] = json!("999");

        let results = normalize_batch(&[first, broken, third]);
        assert_eq!(results.len(), 3);
        // 顺序与输入一致，单条失败不影响其余条目
        assert_eq!(
            results[0].as_ref().unwrap().video_id,
            "7345678901234567890"
        );
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().video_id, "999");
    }

    #[test]
    fn test_normalize_batch_empty() {
        assert!(normalize_batch(&[]).is_empty());
    }
}
