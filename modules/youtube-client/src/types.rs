use serde::Deserialize;

/// Envelope shared by search.list and videos.list responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// One item from search.list with `part=id`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchResultId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: Option<String>,
}

/// One item from videos.list with `part=snippet,statistics`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Engagement counters. The API serializes these as decimal strings and
/// omits fields the channel has hidden (e.g. like counts).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

impl Statistics {
    pub fn views(&self) -> i64 {
        parse_count(&self.view_count)
    }

    pub fn likes(&self) -> i64 {
        parse_count(&self.like_count)
    }

    pub fn comments(&self) -> i64 {
        parse_count(&self.comment_count)
    }
}

/// Missing or malformed counters read as zero.
fn parse_count(raw: &Option<String>) -> i64 {
    raw.as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_default_to_zero_when_absent() {
        let stats: Statistics = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.views(), 0);
        assert_eq!(stats.likes(), 0);
        assert_eq!(stats.comments(), 0);
    }

    #[test]
    fn statistics_parse_decimal_strings() {
        let stats: Statistics = serde_json::from_str(
            r#"{"viewCount": "1200", "likeCount": "34", "commentCount": "5"}"#,
        )
        .unwrap();
        assert_eq!(stats.views(), 1200);
        assert_eq!(stats.likes(), 34);
        assert_eq!(stats.comments(), 5);
    }

    #[test]
    fn video_item_tolerates_missing_statistics() {
        let item: VideoItem = serde_json::from_str(
            r#"{"id": "abc123", "snippet": {"title": "t", "description": "d"}}"#,
        )
        .unwrap();
        assert_eq!(item.statistics.views(), 0);
    }
}
