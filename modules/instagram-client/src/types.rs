use serde::Deserialize;

/// Response to a media container creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaContainer {
    pub id: String,
}

/// Response to a media_publish request.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedMedia {
    pub id: String,
}
