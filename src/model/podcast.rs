//! Podcast entity and its crawler-maintained metadata

/// A podcast row as held by the record store
///
/// `rss` is fixed once the podcast is registered; every other metadata field
/// is rewritten from the feed on each `update_podcast_info` crawl.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Podcast {
    pub id: i64,
    pub rss: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub website: Option<String>,
    pub itunes_owner_name: Option<String>,
    pub itunes_owner_email: Option<String>,
    pub itunes_explicit: Option<bool>,
    pub itunes_subtitle: Option<String>,
    pub itunes_summary: Option<String>,
    pub itunes_author: Option<String>,
    pub itunes_image: Option<String>,
}

impl Podcast {
    /// Creates a podcast that has not been crawled yet
    pub fn new(id: i64, title: impl Into<String>, rss: impl Into<String>) -> Self {
        Self {
            id,
            rss: rss.into(),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Title used in diagnostics; empty when the feed never provided one
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Overwrites all eleven metadata fields with `attrs`
    pub fn apply(&mut self, attrs: &PodcastAttributes) {
        self.title = attrs.title.clone();
        self.description = attrs.description.clone();
        self.language = attrs.language.clone();
        self.website = attrs.website.clone();
        self.itunes_owner_name = attrs.itunes_owner_name.clone();
        self.itunes_owner_email = attrs.itunes_owner_email.clone();
        self.itunes_explicit = attrs.itunes_explicit;
        self.itunes_subtitle = attrs.itunes_subtitle.clone();
        self.itunes_summary = attrs.itunes_summary.clone();
        self.itunes_author = attrs.itunes_author.clone();
        self.itunes_image = attrs.itunes_image.clone();
    }

    /// Current metadata as an attribute record
    pub fn attributes(&self) -> PodcastAttributes {
        PodcastAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            language: self.language.clone(),
            website: self.website.clone(),
            itunes_owner_name: self.itunes_owner_name.clone(),
            itunes_owner_email: self.itunes_owner_email.clone(),
            itunes_explicit: self.itunes_explicit,
            itunes_subtitle: self.itunes_subtitle.clone(),
            itunes_summary: self.itunes_summary.clone(),
            itunes_author: self.itunes_author.clone(),
            itunes_image: self.itunes_image.clone(),
        }
    }
}

/// The full set of podcast metadata written in a single update
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodcastAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub website: Option<String>,
    pub itunes_owner_name: Option<String>,
    pub itunes_owner_email: Option<String>,
    pub itunes_explicit: Option<bool>,
    pub itunes_subtitle: Option<String>,
    pub itunes_summary: Option<String>,
    pub itunes_author: Option<String>,
    pub itunes_image: Option<String>,
}
