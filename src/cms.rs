use serde::Serialize;

pub mod memory;
pub mod wordpress;

pub use memory::MemoryStore;
pub use wordpress::WordpressStore;

#[derive(Debug)]
pub struct CmsError {
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    /// None when the feed author was never onboarded; the post is
    /// still created, unassigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<i64>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub email: String,
    pub url: String,
    pub display_name: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

/// The CMS is an external collaborator; the pipeline only ever talks
/// to it through this trait.
pub trait ContentStore {
    fn insert_post(&mut self, post: &NewPost) -> Result<i64, CmsError>;

    fn insert_user(&mut self, user: &NewUser) -> Result<i64, CmsError>;
}
