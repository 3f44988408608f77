use super::{CmsError, ContentStore, NewPost, NewUser};

/// Keeps inserted records in vectors and hands out sequential ids.
/// Used by `sync --dry-run` and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub posts: Vec<NewPost>,
    pub users: Vec<NewUser>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn insert_post(&mut self, post: &NewPost) -> Result<i64, CmsError> {
        self.posts.push(post.clone());

        Ok(self.posts.len() as i64)
    }

    fn insert_user(&mut self, user: &NewUser) -> Result<i64, CmsError> {
        if self.users.iter().any(|u| u.login == user.login) {
            let msg = format!("user already exists: {}", user.login);

            return Err(CmsError { msg });
        }

        self.users.push(user.clone());

        Ok(self.users.len() as i64)
    }
}
