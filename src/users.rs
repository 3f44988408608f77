use crate::cms::{CmsError, ContentStore, NewUser};
use crate::creators_api::{ApiError, CreatorsApi, FeatureDetails};
use crate::settings::{Settings, SettingsStore, StoreError};
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

const GENERATED_PASSWORD_LENGTH: usize = 24;

static AUTHOR_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static HTML_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

// Unbounded, unlike the item filter's 2-4 character rule. The two
// patterns are kept separate on purpose.
fn author_code_regex() -> &'static Regex {
    AUTHOR_CODE_REGEX.get_or_init(|| Regex::new("([a-z0-9]+)@").unwrap())
}

fn html_tag_regex() -> &'static Regex {
    HTML_TAG_REGEX.get_or_init(|| Regex::new("<[^>]*>").unwrap())
}

/// Maps a raw feed author string to a local user id. Mapped entries are
/// authoritative; an unmapped code resolves to None and is never
/// re-resolved here.
pub fn resolve(settings: &Settings, author: &str) -> Option<i64> {
    let captures = author_code_regex().captures(author)?;

    settings.user_ids.get(&captures[1]).copied()
}

#[derive(Debug)]
pub enum OnboardError {
    LookupFailed { msg: String },
    UserCreationFailed { msg: String },
    StoreError { msg: String },
}

impl From<ApiError> for OnboardError {
    fn from(error: ApiError) -> Self {
        OnboardError::LookupFailed { msg: error.msg }
    }
}

impl From<CmsError> for OnboardError {
    fn from(error: CmsError) -> Self {
        OnboardError::UserCreationFailed { msg: error.msg }
    }
}

impl From<StoreError> for OnboardError {
    fn from(error: StoreError) -> Self {
        OnboardError::StoreError { msg: error.msg }
    }
}

/// One-time creation of the local user for a feature code: looks the
/// feature up, inserts the user into the CMS and records the mapping.
pub fn onboard(
    file_code: &str,
    api: &CreatorsApi,
    store: &SettingsStore,
    cms: &mut dyn ContentStore,
) -> Result<i64, OnboardError> {
    let feature = api.feature_details(file_code)?;
    let user = build_user(&feature);

    let user_id = cms.insert_user(&user)?;

    let mut settings = store.load()?;
    settings.user_ids.insert(file_code.to_string(), user_id);
    store.save(&settings)?;

    log::info!("onboarded feature {file_code} as user {user_id}");

    Ok(user_id)
}

/// Onboards every enabled feature code that has no user mapping yet.
/// Individual failures are logged and skipped so one bad feature does
/// not block the rest. Returns the number of users created.
pub fn onboard_missing(
    api: &CreatorsApi,
    store: &SettingsStore,
    cms: &mut dyn ContentStore,
) -> Result<usize, OnboardError> {
    let settings = store.load()?;

    let mut missing = settings
        .features
        .keys()
        .filter(|code| settings.feature_enabled(code) && !settings.user_ids.contains_key(*code))
        .cloned()
        .collect::<Vec<String>>();
    missing.sort();

    let mut onboarded = 0;

    for file_code in missing {
        match onboard(&file_code, api, store, cms) {
            Ok(_) => onboarded += 1,
            Err(err) => log::error!("Failed to onboard feature {file_code}: {err:?}"),
        }
    }

    Ok(onboarded)
}

fn build_user(feature: &FeatureDetails) -> NewUser {
    let mut user = NewUser {
        login: make_username(&feature.title),
        password: generate_password(),
        email: format!("{}@get.creators.com", feature.file_code),
        url: format!("http://www.creators.com/read/{}", feature.file_code),
        display_name: feature.title.clone(),
        role: "author".to_string(),
        first_name: None,
        last_name: None,
        description: None,
    };

    // Name and bio only make sense for single-author features.
    if let [author] = feature.authors.as_slice() {
        let mut parts = author.name.splitn(2, ' ');
        user.first_name = parts.next().map(|part| part.to_string());
        user.last_name = parts.next().map(|part| part.to_string());
        user.description = Some(normalize_bio(&author.bio));
    }

    user
}

/// Lowercases the feature title, strips spaces and keeps only a safe
/// identifier charset.
pub fn make_username(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-' | '@'))
        .collect()
}

/// Paragraph closers become blank lines, every other tag is dropped.
fn normalize_bio(bio: &str) -> String {
    let with_breaks = bio.replace("</p>", "\r\n\r\n");

    html_tag_regex().replace_all(&with_breaks, "").into_owned()
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
