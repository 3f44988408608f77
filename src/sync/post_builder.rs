use crate::cms::{NewPost, PostStatus};
use crate::settings::Settings;
use crate::sync::reader::FetchedFeedItem;
use crate::users;
use regex::Regex;
use std::sync::OnceLock;

const TITLE_DELIMITER: &str = " by ";

static GUID_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn guid_id_regex() -> &'static Regex {
    GUID_ID_REGEX.get_or_init(|| Regex::new("/([0-9]+)").unwrap())
}

/// Builds the CMS entry for a feed item that passed the filter. The
/// description goes in verbatim; the author id may be absent when the
/// feature was never onboarded, in which case the post is created
/// unassigned.
pub fn build_post(item: &FetchedFeedItem, settings: &Settings) -> NewPost {
    let (title, _byline) = split_title(&item.title);

    let status = if settings.auto_publish {
        PostStatus::Publish
    } else {
        PostStatus::Draft
    };

    NewPost {
        title: title.to_string(),
        slug: build_slug(
            item.guid.as_deref().unwrap_or(""),
            &item.title,
            &settings.post_name_pattern,
        ),
        content: item.description.clone().unwrap_or_default(),
        status,
        author: item
            .author
            .as_deref()
            .and_then(|author| users::resolve(settings, author)),
        date: item.publication_date.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Splits a raw feed title on the LAST occurrence of " by ": the part
/// before is the post title, the trimmed part after is the author
/// display name. Titles that themselves contain " by " split at the
/// final byline. Without a delimiter the whole string is the title.
pub fn split_title(raw_title: &str) -> (&str, &str) {
    match raw_title.rfind(TITLE_DELIMITER) {
        Some(position) => {
            let byline = raw_title[position + TITLE_DELIMITER.len()..].trim();

            (&raw_title[..position], byline)
        }
        None => (raw_title, ""),
    }
}

/// `{numeric id from guid}-{pattern}` where the pattern substitutes
/// `%t` with the sanitized title and `%a` with the sanitized author
/// name.
pub fn build_slug(guid: &str, raw_title: &str, pattern: &str) -> String {
    let numeric_id = guid_id_regex()
        .captures(guid)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default();

    let (title, byline) = split_title(raw_title);

    let name = pattern
        .replace("%t", &sanitize_title(title))
        .replace("%a", &sanitize_title(byline));

    format!("{numeric_id}-{name}")
}

/// Lowercases and hyphenates into a URL-safe slug.
pub fn sanitize_title(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars().flat_map(|c| c.to_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::{build_post, build_slug, sanitize_title, split_title};
    use crate::cms::PostStatus;
    use crate::settings::Settings;
    use crate::sync::reader::FetchedFeedItem;
    use chrono::{TimeZone, Utc};

    fn item() -> FetchedFeedItem {
        FetchedFeedItem {
            title: "Big Story by Jane Doe".to_string(),
            description: Some("<p>Body</p>".to_string()),
            author: Some("ab12@get.creators.com (Jane Doe)".to_string()),
            guid: Some("http://www.creators.com/read/ab12/12345".to_string()),
            publication_date: Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn it_splits_the_title_on_the_last_byline() {
        assert_eq!(split_title("Big Story by Jane Doe"), ("Big Story", "Jane Doe"));
        assert_eq!(
            split_title("Death by Chocolate by Jane Doe"),
            ("Death by Chocolate", "Jane Doe")
        );
        assert_eq!(split_title("No Byline Here"), ("No Byline Here", ""));
    }

    #[test]
    fn it_builds_the_slug_from_the_guid_id_and_pattern() {
        let slug = build_slug(
            "http://www.creators.com/read/ab12/12345",
            "Big Story by Jane Doe",
            "%t-%a",
        );

        assert_eq!(slug, "12345-big-story-jane-doe");
    }

    #[test]
    fn it_leaves_the_id_empty_when_the_guid_has_no_digits() {
        let slug = build_slug("urn:creators:none", "Big Story by Jane Doe", "%t");

        assert_eq!(slug, "-big-story");
    }

    #[test]
    fn it_sanitizes_titles() {
        assert_eq!(sanitize_title("Big Story"), "big-story");
        assert_eq!(sanitize_title("  Jane   Doe!  "), "jane-doe");
        assert_eq!(sanitize_title("It's A Test"), "it-s-a-test");
    }

    #[test]
    fn it_builds_a_publishable_post() {
        let mut settings = Settings::default();
        settings.post_name_pattern = "%t-%a".to_string();
        settings.user_ids.insert("ab12".to_string(), 7);

        let post = build_post(&item(), &settings);

        assert_eq!(post.title, "Big Story");
        assert_eq!(post.slug, "12345-big-story-jane-doe");
        assert_eq!(post.content, "<p>Body</p>");
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.author, Some(7));
        assert_eq!(post.date, "2024-01-02 10:30:00");
    }

    #[test]
    fn it_builds_a_draft_without_an_author_when_unmapped() {
        let mut settings = Settings::default();
        settings.auto_publish = false;

        let post = build_post(&item(), &settings);

        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.author, None);
    }
}
