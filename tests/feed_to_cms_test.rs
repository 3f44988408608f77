use creators_sync::cms::WordpressStore;
use creators_sync::creators_api::CreatorsApi;
use creators_sync::settings::{Settings, SettingsStore};
use creators_sync::sync::{FeedSyncJob, SyncOutcome};
use creators_sync::users;
use mockito::{mock, Matcher};
use std::fs;
use tempfile::tempdir;

// Full pipeline against mocked Creators and WordPress endpoints:
// enable a feature, onboard its user, then sync the feed into the CMS.
#[test]
fn it_onboards_a_feature_and_posts_its_release() {
    let details = "{\"title\": \"Big Feature\", \"file_code\": \"ab12\", \
                   \"authors\": [{\"name\": \"Jane Doe\", \"bio\": \"<p>Hi</p>\"}]}";
    let _details_mock = mock("GET", "/api/features/details/json/ab12")
        .with_status(200)
        .with_body(details)
        .create();

    let _user_mock = mock("POST", "/wp-json/wp/v2/users")
        .match_body(Matcher::PartialJsonString(
            "{\"username\": \"bigfeature\", \"roles\": [\"author\"]}".to_string(),
        ))
        .with_status(201)
        .with_body("{\"id\": 7}")
        .create();

    let post_mock = mock("POST", "/wp-json/wp/v2/posts")
        .match_body(Matcher::PartialJsonString(
            "{\"slug\": \"12345-big-story\", \"author\": 7, \"status\": \"publish\"}".to_string(),
        ))
        .with_status(201)
        .with_body("{\"id\": 99}")
        .create();

    let xml = fs::read_to_string("./tests/support/creators_feed_example.xml").unwrap();
    let _feed_mock = mock("GET", "/feed/key.rss")
        .with_status(200)
        .with_body(xml)
        .create();

    let dir = tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let mut settings = Settings::default();
    settings.api_key = "key".to_string();
    settings.features.insert("ab12".to_string(), "on".to_string());
    store.save(&settings).unwrap();

    let base_url = mockito::server_url();
    let api = CreatorsApi::with_base_url(base_url.clone(), "key".to_string());
    let mut cms = WordpressStore::new(base_url.clone(), "admin", "secret");

    let onboarded = users::onboard_missing(&api, &store, &mut cms).unwrap();
    assert_eq!(onboarded, 1);
    assert_eq!(store.load().unwrap().user_ids.get("ab12"), Some(&7));

    let job = FeedSyncJob::with_base_url(base_url);
    let outcome = job.execute(&store, &mut cms).unwrap();

    // the fixture's second item belongs to a feature left disabled
    assert_eq!(outcome, SyncOutcome::Processed { created: 1 });
    post_mock.assert();

    let settings = store.load().unwrap();
    assert!(settings.last_run > 0);
}
