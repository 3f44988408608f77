use std::env;

pub struct Config {}

impl Config {
    pub fn creators_base_url() -> String {
        Self::read_var_with_default("CREATORS_BASE_URL", "http://get.creators.com")
    }

    pub fn settings_path() -> String {
        Self::read_var_with_default("CREATORS_SETTINGS_PATH", "./creators_sync.json")
    }

    pub fn request_timeout_in_seconds() -> u64 {
        Self::read_var_with_default("REQUEST_TIMEOUT", "30")
            .parse()
            .expect("REQUEST_TIMEOUT can not be parsed")
    }

    pub fn sync_interval_in_seconds() -> u64 {
        Self::read_var_with_default("SYNC_INTERVAL_SECONDS", "3600")
            .parse()
            .expect("SYNC_INTERVAL_SECONDS can not be parsed")
    }

    pub fn wordpress_base_url() -> Option<String> {
        Self::read_var("WORDPRESS_BASE_URL")
    }

    pub fn wordpress_username() -> Option<String> {
        Self::read_var("WORDPRESS_USERNAME")
    }

    pub fn wordpress_app_password() -> Option<String> {
        Self::read_var("WORDPRESS_APP_PASSWORD")
    }

    fn read_var(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.is_empty())
    }

    fn read_var_with_default(name: &str, default_value: &str) -> String {
        env::var(name).unwrap_or_else(|_| default_value.to_string())
    }
}
