pub mod cms;
pub mod config;
pub mod creators_api;
pub mod http_client;
pub mod settings;
pub mod sync;
pub mod users;
