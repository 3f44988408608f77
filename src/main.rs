use clap::{Parser, Subcommand};
use creators_sync::cms::{ContentStore, MemoryStore, WordpressStore};
use creators_sync::config::Config;
use creators_sync::creators_api::CreatorsApi;
use creators_sync::settings::SettingsStore;
use creators_sync::sync::FeedSyncJob;
use creators_sync::users;
use dotenv::dotenv;
use std::process::ExitCode;
use tokio::runtime;
use tokio::time;

#[derive(Parser)]
#[command(name = "creators_sync", about = "Syncs the Creators RSS feed into a CMS")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one sync cycle
    Sync {
        /// Log what would be posted instead of writing to the CMS
        #[arg(long)]
        dry_run: bool,
    },
    /// Run sync cycles on an interval (SYNC_INTERVAL_SECONDS)
    Watch,
    /// Enable a feature code and onboard any unmapped enabled features
    Enable { file_code: String },
    /// Disable a feature code
    Disable { file_code: String },
    /// Onboard one feature code, or every enabled unmapped one
    Onboard { file_code: Option<String> },
    /// List the features available for this API key
    Features,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let store = SettingsStore::new(Config::settings_path());

    let result = match cli.command {
        Command::Sync { dry_run } => run_sync(&store, dry_run),
        Command::Watch => run_watch(&store),
        Command::Enable { file_code } => enable_feature(&store, &file_code),
        Command::Disable { file_code } => disable_feature(&store, &file_code),
        Command::Onboard { file_code } => run_onboard(&store, file_code.as_deref()),
        Command::Features => list_features(&store),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            log::error!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run_sync(store: &SettingsStore, dry_run: bool) -> Result<(), String> {
    let job = FeedSyncJob::new();

    let outcome = if dry_run {
        let mut cms = MemoryStore::new();
        let outcome = job.execute(store, &mut cms);

        for post in &cms.posts {
            log::info!("Would create {} ({:?}): {}", post.slug, post.status, post.title);
        }

        outcome
    } else {
        let mut cms = content_store()?;

        job.execute(store, &mut *cms)
    };

    outcome
        .map(|_| ())
        .map_err(|err| format!("Sync failed: {err:?}"))
}

fn run_watch(store: &SettingsStore) -> Result<(), String> {
    let tokio_runtime = runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .map_err(|err| format!("Failed to start the runtime: {err:?}"))?;

    tokio_runtime.block_on(async {
        let period = std::time::Duration::from_secs(Config::sync_interval_in_seconds());
        let mut interval = time::interval(period);

        loop {
            interval.tick().await;

            // a failed cycle waits for the next tick, no retries
            if let Err(err) = run_sync(store, false) {
                log::error!("{err}");
            }
        }
    })
}

fn enable_feature(store: &SettingsStore, file_code: &str) -> Result<(), String> {
    let mut settings = store.load().map_err(|err| err.msg)?;
    settings
        .features
        .insert(file_code.to_string(), "on".to_string());
    store.save(&settings).map_err(|err| err.msg)?;

    log::info!("Enabled feature {file_code}");

    // mirror of the settings-save hook: onboard whatever just became
    // enabled without a user mapping
    run_onboard(store, None)
}

fn disable_feature(store: &SettingsStore, file_code: &str) -> Result<(), String> {
    let mut settings = store.load().map_err(|err| err.msg)?;
    settings.features.remove(file_code);
    store.save(&settings).map_err(|err| err.msg)?;

    log::info!("Disabled feature {file_code}");

    Ok(())
}

fn run_onboard(store: &SettingsStore, file_code: Option<&str>) -> Result<(), String> {
    let api = creators_api(store)?;
    let mut cms = content_store()?;

    match file_code {
        Some(code) => {
            let user_id = users::onboard(code, &api, store, &mut *cms)
                .map_err(|err| format!("Onboarding failed: {err:?}"))?;

            println!("{code} -> user {user_id}");
        }
        None => {
            let onboarded = users::onboard_missing(&api, store, &mut *cms)
                .map_err(|err| format!("Onboarding failed: {err:?}"))?;

            println!("onboarded {onboarded} features");
        }
    }

    Ok(())
}

fn list_features(store: &SettingsStore) -> Result<(), String> {
    let settings = store.load().map_err(|err| err.msg)?;
    let api = creators_api(store)?;

    let mut features = api
        .feature_list()
        .map_err(|err| format!("Failed to list features: {err:?}"))?;
    features.sort_by(|a, b| a.file_code.cmp(&b.file_code));

    for feature in features {
        let enabled = if settings.feature_enabled(&feature.file_code) {
            "enabled"
        } else {
            "disabled"
        };
        let mapped = match settings.user_ids.get(&feature.file_code) {
            Some(user_id) => format!("user {user_id}"),
            None => "unmapped".to_string(),
        };

        println!("{}\t{}\t{enabled}\t{mapped}", feature.file_code, feature.title);
    }

    Ok(())
}

fn creators_api(store: &SettingsStore) -> Result<CreatorsApi, String> {
    let settings = store.load().map_err(|err| err.msg)?;

    if settings.api_key.is_empty() {
        return Err("No API key is configured".to_string());
    }

    Ok(CreatorsApi::new(settings.api_key))
}

fn content_store() -> Result<Box<dyn ContentStore>, String> {
    let base_url = Config::wordpress_base_url()
        .ok_or_else(|| "WORDPRESS_BASE_URL is not set".to_string())?;
    let username = Config::wordpress_username()
        .ok_or_else(|| "WORDPRESS_USERNAME is not set".to_string())?;
    let app_password = Config::wordpress_app_password()
        .ok_or_else(|| "WORDPRESS_APP_PASSWORD is not set".to_string())?;

    Ok(Box::new(WordpressStore::new(
        base_url,
        &username,
        &app_password,
    )))
}
