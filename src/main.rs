use clap::Parser;
use sky_souls::{browse, cli, commands, config, error};
use sky_souls::{ApiClient, FileStore};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use sky_souls_common::{FilterState, NavigationType, Soul, TravelingVisit};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("❌ {}", err.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let api_url = config.resolve_api_url(cli.api_url.as_deref());

    match cli.command {
        Commands::Browse {
            page,
            query,
            season,
            mode,
            warband,
            back,
        } => {
            let list_page = page.list_page();
            let defaults = FilterState::defaults(list_page);
            let url_filter = FilterState {
                query: query.unwrap_or_default(),
                season,
                view_mode: mode.unwrap_or(defaults.view_mode),
                warband,
            };
            // 引数の組み合わせはURLクエリと同じ規則で正規化する
            let url_filter = FilterState::from_query(list_page, &url_filter.to_query(list_page));
            let navigation = if back {
                NavigationType::Pop
            } else {
                NavigationType::Push
            };

            let api = ApiClient::new(&api_url, config.timeout_seconds)?;
            let store = FileStore::new(Config::session_dir()?);
            tracing::debug!(page = ?list_page, %api_url, "browse");

            match page {
                cli::BrowsePage::Encyclopedia => {
                    let session =
                        browse::BrowseSession::<TravelingVisit>::new(&api, list_page, store, config.page_size)
                            .with_spinner(true);
                    browse::run_interactive(session, navigation, url_filter).await?;
                }
                cli::BrowsePage::Dictionary | cli::BrowsePage::Visits => {
                    let session =
                        browse::BrowseSession::<Soul>::new(&api, list_page, store, config.page_size)
                            .with_spinner(true);
                    browse::run_interactive(session, navigation, url_filter).await?;
                }
            }
        }

        Commands::Soul { action } => {
            let api = ApiClient::new(&api_url, config.timeout_seconds)?;
            commands::soul(&api, action).await?;
        }

        Commands::Season { action } => {
            let api = ApiClient::new(&api_url, config.timeout_seconds)?;
            commands::season(&api, action).await?;
        }

        Commands::Visit { action } => {
            let api = ApiClient::new(&api_url, config.timeout_seconds)?;
            commands::visit(&api, action, config.page_size).await?;
        }

        Commands::Image { action } => {
            let api = ApiClient::new(&api_url, config.timeout_seconds)?;
            commands::image(&api, action, config.page_size).await?;
        }

        Commands::Config {
            set_api_url,
            set_page_size,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                changed = true;
                println!("✔ API URL을 설정했습니다: {}", config.api_url);
            }
            if let Some(size) = set_page_size {
                config.set_page_size(size)?;
                changed = true;
                println!("✔ 페이지 크기를 설정했습니다: {}", config.page_size);
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("설정:");
                println!("  API URL: {}", config.api_url);
                println!("  사용 중인 URL: {}", api_url);
                println!("  페이지 크기: {}", config.page_size);
                println!("  타임아웃: {}초", config.timeout_seconds);
                println!("  설정 파일: {}", Config::config_path()?.display());
            }
        }

        Commands::Session { info, clear } => {
            let store = FileStore::new(Config::session_dir()?);
            commands::session(store, info, clear)?;
        }
    }

    Ok(())
}
