use std::{io, sync::OnceLock};

use application::{data, Args, Config, Context, Listing};
use service::{collection::Sort, domain::User, Service};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args {
        config,
        data,
        search,
        scope,
        sort,
        order,
        page,
        size,
    } = Args::parse().map_err(|e| {
        if !e.use_stderr() {
            e.exit();
        }
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        data: data_config,
        table,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let path = data.unwrap_or(data_config.path);
    let memory = data::load(&path).await.map_err(|e| {
        log::error!("failed to load users from `{}`: {e}", path.display());
    })?;

    let service = Service::new(table.into(), memory);
    let mut ctx = Context::new(service, table.notice_timeout);

    if let Some(scope) = scope {
        ctx.set_scope(scope);
    }
    ctx.set_search(search);
    if let Some(field) = sort {
        if !User::FIELDS.contains(&field.as_str()) {
            log::warn!("`User`s cannot be sorted by `{field}`");
        }
        ctx.sort_by(Some(Sort { field, order }));
    }
    if let Some(size) = size {
        ctx.set_rows_per_page(size).map_err(|e| {
            log::error!("invalid `--size`: {e}");
        })?;
    }
    ctx.set_page(page).map_err(|e| {
        log::error!("invalid `--page`: {e}");
    })?;

    let page = ctx.page().await.map_err(|e| {
        log::error!("failed to list users: {e}");
    })?;
    log::debug!(
        "listed {} of {} matched users",
        page.items.len(),
        page.total_count,
    );

    let json = serde_json::to_string_pretty(&Listing::from(page))
        .map_err(|e| log::error!("failed to serialize users: {e}"))?;
    println!("{json}");

    Ok(())
}
