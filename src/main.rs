use std::{error::Error as _, future::IntoFuture, io::Write, process, sync::Arc};

use showcase::{
    application::{
        content::{ContentService, ListingFilter},
        error::AppError,
        fetcher::CollectionFetcher,
    },
    config,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        store::RestDocumentStore,
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let cause = error.source().map(ToString::to_string).unwrap_or_default();
    if dispatcher::has_been_set() {
        error!(error = %error, cause = %cause, collection = error.collection(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, cause = %cause, collection = error.collection(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Dump(args) => run_dump(settings, args).await,
    }
}

fn build_content_service(settings: &config::Settings) -> Result<ContentService, AppError> {
    let store = RestDocumentStore::new(&settings.store)?;
    info!(
        target = "showcase::store",
        endpoint = %settings.store.endpoint,
        project_id = %settings.store.project_id,
        emulator = settings.store.use_emulator,
        "document store configured"
    );
    let fetcher = CollectionFetcher::new(Arc::new(store));
    Ok(ContentService::new(fetcher, settings.content.clone()))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let content = build_content_service(&settings)?;
    let state = HttpState::new(content, settings.site.clone());
    serve_http(&settings.server, state).await
}

async fn run_dump(settings: config::Settings, args: config::DumpArgs) -> Result<(), AppError> {
    let content = build_content_service(&settings)?;
    let filter = ListingFilter::from_query(args.tags.as_deref(), args.query.as_deref());
    let records = content.records(&args.collection, &filter).await?;

    let body = serde_json::to_string_pretty(&records)
        .map_err(|err| AppError::unexpected(format!("failed to encode records: {err}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{body}").map_err(InfraError::Output)?;

    info!(
        target = "showcase::dump",
        collection = %args.collection,
        records = records.len(),
        "collection dumped"
    );
    Ok(())
}

async fn serve_http(
    server: &config::ServerSettings,
    state: HttpState,
) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(server.addr)
        .await
        .map_err(|source| InfraError::Bind {
            addr: server.addr,
            source,
        })?;
    info!(target = "showcase::http", addr = %server.addr, "listening");

    let shutdown = Arc::new(Notify::new());
    let drain = shutdown.clone();
    let serving = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { drain.notified().await })
        .into_future();
    tokio::pin!(serving);

    tokio::select! {
        result = &mut serving => {
            return result.map_err(|err| AppError::unexpected(format!("server error: {err}")));
        }
        _ = wait_for_signal() => shutdown.notify_one(),
    }

    match tokio::time::timeout(server.graceful_shutdown, serving).await {
        Ok(result) => result.map_err(|err| AppError::unexpected(format!("server error: {err}"))),
        Err(_) => {
            warn!(
                target = "showcase::http",
                timeout_secs = server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out, dropping open connections"
            );
            Ok(())
        }
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "showcase::http", error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "showcase::http", error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(target = "showcase::http", "received SIGINT"),
        _ = terminate => info!(target = "showcase::http", "received SIGTERM"),
    }
}
