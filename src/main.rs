use std::{future::Future, net::SocketAddr, process, sync::Arc, time::Duration};

use folio::{
    application::{
        archive::{self, ArchiveSources},
        error::AppError,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState, Repositories},
        telemetry,
    },
};
use tokio::{sync::watch, try_join};
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
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
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
        config::Command::Export(args) => run_export(settings, args).await,
        config::Command::Import(args) => run_import(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (http_state, admin_state) = http::build_states(
        &repository_set(&repositories),
        settings.analytics.window(),
        &settings.server.public_url,
    );

    serve_http(&settings, http_state, admin_state).await
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let path = args.file;

    info!(target: "folio::export", path = %path.display(), "Starting export");

    let sources = ArchiveSources {
        profile: repositories.clone(),
        projects: repositories.clone(),
        experiences: repositories.clone(),
        hackathons: repositories.clone(),
        links: repositories,
    };
    archive::export_archive(&sources, &path).await?;

    info!(target: "folio::export", "Export completed");
    Ok(())
}

async fn run_import(settings: config::Settings, args: config::ImportArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let path = args.file;

    info!(target: "folio::import", path = %path.display(), "Starting import");
    archive::import_archive(repositories.as_ref(), &path).await?;
    info!(target: "folio::import", "Import completed");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::MissingDatabaseUrl)
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(
        database_url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(|err| AppError::from(InfraError::database("connection", err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database("migration", err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn repository_set(repositories: &Arc<PostgresRepositories>) -> Repositories {
    Repositories {
        health: repositories.clone(),
        profile: repositories.clone(),
        projects: repositories.clone(),
        experiences: repositories.clone(),
        hackathons: repositories.clone(),
        links: repositories.clone(),
        clicks: repositories.clone(),
    }
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_addr = settings.server.public_addr;
    let public_listener = tokio::net::TcpListener::bind(public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind("public", public_addr, err)))?;
    let admin_addr = settings.server.admin_addr;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind("admin", admin_addr, err)))?;

    info!(
        target: "folio::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listeners bound"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let public_server = axum::serve(
        public_listener,
        public_router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = async { try_join!(public_server, admin_server) } => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drain_deadline(shutdown_rx, grace) => {
            warn!(
                target: "folio::serve",
                grace_seconds = grace.as_secs(),
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    info!(target: "folio::serve", "shutdown complete");
    Ok(())
}

fn wait_for_shutdown(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stopping| *stopping).await;
    }
}

async fn drain_deadline(rx: watch::Receiver<bool>, grace: Duration) {
    wait_for_shutdown(rx).await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: "folio::serve", error = %err, "failed to listen for ctrl-c");
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
                error!(target: "folio::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target: "folio::serve", "shutdown signal received");
}
