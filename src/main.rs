use clap::Parser;
use rpc_exercises::{
    build_app,
    config::{Config, HttpConfig},
    logging,
    rpc::dispatcher::Dispatcher,
    stdio, AppState,
};
use tokio::signal;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "JSON-RPC 2.0 exercise server over stdio or HTTP", long_about = None)]
struct Cli {
    /// Serve HTTP on TEST_HOST:TEST_PORT instead of answering one request on stdin
    #[arg(long)]
    http: bool,

    /// Bind host, overriding TEST_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overriding TEST_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Expose only this method (repeatable), overriding RPC_METHODS
    #[arg(long = "method")]
    methods: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging();

    let registry = Config::from_env()?.with_methods(cli.methods)?.registry();

    if !cli.http {
        let dispatcher = Dispatcher::new(registry);
        stdio::serve_once(&dispatcher, tokio::io::stdin(), tokio::io::stdout()).await?;
        return Ok(());
    }

    let config = HttpConfig::from_env()?.with_overrides(cli.host, cli.port);
    let bind_socket = config.bind_socket()?;
    let methods = registry.method_names().collect::<Vec<_>>().join(",");
    let app = build_app(AppState::new(registry));
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        methods = %methods,
        "server listening"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
