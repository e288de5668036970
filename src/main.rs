use outline_lsp::create_service;
use tower_lsp::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    setup_tracing();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    tracing::info!("starting outline language server");
    let (service, socket) = create_service();
    Server::new(stdin, stdout, socket).serve(service).await;
}

/// Log to stderr; stdout carries the protocol.
fn setup_tracing() {
    let filter = EnvFilter::try_from_env("OUTLINE_LSP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
