use adnuverse_backend::{config::Config, router, Global};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load config: {err}");
            std::process::exit(1);
        }
    };
    let addr = config.addr;

    let global = match Global::new(config) {
        Ok(global) => global,
        Err(err) => {
            tracing::error!("failed to open data directory: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!("listening on {addr}");
    if let Err(err) = axum::Server::bind(&addr)
        .serve(router(global).into_make_service())
        .await
    {
        tracing::error!("server error: {err}");
        std::process::exit(1);
    }
}
