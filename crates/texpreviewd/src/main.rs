use anyhow::Result;
use clap::Parser;
use log::info;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use texpreview_build::args::ToolchainArgs;
use texpreview_build::Compiler;
use texpreviewd::{router, AppState};

#[derive(Parser, Debug)]
#[command(name = "texpreviewd")]
#[command(about = "HTTP compile server for LaTeX/TikZ previews", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "TEXPREVIEW_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    #[command(flatten)]
    toolchain: ToolchainArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.toolchain.to_config();
    info!(
        "work root {}, timeout {}s, latexmk `{}`, dvisvgm `{}`",
        config.work_root.display(),
        config.timeout.as_secs(),
        config.latexmk,
        config.dvisvgm
    );

    let state = Arc::new(AppState::new(Compiler::new(config)));
    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
