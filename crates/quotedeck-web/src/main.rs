use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*};
use dotenv::dotenv;
use log::{info, trace, LevelFilter};
use quotedeck_client::{ApiConfig, TiingoClient};
use quotedeck_web::{configure, AppState, MemorySessionStore, RequestHandler};
use std::sync::Arc;

mod cli;

fn preprocess(level: LevelFilter) {
    dotenv().ok();
    // `RUST_LOG`, when set, takes precedence over `--trace`
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preprocess(cli.trace.into());
    trace!("Command line input recorded: {cli:#?}");

    let config = ApiConfig::from_env()?;
    let client = TiingoClient::new(config)?;
    let handler = RequestHandler::new(Arc::new(client));

    // "> quotedeck <COMMAND>"
    match cli.command {
        // "> quotedeck serve [--host <HOST>] [--port <PORT>]"
        Serve { host, port } => {
            let state = web::Data::new(AppState::new(handler));

            info!("Listening on http://{host}:{port}");
            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(state.clone())
                    .configure(configure)
            })
            .bind((host.as_str(), port))?
            .run()
            .await?;
        }

        // "> quotedeck lookup <SYMBOL>"
        Lookup { symbol } => {
            let sessions = Arc::new(MemorySessionStore::new());
            let (payload, status) = handler.handle(&symbol, &sessions.session("cli")).await;

            println!("{}", serde_json::to_string_pretty(&payload)?);
            if status != 200 {
                anyhow::bail!("lookup of {symbol:?} failed with status {status}");
            }
        }
    }

    Ok(())
}
