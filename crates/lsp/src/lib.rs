mod capabilities;
pub mod config;
mod dispatcher;
pub mod document;
pub mod emoji;
pub mod error;
mod handlers;
pub mod providers;
mod server;
#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::server::LspServerState;
use anyhow::Result;
use lsp_server::Connection;
use lsp_types::InitializeParams;
use serde::{de::DeserializeOwned, Serialize};

pub fn run_server() -> Result<()> {
    tracing::info!("emoji-language-server started");
    let (connection, io_threads) = lsp_server::Connection::stdio();

    let config = initialize(&connection)?;
    main_loop(connection, config)?;

    io_threads.join()?;
    tracing::info!("emoji-language-server stopped");
    Ok(())
}

/// Performs the initialize handshake on `connection` and returns the config
/// negotiated with the client.
pub fn initialize(connection: &Connection) -> Result<Config> {
    let (request_id, params) = connection.initialize_start()?;
    let params: InitializeParams = from_json("initialize", params)?;

    match &params.client_info {
        Some(client_info) => tracing::info!(
            "client {} {}",
            client_info.name,
            client_info.version.as_deref().unwrap_or("unknown")
        ),
        None => tracing::debug!("client sent no client info"),
    }

    let mut config = Config::new(&params.capabilities);
    if let Some(options) = params.initialization_options {
        config.update(options)?;
    }

    let initialize_result = lsp_types::InitializeResult {
        capabilities: capabilities::server_capabilities(),
        server_info: Some(lsp_types::ServerInfo {
            name: String::from("emoji-language-server"),
            version: Some(String::from(env!("CARGO_PKG_VERSION"))),
        }),
    };

    connection.initialize_finish(request_id, to_json(initialize_result)?)?;

    Ok(config)
}

pub fn main_loop(connection: Connection, config: Config) -> Result<()> {
    tracing::info!("initial config: {:#?}", config);
    LspServerState::new(connection.sender, config).run(connection.receiver)
}

pub fn from_json<T: DeserializeOwned>(what: &'static str, json: serde_json::Value) -> Result<T> {
    T::deserialize(&json)
        .map_err(|e| anyhow::anyhow!("could not deserialize {}: {} - {}", what, e, json))
}

pub fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| anyhow::anyhow!("could not serialize to json {}", e))
}
