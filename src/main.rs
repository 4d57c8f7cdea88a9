//! Console driver.
//!
//! Reads lines from stdin as messages from one chat user and prints the
//! bot's replies. Usage: `order-concierge [user] [bot]`.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use order_concierge::adapters::{
    ConsoleTransport, InMemoryCatalog, InMemoryOrderStore, InMemorySessionRepository,
};
use order_concierge::application::{
    HandleInboundMessageCommand, HandleInboundMessageHandler, OrderAssembler, SessionLocks,
    SessionStore, SessionSweeper, SessionSweeperConfig,
};
use order_concierge::config::{AppConfig, LogFormat};
use order_concierge::domain::conversation::{IntentStateMachine, KeywordClassifier};
use order_concierge::domain::foundation::{BotId, UserAddress};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let mut args = std::env::args().skip(1);
    let user_id = UserAddress::new(args.next().unwrap_or_else(|| "+51999000000".to_string()))?;
    let bot_id = BotId::new(args.next().unwrap_or_else(|| "console".to_string()))?;

    let classifier = match &config.flow.classifier_rules_path {
        Some(path) => KeywordClassifier::from_path(path)?,
        None => KeywordClassifier::default(),
    };
    let catalog = match &config.flow.catalog_path {
        Some(path) => InMemoryCatalog::from_path(path)?,
        None => InMemoryCatalog::new(),
    };
    info!(products = catalog.product_count(), "Catalog loaded");

    let sessions = Arc::new(SessionStore::new(Arc::new(InMemorySessionRepository::new())));
    let locks = SessionLocks::new();
    let handler = HandleInboundMessageHandler::new(
        sessions.clone(),
        locks.clone(),
        Arc::new(IntentStateMachine::new(Arc::new(classifier), config.flow_settings())),
        Arc::new(catalog),
        Arc::new(OrderAssembler::new(
            Arc::new(InMemoryOrderStore::new()),
            config.order_pricing(),
        )),
        Arc::new(ConsoleTransport::new()),
        config.conversation_settings(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::with_config(
        sessions,
        locks,
        SessionSweeperConfig::default().with_interval(config.session.sweep_interval()),
    );
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    info!(user = %user_id, bot = %bot_id, "Console session ready, type a message");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(text) = line? else { break };
                let cmd = HandleInboundMessageCommand {
                    bot_id: bot_id.clone(),
                    user_id: user_id.clone(),
                    sub_domain: "console".to_string(),
                    text,
                };
                if let Err(e) = handler.handle(cmd).await {
                    error!(error = %e, "Message could not be processed");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    shutdown_tx.send(true).ok();
    sweeper_task.await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
