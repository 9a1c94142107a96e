use tl247_voice::config::AppConfig;
use tl247_voice::types::AppState;
use tl247_voice::voices::VoiceTable;

use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::filter::Targets::new().with_targets([
            ("hyper", tracing_subscriber::filter::LevelFilter::OFF),
            ("tl247_voice", tracing_subscriber::filter::LevelFilter::DEBUG),
        ]));
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = AppConfig::from_env();
    let addr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST/PORT do not form a valid socket address");
    let app_state = Arc::new(AppState::new(config, VoiceTable::from_env()));

    tracing::info!(%addr, "voice relay listening");
    axum::Server::bind(&addr)
        .serve(tl247_voice::router(app_state).into_make_service())
        .await
        .unwrap();
}
