use doc_shell::app::DocShellApp;
use doc_shell::backend::api_client::HttpApi;
use doc_shell::config::Config;
use doc_shell::constant;
use doc_shell::ui;
use std::sync::Arc;

fn main() -> eframe::Result {
    let config = Config::default();
    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    let api = match HttpApi::new(config.api_base_url(), config.request_timeout()) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using document server at {}", api.base_url());

    let options = ui::viewport::build_viewport();
    eframe::run_native(
        constant::DEFAULT_WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(DocShellApp::new(cc, config, api)))),
    )
}
