// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use portfolio_server::{config::AppConfig, logging::init_logging, server};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(config.log_format);

    if let Err(e) = server::run(config).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
