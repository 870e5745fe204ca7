//! Service entry point: configuration, logging, store, then serve.

use log::{error, info};
use shoplist_core::{core_version, init_logging, Store};
use shoplist_server::{ApiServer, ServerConfig};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("shoplist-server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("shoplist-server: {err}");
        return ExitCode::FAILURE;
    }

    info!(
        "event=startup module=server status=start version={} db_path={} workers={}",
        core_version(),
        config.db_path.display(),
        config.workers
    );

    let store = match Store::open(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(
                "event=startup module=server status=error step=store db_path={} error={}",
                config.db_path.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let server = match ApiServer::bind(config.addr, store, config.workers) {
        Ok(server) => server,
        Err(err) => {
            error!("event=startup module=server status=error step=bind error={err}");
            return ExitCode::FAILURE;
        }
    };

    match server.run() {
        Ok(()) => {
            info!("event=shutdown module=server status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=shutdown module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}
