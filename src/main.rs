use log::error;
use timetable_solver::config::{EngineConfig, ServerConfig};
use timetable_solver::server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load engine configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run_server(ServerConfig::from_env(), engine).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
