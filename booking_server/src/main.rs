use booking_server::{cli::handle_command_line_args, config::ServerConfig, server::run_server};
use dotenvy::dotenv;
use log::info;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = ServerConfig::from_env_or_default();
    info!("🚀️ Booking server starting on {}:{}", config.host, config.port);
    if let Err(e) = run_server(config).await {
        eprintln!("Server terminated abnormally. {e}");
        std::process::exit(1);
    }
}
