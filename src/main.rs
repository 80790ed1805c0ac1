use clap::Parser;

use shrt::cli::{Cli, Commands};
use shrt::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    shrt::config::init_config_from(&cli.config);
    let config = shrt::config::get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            install_panic_hook(RunMode::Server);
            // guard 持有到进程退出，保证日志刷盘
            let _guard = init_logging(&config)?;
            shrt::runtime::modes::run_server().await
        }
        Some(cmd) => {
            install_panic_hook(RunMode::Cli);
            if let Err(e) = shrt::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
