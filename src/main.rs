use clap::Parser;

use ekranu_crm::cli::{Cli, Commands};
use ekranu_crm::config::{get_config, init_config_from};
use ekranu_crm::runtime::modes;
use ekranu_crm::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            install_panic_hook(RunMode::Server);
            // guard 必须存活到进程结束
            let _guard = init_logging(&get_config().logging)?;
            modes::run_server().await
        }
        Some(cmd) => {
            install_panic_hook(RunMode::Cli);
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
