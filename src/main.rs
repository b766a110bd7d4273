use clap::Parser;

use shortstat::config::{AppConfig, Args};
use shortstat::errors::ShortstatError;
use shortstat::runtime::run_server;
use shortstat::system::logging::init_logging;

fn load_config(args: &Args) -> Result<AppConfig, ShortstatError> {
    let mut config = AppConfig::load(Some(&args.config))?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.print_config {
        println!("{}", AppConfig::generate_sample_config());
        return Ok(());
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let _guard = init_logging(&config.logging);
    run_server(&config).await
}
