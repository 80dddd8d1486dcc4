use clap::Parser;

use spotcli::{
    cli::{self, Cli, Command},
    config::{self, Config},
    fatal, logging,
    notify::NotifySend,
    spotify::WebApi,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level());

    if let Command::Completions(opts) = &cli.command {
        cli::completions(opts.shell, &mut std::io::stdout());
        return;
    }

    let config_file = cli.config.clone().unwrap_or_else(config::config_file);
    let cache_dir = cli.cache_dir.clone().unwrap_or_else(config::cache_dir);

    let config = match Config::load(&config_file).await {
        Ok(config) => config,
        Err(e) => fatal!("Cannot load {}: {}", config_file.display(), e),
    };
    let authentication = match config::load_authentication(&cache_dir, &config).await {
        Ok(authentication) => authentication,
        Err(e) => fatal!("{}", e),
    };

    let client = WebApi::new(authentication);
    let ctx = cli::Context { cache_dir, config };
    let result = cli::run(
        &client,
        &NotifySend::default(),
        cli.command,
        &ctx,
        &mut std::io::stdout(),
    )
    .await;

    if let Err(e) = result {
        fatal!("{}", e);
    }
}
