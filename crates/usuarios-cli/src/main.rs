mod cli;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use usuarios_api::UsuariosClientBuilder;
use usuarios_core::ApiConfig;
use usuarios_directory::RegistrationForm;

use cli::{Cli, Command};

fn build_config(cli: &Cli) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(retries) = cli.max_retries {
        config = config.with_max_retries(retries);
    }
    Ok(config.validated()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table output on stdout stays clean.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = build_config(&cli)?;
    let client = UsuariosClientBuilder::from_config(&config)?.build()?;

    match cli.command {
        Command::List {
            search,
            sort,
            desc,
            page,
        } => commands::cmd_list(client, search, sort, desc, page).await,
        Command::Create(fields) => commands::cmd_create(client, fields).await,
        Command::Update { id, fields } => commands::cmd_update(client, id, fields).await,
        Command::Delete { id } => commands::cmd_delete(client, id).await,
        Command::Login {
            scheme,
            username,
            password,
        } => commands::cmd_login(client, scheme, username, password).await,
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => commands::cmd_register(&RegistrationForm {
            name,
            email,
            password,
            confirm_password,
        }),
    }
}
