use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_verify::adapters::{HttpMailer, PostgresTicketRepository};
use ticket_verify::cli::{self, Cli, Commands, DbCommands, TicketCommands};
use ticket_verify::config::{Config, LogFormat};
use ticket_verify::{create_app, db, startup, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config).await,
        Commands::Tickets(TicketCommands::List) => cli::handle_tickets_list(&config).await,
        Commands::Tickets(TicketCommands::Show { id }) => {
            cli::handle_tickets_show(&config, id).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    // Database pool
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    // Incomplete mail or admin settings don't stop the server; the affected
    // workflows refuse requests until they are fixed.
    let report = startup::check_settings(&config);
    for error in &report.errors {
        tracing::warn!("{}", error);
    }

    let mailer = HttpMailer::from_config(&config.mail);
    tracing::info!(
        api_url = config.mail.api_url.as_deref().unwrap_or("<unset>"),
        "Mail client initialized"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    let app_state = AppState {
        tickets: Arc::new(PostgresTicketRepository::new(pool)),
        notifier: Arc::new(mailer),
        config: Arc::new(config),
    };
    let app = create_app(app_state);

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
