use clap::{Parser, Subcommand};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::PostgresTicketRepository;
use crate::config::Config;
use crate::domain::Ticket;
use crate::use_cases::ListTickets;
use crate::utils::format::{format_money, total_of};

#[derive(Parser)]
#[command(name = "ticket-verify")]
#[command(about = "Ticket verification intake and review service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Ticket inspection commands
    #[command(subcommand)]
    Tickets(TicketCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Validate configuration and connectivity
    Config,
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// List tickets, most recent first
    List,

    /// Show one ticket
    Show {
        /// Ticket UUID
        #[arg(value_name = "TICKET_ID")]
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed");

    Ok(())
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!(
        "  Mail API URL: {}",
        config.mail.api_url.as_deref().unwrap_or("<unset>")
    );
    println!(
        "  Mail sender: {}",
        config.mail.sender_address.as_deref().unwrap_or("<unset>")
    );
    println!(
        "  Admin address: {}",
        config.mail.admin_address.as_deref().unwrap_or("<unset>")
    );

    let pool = crate::db::create_pool(config).await?;
    let report = crate::startup::validate_environment(config, &pool).await;
    report.print();

    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    Ok(())
}

pub async fn handle_tickets_list(config: &Config) -> anyhow::Result<()> {
    let list = list_use_case(config).await?;
    let tickets = list.execute().await?;

    if tickets.is_empty() {
        println!("No tickets found");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<20} {:<30} {:>14}",
        "Id", "Status", "Submitted", "Email", "Total"
    );
    println!("{}", "-".repeat(116));

    for ticket in tickets {
        println!(
            "{:<38} {:<10} {:<20} {:<30} {:>14}",
            ticket.id.to_string(),
            ticket.status.as_str(),
            ticket.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ticket.client_email,
            format_money(&total_of(&ticket.line_items), &ticket.currency),
        );
    }

    Ok(())
}

pub async fn handle_tickets_show(config: &Config, id: Uuid) -> anyhow::Result<()> {
    let list = list_use_case(config).await?;
    let ticket = list.get(id).await?;
    print_ticket(&ticket);
    Ok(())
}

async fn list_use_case(config: &Config) -> anyhow::Result<ListTickets> {
    let pool = crate::db::create_pool(config).await?;
    Ok(ListTickets::new(Arc::new(PostgresTicketRepository::new(pool))))
}

fn print_ticket(ticket: &Ticket) {
    println!("Ticket {}", ticket.id);
    println!("  Status:       {}", ticket.status);
    println!("  Email:        {}", ticket.client_email);
    println!("  Currency:     {}", ticket.currency);
    println!("  Submitted at: {}", ticket.submitted_at.to_rfc3339());
    if let Some(validated_at) = ticket.validated_at {
        println!("  Decided at:   {}", validated_at.to_rfc3339());
    }
    if let Some(notes) = &ticket.admin_notes {
        println!("  Notes:        {}", notes);
    }
    for (index, item) in ticket.line_items.iter().enumerate() {
        println!(
            "  #{} {} {} {}",
            index + 1,
            item.kind,
            item.code,
            format_money(&item.amount, &ticket.currency)
        );
    }
    println!(
        "  Total:        {}",
        format_money(&total_of(&ticket.line_items), &ticket.currency)
    );
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
