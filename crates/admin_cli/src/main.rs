use std::error::Error;

use clap::{Args, Parser, Subcommand};
use ledger::{EntityKind, Ledger};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cashbook_admin")]
#[command(about = "Admin utilities for the cashbook ledger (cleanup, purge, reconciliation)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./cashbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed-data maintenance.
    Sample(Sample),
    /// Remove one entity and its dependents, children first.
    Purge(PurgeArgs),
    /// Reconciliation report for one wallet.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct Sample {
    #[command(subcommand)]
    command: SampleCommand,
}

#[derive(Subcommand, Debug)]
enum SampleCommand {
    /// Hard-purge every transaction flagged `is_sample`.
    Purge,
}

#[derive(Args, Debug)]
struct PurgeArgs {
    /// Entity family, e.g. `project`, `workshop_job`, `transaction`.
    #[arg(long)]
    entity: String,
    #[arg(long)]
    id: Uuid,
    /// Skip the soft-delete audit window (hard cleanup).
    #[arg(long)]
    hard: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Wallet document code (e.g. `W0001`) or UUID.
    #[arg(long)]
    wallet: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let ledger = Ledger::builder().database(db).build()?;

    match cli.command {
        Command::Sample(sample) => match sample.command {
            SampleCommand::Purge => {
                let purged = ledger.purge_sample_transactions().await?;
                println!("purged {purged} sample transactions");
            }
        },
        Command::Purge(args) => {
            let kind = EntityKind::try_from(args.entity.as_str())?;
            let affected = if args.hard {
                ledger.hard_purge(kind, args.id).await?
            } else {
                ledger.purge(kind, args.id).await?
            };
            println!("purged {affected} rows");
        }
        Command::Report(args) => {
            let wallet = match args.wallet.parse::<Uuid>() {
                Ok(id) => ledger.wallet(id).await?,
                Err(_) => ledger.find_wallet_by_code(&args.wallet).await?,
            };
            let report = ledger.report(wallet.id, None, None).await?;
            println!("wallet {} ({})", wallet.code, wallet.name);
            println!("  income       {:>16}", report.balance.income_total);
            println!("  expense      {:>16}", report.balance.expense_total);
            println!("  transfer in  {:>16}", report.balance.transfer_in_total);
            println!("  transfer out {:>16}", report.balance.transfer_out_total);
            println!("  adjustments  {:>16}", report.balance.adjustment_total);
            println!("  net          {:>16}", report.balance.net);
            if report.warnings.is_empty() {
                println!("no warnings");
            } else {
                for warning in &report.warnings {
                    println!("warning: {warning:?}");
                }
            }
        }
    }

    Ok(())
}
