//! `payslip` - command-line front end for the payslip portal
//!
//! Employees look up and download their payslips; admins upload, list,
//! export, delete and reset. Admin commands take the shared password via
//! `--secret` or `PAYSLIP_ADMIN_SECRET`.

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use payslip_core::{DownloadArtifact, Period, RecordId, UploadedFile, MAX_RECENT_MONTHS};
use payslip_db::Error as StoreError;
use payslip_export::ExportFormat;
use payslip_portal::{logging, Config, Lookup, Portal, PortalError, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "payslip", version, about = "Upload, store and download payslip spreadsheets")]
struct Cli {
    /// RON config file (defaults to $PAYSLIP_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the selectable pay periods
    Periods {
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=MAX_RECENT_MONTHS as i64))]
        months: u32,
    },
    /// Store a payslip spreadsheet for an employee and period
    Upload {
        #[arg(long)]
        national_id: String,
        #[arg(long)]
        period: String,
        /// .xlsx or .xls file
        file: PathBuf,
    },
    /// Download an employee's payslip for a period
    Fetch {
        #[arg(long)]
        national_id: String,
        #[arg(long)]
        period: String,
        /// Output directory (defaults to the configured download_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List an employee's payslips
    Search {
        #[arg(long)]
        national_id: String,
    },
    /// Download a payslip by id
    Download {
        id: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show every stored payslip with totals (admin)
    Inventory(Admin),
    /// Export payslip metadata as JSON or CSV (admin)
    Export {
        #[command(flatten)]
        admin: Admin,
        #[arg(long, default_value = "json")]
        format: String,
        /// Output directory (defaults to the configured export_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a payslip by id or by national id and period (admin)
    Delete {
        #[command(flatten)]
        admin: Admin,
        #[arg(long, conflicts_with_all = ["national_id", "period"])]
        id: Option<u64>,
        #[arg(long, requires = "period")]
        national_id: Option<String>,
        #[arg(long, requires = "national_id")]
        period: Option<String>,
    },
    /// Delete every stored payslip (admin)
    Clear {
        #[command(flatten)]
        admin: Admin,
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
    /// Close and delete the whole store file, ids included (admin)
    Destroy {
        #[command(flatten)]
        admin: Admin,
        /// Confirm the irreversible deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct Admin {
    /// Admin password
    #[arg(long, env = "PAYSLIP_ADMIN_SECRET", hide_env_values = true)]
    secret: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_filter);

    if let Command::Periods { months } = cli.command {
        for period in Period::recent(Local::now().date_naive(), months) {
            println!("{}\t{}", period.key(), period.label());
        }
        return ExitCode::SUCCESS;
    }

    let portal = match Portal::open(&config) {
        Ok(portal) => portal,
        Err(e) => {
            eprintln!("✗ Could not open the payslip store: {}", e);
            eprintln!("  Restart the program once the store is accessible.");
            return ExitCode::FAILURE;
        }
    };

    let command = match cli.command {
        Command::Destroy { admin, yes } => return destroy(portal, &admin.secret, yes),
        command => command,
    };

    match run(&portal, &config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&portal, &e);
            ExitCode::FAILURE
        }
    }
}

fn run(portal: &Portal, config: &Config, command: Command) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::Periods { .. } | Command::Destroy { .. } => {}
        Command::Upload {
            national_id,
            period,
            file,
        } => {
            let file = UploadedFile::read(&file)?;
            let record = portal.upload(&national_id, &period, file, today)?;
            println!("✓ Payslip stored (id {})", record.id);
            println!("  {} ({})", record.employee_name, record.national_id);
            println!("  {}", record.period_label);
            println!("  Size: {:.2} KB", record.size_kb());
        }
        Command::Fetch {
            national_id,
            period,
            out,
        } => match portal.lookup(&national_id, &period)? {
            Lookup::Found(record) => {
                let dir = out.unwrap_or_else(|| config.download_dir.clone());
                let path = DownloadArtifact::from_record(&record).write_to(dir)?;
                println!(
                    "✓ Downloaded payslip of {} ({})",
                    portal
                        .directory()
                        .name_or(&record.national_id, &record.employee_name),
                    record.period_label
                );
                println!("  {}", path.display());
            }
            Lookup::PeriodMissing { available } => {
                println!("✗ Period not found");
                println!("  Available periods: {}", available.join(", "));
            }
            Lookup::NoRecords => {
                println!("✗ No payslips found for this national id");
            }
        },
        Command::Search { national_id } => {
            let records = portal.search(&national_id)?;
            if records.is_empty() {
                println!("No payslips found for this national id");
            }
            for record in records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id, record.period_label, record.uploaded_at, record.file_name
                );
            }
        }
        Command::Download { id, out } => {
            let artifact = portal.download(RecordId::new(id))?;
            let dir = out.unwrap_or_else(|| config.download_dir.clone());
            let path = artifact.write_to(dir)?;
            println!("✓ {}", path.display());
        }
        Command::Inventory(admin) => {
            let admin = portal.admin(&admin.secret)?;
            let records = admin.records()?;
            for record in &records {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{:.2} KB\t{}",
                    record.id,
                    record.employee_name,
                    record.national_id,
                    record.period_label,
                    record.file_name,
                    record.size_kb(),
                    record.uploaded_at
                );
            }
            println!("{}", admin.inventory()?);
        }
        Command::Export { admin, format, out } => {
            let admin = portal.admin(&admin.secret)?;
            let format: ExportFormat = format.parse()?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            let path = admin.export_to_dir(format, dir, today)?;
            println!("✓ Exported to {}", path.display());
        }
        Command::Delete {
            admin,
            id,
            national_id,
            period,
        } => {
            let admin = portal.admin(&admin.secret)?;
            let removed = match (id, national_id, period) {
                (Some(id), _, _) => admin.delete(RecordId::new(id))?,
                (None, Some(national_id), Some(period)) => {
                    admin.delete_by_key(&national_id, &period)?
                }
                _ => {
                    println!("✗ Pass --id, or --national-id with --period");
                    return Ok(());
                }
            };
            if removed {
                println!("✓ Payslip deleted");
            } else {
                println!("✗ Payslip not found");
            }
        }
        Command::Clear { admin, yes } => {
            let admin = portal.admin(&admin.secret)?;
            if !yes {
                println!("This deletes EVERY stored payslip. Re-run with --yes to confirm.");
                return Ok(());
            }
            admin.reset()?;
            println!("✓ Store cleared");
        }
    }

    Ok(())
}

fn destroy(portal: Portal, secret: &str, yes: bool) -> ExitCode {
    if !yes {
        if let Err(e) = portal.admin(secret) {
            report(&portal, &e);
            return ExitCode::FAILURE;
        }
        println!("This deletes the store file and restarts ids at 1. Re-run with --yes to confirm.");
        return ExitCode::SUCCESS;
    }

    match portal.destroy(secret) {
        Ok(()) => {
            println!("✓ Store deleted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn report(portal: &Portal, err: &PortalError) {
    match err {
        PortalError::Store(StoreError::Duplicate(key)) => {
            eprintln!("⚠ Duplicate detected: a payslip already exists for");
            eprintln!("  {} ({})", portal.directory().display_name(&key.national_id), key.national_id);
            let period = Period::parse(&key.period)
                .map(|p| p.label())
                .unwrap_or_else(|_| key.period.clone());
            eprintln!("  {}", period);
            eprintln!("  The file was not saved.");
        }
        PortalError::Store(StoreError::Write(_)) => {
            eprintln!("✗ {}", err);
            eprintln!("  Nothing was saved; try again.");
        }
        _ => eprintln!("✗ {}", err),
    }
}
