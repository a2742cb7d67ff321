// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use insu_dashboard::{narrative, DashboardConfig, NamedQuery, Session};
use std::env;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = DashboardConfig::load().context("Failed to load configuration")?;
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("query") => {
            init_tracing_stderr();
            run_query(&config, &args[2..].join(" "))
        }
        Some("named") => {
            init_tracing_stderr();
            run_named(&config, &args[2..].join(" "))
        }
        Some("export") => {
            init_tracing_stderr();
            run_export(&config, &args[2..].join(" "))
        }
        Some("overview") => {
            init_tracing_stderr();
            run_overview(&config)
        }
        // UI mode (default)
        _ => run_ui_mode(&config),
    }
}

fn init_tracing_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load every source up front; a missing or malformed file ends the process.
fn open_session(config: &DashboardConfig) -> Result<Session> {
    let mut session = Session::from_config(config);
    match session.ensure_loaded() {
        Ok(tables) => {
            // stderr, so `export` output stays clean JSON
            for table in tables {
                eprintln!(
                    "✓ {:<10} {:>7} rows  ({})",
                    table.table.table_name(),
                    table.row_count,
                    table.path
                );
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to load source data!");
            eprintln!("   {}", e);
            eprintln!("   Check customers_csv / contracts_csv / claims_csv in insu-dashboard.toml");
            std::process::exit(1);
        }
    }
    Ok(session)
}

fn run_query(config: &DashboardConfig, sql: &str) -> Result<()> {
    let mut session = open_session(config)?;

    // Query failures are reported, not fatal
    match session.run_adhoc_query(sql) {
        Ok(table) => {
            println!("\n{}", table.to_text());
            println!("\n({} rows)", table.row_count());
        }
        Err(e) => println!("\nError: {}", e),
    }

    Ok(())
}

fn run_named(config: &DashboardConfig, name: &str) -> Result<()> {
    let mut session = open_session(config)?;

    match session.run_named_query(name) {
        Ok(table) => println!("\n{}", table.to_text()),
        Err(e) => println!("\nError: {}", e),
    }

    Ok(())
}

/// Named query result plus its chart as pretty JSON, for piping elsewhere
fn run_export(config: &DashboardConfig, name: &str) -> Result<()> {
    let mut session = open_session(config)?;
    let query = NamedQuery::from_name(name)?;
    let (table, chart) = session.run_with_chart(query)?;

    let document = serde_json::json!({
        "query": query.display_name(),
        "table": table,
        "chart": chart,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

fn run_overview(config: &DashboardConfig) -> Result<()> {
    let mut session = open_session(config)?;
    let report = session.overview()?;

    println!("\n{}", narrative::KEY_OBJECTIVES);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total Customers: {}", report.total_customers);
    println!("Total Policies:  {}", report.total_policies);
    println!("Total Claims:    {}", report.total_claims);

    for (title, rows) in [
        ("Fraud Rate by Gender", &report.by_gender),
        ("Fraud Rate by Age Group", &report.by_age_group),
    ] {
        println!("\n{}", title);
        for row in rows {
            println!(
                "  {:<10} fraud {:>6} / total {:>6}  {:>6.2}%",
                row.group,
                row.fraud_count,
                row.total_count,
                row.display_rate()
            );
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &DashboardConfig) -> Result<()> {
    // stderr belongs to the terminal UI; events go to the log file
    let log_file = std::fs::File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init();

    println!("🖥️  Loading Insurance Fraud Dashboard...\n");
    let session = open_session(config)?;
    println!("\nStarting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(session);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: insu-dashboard query \"<sql>\"");
    eprintln!("   Or the web UI: cargo run --bin insu-server --features server");
    std::process::exit(1);
}
