use bmi_core::*;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for rejected input
const EXIT_INVALID_INPUT: u8 = 2;

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body mass index calculator with local history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI and record it in history
    Calc {
        /// Height in cm (metric) or inches (imperial)
        #[arg(long, allow_hyphen_values = true)]
        height: String,

        /// Weight in kg (metric) or pounds (imperial)
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Age in years (2-120)
        #[arg(long, allow_hyphen_values = true)]
        age: Option<String>,

        /// male, female or other
        #[arg(long)]
        gender: Option<String>,

        /// metric or imperial (defaults to the configured unit)
        #[arg(long)]
        unit: Option<UnitSystem>,

        /// Show the result without recording it
        #[arg(long)]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent measurements, newest first
    History {
        /// Number of rows to show (at least 1)
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show the BMI trend of the latest measurements
    Trend {
        #[arg(long)]
        json: bool,
    },

    /// Delete all recorded measurements
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show or change the colour theme
    Theme {
        action: Option<ThemeAction>,
    },

    /// Write the full history to a CSV file
    Export {
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

fn main() -> ExitCode {
    // Initialize logging
    bmi_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Input(e)) => {
            print_notice(&Notice::from(&e));
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let mut history = HistoryStore::new(FileStore::new(&data_dir));
    if let Err(e) = history.import_legacy() {
        tracing::warn!("Legacy history import failed: {}", e);
    }

    match cli.command {
        Commands::Calc {
            height,
            weight,
            age,
            gender,
            unit,
            dry_run,
            json,
        } => {
            let raw = RawInput {
                height,
                weight,
                age,
                gender,
            };
            let unit = unit.unwrap_or(config.display.default_unit);
            cmd_calc(data_dir, raw, unit, dry_run, json)
        }
        Commands::History { limit, json } => {
            cmd_history(&history, limit.unwrap_or(config.display.history_rows), json)
        }
        Commands::Trend { json } => {
            let theme = Theme::load(history.store(), config.display.default_theme);
            cmd_trend(&history, theme, json)
        }
        Commands::Clear { yes } => cmd_clear(&mut history, yes),
        Commands::Theme { action } => {
            cmd_theme(history.store_mut(), action, config.display.default_theme)
        }
        Commands::Export { path } => cmd_export(&history, path),
    }
}

fn cmd_calc(
    data_dir: PathBuf,
    raw: RawInput,
    unit: UnitSystem,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let mut calc = Calculator::new(FileStore::new(data_dir), unit);

    if dry_run {
        let result = calc.evaluate(&raw)?;
        let report = ResultReport::from(&result);
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            display_report(&report, unit);
            println!("\n[Dry run - not recording measurement]");
        }
        return Ok(());
    }

    let submission = calc.submit(&raw)?;

    if json {
        let out = serde_json::json!({
            "report": submission.report,
            "measurement": submission.measurement,
            "saved": submission.saved,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    display_report(&submission.report, unit);

    if submission.saved {
        print_notice(&Notice::success("Measurement saved to history"));
    } else {
        println!("\n(History unavailable - measurement not saved)");
    }

    Ok(())
}

fn cmd_history(history: &HistoryStore<FileStore>, limit: usize, json: bool) -> Result<()> {
    let rows = history.recent(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No measurements recorded yet.");
        return Ok(());
    }

    println!("  {:>5}  {:<12} {:<10} {}", "BMI", "Category", "Date", "Time");
    for m in &rows {
        println!(
            "  {:>5.1}  {:<12} {:<10} {}",
            m.bmi,
            m.category.label(),
            m.date,
            m.time
        );
    }

    let total = history.list().len();
    if total > rows.len() {
        println!("  ... {} of {} shown", rows.len(), total);
    }

    Ok(())
}

fn cmd_trend(history: &HistoryStore<FileStore>, theme: Theme, json: bool) -> Result<()> {
    let view = TrendView::from_history(&history.list());

    if json {
        let out = serde_json::json!({
            "trend": view,
            "palette": theme.palette(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let view = match view {
        Some(v) => v,
        None => {
            println!("No measurements recorded yet.");
            return Ok(());
        }
    };

    println!(
        "BMI trend, last {} measurements (scale {:.1} - {:.1})",
        view.len(),
        view.y_min,
        view.y_max
    );
    println!();

    let span = view.y_max - view.y_min;
    for (label, &value) in view.labels.iter().zip(&view.values) {
        let filled = if span > 0.0 {
            (((value - view.y_min) / span) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let zone = if (view.normal_zone.0..view.normal_zone.1).contains(&value) {
            '*'
        } else {
            ' '
        };
        println!(
            "  {:<10} {:>5.1} {}|{}",
            label,
            value,
            zone,
            "█".repeat(filled.min(BAR_WIDTH))
        );
    }
    println!();
    println!("  * within the normal band ({} - {})", view.normal_zone.0, view.normal_zone.1);

    Ok(())
}

fn cmd_clear(history: &mut HistoryStore<FileStore>, yes: bool) -> Result<()> {
    if !yes && !confirm("Are you sure you want to clear all history?")? {
        println!("History kept.");
        return Ok(());
    }

    history.clear()?;
    print_notice(&Notice::success("History cleared"));
    Ok(())
}

fn cmd_theme(store: &mut FileStore, action: Option<ThemeAction>, fallback: Theme) -> Result<()> {
    let current = Theme::load(&*store, fallback);

    let next = match action {
        None => {
            println!("{}", current);
            return Ok(());
        }
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Toggle) => current.toggled(),
    };

    next.save(store)?;
    println!("Theme set to {}", next);
    Ok(())
}

fn cmd_export(history: &HistoryStore<FileStore>, path: PathBuf) -> Result<()> {
    let count = history.export_csv(&path)?;
    print_notice(&Notice::success(format!(
        "Exported {} measurements to {}",
        count,
        path.display()
    )));
    Ok(())
}

fn display_report(report: &ResultReport, unit: UnitSystem) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BMI {:.1}  {}", report.bmi_value, report.category);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Ideal weight: {}", report.ideal_weight_range_text);
    println!("  Health risk:  {}", report.health_risk_text);
    println!("  Units:        {}", unit);
    println!();

    let marker = ((report.indicator_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let marker = marker.min(BAR_WIDTH);
    println!("  Under     Normal    Over      Obese");
    println!(
        "  {}▲{}",
        " ".repeat(marker),
        " ".repeat(BAR_WIDTH - marker)
    );
    println!("  ({:.0}% along the scale)", report.indicator_percent);
}

fn print_notice(notice: &Notice) {
    match notice.severity {
        Severity::Success => println!("\n✓ {}", notice.message),
        Severity::Warning | Severity::Error => {
            eprintln!("[{}] {}", notice.severity, notice.message)
        }
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
