// Dashboard Calendar
// Prints the laid-out calendar for a period

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use dashboard_calendar::models::grid::ViewMode;
use dashboard_calendar::services::clock::{Clock, SystemClock};
use dashboard_calendar::services::seed;
use dashboard_calendar::services::settings::SettingsService;
use dashboard_calendar::utils::date::week_start;
use dashboard_calendar::CalendarEngine;

#[derive(Parser)]
#[command(name = "dashboard-calendar", about = "Lay out dashboard calendar events")]
struct Cli {
    /// View mode: day, week or month (default from settings)
    #[arg(long)]
    view: Option<ViewMode>,

    /// Date to show (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Settings file (default: user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file with seed events (default: built-in demo week)
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings_service = match &cli.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::at_default_location(),
    };
    let settings = settings_service
        .get()
        .with_context(|| format!("loading {}", settings_service.path().display()))?;

    let seeds = match &cli.seed {
        Some(path) => seed::load_seed_file(path)?,
        None => seed::default_seeds(),
    };

    let date = cli.date.unwrap_or_else(|| SystemClock.today());
    let mut engine = CalendarEngine::new(settings, Box::new(SystemClock))
        .map_err(|e| anyhow!("failed to create calendar engine: {}", e))?;
    engine.start();
    engine.load_events(seed::materialize(&seeds, week_start(date)));
    if let Some(view) = cli.view {
        engine.set_view(view);
    }
    engine.go_to(date);

    print_calendar(&engine);
    engine.shutdown();
    Ok(())
}

fn print_calendar(engine: &CalendarEngine) {
    println!("{}", engine.period_label());
    println!();

    for (index, cell) in engine.cells().iter().enumerate() {
        let marker = if cell.highlight {
            "*"
        } else if cell.current {
            " "
        } else {
            "."
        };
        println!("{}{} {:>2}  {}", marker, cell.label, cell.date, cell.full_date);

        for rendered in engine.layout_day(index) {
            let event = &rendered.event;
            println!(
                "      {}-{} {:<28} col {}/{}  top {:>6.1}px  height {:>5.1}px",
                event.start_time,
                event.end_time,
                event.title,
                rendered.placement.column + 1,
                rendered.placement.columns,
                rendered.top_px,
                rendered.height_px,
            );
        }
    }

    if let Some(now) = engine.now_indicator() {
        if engine
            .cells()
            .iter()
            .any(|cell| engine.should_show_time_indicator(cell.full_date))
        {
            println!();
            println!("Now: {} ({:.1}px)", now.label, now.offset_px);
        }
    }
}
