//! Command-line front end for the Memento journal core.
//!
//! # Responsibility
//! - Load entry rows from a JSON export and drive `memento_core` views.
//! - Print either a compact text rendering or JSON.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, FixedOffset, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use memento_core::config::check_recent_week_count;
use memento_core::logging::init_from_settings;
use memento_core::{
    parse, ActivityLevel, ActivityStrip, ContentSegment, CoreSettings, DayFeed, Entry,
    EntryFilter, EntryRow, EntryView, JournalService, MonthView, SnapshotSource,
};

#[derive(Debug, Parser)]
#[command(name = "memento", about = "Journal calendar and feed tooling", version)]
struct Cli {
    /// Settings JSON file (log level/dir, strip width, UTC offset).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the year calendar with per-day activity levels.
    Calendar(CalendarArgs),
    /// Print the compact activity strip ending this week.
    Activity(ActivityArgs),
    /// Parse one raw entry text file into segments.
    Parse(ParseArgs),
    /// Print the feed for one day and the rest of its month.
    Day(DayArgs),
    /// Print pinned entries grouped by date.
    Reminders(EntriesArg),
    /// Print every tag in use.
    Tags(EntriesArg),
}

#[derive(Debug, Args)]
struct EntriesArg {
    /// JSON array of entry rows.
    #[arg(long)]
    entries: PathBuf,
}

#[derive(Debug, Args)]
struct CalendarArgs {
    #[command(flatten)]
    source: EntriesArg,
    #[arg(long)]
    year: i32,
    /// Defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    #[arg(long)]
    selected: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct ActivityArgs {
    #[command(flatten)]
    source: EntriesArg,
    #[arg(long)]
    today: Option<NaiveDate>,
    /// 1..=53; defaults to the configured `recent_week_count`.
    #[arg(long)]
    weeks: Option<u32>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Raw entry text file.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct DayArgs {
    #[command(flatten)]
    source: EntriesArg,
    #[arg(long)]
    date: NaiveDate,
    /// Case-insensitive text/tag search.
    #[arg(long)]
    query: Option<String>,
    /// Required tag; repeat for several.
    #[arg(long = "tag")]
    tags: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;
    init_from_settings(&settings).context("starting file logs")?;
    info!("event=cli_start module=cli status=ok");

    let json = cli.json;
    match cli.command {
        Commands::Calendar(args) => handle_calendar(args, json),
        Commands::Activity(args) => handle_activity(args, &settings, json),
        Commands::Parse(args) => handle_parse(args, json),
        Commands::Day(args) => handle_day(args, &settings, json),
        Commands::Reminders(args) => handle_reminders(args, json),
        Commands::Tags(args) => handle_tags(args, json),
    }
}

fn load_settings(path: Option<&Path>) -> Result<CoreSettings> {
    let Some(path) = path else {
        return Ok(CoreSettings::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    CoreSettings::from_json(&raw).with_context(|| format!("loading settings {:?}", path))
}

fn load_service(args: &EntriesArg) -> Result<JournalService<SnapshotSource>> {
    let raw = fs::read_to_string(&args.entries)
        .with_context(|| format!("reading {:?}", args.entries))?;
    let rows: Vec<EntryRow> = serde_json::from_str(&raw)
        .with_context(|| format!("decoding entry rows in {:?}", args.entries))?;
    Ok(JournalService::new(SnapshotSource::from_rows(rows)))
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn handle_calendar(args: CalendarArgs, json: bool) -> Result<()> {
    let service = load_service(&args.source)?;
    let months = service.year_calendar(args.year, today_or_local(args.today), args.selected)?;
    if months.is_empty() {
        anyhow::bail!("year {} is out of range", args.year);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&months)?);
    } else {
        for month in &months {
            print_month(month);
            println!();
        }
    }
    Ok(())
}

fn print_month(month: &MonthView) {
    let noun = if month.post_count == 1 { "post" } else { "posts" };
    println!("{} {} ({} {noun})", month.label, month.year, month.post_count);
    println!(" wk   Mo   Tu   We   Th   Fr   Sa   Su");
    for week in &month.weeks {
        let cells = week
            .days
            .iter()
            .map(|view| {
                if !view.day.is_in_displayed_month {
                    return "    ".to_string();
                }
                let mark = if view.day.is_today {
                    '*'
                } else if view.day.is_selected {
                    '>'
                } else {
                    ' '
                };
                format!("{mark}{:>2}{}", view.day.date.day(), level_glyph(view.level))
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{:>3}  {cells}", week.iso_week_number);
    }
}

fn level_glyph(level: ActivityLevel) -> char {
    match level {
        ActivityLevel::Blank => ' ',
        ActivityLevel::Quiet => '.',
        ActivityLevel::Low => '░',
        ActivityLevel::Medium => '▒',
        ActivityLevel::High => '▓',
        ActivityLevel::Peak => '█',
    }
}

fn handle_activity(args: ActivityArgs, settings: &CoreSettings, json: bool) -> Result<()> {
    let service = load_service(&args.source)?;
    let weeks = match args.weeks {
        Some(weeks) => check_recent_week_count(weeks).context("invalid --weeks")?,
        None => settings.recent_week_count,
    };
    let strip = service.recent_activity(today_or_local(args.today), weeks)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&strip)?);
    } else {
        print_strip(&strip);
    }
    Ok(())
}

fn print_strip(strip: &ActivityStrip) {
    const ROW_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    for (row, label) in ROW_LABELS.iter().enumerate() {
        let cells = strip
            .weeks
            .iter()
            .map(|week| level_glyph(week[row].level))
            .collect::<String>();
        println!("{label} {cells}");
    }
}

fn handle_parse(args: ParseArgs, json: bool) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {:?}", args.input))?;
    let segments = parse(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        for segment in &segments {
            println!("{segment:?}");
        }
    }
    Ok(())
}

fn handle_day(args: DayArgs, settings: &CoreSettings, json: bool) -> Result<()> {
    let service = load_service(&args.source)?;
    let filter = EntryFilter {
        query: args.query.unwrap_or_default(),
        tags: args.tags.into_iter().collect(),
    };
    let feed = service.day_feed(args.date, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
    } else {
        print_feed(&feed, settings.utc_offset());
    }
    Ok(())
}

fn print_feed(feed: &DayFeed, offset: FixedOffset) {
    println!("{}", feed.date.format("%A %-d %B %Y"));
    if feed.day_entries.is_empty() {
        let message = if feed.filter_active {
            "No matching entries"
        } else {
            "No entries for this day"
        };
        println!("  {message}");
    }
    for entry in &feed.day_entries {
        print_entry(entry, offset);
    }

    let noun = if feed.month_post_count == 1 { "post" } else { "posts" };
    println!();
    println!(
        "Rest of {} ({} {noun})",
        feed.date.format("%B"),
        feed.month_post_count
    );
    for group in &feed.month_groups {
        println!("{}", group.date.format("%A %-d"));
        for entry in &group.entries {
            print_entry(entry, offset);
        }
    }
}

fn print_entry(entry: &Entry, offset: FixedOffset) {
    let view = EntryView::render(entry, offset);
    let pin = if view.is_pinned { " [pinned]" } else { "" };
    println!("  - {}{pin}", view.posted_label);
    for block in &view.blocks {
        match block {
            ContentSegment::Text(text) => {
                for line in text.lines() {
                    println!("      {line}");
                }
            }
            ContentSegment::Url(url) => println!("      <{url}>"),
            ContentSegment::Checklist { .. } => {}
        }
    }
    for row in &view.checklist {
        let check = if row.completed { 'x' } else { ' ' };
        println!("      [{check}] {}", row.content);
    }
    if !view.tags.is_empty() {
        let tags = view
            .tags
            .iter()
            .map(|chip| format!("#{}", chip.name))
            .collect::<Vec<_>>()
            .join(" ");
        println!("      {tags}");
    }
    for attachment in view.images.iter().chain(view.files.iter()) {
        println!("      @ {}", attachment.display_name);
    }
}

fn handle_reminders(args: EntriesArg, json: bool) -> Result<()> {
    let service = load_service(&args)?;
    let reminders = service.reminders()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminders)?);
        return Ok(());
    }
    if reminders.is_empty() {
        eprintln!("No reminders.");
        return Ok(());
    }
    for (date, items) in &reminders {
        println!("{}", date.format("%a %-d %b %Y"));
        for item in items {
            let time = item.reminder_time.as_deref().unwrap_or("--:--");
            println!("  {time:>5}  {}", item.title);
        }
    }
    Ok(())
}

fn handle_tags(args: EntriesArg, json: bool) -> Result<()> {
    let service = load_service(&args)?;
    let tags = service.known_tags()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if tags.is_empty() {
        eprintln!("No tags yet.");
    } else {
        for tag in tags {
            println!("{tag}");
        }
    }
    Ok(())
}
