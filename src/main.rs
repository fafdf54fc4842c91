use anyhow::Result;
use clap::Parser;
use class_timetable::adapters::rest::{RestOptions, RestScheduleStorage};
use class_timetable::app::config::{Args, Config};
use class_timetable::app::log_format;
use class_timetable::layout::PositionedSlot;
use class_timetable::schedule::{ClassRef, DayOfWeek};
use class_timetable::ScheduleCoordinator;
use log::{debug, LevelFilter};
use std::sync::Arc;

fn print_day(day: DayOfWeek, slots: &[PositionedSlot]) {
    println!("{day}");
    if slots.is_empty() {
        println!("  (free)");
    }
    for p in slots {
        let hidden = if p.is_visible() { "" } else { " [outside window]" };
        println!(
            "  {}  {:<32} col {}/{}  top {:.3} height {:.3} left {:.3} width {:.3}{}",
            p.slot.interval,
            p.slot.kind.title(),
            p.column_index + 1,
            p.column_count,
            p.top,
            p.height,
            p.left,
            p.width,
            hidden
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    log_format::init(LevelFilter::Info);
    debug!("Current working dir: {:?}", std::env::current_dir());

    let args = Args::parse();
    let config = Config::from_file(&args.config)?;

    let storage = Arc::new(RestScheduleStorage::new(RestOptions {
        base_url: config.api_base_url.clone(),
        token: config.token.clone(),
        timeout: config.request_timeout(),
        max_retries: config.max_retries,
    })?);

    let coordinator = ScheduleCoordinator::open(
        storage.clone(),
        Some(storage),
        ClassRef::new(args.class, config.school_id.clone()),
        config.layout()?,
    )
    .await?;

    let week = match &args.day {
        Some(day) => {
            let day: DayOfWeek = day.parse()?;
            vec![(day, coordinator.positioned_slots_for_day(day))]
        }
        None => coordinator.positioned_week(),
    };

    if args.json {
        let json: Vec<_> = week
            .iter()
            .map(|(day, slots)| serde_json::json!({ "day": day, "slots": slots }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!(
            "Class {} ({})",
            coordinator.class(),
            coordinator.layout_config().window
        );
        for (day, slots) in &week {
            print_day(*day, slots);
        }
    }

    Ok(())
}
