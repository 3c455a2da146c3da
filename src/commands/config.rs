use anyhow::Result;
use owo_colors::OwoColorize;
use weekboard_core::WeekboardConfig;

pub fn run() -> Result<()> {
    let config_path = WeekboardConfig::config_path()?;
    let config = WeekboardConfig::load()?;
    let hours = config.working_hours;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());

    println!("\n{}", "Settings".bold());
    println!("  Server:   {}", config.server_url);
    println!("  Uid:      {}", config.uid.as_deref().unwrap_or("(not set)"));
    println!("  Zone:     {:?}", config.zone());
    println!(
        "  Hours:    {:02}:00 - {:02}:00, gaps of {}+ mins",
        hours.start_hour, hours.end_hour, hours.min_gap_minutes
    );

    Ok(())
}
