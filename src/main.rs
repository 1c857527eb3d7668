use chrono::{Local, NaiveTime};
use clap::Parser;
use estreia::application::{
    CheckReleaseService, ConfigService, ReminderOutcome, ReminderRequest, ReminderService,
};
use estreia::cli::{
    format_config, format_outcome, format_preview, format_report, format_report_json, Cli,
    Commands,
};
use estreia::domain::{
    format_date_to_portuguese, Clock, FixedClock, ReminderScheduler, SystemClock,
};
use estreia::error::{EstreiaError, Result};
use estreia::infrastructure::config::parse_timezone;
use estreia::infrastructure::{ApiClient, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estreia=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref());

    // Config edits must work even when the stored zone or send time is broken
    let command = match cli.command {
        Commands::Config { key, value, list } => {
            return manage_config(config_path, key, value, list);
        }
        other => other,
    };

    let config = Config::load(&config_path)?.with_env_overrides();
    let tz = match cli.tz.as_deref() {
        Some(name) => Some(parse_timezone(name)?),
        None => config.timezone()?,
    };
    let send_time = config.send_time()?;
    tracing::debug!(path = %config_path.display(), ?tz, %send_time, "configuration loaded");

    match (cli.now, tz) {
        (Some(now), Some(tz)) => {
            execute(FixedClock::new(now.with_timezone(&tz)), send_time, command, &config).await
        }
        (Some(now), None) => {
            execute(FixedClock::new(now.with_timezone(&Local)), send_time, command, &config).await
        }
        (None, Some(tz)) => execute(SystemClock::new(tz), send_time, command, &config).await,
        (None, None) => execute(SystemClock::local(), send_time, command, &config).await,
    }
}

async fn execute<C: Clock>(
    clock: C,
    send_time: NaiveTime,
    command: Commands,
    config: &Config,
) -> Result<()> {
    let scheduler = ReminderScheduler::new(clock).with_send_time(send_time);

    match command {
        Commands::Check { date, json } => {
            let report = CheckReleaseService::new(&scheduler).execute(&date)?;
            if json {
                println!("{}", format_report_json(&report));
            } else {
                print!("{}", format_report(&report));
            }
            Ok(())
        }
        Commands::Delay { date } => {
            let delay = scheduler.calculate_reminder_delay(&date)?;
            println!("{}", delay.as_millis());
            Ok(())
        }
        Commands::Format { date } => {
            let decision = scheduler.compute_reminder_decision(&date)?;
            println!("{}", format_date_to_portuguese(decision.release_date));
            Ok(())
        }
        Commands::Remind {
            date,
            title,
            to,
            image,
            dry_run,
        } => {
            let request = ReminderRequest {
                to: recipient(to, config)?,
                title,
                release_date: date,
                image_url: image,
            };
            let service = ReminderService::new(scheduler, Arc::new(ApiClient::new(config)?))
                .with_templates_dir(config.templates_dir.clone());

            if dry_run {
                print!("{}", format_preview(&service.preview(&request)?));
                return Ok(());
            }
            let outcome = service.schedule(&request).await?;
            finish(outcome).await
        }
        Commands::RemindMovie { id, to, dry_run } => {
            let to = recipient(to, config)?;
            let api = ApiClient::new(config)?;
            let service = ReminderService::new(scheduler, Arc::new(api.clone()))
                .with_templates_dir(config.templates_dir.clone());

            if dry_run {
                let movie = api.get_movie(id).await?;
                let request = ReminderRequest::for_movie(&movie, &to);
                print!("{}", format_preview(&service.preview(&request)?));
                return Ok(());
            }
            let outcome = service.remind_movie(&api, id, &to).await?;
            finish(outcome).await
        }
        // Handled in run() before a clock exists
        Commands::Config { .. } => Ok(()),
    }
}

/// Report the outcome; for a scheduled reminder, stay alive until it fires
async fn finish(outcome: ReminderOutcome) -> Result<()> {
    println!("{}", format_outcome(&outcome));

    let ReminderOutcome::Scheduled(scheduled) = outcome else {
        return Ok(());
    };

    let canceller = scheduled.abort_handle();
    let fired = tokio::select! {
        result = scheduled.wait() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match fired {
        Some(result) => match result? {
            Some(response) => println!("{}", format_outcome(&ReminderOutcome::Sent(response))),
            None => println!("Reminder cancelled"),
        },
        None => {
            canceller.abort();
            println!("Reminder cancelled");
        }
    }
    Ok(())
}

fn recipient(to: Option<String>, config: &Config) -> Result<String> {
    to.or_else(|| config.recipient.clone()).ok_or_else(|| {
        EstreiaError::Config(
            "No recipient: pass --to or set one with 'estreia config recipient <EMAIL>'"
                .to_string(),
        )
    })
}

fn manage_config(
    path: PathBuf,
    key: Option<String>,
    value: Option<String>,
    list: bool,
) -> Result<()> {
    let service = ConfigService::new(path);

    if list {
        // List all config
        let config = service.list()?;
        print!("{}", format_config(&config));
        Ok(())
    } else if let Some(k) = key {
        if let Some(v) = value {
            // Set config value
            service.set(&k, &v)?;
            println!("Set {} = {}", k, v);
            Ok(())
        } else {
            // Get config value
            let val = service.get(&k)?;
            println!("{}", val);
            Ok(())
        }
    } else {
        // No key provided, show usage
        println!("Usage: estreia config [--list | <key> [<value>]]");
        println!("Valid keys: api_base_url, api_timeout_ms, api_token, timezone, send_time, recipient, templates_dir");
        Ok(())
    }
}
