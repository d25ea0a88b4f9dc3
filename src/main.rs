use clap::Parser;
use gannscope::application::opportunities::OpportunityRequest;
use gannscope::cli::commands::{Cli, Commands};
use gannscope::domain::values::hierarchy::MarketOutlook;
use gannscope::domain::values::timeframe::Timeframe;
use gannscope::GannScope;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let gs = GannScope::new();

    let result = run_command(gs, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(gs: GannScope, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Levels {
            high,
            low,
            extended,
        } => {
            let ladder = gs.levels(high, low, extended)?;
            println!("{}", serde_json::to_string_pretty(&ladder).unwrap());
        }
        Commands::AnalyzeLevels {
            high,
            low,
            price,
            timeframe,
        } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let analysis = gs.analyze_levels(high, low, price, tf)?;
            println!("{}", serde_json::to_string_pretty(&analysis).unwrap());
        }
        Commands::Classify { asset, timeframe } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let classification = gs.classify(&asset, tf).await?;
            println!("{}", serde_json::to_string_pretty(&classification).unwrap());
        }
        Commands::Structure { assets, timeframe } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let scan = gs.structure_scan(&assets, tf).await;
            println!("{}", serde_json::to_string_pretty(&scan).unwrap());
        }
        Commands::Opportunities {
            price,
            timeframe,
            high,
            low,
            amount,
            date,
            outlook,
        } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let evaluated_on = parse_date(&date)?.map(|dt| dt.date_naive());
            let outlook = match outlook {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
                None => MarketOutlook::new(),
            };
            let request = OpportunityRequest {
                timeframe: tf,
                current_price: price,
                campaign_high: high,
                campaign_low: low,
                trade_amount: amount,
                evaluated_on,
                outlook,
            };
            let scan = gs.opportunities(&request)?;
            println!("{}", serde_json::to_string_pretty(&scan).unwrap());
        }
        Commands::Align { asset } => {
            let report = gs.align(&asset).await?;
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        Commands::Cycles { start, timeframe } => {
            let start = parse_date(&start)?.unwrap_or_else(chrono::Utc::now);
            match timeframe {
                Some(tf) => {
                    let tf: Timeframe = tf.parse().map_err(|e: String| e)?;
                    let frame = gs.project_timeframe_cycles(start, tf);
                    println!("{}", serde_json::to_string_pretty(&frame).unwrap());
                }
                None => {
                    let table = gs.project_cycles(start);
                    println!("{}", serde_json::to_string_pretty(&table).unwrap());
                }
            }
        }
        Commands::Forecast { asset, timeframe } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let report = gs.forecast(&asset, tf).await?;
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        Commands::Patterns { asset, timeframe } => {
            let tf: Timeframe = timeframe.parse().map_err(|e: String| e)?;
            let report = gs.patterns(&asset, tf).await?;
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        Commands::Batch {
            asset,
            timeframes,
            amount,
            date,
        } => {
            let frames: Vec<Timeframe> = if timeframes.is_empty() {
                Timeframe::ALL.to_vec()
            } else {
                timeframes
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<_, String>>()?
            };
            let evaluated_on = parse_date(&date)?.map(|dt| dt.date_naive());
            let report = gs.batch(&asset, &frames, amount, evaluated_on).await?;
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        Commands::PositionSize {
            account,
            risk,
            entry,
            stop,
        } => {
            let size = gs.position_size(account, risk, entry, stop)?;
            println!("{}", serde_json::to_string_pretty(&size).unwrap());
        }
    }
    Ok(())
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::DateTime<chrono::Utc>>, String> {
    match s {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&chrono::Utc)));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                let dt = date.and_hms_opt(0, 0, 0).unwrap();
                return Ok(Some(chrono::DateTime::from_naive_utc_and_offset(
                    dt,
                    chrono::Utc,
                )));
            }
            Err(format!(
                "Invalid date format: {s}. Use YYYY-MM-DD or RFC3339"
            ))
        }
    }
}
