use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gannscope", about = "Gann market-structure analysis for crypto OHLCV series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the retracement ladder for a price range
    Levels {
        /// Campaign high
        high: f64,
        /// Campaign low
        low: f64,
        /// Include the extended levels beyond 100%
        #[arg(long)]
        extended: bool,
    },
    /// Analyze where a price sits inside its retracement ladder
    AnalyzeLevels {
        /// Campaign high
        high: f64,
        /// Campaign low
        low: f64,
        /// Current price
        price: f64,
        /// Timeframe (monthly, weekly, daily, 4h, 1h, 15m, 5m, 1m)
        #[arg(long, default_value = "daily")]
        timeframe: String,
    },
    /// Classify one asset's campaign position
    Classify {
        /// Asset symbol, e.g. BTC
        asset: String,
        #[arg(long, default_value = "daily")]
        timeframe: String,
    },
    /// Classify several assets on one frame
    Structure {
        /// Asset symbols
        #[arg(required = true)]
        assets: Vec<String>,
        #[arg(long, default_value = "daily")]
        timeframe: String,
    },
    /// Generate trade opportunities for one frame
    Opportunities {
        /// Current price
        price: f64,
        #[arg(long, default_value = "daily")]
        timeframe: String,
        /// Campaign high (derived from the frame's range when omitted)
        #[arg(long)]
        high: Option<f64>,
        /// Campaign low (derived from the frame's range when omitted)
        #[arg(long)]
        low: Option<f64>,
        /// Capital per trade
        #[arg(long)]
        amount: Option<f64>,
        /// Evaluation date (YYYY-MM-DD or RFC3339), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Path to a JSON market outlook file
        #[arg(long)]
        outlook: Option<String>,
    },
    /// Weigh all eight frames of one asset into a directional read
    Align {
        /// Asset symbol
        asset: String,
    },
    /// Project Gann time cycle windows forward from a date
    Cycles {
        /// Start date (YYYY-MM-DD or RFC3339), defaults to now
        #[arg(long)]
        start: Option<String>,
        /// Project a single frame instead of the full table
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Forecast cycle completions from an asset's latest swing
    Forecast {
        /// Asset symbol
        asset: String,
        #[arg(long, default_value = "daily")]
        timeframe: String,
    },
    /// Recognize swing patterns in an asset's price history
    Patterns {
        /// Asset symbol
        asset: String,
        #[arg(long, default_value = "daily")]
        timeframe: String,
    },
    /// Run the full multi-frame analysis for one asset
    Batch {
        /// Asset symbol
        asset: String,
        /// Frames to analyze, comma separated; all eight when omitted
        #[arg(long, value_delimiter = ',')]
        timeframes: Vec<String>,
        /// Capital per trade
        #[arg(long)]
        amount: Option<f64>,
        /// Evaluation date (YYYY-MM-DD or RFC3339), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Size a position from account risk
    PositionSize {
        /// Account size
        account: f64,
        /// Risk percentage, e.g. 2 risks 2% of the account
        risk: f64,
        /// Entry price
        entry: f64,
        /// Stop loss price
        stop: f64,
    },
}
