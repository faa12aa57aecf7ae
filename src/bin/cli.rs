//! bs-pricer CLI
//!
//! Prices a listed European option from live Yahoo Finance data. Any
//! selection not given as a flag is prompted for interactively.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bs_pricer::prelude::*;

/// Black-Scholes option pricing with real-time data
#[derive(Parser)]
#[command(name = "bs-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Stock ticker symbol, e.g. AAPL
    ticker: Option<String>,

    /// Expiration date by its number in the listed dates
    #[arg(short, long)]
    expiry: Option<usize>,

    /// Strike price by its number in the listed strikes
    #[arg(short, long)]
    strike: Option<usize>,

    /// Option type: call or put
    #[arg(short = 't', long)]
    option_type: Option<String>,

    /// Fixed annual risk-free rate as a decimal (overrides the config file)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Volatility lookback: 1mo, 3mo, 6mo, 1y, 2y, 5y
    #[arg(short, long)]
    lookback: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let result = launch(&cli);
    finish(result, &mut io::stderr())
}

/// Map the outcome to an exit code, reporting failures on `err`
fn finish(result: PricingResult<()>, err: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error ({}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> PricingResult<PricerConfig> {
    let mut config = PricerConfig::load(cli.config.as_deref())?;

    if let Some(rate) = cli.rate {
        config.risk_free_rate = rate;
        config.rate_source = RateSourceKind::Fixed;
    }
    if let Some(lookback) = &cli.lookback {
        config.lookback = lookback.parse()?;
    }

    config.validate()?;
    Ok(config)
}

/// Wire the live collaborators and terminal streams into `run`
fn launch(cli: &Cli) -> PricingResult<()> {
    let config = load_config(cli)?;

    let yahoo = YahooClient::with_config(config.yahoo.clone())?;
    let rates: Box<dyn RiskFreeRateSource> = match config.rate_source {
        RateSourceKind::Fixed => Box::new(FixedRate(config.risk_free_rate)),
        RateSourceKind::Treasury => Box::new(TreasuryBillRate::new(yahoo.clone())),
    };

    // Menus move to stderr under --json so stdout carries only the document
    let menus: Box<dyn Write> = if cli.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), menus);

    let market = Market {
        provider: &yahoo,
        rates: rates.as_ref(),
        today: Utc::now().date_naive(),
    };
    run(cli, &config, &market, &mut prompter, &mut io::stdout())
}

/// Data sources and the pricing date for one run
struct Market<'a> {
    provider: &'a dyn MarketDataProvider,
    rates: &'a dyn RiskFreeRateSource,
    today: NaiveDate,
}

/// Resolve ticker, expiry, type and strike (prompting for any not given on
/// the command line), price, and write the report to `out`.
fn run<R: BufRead, W: Write>(
    cli: &Cli,
    config: &PricerConfig,
    market: &Market<'_>,
    prompter: &mut Prompter<R, W>,
    out: &mut impl Write,
) -> PricingResult<()> {
    let today = market.today;

    let ticker = match &cli.ticker {
        Some(t) => t.trim().to_ascii_uppercase(),
        None => {
            prompter.say("Black-Scholes Option Pricing Model with Real-Time Data")?;
            prompter
                .ask("Enter the stock ticker symbol (e.g., AAPL): ")?
                .to_ascii_uppercase()
        }
    };
    if ticker.is_empty() {
        return Err(PricingError::invalid_input("ticker symbol is empty"));
    }

    let session = PricingSession::configured(market.provider, market.rates, config)?;

    let expirations = session.expirations(&ticker)?;
    let expiry_choice = match cli.expiry {
        Some(n) => n,
        None => {
            prompter.say("\nAvailable Expiration Dates:")?;
            for (idx, exp) in expirations.iter().enumerate() {
                prompter.say(&format!("{}: {}", idx + 1, exp))?;
            }
            parse_choice(&prompter.ask("Select an expiration date by number: ")?)?
        }
    };
    let expiry = expirations.select(expiry_choice)?;
    time_to_expiry(expiry, today)?;

    let option_type: OptionType = match &cli.option_type {
        Some(t) => t.parse()?,
        None => prompter.ask("Option type ('call' or 'put'): ")?.parse()?,
    };

    let chain = session.chain(&ticker, expiry)?;
    let strikes = chain.strikes(option_type);
    if strikes.is_empty() {
        return Err(PricingError::data_unavailable(format!(
            "No {} strikes listed for {} expiring {}",
            option_type, ticker, expiry
        )));
    }
    let strike_choice = match cli.strike {
        Some(n) => n,
        None => {
            prompter.say("\nAvailable Strike Prices:")?;
            for (idx, strike) in strikes.iter().enumerate() {
                prompter.say(&format!("{}: {}", idx + 1, strike))?;
            }
            parse_choice(&prompter.ask("Select a strike price by number: ")?)?
        }
    };
    let strike = chain.select_strike(option_type, strike_choice)?;

    let request = PricingRequest::new(&ticker, expiry, strike, option_type);
    let report = session.price(&request, today)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| PricingError::Serialization(e.to_string()))?;
        writeln!(out, "{}", json)?;
    } else {
        writeln!(out, "\n{}", report)?;
    }
    Ok(())
}

/// Parse a 1-based menu selection
fn parse_choice(text: &str) -> PricingResult<usize> {
    text.trim().parse().map_err(|_| {
        PricingError::invalid_input(format!("'{}' is not a valid selection number", text.trim()))
    })
}

/// Line-oriented prompts over any reader/writer pair
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, line: &str) -> PricingResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> PricingResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PricingError::invalid_input(format!(
                "no answer given to '{}'",
                prompt.trim()
            )));
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(" 3\n").unwrap(), 3);
        assert!(matches!(parse_choice("three"), Err(PricingError::InvalidInput(_))));
        assert!(matches!(parse_choice("-1"), Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_prompter() {
        let input = b"aapl\n2\n".as_slice();
        let mut output = Vec::new();
        let mut prompter = Prompter::new(input, &mut output);

        assert_eq!(prompter.ask("Ticker: ").unwrap(), "aapl");
        assert_eq!(prompter.ask("Choice: ").unwrap(), "2");
        assert!(matches!(
            prompter.ask("More: "),
            Err(PricingError::InvalidInput(_))
        ));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Ticker: Choice: "));
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> StaticMarketData {
        let mut june = OptionChain::new("XYZ", date(2026, 6, 19));
        june.add_call(100.0);
        june.add_call(110.0);
        june.add_put(80.0);
        june.add_put(90.0);

        StaticMarketData::new()
            .with_spot("XYZ", 100.0)
            .with_history("XYZ", vec![100.0, 102.0, 101.0, 105.0, 103.0, 104.0])
            .with_listing("XYZ", date(2026, 1, 16), &[95.0, 100.0, 105.0])
            .with_chain(june)
    }

    /// Run the CLI offline; returns the outcome, the menu text and stdout
    fn run_scripted(
        args: &[&str],
        script: &str,
        market: &StaticMarketData,
    ) -> (PricingResult<()>, String, String) {
        let cli = Cli::parse_from(args);
        let config = load_config(&cli).unwrap();
        let rates = FixedRate(config.risk_free_rate);
        let ctx = Market {
            provider: market,
            rates: &rates,
            today: date(2025, 12, 1),
        };

        let mut menus = Vec::new();
        let mut out = Vec::new();
        let mut prompter = Prompter::new(script.as_bytes(), &mut menus);
        let result = run(&cli, &config, &ctx, &mut prompter, &mut out);

        (
            result,
            String::from_utf8(menus).unwrap(),
            String::from_utf8(out).unwrap(),
        )
    }

    #[test]
    fn test_interactive_put() {
        let market = snapshot();
        let (result, menus, out) = run_scripted(&["bs-pricer", "xyz"], "2\nput\n1\n", &market);
        result.unwrap();

        assert!(menus.contains("Available Expiration Dates:\n1: 2026-01-16\n2: 2026-06-19\n"));
        assert!(menus.contains("Select an expiration date by number: "));
        assert!(menus.contains("Available Strike Prices:\n1: 80\n2: 90\n"));
        assert!(!menus.contains("110"));
        let type_prompt = menus.find("Option type ('call' or 'put'): ").unwrap();
        let strike_menu = menus.find("Available Strike Prices:").unwrap();
        assert!(type_prompt < strike_menu);

        let rates = FixedRate(0.045);
        let session = PricingSession::new(&market, &rates);
        let request = PricingRequest::new("XYZ", date(2026, 6, 19), 80.0, OptionType::Put);
        let expected = session.price(&request, date(2025, 12, 1)).unwrap();

        assert!(out.contains("Ticker: XYZ"));
        assert!(out.contains("Strike Price (K): $80.00"));
        assert!(out.contains(&format!("Put Option Price: ${:.2}", expected.price())));
    }

    #[test]
    fn test_flags_skip_prompts() {
        let market = snapshot();
        let args = ["bs-pricer", "XYZ", "-e", "1", "-t", "call", "-s", "2", "-r", "0.03"];
        let (result, menus, out) = run_scripted(&args, "", &market);
        result.unwrap();

        assert!(menus.is_empty());
        assert!(out.contains("Strike Price (K): $100.00"));
        assert!(out.contains("Risk-Free Interest Rate (r): 3.00%"));
        assert!(out.contains("Call Option Price: $"));
    }

    #[test]
    fn test_json_output_is_clean() {
        let market = snapshot();
        let (result, menus, out) =
            run_scripted(&["bs-pricer", "XYZ", "--json", "-t", "call"], "1\n3\n", &market);
        result.unwrap();

        assert!(menus.contains("Available Strike Prices:"));
        assert!(!out.contains("Available"));
        assert!(!out.contains("Select"));

        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["ticker"], "XYZ");
        assert_eq!(doc["expiry"], "2026-01-16");
        assert_eq!(doc["spot"], 100.0);
        assert_eq!(doc["result"]["inputs"]["strike"], 105.0);
        assert_eq!(doc["result"]["option_type"], "call");
        assert!(doc["result"]["price"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_prompted_ticker() {
        let market = snapshot();
        let (result, menus, out) =
            run_scripted(&["bs-pricer"], "xyz\n1\nc\n2\n", &market);
        result.unwrap();

        assert!(menus.starts_with("Black-Scholes Option Pricing Model with Real-Time Data\n"));
        assert!(out.contains("Ticker: XYZ"));
    }

    #[test]
    fn test_out_of_range_selection() {
        let market = snapshot();
        let (result, _, out) = run_scripted(&["bs-pricer", "XYZ"], "7\n", &market);
        let err = result.unwrap_err();

        assert!(matches!(err, PricingError::InvalidInput(_)));
        assert!(out.is_empty());

        let mut stderr = Vec::new();
        let code = finish(Err(err), &mut stderr);
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        assert!(String::from_utf8(stderr).unwrap().starts_with("Error (InvalidInputError): "));
    }

    #[test]
    fn test_unknown_ticker_fails() {
        let market = snapshot();
        let (result, _, _) = run_scripted(&["bs-pricer", "ZZZ"], "1\n", &market);
        assert!(matches!(result, Err(PricingError::DataUnavailable(_))));
    }

    #[test]
    fn test_success_exit_code() {
        let mut stderr = Vec::new();
        let code = finish(Ok(()), &mut stderr);
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_config_overrides() {
        let cli =
            Cli::parse_from(["bs-pricer", "AAPL", "--rate", "0.03", "--lookback", "6mo"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.risk_free_rate, 0.03);
        assert_eq!(config.rate_source, RateSourceKind::Fixed);
        assert_eq!(config.lookback, LookbackPeriod::SixMonths);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let cli = Cli::parse_from(["bs-pricer", "AAPL", "--rate=-0.01"]);
        assert!(matches!(load_config(&cli), Err(PricingError::Config(_))));
    }
}
