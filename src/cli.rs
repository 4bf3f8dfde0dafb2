//! The command line interface for the model.
use crate::assumptions::EconomicAssumptions;
use crate::log;
use crate::output::{create_output_directory, write_results};
use crate::prices::PriceTable;
use crate::scenario::{ScenarioInput, ScenarioResult, run_model};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the model.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// The choices for a single run of the model
#[derive(Args)]
pub struct RunArgs {
    /// Path to the CSV file of electricity prices by region [default: from settings]
    pub prices_file: Option<PathBuf>,
    /// The region (e.g. US state) whose electricity price is used
    #[arg(short, long)]
    pub region: String,
    /// System size (kW DC)
    #[arg(short, long, default_value_t = 10.0)]
    pub size: f64,
    /// Project horizon in years [default: the horizon in the economic assumptions]
    #[arg(short, long)]
    pub years: Option<u32>,
    /// Path to a TOML file of economic assumptions [default: from settings, if the file exists]
    #[arg(short, long)]
    pub assumptions: Option<PathBuf>,
    /// Other run options
    #[command(flatten)]
    pub opts: RunOpts,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the model for a single scenario.
    Run(RunArgs),
    /// List the regions in a price file.
    Regions {
        /// Path to the CSV file of electricity prices by region [default: from settings]
        prices_file: Option<PathBuf>,
    },
    /// Manage settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run(args) => handle_run_command(&args, None).map(|_| ()),
            Self::Regions { prices_file } => {
                handle_regions_command(prices_file.as_deref(), None)
            }
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ solar_model --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Initialise the program logger, unless this has already been done
fn init_logger(settings: &Settings, log_file_path: Option<&Path>) -> Result<()> {
    log::init(&settings.log_level, log_file_path).context("Failed to initialise logging.")?;
    Ok(())
}

/// Handle the `run` command.
///
/// # Returns
///
/// The results of the run, which have also been printed to the console.
pub fn handle_run_command(args: &RunArgs, settings: Option<Settings>) -> Result<ScenarioResult> {
    let settings = load_settings(settings)?;

    // Create the output folder, if the user wants one
    let mut overwrite = false;
    if let Some(output_path) = args.opts.output_dir.as_deref() {
        overwrite = create_output_directory(output_path, args.opts.overwrite || settings.overwrite)
            .with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    output_path.display()
                )
            })?;
    }

    init_logger(&settings, args.opts.output_dir.as_deref())?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let assumptions_file = settings.assumptions_path(args.assumptions.as_deref());
    let assumptions = EconomicAssumptions::load(assumptions_file)
        .context("Failed to load economic assumptions.")?;
    if let Some(file_path) = assumptions_file {
        info!("Loaded economic assumptions from {}", file_path.display());
    }

    let prices_file = settings.prices_path(args.prices_file.as_deref());
    let prices = PriceTable::from_path(prices_file).context("Failed to load prices.")?;
    info!("Loaded prices from {}", prices_file.display());

    let region = prices
        .region_name(&args.region)
        .unwrap_or(args.region.as_str());
    let input = ScenarioInput::new(
        region,
        args.size,
        args.years.unwrap_or(assumptions.project_years),
    );
    let result = run_model(&prices, &assumptions, &input).context("Error running model.")?;

    print_summary(&input, &result);
    print_cashflow_table(&result);

    if let Some(output_path) = args.opts.output_dir.as_deref() {
        write_results(output_path, &input, &result)?;
        info!("Results written to {}", output_path.display());
    }

    Ok(result)
}

/// Handle the `regions` command.
pub fn handle_regions_command(
    prices_file: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    init_logger(&settings, None)?;

    let prices_file = settings.prices_path(prices_file);
    let prices = PriceTable::from_path(prices_file).context("Failed to load prices.")?;
    for region in prices.regions() {
        println!("{region}");
    }

    Ok(())
}

/// Print the headline metrics for a run
fn print_summary(input: &ScenarioInput, result: &ScenarioResult) {
    let irr = result
        .irr
        .map_or_else(|| "N/A".to_string(), |irr| format!("{:.2}%", irr * 100.0));
    let payback = result
        .payback_year
        .map_or_else(|| "N/A".to_string(), |year| format!("{year} years"));

    println!(
        "Solar project: {} kW in {} over {} years (base price ${:.4}/kWh)",
        input.system_size, input.region, input.years, result.base_price
    );
    println!("  Upfront cost:      ${:.2}", result.upfront_cost);
    println!("  Annual generation: {:.0} kWh", result.annual_generation);
    println!("  Project IRR:       {irr}");
    println!("  Payback period:    {payback}");
    println!();
}

/// Print the cash-flow table for a run
fn print_cashflow_table(result: &ScenarioResult) {
    println!(
        "{:>4} {:>10} {:>14} {:>10} {:>14} {:>16}",
        "year", "price/kWh", "generation kWh", "O&M", "net cash flow", "cumulative"
    );
    for row in &result.cashflow_table {
        let price = row
            .price_per_kwh
            .map_or_else(String::new, |price| format!("{price:.4}"));
        println!(
            "{:>4} {:>10} {:>14.0} {:>10.2} {:>14.2} {:>16.2}",
            row.year,
            price,
            row.generation_kwh,
            row.om_cost,
            row.net_cashflow,
            row.cumulative_cashflow
        );
    }
}
