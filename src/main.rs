use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hvac_duct_calculator::{
    app::{self, AppError},
    config, i18n,
    duct::{form::parse_roughness, FlexDuctForm},
    report::{format_pressure_loss, format_velocity, FullReport},
    ui_cli::Prompter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hvac_duct_calculator_cli",
    about = "HVAC Duct Calculator - flexible duct velocity and pressure loss",
    version
)]
struct Cli {
    /// Language code (auto, en-us, ko)
    #[arg(short = 'L', long, global = true, default_value = "auto")]
    lang: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute velocity and total pressure loss for one flexible duct
    Calc {
        /// Duct diameter [in]
        #[arg(short, long)]
        diameter: String,

        /// Air flow [CFM]
        #[arg(short, long)]
        flow: String,

        /// Straight duct length [ft]
        #[arg(short, long)]
        length: String,

        /// Number of 45° bends
        #[arg(long, default_value = "0")]
        bends_45: String,

        /// Number of 90° bends
        #[arg(long, default_value = "0")]
        bends_90: String,

        /// Number of 180° bends
        #[arg(long, default_value = "0")]
        bends_180: String,

        /// Duct roughness: Low, Medium or High
        #[arg(short, long, default_value = "Medium")]
        roughness: String,

        /// Duct compression [%] (0-100)
        #[arg(short, long, default_value = "0")]
        compression: f64,

        /// Custom safety factor [%]; 10% is used when omitted
        #[arg(short, long)]
        safety_factor: Option<String>,

        /// Print the full report of inputs and intermediate values
        #[arg(long)]
        full: bool,
    },

    /// Interactive menu
    Interactive,

    /// Write a default config file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = config::CONFIG_PATH)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default().unwrap_or_else(|e| {
        tracing::warn!("{e}; using default settings");
        config::Config::default()
    });
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    match try_run(cli.command, &cfg, &tr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(
    command: Option<Commands>,
    cfg: &config::Config,
    tr: &i18n::Translator,
) -> Result<(), AppError> {
    match command.unwrap_or(Commands::Interactive) {
        Commands::Calc {
            diameter,
            flow,
            length,
            bends_45,
            bends_90,
            bends_180,
            roughness,
            compression,
            safety_factor,
            full,
        } => {
            let form = FlexDuctForm {
                duct_diameter_in: diameter,
                air_flow_cfm: flow,
                duct_length_ft: length,
                bend_45: bends_45,
                bend_90: bends_90,
                bend_180: bends_180,
                roughness: parse_roughness(&roughness)?,
                compression_percent: compression,
                safety_factor_enabled: safety_factor.is_some(),
                safety_factor_percent: safety_factor.unwrap_or_else(|| "10".into()),
            };
            let validated = form.validate()?;
            let result = hvac_duct_calculator::duct::compute(&validated.input);
            println!(
                "{} {}",
                tr.t(i18n::keys::RESULT_VELOCITY),
                format_velocity(&result.velocity)
            );
            println!(
                "{} {}",
                tr.t(i18n::keys::RESULT_PRESSURE_LOSS),
                format_pressure_loss(result.total_pressure_loss)
            );
            if full {
                println!();
                print!("{}", FullReport::new(&validated, &result).render_text());
            }
            Ok(())
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            app::run(cfg, tr, &mut prompter)
        }
        Commands::InitConfig { output } => {
            config::Config::default().save_to(&output)?;
            println!("{}", output.display());
            Ok(())
        }
    }
}
