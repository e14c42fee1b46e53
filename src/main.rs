use anyhow::{Context, Result};
use bdd_lint::config::CONFIG_FILENAME;
use bdd_lint::rules::{registry, WarningKind};
use bdd_lint::{Config, DetectorConfig, Engine, Severity, Warning};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bdd-lint")]
#[command(about = "Tag hygiene and anti-pattern analysis for Gherkin feature suites")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON corpus of parsed features to analyze
    corpus: Option<PathBuf>,

    /// Configuration file (defaults to bdd-lint.toml next to the corpus)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (defaults to the config's output.format)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Minimum severity to report
    #[arg(long, default_value = "info", global = true)]
    min_severity: Severity,

    /// Fail if any warning meets this severity
    #[arg(long, global = true)]
    fail_on: Option<Severity>,

    /// Only run these warning kinds or detectors (comma-separated)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Show timing information
    #[arg(long, global = true)]
    timing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a feature corpus (default)
    Check {
        /// JSON corpus of parsed features
        corpus: PathBuf,
    },
    /// Write a default bdd-lint.toml
    Init {
        /// Directory to create the file in
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// List detectors and the warning kinds they report
    Rules,
    /// Explain a warning kind or detector in detail
    Explain {
        /// Warning kind or detector id (e.g. "tag-typo")
        id: String,
    },
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Console,
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Check { corpus }) => run_check(corpus, &cli),
        None => match &cli.corpus {
            Some(corpus) => run_check(corpus, &cli),
            None => anyhow::bail!("No corpus given. Usage: bdd-lint [check] <corpus.json>"),
        },
        Some(Commands::Init { path }) => run_init(path),
        Some(Commands::Rules) => run_list_rules(),
        Some(Commands::Explain { id }) => run_explain(id),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(corpus: &Path, explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::from_file(path),
        None => Config::load_or_default(corpus),
    };
    Ok(config?)
}

/// Resolve `--rules` entries to warning kinds; detector ids expand to all
/// kinds the detector reports.
fn parse_rule_filter(filter: &str) -> Result<Vec<WarningKind>> {
    let mut kinds = Vec::new();
    for id in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(detector) = registry::get_detector(id) {
            kinds.extend_from_slice(detector.kinds());
        } else {
            let kind = id
                .parse::<WarningKind>()
                .map_err(|e| anyhow::anyhow!("{e} (see `bdd-lint rules`)"))?;
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn run_check(corpus: &Path, cli: &Cli) -> Result<()> {
    let config = load_config(corpus, cli.config.as_deref())?;
    match config.output.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {}
    }
    let format = match cli.format {
        Some(format) => format,
        None => OutputFormat::from_str(&config.output.format, true).map_err(|e| {
            anyhow::anyhow!("Invalid output.format in configuration: {e}")
        })?,
    };

    let mut detector_config = DetectorConfig::from_config(&config);
    if let Some(filter) = &cli.rules {
        let kinds = parse_rule_filter(filter)?;
        detector_config.restrict_to(&kinds);
        for kind in &kinds {
            detector_config.set_enabled(*kind, true);
        }
    }

    let start = Instant::now();
    let warnings = Engine::new(&detector_config)
        .analyze_file(corpus)
        .with_context(|| format!("Failed to analyze {}", corpus.display()))?;
    let analysis_time = start.elapsed();

    let warnings: Vec<Warning> = warnings
        .into_iter()
        .filter(|w| w.severity >= cli.min_severity)
        .collect();

    match format {
        OutputFormat::Console => bdd_lint::reporter::console::report(&warnings),
        OutputFormat::Text => print!("{}", bdd_lint::reporter::text::render(&warnings)),
        OutputFormat::Json => bdd_lint::reporter::json::report(&warnings)?,
    }

    if cli.timing {
        use colored::Colorize;
        eprintln!();
        eprintln!("{}", "Timing:".bold());
        eprintln!("  Analysis time: {:?}", analysis_time);
        eprintln!("  Warnings:      {}", warnings.len());
    }

    if let Some(fail_severity) = cli.fail_on {
        let failing = warnings.iter().filter(|w| w.severity >= fail_severity).count();
        if failing > 0 {
            anyhow::bail!(
                "Found {} warning(s) at or above {} severity",
                failing,
                fail_severity
            );
        }
    }

    Ok(())
}

fn run_init(path: &Path) -> Result<()> {
    let config_path = path.join(CONFIG_FILENAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILENAME);
    }
    std::fs::write(&config_path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());
    Ok(())
}

fn run_list_rules() -> Result<()> {
    println!("Available detectors:\n");
    for detector in registry::all_detectors() {
        println!("  {:<22} {}", detector.id(), detector.description());
        for kind in detector.kinds() {
            let default = if kind.enabled_by_default() { "" } else { " (off by default)" };
            println!(
                "    {:<24} [{}]{} {}",
                kind.id(),
                kind.default_severity(),
                default,
                kind.description()
            );
        }
        println!();
    }
    println!("Use `bdd-lint explain <kind>` for detailed information.");
    Ok(())
}

fn run_explain(id: &str) -> Result<()> {
    use colored::Colorize;

    if let Some(detector) = registry::get_detector(id) {
        println!("{}", detector.name().bold().underline());
        println!("Detector ID: {}", detector.id().cyan());
        println!();
        println!("{}", detector.description());
        println!();
        println!("{}", "Reports:".yellow().bold());
        for kind in detector.kinds() {
            println!("  {:<24} {}", kind.id(), kind.description());
        }
        return Ok(());
    }

    let kind = match id.parse::<WarningKind>() {
        Ok(kind) => kind,
        Err(_) => {
            eprintln!("{} Unknown warning kind: {}", "error:".red().bold(), id);
            eprintln!("\nAvailable kinds:");
            for kind in WarningKind::ALL {
                eprintln!("  {}", kind);
            }
            anyhow::bail!("Unknown warning kind: {}", id);
        }
    };

    let detector = registry::all_detectors()
        .into_iter()
        .find(|d| d.kinds().contains(&kind));

    println!("{}", kind.id().bold().underline());
    println!("Severity: {}", kind.default_severity());
    if let Some(detector) = detector {
        println!("Detector: {}", detector.id().cyan());
    }
    if !kind.enabled_by_default() {
        println!("Enabled:  {}", "no (opt in via [rules.<kind>] enabled = true)".yellow());
    }
    println!();
    println!("{}", kind.description());
    println!();

    print_kind_explanation(kind);

    println!();
    println!("{}", "Configuration:".yellow().bold());
    println!("  [rules.{}]", kind.id());
    println!("  enabled = {}", kind.enabled_by_default());
    println!("  severity = \"{}\"", kind.default_severity());
    Ok(())
}

fn print_kind_explanation(kind: WarningKind) {
    use colored::Colorize;

    let (why, bad, good): (&str, &[&str], &[&str]) = match kind {
        WarningKind::MissingPriorityTag => (
            "Without a priority tag nobody can run \"the critical scenarios\" before a release.",
            &["Scenario: Pay by card"],
            &["@P0", "Scenario: Pay by card"],
        ),
        WarningKind::MissingTypeTag => (
            "Type tags (@ui, @api, ...) let CI run fast suites separately from slow ones.",
            &["Scenario: Create an order"],
            &["@api", "Scenario: Create an order"],
        ),
        WarningKind::TagTypo => (
            "A misspelled tag silently drops the scenario from every run filtering on the real tag.",
            &["@Regresion", "Scenario: Refund an order"],
            &["@Regression", "Scenario: Refund an order"],
        ),
        WarningKind::InconsistentTagging => (
            "Tag filters are case-sensitive in most runners; @API and @api select different sets.",
            &["@API  (feature A)", "@api  (feature B)"],
            &["@api  (both features)"],
        ),
        WarningKind::TooGenericTag => (
            "A tag on almost every feature filters nothing and hides the tags that matter.",
            &["@web on 48 of 50 features"],
            &["@checkout, @search, @profile"],
        ),
        WarningKind::OrphanedTag => (
            "A tag used once is usually a leftover or a one-off that no run configuration selects.",
            &["@spike_2021 on a single scenario"],
            &["Remove it, or reuse an established tag"],
        ),
        WarningKind::LongScenario => (
            "Long scenarios test several behaviors at once and are hard to diagnose when they fail.",
            &["Scenario with 14 steps covering signup, login and checkout"],
            &["Three focused scenarios, one per behavior"],
        ),
        WarningKind::IncorrectStepOrder => (
            "Given sets context, When acts, Then checks. Acting after checking hides a second scenario.",
            &["Given a cart", "When I pay", "Then I see a receipt", "When I pay again"],
            &["Given a paid order", "When I pay again", "Then the payment is rejected"],
        ),
        WarningKind::UiCoupling => (
            "Steps tied to widgets break on every redesign and hide the business intent.",
            &["When I click the \"Submit\" button"],
            &["When I submit the order"],
        ),
        WarningKind::ImplementationDetail => (
            "HTTP verbs, SQL and selectors belong in step definitions, not in the specification.",
            &["When a POST request is sent to /api/orders"],
            &["When the customer places an order"],
        ),
        WarningKind::MissingExamples => (
            "A Scenario Outline without Examples never runs.",
            &["Scenario Outline: Discounts", "  Then the price is <price>"],
            &["Scenario Outline: Discounts", "  Then the price is <price>", "  Examples:", "    | price |", "    | 10    |", "    | 20    |"],
        ),
        WarningKind::AmbiguousPronoun => (
            "Pronouns force the reader to guess what the step refers to.",
            &["Then it should be saved"],
            &["Then the invoice should be saved"],
        ),
        WarningKind::ConjunctionInStep => (
            "A step joining two actions fails without telling you which one broke.",
            &["When I add an item and check out"],
            &["When I add an item", "And I check out"],
        ),
        _ => {
            println!("No detailed explanation available for this kind.");
            println!("Run `bdd-lint rules` to see all warning kinds.");
            return;
        }
    };

    println!("{}", "Why it matters:".yellow().bold());
    println!("  {}", why);
    println!();
    println!("{}", "Bad:".red().bold());
    for line in bad {
        println!("  {}", line);
    }
    println!();
    println!("{}", "Good:".green().bold());
    for line in good {
        println!("  {}", line);
    }
}
