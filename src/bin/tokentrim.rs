//! TokenTrim CLI binary.
//!
//! Token estimation and prompt rewriting from the command line.
//!
//! # Commands
//!
//! - `estimate` - Estimate token counts per tokenizer family
//! - `optimize` - Rewrite a prompt into a shorter equivalent
//! - `report` - Price a rewrite against a provider's model
//! - `diff` - Show a word diff between a prompt and its rewrite
//! - `models` - List the provider catalog
//! - `scan` - Scan a prompt for sensitive data

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokentrim::{
    config::Config,
    models::{ModelRegistry, TokenizerFamily},
    rewrite::{generate_diff, DiffKind, DiffSegment, DiffSummary, RuleSet, RuleTables},
    security::SensitiveDataScanner,
    text::TextMetrics,
    tokenizer::estimate_tokens,
    Optimizer, RewriteEngine, VERSION,
};

#[derive(Parser)]
#[command(name = "tokentrim")]
#[command(version = VERSION)]
#[command(about = "TokenTrim - Token estimation and prompt rewriting for LLM chats", long_about = None)]
struct Cli {
    /// Config file path (default: <config dir>/tokentrim/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Custom rewrite rule tables (TOML)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Prompt text (or - for stdin)
    input: Option<String>,

    /// Input file path
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate token counts
    Estimate {
        #[command(flatten)]
        input: InputArgs,

        /// Tokenizer family (gpt, claude, gemini, llama, deepseek, grok, mistral, all)
        #[arg(long, default_value = "all")]
        family: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a prompt into a shorter equivalent
    Optimize {
        #[command(flatten)]
        input: InputArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show length statistics
        #[arg(short, long)]
        stats: bool,

        /// List the applied changes
        #[arg(long)]
        changes: bool,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report token and cost savings for a provider
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Provider host (default from config)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model ID (default: the provider's default model)
        #[arg(short, long)]
        model: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a word diff between a prompt and its rewrite
    Diff {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List providers and model pricing
    Models {
        /// Filter by provider host or name
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Scan a prompt for sensitive data
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Print the prompt with findings replaced by placeholders
        #[arg(short, long)]
        redact: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config)?;
    let engine = build_engine(&config, cli.rules)?;

    match cli.command {
        Commands::Estimate {
            input,
            family,
            json,
        } => cmd_estimate(input, &family, json),

        Commands::Optimize {
            input,
            output,
            stats,
            changes,
            json,
        } => cmd_optimize(&engine, input, output, stats, changes, json),

        Commands::Report {
            input,
            provider,
            model,
            json,
        } => cmd_report(&config, engine, input, provider, model, json),

        Commands::Diff { input, json } => cmd_diff(&engine, input, json),

        Commands::Models { provider } => cmd_models(provider),

        Commands::Scan {
            input,
            redact,
            json,
        } => cmd_scan(&config, input, redact, json),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::from_file(&path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        },
        None => Config::load()?,
    };
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn build_engine(config: &Config, rules: Option<PathBuf>) -> anyhow::Result<RewriteEngine> {
    let engine = RewriteEngine::with_config(&config.engine);
    match rules {
        Some(path) => {
            let tables = RuleTables::from_file(&path)?;
            tracing::debug!(path = %path.display(), "custom rule tables loaded");
            Ok(engine.with_rules(RuleSet::from_tables(&tables)?))
        },
        None => Ok(engine),
    }
}

fn cmd_estimate(input: InputArgs, family: &str, json_output: bool) -> anyhow::Result<()> {
    let content = read_input(input)?;

    let families: Vec<TokenizerFamily> = if family.eq_ignore_ascii_case("all") {
        TokenizerFamily::ALL.to_vec()
    } else {
        vec![family
            .parse::<TokenizerFamily>()
            .map_err(anyhow::Error::msg)?]
    };

    let metrics = TextMetrics::measure(&content);
    let estimates: Vec<(TokenizerFamily, usize)> = families
        .into_iter()
        .map(|f| (f, estimate_tokens(&content, f)))
        .collect();

    if json_output {
        let output = serde_json::json!({
            "words": metrics.words,
            "chars": metrics.chars,
            "estimates": estimates
                .iter()
                .map(|(f, tokens)| (f.name().to_string(), serde_json::json!(tokens)))
                .collect::<serde_json::Map<_, _>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Words: {}  Characters: {}", metrics.words, metrics.chars);
        println!();
        println!("{:<10} {:>8}", "Family", "Tokens");
        println!("{}", "-".repeat(19));
        for (family, tokens) in &estimates {
            println!("{:<10} {:>8}", family.name(), tokens);
        }
    }

    Ok(())
}

fn cmd_optimize(
    engine: &RewriteEngine,
    input: InputArgs,
    output: Option<PathBuf>,
    stats: bool,
    changes: bool,
    json_output: bool,
) -> anyhow::Result<()> {
    let content = read_input(input)?;
    let result = engine.optimize(&content);

    if json_output {
        write_output(output, &serde_json::to_string_pretty(&result)?)?;
        return Ok(());
    }

    write_output(output, &result.optimized_text)?;

    if changes {
        eprintln!();
        if result.changes.is_empty() {
            eprintln!("No changes applied");
        } else {
            eprintln!("Changes:");
            for change in &result.changes {
                eprintln!("  [{}] {}", change.kind, change);
            }
        }
    }

    if stats {
        eprintln!();
        eprintln!("Optimization Statistics:");
        eprintln!("  Original:     {} chars", result.stats.original_length);
        eprintln!("  Optimized:    {} chars", result.stats.optimized_length);
        eprintln!("  Reduction:    {}%", result.stats.reduction_percent);
        eprintln!("  Changes:      {}", result.changes.len());
    }

    Ok(())
}

fn cmd_report(
    config: &Config,
    engine: RewriteEngine,
    input: InputArgs,
    provider: Option<String>,
    model: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let content = read_input(input)?;
    let provider = provider.unwrap_or_else(|| config.report.default_provider.clone());
    let model = model.unwrap_or_else(|| config.report.default_model.clone());

    let optimizer = Optimizer::from_config(config).with_engine(engine);
    let report = optimizer.report(&content, &provider, &model)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.model_fell_back && !model.is_empty() {
        eprintln!(
            "Warning: unknown model '{model}', using {} default {}",
            report.provider_name, report.model
        );
    }

    println!("{}", report.optimization.optimized_text);
    println!();
    println!("Optimization Report:");
    println!("  Provider:     {} ({})", report.provider_name, report.provider);
    println!("  Model:        {}", report.model);
    println!("  Tokenizer:    {}", report.family);
    println!(
        "  Tokens:       {} -> {} (saved {}, {:.1}%)",
        report.original_tokens, report.optimized_tokens, report.tokens_saved, report.savings_percent
    );
    println!(
        "  Cost:         {} -> {} (saved {})",
        format_cost(report.original_cost),
        format_cost(report.optimized_cost),
        format_cost(report.cost_saved)
    );
    println!("  Changes:      {}", report.optimization.changes.len());

    Ok(())
}

fn cmd_diff(engine: &RewriteEngine, input: InputArgs, json_output: bool) -> anyhow::Result<()> {
    let content = read_input(input)?;
    let result = engine.optimize(&content);
    let diff = generate_diff(&content, &result.optimized_text);
    let summary = DiffSummary::of(&diff);

    if json_output {
        let output = serde_json::json!({
            "segments": diff,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render_diff(&diff));
        eprintln!();
        eprintln!(
            "{} unchanged, {} removed, {} added",
            summary.unchanged, summary.removed, summary.added
        );
    }

    Ok(())
}

fn cmd_models(provider: Option<String>) -> anyhow::Result<()> {
    let registry = ModelRegistry::new();
    let filter = provider.map(|p| p.to_lowercase());

    let providers: Vec<_> = registry
        .iter()
        .filter(|card| match &filter {
            Some(f) => card.host.to_lowercase().contains(f) || card.name.to_lowercase().contains(f),
            None => true,
        })
        .collect();

    if providers.is_empty() {
        eprintln!("Provider not found: {}", filter.unwrap_or_default());
        eprintln!("Try 'tokentrim models' to list all providers");
        std::process::exit(1);
    }

    for (i, card) in providers.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({}, {} tokenizer)", card.name, card.host, card.family);
        println!(
            "  {:<28} {:<26} {:>10} {:>10}",
            "ID", "Name", "Input/1M", "Output/1M"
        );
        println!("  {}", "-".repeat(77));

        for (j, model) in card.models.iter().enumerate() {
            let marker = if j == 0 { "*" } else { " " };
            println!(
                "{marker} {:<28} {:<26} {:>10} {:>10}",
                model.id,
                model.name,
                format!("${:.2}", model.pricing.input_per_million),
                format!("${:.2}", model.pricing.output_per_million),
            );
        }
    }

    println!();
    println!("* default model");

    Ok(())
}

fn cmd_scan(
    config: &Config,
    input: InputArgs,
    redact: bool,
    json_output: bool,
) -> anyhow::Result<()> {
    let content = read_input(input)?;
    let scanner = SensitiveDataScanner::from_config(&config.scan);

    if redact {
        println!("{}", scanner.redact(&content)?);
        return Ok(());
    }

    let result = scanner.scan(&content)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let risk = format!("{:?}", result.risk_level).to_uppercase();
    if result.safe {
        println!("SAFE (risk: {risk})");
    } else {
        println!("UNSAFE (risk: {risk})");
    }
    println!("{}", result.summary);

    if !result.findings.is_empty() {
        println!();
        println!("Findings:");
        for finding in &result.findings {
            println!(
                "  - {} ({}, {}) at {}..{}: {}",
                finding.kind,
                finding.category,
                finding.severity,
                finding.start,
                finding.end,
                finding.masked
            );
        }
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &result.recommendations {
            println!("  - {rec}");
        }
    }

    Ok(())
}

// Helper functions

/// Format a USD amount for display, switching to per-mille and cents for
/// amounts too small to read in dollars
fn format_cost(cost: f64) -> String {
    if cost < 0.001 {
        format!("${:.3}‰", cost * 1000.0)
    } else if cost < 0.01 {
        format!("${:.2}¢", cost * 100.0)
    } else {
        format!("${cost:.4}")
    }
}

/// Render a diff as text, marking removed words `[-...-]` and added words `{+...+}`
fn render_diff(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        let blank = seg.text.trim().is_empty();
        match seg.kind {
            DiffKind::Unchanged => out.push_str(&seg.text),
            DiffKind::Removed if blank => {},
            DiffKind::Removed => out.push_str(&format!("[-{}-]", seg.text)),
            DiffKind::Added if blank => out.push_str(&seg.text),
            DiffKind::Added => out.push_str(&format!("{{+{}+}}", seg.text)),
        }
    }
    out
}

fn read_input(input: InputArgs) -> anyhow::Result<String> {
    if let Some(path) = input.file {
        Ok(std::fs::read_to_string(path)?)
    } else if let Some(s) = input.input {
        if s == "-" {
            read_stdin()
        } else {
            Ok(s)
        }
    } else {
        read_stdin()
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn write_output(output: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}
