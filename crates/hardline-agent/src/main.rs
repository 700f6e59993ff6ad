//! Hardline Agent - host compliance and hardening CLI
//!
//! One-shot operations against the local machine: audit the policy under a
//! severity profile, remediate a single rule, roll a rule back, or reset
//! everything the policy covers. The HTTP dashboard drives the same engine
//! surface; this binary is the operator's direct path to it.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use hardline_core::{AuditResult, Policy, Profile};
use hardline_engine::Engine;
use hardline_state::Journal;

/// Hardline host hardening agent
#[derive(Parser, Debug)]
#[command(name = "hardline-agent")]
#[command(version)]
#[command(about = "Host compliance auditing, remediation and rollback", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/hardline/agent.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: String,

    /// Policy file (overrides config / platform selection)
    #[arg(long, env = "HARDLINE_POLICY_FILE")]
    policy: Option<String>,

    /// Journal database path (overrides config)
    #[arg(long, env = "HARDLINE_JOURNAL_PATH")]
    db: Option<String>,

    /// Severity profile (basic, moderate, strict)
    #[arg(long, default_value = "strict")]
    profile: String,

    /// Audit all rules in the selected profile
    #[arg(long)]
    scan: bool,

    /// Audit and emit results as JSON for the report collaborator
    #[arg(long)]
    export: bool,

    /// Apply the remediation of one rule
    #[arg(long, value_name = "RULE_ID")]
    fix: Option<String>,

    /// Apply the rollback of one rule
    #[arg(long, value_name = "RULE_ID")]
    rollback: Option<String>,

    /// Roll back every rule in the policy
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = hardline_common::LogConfig::new()
        .level(&args.log_level)
        .format(match args.log_format.as_str() {
            "json" => hardline_common::LogFormat::Json,
            "compact" => hardline_common::LogFormat::Compact,
            _ => hardline_common::LogFormat::Pretty,
        });
    hardline_common::init_logging_with_config(log_config);

    info!("Hardline agent starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file -> env -> CLI args)
    let config = if std::path::Path::new(&args.config).exists() {
        hardline_common::Config::from_file(&args.config)?
    } else {
        info!("Config file not found at {}, using defaults", args.config);
        hardline_common::Config::default()
    };
    let config = config.merge_env();

    let policy_path = args
        .policy
        .clone()
        .or_else(|| config.policy.file.clone())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| hardline_policy::default_policy_path(&config.policy.dir));

    let journal_path = args.db.clone().unwrap_or_else(|| config.journal.path.clone());

    let policy = hardline_policy::load_policy(&policy_path)
        .with_context(|| format!("loading policy from {}", policy_path.display()))?;

    let engine = Engine::new(hardline_platform::current(), Journal::open(&journal_path)?);
    let profile = Profile::parse_or_strict(&args.profile);

    if let Some(rule_id) = &args.fix {
        return run_fix(&engine, &policy, rule_id);
    }
    if let Some(rule_id) = &args.rollback {
        return run_rollback(&engine, &policy, rule_id);
    }
    if args.reset {
        let summary = engine.revert_all(&policy);
        println!("{}", summary);
        return Ok(());
    }
    if args.export {
        let results = engine.export_audit(&policy, profile).await?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    // Default action: scan
    let results = engine.scan(&policy, profile).await?;
    print_results(&engine, profile, &results);
    Ok(())
}

fn run_fix(engine: &Engine, policy: &Policy, rule_id: &str) -> Result<()> {
    let rule = policy
        .find(rule_id)
        .with_context(|| format!("rule {} not found in policy", rule_id))?;

    engine
        .apply_fix(rule)
        .with_context(|| format!("fix failed for rule {}", rule_id))?;
    println!("Fixed {}", rule_id);
    Ok(())
}

fn run_rollback(engine: &Engine, policy: &Policy, rule_id: &str) -> Result<()> {
    let rule = policy
        .find(rule_id)
        .with_context(|| format!("rule {} not found in policy", rule_id))?;

    engine
        .revert_fix(rule)
        .with_context(|| format!("rollback failed for rule {}", rule_id))?;
    println!("Rolled back {}", rule_id);
    Ok(())
}

fn print_results(engine: &Engine, profile: Profile, results: &[AuditResult]) {
    let passed = results.iter().filter(|r| r.passed()).count();

    println!("\n{}", "=".repeat(72));
    println!(
        "  Hardline Audit: {} / profile {}",
        engine.os_name(),
        profile
    );
    println!("{}", "=".repeat(72));

    for result in results {
        println!(
            "  [{:<7}] {:<16} {:<10} {}",
            result.status.as_str(),
            result.id,
            result.severity.as_str(),
            result.name
        );
        if !result.actual.is_empty() {
            println!("            actual: {}", result.actual);
        }
    }

    println!("{}", "-".repeat(72));
    println!(
        "  {} checks, {} passed, {} flagged",
        results.len(),
        passed,
        results.len() - passed
    );
}
