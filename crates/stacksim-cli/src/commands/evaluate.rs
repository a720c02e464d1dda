use crate::cli::{EvaluateArgs, OutputFormat};
use crate::error::{CliError, Result};
use crate::utils::parser::parse_stack_entry;
use anyhow::anyhow;
use serde::Deserialize;
use stacksim::core::models::profile::UserProfile;
use stacksim::core::models::stack::{Stack, StackEntry};
use stacksim::engine::config::EvaluationConfigBuilder;
use stacksim::engine::error::EngineError;
use stacksim::workflows::report::{self, StackReport};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StackFile {
    compounds: Vec<StackEntry>,
}

pub fn run(args: EvaluateArgs) -> Result<()> {
    let (library, matrix) = report::load_reference_data(&args.catalog, &args.interactions)?;

    let mut entries = Vec::new();
    if let Some(stack_path) = &args.stack {
        entries.extend(load_stack_file(stack_path)?);
    }
    for raw in &args.add {
        entries.push(parse_stack_entry(raw).map_err(|e| CliError::Argument(e.to_string()))?);
    }
    if entries.is_empty() {
        return Err(CliError::Argument(
            "no stack entries given; use --stack or --add".to_string(),
        ));
    }
    let stack = Stack::from_entries(entries)?;

    let profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => UserProfile::default(),
    };

    let mut config = EvaluationConfigBuilder::new().weeks_elapsed(args.weeks);
    if let Some(capacity) = args.base_capacity {
        config = config.base_capacity(capacity);
    }
    if let Some(capacity) = args.daily_capacity {
        config = config.daily_capacity(capacity);
    }
    let config = config.build().map_err(EngineError::from)?;

    info!(entries = stack.len(), "Running stack report.");
    let report = report::run(&library, &matrix, &stack, &profile, &config);

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn load_stack_file(path: &Path) -> Result<Vec<StackEntry>> {
    let content = std::fs::read_to_string(path)?;
    let file: StackFile = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow!(e),
    })?;
    Ok(file.compounds)
}

fn load_profile(path: &Path) -> Result<UserProfile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow!(e),
    })
}

fn print_json(report: &StackReport) -> Result<()> {
    let rendered = serde_json::to_string_pretty(report).map_err(|e| anyhow!(e))?;
    println!("{rendered}");
    Ok(())
}

fn print_text(report: &StackReport) {
    println!("══ Stack Report ═══════════════════════════════");

    match &report.evaluation {
        Some(evaluation) => {
            let totals = &evaluation.totals;
            println!("\nPer-compound:");
            for (id, score) in &evaluation.by_compound {
                let mut notes = Vec::new();
                if score.meta.nearing_plateau {
                    notes.push("nearing plateau");
                }
                if score.meta.beyond_evidence {
                    notes.push("beyond evidence");
                }
                let notes = if notes.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", notes.join(", "))
                };
                println!(
                    "  {id:<16} benefit {:>6.2} ±{:.2}   risk {:>6.2} ±{:.2}{notes}",
                    score.benefit, score.benefit_ci, score.risk, score.risk_ci
                );
            }
            println!("\nTotals:");
            println!(
                "  benefit {:.2} ({:+.2} synergy) → {:.2}",
                totals.total_benefit, totals.benefit_synergy_delta, totals.adjusted_benefit
            );
            println!(
                "  risk    {:.2} ({:+.2} synergy) → {:.2}",
                totals.total_risk, totals.risk_synergy_delta, totals.adjusted_risk
            );
            println!("  benefit:risk ratio {:.2}", totals.benefit_risk_ratio);
            println!("  net score          {:.2}", totals.net_score);
        }
        None => println!("\nNo evaluable compounds in the stack."),
    }

    let load = &report.load;
    println!("\nSystemic load:");
    println!(
        "  weekly {:.0} mg   active {:.0} mg   wasted {:.0} mg",
        load.weekly_load, load.active_load, load.wasted_mg
    );
    println!(
        "  toxicity multiplier {:.2}   oral load {:.0}   max suppression {:.1}",
        load.toxicity_multiplier, load.oral_toxicity_load, load.max_suppression
    );

    let saturation = &report.saturation;
    println!("\nReceptor saturation:");
    println!(
        "  phase {} ({})   capacity {:.0} mg   bound {:.0} mg   spillover {:.0} mg   efficiency {:.0}%",
        saturation.adaptation_phase.index(),
        if saturation.is_hard_ceiling {
            "hard ceiling"
        } else if saturation.is_saturated {
            "saturated"
        } else {
            "within capacity"
        },
        saturation.capacity,
        saturation.bound,
        saturation.spillover,
        saturation.efficiency_pct
    );

    let receptor = &report.receptor;
    println!("\nReceptor competition ({:.0} mg/day capacity):", receptor.total_capacity);
    for segment in &receptor.segments {
        println!(
            "  {:<16} demand {:>6.1}   bound {:>6.1}   spill {:>6.1}{}",
            segment.compound,
            segment.demand,
            segment.bound,
            segment.spill,
            if segment.is_displaced { "   [displaced]" } else { "" }
        );
    }
    if let Some(note) = &receptor.displacement_note {
        println!("  ⚠ {note}");
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  [{:?}] {}", warning.severity, warning.message);
        }
    }
    println!();
}
