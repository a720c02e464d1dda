use crate::cli::SweepArgs;
use crate::error::{CliError, Result};
use anyhow::anyhow;
use indicatif::{ProgressBar, ProgressStyle};
use stacksim::core::catalog::library::CompoundLibrary;
use stacksim::core::models::curve::CurveKind;
use stacksim::core::models::profile::UserProfile;
use stacksim::core::response::evaluator::evaluate_response;
use stacksim::engine::error::EngineError;
use tracing::info;

pub fn run(args: SweepArgs) -> Result<()> {
    let library = CompoundLibrary::load(&args.catalog).map_err(EngineError::from)?;
    let compound = library.get(&args.compound).ok_or_else(|| {
        CliError::Argument(format!("compound '{}' is not in the catalog", args.compound))
    })?;

    let profile = match &args.profile {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<UserProfile>(&content).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: anyhow!(e),
            })?
        }
        None => UserProfile::default(),
    };

    let max_dose = args.max_dose.unwrap_or_else(|| compound.evidence_ceiling());
    if !(max_dose > 0.0) || !max_dose.is_finite() {
        return Err(CliError::Argument(format!(
            "max dose must be positive and finite, got {max_dose}"
        )));
    }
    let steps = args.steps.max(1);

    let pb = ProgressBar::new(steps as u64 + 1);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} doses")
            .map_err(|e| anyhow!(e))?
            .progress_chars("#>-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());

    let mut writer = csv::Writer::from_path(&args.output).map_err(|e| anyhow!(e))?;
    writer
        .write_record(["dose", "benefit", "benefit_ci", "risk", "risk_ci"])
        .map_err(|e| anyhow!(e))?;

    let step_size = max_dose / steps as f64;
    for i in 0..=steps {
        let dose = step_size * i as f64;
        let benefit = evaluate_response(compound, CurveKind::Benefit, dose, &profile);
        let risk = evaluate_response(compound, CurveKind::Risk, dose, &profile);
        writer
            .write_record([
                format!("{dose:.1}"),
                format!("{:.4}", benefit.value),
                format!("{:.4}", benefit.ci),
                format!("{:.4}", risk.value),
                format!("{:.4}", risk.ci),
            ])
            .map_err(|e| anyhow!(e))?;
        pb.inc(1);
    }
    writer.flush()?;
    pb.finish_with_message("✓ Sweep complete.");

    info!(
        compound = args.compound.as_str(),
        steps,
        output = %args.output.display(),
        "Dose-response series exported."
    );
    println!(
        "✓ Exported {} samples for '{}' to {}",
        steps + 1,
        args.compound,
        args.output.display()
    );
    Ok(())
}
