use crate::cli::DataArgs;
use crate::error::Result;
use stacksim::core::catalog::interactions::InteractionMatrix;
use stacksim::core::catalog::library::CompoundLibrary;
use stacksim::engine::error::EngineError;
use std::collections::BTreeMap;
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    let library = CompoundLibrary::load(&args.catalog).map_err(EngineError::from)?;
    info!(compounds = library.len(), "Catalog validated.");

    println!("Catalog: {} ({} compounds)", args.catalog.display(), library.len());
    for (id, compound) in library.iter() {
        let benefit = compound.benefit_curve.samples();
        let risk = compound.risk_curve.samples();
        println!(
            "  {id:<16} {:<11} benefit {:>2} pts (0-{:.0} mg)   risk {:>2} pts (0-{:.0} mg)   kd {}",
            format!("{:?}", compound.administration).to_lowercase(),
            benefit.len(),
            compound.benefit_curve.max_dose(),
            risk.len(),
            compound.risk_curve.max_dose(),
            compound
                .binding_affinity
                .map(|kd| format!("{kd:.2}"))
                .unwrap_or_else(|| "none".to_string()),
        );
    }

    if let Some(path) = &args.interactions {
        let matrix = InteractionMatrix::load(path).map_err(EngineError::from)?;
        info!(pairs = matrix.len(), "Interaction matrix validated.");

        let mut by_rating: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, record) in matrix.iter() {
            *by_rating.entry(record.rating.as_str()).or_default() += 1;
        }

        println!("\nInteractions: {} ({} pairs)", path.display(), matrix.len());
        for (rating, count) in by_rating {
            println!("  {rating:<12} {count}");
        }
    }

    println!("\n✓ Reference data is valid.");
    Ok(())
}
