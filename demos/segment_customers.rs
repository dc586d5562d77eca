//! Segment a synthetic customer base and print per-segment profiles.
//!
//! ```text
//! RUST_LOG=segmenter=debug cargo run --example segment_customers
//! ```

use rand::prelude::*;
use segmenter::{summarize, Kmeans, Record, SegmentationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> segmenter::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Three loose archetypes: students, families, affluent retirees.
    let archetypes = [
        (22.0, 24_000.0, 900.0),
        (38.0, 55_000.0, 2_200.0),
        (66.0, 95_000.0, 4_100.0),
    ];
    let mut rng = StdRng::seed_from_u64(2024);
    let customers: Vec<Record<u32>> = (0..300)
        .map(|id| {
            let (age, income, purchase) = archetypes[id as usize % archetypes.len()];
            Record::new(
                id,
                age + rng.random_range(-4.0..4.0),
                income * rng.random_range(0.85..1.15),
                purchase * rng.random_range(0.8..1.2),
            )
        })
        .collect();

    let config = SegmentationConfig {
        k: 3,
        ..Default::default()
    };
    let model: Kmeans = config.build()?;
    let fit = model.fit(&customers)?;

    println!(
        "=== k-means (k={}, status={:?}, inertia={:.3}) ===",
        config.k, fit.status, fit.inertia
    );
    for p in summarize(&customers, &fit.assignments) {
        println!("\ncluster {}: {}", p.cluster, p.name());
        println!("  customers: {}", p.customer_count);
        println!("  age:       {:.1} ({:.0}-{:.0})", p.age.mean, p.age.min, p.age.max);
        println!(
            "  income:    {:.0} ({:.0}-{:.0})",
            p.income.mean, p.income.min, p.income.max
        );
        println!(
            "  purchase:  {:.0} ({:.0}-{:.0})",
            p.purchase_amount.mean, p.purchase_amount.min, p.purchase_amount.max
        );
        for r in p.recommendations() {
            println!("  - {r}");
        }
    }

    Ok(())
}
