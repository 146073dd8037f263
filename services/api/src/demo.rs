use crate::infra::{in_memory_catalog, parse_user, MemoryCatalogService};
use chrono::NaiveDate;
use clap::Args;
use ecobrand::catalog::{
    AlternativeQuery, CatalogServiceError, ImportSummary, ProductDraft, ProductRecord,
    ProductView, UserId,
};
use ecobrand::config::{AppConfig, CatalogConfig};
use ecobrand::error::AppError;
use ecobrand::import::LegacyCatalogImporter;
use ecobrand::scoring::{EcoAssessment, EcoScoreEngine, MeasurementInput, RawEnvironmentalProfile};
use std::cmp::Ordering;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Carbon footprint in kg CO2e; text such as "120 kg" is accepted
    #[arg(long)]
    pub(crate) carbon: Option<String>,
    /// Water consumption in liters
    #[arg(long)]
    pub(crate) water: Option<String>,
    /// Energy usage in kWh
    #[arg(long)]
    pub(crate) energy: Option<String>,
    /// Waste pollution rating (low / moderate / high)
    #[arg(long)]
    pub(crate) waste: Option<String>,
    /// Chemical usage rating (minimal / moderate / severe)
    #[arg(long)]
    pub(crate) chemical: Option<String>,
    /// Recyclability rating (high / medium / low)
    #[arg(long)]
    pub(crate) recyclability: Option<String>,
    /// Overall environmental impact rating (low / moderate / high)
    #[arg(long)]
    pub(crate) impact: Option<String>,
    /// Sustainability rating (high / moderate / low)
    #[arg(long)]
    pub(crate) sustainability: Option<String>,
    /// Read the attribute bag from a JSON file instead of flags
    #[arg(
        long,
        conflicts_with_all = [
            "carbon", "water", "energy", "waste", "chemical", "recyclability", "impact",
            "sustainability",
        ]
    )]
    pub(crate) json: Option<PathBuf>,
    /// Print every sub-score and the attributes that were ignored
    #[arg(long)]
    pub(crate) explain: bool,
}

impl ScoreArgs {
    fn profile(&self) -> RawEnvironmentalProfile {
        RawEnvironmentalProfile {
            carbon_footprint_kg: self.carbon.as_deref().map(MeasurementInput::from),
            water_consumption_liters: self.water.as_deref().map(MeasurementInput::from),
            energy_usage_kwh: self.energy.as_deref().map(MeasurementInput::from),
            waste_pollution_level: self.waste.clone(),
            chemical_usage_level: self.chemical.clone(),
            recyclability_level: self.recyclability.clone(),
            environmental_impact_level: self.impact.clone(),
            sustainability_level: self.sustainability.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Legacy catalog CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Number of top-scoring products to list after the import
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
    /// User recorded as the uploader of imported products
    #[arg(long, value_parser = parse_user, default_value = "legacy-import")]
    pub(crate) owner: UserId,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Product name to search for in the sample catalog
    #[arg(long, default_value = "bottle")]
    pub(crate) search: String,
    /// Number of alternatives to suggest for the lowest scoring product
    #[arg(long, default_value_t = 3)]
    pub(crate) alternatives: usize,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = match &args.json {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<RawEnvironmentalProfile>(&text)?
        }
        None => args.profile(),
    };

    let assessment = EcoScoreEngine::standard().assess(&raw.normalize());
    render_assessment(&assessment, args.explain);
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, top, owner } = args;
    let config = AppConfig::load()?;
    let export = LegacyCatalogImporter::from_path(&csv)?;
    let (service, _) = in_memory_catalog(&config.catalog);

    let summary = service.import(export.drafts, &owner)?;
    println!("Imported {} products from {}", summary.imported, csv.display());
    println!("{}", import_breakdown(&summary, export.nameless_rows));

    let ranked = ranked_by_score(service.list()?);
    if ranked.is_empty() {
        println!("\nNo imported product carried enough data to score");
        return Ok(());
    }

    println!("\nTop {} products by eco-score", top.min(ranked.len()));
    for record in ranked.iter().take(top) {
        print_product_line(record);
    }

    Ok(())
}

fn import_breakdown(summary: &ImportSummary, nameless_rows: usize) -> String {
    format!(
        "- {} scored | {} without enough data | {} rows skipped ({} without a name, {} rejected)",
        summary.scored,
        summary.unscored,
        nameless_rows + summary.skipped,
        nameless_rows,
        summary.skipped
    )
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        search,
        alternatives,
    } = args;

    println!("EcoBrand eco-score demo");
    let (service, _) = in_memory_catalog(&CatalogConfig::default());
    let curator = UserId("demo-curator".to_string());
    for draft in sample_catalog() {
        service.create(draft, Some(curator.clone()))?;
    }

    println!("\nSample catalog");
    let ranked = ranked_by_score(service.list()?);
    for record in &ranked {
        print_product_line(record);
    }

    let categorized = service.categorized()?;
    println!(
        "\nImpact buckets: {} low | {} moderate | {} high | {} uncategorized",
        categorized.low.len(),
        categorized.moderate.len(),
        categorized.high.len(),
        categorized.uncategorized
    );

    let hits = service.search(&search, Some(&curator))?;
    println!("\nSearch \"{}\": {} match(es)", search, hits.len());
    for record in &hits {
        print_product_line(record);
    }

    if let Some(worst) = ranked.last() {
        println!("\nBetter alternatives to {}", worst.name);
        let query = AlternativeQuery {
            product_id: Some(worst.id.0.clone()),
            count: Some(alternatives),
            ..AlternativeQuery::default()
        };
        match service.alternatives(&query) {
            Ok(views) if views.is_empty() => println!("  none found"),
            Ok(views) => {
                for view in views {
                    println!(
                        "  - {} [{}]: {} ({})",
                        view.name,
                        view.category,
                        view.eco_score
                            .map(|score| format!("{score:.2}"))
                            .unwrap_or_else(|| "N/A".to_string()),
                        view.eco_letter
                            .map(|letter| letter.label())
                            .unwrap_or("N/A")
                    );
                }
            }
            Err(CatalogServiceError::NotFound(id)) => println!("  product {id} disappeared"),
            Err(err) => return Err(err.into()),
        }
    }

    println!("\nAdmin preview of an unsaved product");
    let preview = service.preview(&RawEnvironmentalProfile {
        carbon_footprint_kg: Some("300 kg".into()),
        water_consumption_liters: Some(5000.0.into()),
        energy_usage_kwh: Some(80.0.into()),
        recyclability_level: Some("low".to_string()),
        ..RawEnvironmentalProfile::default()
    });
    render_assessment(&preview, true);

    let summary = recompute_summary(&service)?;
    println!("\n{summary}");
    Ok(())
}

fn recompute_summary(service: &MemoryCatalogService) -> Result<String, AppError> {
    let summary = service.recompute_all()?;
    Ok(format!(
        "Recompute check: {} products processed, {} changed",
        summary.processed, summary.changed
    ))
}

/// Scored products first, highest score first.
fn ranked_by_score(mut records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    records.sort_by(|a, b| match (a.eco.score, b.eco.score) {
        (Some(left), Some(right)) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    records
}

fn print_product_line(record: &ProductRecord) {
    let view = ProductView::from(record);
    println!(
        "  - {} [{}]: {} ({}) analysed {}",
        view.name, view.category, view.eco, view.eco_letter, view.date
    );
}

pub(crate) fn render_assessment(assessment: &EcoAssessment, explain: bool) {
    match (assessment.result.score, assessment.result.letter) {
        (Some(score), Some(letter)) => println!("Eco-score: {score:.2} ({letter})"),
        _ => println!("Eco-score: N/A (no usable attributes)"),
    }

    if !explain {
        return;
    }

    if let Some(raw) = assessment.raw_score {
        println!("Weighted average before cap: {raw:.2}");
    }
    println!("Components:");
    for component in &assessment.components {
        println!(
            "  - {}: {:.2} x {} ({})",
            component.factor.label(),
            component.score,
            component.weight,
            component.notes
        );
    }
    if !assessment.dropped.is_empty() {
        let dropped: Vec<_> = assessment
            .dropped
            .iter()
            .map(|factor| factor.label())
            .collect();
        println!("Ignored: {}", dropped.join(", "));
    }
}

fn sample_catalog() -> Vec<ProductDraft> {
    let analysed = NaiveDate::from_ymd_opt(2024, 5, 14);
    let product = |name: &str, category: &str, profile: RawEnvironmentalProfile| ProductDraft {
        name: name.to_string(),
        category: category.to_string(),
        analysis_date: analysed,
        profile,
        ..ProductDraft::default()
    };

    vec![
        product(
            "Glass Water Bottle",
            "Kitchen",
            RawEnvironmentalProfile {
                carbon_footprint_kg: Some(42.0.into()),
                water_consumption_liters: Some("450 L".into()),
                energy_usage_kwh: Some(4.0.into()),
                recyclability_level: Some("High".to_string()),
                sustainability_level: Some("High".to_string()),
                environmental_impact_level: Some("Low".to_string()),
                ..RawEnvironmentalProfile::default()
            },
        ),
        product(
            "Steel Water Bottle",
            "Kitchen",
            RawEnvironmentalProfile {
                carbon_footprint_kg: Some(95.0.into()),
                water_consumption_liters: Some(1400.0.into()),
                energy_usage_kwh: Some(18.0.into()),
                recyclability_level: Some("High".to_string()),
                chemical_usage_level: Some("Moderate".to_string()),
                environmental_impact_level: Some("Moderate".to_string()),
                ..RawEnvironmentalProfile::default()
            },
        ),
        product(
            "Plastic Sports Bottle",
            "Kitchen",
            RawEnvironmentalProfile {
                carbon_footprint_kg: Some(300.0.into()),
                water_consumption_liters: Some(5000.0.into()),
                energy_usage_kwh: Some(80.0.into()),
                recyclability_level: Some("low".to_string()),
                environmental_impact_level: Some("High".to_string()),
                ..RawEnvironmentalProfile::default()
            },
        ),
        product(
            "Organic Cotton Tote",
            "Bags",
            RawEnvironmentalProfile {
                carbon_footprint_kg: Some("1,20 kg".into()),
                waste_pollution_level: Some("Low".to_string()),
                sustainability_level: Some("Medium".to_string()),
                ..RawEnvironmentalProfile::default()
            },
        ),
        product("Mystery Gadget", "Electronics", RawEnvironmentalProfile::default()),
    ]
}
