use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::Table;
use serde::Serialize;
use tracing::{info, info_span, warn};

use pivot_cli::input::load_records;
use pivot_cli::logging::LoggingSink;
use pivot_core::{
    CategoryFilter, DemographicRequest, PivotEngine, PivotRequest, to_flat_rows,
    to_heatmap_series, to_hierarchy, to_pie_series, to_ranked_list,
};
use pivot_model::{EngineConfig, HierarchyNode, Indicator, IndicatorKind, default_indicators};

use crate::cli::{DemographicArgs, OutputArg, ShapeArg, TableArgs};
use crate::summary::{
    cross_tab_table, demographic_table, fields_table, flat_table, heatmap_table, hierarchy_table,
    pie_table, print_stats, ranked_table,
};

/// Build the engine from `--config`, or the built-in defaults.
pub fn load_engine(config: Option<&Path>) -> Result<PivotEngine> {
    let config = match config {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("load config: {}", path.display()))?;
            info!(path = %path.display(), "loaded engine configuration");
            config
        }
        None => EngineConfig::default(),
    };
    Ok(PivotEngine::new(config))
}

pub fn run_table(engine: &PivotEngine, args: &TableArgs) -> Result<()> {
    let span = info_span!("table", row = %args.row, column = %args.column);
    let _guard = span.enter();

    let records = load_records(&args.input)?;
    let mut request = PivotRequest::new(&args.row, &args.column);
    if let Some(value) = &args.filter {
        let filter = match &args.filter_field {
            Some(field) => CategoryFilter::new(field, value),
            None => CategoryFilter::event_type(value),
        };
        request = request.with_filter(filter);
    }

    let table = engine.build(&records, &request, &LoggingSink);
    info!(
        rows = table.rows.len(),
        columns = table.columns.len(),
        total = table.total(),
        "built cross-tab"
    );
    if table.is_empty() {
        warn!("no records were tabulated");
    }

    match args.shape {
        ShapeArg::Raw => emit(args.output, &table, |value| {
            print_stats(&value.stats);
            cross_tab_table(value)
        }),
        ShapeArg::Heatmap => emit(args.output, &to_heatmap_series(&table), |value| {
            heatmap_table(value)
        }),
        ShapeArg::Ranked => emit(args.output, &to_ranked_list(&table), |value| {
            ranked_table(value)
        }),
        ShapeArg::Pie => emit(args.output, &to_pie_series(&table), |value| pie_table(value)),
        ShapeArg::Hierarchy => {
            let root = HierarchyNode::root(&table.row_field, to_hierarchy(&table));
            emit(args.output, &root, |value| {
                hierarchy_table(std::slice::from_ref(value))
            })
        }
        ShapeArg::Flat => emit(args.output, &to_flat_rows(&table), |value| {
            flat_table(value, &table.row_field, &table.column_field)
        }),
    }
}

pub fn run_demographic(engine: &PivotEngine, args: &DemographicArgs) -> Result<()> {
    let span = info_span!("demographic");
    let _guard = span.enter();

    let patients = load_records(&args.input)?;
    let indicators = if args.indicators.is_empty() {
        default_indicators()
    } else {
        args.indicators
            .iter()
            .map(|raw| parse_indicator(raw))
            .collect::<Result<Vec<_>>>()?
    };
    let mut request = DemographicRequest::new(indicators);
    if let Some(raw) = &args.as_of {
        let as_of = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date: {raw}"))?;
        request = request.with_as_of(as_of);
    }

    let table = engine.build_demographic(&patients, &request, &LoggingSink);
    info!(
        indicators = table.rows.len(),
        patients = table.total_records,
        max_percentage = table.max_percentage,
        "built demographic cross-tab"
    );
    emit(args.output, &table, demographic_table)
}

pub fn run_fields(engine: &PivotEngine) -> Result<()> {
    let mut table = fields_table(
        engine
            .synonyms()
            .entries()
            .map(|entry| (entry.field.as_str(), entry.aliases.as_slice())),
    );
    table.set_width(120);
    println!("{table}");
    Ok(())
}

/// Parse `field` or `field:boolean|demographic`.
fn parse_indicator(raw: &str) -> Result<Indicator> {
    let (field, kind) = match raw.split_once(':') {
        Some((field, kind)) => {
            let kind = match kind.trim().to_ascii_lowercase().as_str() {
                "boolean" | "bool" => IndicatorKind::Boolean,
                "demographic" => IndicatorKind::Demographic,
                other => bail!("unknown indicator kind {other:?} in {raw:?}"),
            };
            (field.trim(), kind)
        }
        None => (raw.trim(), IndicatorKind::default()),
    };
    if field.is_empty() {
        bail!("indicator {raw:?} has no field name");
    }
    Ok(Indicator {
        field: field.to_string(),
        kind,
    })
}

fn emit<T, F>(output: OutputArg, value: &T, render: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> Table,
{
    match output {
        OutputArg::Json => {
            let json = serde_json::to_string_pretty(value).context("serialize output")?;
            println!("{json}");
        }
        OutputArg::Table => println!("{}", render(value)),
    }
    Ok(())
}
