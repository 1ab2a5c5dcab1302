//! Batch pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Series**: load entity codes and build the identifier list
//! 2. **Indicators**: read, trim and unpivot the indicator export, then align it
//! 3. **Population**: read and trim each census table, join them on the area
//!    key, unpivot, align
//! 4. **Reconcile**: attach entity names and composite keys
//! 5. **Merge**: left join to population and drop unresolved rows
//! 6. **Output**: series list, merged table, optional manifest
//!
//! Every stage runs to completion before the next. Nothing is written until
//! the merge has succeeded, and the output files are moved into place together.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use labor_ingest::{load_entity_codes, read_source_grid, resolve_path};
use labor_model::{EntityCode, Indicator, MergedRecord, SeriesId, SourceSpec};
use labor_report::{
    ManifestSource, OutputBatch, RunManifest, StageCounts, stage_manifest, stage_merged_csv,
    stage_series_list, write_series_list,
};
use labor_transform::{
    AlignStats, LongFrame, PopulationIndex, WideTable, align_indicators, align_population,
    build_series_ids, join_wide, merge, normalize_wide, reconcile, unpivot,
};

use crate::config::PipelineConfig;
use crate::types::{BuildResult, SeriesResult, SourceSummary};

// ============================================================================
// Stage 1: Series
// ============================================================================

/// Load the entity code table named by `config`.
pub fn load_entities(config: &PipelineConfig, base_dir: &Path) -> Result<Vec<EntityCode>> {
    let path = resolve_path(base_dir, &config.entity_codes);
    let delimiter = config.entity_delimiter_byte()?;
    let entities = load_entity_codes(&path, delimiter)
        .with_context(|| format!("load entity codes {}", path.display()))?;
    info!(path = %path.display(), entities = entities.len(), "entity codes loaded");
    Ok(entities)
}

/// Build identifiers for every entity and indicator.
pub fn build_series(
    entities: &[EntityCode],
    prefix: &str,
    expected_entities: Option<usize>,
) -> Result<Vec<SeriesId>> {
    build_series_ids(entities, &Indicator::ALL, prefix, expected_entities)
        .context("build series identifiers")
}

/// `series` subcommand: entity table in, identifier list out.
pub fn run_series(
    codes: &Path,
    output: &Path,
    prefix: &str,
    expected_entities: Option<usize>,
    delimiter: u8,
) -> Result<SeriesResult> {
    let span = info_span!("series", codes = %codes.display());
    let _guard = span.enter();
    let entities = load_entity_codes(codes, delimiter)
        .with_context(|| format!("load entity codes {}", codes.display()))?;
    let ids = build_series(&entities, prefix, expected_entities)?;
    write_series_list(output, &ids)?;
    Ok(SeriesResult {
        entities: entities.len(),
        indicators: Indicator::ALL.len(),
        identifiers: ids.len(),
        output: output.to_path_buf(),
    })
}

// ============================================================================
// Stage 2-3: Indicators and population
// ============================================================================

/// Read one source and trim it into a wide table.
pub fn load_wide(spec: &SourceSpec, base_dir: &Path) -> Result<(WideTable, SourceSummary)> {
    let grid = read_source_grid(spec, base_dir)
        .with_context(|| format!("read source {}", spec.name))?;
    let table =
        normalize_wide(&grid, spec).with_context(|| format!("normalize source {}", spec.name))?;
    let summary = SourceSummary {
        name: spec.name.clone(),
        path: resolve_path(base_dir, &spec.path),
        rows: table.row_count(),
        periods: table.periods.len(),
    };
    Ok((table, summary))
}

/// Result of the indicator stage.
#[derive(Debug)]
pub struct IndicatorStage {
    pub frame: LongFrame,
    pub stats: AlignStats,
    pub source: SourceSummary,
}

pub fn indicator_stage(config: &PipelineConfig, base_dir: &Path) -> Result<IndicatorStage> {
    let (table, source) = load_wide(&config.indicators, base_dir)?;
    let long = unpivot(&table).context("unpivot indicators")?;
    let (frame, stats) = align_indicators(&long, &table.key_column, &config.series_prefix)
        .context("align indicators")?;
    Ok(IndicatorStage {
        frame,
        stats,
        source,
    })
}

/// Result of the population stage.
#[derive(Debug)]
pub struct PopulationStage {
    pub frame: LongFrame,
    pub sources: Vec<SourceSummary>,
}

/// Join the population tables wide, then unpivot the combined table once.
pub fn population_stage(config: &PipelineConfig, base_dir: &Path) -> Result<PopulationStage> {
    let mut tables = Vec::with_capacity(config.population.len());
    let mut sources = Vec::with_capacity(config.population.len());
    for spec in &config.population {
        let (table, summary) = load_wide(spec, base_dir)?;
        tables.push(table);
        sources.push(summary);
    }
    let joined = join_wide("population", &tables).context("join population tables")?;
    let long = unpivot(&joined).context("unpivot population")?;
    let frame = align_population(&long, &joined.key_column).context("align population")?;
    Ok(PopulationStage { frame, sources })
}

// ============================================================================
// Stage 4-6: Reconcile, merge, output
// ============================================================================

/// Options for a full `build` run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: PipelineConfig,
    /// Directory relative input paths resolve against.
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Overrides the configured merged table name.
    pub output_name: Option<String>,
    pub write_manifest: bool,
    pub dry_run: bool,
}

/// Merged records plus everything the summary and manifest report.
#[derive(Debug)]
pub struct BuildOutcome {
    pub records: Vec<MergedRecord>,
    pub series_ids: Vec<SeriesId>,
    pub result: BuildResult,
}

/// Run every stage and, unless this is a dry run, write the outputs.
pub fn run_build(options: &BuildOptions) -> Result<BuildOutcome> {
    let config = &options.config;
    let base_dir = &options.base_dir;
    let build_span = info_span!(
        "build",
        state = %config.state.abbrev,
        base_dir = %base_dir.display()
    );
    let _build_guard = build_span.enter();

    let (entities, series_ids) = info_span!("series").in_scope(|| -> Result<_> {
        let entities = load_entities(config, base_dir)?;
        let ids = build_series(&entities, &config.series_prefix, config.expected_entities)?;
        Ok((entities, ids))
    })?;

    let indicators = info_span!("indicators").in_scope(|| indicator_stage(config, base_dir))?;
    let population = info_span!("population").in_scope(|| population_stage(config, base_dir))?;

    let (records, reconcile_report, merge_stats) =
        info_span!("reconcile").in_scope(|| -> Result<_> {
            let index = PopulationIndex::build(&population.frame, &config.state.abbrev)
                .context("index population")?;
            info!(keys = index.len(), "population indexed");
            let (reconciled, report) = reconcile(&indicators.frame, &entities, &index)
                .context("reconcile keys")?;
            let (records, stats) =
                merge(&reconciled, &index, &config.series_prefix).context("merge")?;
            Ok((records, report, stats))
        })?;

    let mut sources = vec![indicators.source];
    sources.extend(population.sources);
    let mut result = BuildResult {
        state: config.state.name.clone(),
        entities: entities.len(),
        series_ids: series_ids.len(),
        sources,
        population_rows: population.frame.record_count(),
        align: indicators.stats,
        reconcile: reconcile_report,
        merge: merge_stats,
        output_dir: options.output_dir.clone(),
        outputs: Vec::new(),
        dry_run: options.dry_run,
    };

    if !options.dry_run {
        result.outputs = info_span!("output").in_scope(|| {
            write_outputs(options, &series_ids, &records, &result)
        })?;
    }

    info!(
        records = records.len(),
        dry_run = options.dry_run,
        "build complete"
    );
    Ok(BuildOutcome {
        records,
        series_ids,
        result,
    })
}

fn write_outputs(
    options: &BuildOptions,
    series_ids: &[SeriesId],
    records: &[MergedRecord],
    result: &BuildResult,
) -> Result<Vec<PathBuf>> {
    let names = &options.config.output;
    let series_path = options.output_dir.join(&names.series_list);
    let merged_name = options.output_name.as_deref().unwrap_or(&names.merged);
    let merged_path = options.output_dir.join(merged_name);

    // Every output is rendered before any of them is moved into place.
    let mut batch = OutputBatch::new();
    stage_series_list(&mut batch, &series_path, series_ids)?;
    stage_merged_csv(&mut batch, &merged_path, records)?;
    if options.write_manifest {
        let manifest_path = options.output_dir.join(&names.manifest);
        stage_manifest(
            &mut batch,
            &manifest_path,
            &build_manifest(result, Some(merged_path)),
        )?;
    }
    let outputs = batch.commit().context("write outputs")?;
    info!(
        files = outputs.len(),
        identifiers = series_ids.len(),
        rows = records.len(),
        "outputs written"
    );
    Ok(outputs)
}

/// Assemble the JSON manifest for a run.
pub fn build_manifest(result: &BuildResult, output: Option<PathBuf>) -> RunManifest {
    let mut manifest = RunManifest::new(output);
    manifest.latest_year = result.reconcile.latest_year;
    manifest.sources = result
        .sources
        .iter()
        .map(|source| ManifestSource {
            name: source.name.clone(),
            path: source.path.clone(),
            rows: source.rows,
            periods: source.periods,
        })
        .collect();
    manifest.counts = StageCounts {
        entities: result.entities,
        series_ids: result.series_ids,
        indicator_rows: result.align.output_rows,
        indicator_missing_values: result.align.missing_values,
        indicator_invalid_series: result.align.invalid_series_rows,
        population_rows: result.population_rows,
        reconciled_rows: result.reconcile.rows,
        matched_rows: result.reconcile.matched_rows,
        unmatched_rows: result.reconcile.unmatched_rows,
        historical_unmatched_rows: result.reconcile.historical_unmatched_rows,
        merged_rows: result.merge.output_rows,
        excluded_rows: result.merge.excluded(),
    };
    manifest.historical_unmatched_keys = result.reconcile.historical_unmatched_keys.clone();
    manifest.historical_missing_counties = result.reconcile.historical_missing_counties.clone();
    manifest
}
