use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use comfy_table::Table;

use labor_cli::config::PipelineConfig;
use labor_cli::pipeline::{BuildOptions, run_build, run_series};
use labor_cli::types::{BuildResult, SeriesResult};
use labor_ingest::ENTITY_CODE_DELIMITER;
use labor_model::{ColumnLayout, SourceSpec};

use crate::cli::{BuildArgs, InputArgs, SeriesArgs, SourcesArgs};
use crate::summary::apply_table_style;

pub fn run_series_command(args: &SeriesArgs) -> Result<SeriesResult> {
    run_series(
        &args.codes,
        &args.output,
        &args.prefix,
        args.expected_entities,
        ENTITY_CODE_DELIMITER,
    )
}

/// Resolve the configuration and the directory its relative paths start from.
fn resolve_config(input: &InputArgs) -> Result<(PipelineConfig, PathBuf)> {
    match (&input.config, &input.data_dir) {
        (Some(path), _) => {
            let config = PipelineConfig::load(path)?;
            let base_dir = config_dir(path);
            Ok((config, base_dir))
        }
        (None, Some(data_dir)) => Ok((PipelineConfig::ohio(), data_dir.clone())),
        (None, None) => bail!("either --config or --data-dir is required"),
    }
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn run_build_command(args: &BuildArgs) -> Result<BuildResult> {
    let (config, base_dir) = resolve_config(&args.input)?;
    let options = BuildOptions {
        config,
        base_dir,
        output_dir: args.output_dir.clone(),
        output_name: args.output_name.clone(),
        write_manifest: args.manifest,
        dry_run: args.dry_run,
    };
    Ok(run_build(&options)?.result)
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::ohio(),
    };
    let mut table = Table::new();
    table.set_header(vec![
        "Source", "Path", "Key", "Lead", "Header", "Skip", "Trail", "Columns",
    ]);
    apply_table_style(&mut table);
    for spec in config.sources() {
        table.add_row(vec![
            spec.name.clone(),
            spec.path.display().to_string(),
            spec.key_column.clone(),
            spec.trim.leading_rows.to_string(),
            if spec.trim.header_row { "yes" } else { "no" }.to_string(),
            spec.trim.skip_data_rows.to_string(),
            spec.trim.trailing_rows.to_string(),
            layout_label(spec),
        ]);
    }
    println!(
        "State: {} ({}), prefix {}",
        config.state.name, config.state.abbrev, config.series_prefix
    );
    println!("Entity codes: {}", config.entity_codes.display());
    println!("{table}");
    Ok(())
}

fn layout_label(spec: &SourceSpec) -> String {
    match &spec.layout {
        ColumnLayout::Header => "header".to_string(),
        ColumnLayout::Explicit { columns } => {
            let artifacts = columns.iter().filter(|label| label.trim().is_empty()).count();
            format!("{} ({} artifact)", columns.len(), artifacts)
        }
    }
}
