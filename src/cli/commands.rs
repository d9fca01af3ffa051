//! Command implementations for the gamerec CLI.

use crate::als::{AlsConfig, TrainingContext};
use crate::catalog::Catalog;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::engine::{EngineConfig, RecommendationEngine};
use crate::error::{GamerecError, Result};
use crate::inventory::{InventoryStats, read_inventory_file};
use crate::output::{artifact_path, write_artifact};

/// Execute a CLI command.
pub fn execute_command(args: GamerecArgs) -> Result<()> {
    match &args.command {
        Command::Recommend(rec_args) => recommend(rec_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

/// Train a model over a crawled inventory file and write the artifact.
fn recommend(args: RecommendArgs, cli_args: &GamerecArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!(
            "Reading inventories from: {}",
            args.inventory_file.display()
        );
    }

    if !args.inventory_file.is_file() {
        return Err(GamerecError::other(format!(
            "Invalid input file: {}",
            args.inventory_file.display()
        )));
    }
    let records = read_inventory_file(&args.inventory_file)?;
    if cli_args.verbosity() > 1 {
        println!("Decoded {} inventory records", records.len());
    }

    let catalog = match &args.catalog {
        Some(path) => {
            if cli_args.verbosity() > 1 {
                println!("Loading catalog from: {}", path.display());
            }
            Some(Catalog::load(path)?)
        }
        None => None,
    };

    let engine = RecommendationEngine::new(EngineConfig {
        als: AlsConfig {
            factors: args.factors,
            iterations: args.iterations,
            regularization: args.regularization,
            implicit_alpha: args.alpha,
            seed: args.seed,
        },
        top_n: args.top_n,
    })?;
    let ctx = match args.threads {
        Some(threads) => TrainingContext::with_threads(threads)?,
        None => TrainingContext::new()?,
    };

    let outcome = engine.run(&records, catalog.as_ref(), &ctx)?;

    let format = args.output_format.effective();
    let path = artifact_path(&args.output_path, format);
    write_artifact(&path, &outcome.recommendations)?;

    output_report(
        "Recommendations written successfully",
        &RecommendReport {
            artifact: path.to_string_lossy().to_string(),
            summary: outcome.summary,
        },
        cli_args,
    )?;

    Ok(())
}

/// Describe an inventory file without training on it.
fn show_stats(args: StatsArgs, cli_args: &GamerecArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!(
            "Reading inventories from: {}",
            args.inventory_file.display()
        );
    }

    if !args.inventory_file.is_file() {
        return Err(GamerecError::other(format!(
            "Invalid input file: {}",
            args.inventory_file.display()
        )));
    }
    let records = read_inventory_file(&args.inventory_file)?;
    let stats = InventoryStats::collect(&records);

    output_report("Inventory statistics", &stats, cli_args)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn write_inventory(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("users.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"alice\": [{\"appid\": 1, \"playtime_forever\": 120}, ",
                "{\"appid\": 2, \"playtime_forever\": 0}]}\n",
                "{\"bob\": [{\"appid\": 1, \"playtime_forever\": 30}]}\n",
                "{\"carol\": null}\n",
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_recommend_command_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = write_inventory(dir.path());
        let out_dir = dir.path().join("out");

        let args = GamerecArgs::try_parse_from([
            "gamerec",
            "--quiet",
            "recommend",
            inventory.to_str().unwrap(),
            "--output-path",
            out_dir.to_str().unwrap(),
            "--factors",
            "2",
            "--iterations",
            "3",
            "--seed",
            "42",
            "--threads",
            "1",
        ])
        .unwrap();
        execute_command(args).unwrap();

        let entries: Vec<_> = fs::read_dir(&out_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let artifact = entries[0].as_ref().unwrap().path();
        let name = artifact.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("recommend_games_"));
        assert!(name.ends_with(".json"));

        let parsed: std::collections::BTreeMap<String, Vec<u32>> =
            serde_json::from_str(&fs::read_to_string(&artifact).unwrap()).unwrap();
        assert_eq!(parsed["alice"], vec![1]);
        assert_eq!(parsed["bob"], vec![1]);
        assert!(!parsed.contains_key("carol"));
    }

    #[test]
    fn test_recommend_command_rejects_missing_file() {
        let args = GamerecArgs::try_parse_from([
            "gamerec",
            "--quiet",
            "recommend",
            "/no/such/file.jsonl",
        ])
        .unwrap();
        assert!(execute_command(args).is_err());
    }

    #[test]
    fn test_stats_command() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = write_inventory(dir.path());

        let args = GamerecArgs::try_parse_from([
            "gamerec",
            "--quiet",
            "stats",
            inventory.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(args).unwrap();
    }
}
