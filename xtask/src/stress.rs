//! Randomized workload runner
//!
//! This module provides the `stress` subcommand. It replays a seeded random
//! mix of inserts and removes against one or more tree variants and a
//! `BTreeMap` model, calling `validate` and comparing contents every
//! `validate_every` operations. Any divergence aborts the run.

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use ordered_trees::{AvlTree, BinarySearchTree, RedBlackTree, SearchTree, TraversalOrder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

const DEFAULT_OPERATIONS: u64 = 10_000;
const DEFAULT_KEY_SPACE: u32 = 1_024;
const DEFAULT_REMOVE_RATIO: f64 = 0.4;
const DEFAULT_SEED: u64 = 0x5eed;
const DEFAULT_VALIDATE_EVERY: u64 = 100;

/// Tree variant(s) to exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeKind {
    Bst,
    Avl,
    RedBlack,
    All,
}

impl TreeKind {
    /// The concrete variants this selection stands for
    const fn expand(self) -> &'static [Self] {
        match self {
            Self::Bst => &[Self::Bst],
            Self::Avl => &[Self::Avl],
            Self::RedBlack => &[Self::RedBlack],
            Self::All => &[Self::Bst, Self::Avl, Self::RedBlack],
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Bst => "bst",
            Self::Avl => "avl",
            Self::RedBlack => "red-black",
            Self::All => "all",
        })
    }
}

impl FromStr for TreeKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(value, true)
            .map_err(|message| anyhow::anyhow!("unknown tree kind {value:?}: {message}"))
    }
}

/// Arguments for the stress subcommand
#[derive(Args, Debug, Default)]
pub struct StressArgs {
    /// Scenario YAML file path (looked up in xtask/scenarios if not found)
    #[arg(long, short = 's')]
    pub scenario: Option<PathBuf>,

    /// Override tree variant (bst|avl|red-black|all)
    #[arg(long, value_enum)]
    pub tree: Option<TreeKind>,

    /// Override number of operations per tree
    #[arg(long)]
    pub operations: Option<u64>,

    /// Override key range: keys are drawn from 0..key_space
    #[arg(long)]
    pub key_space: Option<u32>,

    /// Override probability that an operation is a remove (0.0-1.0)
    #[arg(long)]
    pub remove_ratio: Option<f64>,

    /// Random seed for a reproducible workload
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override validation interval in operations
    #[arg(long)]
    pub validate_every: Option<u64>,

    /// Write a JSON summary to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Scenario configuration from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioConfig {
    name: Option<String>,
    tree: Option<TreeKind>,
    operations: Option<u64>,
    key_space: Option<u32>,
    remove_ratio: Option<f64>,
    seed: Option<u64>,
    validate_every: Option<u64>,
}

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
struct StressConfig {
    tree: TreeKind,
    operations: u64,
    key_space: u32,
    remove_ratio: f64,
    seed: u64,
    validate_every: u64,
}

impl StressConfig {
    /// Merge CLI arguments, environment and scenario
    ///
    /// Priority: CLI > Environment > Scenario YAML > Default
    fn resolve(
        args: &StressArgs,
        scenario: &ScenarioConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config = Self {
            tree: args
                .tree
                .or(parse_env(&lookup, "STRESS_TREE")?)
                .or(scenario.tree)
                .unwrap_or(TreeKind::All),
            operations: args
                .operations
                .or(parse_env(&lookup, "STRESS_OPERATIONS")?)
                .or(scenario.operations)
                .unwrap_or(DEFAULT_OPERATIONS),
            key_space: args
                .key_space
                .or(parse_env(&lookup, "STRESS_KEY_SPACE")?)
                .or(scenario.key_space)
                .unwrap_or(DEFAULT_KEY_SPACE),
            remove_ratio: args
                .remove_ratio
                .or(parse_env(&lookup, "STRESS_REMOVE_RATIO")?)
                .or(scenario.remove_ratio)
                .unwrap_or(DEFAULT_REMOVE_RATIO),
            seed: args
                .seed
                .or(parse_env(&lookup, "STRESS_SEED")?)
                .or(scenario.seed)
                .unwrap_or(DEFAULT_SEED),
            validate_every: args
                .validate_every
                .or(parse_env(&lookup, "STRESS_VALIDATE_EVERY")?)
                .or(scenario.validate_every)
                .unwrap_or(DEFAULT_VALIDATE_EVERY),
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.key_space == 0 {
            bail!("key_space must be positive");
        }
        if !(0.0..=1.0).contains(&self.remove_ratio) {
            bail!("remove_ratio must be within 0.0-1.0, got {}", self.remove_ratio);
        }
        if self.validate_every == 0 {
            bail!("validate_every must be positive");
        }
        Ok(())
    }
}

/// Parse an environment variable, treating an unset variable as absent
fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|error| anyhow::anyhow!("invalid {name}={raw:?}: {error}"))
        })
        .transpose()
}

/// Load a scenario, trying the bundled scenarios directory as a fallback
fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let path = if path.exists() {
        path.to_path_buf()
    } else {
        let alt_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("scenarios")
            .join(path);
        if !alt_path.exists() {
            bail!(
                "Scenario file not found: {} or {}",
                path.display(),
                alt_path.display()
            );
        }
        alt_path
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    serde_yaml::from_str(&content).context("Failed to parse scenario YAML")
}

// =============================================================================
// Workload
// =============================================================================

/// Outcome of one tree's workload
#[derive(Debug, Serialize)]
struct WorkloadReport {
    tree: TreeKind,
    inserts: u64,
    removes: u64,
    removal_hits: u64,
    final_len: usize,
    final_height: usize,
    elapsed_ms: u64,
}

/// Summary written by `--report`
#[derive(Debug, Serialize)]
struct StressReport<'a> {
    scenario: Option<&'a str>,
    config: &'a StressConfig,
    workloads: &'a [WorkloadReport],
}

fn run_workload<T>(kind: TreeKind, config: &StressConfig) -> Result<WorkloadReport>
where
    T: SearchTree<u32, u64> + Default,
{
    let mut tree = T::default();
    let mut model = BTreeMap::new();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let started = Instant::now();
    let (mut inserts, mut removes, mut removal_hits) = (0, 0, 0);

    for step in 1..=config.operations {
        let key = rng.random_range(0..config.key_space);

        if rng.random_bool(config.remove_ratio) {
            let removed = tree.take(&key);
            let expected = model.remove(&key);
            if removed != expected {
                bail!("{kind}: take({key}) at step {step} returned {removed:?}, model had {expected:?}");
            }
            removes += 1;
            removal_hits += u64::from(removed.is_some());
        } else {
            tree.insert(key, step);
            model.insert(key, step);
            inserts += 1;
        }

        if step % config.validate_every == 0 || step == config.operations {
            compare_with_model(&tree, &model)
                .with_context(|| format!("{kind} diverged after {step} operations"))?;
            tracing::debug!(tree = %kind, step, len = tree.len(), "checkpoint passed");
        }
    }

    Ok(WorkloadReport {
        tree: kind,
        inserts,
        removes,
        removal_hits,
        final_len: tree.len(),
        final_height: tree.height(),
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

fn compare_with_model<T>(tree: &T, model: &BTreeMap<u32, u64>) -> Result<()>
where
    T: SearchTree<u32, u64>,
{
    tree.validate()?;

    if tree.len() != model.len() {
        bail!("tree holds {} entries, model holds {}", tree.len(), model.len());
    }

    let mismatch = tree
        .traverse(TraversalOrder::InOrder)
        .with_keys()
        .zip(model.iter())
        .position(|(actual, expected)| actual != expected);
    if let Some(position) = mismatch {
        bail!("entry {position} in key order differs from the model");
    }
    Ok(())
}

/// Main entry point for stress command
pub fn run(args: &StressArgs) -> Result<()> {
    let scenario = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => ScenarioConfig::default(),
    };
    let config = StressConfig::resolve(args, &scenario, |name| env::var(name).ok())?;

    tracing::info!(
        scenario = scenario.name.as_deref().unwrap_or("<none>"),
        tree = %config.tree,
        operations = config.operations,
        key_space = config.key_space,
        remove_ratio = config.remove_ratio,
        seed = config.seed,
        validate_every = config.validate_every,
        "starting stress run"
    );

    let mut workloads = Vec::new();
    for &kind in config.tree.expand() {
        let report = match kind {
            TreeKind::Bst => run_workload::<BinarySearchTree<u32, u64>>(kind, &config)?,
            TreeKind::Avl => run_workload::<AvlTree<u32, u64>>(kind, &config)?,
            TreeKind::RedBlack => run_workload::<RedBlackTree<u32, u64>>(kind, &config)?,
            TreeKind::All => unreachable!("`expand` never yields `All`"),
        };
        tracing::info!(
            tree = %kind,
            inserts = report.inserts,
            removes = report.removes,
            len = report.final_len,
            height = report.final_height,
            elapsed_ms = report.elapsed_ms,
            "workload passed"
        );
        workloads.push(report);
    }

    if let Some(path) = &args.report {
        let summary = StressReport {
            scenario: scenario.name.as_deref(),
            config: &config,
            workloads: &workloads,
        };
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}
