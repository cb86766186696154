//! `treecut` CLI: a thin consumer of the library's `partition`/`partition_with_details` entry
//! points plus the I/O adapters and generators. Contains no algorithmic logic of its own.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use treecut::gen;
use treecut::io::{graphviz, text};
use treecut::partition::partition_with_details;
use treecut::tree::Tree;

#[derive(Clone, Copy, ValueEnum)]
enum GenKind {
    Uniform,
    Path,
    Star,
}

/// Partition method selector. `Tree` (the FF13 cut/pack scheme this crate implements) is
/// currently the only accepted value; the flag exists so a future external-partitioner backend
/// can be selected the same way without breaking this interface.
#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Tree,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    Graph,
    GraphPart,
    Part,
    CutCost,
    Time,
}

#[derive(Parser)]
#[command(name = "treecut")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Balanced k-way tree partitioning via the Feldmann-Foschini approximation scheme")]
struct Cli {
    /// Partition method to use
    #[arg(long, value_enum, default_value = "tree")]
    method: Method,

    /// Read the tree from a file in tree text format
    #[arg(long, conflicts_with = "gen")]
    file: Option<PathBuf>,

    /// Generate a tree instead of reading one
    #[arg(long, value_enum, conflicts_with = "file")]
    gen: Option<GenKind>,

    /// Seed for --gen
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Node count for --gen
    #[arg(short = 'n', long)]
    n: Option<usize>,

    /// Number of parts to partition into
    #[arg(long)]
    kparts: u64,

    /// Imbalance bound as a rational `p/q`
    #[arg(long, default_value = "1/2")]
    imbalance: String,

    /// Output to print; may be repeated
    #[arg(long, value_enum)]
    output: Vec<OutputMode>,
}

fn parse_imbalance(s: &str) -> Result<(i64, i64)> {
    let (p, q) = s
        .split_once('/')
        .with_context(|| format!("imbalance must be of the form p/q, got {s:?}"))?;
    let p: i64 = p.trim().parse().context("imbalance numerator is not an integer")?;
    let q: i64 = q.trim().parse().context("imbalance denominator is not an integer")?;
    Ok((p, q))
}

fn load_adjacency(cli: &Cli) -> Result<(HashMap<u64, HashMap<u64, i64>>, u64)> {
    if let Some(path) = &cli.file {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let (adjacency, root) = text::read_tree_text(BufReader::new(file))?;
        Ok((adjacency, root))
    } else if let Some(kind) = cli.gen {
        let n = cli.n.context("--gen requires -n/--node count")?;
        let weights = 1..10;
        let adjacency = match kind {
            GenKind::Uniform => gen::uniform_random_tree(cli.seed, n, weights),
            GenKind::Path => gen::random_path(cli.seed, n, weights),
            GenKind::Star => gen::random_star(cli.seed, n, weights),
        };
        Ok((adjacency, 0))
    } else {
        bail!("one of --file or --gen is required");
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Only one method exists today; the match keeps this exhaustive when a second is added.
    match cli.method {
        Method::Tree => {}
    }

    let start = Instant::now();
    let (adjacency, root) = load_adjacency(cli)?;
    let (eps_num, eps_denom) = parse_imbalance(&cli.imbalance)?;

    let details = partition_with_details(&adjacency, Some(root), cli.kparts, eps_num, eps_denom)?;
    let elapsed = start.elapsed();

    let modes = if cli.output.is_empty() {
        vec![OutputMode::Part, OutputMode::CutCost]
    } else {
        cli.output.clone()
    };

    for mode in modes {
        match mode {
            OutputMode::Graph => {
                let tree = Tree::build(&adjacency, Some(root))?;
                println!("{}", graphviz::to_dot(&tree, None));
            }
            OutputMode::GraphPart => {
                let tree = Tree::build(&adjacency, Some(root))?;
                println!("{}", graphviz::to_dot(&tree, Some(&details.cut_edges)));
            }
            OutputMode::Part => {
                for (idx, part) in details.partition.parts.iter().enumerate() {
                    let mut ids = part.clone();
                    ids.sort_unstable();
                    println!("part {idx}: {ids:?}");
                }
            }
            OutputMode::CutCost => {
                println!("cut_cost: {}", details.partition.cut_cost);
            }
            OutputMode::Time => {
                println!("elapsed: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
