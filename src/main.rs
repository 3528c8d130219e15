/*
 * @file main.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Demo: build an MPHF over random keys or a word list, report its
 * size and build time, optionally validate and save it.
 */

use anyhow::{bail,Context,Result};
use bbhash::keys::{dedup,random_unique_keys};
use bbhash::mix::murmur3_64;
use bbhash::{BuildOptions,Mphf};
use clap::{Parser,Subcommand,Args};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/** Seed for fingerprinting words into keys */
const WORD_SEED : u64 = 42;

#[derive(Parser)]
#[command(name = "bbhash", version, about = "Build and inspect BBHash minimal perfect hash functions")]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand)]
enum Command {
    /// Build over random unique keys
    Random {
        /// Number of keys
        num_keys: usize,
        /// Seed for the key generator
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[command(flatten)]
        build: BuildArgs
    },
    /// Build over the lines of a text file
    Words {
        /// One key per line
        file: PathBuf,
        #[command(flatten)]
        build: BuildArgs
    },
    /// Look up keys in a saved MPHF
    Query {
        /// File written by --output
        file: PathBuf,
        /// Treat the keys as words, fingerprinted as `words` does
        #[arg(short, long)]
        words: bool,
        /// Keys to look up
        keys: Vec<String>
    }
}

#[derive(Args)]
struct BuildArgs {
    /// Slots per key in each level; 1.0 is smallest, 2.0 builds faster
    #[arg(short, long, default_value_t = 2.0)]
    gamma: f64,
    /// Check that every key gets a distinct index in range
    #[arg(short, long)]
    validate: bool,
    /// Log every level
    #[arg(long)]
    verbose: bool,
    /// Save the MPHF here
    #[arg(short, long)]
    output: Option<PathBuf>
}

/** Key for one line of a word list */
fn word_key(word:&str) -> u64 {
    murmur3_64(word.as_bytes(), WORD_SEED)
}

fn validate(mphf:&Mphf, keys:&[u64]) -> Result<()> {
    let mut seen = vec![false; keys.len()];
    for &k in keys {
        match mphf.query(k) {
            Some(idx) if (idx as usize) < keys.len() && !seen[idx as usize] => seen[idx as usize] = true,
            Some(idx) => bail!("key {} -> index {} (out of range or duplicate)", k, idx),
            None => bail!("key {} not found", k)
        }
    }
    if let Some(idx) = seen.iter().position(|&s| !s) {
        bail!("index {} was not mapped", idx);
    }
    println!("Validation successful: all keys map to a unique index in [0, {}).", keys.len());
    Ok(())
}

fn build_and_report(keys:&[u64], args:&BuildArgs) -> Result<()> {
    let options = BuildOptions { gamma: args.gamma, verbose: args.verbose, ..Default::default() };
    info!(keys = keys.len(), gamma = args.gamma, "constructing MPHF");

    let start = Instant::now();
    let mphf = Mphf::build(keys, &options).context("failed to build MPHF")?;
    let elapsed = start.elapsed();

    let bits = mphf.size_in_bits();
    println!("Built perfect hash for {} keys in {:.2?} ({} levels).", keys.len(), elapsed, mphf.num_levels());
    println!("Total size: {} bits ({:.2} MB)", bits, bits as f64 / (8.0 * 1024.0 * 1024.0));
    println!("Bits/key  : {:.4}", mphf.bits_per_key());

    if args.validate { validate(&mphf, keys)?; }
    if let Some(path) = &args.output {
        mphf.save(path).with_context(|| format!("failed to save {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Random { num_keys, seed, build } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let keys = random_unique_keys(&mut rng, num_keys);
            build_and_report(&keys, &build)
        },
        Command::Words { file, build } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let keys : Vec<u64> = text.lines()
                .filter(|l| !l.is_empty())
                .map(word_key)
                .collect();

            /* Fingerprints must be unique; dedup a copy to check */
            let mut sorted = keys.clone();
            let collisions = dedup(&mut sorted);
            if collisions != 0 {
                bail!("{} fingerprint collisions (or repeated words) in {}", collisions, file.display());
            }
            build_and_report(&keys, &build)
        },
        Command::Query { file, words, keys } => {
            let mphf = Mphf::load(&file).with_context(|| format!("failed to load {}", file.display()))?;
            for k in keys {
                let key = if words { word_key(&k) } else {
                    k.parse::<u64>().with_context(|| format!("bad key {:?} (use --words for text)", k))?
                };
                match mphf.query(key) {
                    Some(idx) => println!("{} -> {}", k, idx),
                    None => println!("{} -> not found", k)
                }
            }
            Ok(())
        }
    }
}
