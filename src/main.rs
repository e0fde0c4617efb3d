// src/main.rs
use clap::Parser;
use ftc_pow_rs::cli::{self, Action};
use ftc_pow_rs::pow::{Availability, HashEngine, Registry, Target, verify_header};
use ftc_pow_rs::utils::{self, init_bench_logging};
use ftc_pow_rs::{Config, NodeError, Profile, SeedPeers, StatsReporter, config};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main entry point
///
/// Parses the command line and delegates to the subcommand handler. Any
/// error, including an unknown or unavailable profile, ends the process with
/// a non-zero status.
fn main() -> Result<(), NodeError> {
    let cli = cli::Commands::parse();

    match cli.action {
        Action::Hash(opts) => hash_input(&cli.config, opts),
        Action::Verify(opts) => verify(&cli.config, opts),
        Action::Probe(opts) => probe(&cli.config, opts),
        Action::Peers(opts) => list_peers(&cli.config, opts),
        Action::Benchmark(opts) => run_benchmark(&cli.config, opts),
        Action::Config(opts) => generate_config(opts),
    }
}

/// Loads the configuration and sets up logging from it
fn setup(config_path: &Path) -> Result<Config, NodeError> {
    let config = config::load(config_path)?;
    utils::init_logging(Some(&config.log_level));
    Ok(config)
}

/// Builds the engine over the built-in registry
///
/// A registration conflict here is fatal; nothing is hashed with an
/// ambiguous registry.
fn build_engine() -> Result<HashEngine, NodeError> {
    let engine = HashEngine::with_defaults()?;
    log::debug!(
        "Registry published with {} profiles",
        engine.registry().len()
    );
    Ok(engine)
}

/// Hashes one hex-encoded input and prints the digest
fn hash_input(config_path: &Path, opts: cli::HashOptions) -> Result<(), NodeError> {
    let config = setup(config_path)?;
    let profile = opts.profile.unwrap_or(config.profile);
    let input = hex::decode(opts.input.trim())?;

    let engine = build_engine()?;
    let digest = engine.hash(&input, profile)?;

    if opts.json {
        let out = json!({
            "profile": profile,
            "input_len": input.len(),
            "digest": digest,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", digest);
    }
    Ok(())
}

/// Validates a header against a compact or full target
///
/// Exits with an error both when the work is insufficient and when the
/// digest cannot be computed at all.
fn verify(config_path: &Path, opts: cli::VerifyOptions) -> Result<(), NodeError> {
    let config = setup(config_path)?;
    let profile = opts.profile.unwrap_or(config.profile);
    let header = hex::decode(opts.header.trim())?;

    let target = match (opts.bits, opts.target.as_deref()) {
        (Some(bits), _) => Target::from_compact(bits)?,
        (None, Some(hex)) => Target::from_hex(hex)?,
        (None, None) => {
            return Err(NodeError::InputError(
                "either --bits or --target is required".into(),
            ));
        }
    };

    let engine = build_engine()?;
    let digest = verify_header(&engine, &header, profile, &target)?;
    log::info!("Header meets target {} under profile {}", target, profile);
    println!("valid {}", digest);
    Ok(())
}

#[derive(Serialize)]
struct ProbeRow<'a> {
    profile: Profile,
    algorithm: &'static str,
    availability: &'a Availability,
}

/// Prints every registered profile with its probe result
fn probe(config_path: &Path, opts: cli::ProbeOptions) -> Result<(), NodeError> {
    setup(config_path)?;
    let registry = Registry::with_defaults()?;

    let rows: Vec<ProbeRow<'_>> = registry
        .descriptors()
        .map(|d| ProbeRow {
            profile: d.profile(),
            algorithm: d.name(),
            availability: d.availability(),
        })
        .collect();

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in rows {
        match row.availability {
            Availability::Available => {
                println!("{}  {:<24} available", row.profile, row.algorithm)
            }
            Availability::Unavailable(reason) => println!(
                "{}  {:<24} UNAVAILABLE ({})",
                row.profile, row.algorithm, reason
            ),
        }
    }
    Ok(())
}

/// Prints the bootstrap seed peers
fn list_peers(config_path: &Path, opts: cli::PeersOptions) -> Result<(), NodeError> {
    let config = setup(config_path)?;
    let network = opts.network.unwrap_or(config.network);
    let mut seeds = SeedPeers::new(network);

    let peers = match opts.count {
        Some(count) => std::iter::from_fn(|| seeds.next_peer()).take(count).collect(),
        None => seeds.all_peers(),
    };

    log::info!("{} seed peers for {}", peers.len(), network);
    for peer in peers {
        println!("{}", peer);
    }
    Ok(())
}

/// Runs a hashing benchmark for one profile
///
/// # Operations
/// 1. Confirms the profile hashes at all before any thread starts
/// 2. Spawns workers on a rayon pool, each hashing its own header/nonce range
/// 3. Collects counts through the stats reporter and prints the result
fn run_benchmark(config_path: &Path, opts: cli::BenchmarkOptions) -> Result<(), NodeError> {
    let config = config::load(config_path)?;
    init_bench_logging();

    let profile = opts.profile.unwrap_or(config.profile);
    let threads = opts.threads.unwrap_or(config.worker_threads).max(1);
    let engine = build_engine()?;

    // Refuse to benchmark a profile that cannot produce digests
    engine.hash(&[0u8; 80], profile)?;

    let mut reporter = StatsReporter::new(Duration::from_secs(5));
    let feed = reporter.hash_feed();
    reporter.start_reporting();

    log::info!(
        "Starting {} benchmark on {} threads for {} seconds",
        profile,
        threads,
        opts.duration
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("bench-{}", i))
        .build()?;
    let deadline = Instant::now() + Duration::from_secs(opts.duration);

    pool.scope(|scope| {
        for worker in 0..threads {
            let engine = &engine;
            let sender = feed.sender.clone();

            scope.spawn(move |_| {
                let mut header = [0u8; 80];
                header[72..76].copy_from_slice(&(worker as u32).to_le_bytes());
                let mut nonce: u32 = 0;
                let mut pending = 0u64;
                let mut since_log = 0u64;
                let mut last_log = Instant::now();

                while Instant::now() < deadline {
                    header[76..80].copy_from_slice(&nonce.to_le_bytes());
                    if let Err(e) = engine.hash(&header, profile) {
                        log::error!("Worker {} stopped: {}", worker, e);
                        break;
                    }
                    nonce = nonce.wrapping_add(1);
                    pending += 1;
                    since_log += 1;

                    if pending == 16 {
                        let _ = sender.send(pending);
                        pending = 0;
                    }

                    if last_log.elapsed().as_secs() >= 1 {
                        log::debug!(
                            "Worker {}: {:.1} H/s",
                            worker,
                            since_log as f64 / last_log.elapsed().as_secs_f64()
                        );
                        since_log = 0;
                        last_log = Instant::now();
                    }
                }

                if pending > 0 {
                    let _ = sender.send(pending);
                }
            });
        }
    });

    feed.close();
    reporter.stop_reporting();

    let stats = reporter.get_stats();
    let hardware = reporter.get_hardware_stats();
    log::info!("Benchmark results:");
    log::info!("Total hashes: {}", stats.hashes_total);
    log::info!("Elapsed: {:.1} s", stats.elapsed_secs);
    log::info!("Average hashrate: {:.2} H/s", stats.avg_hashrate);
    log::info!(
        "CPU: {:.1}% | Mem: {} MiB | Temp: {:.1}°C",
        hardware.cpu_usage,
        hardware.memory_used / (1024 * 1024),
        hardware.temperature
    );
    log::logger().flush();

    println!(
        "{} {:.2} H/s ({} hashes in {:.1} s)",
        profile, stats.avg_hashrate, stats.hashes_total, stats.elapsed_secs
    );
    Ok(())
}

/// Writes the configuration template to disk
fn generate_config(opts: cli::ConfigOptions) -> Result<(), NodeError> {
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Wrote {}", opts.output.display());
    Ok(())
}
