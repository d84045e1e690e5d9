//! # matcap - Main Entry Point
//!
//! Supports two operational modes:
//! - **Simulate** (`matcap simulate`): configure the per-core buffers, feed
//!   synthetic addresses through the producer path and drain every core
//!   through the device into `<output-dir>/core<N>.bin`
//! - **Hex** (`matcap hex FILE`): print a drained dump one address per line

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use matcap::cli::{Args, Command, HexArgs, SimulateArgs};
use matcap::config::CaptureConfig;
use matcap::control::{Attribute, CaptureDevice, DeviceHandle};
use matcap::domain::CoreId;
use matcap::export::{export_status, write_hex_dump};
use matcap::preflight::{check_input_file, run_simulate_checks};
use matcap_common::Sample;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NOPERM: i32 = 77;

/// Base of the synthetic kernel addresses fed by `simulate`
const SYNTHETIC_BASE: Sample = 0xffff_ffff_8100_0000;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}").to_lowercase();
    if msg.contains("permission denied") {
        EXIT_NOPERM
    } else if msg.contains("invalid argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Simulate(sim) => simulate(&sim),
        Command::Hex(hex) => hex_dump(&hex),
    }
}

fn load_config(sim: &SimulateArgs) -> Result<CaptureConfig> {
    let mut config = match sim.config {
        Some(ref path) => CaptureConfig::from_file(path)?,
        None => CaptureConfig::default(),
    };
    if let Some(cpus) = sim.cpus {
        config.cpu_count = cpus;
    }
    config.validate()?;
    Ok(config)
}

fn simulate(sim: &SimulateArgs) -> Result<()> {
    run_simulate_checks(sim.config.as_deref(), &sim.output_dir, sim.chunk, sim.core)?;
    let config = load_config(sim)?;
    let cpus = config.cpu_count;
    info!("simulate: {cpus} cores, {} segments per core", config.segments_per_core);

    let device = CaptureDevice::new(config);
    device.store(Attribute::BuffersEnabled, "1").context("Failed to enable capture")?;

    let request = match sim.core {
        Some(core) => format!("{core} {}", sim.capacity),
        None => sim.capacity.to_string(),
    };
    device
        .store(Attribute::Buffers, &request)
        .with_context(|| format!("Failed to configure buffers with {request:?}"))?;

    let targets: Vec<CoreId> = match sim.core {
        Some(core) => vec![CoreId(usize::try_from(core)?)],
        None => (0..cpus).map(CoreId).collect(),
    };
    for &core in &targets {
        let samples: Vec<Sample> = (0..sim.samples).map(|i| synthetic_address(core, i)).collect();
        let stored = device.record_batch(core, &samples);
        if (stored as u64) < sim.samples {
            warn!("{core}: buffers full, dropped {} samples", sim.samples - stored as u64);
        }
        debug!("{core}: recorded {stored} samples");
    }

    let mut handle = device.open()?;
    for &core in &targets {
        let path = sim.output_dir.join(format!("core{}.bin", core.0));
        let written = drain_core(&device, &mut handle, core, sim.chunk, &path)?;
        if !sim.quiet {
            println!("{core}: {written} bytes -> {}", path.display());
        }
    }
    drop(handle);

    device.store(Attribute::Cpu, "-1")?;
    if !sim.quiet {
        print!("{}", device.show(Attribute::Buffers));
    }

    if let Some(ref export_path) = sim.export {
        let file = File::create(export_path)
            .with_context(|| format!("Failed to create {}", export_path.display()))?;
        export_status(&device.status_report(), BufWriter::new(file))
            .with_context(|| format!("Failed to export status to {}", export_path.display()))?;
        info!("status exported to {}", export_path.display());
    }

    device.shutdown();
    Ok(())
}

/// Stream one core's filled bytes into `path` in `chunk`-sized reads
fn drain_core(
    device: &CaptureDevice,
    handle: &mut DeviceHandle,
    core: CoreId,
    chunk: usize,
    path: &Path,
) -> Result<u64> {
    device.store(Attribute::Cpu, &core.0.to_string())?;
    let total: u64 = device
        .show(Attribute::BuffersBytes)
        .trim()
        .parse()
        .context("Malformed buffers_bytes value")?;

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut buf = vec![0u8; chunk];

    handle.seek(0);
    while handle.position() < total {
        let want = usize::try_from(total - handle.position()).map_or(chunk, |left| left.min(chunk));
        let n = handle
            .read(&mut buf[..want])
            .with_context(|| format!("{core}: read failed at offset {}", handle.position()))?;
        writer.write_all(&buf[..n])?;
    }
    writer.flush()?;

    debug!("{core}: drained {total} bytes");
    Ok(total)
}

fn synthetic_address(core: CoreId, index: u64) -> Sample {
    SYNTHETIC_BASE
        .wrapping_add((core.0 as u64) << 32)
        .wrapping_add(index.wrapping_mul(64))
}

fn hex_dump(hex: &HexArgs) -> Result<()> {
    check_input_file(&hex.file)?;
    let file = File::open(&hex.file)
        .with_context(|| format!("Failed to open {}", hex.file.display()))?;

    let stdout = std::io::stdout();
    let lines = write_hex_dump(BufReader::new(file), BufWriter::new(stdout.lock()), hex.byte_order)
        .with_context(|| format!("Failed to convert {}", hex.file.display()))?;
    info!("{lines} elements ({} byte order)", hex.byte_order);
    Ok(())
}
