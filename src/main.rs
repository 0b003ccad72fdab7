//! Crater height-map generator binary — synthesizes a grayscale PNG.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --width <W>       Image width in pixels (default: 1024)
//!   --height <H>      Image height in pixels (default: 512)
//!   --craters <N>     Number of random craters (default: 60)
//!   --seed <SEED>     Crater placement seed (default: 42)
//!   --noise <AMP>     Base noise amplitude, 0 disables (default: 0.05)
//!   --output <PATH>   Output PNG path (default: assets/textures/crater_map.png)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use regolith::core::{logging, Error};
use regolith::crater::{self, SynthesisParams};
use regolith::export;

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let width = parse_u32_arg(&args, "--width").unwrap_or(1024);
    let height = parse_u32_arg(&args, "--height").unwrap_or(512);
    let craters = parse_u32_arg(&args, "--craters").unwrap_or(60);
    let seed = parse_u64_arg(&args, "--seed").unwrap_or(42);
    let noise = parse_f32_arg(&args, "--noise").unwrap_or(0.05);
    let output = parse_str_arg(&args, "--output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/textures/crater_map.png"));

    println!("=== Regolith Crater Map Generator ===");
    println!("Size:    {} x {}", width, height);
    println!("Craters: {}", craters);
    println!("Seed:    {}", seed);
    println!("Noise:   {}", noise);
    println!("Output:  {}", output.display());
    println!();

    let mut params = SynthesisParams::new(width, height, craters, seed);
    params.base_noise = noise;

    match run(&params, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(params: &SynthesisParams, output: &Path) -> Result<(), Error> {
    let map = crater::synthesize(params)?;
    let pixels = map.quantize();

    if let Some(dir) = output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    export::write_grayscale_png(output, pixels, map.width(), map.height())?;

    println!();
    println!("Saved crater height map to: {}", output.display());
    println!("Image size: {} x {}", map.width(), map.height());
    println!("Image mode: 8-bit grayscale");
    println!();
    println!("Height map legend:");
    println!("  White (255) = High terrain");
    println!("  Black (0)   = Deep craters");
    println!("  Gray (128)  = Base surface");
    Ok(())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
