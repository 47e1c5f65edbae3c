//! conv-life CLI - Watch or benchmark the Life steppers side by side.

use std::fmt::Display;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use conv_life::{
    compute::{Grid, Lockstep},
    render::{CLEAR_SCREEN, render_labeled, status_line},
    schema::{ConfigError, LifeConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let (mut config, bench) = if args[1] == "--config" {
        let path = args.get(2).unwrap_or_else(|| {
            eprintln!("Error: --config needs a file path");
            std::process::exit(1);
        });
        let config = LifeConfig::load(path).unwrap_or_else(|e| exit_with(e));
        (config, args.get(3).is_some_and(|a| a == "bench"))
    } else {
        let size = match args[1].parse::<usize>() {
            Ok(s) if s > 0 => s,
            _ => exit_with("size must be a positive integer"),
        };
        let mut config = LifeConfig {
            size,
            ..Default::default()
        };
        let bench = args.get(2).is_some_and(|a| a == "bench");
        if bench {
            config.iterations = args
                .get(3)
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(config.iterations);
        }
        (config, bench)
    };

    if let Err(ConfigError::NotPowerOfTwo { suggested, .. }) = config.validate() {
        if !confirm_round_up(suggested) {
            println!("Aborted.");
            return;
        }
        config.size = suggested;
    }
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let initial = config
        .seed
        .generate(config.size)
        .unwrap_or_else(|e| exit_with(e));
    let mut lockstep = Lockstep::new(&initial, &config.steppers).unwrap_or_else(|e| exit_with(e));

    if bench {
        run_bench(&mut lockstep, config.iterations);
    } else {
        run_visual(&mut lockstep, &config);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <size> [bench <iterations>]", program);
    eprintln!("       {} --config <config.json> [bench]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Run Game of Life with several steppers in lockstep and check they agree.");
    eprintln!("The FFT stepper needs a power-of-two size (64, 128, 256, ...).");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} 128           - visual simulation on a 128x128 grid", program);
    eprintln!("  {} 1024 bench 50 - benchmark 50 iterations on 1024x1024", program);
}

fn print_example_config() {
    let config = LifeConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(e),
    }
}

fn exit_with(err: impl Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

/// Ask whether to round the size up. Empty input counts as yes.
fn confirm_round_up(suggested: usize) -> bool {
    print!(
        "Size must be a power of 2. The next power of 2 is {}. Use that? [Y/n] ",
        suggested
    );
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().chars().next(), None | Some('y') | Some('Y'))
}

fn run_bench(lockstep: &mut Lockstep, iterations: usize) {
    let size = lockstep.size();
    println!("Grid: {}x{}, steppers: {}", size, size, lockstep.names().join(", "));
    println!("Running {} iterations...", iterations);
    println!();

    let report = lockstep.run(iterations).unwrap_or_else(|e| exit_with(e));

    for timing in &report.timings {
        println!(
            "  {:<12} {:?}  ({:.3} ms/iter)",
            timing.name,
            timing.total,
            timing.ms_per_iteration(iterations)
        );
    }
    println!();

    if report.mismatched_generations > 0 {
        println!(
            "  {} of {} generations had mismatches",
            report.mismatched_generations, iterations
        );
    }
    println!(
        "  Result after {} iterations: {}",
        iterations,
        if report.matched { "MATCH" } else { "MISMATCH" }
    );
}

fn run_visual(lockstep: &mut Lockstep, config: &LifeConfig) -> ! {
    let delay = Duration::from_millis(config.frame_delay_ms);
    let names = lockstep.names();

    loop {
        let grids: Vec<(&str, &Grid)> = names
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, lockstep.current(i)))
            .collect();
        let frame = render_labeled(&grids, config.display_limit);
        print!("{}{}", CLEAR_SCREEN, frame);
        println!(
            "{}",
            status_line(lockstep.generation(), lockstep.size(), lockstep.all_match())
        );

        thread::sleep(delay);
        lockstep.advance().unwrap_or_else(|e| exit_with(e));
    }
}
