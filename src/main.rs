//! Genecode CLI - Generate, score and breed codes from the command line.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use genecode::{
    compute::{Breeder, CodeRng},
    schema::{CodeConfig, Value},
};

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--config <config.json>] [--seed <n>] <command> [args]");
    eprintln!();
    eprintln!("Generate, score and breed genetic codes.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  score <value>          Print the score card of a value");
    eprintln!("  units <value>          Print the scoring units of a value");
    eprintln!("  generate [advantage]   Generate a fresh code (default advantage: 0)");
    eprintln!("  breed <value> <value>  Breed a child from two parent values");
    eprintln!("  --example              Print the default configuration");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(format!("serializing output: {e}")),
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let mut args: Vec<String> = std::env::args().collect();
    let program = args.remove(0);

    let mut config_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(
                    iter.next()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| fail("--config needs a path")),
                );
            }
            "--seed" => {
                seed = Some(
                    iter.next()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| fail("--seed needs an unsigned integer")),
                );
            }
            "--example" => {
                print_json(&CodeConfig::default());
                return;
            }
            _ => rest.push(arg),
        }
    }

    if rest.is_empty() {
        print_usage(&program);
        std::process::exit(1);
    }

    // Load configuration
    let config: CodeConfig = match &config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("reading config file: {e}")));
            serde_json::from_str(&config_str)
                .unwrap_or_else(|e| fail(format!("parsing config: {e}")))
        }
        None => CodeConfig::default(),
    };

    let breeder = Breeder::new(config).unwrap_or_else(|e| fail(e));
    let mut rng = seed.map(CodeRng::new).unwrap_or_else(CodeRng::random);

    let value_arg = |i: usize| -> Value {
        rest.get(i)
            .map(|s| Value::from(s.as_str()))
            .unwrap_or_else(|| fail(format!("{} needs a value", rest[0])))
    };

    match rest[0].as_str() {
        "score" => {
            let card = breeder.score(&value_arg(1)).unwrap_or_else(|e| fail(e));
            print_json(&card);
        }
        "units" => {
            let units = breeder.units_of(&value_arg(1)).unwrap_or_else(|e| fail(e));
            print_json(&units);
        }
        "generate" => {
            let advantage: i64 = match rest.get(1) {
                Some(s) => s
                    .parse()
                    .unwrap_or_else(|_| fail(format!("invalid advantage: {s}"))),
                None => 0,
            };
            let result = breeder
                .generate(advantage, &mut rng)
                .unwrap_or_else(|e| fail(e));
            print_json(&result);
        }
        "breed" => {
            let parent_a = breeder.restore(value_arg(1), 0).unwrap_or_else(|e| fail(e));
            let parent_b = breeder.restore(value_arg(2), 0).unwrap_or_else(|e| fail(e));
            let child = breeder
                .breed(&parent_a, &parent_b, &mut rng)
                .unwrap_or_else(|e| fail(e));
            print_json(&child);
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(&program);
            std::process::exit(1);
        }
    }
}
