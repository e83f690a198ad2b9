use std::process::ExitCode;

use clap::{Parser, Subcommand};
use explodie::print::PrintExt;
use explodie::{Approx, Die, PoolSize, Request, Successes, Target, DEFAULT_SIDES};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "explodie",
    version,
    about = "Odds for pools of open-ended dice",
    arg_required_else_help = true
)]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_SIDES, help = "Faces per die; the top face explodes")]
    sides: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Success counts and botch chance for one pool.
    Attr {
        #[arg(help = "Dice in the pool")]
        lvl: PoolSize,
        #[arg(help = "Target number per die", allow_negative_numbers = true)]
        tn: Target,
    },
    /// Smallest pools for casting a ritual without ageing.
    Cast {
        #[arg(help = "Casting target number", allow_negative_numbers = true)]
        ctn: Target,
        #[arg(help = "Required chance to cast, in [0, 1)")]
        p_succ: f64,
        #[arg(help = "Required chance to avoid ageing, in [0, 1)")]
        p_no_age: f64,
        #[arg(long, help = "Successes needed to avoid ageing [default: CTN]")]
        target: Option<Successes>,
    },
    /// Margins of your pool against theirs.
    Cont {
        your_lvl: PoolSize,
        #[arg(allow_negative_numbers = true)]
        your_tn: Target,
        their_lvl: PoolSize,
        #[arg(allow_negative_numbers = true)]
        their_tn: Target,
    },
    /// Roll single dice.
    Roll {
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, help = "Seed for reproducible rolls")]
        seed: Option<u64>,
    },
    /// Sample success counts of a pool by simulation.
    Sample {
        lvl: PoolSize,
        #[arg(allow_negative_numbers = true)]
        tn: Target,
        #[arg(long, default_value_t = 1_000_000)]
        samples: u32,
        #[arg(long, help = "Seed for reproducible samples")]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> explodie::Result<()> {
    let die = Die::new(cli.sides)?;
    let request = match cli.command {
        Command::Attr { lvl, tn } => Request::attr(die, lvl, tn),
        Command::Cast {
            ctn,
            p_succ,
            p_no_age,
            target,
        } => Request::cast(die, ctn, p_succ, p_no_age, target),
        Command::Cont {
            your_lvl,
            your_tn,
            their_lvl,
            their_tn,
        } => Request::cont(die, your_lvl, your_tn, their_lvl, their_tn),
        Command::Roll { count, seed } => {
            let mut approx = Approx::builder().die(die).build(rng(seed));
            println!("{}", (0..count).map(|_| approx.roll()).join(" "));
            return Ok(());
        }
        Command::Sample {
            lvl,
            tn,
            samples,
            seed,
        } => {
            Approx::builder()
                .die(die)
                .sample_size(samples)
                .build(rng(seed))
                .successes(lvl, tn)
                .print_table();
            return Ok(());
        }
    };
    request.eval()?.print_table();
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
