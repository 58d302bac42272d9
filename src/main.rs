use anyhow::{ensure, Result};
use clap::Parser;

use signal_sim::simulation::{SimWorld, TimeOfDay};

#[derive(Parser)]
#[command(name = "signal_sim")]
#[command(about = "Adaptive four-way intersection simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.05")]
    delta: f32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Time-of-day bias applied to the signal policy
    #[arg(long, value_enum, default_value = "normal")]
    bias: BiasArg,

    /// Clock multiplier applied to the phase timer and vehicle motion
    #[arg(long, default_value = "1.0")]
    speed: f32,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum BiasArg {
    Normal,
    Morning,
    Evening,
}

impl From<BiasArg> for TimeOfDay {
    fn from(bias: BiasArg) -> Self {
        match bias {
            BiasArg::Normal => TimeOfDay::Normal,
            BiasArg::Morning => TimeOfDay::Morning,
            BiasArg::Evening => TimeOfDay::Evening,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    ensure!(cli.delta > 0.0, "--delta must be positive");

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(seed),
        None => SimWorld::new(),
    };
    world.set_bias(cli.bias.into());
    ensure!(
        world.set_speed_multiplier(cli.speed),
        "--speed must be a positive number"
    );

    println!("Running intersection simulation...");
    println!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);

    // How many ticks equal 1 second of simulated time
    let ticks_per_second = (1.0 / cli.delta).ceil() as u32;
    println!("Running {} ticks per second (simulated time)", ticks_per_second);
    println!();

    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.step(cli.delta);
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            world.time()
        );
        world.print_summary();
        println!();
    }

    println!("=== Final State ===");
    world.print_summary();

    Ok(())
}
