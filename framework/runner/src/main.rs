use clap::Parser;
use latency_bench_runner::prelude::*;

fn main() -> BenchResult<()> {
    env_logger::init();

    let cli = Cli::parse();
    run(cli)
}
