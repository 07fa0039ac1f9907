use clap::Parser;
use xtaskops::{ops::cmd, tasks};

const CRATE: &str = "probsearch";

#[derive(Debug, clap::Parser)]
enum Args {
    Coverage{
        /// Generate html report
        #[clap(short, long)]
        dev_mode: bool
    },
    Ci,
    /// Runs the end-to-end search scenarios with debug logging enabled
    Scenarios,
    BloatDeps{
        #[clap(default_value = CRATE)]
        package: String
    },
    Docs,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    match args {
        Args::Coverage{dev_mode} => tasks::coverage(dev_mode),
        Args::Ci                 => tasks::ci(),
        Args::Scenarios          => {
            cmd!("cargo", "test", "-p", CRATE, "--test", "scenarios", "--", "--nocapture")
                .env("RUST_LOG", "probsearch=debug")
                .run()?;
            Ok(())
        },
        Args::BloatDeps{package} => tasks::bloat_deps(&package),
        Args::Docs               => tasks::docs(),
    }
}
