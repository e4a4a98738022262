use clap::Parser;
use env_logger::Env;
use ply2web_cli::Args;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let code = ply2web_cli::run(args)?;
    std::process::exit(code)
}
