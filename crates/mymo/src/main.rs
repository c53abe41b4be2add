use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = mymo::cli::Cli::parse();
    mymo::init(mymo::infra::logging::level_for(cli.verbose, cli.quiet));

    cli.run()
}
