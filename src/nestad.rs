extern crate clap;
use clap::*;

mod cmd_nestad;

fn main() -> anyhow::Result<()> {
    let app = Command::new("nestad")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`nestad` - Nested TADs from insulation boundaries")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase verbosity (specify multiple times for more)"),
        )
        .subcommand(cmd_nestad::boundary2tad::make_subcommand())
        .after_help(
            r###"Subcommands:

* boundary2tad - Assemble nested TADs from boundary and insulation tables

Logging:
    -v for progress, -vv for every anchor and TAD; RUST_LOG overrides both

"###,
        );

    let matches = app.get_matches();

    let verbose = match matches.subcommand() {
        Some((_, sub_matches)) => sub_matches.get_count("verbose"),
        None => matches.get_count("verbose"),
    };
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    // Check which subcomamnd the user ran...
    match matches.subcommand() {
        Some(("boundary2tad", sub_matches)) => cmd_nestad::boundary2tad::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
