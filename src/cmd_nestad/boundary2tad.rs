use clap::*;
use nestad::libs::boundary::BoundarySet;
use nestad::libs::densify::densify;
use nestad::libs::insulation::InsulationProfile;
use nestad::libs::io::{check_file, gz_writer, job_name, writer};
use nestad::libs::tad::TadCaller;
use nestad::libs::track::{track_records, write_track};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("boundary2tad")
        .about("Assemble nested TADs from boundary and insulation tables")
        .after_help(
            r###"
Greedily takes the strongest remaining boundary as an anchor and pairs it with
the nearest still-available boundaries on each side. A pair becomes a TAD when
its insulation span has less than --max-na-fraction NA bins and no NA run of
--max-na-run bins or longer.

Notes:
* Inputs are tab-separated, optionally gzipped; `#` lines are skipped.
* Boundary columns: header, boundaryHeader, start, end and either
  boundaryInsulation (negated and shifted to >= 0) or boundaryStrength (as is).
* Insulation columns: header, insulationScore (NA for missing bins).
* Boundary chromosomes must come in contiguous blocks.

Outputs:
* <job>__nested-tads.bed        UCSC track, one row per TAD
* <job>__nested-tads.matrix.gz  bin x bin matrix of summed TAD strengths

Examples:
1. Default noise threshold:
   nestad boundary2tad -b N2.boundaries.gz -i N2.insulation.gz

2. Looser noise band, outputs in results/:
   nestad boundary2tad -b N2.boundaries -i N2.insulation -n 0.5 -o results
"###,
        )
        .arg(
            Arg::new("boundary")
                .long("boundary")
                .short('b')
                .required(true)
                .num_args(1)
                .help("Boundary input file"),
        )
        .arg(
            Arg::new("insulation")
                .long("insulation")
                .short('i')
                .required(true)
                .num_args(1)
                .help("Insulation input file"),
        )
        .arg(
            Arg::new("noise")
                .long("noise")
                .short('n')
                .num_args(1)
                .default_value("0.25")
                .value_parser(value_parser!(f64))
                .help("Noise threshold of boundary strength"),
        )
        .arg(
            Arg::new("max_na_fraction")
                .long("max-na-fraction")
                .num_args(1)
                .default_value("0.25")
                .value_parser(value_parser!(f64))
                .help("Reject TADs whose NA fraction reaches this"),
        )
        .arg(
            Arg::new("max_na_run")
                .long("max-na-run")
                .num_args(1)
                .default_value("10")
                .value_parser(value_parser!(usize))
                .help("Reject TADs whose longest NA run reaches this"),
        )
        .arg(
            Arg::new("job_name")
                .long("job-name")
                .num_args(1)
                .help("Prefix of output files. Default is derived from the boundary file"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('o')
                .num_args(1)
                .default_value(".")
                .help("Output directory"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let boundary_file = args.get_one::<String>("boundary").unwrap();
    let insulation_file = args.get_one::<String>("insulation").unwrap();
    let outdir = args.get_one::<String>("outdir").unwrap();

    let caller = TadCaller {
        noise: *args.get_one::<f64>("noise").unwrap(),
        max_na_fraction: *args.get_one::<f64>("max_na_fraction").unwrap(),
        max_na_run: *args.get_one::<usize>("max_na_run").unwrap(),
    };

    check_file(boundary_file)?;
    check_file(insulation_file)?;

    let job = match args.get_one::<String>("job_name") {
        Some(name) => name.to_string(),
        None => job_name(boundary_file),
    };
    log::info!("job name {}", job);

    //----------------------------
    // Loading
    //----------------------------
    let mut boundaries = BoundarySet::from_file(boundary_file)?;
    let profile = InsulationProfile::from_file(insulation_file)?;

    //----------------------------
    // Assembling
    //----------------------------
    let tads = caller.assemble(&mut boundaries, &profile)?;
    let records = track_records(&tads)?;
    let matrix = densify(&tads, &profile)?;

    //----------------------------
    // Output
    //----------------------------
    std::fs::create_dir_all(outdir)?;
    let name = format!("{}__nested-tads", job);
    let prefix = std::path::Path::new(outdir).join(&name);
    let prefix = prefix.to_string_lossy();

    let bed_file = format!("{}.bed", prefix);
    {
        let mut bed = writer(&bed_file)?;
        write_track(&mut bed, &name, &records)?;
        bed.flush()?;
    }
    log::info!("wrote {} TADs to {}", records.len(), bed_file);

    let matrix_file = format!("{}.matrix.gz", prefix);
    {
        let mut gz = gz_writer(&matrix_file)?;
        matrix.write_to(&mut gz, 4)?;
        gz.finish()?.flush()?;
    }
    log::info!(
        "wrote {}x{} matrix to {}",
        matrix.rows().len(),
        matrix.cols().len(),
        matrix_file
    );

    Ok(())
}
