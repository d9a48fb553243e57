use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use molfile::{json, Molecule};

mod output;

#[derive(Parser, Debug)]
#[command(version, about = "Convert mol files to json", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: MolCommand,

    /// Log more, repeat for even more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum MolCommand {
    /// Decode a mol file and write it as json
    #[command(name = "convert")]
    Convert {
        /// The mol file to read
        #[arg(long, short, default_value = "data/tmp.mol")]
        input: PathBuf,
        /// Where to write the json, `-` writes to stdout
        #[arg(long, short, default_value = "data/molecule.json")]
        output: PathBuf,
        /// Write the json on a single line instead of pretty printing it
        #[arg(long)]
        compact: bool,
    },
    /// Print a summary of a mol file, or of a json file written by `convert`
    #[command(name = "show")]
    Show {
        /// Files ending in `.json` are loaded as json, anything else is decoded as a mol file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args: Args = Args::parse();
    init_logging(&args);

    match args.command {
        MolCommand::Convert {
            input,
            output,
            compact,
        } => {
            let molecule = load_mol(&input)?;
            log::info!(
                "decoded {} atoms and {} bonds from {}",
                molecule.atoms().len(),
                molecule.bonds().len(),
                input.display()
            );

            let mut json = if compact {
                json::to_json_compact(&molecule)
            } else {
                json::to_json(&molecule)
            }
            .context("failed to serialize molecule")?;
            json.push('\n');

            if output.as_os_str() == "-" {
                io::stdout()
                    .lock()
                    .write_all(json.as_bytes())
                    .context("failed to write json to stdout")?;
            } else {
                output::write_atomically(&output, json.as_bytes())
                    .with_context(|| format!("failed to write {}", output.display()))?;
                log::info!("wrote {}", output.display());
            }
        }

        MolCommand::Show { path } => {
            let molecule = if path.extension().is_some_and(|extension| extension == "json") {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                json::from_json(&text)
                    .with_context(|| format!("failed to load json from {}", path.display()))?
            } else {
                load_mol(&path)?
            };

            print_summary(&molecule);
        }
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let level = match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level).parse_default_env().init();
}

fn load_mol(path: &Path) -> Result<Molecule> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    molfile::decode(&bytes).with_context(|| format!("failed to decode {}", path.display()))
}

fn print_summary(molecule: &Molecule) {
    print!("{molecule}");
    println!("Bond count: {}", molecule.bond_count);

    if !molecule.is_complete() {
        println!(
            "warning: file declares {} atoms and {} bonds but only {} and {} are present",
            molecule.atom_count,
            molecule.bond_count,
            molecule.atoms().len(),
            molecule.bonds().len()
        );
    }

    println!("formula: {}", molecule.formula());
    if let Some(centroid) = molecule.centroid() {
        println!(
            "centroid: ({:.4}, {:.4}, {:.4})",
            centroid.x, centroid.y, centroid.z
        );
    }

    for (bond, a, b) in molecule.resolved_bonds() {
        println!(
            "{}{}-{}{}\t{:?}\t{:.4}",
            a.element,
            bond.atom1,
            b.element,
            bond.atom2,
            bond.order(),
            a.distance_to(b)
        );
    }
}
