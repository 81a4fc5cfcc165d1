#[macro_use]
extern crate clap;

use clap::{Arg, ArgGroup};
use std::path::Path;

fn main() {
    let matches = clap::App::new("maya")
        .version(crate_version!())
        .about("Assembles, executes and disassembles maya programs.")
        .arg(
            Arg::with_name("assemble")
                .short("a")
                .long("assemble")
                .takes_value(true)
                .value_name("INPUT")
                .help("Assembles and links a .masm file"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .requires("assemble")
                .help("Overrides the output path for -a"),
        )
        .arg(
            Arg::with_name("execute")
                .short("e")
                .long("execute")
                .takes_value(true)
                .multiple(true)
                .value_name("INPUT")
                .help("Loads and executes each image in order"),
        )
        .arg(
            Arg::with_name("disassemble")
                .short("d")
                .long("disassemble")
                .takes_value(true)
                .value_name("INPUT")
                .help("Disassembles an image"),
        )
        .group(
            ArgGroup::with_name("mode")
                .args(&["assemble", "execute", "disassemble"])
                .required(true),
        )
        .get_matches();

    if let Err(err) = maya_main(&matches) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

fn maya_main(matches: &clap::ArgMatches) -> Result<(), maya_cli::Error> {
    if let Some(input) = matches.value_of("assemble") {
        let output = matches.value_of("output").map(Path::new);
        maya_cli::assemble_file(Path::new(input), output)?;
        return Ok(());
    }

    if let Some(inputs) = matches.values_of("execute") {
        for input in inputs {
            maya_cli::run_file(Path::new(input))?;
            println!("Exit code: OK");
        }
        return Ok(());
    }

    if let Some(input) = matches.value_of("disassemble") {
        print!("{}", maya_cli::disassemble_file(Path::new(input))?);
        return Ok(());
    }

    unreachable!()
}
