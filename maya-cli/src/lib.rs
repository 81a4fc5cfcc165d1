use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use maya::{Fault, MayaVm};
use mayafile::ImageError;
use mayasm::{AsmError, LinkError};

#[derive(Debug)]
pub enum Error {
    Asm(AsmError),
    Link(LinkError),
    Image(ImageError),
    Io(std::io::Error, PathBuf),
    Fault(Fault),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Asm(err) => {
                writeln!(f, "assembling input failed:")?;
                write!(f, "{}", err)
            }
            Error::Link(err) => write!(f, "linking failed: {}", err),
            Error::Image(err) => write!(f, "{}", err),
            Error::Io(err, path) => {
                write!(f, "accessing \"{}\" failed: {}", path.display(), err)
            }
            Error::Fault(fault) => write!(f, "{}", fault),
        }
    }
}

impl std::error::Error for Error {}

/// Assembles and links `input`, returning the path of the linked
/// image. Without an explicit `output`, the image lands in the current
/// directory, named after the input file.
pub fn assemble_file(input: &Path, output: Option<&Path>) -> Result<PathBuf, Error> {
    let file = File::open(input).map_err(|err| Error::Io(err, input.to_owned()))?;
    let mut source = String::new();
    BufReader::new(file)
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, input.to_owned()))?;

    let (image, mut env) = mayasm::assemble(&source).map_err(|err| {
        Error::Asm(match input.to_str() {
            Some(path_str) => err.with_path(path_str),
            None => err,
        })
    })?;

    let output_path = match output {
        Some(path) => path.to_owned(),
        None => default_output_path(input),
    };

    mayafile::write_file(&output_path, &image)
        .map_err(|err| Error::Io(err, output_path.clone()))?;
    mayasm::linker::link_file(&mut env, &output_path).map_err(Error::Link)?;

    Ok(output_path)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| std::ffi::OsString::from("out"));
    PathBuf::from(stem).with_extension("maya")
}

/// Loads a linked image into a fresh machine: copies the program,
/// interns the string arena, and resolves the reference natives.
pub fn load_image(path: &Path) -> Result<MayaVm, Error> {
    let image = mayafile::read_file(path).map_err(Error::Image)?;
    let (starting_rip, instructions, literals) = image.into_parts();

    let mut vm = MayaVm::new(instructions, starting_rip);
    let slices: Vec<(u64, &[u8])> = literals
        .iter()
        .map(|literal| (literal.rip, &literal.bytes[..]))
        .collect();
    vm.intern_literals(&slices[..]).map_err(Error::Fault)?;

    Ok(vm)
}

/// Loads and runs a linked image, returning the halted machine.
pub fn run_file(path: &Path) -> Result<MayaVm, Error> {
    let mut vm = load_image(path)?;
    vm.run().map_err(Error::Fault)?;
    Ok(vm)
}

/// Renders an image back as one mnemonic line per instruction.
pub fn disassemble_file(path: &Path) -> Result<String, Error> {
    let image = mayafile::read_file(path).map_err(Error::Image)?;

    let mut out = String::new();
    out.push_str(&format!("starting rip: {}\n", image.starting_rip()));
    out.push_str(&format!(
        "instructions length: {}\n\n",
        image.instructions().len()
    ));
    for instruction in image.instructions() {
        out.push_str(&format!("{}\n", instruction));
    }

    Ok(out)
}
