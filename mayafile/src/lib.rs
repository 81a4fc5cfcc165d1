//! The `.maya` program-image format.
//!
//! An image is a header (`MAYA` magic, starting rip, program size),
//! a vector of 16-byte instruction records, and an optional appendix
//! of string literals. Every literal record is the literal's bytes, a
//! NUL terminator, and the rip of the instruction whose operand must
//! be patched with the literal's address at load time. All integers
//! are little-endian.

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use maya::{Cell, Instruction};
use util::Endian;

pub const MAGIC: [u8; 4] = *b"MAYA";

#[derive(Clone, Debug, PartialEq)]
pub struct StringLiteral {
    pub rip: u64,
    pub bytes: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub struct Image {
    starting_rip: u64,
    instructions: Vec<Instruction>,
    literals: Vec<StringLiteral>,
}

impl Image {
    pub fn from(
        starting_rip: u64,
        instructions: Vec<Instruction>,
        literals: Vec<StringLiteral>,
    ) -> Image {
        Image {
            starting_rip,
            instructions,
            literals,
        }
    }

    pub fn starting_rip(&self) -> u64 {
        self.starting_rip
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions[..]
    }

    pub fn instructions_mut(&mut self) -> &mut [Instruction] {
        &mut self.instructions[..]
    }

    pub fn literals(&self) -> &[StringLiteral] {
        &self.literals[..]
    }

    pub fn into_parts(self) -> (u64, Vec<Instruction>, Vec<StringLiteral>) {
        (self.starting_rip, self.instructions, self.literals)
    }
}

#[derive(Debug)]
pub enum ImageError {
    Io(io::Error),
    BadMagic,
    Truncated,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageError::Io(err) => write!(f, "reading image failed: {}", err),
            ImageError::BadMagic => f.write_str("BAD MAGIC"),
            ImageError::Truncated => f.write_str("TRUNCATED IMAGE"),
        }
    }
}

impl Error for ImageError {}

impl From<io::Error> for ImageError {
    fn from(err: io::Error) -> ImageError {
        // A short read anywhere in the image means the file ends in
        // the middle of a record.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ImageError::Truncated
        } else {
            ImageError::Io(err)
        }
    }
}

pub fn read<R: Read>(reader: &mut R) -> Result<Image, ImageError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ImageError::BadMagic);
    }

    let mut padding = [0u8; 4];
    reader.read_exact(&mut padding)?;

    let starting_rip = reader.read_u64::<Endian>()?;
    let program_size = reader.read_u64::<Endian>()?;

    let mut instructions = Vec::new();
    for _ in 0..program_size {
        let opcode = reader.read_u32::<Endian>()?;
        let _padding = reader.read_u32::<Endian>()?;
        let operand = reader.read_u64::<Endian>()?;
        instructions.push(Instruction {
            opcode,
            operand: Cell::from_bits(operand),
        });
    }

    let mut appendix = Vec::new();
    reader.read_to_end(&mut appendix)?;
    let literals = parse_literals(&appendix[..], program_size)?;

    Ok(Image::from(starting_rip, instructions, literals))
}

fn parse_literals(mut rest: &[u8], program_size: u64) -> Result<Vec<StringLiteral>, ImageError> {
    let mut literals = Vec::new();

    while !rest.is_empty() {
        let nul = rest
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(ImageError::Truncated)?;
        let bytes = rest[..nul].to_vec();
        let tail = &rest[nul + 1..];

        if tail.len() < 8 {
            return Err(ImageError::Truncated);
        }
        let rip = Endian::read_u64(&tail[..8]);
        if rip >= program_size {
            return Err(ImageError::Truncated);
        }

        literals.push(StringLiteral { rip, bytes });
        rest = &tail[8..];
    }

    Ok(literals)
}

pub fn write<W: Write>(writer: &mut W, image: &Image) -> io::Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[0u8; 4])?;
    writer.write_u64::<Endian>(image.starting_rip)?;
    writer.write_u64::<Endian>(image.instructions.len() as u64)?;

    for instruction in &image.instructions {
        writer.write_u32::<Endian>(instruction.opcode)?;
        writer.write_u32::<Endian>(0)?;
        writer.write_u64::<Endian>(instruction.operand.to_bits())?;
    }

    for literal in &image.literals {
        writer.write_all(&literal.bytes[..])?;
        writer.write_all(&[0u8])?;
        writer.write_u64::<Endian>(literal.rip)?;
    }

    Ok(())
}

pub trait ReadImageExt: Read + Sized {
    fn read_image(&mut self) -> Result<Image, ImageError> {
        read(self)
    }
}

impl<R: Read + Sized> ReadImageExt for R {}

pub trait WriteImageExt: Write + Sized {
    fn write_image(&mut self, image: &Image) -> io::Result<()> {
        write(self, image)
    }
}

impl<W: Write + Sized> WriteImageExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Image, ImageError> {
    BufReader::new(File::open(path)?).read_image()
}

pub fn write_file<P: AsRef<Path>>(path: P, image: &Image) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_image(image)?;
    writer.flush()
}
