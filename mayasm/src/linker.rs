//! Patches deferred symbolic operands into an assembled image.
//!
//! Every deferred reference is resolved against the label table first,
//! the macro table second, and the native import list last. The
//! deferred table is drained on success, so linking a fully linked
//! image again is a no-op and the on-disk rewrite is idempotent.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use maya::{natives, Cell};
use mayafile::{Image, ImageError};

use crate::env::AsmEnv;

#[derive(Debug)]
pub enum LinkError {
    Unresolved { symbol: String, line: usize },
    Duplicate { symbol: String },
    Image(ImageError),
    Io(io::Error),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinkError::Unresolved { symbol, line } => {
                write!(f, "no such label '{}' (line {})", symbol, line)
            }
            LinkError::Duplicate { symbol } => {
                write!(f, "duplicate label and macro name '{}'", symbol)
            }
            LinkError::Image(err) => write!(f, "{}", err),
            LinkError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl Error for LinkError {}

impl From<ImageError> for LinkError {
    fn from(err: ImageError) -> LinkError {
        LinkError::Image(err)
    }
}

impl From<io::Error> for LinkError {
    fn from(err: io::Error) -> LinkError {
        LinkError::Io(err)
    }
}

/// Resolves and patches every deferred reference in `image`, draining
/// the deferred table.
pub fn link(env: &mut AsmEnv, image: &mut Image) -> Result<(), LinkError> {
    // The assembler already rejects collisions; re-check here so a
    // hand-built environment cannot smuggle one past the search order.
    for name in env.labels.keys() {
        if env.macros.contains_key(name) {
            return Err(LinkError::Duplicate {
                symbol: name.clone(),
            });
        }
    }

    for deferred in &env.deferred {
        let cell = if let Some(rip) = env.labels.get(&deferred.symbol) {
            Cell::from_u64(*rip)
        } else if let Some(cell) = env.macros.get(&deferred.symbol) {
            *cell
        } else if let Some(index) = natives::import_index(&deferred.symbol) {
            Cell::from_u64(index)
        } else {
            return Err(LinkError::Unresolved {
                symbol: deferred.symbol.clone(),
                line: deferred.line,
            });
        };

        let slot = image
            .instructions_mut()
            .get_mut(deferred.rip as usize)
            .ok_or(LinkError::Image(ImageError::Truncated))?;
        slot.operand = cell;
    }

    env.deferred.clear();
    Ok(())
}

/// Reads the image at `path`, links it, and rewrites it in place. The
/// string-literal appendix is carried through verbatim.
pub fn link_file<P: AsRef<Path>>(env: &mut AsmEnv, path: P) -> Result<(), LinkError> {
    let mut image = mayafile::read_file(&path)?;
    link(env, &mut image)?;
    mayafile::write_file(&path, &image)?;
    Ok(())
}
