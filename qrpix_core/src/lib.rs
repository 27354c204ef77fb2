mod matrix;
mod meta;

pub use matrix::{Module, ModuleMatrix};
pub use meta::{Ecl, InvalidLevel, Mode, SymbolVersion};
