pub mod boundary;
pub mod densify;
pub mod error;
pub mod header;
pub mod insulation;
pub mod io;
pub mod matrix;
pub mod tad;
pub mod track;
