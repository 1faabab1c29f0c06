pub mod allow_list;
pub mod cell;

pub use allow_list::{AllowListFile, AllowListSource};
pub use cell::{Cell, CellLock, CellSnapshot, Registrar};
