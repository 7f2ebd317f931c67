//! Low-level building blocks for custom scanning pipelines.
//!
//! Most users should prefer `IconLocator`; these expose the template plan,
//! the kernels and the tiling helpers directly.

pub use crate::kernel::scalar::{NccScalar, NccTwoPass};
pub use crate::kernel::{placement_range, Kernel, ScanParams};
pub use crate::search::tile::{tile_placements, Tile};
pub use crate::template::{TemplatePlan, NCC_EPSILON};
