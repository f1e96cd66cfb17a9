//! Material data tables
//!
//! Pure data: steel section and grade tables, timber strength classes,
//! masonry parameter tables, partial factors and modification factors.

pub mod masonry;
pub mod steel;
pub mod timber;

pub use masonry::{masonry_type, MasonryType};
pub use steel::{steel_section, ProfileFamily, SteelSection};
pub use timber::{timber_class, LoadDuration, ServiceClass, TimberCategory, TimberClass};
