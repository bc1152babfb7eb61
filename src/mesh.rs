pub mod facet;
pub mod visibility;

pub use facet::{Facet, FacetTable};
pub use visibility::VisibilityGraph;
