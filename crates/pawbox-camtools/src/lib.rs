//! # PawBox CAM Tools
//!
//! Flat-pattern generation for laser-cut enclosures. Given outer box
//! dimensions and a material thickness, the generator lays the panels out in
//! a cross arrangement, cuts tab/slot joints into every mating edge, and
//! annotates the sheet with dimension lines and a legend.
//!
//! ## Tools Included
//!
//! - **Tabbed Box**: Layout, edge synthesis, annotation, and document assembly
//! - **Serialization**: SVG and DXF output of the assembled document

pub mod error;
pub mod tabbed_box;

pub use error::{CamToolError, CamToolResult};
pub use tabbed_box::document::{Document, Element, Layer, Panel, PathData, TextElement};
pub use tabbed_box::layout::{Layout, LayoutSettings, DEFAULT_MARGIN, DEFAULT_SPACING};
pub use tabbed_box::types::{BoxDimensions, BoxStyle, EdgeKind, PanelKind, Side};
pub use tabbed_box::{generate, FlatPatternGenerator, OutputFormat};
