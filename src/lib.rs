// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Depth-cued 2-D line drawings of molecular trajectories.
//!
//! flatmol draws proteins, nucleic acids, and ligands as flat colored line
//! segments. Depth is suggested by painter's-algorithm ordering, fading,
//! and a proximity shadow instead of a 3-D rasterizer.
//!
//! # Key entry points
//!
//! - [`Viewer`] - one independent viewer: objects, playback, camera, and
//!   the current drawing
//! - [`ViewerCommand`] - the tagged union of updates a host or producer
//!   sends
//! - [`trajectory::TrajectoryStore`] - named objects and their frames
//! - [`options::Options`] - runtime configuration with TOML presets
//! - [`session::SessionDocument`] - saved sessions
//!
//! # Pipeline
//!
//! A frame update is validated and appended to its object; the first frame
//! fixes the object's best view ([`geometry::best_view`]) and later frames
//! are superimposed onto it ([`geometry::superpose`]). Each redraw builds
//! segments for the displayed frame ([`segments::SegmentBuilder`]),
//! resolves their colors ([`color::resolve_colors`]), and strokes them far
//! to near with depth cueing ([`render::DepthCompositor`]) onto a
//! [`render::Surface`].
//!
//! ```
//! use flatmol::trajectory::FramePayload;
//! use flatmol::Viewer;
//!
//! let mut viewer = Viewer::default();
//! let payload = FramePayload {
//!     coordinates: vec![[0.0, 0.0, 0.0], [3.8, 0.0, 0.0], [5.0, 3.5, 0.0]],
//!     ..FramePayload::default()
//! };
//! viewer.append_frame("A", payload, true).unwrap();
//! assert_eq!(viewer.segments().len(), 2);
//! let svg = viewer.to_svg();
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod camera;
pub mod capture;
pub mod color;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod options;
pub mod playback;
pub mod registry;
pub mod render;
pub mod segments;
pub mod session;
pub mod trajectory;

pub use engine::{Viewer, ViewerCommand};
pub use error::FlatmolError;
