//! # rnc2rng
//!
//! A compiler from RELAX NG compact syntax to the RELAX NG XML syntax.
//!
//! ```rust,ignore
//! let xml = rnc2rng::rnc::compile("element foo { text }")?;
//! ```
//!
//! The compiler lexes the source, builds a schema tree in four passes and serializes it.
//! See [rnc] for the module layout and [rnc::transforms::standard] for the pipelines.

pub mod rnc;
