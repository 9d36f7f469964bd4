//! Individual transformation stages
//!
//! Each stage implements [Runnable](crate::rnc::transforms::Runnable) and can be chained
//! into a [Transform](crate::rnc::transforms::Transform).

pub mod passes;
pub mod serialization;
pub mod tokenization;

pub use passes::{MatchPairs, NestDefines, ScanNamespaces, TypeBodies};
pub use serialization::SerializeXml;
pub use tokenization::CoreTokenization;
