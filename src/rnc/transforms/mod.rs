//! Transform pipeline infrastructure
//!
//! The compiler is a chain of stages, each consuming the output of the previous one.
//! Stages are values implementing [Runnable]; any two stages can be chained if their
//! types line up, producing a [Transform]:
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(Ok)
//!     .then(CoreTokenization::new())   // String → TokenStream
//!     .then(MatchPairs::new())         // TokenStream → Vec<Node>
//!     .then(TypeBodies::new());        // Vec<Node> → Vec<Node>
//! ```
//!
//! The standard pipelines are built once as `once_cell::sync::Lazy` statics, see
//! [standard]. Individual stages live in [stages] and can be run on their own, which is
//! how the CLI dumps the tree after a given pass.
//!
//! Transforms hold no per-run state: every run creates its own compiler state, so a
//! shared pipeline can be used from several threads at once.

pub mod stages;
pub mod standard;

use crate::rnc::error::CompileError;

/// Trait for anything that can transform an input to an output
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, CompileError>;
}

/// A composable transformation pipeline from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, CompileError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, CompileError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage after this transform.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a static transform (typically one of the [standard] pipelines).
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, CompileError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, CompileError> {
        Transform::run(self, input)
    }
}
