//! Rendering machinery shared by every statement.
//!
//! - `strategy`: placeholder formats per execution target
//! - `alias`: table alias resolution per scope
//! - `context`: the per-statement render session and parameter sequence
//! - `criterion`: the predicate tree renderer

mod alias;
mod context;
mod criterion;
mod strategy;


pub use alias::TableAliasCalculator;
pub use context::{AliasMode, RenderingContext};
pub use criterion::CriterionRenderer;
pub use strategy::{
    DEFAULT_PARAMETER_PREFIX, MapperRenderingStrategy, NamedParameterRenderingStrategy,
    ParameterKey, PositionalRenderingStrategy, RenderingStrategy,
};
