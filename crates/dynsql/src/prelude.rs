//! Convenient imports for typical `dynsql` usage.
//!
//! ```ignore
//! use dynsql::prelude::*;
//! ```

pub use crate::dsl::*;
pub use crate::{
    BasicColumn, Condition, Criterion, EmptyListPolicy, MapperRenderingStrategy, MappingSupport,
    NamedParameterRenderingStrategy, PositionalRenderingStrategy, RenderError, RenderResult,
    RenderStatement, RenderedStatement, SqlColumn, SqlTable, Value, WhereSupport,
};
