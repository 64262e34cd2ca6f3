//! # dynsql
//!
//! Typed construction and deterministic rendering of dynamic SQL.
//!
//! ## Features
//!
//! - **Predicate trees**: criteria with `and`/`or` connectors, groups, `not` and `exists`,
//!   nested to any depth
//! - **Self-eliding conditions**: `when_present()` and `when(..)` drop a criterion (and
//!   everything nested under it) at render time
//! - **Pluggable placeholders**: `#{parameters.p1,jdbcType=..}`, `:p1` or `$1`, chosen per
//!   statement and overridable per column
//! - **One parameter sequence per statement**: sub-selects, joins and CASE expressions share
//!   it, so parameter keys never collide
//! - **Safe defaults**: a WHERE clause that elides completely is an error unless the
//!   statement allows it
//!
//! ## Example
//!
//! ```ignore
//! use dynsql::prelude::*;
//!
//! let person = SqlTable::new("person");
//! let id = person.column("id").with_type_tag("INTEGER");
//! let name = person.column("first_name").with_type_tag("VARCHAR");
//! let last = person.column("last_name").with_type_tag("VARCHAR");
//!
//! let model = select([&id, &name])
//!     .from(&person)
//!     .where_(&id, Condition::is_equal_to(3))
//!     .and(&name, Condition::is_equal_to_when_present(Some("Fred")))
//!     .and(&last, Condition::is_equal_to_when_present(None::<&str>))
//!     .build()?;
//!
//! let rendered = model.render(MapperRenderingStrategy)?;
//! assert_eq!(
//!     rendered.statement(),
//!     "select id, first_name from person \
//!      where id = #{parameters.p1,jdbcType=INTEGER} and first_name = #{parameters.p2,jdbcType=VARCHAR}"
//! );
//! ```

pub mod case;
pub mod column;
pub mod condition;
pub mod config;
pub mod criterion;
pub mod dsl;
pub mod error;
pub mod fragment;
pub mod function;
pub mod mapping;
pub mod prelude;
pub mod render;
pub mod statement;
pub mod table;
pub mod value;

pub use case::{CaseExpression, SearchedCaseBuilder, SimpleCaseBuilder};
pub use column::{BasicColumn, SortSpecification, SqlColumn};
pub use condition::{Condition, EmptyListPolicy, EmptyListTarget, RenderWhen};
pub use config::{GlobalConfiguration, StatementConfiguration};
pub use criterion::{Connector, Criterion, Predicate, WhereModel};
pub use error::{ClauseKind, RenderError, RenderResult, StatementKind};
pub use fragment::{FragmentAndParameters, FragmentCollector, Parameters};
pub use function::{Aggregate, Function};
pub use mapping::{
    ColumnMapping, ColumnMappingVisitor, FieldAndValue, InsertMappingVisitor, MappingKind,
    UpdateMappingVisitor,
};
pub use render::{
    AliasMode, CriterionRenderer, MapperRenderingStrategy, NamedParameterRenderingStrategy,
    PositionalRenderingStrategy, RenderingContext, RenderingStrategy, TableAliasCalculator,
};
pub use statement::{
    DeleteBuilder, DeleteModel, InsertBuilder, InsertModel, InsertSelectBuilder,
    InsertSelectModel, JoinType, MappingSupport, RenderStatement, RenderedStatement,
    SelectBuilder, SelectModel, UpdateBuilder, UpdateModel, WhereSupport,
};
pub use table::{SqlTable, TableId};
pub use value::Value;
