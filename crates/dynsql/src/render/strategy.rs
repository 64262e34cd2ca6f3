//! Placeholder formatting per execution target.

use crate::column::SqlColumn;
use std::fmt;

/// Prefix the mapper strategy puts in front of parameter keys by default.
pub const DEFAULT_PARAMETER_PREFIX: &str = "parameters";

/// A parameter key handed out by a rendering context.
///
/// `index` is the 1-based position in the statement's parameter sequence, `name`
/// is the key under which the value is stored in the parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterKey {
    index: usize,
    name: String,
}

impl ParameterKey {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Formats parameter placeholders for one execution target.
pub trait RenderingStrategy: fmt::Debug + Send + Sync {
    /// Map key for the `index`-th parameter of a statement.
    fn format_parameter_map_key(&self, index: usize) -> String {
        format!("p{index}")
    }

    /// Prefix used when the statement does not choose one.
    fn default_parameter_prefix(&self) -> &str {
        DEFAULT_PARAMETER_PREFIX
    }

    /// Placeholder for a parameter with no column metadata.
    fn format_placeholder(&self, prefix: &str, key: &ParameterKey) -> String;

    /// Placeholder for a parameter compared against or assigned to `column`.
    fn format_placeholder_for_column(
        &self,
        column: &SqlColumn,
        prefix: &str,
        key: &ParameterKey,
    ) -> String {
        let _ = column;
        self.format_placeholder(prefix, key)
    }
}

fn qualified_key(prefix: &str, key: &ParameterKey) -> String {
    if prefix.is_empty() {
        key.name().to_string()
    } else {
        format!("{prefix}.{}", key.name())
    }
}

/// `#{parameters.p1,jdbcType=INTEGER,typeHandler=...}` placeholders for mapper frameworks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapperRenderingStrategy;

impl RenderingStrategy for MapperRenderingStrategy {
    fn format_placeholder(&self, prefix: &str, key: &ParameterKey) -> String {
        format!("#{{{}}}", qualified_key(prefix, key))
    }

    fn format_placeholder_for_column(
        &self,
        column: &SqlColumn,
        prefix: &str,
        key: &ParameterKey,
    ) -> String {
        let mut placeholder = format!("#{{{}", qualified_key(prefix, key));
        if let Some(type_tag) = column.type_tag() {
            placeholder.push_str(",jdbcType=");
            placeholder.push_str(type_tag);
        }
        if let Some(handler) = column.type_handler() {
            placeholder.push_str(",typeHandler=");
            placeholder.push_str(handler);
        }
        placeholder.push('}');
        placeholder
    }
}

/// `:p1` (or `:prefix.p1`) placeholders for named-parameter frameworks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedParameterRenderingStrategy;

impl RenderingStrategy for NamedParameterRenderingStrategy {
    fn default_parameter_prefix(&self) -> &str {
        ""
    }

    fn format_placeholder(&self, prefix: &str, key: &ParameterKey) -> String {
        format!(":{}", qualified_key(prefix, key))
    }
}

/// `$1, $2, ...` placeholders for positional drivers such as `tokio-postgres`.
///
/// Statements render left to right, so placeholder order matches the order of the
/// parameter map and [`RenderedStatement::into_positional`](crate::RenderedStatement::into_positional)
/// yields the bind list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalRenderingStrategy;

impl RenderingStrategy for PositionalRenderingStrategy {
    fn default_parameter_prefix(&self) -> &str {
        ""
    }

    fn format_placeholder(&self, _prefix: &str, key: &ParameterKey) -> String {
        format!("${}", key.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SqlTable;

    #[test]
    fn test_mapper_placeholders() {
        let key = ParameterKey::new(3, "p3");
        let strategy = MapperRenderingStrategy;
        assert_eq!(strategy.format_placeholder("parameters", &key), "#{parameters.p3}");
        assert_eq!(strategy.format_placeholder("", &key), "#{p3}");

        let table = SqlTable::new("person");
        let id = table.column("id").with_type_tag("INTEGER");
        assert_eq!(
            strategy.format_placeholder_for_column(&id, "parameters", &key),
            "#{parameters.p3,jdbcType=INTEGER}"
        );
        let handled = id.with_type_handler("example.YesNoHandler");
        assert_eq!(
            strategy.format_placeholder_for_column(&handled, "row", &key),
            "#{row.p3,jdbcType=INTEGER,typeHandler=example.YesNoHandler}"
        );
        let untyped = table.column("name");
        assert_eq!(
            strategy.format_placeholder_for_column(&untyped, "parameters", &key),
            "#{parameters.p3}"
        );
    }

    #[test]
    fn test_named_placeholders() {
        let key = ParameterKey::new(1, "p1");
        let strategy = NamedParameterRenderingStrategy;
        assert_eq!(strategy.format_placeholder("", &key), ":p1");
        assert_eq!(strategy.format_placeholder("row", &key), ":row.p1");
        let table = SqlTable::new("person");
        let id = table.column("id").with_type_tag("INTEGER");
        assert_eq!(strategy.format_placeholder_for_column(&id, "", &key), ":p1");
    }

    #[test]
    fn test_positional_placeholders() {
        let strategy = PositionalRenderingStrategy;
        assert_eq!(strategy.format_placeholder("", &ParameterKey::new(12, "p12")), "$12");
    }
}
