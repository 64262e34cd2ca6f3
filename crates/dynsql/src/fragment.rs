//! Rendered SQL fragments and their parameters.
//!
//! Every renderer returns a [`FragmentAndParameters`]; larger fragments are assembled
//! with a [`FragmentCollector`], which joins text and merges parameter maps. Parameter
//! keys come from the single sequence of a [`RenderingContext`](crate::render::RenderingContext),
//! so maps being merged never share a key.

use crate::value::Value;
use indexmap::IndexMap;

/// Parameter map of a rendered fragment, in rendering order.
pub type Parameters = IndexMap<String, Value>;

/// An immutable pair of SQL text and the parameters it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentAndParameters {
    fragment: String,
    parameters: Parameters,
}

impl FragmentAndParameters {
    /// A fragment without parameters.
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            parameters: Parameters::new(),
        }
    }

    /// Add one parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        insert_unique(&mut self.parameters, key.into(), value);
        self
    }

    /// Add every parameter of `parameters`.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        for (key, value) in parameters {
            insert_unique(&mut self.parameters, key, value);
        }
        self
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Rewrite the text, keeping the parameters.
    pub fn map_fragment(self, f: impl FnOnce(String) -> String) -> Self {
        Self {
            fragment: f(self.fragment),
            parameters: self.parameters,
        }
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.fragment, self.parameters)
    }
}

fn insert_unique(parameters: &mut Parameters, key: String, value: Value) {
    let previous = parameters.insert(key, value);
    debug_assert!(previous.is_none(), "parameter key rendered twice");
}

/// Accumulates fragments and their parameters.
#[derive(Debug, Clone, Default)]
pub struct FragmentCollector {
    fragments: Vec<String>,
    parameters: Parameters,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rendered fragment.
    pub fn add(&mut self, fragment: FragmentAndParameters) {
        let (text, parameters) = fragment.into_parts();
        self.fragments.push(text);
        for (key, value) in parameters {
            insert_unique(&mut self.parameters, key, value);
        }
    }

    /// Add text that carries no parameters.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.fragments.push(text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Join the collected fragments with `separator`.
    pub fn join(self, separator: &str) -> FragmentAndParameters {
        FragmentAndParameters {
            fragment: self.fragments.join(separator),
            parameters: self.parameters,
        }
    }

    /// Join with `separator` and wrap the result in `prefix` / `suffix`.
    pub fn join_wrapped(self, separator: &str, prefix: &str, suffix: &str) -> FragmentAndParameters {
        self.join(separator)
            .map_fragment(|f| format!("{prefix}{f}{suffix}"))
    }
}

impl FromIterator<FragmentAndParameters> for FragmentCollector {
    fn from_iter<I: IntoIterator<Item = FragmentAndParameters>>(iter: I) -> Self {
        let mut collector = Self::new();
        for fragment in iter {
            collector.add(fragment);
        }
        collector
    }
}

impl Extend<FragmentAndParameters> for FragmentCollector {
    fn extend<I: IntoIterator<Item = FragmentAndParameters>>(&mut self, iter: I) {
        for fragment in iter {
            self.add(fragment);
        }
    }
}

/// Render `value` as a single-quoted SQL string literal.
pub fn quote_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_join() {
        let mut collector = FragmentCollector::new();
        collector.add(FragmentAndParameters::new("a = #{p1}").with_parameter("p1", Value::Int(1)));
        collector.add_text("b is null");
        collector.add(FragmentAndParameters::new("c = #{p2}").with_parameter("p2", Value::from("x")));

        let joined = collector.join(" and ");
        assert_eq!(joined.fragment(), "a = #{p1} and b is null and c = #{p2}");
        let keys: Vec<&str> = joined.parameters().keys().map(String::as_str).collect();
        assert_eq!(keys, ["p1", "p2"]);
    }

    #[test]
    fn test_join_wrapped() {
        let collector: FragmentCollector =
            [FragmentAndParameters::new("a"), FragmentAndParameters::new("b")]
                .into_iter()
                .collect();
        assert_eq!(collector.join_wrapped(", ", "(", ")").fragment(), "(a, b)");
    }

    #[test]
    fn test_empty_collector() {
        let collector = FragmentCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.join(" ").fragment(), "");
    }

    #[test]
    fn test_quote_string_literal() {
        assert_eq!(quote_string_literal("Fred"), "'Fred'");
        assert_eq!(quote_string_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    #[should_panic(expected = "parameter key rendered twice")]
    #[cfg(debug_assertions)]
    fn test_duplicate_key_is_a_bug() {
        let _ = FragmentAndParameters::new("x")
            .with_parameter("p1", Value::Int(1))
            .with_parameter("p1", Value::Int(2));
    }
}
