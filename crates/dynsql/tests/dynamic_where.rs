//! Search-form style WHERE clauses built from optional filters.

use dynsql::prelude::*;
use dynsql::{ClauseKind, FragmentAndParameters, StatementConfiguration};

struct Person {
    table: SqlTable,
    id: SqlColumn,
    first_name: SqlColumn,
    last_name: SqlColumn,
    age: SqlColumn,
}

impl Person {
    fn new() -> Self {
        let table = SqlTable::new("person");
        Self {
            id: table.column("id").with_type_tag("INTEGER"),
            first_name: table.column("first_name").with_type_tag("VARCHAR"),
            last_name: table.column("last_name").with_type_tag("VARCHAR"),
            age: table.column("age"),
            table,
        }
    }
}

#[derive(Default)]
struct Filter {
    first_name: Option<&'static str>,
    last_name: Option<&'static str>,
    min_age: Option<i32>,
    ids: Vec<i64>,
}

fn search(p: &Person, filter: &Filter) -> RenderResult<RenderedStatement> {
    select([&p.id, &p.first_name])
        .from(&p.table)
        .where_(&p.first_name, is_equal_to_when_present(filter.first_name))
        .and(&p.last_name, is_like_when_present(filter.last_name.map(|s| format!("{s}%"))))
        .and(&p.age, Condition::is_greater_than_or_equal_to(filter.min_age).when_present())
        .and(&p.id, is_in_when_present(filter.ids.clone()))
        .configure_statement(|c| {
            c.set_non_rendering_where_clause_allowed(true);
        })
        .build()?
        .render(MapperRenderingStrategy)
}

#[test]
fn no_filters_renders_no_where_clause() {
    let p = Person::new();
    let rendered = search(&p, &Filter::default()).unwrap();
    assert_eq!(rendered.statement(), "select id, first_name from person");
    assert!(rendered.parameters().is_empty());
}

#[test]
fn later_filter_only_drops_its_connector() {
    let p = Person::new();
    let rendered = search(
        &p,
        &Filter {
            min_age: Some(30),
            ..Filter::default()
        },
    )
    .unwrap();
    assert_eq!(
        rendered.statement(),
        "select id, first_name from person where age >= #{parameters.p1}"
    );
    assert_eq!(rendered.parameters().get("p1"), Some(&Value::Int(30)));
}

#[test]
fn all_filters() {
    let p = Person::new();
    let rendered = search(
        &p,
        &Filter {
            first_name: Some("Fred"),
            last_name: Some("Flint"),
            min_age: Some(30),
            ids: vec![1, 2],
        },
    )
    .unwrap();
    assert_eq!(
        rendered.statement(),
        "select id, first_name from person \
         where first_name = #{parameters.p1,jdbcType=VARCHAR} \
         and last_name like #{parameters.p2,jdbcType=VARCHAR} \
         and age >= #{parameters.p3} \
         and id in (#{parameters.p4,jdbcType=INTEGER}, #{parameters.p5,jdbcType=INTEGER})"
    );
    let keys: Vec<&str> = rendered.parameters().keys().map(String::as_str).collect();
    assert_eq!(keys, ["p1", "p2", "p3", "p4", "p5"]);
    assert_eq!(rendered.parameters()["p2"], Value::from("Flint%"));
}

#[test]
fn group_survivor_is_not_parenthesized() {
    let p = Person::new();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.id, is_greater_than(0))
        .and_criterion(group([
            on(&p.first_name, is_equal_to_when_present(None::<String>)),
            or(&p.last_name, is_equal_to("Rubble")),
        ]))
        .build()
        .unwrap();
    assert_eq!(
        model.render(NamedParameterRenderingStrategy).unwrap().statement(),
        "select id from person where id > :p1 and last_name = :p2"
    );
}

#[test]
fn nested_sub_criteria_and_not() {
    let p = Person::new();
    let criterion = Criterion::new(&p.age, is_less_than(18))
        .or(&p.age, is_greater_than(65))
        .or(&p.first_name, is_null());
    let model = select([&p.id])
        .from(&p.table)
        .where_criterion(not(criterion))
        .and(&p.last_name, is_not_null())
        .build()
        .unwrap();
    let (sql, params) = model
        .render(PositionalRenderingStrategy)
        .unwrap()
        .into_positional();
    assert_eq!(
        sql,
        "select id from person where not (age < $1 or age > $2 or first_name is null) \
         and last_name is not null"
    );
    assert_eq!(params, [Value::Int(18), Value::Int(65)]);
}

#[test]
fn custom_render_when() {
    let p = Person::new();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.age, is_greater_than(-1).when(|values| {
            values.iter().all(|v| v.as_i64().is_some_and(|n| n >= 0))
        }))
        .and(&p.id, is_not_null())
        .build()
        .unwrap();
    assert_eq!(model.to_sql().unwrap(), "select id from person where id is not null");
}

#[test]
fn completely_elided_where_fails_by_default() {
    let p = Person::new();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.id, is_in_when_present(Vec::<i64>::new()))
        .build()
        .unwrap();
    assert!(matches!(
        model.render(MapperRenderingStrategy),
        Err(RenderError::NonRenderingClause(ClauseKind::Where))
    ));
}

#[test]
fn empty_list_policies() {
    let p = Person::new();
    let build = |configure: fn(&mut StatementConfiguration)| {
        select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_in(Vec::<i64>::new()))
            .and(&p.age, is_not_in(Vec::<i64>::new()))
            .configure_statement(|c| {
                c.set_non_rendering_where_clause_allowed(true);
                configure(c);
            })
            .build()
            .unwrap()
    };

    let constant = build(|_| {});
    assert_eq!(
        constant.to_sql().unwrap(),
        "select id from person where 1=0 and 1=1"
    );

    let skip = build(|c| {
        c.set_empty_list_policy(EmptyListPolicy::Skip);
    });
    assert_eq!(skip.to_sql().unwrap(), "select id from person");

    let error = build(|c| {
        c.set_empty_list_policy(EmptyListPolicy::Error);
    });
    let err = error.to_sql().unwrap_err();
    assert!(matches!(&err, RenderError::EmptyList { column } if column == "id"));

    let callback = build(|c| {
        c.set_empty_list_policy(EmptyListPolicy::callback(|target| {
            let column = target.render_column()?;
            Ok(column.map_fragment(|c| {
                if target.is_negated() { format!("{c} is not null") } else { format!("{c} is null") }
            }))
        }));
    });
    assert_eq!(
        callback.to_sql().unwrap(),
        "select id from person where id is null and age is not null"
    );
}

#[test]
fn condition_policy_overrides_statement_policy() {
    let p = Person::new();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.id, is_in(Vec::<i64>::new()).on_empty(EmptyListPolicy::Skip))
        .and(&p.age, is_greater_than(1))
        .configure_statement(|c| {
            c.set_empty_list_policy(EmptyListPolicy::Error);
        })
        .build()
        .unwrap();
    assert_eq!(
        model.to_sql().unwrap(),
        "select id from person where age > #{parameters.p1}"
    );
}

#[test]
fn empty_list_callback_keeps_positional_binds_aligned() {
    let p = Person::new();
    let model = select([&p.id])
        .from(&p.table)
        .where_(
            value(5),
            is_in(Vec::<i64>::new())
                .on_empty(EmptyListPolicy::callback(|_| Ok(FragmentAndParameters::new("1=0")))),
        )
        .and(&p.id, is_equal_to(7))
        .build()
        .unwrap();
    let (sql, params) = model
        .render(PositionalRenderingStrategy)
        .unwrap()
        .into_positional();
    assert_eq!(sql, "select id from person where 1=0 and id = $1");
    assert_eq!(params, [Value::Int(7)]);
}

#[test]
fn filter_and_map_values() {
    let p = Person::new();
    let names = ["  fred ", "", "barney"];
    let model = select([&p.id])
        .from(&p.table)
        .where_(
            &p.first_name,
            is_in(names)
                .map_values(|v| match v {
                    Value::Text(s) => Value::from(s.trim()),
                    other => other,
                })
                .filter_values(|v| v.as_str().is_some_and(|s| !s.is_empty())),
        )
        .build()
        .unwrap();
    let rendered = model.render(NamedParameterRenderingStrategy).unwrap();
    assert_eq!(
        rendered.statement(),
        "select id from person where first_name in (:p1, :p2)"
    );
    let values: Vec<&Value> = rendered.parameters().values().collect();
    assert_eq!(values, [&Value::from("fred"), &Value::from("barney")]);
}
