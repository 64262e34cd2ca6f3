//! Statements that nest other statements.

use dynsql::prelude::*;

struct Schema {
    orders: SqlTable,
    order_id: SqlColumn,
    customer_id: SqlColumn,
    total: SqlColumn,
    customer: SqlTable,
    customer_pk: SqlColumn,
    region: SqlColumn,
}

fn schema() -> Schema {
    let orders = SqlTable::new("orders");
    let customer = SqlTable::new("customer");
    Schema {
        order_id: orders.column("id"),
        customer_id: orders.column("customer_id"),
        total: orders.column("total"),
        customer_pk: customer.column("id"),
        region: customer.column("region"),
        orders,
        customer,
    }
}

#[test]
fn in_sub_select_shares_the_parameter_sequence() {
    let s = schema();
    let customers = select([&s.customer_pk])
        .from(&s.customer)
        .where_(&s.region, is_equal_to("EU"))
        .build()
        .unwrap();
    let model = select([&s.order_id])
        .from(&s.orders)
        .where_(&s.total, is_greater_than(100))
        .and(&s.customer_id, is_in_sub_select(customers))
        .and(&s.total, is_less_than(1000))
        .build()
        .unwrap();

    let rendered = model.render(MapperRenderingStrategy).unwrap();
    assert_eq!(
        rendered.statement(),
        "select id from orders where total > #{parameters.p1} \
         and customer_id in (select id from customer where region = #{parameters.p2}) \
         and total < #{parameters.p3}"
    );
    assert_eq!(rendered.parameters().len(), 3);
}

#[test]
fn correlated_exists_resolves_outer_alias() {
    let s = schema();
    let big_orders = select([constant("1")])
        .from_as(&s.orders, "o")
        .where_(&s.customer_id, is_equal_to_column(&s.customer_pk))
        .and(&s.total, is_greater_than(500))
        .build()
        .unwrap();
    let model = select([&s.customer_pk, &s.region])
        .from_as(&s.customer, "c")
        .where_criterion(exists(big_orders))
        .build()
        .unwrap();

    let (sql, params) = model
        .render(PositionalRenderingStrategy)
        .unwrap()
        .into_positional();
    assert_eq!(
        sql,
        "select c.id, c.region from customer c where exists \
         (select 1 from orders o where o.customer_id = c.id and o.total > $1)"
    );
    assert_eq!(params, [Value::Int(500)]);
}

#[test]
fn nested_select_follows_the_outer_configuration() {
    let s = schema();
    let inner = || {
        select([&s.order_id])
            .from(&s.orders)
            .where_(&s.total, is_equal_to_when_present(None::<i64>))
            .configure_statement(|c| {
                c.set_non_rendering_where_clause_allowed(true);
            })
            .build()
            .unwrap()
    };

    let strict = select([&s.customer_pk])
        .from(&s.customer)
        .where_criterion(not_exists(inner()))
        .build()
        .unwrap();
    assert!(matches!(
        strict.to_sql(),
        Err(RenderError::NonRenderingClause(_))
    ));

    let lenient = select([&s.customer_pk])
        .from(&s.customer)
        .where_criterion(not_exists(inner()))
        .configure_statement(|c| {
            c.set_non_rendering_where_clause_allowed(true);
        })
        .build()
        .unwrap();
    assert_eq!(
        lenient.to_sql().unwrap(),
        "select id from customer where not exists (select id from orders)"
    );
}

#[test]
fn aggregate_in_having_and_arithmetic_in_select() {
    let s = schema();
    let model = select([
        BasicColumn::from(&s.customer_id),
        BasicColumn::from(sum(&s.total)).as_("spent"),
        BasicColumn::from(multiply(&s.total, value(2))).as_("doubled"),
    ])
    .from(&s.orders)
    .where_(&s.total, is_not_null())
    .group_by([&s.customer_id, &s.total])
    .having(sum(&s.total), is_greater_than(1000))
    .build()
    .unwrap();
    let rendered = model.render(NamedParameterRenderingStrategy).unwrap();
    assert_eq!(
        rendered.statement(),
        "select customer_id, sum(total) as spent, (total * :p1) as doubled from orders \
         where total is not null group by customer_id, total having sum(total) > :p2"
    );
}

#[test]
fn update_with_sub_select_and_delete_with_exists() {
    let s = schema();
    let region = select([&s.region])
        .from(&s.customer)
        .where_(&s.customer_pk, is_equal_to_column(&s.customer_id))
        .build()
        .unwrap();
    let note = s.orders.column("note");
    let model = update_as(&s.orders, "o")
        .set_sub_select(&note, region)
        .set_value(&s.total, 0)
        .where_(&s.order_id, is_equal_to(9))
        .build()
        .unwrap();
    assert_eq!(
        model.to_sql().unwrap(),
        "update orders o set note = (select region from customer where id = o.customer_id), \
         total = #{parameters.p1} where o.id = #{parameters.p2}"
    );

    let orphaned = select([&s.customer_pk])
        .from(&s.customer)
        .where_(&s.customer_pk, is_equal_to_column(&s.customer_id))
        .build()
        .unwrap();
    let delete = delete_from_as(&s.orders, "o")
        .where_criterion(not_exists(orphaned))
        .build()
        .unwrap();
    assert_eq!(
        delete.to_sql().unwrap(),
        "delete from orders o where not exists (select id from customer where id = o.customer_id)"
    );
}
