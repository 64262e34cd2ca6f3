use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynsql::dsl::*;
use dynsql::{
    MapperRenderingStrategy, PositionalRenderingStrategy, RenderStatement, SelectModel, SqlColumn,
    SqlTable, WhereSupport,
};

/// select col0, ... from t where col0 = ? and col1 = ? ...
/// with every other criterion elided.
fn build_select(table: &SqlTable, columns: &[SqlColumn]) -> SelectModel {
    let mut builder = select(columns).from(table);
    for (i, column) in columns.iter().enumerate() {
        let value = if i % 2 == 0 { Some(i as i64) } else { None };
        builder = builder.and(column, is_equal_to_when_present(value));
    }
    builder.build().unwrap()
}

fn columns(table: &SqlTable, n: usize) -> Vec<SqlColumn> {
    (0..n).map(|i| table.column(format!("col{i}"))).collect()
}

fn bench_render_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/where");
    let table = SqlTable::new("t");

    for n in [1, 5, 10, 50, 100] {
        let model = build_select(&table, &columns(&table, n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| black_box(model.render(MapperRenderingStrategy).unwrap()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_and_render");
    let table = SqlTable::new("t");

    for n in [1, 5, 10, 50] {
        let cols = columns(&table, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cols, |b, cols| {
            b.iter(|| {
                let model = build_select(&table, cols);
                black_box(model.render(PositionalRenderingStrategy).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/in_list");
    let table = SqlTable::new("t");
    let id = table.column("id");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        let model = select([&id])
            .from(&table)
            .where_(&id, is_in(values))
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| black_box(model.render(PositionalRenderingStrategy).unwrap()));
        });
    }

    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/nested_groups");
    let table = SqlTable::new("t");
    let a = table.column("a");
    let b_col = table.column("b");

    for depth in [1, 4, 16] {
        let mut criterion = group_of(&a, &b_col, 0);
        for level in 1..depth {
            criterion = dynsql::Criterion::group([criterion, or(&a, is_equal_to(level as i64))]);
        }
        let model = select([&a])
            .from(&table)
            .where_criterion(criterion)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &model, |b, model| {
            b.iter(|| black_box(model.render(MapperRenderingStrategy).unwrap()));
        });
    }

    group.finish();

    fn group_of(a: &SqlColumn, b: &SqlColumn, n: i64) -> dynsql::Criterion {
        dynsql::Criterion::group([on(a, is_equal_to(n)), or(b, is_null())])
    }
}

criterion_group!(
    benches,
    bench_render_where,
    bench_build_and_render,
    bench_in_list,
    bench_nested_groups
);
criterion_main!(benches);
