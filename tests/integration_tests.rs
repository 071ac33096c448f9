//! End-to-end query behavior over in-memory rows.


use rinq::config::QueryConfig;
use rinq::source::{DataSource, NamedDataSource, RowSource};
use rinq::types::Value;
use rinq::{select, Count, ExecError, Filter, OpError, Query, Term};
use test_data_gen::{expected, grid, ints};

fn named_grid() -> NamedDataSource {
    NamedDataSource::with_columns(grid(), ["x", "y", "z"])
}

#[test]
fn test_select_wildcard() {
    let q = Query::new(vec![Term::all()], grid(), None);
    assert_eq!(
        q.exec().unwrap().into_rows(),
        expected(&["*"], &[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]])
    );
}

#[test]
fn test_wildcard_over_mixed_rows() {
    let rows = vec![
        Value::from(vec![1, 2]),
        Value::from("solo"),
        Value::Null,
        Value::from(vec![3]),
    ];
    let out = Query::new(vec![Term::all()], rows.clone(), None).exec().unwrap();
    assert_eq!(out.header, vec!["*"]);
    assert_eq!(out.len(), rows.len());
    assert_eq!(out.rows[0], ints(&[1, 2]));
    assert_eq!(out.rows[1], vec![Value::from("solo")]);
    assert_eq!(out.rows[2], vec![Value::Null]);
    assert_eq!(out.rows[3], ints(&[3]));
}

#[test]
fn test_select_named_columns() {
    let q = Query::new(
        vec![Term::col("x"), Term::col("y"), Term::col("z")],
        named_grid(),
        None,
    );
    assert_eq!(
        q.exec().unwrap().into_rows(),
        expected(&["x", "y", "z"], &[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]])
    );
}

#[test]
fn test_select_count_star() {
    let q = Query::new(vec![Term::count("*")], grid(), None);
    assert_eq!(
        q.exec().unwrap().into_rows(),
        expected(&["count(*)"], &[&[3], &[3], &[3]])
    );
}

#[test]
fn test_count_alongside_columns() {
    let q = select([Count::all().into(), Term::col("x"), Term::col("y"), Term::col("z")])
        .from(named_grid())
        .build()
        .unwrap();
    assert_eq!(
        q.exec().unwrap().into_rows(),
        expected(
            &["count(*)", "x", "y", "z"],
            &[&[3, 1, 2, 3], &[3, 4, 5, 6], &[3, 7, 8, 9]]
        )
    );
}

#[test]
fn test_count_star_over_filtered_set_ignores_term_order() {
    let filter = Filter::new(|r| *r.get("y") >= 5);
    let front = Query::new(
        vec![Term::count("*"), Term::col("x")],
        named_grid(),
        Some(filter.clone()),
    );
    let back = Query::new(vec![Term::col("x"), Term::count("*")], named_grid(), Some(filter));

    let front = front.exec().unwrap();
    let back = back.exec().unwrap();
    assert_eq!(front.len(), 2);
    for row in &front.rows {
        assert_eq!(row[0], Value::from(2));
    }
    for row in &back.rows {
        assert_eq!(row[1], Value::from(2));
    }
}

#[test]
fn test_count_column_counts_non_null_cells() {
    let rows = vec![
        Value::List(vec![Value::from(1), Value::Null]),
        Value::List(vec![Value::Null, Value::from(2)]),
        Value::List(vec![Value::from(3), Value::from(4)]),
        Value::List(vec![Value::from(5)]),
    ];
    let src = NamedDataSource::with_columns(rows, ["a", "b"]);
    let q = Query::new(vec![Term::count("a"), Term::count("b")], src, None);
    let out = q.exec().unwrap();
    assert_eq!(out.header, vec!["count(a)", "count(b)"]);
    for row in &out.rows {
        assert_eq!(row, &ints(&[3, 2]));
    }
}

#[test]
fn test_count_missing_column_is_zero_on_every_row() {
    let q = Query::new(vec![Term::count("nope")], named_grid(), None);
    let out = q.exec().unwrap();
    assert_eq!(out.rows, vec![ints(&[0]); 3]);
}

#[test]
fn test_filter_with_where_clause() {
    let q = Query::new(
        vec![Term::col("x"), Term::col("y"), Term::col("z")],
        named_grid(),
        Some(Filter::new(|r| *r.get("x") > 1 && *r.get("z") < 9)),
    );
    assert_eq!(q.filtered_rows().unwrap(), vec![Value::from(vec![4, 5, 6])]);
    assert_eq!(
        q.exec().unwrap().into_rows(),
        expected(&["x", "y", "z"], &[&[4, 5, 6]])
    );
}

#[test]
fn test_filter_on_positionally_named_columns() {
    // An unnamed source picks up its column names from the select list.
    let q = select(["x", "y", "z"])
        .from(grid())
        .filter_by(|r| *r.get("x") > 1 && *r.get("z") < 9)
        .build()
        .unwrap();
    let out = q.exec().unwrap().into_rows();
    assert_eq!(out[1], ints(&[4, 5, 6]));
    assert_eq!(out.len(), 2);
}

#[test]
fn test_unknown_predicate_name_reads_null_for_every_row() {
    let seen_null = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&seen_null);
    let q = Query::new(
        vec![Term::all()],
        named_grid(),
        Some(Filter::new(move |r| {
            if r.get("ghost").is_null() {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
            true
        })),
    );
    assert_eq!(q.exec().unwrap().len(), 3);
    assert_eq!(seen_null.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[test]
fn test_unknown_projection_column_is_null() {
    let q = Query::new(vec![Term::col("x"), Term::col("ghost")], named_grid(), None);
    let out = q.exec().unwrap();
    assert_eq!(out.rows[0], vec![Value::from(1), Value::Null]);
}

#[test]
fn test_literal_and_wildcard() {
    let q = Query::new(vec![Term::lit(1), Term::all()], grid(), None);
    let out = q.exec().unwrap().into_rows();
    assert_eq!(out[0], vec![Value::from("1"), Value::from("*")]);
    assert_eq!(out[1], ints(&[1, 1, 2, 3]));
}

#[test]
fn test_with_new_data_leaves_original_untouched() {
    let q = Query::new(vec![Term::all()], grid(), None);
    let before = q.exec().unwrap();
    let other = q.with_new_data(vec![vec![0, 0]]);
    assert_eq!(q.exec().unwrap(), before);
    assert_eq!(other.exec().unwrap().rows, vec![ints(&[0, 0])]);
    assert!(q.shares_plan_with(&other));
}

#[test]
fn test_set_data_source_persists() {
    let mut q = Query::new(vec![Term::all()], grid(), None);
    q.set_data_source(vec![vec![10, 11]]);
    for _ in 0..3 {
        assert_eq!(q.exec().unwrap().rows, vec![ints(&[10, 11])]);
    }
    q.set_data_source(vec![5]);
    assert_eq!(q.exec().unwrap().rows, vec![ints(&[5])]);
}

#[test]
fn test_set_source_replaces_naming() {
    let mut q = Query::new(vec![Term::col("b")], named_grid(), None);
    assert_eq!(q.exec().unwrap().rows[0], vec![Value::Null]);
    q.set_source(NamedDataSource::with_columns(grid(), ["a", "b", "c"]));
    assert_eq!(q.exec().unwrap().rows[0], ints(&[2]));
}

#[test]
fn test_strict_mode_rejects_unknown_columns() {
    let err = select(["x", "ghost"])
        .from(named_grid())
        .config(QueryConfig::strict())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ExecError::Operator(OpError::UnknownColumn { clause: "projection", .. })
    ));

    let lenient = select(["x", "ghost"]).from(named_grid()).build();
    assert!(lenient.is_ok());
}

#[test]
fn test_json_in_json_out() {
    let src = DataSource::from_json("[[1, \"a\"], [2, null], [3, \"c\"]]").unwrap();
    assert_eq!(src.width(), 2);
    let q = select(["id", "tag"])
        .from(src)
        .filter_by(|r| !r.get("tag").is_null())
        .build()
        .unwrap();
    let json = q.exec().unwrap().to_json().unwrap();
    assert_eq!(json, r#"[["id","tag"],[1,"a"],[3,"c"]]"#);

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[2][0], 3);
    assert_eq!(parsed[1][1], "a");
}

#[test]
fn test_queries_share_across_threads() {
    let q = Query::new(
        vec![Term::col("x"), Term::count("*")],
        named_grid(),
        Some(Filter::new(|r| *r.get("x") > 1)),
    );
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = q.with_new_data(vec![vec![i + 2, 0, 0], vec![0, 0, 0]]);
                s.spawn(move || q.exec().unwrap())
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            let out = h.join().unwrap();
            assert_eq!(out.rows, vec![ints(&[i as i64 + 2, 1])]);
        }
    });
    assert_eq!(q.exec().unwrap().len(), 2);
}
