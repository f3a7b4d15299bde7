//! Behavioral properties of `decode` over the whole dialect

use sqlgen_decode::{decode, Aggregator, CondOp, Condition, DecodeError};

fn catalog() -> Vec<String> {
    ["c0", "c1", "c2", "c3", "c4", "Home team", "No.", "Date (UTC)"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_plain_select_for_every_column() {
    let columns = catalog();
    for (index, column) in columns.iter().enumerate() {
        let decoded = decode(&format!("SELECT {} FROM table", column), &columns).unwrap();
        assert_eq!(decoded.selected_column_index(), index, "{column}");
        assert_eq!(decoded.aggregator(), Aggregator::None);
        assert!(decoded.conditions().is_empty());
    }
}

#[test]
fn test_parenthesized_and_bare_aggregation_agree() {
    let columns = catalog();
    for agg in Aggregator::KEYWORDS {
        for column in &columns {
            let wrapped = decode(&format!("SELECT {}({}) FROM table", agg.keyword(), column), &columns).unwrap();
            let bare = decode(&format!("SELECT {} {} FROM table", agg.keyword(), column), &columns).unwrap();

            assert_eq!(wrapped.query, bare.query, "{} {}", agg.keyword(), column);
            assert_eq!(wrapped.aggregator(), agg);
        }
    }
}

#[test]
fn test_condition_order_preserved() {
    let decoded = decode("SELECT c2 FROM table WHERE c0 > 2 AND c1 < 5", &["c0", "c1", "c2"]).unwrap();
    assert_eq!(
        decoded.conditions(),
        &[Condition::new(0, CondOp::Gt, "2"), Condition::new(1, CondOp::Lt, "5")]
    );
}

#[test]
fn test_mixed_and_or_flattened() {
    let decoded = decode(
        "SELECT c1 FROM table WHERE c0 > 2 AND c1 < 5 OR c2 = 'Alexander' AND c4 = 2",
        &catalog(),
    )
    .unwrap();

    let triples: Vec<(usize, usize, &str)> = decoded
        .conditions()
        .iter()
        .map(|c| (c.column_index, c.operator.index(), c.literal.as_str()))
        .collect();
    assert_eq!(
        triples,
        vec![(0, 1, "2"), (1, 2, "5"), (2, 0, "'Alexander'"), (4, 0, "2")]
    );
}

#[test]
fn test_no_where_clause() {
    assert!(decode("SELECT c1 FROM table", &catalog()).unwrap().conditions().is_empty());
}

#[test]
fn test_unknown_column() {
    assert!(matches!(
        decode("SELECT zzz FROM table", &["a", "b"]),
        Err(DecodeError::UnknownColumn(name)) if name == "zzz"
    ));
}

#[test]
fn test_malformed_boundary() {
    assert!(matches!(
        decode("SELECT a table", &["a"]),
        Err(DecodeError::MalformedQuery(_))
    ));
}

#[test]
fn test_decode_is_stable() {
    let columns = catalog();
    let text = "SELECT MAX(No.) FROM table WHERE Home team = st kilda AND Date (UTC) > 2001";

    let first = decode(text, &columns).unwrap();
    let second = decode(text, &columns).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.query.fingerprint(), second.query.fingerprint());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_decode_from_multiple_threads() {
    let columns = catalog();
    let expected = decode("SELECT COUNT c3 FROM table WHERE c4 < 10", &columns).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| decode("SELECT COUNT c3 FROM table WHERE c4 < 10", &columns).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_lowercase_boundaries_accepted() {
    let decoded = decode("select c1 from table", &catalog()).unwrap();
    assert_eq!(decoded.selected_column_index(), 1);
}
