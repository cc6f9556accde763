// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billkeep::{cli, commands::rules};
use rusqlite::{params, Connection};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billkeep::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO categories(name) VALUES('Shopping')", [])
        .unwrap();
    conn
}

#[test]
fn rule_applies_regex_and_rewrite() {
    let conn = setup();
    let cat_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='Shopping'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, category_id, payee_rewrite) VALUES('(?i)amazon|amzn', ?1, 'Amazon')",
        params![cat_id],
    )
    .unwrap();

    let (c, r) = billkeep::utils::apply_rules(&conn, "AMZN Mktp US*AB123", Some("order 123")).unwrap();
    assert_eq!(c, Some(cat_id));
    assert_eq!(r, Some(String::from("Amazon")));
}

#[test]
fn no_matching_rule_leaves_payee_alone() {
    let conn = setup();
    let (c, r) = billkeep::utils::apply_rules(&conn, "CORNER CAFE", None).unwrap();
    assert_eq!(c, None);
    assert_eq!(r, None);
}

#[test]
fn rules_add_rejects_invalid_regex() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "billkeep",
        "rules",
        "add",
        " (?P< ",
        "--category",
        "Shopping",
    ]);

    if let Some(("rules", rules_m)) = matches.subcommand() {
        let err = rules::handle(&conn, rules_m).unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
    } else {
        panic!("rules command not parsed");
    }
}

#[test]
fn rules_rm_trims_id_argument() {
    let conn = setup();
    conn.execute("INSERT INTO rules(pattern) VALUES('foo')", [])
        .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["billkeep", "rules", "rm", " 1 "]);

    if let Some(("rules", rules_m)) = matches.subcommand() {
        rules::handle(&conn, rules_m).unwrap();
    } else {
        panic!("rules command not parsed");
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM rules", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
