// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerpulse::commands::doctor::diagnose;
use ledgerpulse::commands::habits::{add_habit, mark_done};
use ledgerpulse::db;
use ledgerpulse::utils::set_setting;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn insert_raw(conn: &Connection, date: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(kind, description, amount, date) VALUES ('expense','x',?1,?2)",
        [amount, date],
    )
    .unwrap();
}

#[test]
fn clean_database_has_no_issues() {
    let conn = setup();
    insert_raw(&conn, "2025-06-14", "120.50");
    set_setting(&conn, "monthly_budget", "9000").unwrap();
    assert!(diagnose(&conn, today()).unwrap().is_empty());
}

#[test]
fn flags_rows_the_engine_would_misread() {
    let conn = setup();
    insert_raw(&conn, "2025-07-01", "10");
    insert_raw(&conn, "2025-13-40", "10");
    insert_raw(&conn, "2025-06-01", "0");
    insert_raw(&conn, "2025-06-02", "12,5");
    set_setting(&conn, "monthly_budget", "-100").unwrap();

    add_habit(&conn, "Read").unwrap();
    mark_done(&conn, "Read", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).unwrap();
    conn.execute(
        "INSERT INTO habit_logs(date, habit) VALUES ('2025-06-01', 'Juggle')",
        [],
    )
    .unwrap();

    let rows = diagnose(&conn, today()).unwrap();
    let issues: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        issues,
        vec![
            "future_dated",
            "bad_date",
            "non_positive_amount",
            "bad_amount",
            "orphan_habit_log",
            "bad_budget",
        ]
    );
    assert_eq!(rows[0][1], "#1 2025-07-01");
    assert_eq!(rows[3][1], "#4 '12,5'");
    assert_eq!(rows[4][1], "2025-06-01 Juggle");
}
