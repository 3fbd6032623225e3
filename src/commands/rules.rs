// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use rusqlite::{Connection, params};
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern = sub.get_one::<String>("pattern").unwrap().trim();
            let category = sub.get_one::<String>("category").unwrap().trim();
            let id = add_rule(conn, pattern, category)?;
            println!("Added rule {}: /{}/ -> {}", id, pattern, category);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT id, pattern, category FROM rules ORDER BY id DESC")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, pat, cat) = row?;
                data.push(vec![id.to_string(), pat, cat]);
            }
            println!("{}", pretty_table(&["ID", "Pattern", "Category"], data));
        }
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid rule id '{}'", raw))?;
            if !remove_rule(conn, id)? {
                bail!("Rule {} not found", id);
            }
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add_rule(conn: &Connection, pattern: &str, category: &str) -> Result<i64> {
    Regex::new(pattern).map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
    if category.is_empty() {
        bail!("Rule category must not be empty");
    }
    conn.execute(
        "INSERT INTO rules(pattern, category) VALUES (?1,?2)",
        params![pattern, category],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn remove_rule(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
    Ok(n > 0)
}

/// Category of the newest rule whose pattern matches `description`.
pub fn category_for(conn: &Connection, description: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT id, pattern, category FROM rules ORDER BY id DESC")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let pat: String = r.get(1)?;
        let cat: String = r.get(2)?;
        match Regex::new(&pat) {
            Ok(re) if re.is_match(description) => return Ok(Some(cat)),
            Ok(_) => {}
            Err(err) => warn!(rule = id, %err, "skipping rule with invalid pattern"),
        }
    }
    Ok(None)
}
