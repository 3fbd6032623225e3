// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::resolve_day;
use crate::error::LedgerError;
use crate::models::{Habit, HabitLog};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            add_habit(conn, name)?;
            println!("Added habit '{}'", name.trim());
        }
        Some(("done", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let day = resolve_day(conn, sub.get_one::<String>("date"))?;
            match mark_done(conn, name, day.date())? {
                DoneOutcome::Recorded { streak } => {
                    println!("Done: '{}' on {} (streak {})", name.trim(), day.date(), streak)
                }
                DoneOutcome::AlreadyDone { streak } => println!(
                    "'{}' already done on {} (streak {})",
                    name.trim(),
                    day.date(),
                    streak
                ),
            }
        }
        Some(("reset", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            reset_habit(conn, name)?;
            println!("Reset streak for '{}'", name.trim());
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            remove_habit(conn, name)?;
            println!("Removed habit '{}'", name.trim());
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneOutcome {
    Recorded { streak: u32 },
    AlreadyDone { streak: u32 },
}

/// Streak after completing a habit on `today`: it only continues when the
/// previous completion was the day before.
pub fn next_streak(last_done: Option<NaiveDate>, streak: u32, today: NaiveDate) -> u32 {
    match last_done {
        Some(prev) if today.signed_duration_since(prev).num_days() == 1 => streak + 1,
        _ => 1,
    }
}

pub fn add_habit(conn: &Connection, name: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Habit name must not be empty");
    }
    if lookup(conn, name)?.is_some() {
        return Err(LedgerError::DuplicateHabit(name.to_string()).into());
    }
    conn.execute("INSERT INTO habits(name) VALUES (?1)", params![name])?;
    info!(habit = name, "habit added");
    Ok(conn.last_insert_rowid())
}

fn lookup(conn: &Connection, name: &str) -> Result<Option<Habit>> {
    let row: Option<(i64, String, u32, Option<String>)> = conn
        .query_row(
            "SELECT id, name, streak, last_done FROM habits WHERE name=?1 COLLATE NOCASE",
            params![name.trim()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;
    row.map(habit_from_row).transpose()
}

fn habit_from_row(row: (i64, String, u32, Option<String>)) -> Result<Habit> {
    let (id, name, streak, last_done) = row;
    let last_done = last_done
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .with_context(|| format!("Invalid last_done '{}' for habit '{}'", d, name))
        })
        .transpose()?;
    Ok(Habit {
        id,
        name,
        streak,
        last_done,
    })
}

pub fn find_habit(conn: &Connection, name: &str) -> Result<Habit> {
    lookup(conn, name)?.ok_or_else(|| LedgerError::UnknownHabit(name.trim().to_string()).into())
}

pub fn mark_done(conn: &Connection, name: &str, day: NaiveDate) -> Result<DoneOutcome> {
    let habit = find_habit(conn, name)?;
    if habit.last_done == Some(day) {
        return Ok(DoneOutcome::AlreadyDone {
            streak: habit.streak,
        });
    }
    if let Some(prev) = habit.last_done.filter(|prev| *prev > day) {
        bail!(
            "Cannot record '{}' on {}: last completion was {}",
            habit.name,
            day,
            prev
        );
    }
    let streak = next_streak(habit.last_done, habit.streak, day);

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE habits SET streak=?1, last_done=?2 WHERE id=?3",
        params![streak, day.to_string(), habit.id],
    )?;
    tx.execute(
        "INSERT OR IGNORE INTO habit_logs(date, habit) VALUES (?1, ?2)",
        params![day.to_string(), habit.name],
    )?;
    tx.commit()?;
    info!(habit = %habit.name, %day, streak, "habit completed");
    Ok(DoneOutcome::Recorded { streak })
}

pub fn reset_habit(conn: &Connection, name: &str) -> Result<()> {
    let habit = find_habit(conn, name)?;
    conn.execute(
        "UPDATE habits SET streak=0, last_done=NULL WHERE id=?1",
        params![habit.id],
    )?;
    Ok(())
}

/// Deletes the habit together with its completion log.
pub fn remove_habit(conn: &Connection, name: &str) -> Result<()> {
    let habit = find_habit(conn, name)?;
    let tx = conn.unchecked_transaction()?;
    let logs = tx.execute(
        "DELETE FROM habit_logs WHERE habit=?1 COLLATE NOCASE",
        params![habit.name],
    )?;
    tx.execute("DELETE FROM habits WHERE id=?1", params![habit.id])?;
    tx.commit()?;
    info!(habit = %habit.name, logs, "habit removed");
    Ok(())
}

pub fn list_habits(conn: &Connection) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare("SELECT id, name, streak, last_done FROM habits ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, u32>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(habit_from_row(row?)?);
    }
    Ok(out)
}

/// Habits completed on `date`, in completion order.
pub fn habit_log_for(conn: &Connection, date: NaiveDate) -> Result<HabitLog> {
    let mut stmt = conn.prepare("SELECT habit FROM habit_logs WHERE date=?1 ORDER BY id")?;
    let rows = stmt.query_map(params![date.to_string()], |r| r.get::<_, String>(0))?;
    let mut habits = Vec::new();
    for row in rows {
        habits.push(row?);
    }
    Ok(HabitLog { date, habits })
}

#[derive(Serialize)]
struct HabitRow {
    name: String,
    streak: u32,
    last_done: Option<NaiveDate>,
    done_today: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = resolve_day(conn, sub.get_one::<String>("date"))?.date();
    let data: Vec<HabitRow> = list_habits(conn)?
        .into_iter()
        .map(|h| HabitRow {
            done_today: h.last_done == Some(today),
            name: h.name,
            streak: h.streak,
            last_done: h.last_done,
        })
        .collect();
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No habits yet. Add one with `ledgerpulse habit add --name <NAME>`.");
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|h| {
            vec![
                h.name,
                h.streak.to_string(),
                h.last_done
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "Not done yet".into()),
                if h.done_today { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Habit", "Streak", "Last Done", "Done Today"], rows)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn streak_continues_only_from_yesterday() {
        assert_eq!(next_streak(None, 0, d("2025-03-01")), 1);
        assert_eq!(next_streak(Some(d("2025-02-28")), 4, d("2025-03-01")), 5);
        assert_eq!(next_streak(Some(d("2025-02-27")), 4, d("2025-03-01")), 1);
        assert_eq!(next_streak(Some(d("2024-12-31")), 9, d("2025-01-01")), 10);
    }
}
