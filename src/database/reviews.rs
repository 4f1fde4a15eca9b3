use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use crate::domain::{NewReview, Review, ReviewUpdate};

const REVIEW_COLUMNS: &str =
    "id, recipe_id, user_id, user_name, rating, comment, created_at, updated_at";

pub fn insert_review(
    conn: &mut DbConn,
    id: &str,
    review: &NewReview,
    created_at: NaiveDateTime,
) -> Result<Review> {
    let sql = format!(
        "INSERT INTO reviews (id, recipe_id, user_id, user_name, rating, comment, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING {REVIEW_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            review.recipe_id,
            review.user_id,
            review.user_name,
            review.rating,
            review.comment,
            created_at,
        ],
        parse_review_row,
    )
    .context("Failed to insert review")
}

pub fn update_review(
    conn: &mut DbConn,
    id: &str,
    update: &ReviewUpdate,
    updated_at: NaiveDateTime,
) -> Result<Option<Review>> {
    let sql = format!(
        "UPDATE reviews SET rating = ?2, comment = ?3, updated_at = ?4 WHERE id = ?1 RETURNING {REVIEW_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![id, update.rating, update.comment, updated_at],
        parse_review_row,
    )
    .optional()
    .context("Failed to update review")
}

pub fn find_by_id(conn: &mut DbConn, id: &str) -> Result<Option<Review>> {
    let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_review_row)
        .optional()
        .context("Failed to query review by id")
}

pub fn find_for_user(conn: &mut DbConn, recipe_id: &str, user_id: &str) -> Result<Option<Review>> {
    let sql = format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE recipe_id = ?1 AND user_id = ?2 LIMIT 1"
    );

    conn.query_row(&sql, params![recipe_id, user_id], parse_review_row)
        .optional()
        .context("Failed to query review for user")
}

pub fn list_by_recipe(conn: &mut DbConn, recipe_id: &str) -> Result<Vec<Review>> {
    let sql = format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE recipe_id = ?1 ORDER BY created_at DESC, rowid DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![recipe_id], parse_review_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Review>> {
    let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_review_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_review(conn: &mut DbConn, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM reviews WHERE id = ?1", params![id])
        .context("Failed to delete review")?;
    Ok(deleted > 0)
}

fn parse_review_row(row: &rusqlite::Row) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        recipe_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        rating: decode_rating(row.get_ref(4)?),
        comment: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Only whole numbers that fit an `i32` count as a rating; anything else
/// reads back as missing so aggregation skips it
fn decode_rating(value: ValueRef<'_>) -> Option<i32> {
    match value {
        ValueRef::Integer(i) => i32::try_from(i).ok(),
        _ => None,
    }
}
