use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use crate::domain::{Difficulty, NewRecipe, Recipe};

const RECIPE_COLUMNS: &str = "id, title, description, image, ingredients, steps, difficulty, cost, owner_id, owner_email, created_at, updated_at";

pub fn insert_recipe(
    conn: &mut DbConn,
    id: &str,
    recipe: &NewRecipe,
    created_at: NaiveDateTime,
) -> Result<Recipe> {
    let sql = format!(
        "INSERT INTO recipes (id, title, description, image, ingredients, steps, difficulty, cost, owner_id, owner_email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) RETURNING {RECIPE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            recipe.title,
            recipe.description,
            recipe.image,
            encode_list(&recipe.ingredients)?,
            encode_list(&recipe.steps)?,
            recipe.difficulty.as_str(),
            recipe.cost,
            recipe.owner_id,
            recipe.owner_email,
            created_at,
        ],
        parse_recipe_row,
    )
    .context("Failed to insert recipe")
}

pub fn update_recipe(
    conn: &mut DbConn,
    id: &str,
    recipe: &NewRecipe,
    updated_at: NaiveDateTime,
) -> Result<Option<Recipe>> {
    let sql = format!(
        "UPDATE recipes SET title = ?2, description = ?3, image = ?4, ingredients = ?5, steps = ?6, difficulty = ?7, cost = ?8, owner_id = ?9, owner_email = ?10, updated_at = ?11 WHERE id = ?1 RETURNING {RECIPE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            recipe.title,
            recipe.description,
            recipe.image,
            encode_list(&recipe.ingredients)?,
            encode_list(&recipe.steps)?,
            recipe.difficulty.as_str(),
            recipe.cost,
            recipe.owner_id,
            recipe.owner_email,
            updated_at,
        ],
        parse_recipe_row,
    )
    .optional()
    .context("Failed to update recipe")
}

pub fn find_by_id(conn: &mut DbConn, id: &str) -> Result<Option<Recipe>> {
    let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_recipe_row)
        .optional()
        .context("Failed to query recipe by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Recipe>> {
    let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_recipe_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_owner(conn: &mut DbConn, owner_id: &str) -> Result<Vec<Recipe>> {
    let sql = format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE owner_id = ?1 ORDER BY created_at DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![owner_id], parse_recipe_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_recipe(conn: &mut DbConn, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM recipes WHERE id = ?1", params![id])
        .context("Failed to delete recipe")?;
    Ok(deleted > 0)
}

fn parse_recipe_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
    let difficulty: String = row.get(6)?;
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        ingredients: decode_list(row, 4)?,
        steps: decode_list(row, 5)?,
        difficulty: Difficulty::from(difficulty),
        cost: row.get(7)?,
        owner_id: row.get(8)?,
        owner_email: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

// Ingredient and step lists are stored as JSON arrays of strings
fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode list column")
}

fn decode_list(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
