//! Builders shared by the unit tests

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{Difficulty, NewRecipe, Recipe, RecipeDraft, Review, User};

pub fn timestamp(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|t| t + Duration::minutes(minutes))
        .expect("valid fixture timestamp")
}

pub fn recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        description: String::new(),
        image: None,
        ingredients: vec!["200g de tomates".to_string()],
        steps: vec!["Couper".to_string()],
        difficulty: Difficulty::Facile,
        cost: "€".to_string(),
        owner_id: "owner".to_string(),
        owner_email: Some("owner@example.com".to_string()),
        created_at: timestamp(0),
        updated_at: timestamp(0),
    }
}

pub fn new_recipe(owner: &str) -> NewRecipe {
    NewRecipe {
        title: "Gratin dauphinois".to_string(),
        description: String::new(),
        image: Some("https://example.com/gratin.jpg".to_string()),
        ingredients: vec!["1kg de pommes de terre".to_string()],
        steps: vec!["Trancher".to_string(), "Cuire".to_string()],
        difficulty: Difficulty::Facile,
        cost: "€".to_string(),
        owner_id: owner.to_string(),
        owner_email: None,
    }
}

pub fn review(recipe_id: &str, user_id: &str, rating: Option<i32>) -> Review {
    Review {
        id: format!("{recipe_id}-{user_id}"),
        recipe_id: recipe_id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_id.to_string(),
        rating,
        comment: String::new(),
        created_at: timestamp(0),
        updated_at: timestamp(0),
    }
}

pub fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        description: "Un classique".to_string(),
        image: None,
        ingredients: vec!["3 courgettes".to_string(), "2 aubergines".to_string()],
        steps: vec!["Couper les légumes".to_string(), "Mijoter".to_string()],
        difficulty: Some("moyen".to_string()),
        cost: Some("€€".to_string()),
    }
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: Some(format!("{id}@example.com")),
        display_name: Some(id.to_string()),
    }
}
