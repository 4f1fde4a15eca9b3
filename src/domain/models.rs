use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type RecipeId = String;
pub type ReviewId = String;
pub type UserId = String;

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/400";
pub const DEFAULT_COST: &str = "€";
pub const DEFAULT_USER_NAME: &str = "Utilisateur";

/// Published dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub difficulty: Difficulty,
    pub cost: String,
    pub owner_id: UserId,
    pub owner_email: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Recipe {
    pub fn image_or_placeholder(&self) -> &str {
        self.image
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Recipe fields as written to a store; ids and timestamps are assigned there
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub difficulty: Difficulty,
    pub cost: String,
    pub owner_id: UserId,
    pub owner_email: Option<String>,
}

/// Raw recipe form as submitted by a user, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub difficulty: Option<String>,
    pub cost: Option<String>,
}

/// Difficulty tier. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    #[default]
    Facile,
    Moyen,
    Difficile,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Facile => "facile",
            Difficulty::Moyen => "moyen",
            Difficulty::Difficile => "difficile",
            Difficulty::Other(label) => label,
        }
    }
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "facile" => Difficulty::Facile,
            "moyen" => Difficulty::Moyen,
            "difficile" => Difficulty::Difficile,
            _ => Difficulty::Other(label),
        }
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.as_str().to_string()
    }
}

/// One user's rating and comment for one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub user_name: String,
    /// Legacy records may carry no rating at all
    pub rating: Option<i32>,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub rating: i32,
    pub comment: String,
}

/// Rating and comment as submitted by a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Already-authenticated caller, as vouched for by the auth provider
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn display_name_or_default(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_USER_NAME)
            .to_string()
    }
}
