use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::config::AppConfig;
use crate::domain::{Difficulty, NewRecipe, Recipe, RecipeDraft, User, DEFAULT_COST};
use crate::errors::{ServiceError, ServiceResult};
use crate::store::{with_timeout, RecipeStore};

/// Recipe catalogue. Anyone reads; only the owner edits or deletes.
pub struct RecipeService {
    recipes: Arc<dyn RecipeStore>,
    read_timeout: Duration,
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeStore>, config: &AppConfig) -> Self {
        Self {
            recipes,
            read_timeout: config.store.read_timeout(),
        }
    }

    pub async fn all_recipes(&self) -> ServiceResult<Vec<Recipe>> {
        let recipes = with_timeout(
            "list recipes",
            self.read_timeout,
            self.recipes.list_all_recipes(),
        )
        .await?;
        Ok(recipes)
    }

    pub async fn recipe(&self, id: &str) -> ServiceResult<Recipe> {
        let recipe = with_timeout("get recipe", self.read_timeout, self.recipes.get_recipe(id)).await?;
        Ok(recipe)
    }

    pub async fn recipes_by_owner(&self, owner_id: &str) -> ServiceResult<Vec<Recipe>> {
        let recipes = with_timeout(
            "list recipes by owner",
            self.read_timeout,
            self.recipes.list_recipes_by_owner(owner_id),
        )
        .await?;
        Ok(recipes)
    }

    pub async fn create_recipe(&self, owner: &User, draft: RecipeDraft) -> ServiceResult<Recipe> {
        let recipe = prepare_recipe(owner, draft)?;
        let created = self.recipes.create_recipe(recipe).await?;
        info!("Created recipe {} for {}", created.id, owner.id);
        Ok(created)
    }

    pub async fn update_recipe(
        &self,
        owner: &User,
        id: &str,
        draft: RecipeDraft,
    ) -> ServiceResult<Recipe> {
        self.owned_recipe(owner, id).await?;
        let recipe = prepare_recipe(owner, draft)?;
        let updated = self.recipes.update_recipe(id, recipe).await?;
        info!("Updated recipe {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_recipe(&self, owner: &User, id: &str) -> ServiceResult<()> {
        self.owned_recipe(owner, id).await?;
        self.recipes.delete_recipe(id).await?;
        info!("Deleted recipe {}", id);
        Ok(())
    }

    async fn owned_recipe(&self, owner: &User, id: &str) -> ServiceResult<Recipe> {
        let recipe = self.recipe(id).await?;
        if !recipe.is_owned_by(&owner.id) {
            return Err(ServiceError::forbidden(format!(
                "recipe {} belongs to another user",
                id
            )));
        }
        Ok(recipe)
    }
}

/// Normalizes a submitted form into the record written to the store
fn prepare_recipe(owner: &User, draft: RecipeDraft) -> ServiceResult<NewRecipe> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(ServiceError::validation("title is required"));
    }

    Ok(NewRecipe {
        title,
        description: draft.description.trim().to_string(),
        image: non_blank(draft.image),
        ingredients: clean_lines(draft.ingredients),
        steps: clean_lines(draft.steps),
        difficulty: non_blank(draft.difficulty)
            .map(Difficulty::from)
            .unwrap_or_default(),
        cost: non_blank(draft.cost).unwrap_or_else(|| DEFAULT_COST.to_string()),
        owner_id: owner.id.clone(),
        owner_email: owner.email.clone(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PLACEHOLDER_IMAGE;
    use crate::errors::StoreError;
    use crate::store::InMemoryStore;
    use crate::test_support::{draft, user};

    fn service() -> RecipeService {
        RecipeService::new(Arc::new(InMemoryStore::new()), &AppConfig::new())
    }

    #[test]
    fn test_prepare_recipe_normalizes_form() {
        let mut form = draft("  Ratatouille  ");
        form.ingredients.push("   ".to_string());
        form.steps.insert(0, String::new());
        form.image = Some(" ".to_string());
        form.difficulty = None;
        form.cost = None;

        let recipe = prepare_recipe(&user("alice"), form).unwrap();
        assert_eq!(recipe.title, "Ratatouille");
        assert_eq!(recipe.ingredients, vec!["3 courgettes", "2 aubergines"]);
        assert_eq!(recipe.steps, vec!["Couper les légumes", "Mijoter"]);
        assert_eq!(recipe.image, None);
        assert_eq!(recipe.difficulty, Difficulty::Facile);
        assert_eq!(recipe.cost, "€");
        assert_eq!(recipe.owner_id, "alice");
        assert_eq!(recipe.owner_email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_prepare_recipe_requires_title() {
        let err = prepare_recipe(&user("alice"), draft("   ")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let service = service();
        let created = service.create_recipe(&user("alice"), draft("Tarte tatin")).await.unwrap();

        assert_eq!(created.difficulty, Difficulty::Moyen);
        assert_eq!(created.cost, "€€");
        assert_eq!(created.image_or_placeholder(), PLACEHOLDER_IMAGE);

        assert_eq!(service.recipe(&created.id).await.unwrap(), created);
        assert_eq!(service.all_recipes().await.unwrap().len(), 1);
        assert_eq!(service.recipes_by_owner("alice").await.unwrap().len(), 1);
        assert!(service.recipes_by_owner("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let err = service().recipe("ghost").await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::RecipeNotFound(ref id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_only_owner_may_edit_or_delete() {
        let service = service();
        let created = service.create_recipe(&user("alice"), draft("Tarte tatin")).await.unwrap();

        let err = service
            .update_recipe(&user("bob"), &created.id, draft("Tarte volée"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = service.delete_recipe(&user("bob"), &created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = service
            .update_recipe(&user("alice"), &created.id, draft("Tarte tatin revisitée"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Tarte tatin revisitée");

        service.delete_recipe(&user("alice"), &created.id).await.unwrap();
        assert!(service.recipe(&created.id).await.unwrap_err().is_not_found());
    }
}
