use std::sync::Arc;

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;

    #[tokio::test]
    async fn categories_are_sorted_by_name() {
        let store = Arc::new(InMemoryStore::new());
        store.add_category("Travel");
        store.add_category("Food");

        let names: Vec<String> = CategoryService::new(store)
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Food", "Travel"]);
    }
}
