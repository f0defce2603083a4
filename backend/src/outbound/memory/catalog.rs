use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{CatalogPersistenceError, CatalogRepository, CatalogWrite};
use crate::domain::{CatalogItem, CatalogItemId, CatalogKind, TeamId};

/// Works and materials for every team in one insertion-ordered list.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<Vec<CatalogItem>>,
}

fn in_scope(item: &CatalogItem, team_id: &TeamId, kind: CatalogKind) -> bool {
    item.team_id == *team_id && item.kind == kind
}

/// Whether another item in `candidate`'s team and kind already uses its name.
fn name_taken(items: &[CatalogItem], candidate: &CatalogItem) -> bool {
    items.iter().any(|item| {
        item.id != candidate.id
            && in_scope(item, &candidate.team_id, candidate.kind)
            && item.has_name(&candidate.name)
    })
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogItem>, CatalogPersistenceError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| in_scope(item, team_id, kind))
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
        id: &CatalogItemId,
    ) -> Result<Option<CatalogItem>, CatalogPersistenceError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| in_scope(item, team_id, kind) && item.id == *id)
            .cloned())
    }

    async fn insert_unique(
        &self,
        item: &CatalogItem,
    ) -> Result<CatalogWrite, CatalogPersistenceError> {
        let mut items = self.items.write().await;
        if name_taken(&items, item) {
            return Ok(CatalogWrite::NameTaken);
        }
        items.push(item.clone());
        Ok(CatalogWrite::Stored)
    }

    async fn replace_unique(
        &self,
        item: &CatalogItem,
    ) -> Result<CatalogWrite, CatalogPersistenceError> {
        let mut items = self.items.write().await;
        if name_taken(&items, item) {
            return Ok(CatalogWrite::NameTaken);
        }
        match items
            .iter_mut()
            .find(|existing| existing.id == item.id && in_scope(existing, &item.team_id, item.kind))
        {
            Some(existing) => {
                *existing = item.clone();
                Ok(CatalogWrite::Stored)
            }
            None => Ok(CatalogWrite::Missing),
        }
    }

    async fn delete(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
        id: &CatalogItemId,
    ) -> Result<bool, CatalogPersistenceError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| !(in_scope(item, team_id, kind) && item.id == *id));
        Ok(items.len() < before)
    }
}
