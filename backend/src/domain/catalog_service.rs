//! Catalog use-cases for works and materials.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::action::{ActionContext, ActionFault, code};
use crate::domain::ports::{CatalogPersistenceError, CatalogRepository, CatalogWrite};
use crate::domain::{
    CatalogItem, CatalogItemDraft, CatalogItemId, CatalogKind, CatalogValidationError,
    NotificationService, Permission,
};

/// Failures raised by [`CatalogService`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] CatalogValidationError),
    #[error("missing permission {permission:?}")]
    Forbidden { permission: Permission },
    #[error("{kind} {id} not found")]
    NotFound { kind: CatalogKind, id: CatalogItemId },
    #[error("a {kind} named {name:?} already exists")]
    DuplicateName { kind: CatalogKind, name: String },
    #[error(transparent)]
    Persistence(#[from] CatalogPersistenceError),
}

impl From<CatalogError> for ActionFault {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Invalid(invalid) => {
                ActionFault::validation(invalid.to_string()).with_detail("field", invalid.field())
            }
            CatalogError::Forbidden { permission } => ActionFault::rejected(
                code::FORBIDDEN,
                "You do not have permission to perform this action",
            )
            .with_detail("permission", json!(permission)),
            CatalogError::NotFound { kind, id } => {
                ActionFault::rejected(code::NOT_FOUND, format!("The {kind} was not found"))
                    .with_detail("id", id.to_string())
            }
            CatalogError::DuplicateName { kind, name } => ActionFault::rejected(
                code::DUPLICATE_NAME,
                format!("A {kind} named \"{name}\" already exists"),
            )
            .with_detail("field", "name"),
            CatalogError::Persistence(source) => ActionFault::internal(source),
        }
    }
}

/// Team-scoped catalog operations.
#[derive(Clone)]
pub struct CatalogService {
    items: Arc<dyn CatalogRepository>,
    notifications: NotificationService,
}

impl CatalogService {
    pub fn new(items: Arc<dyn CatalogRepository>, notifications: NotificationService) -> Self {
        Self {
            items,
            notifications,
        }
    }

    fn require(context: &ActionContext, permission: Permission) -> Result<(), CatalogError> {
        if context.can(permission) {
            Ok(())
        } else {
            Err(CatalogError::Forbidden { permission })
        }
    }

    /// Items of `kind`, optionally filtered by a case-insensitive name
    /// substring, sorted by name.
    pub async fn list(
        &self,
        context: &ActionContext,
        kind: CatalogKind,
        search: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::require(context, kind.read_permission())?;
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut items: Vec<_> = self
            .items
            .list(&context.team_id(), kind)
            .await?
            .into_iter()
            .filter(|item| {
                needle
                    .as_deref()
                    .is_none_or(|needle| item.name.to_lowercase().contains(needle))
            })
            .collect();
        items.sort_by_key(|item| item.name.to_lowercase());
        Ok(items)
    }

    /// Create an item and tell the rest of the team about it.
    pub async fn create(
        &self,
        context: &ActionContext,
        kind: CatalogKind,
        draft: CatalogItemDraft,
    ) -> Result<CatalogItem, CatalogError> {
        Self::require(context, kind.write_permission())?;
        let team_id = context.team_id();
        let item = CatalogItem::create(team_id, kind, draft, Utc::now());
        if self.items.insert_unique(&item).await? == CatalogWrite::NameTaken {
            return Err(CatalogError::DuplicateName {
                kind,
                name: item.name,
            });
        }
        info!(team_id = %team_id, item_id = %item.id, %kind, "catalog item created");

        let title = format!("New {kind} added");
        let body = format!(
            "{} added \"{}\" to the {} catalog",
            context.user().display_name().as_ref(),
            item.name,
            kind.segment()
        );
        if let Err(error) = self
            .notifications
            .notify_team(team_id, context.user_id(), &title, &body)
            .await
        {
            warn!(error = %error, item_id = %item.id, "failed to notify team about new item");
        }
        Ok(item)
    }

    /// Replace an item's editable fields.
    pub async fn update(
        &self,
        context: &ActionContext,
        kind: CatalogKind,
        id: CatalogItemId,
        draft: CatalogItemDraft,
    ) -> Result<CatalogItem, CatalogError> {
        Self::require(context, kind.write_permission())?;
        let team_id = context.team_id();
        let existing = self
            .items
            .find(&team_id, kind, &id)
            .await?
            .ok_or(CatalogError::NotFound { kind, id })?;
        let revised = existing.revise(draft, Utc::now());
        match self.items.replace_unique(&revised).await? {
            CatalogWrite::Stored => {}
            CatalogWrite::NameTaken => {
                return Err(CatalogError::DuplicateName {
                    kind,
                    name: revised.name,
                });
            }
            CatalogWrite::Missing => return Err(CatalogError::NotFound { kind, id }),
        }
        info!(team_id = %team_id, item_id = %id, %kind, "catalog item updated");
        Ok(revised)
    }

    /// Delete an item.
    pub async fn delete(
        &self,
        context: &ActionContext,
        kind: CatalogKind,
        id: CatalogItemId,
    ) -> Result<(), CatalogError> {
        Self::require(context, kind.write_permission())?;
        if !self.items.delete(&context.team_id(), kind, &id).await? {
            return Err(CatalogError::NotFound { kind, id });
        }
        info!(team_id = %context.team_id(), item_id = %id, %kind, "catalog item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockCatalogRepository, MockNotificationRepository, MockTeamRepository,
    };
    use crate::domain::{
        DisplayName, Email, Membership, Role, Team, TeamId, User, UserId, get_user_permissions,
    };
    use rstest::{fixture, rstest};

    fn context(role: Role) -> ActionContext {
        let user_id = UserId::random();
        let team = Team::new(TeamId::random(), "Acme").expect("team");
        let membership = Membership::new(user_id, team.id(), role);
        ActionContext::new(
            User::new(
                user_id,
                Email::new("eve@acme.test").expect("email"),
                DisplayName::new("Eve Estimator").expect("name"),
            ),
            team,
            role,
            get_user_permissions(&membership),
        )
    }

    fn draft(name: &str) -> CatalogItemDraft {
        CatalogItemDraft::try_new(name, "m2", 1500, None).expect("draft")
    }

    #[fixture]
    fn quiet_notifications() -> NotificationService {
        let mut teams = MockTeamRepository::new();
        teams.expect_members().returning(|_| Ok(Vec::new()));
        NotificationService::new(Arc::new(MockNotificationRepository::new()), Arc::new(teams))
    }

    #[rstest]
    #[tokio::test]
    async fn viewer_cannot_create(quiet_notifications: NotificationService) {
        let mut items = MockCatalogRepository::new();
        items.expect_insert_unique().never();
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let err = service
            .create(&context(Role::Viewer), CatalogKind::Work, draft("Tiling"))
            .await
            .expect_err("forbidden");
        assert_eq!(ActionFault::from(err).code(), code::FORBIDDEN);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_names_are_rejected(quiet_notifications: NotificationService) {
        let ctx = context(Role::Estimator);
        let mut items = MockCatalogRepository::new();
        items
            .expect_insert_unique()
            .times(1)
            .returning(|_| Ok(CatalogWrite::NameTaken));
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let err = service
            .create(&ctx, CatalogKind::Material, draft("cement"))
            .await
            .expect_err("duplicate");
        assert_eq!(ActionFault::from(err).code(), code::DUPLICATE_NAME);
    }

    #[rstest]
    #[tokio::test]
    async fn create_notifies_the_rest_of_the_team() {
        let ctx = context(Role::Estimator);
        let actor = ctx.user_id();
        let colleague = UserId::random();
        let mut items = MockCatalogRepository::new();
        items
            .expect_insert_unique()
            .times(1)
            .returning(|_| Ok(CatalogWrite::Stored));
        let mut teams = MockTeamRepository::new();
        teams.expect_members().returning(move |team| {
            Ok(vec![
                Membership::new(actor, *team, Role::Estimator),
                Membership::new(colleague, *team, Role::Viewer),
            ])
        });
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_insert_many()
            .withf(move |batch| {
                batch.len() == 1
                    && batch[0].user_id == colleague
                    && batch[0].body.contains("Eve Estimator")
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = CatalogService::new(
            Arc::new(items),
            NotificationService::new(Arc::new(notifications), Arc::new(teams)),
        );
        let item = service
            .create(&ctx, CatalogKind::Work, draft("Tiling"))
            .await
            .expect("created");
        assert_eq!(item.team_id, ctx.team_id());
        assert_eq!(item.kind, CatalogKind::Work);
    }

    #[rstest]
    #[tokio::test]
    async fn notification_failure_does_not_fail_create() {
        let ctx = context(Role::Owner);
        let mut items = MockCatalogRepository::new();
        items
            .expect_insert_unique()
            .returning(|_| Ok(CatalogWrite::Stored));
        let mut teams = MockTeamRepository::new();
        teams
            .expect_members()
            .returning(|_| Err(crate::domain::ports::TeamPersistenceError::query("boom")));
        let service = CatalogService::new(
            Arc::new(items),
            NotificationService::new(Arc::new(MockNotificationRepository::new()), Arc::new(teams)),
        );
        assert!(service.create(&ctx, CatalogKind::Work, draft("Tiling")).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn list_filters_and_sorts(quiet_notifications: NotificationService) {
        let ctx = context(Role::Viewer);
        let team_id = ctx.team_id();
        let mut items = MockCatalogRepository::new();
        items.expect_list().returning(move |_, kind| {
            Ok(["Wall tiling", "floor Tiling", "Screed"]
                .into_iter()
                .map(|name| CatalogItem::create(team_id, kind, draft(name), Utc::now()))
                .collect())
        });
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let listed = service
            .list(&ctx, CatalogKind::Work, Some(" TILING "))
            .await
            .expect("list");
        let names: Vec<_> = listed.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["floor Tiling", "Wall tiling"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_revises_the_stored_item(quiet_notifications: NotificationService) {
        let ctx = context(Role::Estimator);
        let existing = CatalogItem::create(ctx.team_id(), CatalogKind::Work, draft("Tiling"), Utc::now());
        let id = existing.id;
        let mut items = MockCatalogRepository::new();
        items.expect_find().returning(move |_, _, _| Ok(Some(existing.clone())));
        items
            .expect_replace_unique()
            .withf(move |item| item.id == id && item.name == "tiling")
            .times(1)
            .returning(|_| Ok(CatalogWrite::Stored));
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let updated = service
            .update(
                &ctx,
                CatalogKind::Work,
                id,
                CatalogItemDraft::try_new("tiling", "m2", 1800, None).expect("draft"),
            )
            .await
            .expect("updated");
        assert_eq!(updated.unit_price_cents, 1800);
    }

    #[rstest]
    #[case::renamed_onto_a_neighbour(CatalogWrite::NameTaken, code::DUPLICATE_NAME)]
    #[case::deleted_meanwhile(CatalogWrite::Missing, code::NOT_FOUND)]
    #[tokio::test]
    async fn update_reports_refused_writes(
        quiet_notifications: NotificationService,
        #[case] outcome: CatalogWrite,
        #[case] expected: &str,
    ) {
        let ctx = context(Role::Owner);
        let existing = CatalogItem::create(ctx.team_id(), CatalogKind::Material, draft("Cement"), Utc::now());
        let id = existing.id;
        let mut items = MockCatalogRepository::new();
        items.expect_find().returning(move |_, _, _| Ok(Some(existing.clone())));
        items.expect_replace_unique().returning(move |_| Ok(outcome));
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let err = service
            .update(&ctx, CatalogKind::Material, id, draft("Sand"))
            .await
            .expect_err("refused");
        assert_eq!(ActionFault::from(err).code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_item_is_not_found(quiet_notifications: NotificationService) {
        let mut items = MockCatalogRepository::new();
        items.expect_delete().returning(|_, _, _| Ok(false));
        let service = CatalogService::new(Arc::new(items), quiet_notifications);
        let err = service
            .delete(&context(Role::Owner), CatalogKind::Material, CatalogItemId::random())
            .await
            .expect_err("missing");
        assert_eq!(ActionFault::from(err).code(), code::NOT_FOUND);
    }

    #[rstest]
    fn validation_errors_name_the_field() {
        let fault = ActionFault::from(CatalogError::from(CatalogValidationError::NegativePrice));
        match fault {
            ActionFault::Validation { details, .. } => assert_eq!(
                details.and_then(|d| d.get("field").cloned()),
                Some(json!("unitPriceCents"))
            ),
            other => panic!("expected validation fault, got {other:?}"),
        }
    }
}
