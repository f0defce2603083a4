//! Demo data for local runs: one team, an owner and a viewer, and a few
//! catalog entries.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    CatalogPersistenceError, CatalogRepository, TeamPersistenceError, TeamRepository,
    UserAccount, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CatalogItem, CatalogItemDraft, CatalogKind, CatalogValidationError, DisplayName, Email,
    Membership, PasswordError, Role, Team, TeamId, TeamValidationError, User, UserId,
    UserValidationError, hash_password,
};

const DEMO_TEAM: &str = "Acme Builders";
const OWNER_EMAIL: &str = "owner@acme.test";
const VIEWER_EMAIL: &str = "viewer@acme.test";

/// Errors returned while seeding demo data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid demo user: {0}")]
    User(#[from] UserValidationError),
    #[error("invalid demo team: {0}")]
    Team(#[from] TeamValidationError),
    #[error("invalid demo catalog item: {0}")]
    Catalog(#[from] CatalogValidationError),
    #[error("demo password rejected: {0}")]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Users(#[from] UserPersistenceError),
    #[error(transparent)]
    Teams(#[from] TeamPersistenceError),
    #[error(transparent)]
    Items(#[from] CatalogPersistenceError),
}

/// Identifiers of the seeded records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccounts {
    pub team_id: TeamId,
    pub owner_id: UserId,
    pub viewer_id: UserId,
}

async fn seed_user(
    users: &dyn UserRepository,
    teams: &dyn TeamRepository,
    team_id: TeamId,
    email: &str,
    display_name: &str,
    role: Role,
    password: &str,
) -> Result<UserId, SeedError> {
    let user = User::new(
        UserId::random(),
        Email::new(email)?,
        DisplayName::new(display_name)?,
    );
    let user_id = user.id();
    users
        .upsert(&UserAccount {
            user,
            password_hash: hash_password(password)?,
        })
        .await?;
    teams
        .save_membership(&Membership::new(user_id, team_id, role))
        .await?;
    Ok(user_id)
}

/// Seed the demo team. Every demo user shares `password`.
pub async fn seed_demo(
    users: &dyn UserRepository,
    teams: &dyn TeamRepository,
    catalog: &dyn CatalogRepository,
    password: &str,
) -> Result<DemoAccounts, SeedError> {
    let team = Team::new(TeamId::random(), DEMO_TEAM)?;
    let team_id = team.id();
    teams.upsert_team(&team).await?;

    let owner_id = seed_user(users, teams, team_id, OWNER_EMAIL, "Olive Owner", Role::Owner, password).await?;
    let viewer_id =
        seed_user(users, teams, team_id, VIEWER_EMAIL, "Vera Viewer", Role::Viewer, password).await?;

    let now = Utc::now();
    let entries = [
        (CatalogKind::Work, "Floor tiling", "m2", 4_500, Some("Ceramic tiles, adhesive included")),
        (CatalogKind::Work, "Screed pouring", "m2", 2_200, None),
        (CatalogKind::Material, "Cement 25kg", "bag", 950, None),
        (CatalogKind::Material, "Tile adhesive", "bag", 1_800, Some("Flexible, C2TE")),
    ];
    for (kind, name, unit, price, description) in entries {
        let draft = CatalogItemDraft::try_new(name, unit, price, description)?;
        catalog
            .insert_unique(&CatalogItem::create(team_id, kind, draft, now))
            .await?;
    }

    info!(team = DEMO_TEAM, %team_id, owner = OWNER_EMAIL, viewer = VIEWER_EMAIL, "demo data seeded");
    Ok(DemoAccounts {
        team_id,
        owner_id,
        viewer_id,
    })
}
