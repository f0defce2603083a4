//! Action pipeline behaviour over the in-memory adapters.
//!
//! Exercises the public surface only: a real membership resolver, seeded
//! stores and the catalog service, driven through wrapped actions.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backend::TraceId;
use backend::domain::action::{
    ActionFault, ActionOptions, ActionPipeline, ActionResult, INTERNAL_ERROR_MESSAGE,
    SessionClaims, code,
};
use backend::domain::{
    CatalogItemDraft, CatalogKind, CatalogService, MembershipContextResolver,
    NotificationService, TeamId, UserId,
};
use backend::outbound::memory::{DemoAccounts, InMemoryStores, seed_demo};
use futures::future::join_all;
use rstest::rstest;
use serde_json::{Value, json};

struct Harness {
    pipeline: ActionPipeline,
    catalog: CatalogService,
    accounts: DemoAccounts,
}

async fn harness() -> Harness {
    let stores = InMemoryStores::new();
    let accounts = seed_demo(
        stores.users.as_ref(),
        stores.teams.as_ref(),
        stores.catalog.as_ref(),
        "pipeline-password",
    )
    .await
    .expect("seed demo data");
    let resolver = MembershipContextResolver::new(stores.users.clone(), stores.teams.clone());
    let notifications = NotificationService::new(stores.notifications.clone(), stores.teams.clone());
    Harness {
        pipeline: ActionPipeline::new(Arc::new(resolver)),
        catalog: CatalogService::new(stores.catalog.clone(), notifications),
        accounts,
    }
}

#[derive(Debug, PartialEq)]
struct Estimate {
    total_cents: i64,
}

backend::plain_action_data!(Estimate);

fn error_code<T>(result: &ActionResult<T>) -> Option<&str> {
    result.error().and_then(|error| error.code())
}

#[rstest]
#[tokio::test]
async fn anonymous_calls_never_reach_the_operation() {
    let harness = harness().await;
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("count"), move |_ctx, (): ()| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ActionFault>(())
        });

    let result = action.call(&SessionClaims::anonymous(), ()).await;

    assert_eq!(error_code(&result), Some(code::UNAUTHENTICATED));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case::unknown_user(SessionClaims::for_user(UserId::random()))]
#[tokio::test]
async fn stale_sessions_are_unauthenticated(#[case] claims: SessionClaims) {
    let harness = harness().await;
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("noop"), |_ctx, (): ()| async {
            Ok::<_, ActionFault>(())
        });
    let result = action.call(&claims, ()).await;
    assert_eq!(error_code(&result), Some(code::UNAUTHENTICATED));
}

#[rstest]
#[tokio::test]
async fn foreign_team_selection_is_unauthenticated() {
    let harness = harness().await;
    let claims = SessionClaims::for_user(harness.accounts.owner_id).with_team(TeamId::random());
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("noop"), |_ctx, (): ()| async {
            Ok::<_, ActionFault>(())
        });
    let result = action.call(&claims, ()).await;
    assert_eq!(error_code(&result), Some(code::UNAUTHENTICATED));
}

#[rstest]
#[tokio::test]
async fn context_reflects_the_seeded_membership() {
    let harness = harness().await;
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("whoami"), |ctx, (): ()| async move {
            Ok::<_, ActionFault>(json!({
                "team": ctx.team().name(),
                "role": ctx.role(),
            }))
        });

    let result = action
        .call(&SessionClaims::for_user(harness.accounts.viewer_id), ())
        .await;

    assert_eq!(
        result.data(),
        Some(&json!({ "team": "Acme Builders", "role": "viewer" }))
    );
}

#[rstest]
#[tokio::test]
async fn catalog_faults_keep_their_codes() {
    let harness = harness().await;
    let catalog = &harness.catalog;
    let create = harness.pipeline.wrap(
        ActionOptions::named("catalog.create"),
        move |ctx, name: &'static str| async move {
            let draft = CatalogItemDraft::try_new(name, "bag", 100, None)
                .map_err(|err| ActionFault::validation(err.to_string()))?;
            catalog
                .create(&ctx, CatalogKind::Material, draft)
                .await
                .map_err(ActionFault::from)
        },
    );
    let owner = SessionClaims::for_user(harness.accounts.owner_id);
    let viewer = SessionClaims::for_user(harness.accounts.viewer_id);

    assert!(create.call(&owner, "Grout 5kg").await.is_success());
    assert_eq!(
        error_code(&create.call(&owner, "GROUT 5KG").await),
        Some(code::DUPLICATE_NAME)
    );
    assert_eq!(
        error_code(&create.call(&viewer, "Primer").await),
        Some(code::FORBIDDEN)
    );
    assert_eq!(
        error_code(&create.call(&owner, "   ").await),
        Some(code::VALIDATION_ERROR)
    );
}

#[rstest]
#[tokio::test]
async fn panics_become_sanitised_internal_errors_with_the_trace_id() {
    let harness = harness().await;
    let trace_id = TraceId::generate();
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("explode"), |_ctx, (): ()| async {
            if true {
                panic!("secret connection string leaked");
            }
            Ok::<_, ActionFault>(())
        });

    let result = TraceId::scope(
        trace_id,
        action.call(&SessionClaims::for_user(harness.accounts.owner_id), ()),
    )
    .await;

    let error = result.error().expect("failure envelope");
    assert_eq!(error.code(), Some(code::INTERNAL_ERROR));
    assert_eq!(error.message(), INTERNAL_ERROR_MESSAGE);
    assert_eq!(
        error.details().and_then(|details| details.get("traceId")),
        Some(&Value::from(trace_id.to_string()))
    );
}

#[rstest]
#[tokio::test]
async fn one_wrapped_action_serves_concurrent_calls() {
    let harness = harness().await;
    let action = harness
        .pipeline
        .wrap(ActionOptions::named("echo"), |ctx, n: usize| async move {
            Ok::<_, ActionFault>(format!("{}:{n}", ctx.user().display_name().as_ref()))
        });
    let owner = SessionClaims::for_user(harness.accounts.owner_id);

    let results = join_all((0..16).map(|n| action.call(&owner, n))).await;

    for (n, result) in results.into_iter().enumerate() {
        assert_eq!(result, ActionResult::success(format!("Olive Owner:{n}")));
    }
}

#[rstest]
#[tokio::test]
async fn tuples_and_downstream_types_are_wrapped_as_data() {
    let harness = harness().await;
    let owner = SessionClaims::for_user(harness.accounts.owner_id);
    let area = harness
        .pipeline
        .wrap(ActionOptions::named("area"), |_ctx, side: f64| async move {
            Ok::<_, ActionFault>((side * side, "m2".to_owned()))
        });
    let estimate = harness
        .pipeline
        .wrap(ActionOptions::named("estimate"), |_ctx, cents: i64| async move {
            Ok::<_, ActionFault>(Estimate { total_cents: cents })
        });

    let result = area.call(&owner, 1.5).await;
    assert_eq!(
        serde_json::to_value(&result).expect("serialise"),
        json!({ "success": true, "data": [2.25, "m2"] })
    );
    assert_eq!(
        estimate.call(&owner, 4_200).await,
        ActionResult::success(Estimate { total_cents: 4_200 })
    );
}
