//! Works and materials catalog handlers.
//!
//! ```text
//! GET    /api/v1/{works|materials}?search=tile
//! POST   /api/v1/{works|materials} {"name":"Screed","unit":"m2","unitPriceCents":2200}
//! PUT    /api/v1/{works|materials}/{id}
//! DELETE /api/v1/{works|materials}/{id}
//! ```
//!
//! The kind segment is constrained in the route pattern, so other paths
//! under `/api/v1` never reach these handlers.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::action::{ActionFault, ActionOptions, ActionResult};
use crate::domain::{
    CatalogError, CatalogItem, CatalogItemDraft, CatalogItemId, CatalogKind,
    CatalogValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for creating or replacing a catalog item.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemRequest {
    #[schema(example = "Screed pouring")]
    pub name: String,
    #[schema(example = "m2")]
    pub unit: String,
    #[schema(example = 2200)]
    pub unit_price_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<&CatalogItemRequest> for CatalogItemDraft {
    type Error = CatalogValidationError;

    fn try_from(value: &CatalogItemRequest) -> Result<Self, Self::Error> {
        Self::try_new(
            &value.name,
            &value.unit,
            value.unit_price_cents,
            value.description.as_deref(),
        )
    }
}

/// Query string for listing items.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
}

fn parse_kind(segment: &str) -> Result<CatalogKind, ActionFault> {
    segment
        .parse::<CatalogKind>()
        .map_err(|err| CatalogError::from(err).into())
}

fn draft_from(request: &CatalogItemRequest) -> Result<CatalogItemDraft, ActionFault> {
    CatalogItemDraft::try_from(request).map_err(|err| CatalogError::from(err).into())
}

/// List the active team's items of one kind.
#[utoipa::path(
    get,
    path = "/api/v1/{kind}",
    params(
        ("kind" = String, Path, description = "`works` or `materials`"),
        CatalogQuery
    ),
    responses(
        (status = 200, description = "Envelope carrying the items", body = [CatalogItem]),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing read permission")
    ),
    tags = ["catalog"],
    operation_id = "listCatalogItems"
)]
#[get("/{kind:works|materials}")]
pub async fn list_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<CatalogQuery>,
) -> ActionResult<Vec<CatalogItem>> {
    let catalog = &state.catalog;
    state
        .pipeline
        .wrap(
            ActionOptions::named("catalog.list"),
            move |ctx, (kind, search): (String, Option<String>)| async move {
                let kind = parse_kind(&kind)?;
                catalog
                    .list(&ctx, kind, search.as_deref())
                    .await
                    .map_err(ActionFault::from)
            },
        )
        .call(&session.claims(), (path.into_inner(), query.into_inner().search))
        .await
}

/// Add an item to the active team's catalog.
#[utoipa::path(
    post,
    path = "/api/v1/{kind}",
    params(("kind" = String, Path, description = "`works` or `materials`")),
    request_body = CatalogItemRequest,
    responses(
        (status = 200, description = "Envelope carrying the created item", body = CatalogItem),
        (status = 400, description = "Invalid item"),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing write permission"),
        (status = 409, description = "An item with that name already exists")
    ),
    tags = ["catalog"],
    operation_id = "createCatalogItem"
)]
#[post("/{kind:works|materials}")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CatalogItemRequest>,
) -> ActionResult<CatalogItem> {
    let catalog = &state.catalog;
    state
        .pipeline
        .wrap(
            ActionOptions::named("catalog.create"),
            move |ctx, (kind, request): (String, CatalogItemRequest)| async move {
                let kind = parse_kind(&kind)?;
                let draft = draft_from(&request)?;
                catalog
                    .create(&ctx, kind, draft)
                    .await
                    .map_err(ActionFault::from)
            },
        )
        .call(&session.claims(), (path.into_inner(), payload.into_inner()))
        .await
}

/// Replace an item's editable fields.
#[utoipa::path(
    put,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`works` or `materials`"),
        ("id" = Uuid, Path, description = "Item id")
    ),
    request_body = CatalogItemRequest,
    responses(
        (status = 200, description = "Envelope carrying the updated item", body = CatalogItem),
        (status = 400, description = "Invalid item"),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing write permission"),
        (status = 404, description = "No such item"),
        (status = 409, description = "An item with that name already exists")
    ),
    tags = ["catalog"],
    operation_id = "updateCatalogItem"
)]
#[put("/{kind:works|materials}/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, Uuid)>,
    payload: web::Json<CatalogItemRequest>,
) -> ActionResult<CatalogItem> {
    let catalog = &state.catalog;
    let (kind, id) = path.into_inner();
    state
        .pipeline
        .wrap(
            ActionOptions::named("catalog.update"),
            move |ctx, (kind, id, request): (String, Uuid, CatalogItemRequest)| async move {
                let kind = parse_kind(&kind)?;
                let draft = draft_from(&request)?;
                catalog
                    .update(&ctx, kind, CatalogItemId::from_uuid(id), draft)
                    .await
                    .map_err(ActionFault::from)
            },
        )
        .call(&session.claims(), (kind, id, payload.into_inner()))
        .await
}

/// Remove an item.
#[utoipa::path(
    delete,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`works` or `materials`"),
        ("id" = Uuid, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing write permission"),
        (status = 404, description = "No such item")
    ),
    tags = ["catalog"],
    operation_id = "deleteCatalogItem"
)]
#[delete("/{kind:works|materials}/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, Uuid)>,
) -> ActionResult<()> {
    let catalog = &state.catalog;
    state
        .pipeline
        .wrap(
            ActionOptions::named("catalog.delete"),
            move |ctx, (kind, id): (String, Uuid)| async move {
                let kind = parse_kind(&kind)?;
                catalog
                    .delete(&ctx, kind, CatalogItemId::from_uuid(id))
                    .await
                    .map_err(ActionFault::from)
            },
        )
        .call(&session.claims(), path.into_inner())
        .await
}
