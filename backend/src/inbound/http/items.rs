//! Item listing handlers.
//!
//! ```text
//! POST   /api/v1/items
//! GET    /api/v1/items?category=books&owner={userId}
//! GET    /api/v1/items/{id}
//! PUT    /api/v1/items/{id}
//! PATCH  /api/v1/items/{id}/status {"status":"unavailable"}
//! DELETE /api/v1/items/{id}
//! ```
//!
//! Reads are open to anonymous callers. Mutations need a session.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ChangeItemStatusRequest, CreateItemRequest, ListItemsRequest, MediaResolver,
    UpdateItemRequest,
};
use crate::domain::{Item, ItemDetails, ItemDetailsParts};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{current_actor, require_actor};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_item_validation_error, missing_field_error, parse_category, parse_item_id,
    parse_user_id,
};

/// Editable item fields for create and replace.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    /// One of `books`, `course_materials`, `equipment`, `technology`.
    pub category: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    /// Opaque media reference or absolute URL.
    pub image: Option<String>,
}

impl ItemPayload {
    fn into_details(self) -> ApiResult<ItemDetails> {
        let title = self
            .title
            .ok_or_else(|| missing_field_error(FieldName::new("title")))?;
        let category = self
            .category
            .as_deref()
            .map(|raw| parse_category(raw, FieldName::new("category")))
            .transpose()?;
        ItemDetails::try_from_parts(ItemDetailsParts {
            title: &title,
            description: self.description.as_deref(),
            category,
            location: self.location.as_deref(),
            address: self.address.as_deref(),
            image: self.image.as_deref(),
        })
        .map_err(map_item_validation_error)
    }
}

/// Body of `PATCH /items/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ItemStatusPayload {
    /// One of `available`, `unavailable`, `traded`.
    pub status: Option<String>,
}

/// Optional listing filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemListParams {
    /// Only items in this category.
    pub category: Option<String>,
    /// Only items owned by this user id.
    pub owner: Option<String>,
}

/// Item as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub address: String,
    /// Stored media reference.
    pub image: Option<String>,
    /// Retrievable URL for `image`.
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

impl ItemResponse {
    pub(crate) fn from_item(item: Item, media: &dyn MediaResolver) -> Self {
        let Item {
            id,
            owner,
            details,
            status,
            created_at,
            updated_at,
            revision,
        } = item;
        let image_url = details.image.as_ref().map(|image| media.resolve(image));
        Self {
            id: id.to_string(),
            owner: owner.to_string(),
            title: details.title.as_ref().to_owned(),
            description: details.description,
            category: details.category.as_str().to_owned(),
            location: details.location,
            address: details.address,
            image: details.image.map(String::from),
            image_url,
            status: status.as_str().to_owned(),
            created_at,
            updated_at,
            revision,
        }
    }
}

/// List a new item owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item listed", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ItemPayload>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let details = payload.into_inner().into_details()?;
    let item = state
        .items
        .create(CreateItemRequest { actor, details })
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from_item(item, state.media.as_ref())))
}

/// Items visible to the caller, newest first.
///
/// Anonymous callers and members see `available` items only.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ItemListParams),
    responses(
        (status = 200, description = "Items", body = [ItemResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ItemListParams>,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    let actor = current_actor(&state, &session).await?;
    let ItemListParams { category, owner } = params.into_inner();
    let request = ListItemsRequest {
        actor,
        category: category
            .as_deref()
            .map(|raw| parse_category(raw, FieldName::new("category")))
            .transpose()?,
        owner: owner
            .as_deref()
            .map(|raw| parse_user_id(raw, FieldName::new("owner")))
            .transpose()?,
    };
    let items = state.items_query.list(request).await?;
    let media = state.media.as_ref();
    Ok(web::Json(
        items
            .into_iter()
            .map(|item| ItemResponse::from_item(item, media))
            .collect(),
    ))
}

/// Fetch one item. Hidden items are reported as not found.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemResponse>> {
    let actor = current_actor(&state, &session).await?;
    let item_id = parse_item_id(&path.into_inner(), FieldName::new("id"))?;
    let item = state.items_query.get(actor, item_id).await?;
    Ok(web::Json(ItemResponse::from_item(item, state.media.as_ref())))
}

/// Replace the editable fields of an item. Owner or elevated roles.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = ItemPayload,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Conflict", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ItemPayload>,
) -> ApiResult<web::Json<ItemResponse>> {
    let actor = require_actor(&state, &session).await?;
    let item_id = parse_item_id(&path.into_inner(), FieldName::new("id"))?;
    let details = payload.into_inner().into_details()?;
    let item = state
        .items
        .update(UpdateItemRequest {
            actor,
            item_id,
            details,
        })
        .await?;
    Ok(web::Json(ItemResponse::from_item(item, state.media.as_ref())))
}

/// Move an item to a new status. Traded items never change again.
#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}/status",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = ItemStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = ItemResponse),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Conflict", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "changeItemStatus"
)]
#[patch("/items/{id}/status")]
pub async fn change_item_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ItemStatusPayload>,
) -> ApiResult<web::Json<ItemResponse>> {
    let actor = require_actor(&state, &session).await?;
    let item_id = parse_item_id(&path.into_inner(), FieldName::new("id"))?;
    let status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(FieldName::new("status")))?;
    let item = state
        .items
        .change_status(ChangeItemStatusRequest {
            actor,
            item_id,
            status,
        })
        .await?;
    Ok(web::Json(ItemResponse::from_item(item, state.media.as_ref())))
}

/// Delete an item and every offer referencing it.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let item_id = parse_item_id(&path.into_inner(), FieldName::new("id"))?;
    state.items.delete(actor, item_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
