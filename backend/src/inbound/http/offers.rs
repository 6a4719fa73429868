//! Offer handlers.
//!
//! ```text
//! POST   /api/v1/offers {"itemDesired":"…","offerType":"money","moneyAmount":"50"}
//! GET    /api/v1/offers
//! GET    /api/v1/offers/{id}
//! PUT    /api/v1/offers/{id} {"offerType":"item","itemOffered":"…"}
//! DELETE /api/v1/offers/{id}
//! POST   /api/v1/offers/{id}/accept
//! POST   /api/v1/offers/{id}/refuse
//! ```
//!
//! Every offer route needs a session except the reads, which return nothing
//! to anonymous callers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{CreateOfferRequest, DecideOfferRequest, ReviseOfferRequest};
use crate::domain::{
    Error, MoneyAmount, MoneyValidationError, Offer, OfferDecision, OfferId, OfferTerms,
    OfferType, ParseOfferTypeError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{current_actor, require_actor};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_item_id, parse_offer_id,
};

/// Offer terms as sent by clients.
///
/// `itemOffered` is required when `offerType` is `item`; `moneyAmount` when
/// it is `money`. The amount may be a JSON string or number.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferTermsPayload {
    /// `item` or `money`.
    pub offer_type: Option<String>,
    pub item_offered: Option<String>,
    #[schema(value_type = Option<String>, example = "50.00")]
    pub money_amount: Option<Value>,
}

impl OfferTermsPayload {
    fn into_terms(self) -> ApiResult<OfferTerms> {
        let raw_type = self
            .offer_type
            .ok_or_else(|| missing_field_error(FieldName::new("offerType")))?;
        let offer_type: OfferType = raw_type
            .parse()
            .map_err(|err: ParseOfferTypeError| Error::invalid_offer(err.to_string()))?;
        match offer_type {
            OfferType::Item => {
                let raw = self
                    .item_offered
                    .filter(|raw| !raw.trim().is_empty())
                    .ok_or_else(|| Error::invalid_offer("item_offered required"))?;
                let item_offered = parse_item_id(raw.trim(), FieldName::new("itemOffered"))?;
                Ok(OfferTerms::Item { item_offered })
            }
            OfferType::Money => {
                let amount = parse_money(self.money_amount)?;
                Ok(OfferTerms::Money { amount })
            }
        }
    }
}

fn parse_money(raw: Option<Value>) -> ApiResult<MoneyAmount> {
    let text = match raw {
        None | Some(Value::Null) => return Err(Error::invalid_offer("money_amount required")),
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(Error::invalid_offer("money_amount required"));
        }
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => {
            return Err(Error::invalid_offer(
                "money_amount must be a decimal number",
            ));
        }
    };
    text.parse()
        .map_err(|err: MoneyValidationError| Error::invalid_offer(err.to_string()))
}

/// Body of `POST /offers`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferPayload {
    /// Identifier of the item the caller wants.
    pub item_desired: Option<String>,
    #[serde(flatten)]
    pub terms: OfferTermsPayload,
}

/// Offer as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    pub id: String,
    pub item_desired: String,
    pub offer_type: String,
    pub item_offered: Option<String>,
    /// Decimal string with two fractional digits.
    pub money_amount: Option<String>,
    pub offerer: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id.to_string(),
            item_desired: offer.item_desired.to_string(),
            offer_type: offer.terms.offer_type().to_string(),
            item_offered: offer.terms.item_offered().map(|id| id.to_string()),
            money_amount: offer.terms.money_amount().map(|amount| amount.to_string()),
            offerer: offer.offerer.to_string(),
            status: offer.status.as_str().to_owned(),
            created_at: offer.created_at,
            updated_at: offer.updated_at,
            revision: offer.revision,
        }
    }
}

fn offer_id_from(path: web::Path<String>) -> ApiResult<OfferId> {
    parse_offer_id(&path.into_inner(), FieldName::new("id"))
}

/// Propose a trade for another user's item.
#[utoipa::path(
    post,
    path = "/api/v1/offers",
    request_body = CreateOfferPayload,
    responses(
        (status = 201, description = "Offer created", body = OfferResponse),
        (status = 400, description = "Invalid offer", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Offer on own item", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "createOffer"
)]
#[post("/offers")]
pub async fn create_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOfferPayload>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let CreateOfferPayload {
        item_desired,
        terms,
    } = payload.into_inner();
    let raw_desired =
        item_desired.ok_or_else(|| missing_field_error(FieldName::new("itemDesired")))?;
    let item_desired = parse_item_id(&raw_desired, FieldName::new("itemDesired"))?;
    let terms = terms.into_terms()?;
    let offer = state
        .offers
        .create(CreateOfferRequest {
            actor,
            item_desired,
            terms,
        })
        .await?;
    Ok(HttpResponse::Created().json(OfferResponse::from(offer)))
}

/// Offers the caller takes part in, or all offers for elevated roles.
#[utoipa::path(
    get,
    path = "/api/v1/offers",
    responses(
        (status = 200, description = "Offers", body = [OfferResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "listOffers"
)]
#[get("/offers")]
pub async fn list_offers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OfferResponse>>> {
    let actor = current_actor(&state, &session).await?;
    let offers = state.offers_query.list(actor).await?;
    Ok(web::Json(offers.into_iter().map(OfferResponse::from).collect()))
}

/// Fetch one offer. Offers hidden from the caller are reported as not found.
#[utoipa::path(
    get,
    path = "/api/v1/offers/{id}",
    params(("id" = String, Path, description = "Offer identifier")),
    responses(
        (status = 200, description = "Offer", body = OfferResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "getOffer"
)]
#[get("/offers/{id}")]
pub async fn get_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OfferResponse>> {
    let actor = current_actor(&state, &session).await?;
    let offer_id = offer_id_from(path)?;
    let offer = state.offers_query.get(actor, offer_id).await?;
    Ok(web::Json(offer.into()))
}

/// Replace the terms of a pending offer. Offerer or elevated roles.
#[utoipa::path(
    put,
    path = "/api/v1/offers/{id}",
    params(("id" = String, Path, description = "Offer identifier")),
    request_body = OfferTermsPayload,
    responses(
        (status = 200, description = "Offer revised", body = OfferResponse),
        (status = 400, description = "Invalid offer", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Offer already resolved", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "reviseOffer"
)]
#[put("/offers/{id}")]
pub async fn revise_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<OfferTermsPayload>,
) -> ApiResult<web::Json<OfferResponse>> {
    let actor = require_actor(&state, &session).await?;
    let offer_id = offer_id_from(path)?;
    let terms = payload.into_inner().into_terms()?;
    let offer = state
        .offers
        .revise(ReviseOfferRequest {
            actor,
            offer_id,
            terms,
        })
        .await?;
    Ok(web::Json(offer.into()))
}

/// Withdraw an offer. Either participant or elevated roles.
#[utoipa::path(
    delete,
    path = "/api/v1/offers/{id}",
    params(("id" = String, Path, description = "Offer identifier")),
    responses(
        (status = 204, description = "Offer deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "deleteOffer"
)]
#[delete("/offers/{id}")]
pub async fn delete_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let offer_id = offer_id_from(path)?;
    state.offers.delete(actor, offer_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn decide(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    decision: OfferDecision,
) -> ApiResult<web::Json<OfferResponse>> {
    let actor = require_actor(&state, &session).await?;
    let offer_id = offer_id_from(path)?;
    let offer = state
        .offers
        .decide(DecideOfferRequest {
            actor,
            offer_id,
            decision,
        })
        .await?;
    Ok(web::Json(offer.into()))
}

/// Accept a pending offer. The desired item, and the offered item for swaps,
/// become `traded`.
#[utoipa::path(
    post,
    path = "/api/v1/offers/{id}/accept",
    params(("id" = String, Path, description = "Offer identifier")),
    responses(
        (status = 200, description = "Offer accepted", body = OfferResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Offer or item already resolved", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "acceptOffer"
)]
#[post("/offers/{id}/accept")]
pub async fn accept_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OfferResponse>> {
    decide(state, session, path, OfferDecision::Accept).await
}

/// Refuse a pending offer. Items are left unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/offers/{id}/refuse",
    params(("id" = String, Path, description = "Offer identifier")),
    responses(
        (status = 200, description = "Offer refused", body = OfferResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Offer already resolved", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "refuseOffer"
)]
#[post("/offers/{id}/refuse")]
pub async fn refuse_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OfferResponse>> {
    decide(state, session, path, OfferDecision::Refuse).await
}

#[cfg(test)]
#[path = "offers_tests.rs"]
mod tests;
