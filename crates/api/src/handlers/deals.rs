//! Handlers for the `/deals` resource (ops dashboard).
//!
//! Listing filters by status/scheme in SQL and applies free-text search and
//! column sorting in memory afterwards. Creation mints the founder's magic
//! token and writes deal + founder + investors in one transaction. Updates
//! go through an explicit allow-list; there is no arbitrary field merge.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use relieftrack_core::dealquery::{self, SortField, SortOrder};
use relieftrack_core::error::CoreError;
use relieftrack_core::lifecycle::{apply_complete, DealStatus, Party};
use relieftrack_core::token::{issue_token, portal_link};
use relieftrack_core::types::{DbId, Timestamp};
use relieftrack_core::validation::{
    normalize_email, require_field, validate_note_content, validate_scheme_type,
};
use relieftrack_db::models::accountant::Accountant;
use relieftrack_db::models::deal::{CreateDeal, Deal, UpdateDeal};
use relieftrack_db::models::document::Document;
use relieftrack_db::models::founder::{CreateFounder, Founder};
use relieftrack_db::models::investor::{CreateInvestor, Investor};
use relieftrack_db::models::milestone::Milestone;
use relieftrack_db::models::note::{CreateNote, Note};
use relieftrack_db::repositories::{
    AccountantRepo, DealRepo, DocumentRepo, FounderRepo, InvestorRepo, MilestoneRepo, NoteRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOps;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter and payload structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /deals`.
#[derive(Debug, Deserialize)]
pub struct DealListParams {
    pub status: Option<String>,
    pub scheme_type: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Request body for `POST /deals`.
#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub company_name: String,
    pub company_number: String,
    pub scheme_type: String,
    pub investment_date: NaiveDate,
    pub investment_amount: f64,
    pub founder_name: String,
    pub founder_email: String,
    pub investors: Option<Vec<CreateInvestor>>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A deal hydrated with the related rows the dashboard list needs.
#[derive(Debug, Serialize)]
pub struct DealWithRelations {
    #[serde(flatten)]
    pub deal: Deal,
    pub founder: Option<Founder>,
    pub accountant: Option<Accountant>,
    pub investors: Vec<Investor>,
    pub milestones: Vec<Milestone>,
}

impl dealquery::DealRecord for DealWithRelations {
    fn company_name(&self) -> &str {
        &self.deal.company_name
    }
    fn company_number(&self) -> &str {
        &self.deal.company_number
    }
    fn founder_name(&self) -> Option<&str> {
        self.founder.as_ref().map(|f| f.name.as_str())
    }
    fn investment_amount(&self) -> f64 {
        self.deal.investment_amount
    }
    fn created_at(&self) -> Timestamp {
        self.deal.created_at
    }
}

/// Full nested detail for `GET /deals/{id}`.
#[derive(Debug, Serialize)]
pub struct DealDetail {
    #[serde(flatten)]
    pub deal: Deal,
    pub founder: Option<Founder>,
    pub accountant: Option<Accountant>,
    pub investors: Vec<Investor>,
    pub milestones: Vec<Milestone>,
    pub documents: Vec<Document>,
    pub notes: Vec<Note>,
}

/// Response body for `POST /deals`.
#[derive(Debug, Serialize)]
pub struct CreateDealResponse {
    pub deal: Deal,
    pub founder: Founder,
    pub investors: Vec<Investor>,
    /// Portal URL to hand to the founder.
    pub magic_link: String,
}

/// Hydrate a deal with founder, accountant, investors, and milestones.
async fn with_relations(state: &AppState, deal: Deal) -> AppResult<DealWithRelations> {
    let founder = FounderRepo::find_by_deal(&state.pool, deal.id).await?;
    let accountant = AccountantRepo::find_by_deal(&state.pool, deal.id).await?;
    let investors = InvestorRepo::list_by_deal(&state.pool, deal.id).await?;
    let milestones = MilestoneRepo::list_by_deal(&state.pool, deal.id).await?;
    Ok(DealWithRelations {
        deal,
        founder,
        accountant,
        investors,
        milestones,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/deals
///
/// List deals for the dashboard, newest first.
pub async fn list(
    RequireOps(_user): RequireOps,
    State(state): State<AppState>,
    Query(params): Query<DealListParams>,
) -> AppResult<Json<DataResponse<Vec<DealWithRelations>>>> {
    // Validate filters up front so a typo'd status is a 400, not an empty list.
    if let Some(ref status) = params.status {
        DealStatus::parse(status).map_err(AppError::Core)?;
    }
    if let Some(ref scheme) = params.scheme_type {
        validate_scheme_type(scheme).map_err(AppError::Core)?;
    }

    let deals = DealRepo::list(
        &state.pool,
        params.status.as_deref(),
        params.scheme_type.as_deref(),
    )
    .await?;

    let mut hydrated = Vec::with_capacity(deals.len());
    for deal in deals {
        hydrated.push(with_relations(&state, deal).await?);
    }

    // Free-text search and sorting happen after the fetch, not in SQL.
    if let Some(ref search) = params.search {
        hydrated.retain(|deal| dealquery::matches_search(deal, search));
    }
    if params.sort_by.is_some() || params.sort_order.is_some() {
        let field = match params.sort_by.as_deref() {
            Some(s) => SortField::parse(s).map_err(AppError::Core)?,
            None => SortField::Date,
        };
        let order = match params.sort_order.as_deref() {
            Some(s) => SortOrder::parse(s).map_err(AppError::Core)?,
            None => SortOrder::Desc,
        };
        dealquery::sort_deals(&mut hydrated, field, order);
    }

    Ok(Json(DataResponse { data: hydrated }))
}

/// POST /api/v1/deals
///
/// Create a deal with its founder (magic token minted here) and optional
/// investor batch, atomically.
pub async fn create(
    RequireOps(user): RequireOps,
    State(state): State<AppState>,
    Json(input): Json<CreateDealRequest>,
) -> AppResult<(StatusCode, Json<CreateDealResponse>)> {
    require_field(&input.company_name, "company_name").map_err(AppError::Core)?;
    require_field(&input.company_number, "company_number").map_err(AppError::Core)?;
    require_field(&input.founder_name, "founder_name").map_err(AppError::Core)?;
    require_field(&input.founder_email, "founder_email").map_err(AppError::Core)?;
    validate_scheme_type(&input.scheme_type).map_err(AppError::Core)?;

    let issued = issue_token(Utc::now());

    let deal_input = CreateDeal {
        company_name: input.company_name,
        company_number: input.company_number,
        scheme_type: input.scheme_type,
        investment_date: input.investment_date,
        investment_amount: input.investment_amount,
        created_by: user.user_id,
    };
    let founder_input = CreateFounder {
        name: input.founder_name,
        email: normalize_email(&input.founder_email),
        magic_token: issued.token.clone(),
        token_expires_at: issued.expires_at,
    };
    let investors = input.investors.unwrap_or_default();

    let (deal, founder, investors) =
        DealRepo::create_with_founder(&state.pool, &deal_input, &founder_input, &investors).await?;

    tracing::info!(
        deal_id = deal.id,
        company = %deal.company_name,
        scheme = %deal.scheme_type,
        investor_count = investors.len(),
        "Deal created"
    );

    let magic_link = portal_link(&state.config.app_base_url, Party::Founder, &issued.token);

    Ok((
        StatusCode::CREATED,
        Json(CreateDealResponse {
            deal,
            founder,
            investors,
            magic_link,
        }),
    ))
}

/// GET /api/v1/deals/{id}
///
/// Full nested detail for one deal.
pub async fn get_by_id(
    RequireOps(_user): RequireOps,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DealDetail>>> {
    let deal = DealRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    let relations = with_relations(&state, deal).await?;
    let documents = DocumentRepo::list_by_deal(&state.pool, id).await?;
    let notes = NoteRepo::list_by_deal(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: DealDetail {
            deal: relations.deal,
            founder: relations.founder,
            accountant: relations.accountant,
            investors: relations.investors,
            milestones: relations.milestones,
            documents,
            notes,
        },
    }))
}

/// PATCH /api/v1/deals/{id}
///
/// Partial update limited to the allow-listed fields in [`UpdateDeal`].
/// A `status` here is the manual ops override, including the only route to
/// `AWAITING_SUBMISSION`.
pub async fn update(
    RequireOps(user): RequireOps,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDeal>,
) -> AppResult<Json<DataResponse<DealWithRelations>>> {
    if let Some(ref scheme) = input.scheme_type {
        validate_scheme_type(scheme).map_err(AppError::Core)?;
    }
    if let Some(ref status) = input.status {
        DealStatus::parse(status).map_err(AppError::Core)?;
    }

    let deal = DealRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    if let Some(ref status) = input.status {
        tracing::info!(deal_id = id, user_id = user.user_id, %status, "Ops status override");
    }

    Ok(Json(DataResponse {
        data: with_relations(&state, deal).await?,
    }))
}

/// DELETE /api/v1/deals/{id}
///
/// Hard delete. Cascades to founder, accountant, investors, milestones,
/// documents, and notes; the deal's magic links stop resolving.
pub async fn delete(
    RequireOps(user): RequireOps,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = DealRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Deal", id }));
    }
    tracing::info!(deal_id = id, user_id = user.user_id, "Deal deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/deals/{id}/complete
///
/// Terminal ops action: mark a deal complete once its EIS2 approval is in.
pub async fn complete(
    RequireOps(user): RequireOps,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deal>>> {
    let deal = DealRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    let current = DealStatus::parse(&deal.status).map_err(AppError::Core)?;
    apply_complete(current).map_err(AppError::Core)?;

    let completed = DealRepo::complete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    tracing::info!(deal_id = id, user_id = user.user_id, "Deal marked complete");
    Ok(Json(DataResponse { data: completed }))
}

/// POST /api/v1/deals/{id}/notes
///
/// Append an ops note.
pub async fn create_note(
    RequireOps(user): RequireOps,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    validate_note_content(&input.content).map_err(AppError::Core)?;

    // 404 before insert so a deleted deal doesn't surface as an FK error.
    DealRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    let note = NoteRepo::create(&state.pool, id, user.user_id, input.content.trim()).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}
