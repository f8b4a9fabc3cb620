//! Handlers for the token-gated founder/accountant portal.
//!
//! No session here: the magic token in the URL is the credential. Token
//! resolution tries founders first, then accountants; an unknown token is a
//! 404 and an expired one a 401, with distinct messages.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use relieftrack_core::documents::{validate_document_type, DOC_EIS2};
use relieftrack_core::error::CoreError;
use relieftrack_core::lifecycle::{
    apply_action, apply_eis2_upload, DealStatus, Party, PortalAction, Transition,
};
use relieftrack_core::token::{check_expiry, issue_token, portal_link};
use relieftrack_core::types::DbId;
use relieftrack_core::validation::{normalize_email, require_field};
use relieftrack_db::models::accountant::{Accountant, CreateAccountant};
use relieftrack_db::models::deal::Deal;
use relieftrack_db::models::document::{CreateDocument, Document};
use relieftrack_db::models::founder::Founder;
use relieftrack_db::models::investor::Investor;
use relieftrack_db::models::milestone::Milestone;
use relieftrack_db::repositories::{
    AccountantRepo, DealRepo, DocumentRepo, FounderRepo, InvestorRepo, MilestoneRepo,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Token resolution
// ---------------------------------------------------------------------------

/// The party a magic token resolved to.
enum TokenHolder {
    Founder(Founder),
    Accountant(Accountant),
}

impl TokenHolder {
    fn party(&self) -> Party {
        match self {
            TokenHolder::Founder(_) => Party::Founder,
            TokenHolder::Accountant(_) => Party::Accountant,
        }
    }

    fn deal_id(&self) -> DbId {
        match self {
            TokenHolder::Founder(f) => f.deal_id,
            TokenHolder::Accountant(a) => a.deal_id,
        }
    }
}

/// Resolve a magic token to its holder, founder namespace first.
///
/// Read-only: resolution never extends a token's validity.
async fn resolve_token(state: &AppState, token: &str) -> Result<TokenHolder, AppError> {
    if let Some(founder) = FounderRepo::find_by_token(&state.pool, token).await? {
        check_expiry(founder.token_expires_at, Utc::now()).map_err(AppError::Core)?;
        return Ok(TokenHolder::Founder(founder));
    }
    if let Some(accountant) = AccountantRepo::find_by_token(&state.pool, token).await? {
        check_expiry(accountant.token_expires_at, Utc::now()).map_err(AppError::Core)?;
        return Ok(TokenHolder::Accountant(accountant));
    }
    Err(AppError::Core(CoreError::InvalidToken))
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Founder identity shown on their own portal page.
#[derive(Debug, Serialize)]
pub struct FounderView {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub is_handling_submission: bool,
}

/// Accountant identity shown on their own portal page.
#[derive(Debug, Serialize)]
pub struct AccountantView {
    pub id: DbId,
    pub firm_name: String,
    pub contact_name: String,
    pub email: String,
}

/// The deal as the portal sees it. Ops notes are deliberately absent.
#[derive(Debug, Serialize)]
pub struct PortalDeal {
    #[serde(flatten)]
    pub deal: Deal,
    pub founder: Option<Founder>,
    pub accountant: Option<Accountant>,
    pub investors: Vec<Investor>,
    pub milestones: Vec<Milestone>,
    pub documents: Vec<Document>,
}

/// Response for `GET /portal/{token}`.
#[derive(Debug, Serialize)]
pub struct PortalView {
    /// `"founder"` or `"accountant"`.
    #[serde(rename = "type")]
    pub party: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founder: Option<FounderView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accountant: Option<AccountantView>,
    pub deal: PortalDeal,
}

/// Request body for `POST /portal/{token}`.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub data: ActionData,
}

/// Action-specific payload fields.
#[derive(Debug, Default, Deserialize)]
pub struct ActionData {
    /// `complete_onboarding`: does the founder handle the HMRC submission
    /// themselves?
    pub is_handling_submission: Option<bool>,
    /// `confirm_submission`: the date the compliance statement went in.
    pub submission_date: Option<String>,
}

/// Response for lifecycle actions.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    /// The deal status after the action.
    pub status: String,
}

/// Response for accountant delegation.
#[derive(Debug, Serialize)]
pub struct DelegationResponse {
    pub accountant: Accountant,
    /// Portal URL to hand to the accountant.
    pub magic_link: String,
}

/// Response for document upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document: Document,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/portal/{token}
///
/// Resolve a magic link to its party's view of the deal.
pub async fn get_portal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<PortalView>> {
    let holder = resolve_token(&state, &token).await?;
    let deal_id = holder.deal_id();

    let deal = DealRepo::find_by_id(&state.pool, deal_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Deal",
            id: deal_id,
        }))?;

    let portal_deal = PortalDeal {
        deal,
        founder: FounderRepo::find_by_deal(&state.pool, deal_id).await?,
        accountant: AccountantRepo::find_by_deal(&state.pool, deal_id).await?,
        investors: InvestorRepo::list_by_deal(&state.pool, deal_id).await?,
        milestones: MilestoneRepo::list_by_deal(&state.pool, deal_id).await?,
        documents: DocumentRepo::list_by_deal(&state.pool, deal_id).await?,
    };

    let view = match holder {
        TokenHolder::Founder(f) => PortalView {
            party: "founder",
            founder: Some(FounderView {
                id: f.id,
                name: f.name,
                email: f.email,
                is_handling_submission: f.is_handling_submission,
            }),
            accountant: None,
            deal: portal_deal,
        },
        TokenHolder::Accountant(a) => PortalView {
            party: "accountant",
            founder: None,
            accountant: Some(AccountantView {
                id: a.id,
                firm_name: a.firm_name,
                contact_name: a.contact_name,
                email: a.email,
            }),
            deal: portal_deal,
        },
    };

    Ok(Json(view))
}

/// POST /api/v1/portal/{token}
///
/// Perform a named lifecycle action as the token's party.
pub async fn post_action(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ActionRequest>,
) -> AppResult<Json<ActionResponse>> {
    let holder = resolve_token(&state, &token).await?;
    let deal_id = holder.deal_id();

    let action = PortalAction::parse(&input.action).map_err(AppError::Core)?;

    let deal = DealRepo::find_by_id(&state.pool, deal_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Deal",
            id: deal_id,
        }))?;
    let current = DealStatus::parse(&deal.status).map_err(AppError::Core)?;

    let Transition { next, milestone } =
        apply_action(current, action).map_err(AppError::Core)?;

    // Onboarding records whether the founder or their accountant will file
    // with HMRC.
    if action == PortalAction::CompleteOnboarding {
        if let TokenHolder::Founder(ref founder) = holder {
            let handling = input.data.is_handling_submission.unwrap_or(true);
            FounderRepo::set_handling_submission(&state.pool, founder.id, handling).await?;
        }
    }

    // The submission date travels in the milestone's notes field.
    let notes = match action {
        PortalAction::ConfirmSubmission => input.data.submission_date.as_deref(),
        _ => None,
    };

    MilestoneRepo::create(
        &state.pool,
        deal_id,
        milestone.as_str(),
        holder.party().as_str(),
        notes,
    )
    .await?;

    DealRepo::set_status(&state.pool, deal_id, next.as_str()).await?;

    tracing::info!(
        deal_id,
        action = %input.action,
        party = holder.party().as_str(),
        status = next.as_str(),
        "Lifecycle action applied"
    );

    Ok(Json(ActionResponse {
        success: true,
        status: next.as_str().to_string(),
    }))
}

/// POST /api/v1/portal/{token}/accountant
///
/// Founder delegates the HMRC submission to an accountant: creates the
/// accountant with a freshly minted token and clears the founder's
/// self-service flag, atomically. Only founder tokens may call this.
pub async fn add_accountant(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<CreateAccountant>,
) -> AppResult<(StatusCode, Json<DelegationResponse>)> {
    let founder = FounderRepo::find_by_token(&state.pool, &token)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidToken))?;
    check_expiry(founder.token_expires_at, Utc::now()).map_err(AppError::Core)?;

    require_field(&input.firm_name, "firm_name").map_err(AppError::Core)?;
    require_field(&input.contact_name, "contact_name").map_err(AppError::Core)?;
    require_field(&input.email, "email").map_err(AppError::Core)?;

    let issued = issue_token(Utc::now());
    let email = normalize_email(&input.email);

    let accountant = AccountantRepo::create_with_delegation(
        &state.pool,
        founder.deal_id,
        founder.id,
        &input,
        &email,
        &issued.token,
        issued.expires_at,
    )
    .await?;

    tracing::info!(
        deal_id = founder.deal_id,
        accountant_id = accountant.id,
        "Submission delegated to accountant"
    );

    let magic_link = portal_link(&state.config.app_base_url, Party::Accountant, &issued.token);

    Ok((
        StatusCode::CREATED,
        Json(DelegationResponse {
            accountant,
            magic_link,
        }),
    ))
}

/// POST /api/v1/portal/{token}/upload
///
/// Multipart upload of a tagged document. An `EIS2` upload additionally
/// appends an `EIS2_UPLOADED` milestone and advances the deal to
/// `EIS2_RECEIVED`.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(token): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let holder = resolve_token(&state, &token).await?;
    let deal_id = holder.deal_id();

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("document_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                document_type = Some(value);
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;
    let document_type =
        document_type.ok_or_else(|| AppError::BadRequest("No document type provided".into()))?;
    validate_document_type(&document_type).map_err(AppError::Core)?;

    // Work out the EIS2 transition before writing anything, so a rejected
    // transition leaves neither a file nor a document row behind.
    let eis2_transition: Option<Transition> = if document_type == DOC_EIS2 {
        let deal = DealRepo::find_by_id(&state.pool, deal_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Deal",
                id: deal_id,
            }))?;
        let current = DealStatus::parse(&deal.status).map_err(AppError::Core)?;
        Some(apply_eis2_upload(current).map_err(AppError::Core)?)
    } else {
        None
    };

    let storage_path = state
        .uploads
        .save(deal_id, &filename, &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let document = DocumentRepo::create(
        &state.pool,
        &CreateDocument {
            deal_id,
            document_type: document_type.clone(),
            filename,
            storage_path: storage_path.to_string_lossy().into_owned(),
            uploaded_by: holder.party().as_str().to_string(),
        },
    )
    .await?;

    if let Some(Transition { next, milestone }) = eis2_transition {
        MilestoneRepo::create(
            &state.pool,
            deal_id,
            milestone.as_str(),
            holder.party().as_str(),
            None,
        )
        .await?;
        DealRepo::set_status(&state.pool, deal_id, next.as_str()).await?;
    }

    tracing::info!(
        deal_id,
        document_id = document.id,
        document_type = %document.document_type,
        party = holder.party().as_str(),
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { document })))
}
