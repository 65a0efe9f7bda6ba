use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use innkeep_core::Money;
use innkeep_hotel::{GuestId, ReservationId, ReservationState, SearchOperator, TextClause};
use innkeep_parties::{ContactMechanism, Gender, Party, PartyId, PartyIdentifier, PartyKind};
use innkeep_products::{ListPrice, Product, ProductId, ProductStatus};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterPartyRequest {
    pub kind: PartyKind,
    pub name: String,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub identifiers: Vec<PartyIdentifier>,
    #[serde(default)]
    pub contact_mechanisms: Vec<ContactMechanism>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub list_price: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePriceRequest {
    pub price: Money,
}

#[derive(Debug, Deserialize)]
pub struct RegisterGuestRequest {
    pub party_id: PartyId,
    pub is_admitted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GuestAdmissionRequest {
    pub is_admitted: bool,
}

#[derive(Debug, Deserialize)]
pub struct GuestSearchQuery {
    pub name: Option<String>,
    /// `=`, `!=`, `ilike`, `not ilike`; substring search when omitted.
    pub op: Option<String>,
}

impl GuestSearchQuery {
    pub fn clause(&self) -> Result<Option<TextClause>, axum::response::Response> {
        text_clause(self.name.as_deref(), self.op.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct RoomListQuery {
    #[serde(default)]
    pub free: bool,
    pub q: Option<String>,
    pub op: Option<String>,
}

impl RoomListQuery {
    pub fn clause(&self) -> Result<Option<TextClause>, axum::response::Response> {
        text_clause(self.q.as_deref(), self.op.as_deref())
    }
}

fn text_clause(
    value: Option<&str>,
    op: Option<&str>,
) -> Result<Option<TextClause>, axum::response::Response> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match op {
        None => Ok(Some(TextClause::contains(value))),
        Some(op) => {
            let operator =
                SearchOperator::parse(op).map_err(errors::domain_error_to_response)?;
            Ok(Some(TextClause::new(operator, value)))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    pub state: Option<ReservationState>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationBatchRequest {
    pub ids: Vec<ReservationId>,
}

#[derive(Debug, Deserialize)]
pub struct AddStayGuestRequest {
    pub guest_id: GuestId,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PartyResponse {
    pub id: PartyId,
    pub kind: PartyKind,
    pub name: String,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub identifiers: Vec<PartyIdentifier>,
    pub contact_mechanisms: Vec<ContactMechanism>,
}

impl From<&Party> for PartyResponse {
    fn from(party: &Party) -> Self {
        Self {
            id: party.id_typed(),
            kind: party.kind(),
            name: party.name().to_string(),
            lastname: party.lastname().map(str::to_string),
            date_of_birth: party.date_of_birth(),
            gender: party.gender(),
            identifiers: party.identifiers().to_vec(),
            contact_mechanisms: party.contact_mechanisms().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub status: ProductStatus,
    pub list_price: Option<Money>,
    pub list_prices: Vec<ListPrice>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            status: product.status(),
            list_price: product.list_price(),
            list_prices: product.list_prices().to_vec(),
        }
    }
}
