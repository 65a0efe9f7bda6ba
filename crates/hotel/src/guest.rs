use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use innkeep_core::{DomainError, DomainResult, Entity};
use innkeep_parties::{ContactKind, Gender, Party, PartyId};

use crate::search::TextClause;

innkeep_core::typed_id!(GuestId, "Guest identifier.");

/// A person staying at or booking with the hotel, backed by a party record.
///
/// At most one guest exists per party; the store enforces that constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    id: GuestId,
    party_id: PartyId,
    is_admitted: bool,
}

impl Guest {
    /// New guest, admitted by default.
    pub fn new(id: GuestId, party_id: PartyId) -> Self {
        Self {
            id,
            party_id,
            is_admitted: true,
        }
    }

    pub fn with_admitted(mut self, is_admitted: bool) -> Self {
        self.is_admitted = is_admitted;
        self
    }

    pub fn id_typed(&self) -> GuestId {
        self.id
    }

    pub fn party_id(&self) -> PartyId {
        self.party_id
    }

    pub fn is_admitted(&self) -> bool {
        self.is_admitted
    }

    pub fn set_admitted(&mut self, is_admitted: bool) {
        self.is_admitted = is_admitted;
    }

    /// Only natural persons can be registered as guests.
    pub fn ensure_registrable(party: &Party) -> DomainResult<()> {
        if !party.is_person() {
            return Err(DomainError::constraint(format!(
                "party {} is not a natural person",
                party.id_typed()
            )));
        }
        Ok(())
    }

    /// Name search over the party's first and last name.
    pub fn matches_name(party: &Party, clause: &TextClause) -> bool {
        clause.matches_any(&[party.name(), party.lastname().unwrap_or_default()])
    }
}

impl Entity for Guest {
    type Id = GuestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Display fields derived from the guest's party record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub guest_id: GuestId,
    pub party_id: PartyId,
    /// First identifier code, or empty.
    pub reference: String,
    pub rec_name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    /// First mobile contact, or empty.
    pub celphone: String,
    pub is_admitted: bool,
}

impl GuestProfile {
    pub fn derive(guest: &Guest, party: &Party, today: NaiveDate) -> Self {
        Self {
            guest_id: guest.id,
            party_id: guest.party_id,
            reference: reference(party),
            rec_name: rec_name(party),
            age: age_on(party.date_of_birth(), today),
            gender: party.gender(),
            celphone: celphone(party),
            is_admitted: guest.is_admitted,
        }
    }
}

pub fn reference(party: &Party) -> String {
    party
        .identifiers()
        .first()
        .map(|i| i.code.clone())
        .unwrap_or_default()
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    dob.and_then(|dob| today.years_since(dob))
}

pub fn celphone(party: &Party) -> String {
    party
        .contact_mechanisms()
        .iter()
        .find(|c| c.kind == ContactKind::Mobile)
        .map(|c| c.value.clone())
        .unwrap_or_default()
}

/// "lastname, firstname" for people; the legal name otherwise.
pub fn rec_name(party: &Party) -> String {
    if party.is_person() {
        format!("{}, {}", party.lastname().unwrap_or_default(), party.name())
    } else {
        party.name().to_string()
    }
}
