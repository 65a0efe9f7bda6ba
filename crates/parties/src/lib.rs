//! Party directory domain module (people and organisations).
//!
//! The front desk reads guests' demographic data (names, identifiers, contact
//! mechanisms, date of birth, gender) from here. Implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod party;

pub use party::{
    AddContactMechanism, AddIdentifier, ContactKind, ContactMechanism, ContactMechanismAdded,
    Gender, IdentifierAdded, Party, PartyCommand, PartyEvent, PartyId, PartyIdentifier,
    PartyKind, PartyRegistered, PartyUpdated, RegisterParty, UpdateDetails,
};
