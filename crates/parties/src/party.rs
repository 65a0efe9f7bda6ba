use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{Aggregate, AggregateRoot, DomainError, Event};

innkeep_core::typed_id!(PartyId, "Party identifier.");

/// Party kind: natural person or organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Person,
    Organization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "other")]
    Other,
}

/// Contact mechanism type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Phone,
    Mobile,
    Email,
    Website,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMechanism {
    pub kind: ContactKind,
    pub value: String,
}

/// Official identifier (passport, national id, tax code, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyIdentifier {
    pub kind: String,
    pub code: String,
}

/// Aggregate root: Party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    id: PartyId,
    kind: PartyKind,
    name: String,
    lastname: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<Gender>,
    identifiers: Vec<PartyIdentifier>,
    contact_mechanisms: Vec<ContactMechanism>,
    version: u64,
    created: bool,
}

impl Party {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: PartyId) -> Self {
        Self {
            id,
            kind: PartyKind::Person,
            name: String::new(),
            lastname: None,
            date_of_birth: None,
            gender: None,
            identifiers: Vec::new(),
            contact_mechanisms: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> PartyId {
        self.id
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    pub fn is_person(&self) -> bool {
        self.kind == PartyKind::Person
    }

    /// First name for people, legal name for organisations.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lastname(&self) -> Option<&str> {
        self.lastname.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn identifiers(&self) -> &[PartyIdentifier] {
        &self.identifiers
    }

    pub fn contact_mechanisms(&self) -> &[ContactMechanism] {
        &self.contact_mechanisms
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterParty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterParty {
    pub party_id: PartyId,
    pub kind: PartyKind,
    pub name: String,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateDetails. `None` keeps the existing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetails {
    pub party_id: PartyId,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddIdentifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIdentifier {
    pub party_id: PartyId,
    pub identifier: PartyIdentifier,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddContactMechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddContactMechanism {
    pub party_id: PartyId,
    pub mechanism: ContactMechanism,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyCommand {
    RegisterParty(RegisterParty),
    UpdateDetails(UpdateDetails),
    AddIdentifier(AddIdentifier),
    AddContactMechanism(AddContactMechanism),
}

impl PartyCommand {
    pub fn party_id(&self) -> PartyId {
        match self {
            PartyCommand::RegisterParty(c) => c.party_id,
            PartyCommand::UpdateDetails(c) => c.party_id,
            PartyCommand::AddIdentifier(c) => c.party_id,
            PartyCommand::AddContactMechanism(c) => c.party_id,
        }
    }
}

/// Event: PartyRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRegistered {
    pub party_id: PartyId,
    pub kind: PartyKind,
    pub name: String,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PartyUpdated (full snapshot of the editable details).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyUpdated {
    pub party_id: PartyId,
    pub name: String,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: IdentifierAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierAdded {
    pub party_id: PartyId,
    pub identifier: PartyIdentifier,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ContactMechanismAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMechanismAdded {
    pub party_id: PartyId,
    pub mechanism: ContactMechanism,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyEvent {
    PartyRegistered(PartyRegistered),
    PartyUpdated(PartyUpdated),
    IdentifierAdded(IdentifierAdded),
    ContactMechanismAdded(ContactMechanismAdded),
}

impl Event for PartyEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PartyEvent::PartyRegistered(_) => "parties.party.registered",
            PartyEvent::PartyUpdated(_) => "parties.party.updated",
            PartyEvent::IdentifierAdded(_) => "parties.party.identifier_added",
            PartyEvent::ContactMechanismAdded(_) => "parties.party.contact_added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PartyEvent::PartyRegistered(e) => e.occurred_at,
            PartyEvent::PartyUpdated(e) => e.occurred_at,
            PartyEvent::IdentifierAdded(e) => e.occurred_at,
            PartyEvent::ContactMechanismAdded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Party {
    type Command = PartyCommand;
    type Event = PartyEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PartyEvent::PartyRegistered(e) => {
                self.id = e.party_id;
                self.kind = e.kind;
                self.name = e.name.clone();
                self.lastname = e.lastname.clone();
                self.date_of_birth = e.date_of_birth;
                self.gender = e.gender;
                self.created = true;
            }
            PartyEvent::PartyUpdated(e) => {
                self.name = e.name.clone();
                self.lastname = e.lastname.clone();
                self.date_of_birth = e.date_of_birth;
                self.gender = e.gender;
            }
            PartyEvent::IdentifierAdded(e) => {
                self.identifiers.push(e.identifier.clone());
            }
            PartyEvent::ContactMechanismAdded(e) => {
                self.contact_mechanisms.push(e.mechanism.clone());
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PartyCommand::RegisterParty(cmd) => self.handle_register(cmd),
            PartyCommand::UpdateDetails(cmd) => self.handle_update(cmd),
            PartyCommand::AddIdentifier(cmd) => self.handle_add_identifier(cmd),
            PartyCommand::AddContactMechanism(cmd) => self.handle_add_contact(cmd),
        }
    }
}

impl Party {
    fn ensure_created(&self, party_id: PartyId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("party {party_id}")));
        }
        if self.id != party_id {
            return Err(DomainError::invariant("party_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterParty) -> Result<Vec<PartyEvent>, DomainError> {
        if self.created {
            return Err(DomainError::uniqueness("party already exists"));
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![PartyEvent::PartyRegistered(PartyRegistered {
            party_id: cmd.party_id,
            kind: cmd.kind,
            name: cmd.name.clone(),
            lastname: cmd.lastname.clone(),
            date_of_birth: cmd.date_of_birth,
            gender: cmd.gender,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateDetails) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        let name = cmd.name.clone().unwrap_or_else(|| self.name.clone());
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![PartyEvent::PartyUpdated(PartyUpdated {
            party_id: cmd.party_id,
            name,
            lastname: cmd.lastname.clone().or_else(|| self.lastname.clone()),
            date_of_birth: cmd.date_of_birth.or(self.date_of_birth),
            gender: cmd.gender.or(self.gender),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_identifier(&self, cmd: &AddIdentifier) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        if cmd.identifier.code.trim().is_empty() {
            return Err(DomainError::validation("identifier code cannot be empty"));
        }

        Ok(vec![PartyEvent::IdentifierAdded(IdentifierAdded {
            party_id: cmd.party_id,
            identifier: cmd.identifier.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_contact(
        &self,
        cmd: &AddContactMechanism,
    ) -> Result<Vec<PartyEvent>, DomainError> {
        self.ensure_created(cmd.party_id)?;

        if cmd.mechanism.value.trim().is_empty() {
            return Err(DomainError::validation("contact value cannot be empty"));
        }

        Ok(vec![PartyEvent::ContactMechanismAdded(ContactMechanismAdded {
            party_id: cmd.party_id,
            mechanism: cmd.mechanism.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn register_cmd(party_id: PartyId) -> RegisterParty {
        RegisterParty {
            party_id,
            kind: PartyKind::Person,
            name: "Ana".to_string(),
            lastname: Some("Lopez".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
            gender: Some(Gender::Female),
            occurred_at: test_time(),
        }
    }

    fn registered_party() -> Party {
        let party_id = PartyId::generate();
        let mut party = Party::empty(party_id);
        party
            .execute(&PartyCommand::RegisterParty(register_cmd(party_id)))
            .unwrap();
        party
    }

    #[test]
    fn register_party_emits_party_registered_event() {
        let party_id = PartyId::generate();
        let party = Party::empty(party_id);

        let events = party
            .handle(&PartyCommand::RegisterParty(register_cmd(party_id)))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            PartyEvent::PartyRegistered(e) => {
                assert_eq!(e.party_id, party_id);
                assert_eq!(e.kind, PartyKind::Person);
                assert_eq!(e.name, "Ana");
                assert_eq!(e.lastname.as_deref(), Some("Lopez"));
            }
            _ => panic!("Expected PartyRegistered event"),
        }
    }

    #[test]
    fn register_party_rejects_empty_name() {
        let party_id = PartyId::generate();
        let party = Party::empty(party_id);
        let mut cmd = register_cmd(party_id);
        cmd.name = "   ".to_string();

        let err = party.handle(&PartyCommand::RegisterParty(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn register_party_rejects_duplicate_creation() {
        let party = registered_party();
        let err = party
            .handle(&PartyCommand::RegisterParty(register_cmd(party.id_typed())))
            .unwrap_err();
        assert!(matches!(err, DomainError::UniquenessViolation(_)));
    }

    #[test]
    fn update_details_keeps_unspecified_fields() {
        let mut party = registered_party();
        let cmd = UpdateDetails {
            party_id: party.id_typed(),
            name: None,
            lastname: Some("Lopez Garcia".to_string()),
            date_of_birth: None,
            gender: None,
            occurred_at: test_time(),
        };

        party.execute(&PartyCommand::UpdateDetails(cmd)).unwrap();
        assert_eq!(party.name(), "Ana");
        assert_eq!(party.lastname(), Some("Lopez Garcia"));
        assert_eq!(party.gender(), Some(Gender::Female));
        assert_eq!(party.date_of_birth(), NaiveDate::from_ymd_opt(1990, 5, 17));
    }

    #[test]
    fn identifiers_and_contacts_keep_insertion_order() {
        let mut party = registered_party();
        let party_id = party.id_typed();

        for code in ["X123", "Y456"] {
            party
                .execute(&PartyCommand::AddIdentifier(AddIdentifier {
                    party_id,
                    identifier: PartyIdentifier {
                        kind: "passport".to_string(),
                        code: code.to_string(),
                    },
                    occurred_at: test_time(),
                }))
                .unwrap();
        }
        party
            .execute(&PartyCommand::AddContactMechanism(AddContactMechanism {
                party_id,
                mechanism: ContactMechanism {
                    kind: ContactKind::Mobile,
                    value: "+34 600 000 000".to_string(),
                },
                occurred_at: test_time(),
            }))
            .unwrap();

        let codes: Vec<_> = party.identifiers().iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["X123", "Y456"]);
        assert_eq!(party.contact_mechanisms()[0].kind, ContactKind::Mobile);
    }

    #[test]
    fn commands_on_unregistered_party_are_not_found() {
        let party_id = PartyId::generate();
        let party = Party::empty(party_id);
        let cmd = AddIdentifier {
            party_id,
            identifier: PartyIdentifier {
                kind: "passport".to_string(),
                code: "X1".to_string(),
            },
            occurred_at: test_time(),
        };

        let err = party.handle(&PartyCommand::AddIdentifier(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn version_increments_on_apply() {
        let party = registered_party();
        assert_eq!(party.version(), 1);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let party = registered_party();
        let before = party.clone();
        let cmd = PartyCommand::UpdateDetails(UpdateDetails {
            party_id: party.id_typed(),
            name: Some("Anabel".to_string()),
            lastname: None,
            date_of_birth: None,
            gender: None,
            occurred_at: test_time(),
        });

        let events1 = party.handle(&cmd).unwrap();
        let events2 = party.handle(&cmd).unwrap();
        assert_eq!(party, before);
        assert_eq!(events1, events2);
    }
}
