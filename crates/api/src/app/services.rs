use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use innkeep_core::Money;
use innkeep_hotel::RoomType;
use innkeep_infra::{
    FrontDesk, InMemoryHotelStore, InMemoryPartyDirectory, InMemoryProductCatalog, NewRoom,
    RegistryError,
};
use innkeep_parties::{
    AddContactMechanism, AddIdentifier, ContactMechanism, Party, PartyCommand, PartyId,
    PartyIdentifier, RegisterParty,
};
use innkeep_products::{
    ArchiveProduct, ChangeListPrice, CreateProduct, Product, ProductCommand, ProductId,
};

use crate::app::dto;

pub type Desk =
    FrontDesk<Arc<InMemoryHotelStore>, Arc<InMemoryPartyDirectory>, Arc<InMemoryProductCatalog>>;

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Debug)]
pub struct AppServices {
    pub desk: Desk,
    pub parties: Arc<InMemoryPartyDirectory>,
    pub products: Arc<InMemoryProductCatalog>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        let parties = Arc::new(InMemoryPartyDirectory::new());
        let products = Arc::new(InMemoryProductCatalog::new());
        let desk = FrontDesk::new(
            Arc::new(InMemoryHotelStore::new()),
            parties.clone(),
            products.clone(),
        );

        Self {
            desk,
            parties,
            products,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Register a party with its identifiers and contact mechanisms.
    pub fn register_party(&self, req: dto::RegisterPartyRequest) -> Result<Party, RegistryError> {
        let party_id = PartyId::generate();
        let now = Utc::now();

        let mut party = self.parties.dispatch(
            party_id,
            &PartyCommand::RegisterParty(RegisterParty {
                party_id,
                kind: req.kind,
                name: req.name,
                lastname: req.lastname,
                date_of_birth: req.date_of_birth,
                gender: req.gender,
                occurred_at: now,
            }),
            Party::empty,
        )?;

        for identifier in req.identifiers {
            party = self.add_identifier(party_id, identifier)?;
        }
        for mechanism in req.contact_mechanisms {
            party = self.parties.dispatch(
                party_id,
                &PartyCommand::AddContactMechanism(AddContactMechanism {
                    party_id,
                    mechanism,
                    occurred_at: now,
                }),
                Party::empty,
            )?;
        }

        tracing::info!(%party_id, "party registered");
        Ok(party)
    }

    fn add_identifier(
        &self,
        party_id: PartyId,
        identifier: PartyIdentifier,
    ) -> Result<Party, RegistryError> {
        self.parties.dispatch(
            party_id,
            &PartyCommand::AddIdentifier(AddIdentifier {
                party_id,
                identifier,
                occurred_at: Utc::now(),
            }),
            Party::empty,
        )
    }

    pub fn create_product(&self, req: dto::CreateProductRequest) -> Result<Product, RegistryError> {
        let product_id = ProductId::generate();
        let product = self.products.dispatch(
            product_id,
            &ProductCommand::CreateProduct(CreateProduct {
                product_id,
                sku: req.sku,
                name: req.name,
                list_price: req.list_price,
                occurred_at: Utc::now(),
            }),
            Product::empty,
        )?;

        tracing::info!(%product_id, "product created");
        Ok(product)
    }

    pub fn change_list_price(
        &self,
        product_id: ProductId,
        price: Money,
    ) -> Result<Product, RegistryError> {
        self.products.dispatch(
            product_id,
            &ProductCommand::ChangeListPrice(ChangeListPrice {
                product_id,
                price,
                occurred_at: Utc::now(),
            }),
            Product::empty,
        )
    }

    /// Archived products stay readable but can no longer be charged on a service.
    pub fn archive_product(&self, product_id: ProductId) -> Result<Product, RegistryError> {
        let product = self.products.dispatch(
            product_id,
            &ProductCommand::ArchiveProduct(ArchiveProduct {
                product_id,
                occurred_at: Utc::now(),
            }),
            Product::empty,
        )?;

        tracing::info!(%product_id, "product archived");
        Ok(product)
    }

    /// Small demo inventory: three rooms and a minibar product.
    pub fn seed_demo(&self) -> anyhow::Result<()> {
        let rooms = [
            ("101", "Simple room", RoomType::Simple, 1, 6_000),
            ("102", "Double room", RoomType::Double, 2, 9_000),
            ("201", "Matrimonial suite", RoomType::Matrimonial, 2, 14_000),
        ];

        for (number, name, room_type, max_guests, price) in rooms {
            let product = self.create_product(dto::CreateProductRequest {
                sku: format!("ROOM-{number}"),
                name: name.to_string(),
                list_price: Some(Money::new(price)),
            })?;
            self.desk.register_room(NewRoom {
                product_id: product.id_typed(),
                room_number: number.to_string(),
                room_type,
                max_guests,
            })?;
        }

        self.create_product(dto::CreateProductRequest {
            sku: "MINIBAR".to_string(),
            name: "Minibar".to_string(),
            list_price: Some(Money::new(500)),
        })?;

        tracing::debug!(rooms = rooms.len(), "demo inventory seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_hotel::ProductCatalog;
    use innkeep_parties::{ContactKind, PartyKind};

    #[test]
    fn register_party_applies_identifiers_and_contacts() {
        let services = AppServices::in_memory();
        let party = services
            .register_party(dto::RegisterPartyRequest {
                kind: PartyKind::Person,
                name: "Ana".to_string(),
                lastname: Some("Lopez".to_string()),
                date_of_birth: None,
                gender: None,
                identifiers: vec![PartyIdentifier {
                    kind: "passport".to_string(),
                    code: "XK-991".to_string(),
                }],
                contact_mechanisms: vec![ContactMechanism {
                    kind: ContactKind::Mobile,
                    value: "+34 600 111 222".to_string(),
                }],
            })
            .unwrap();

        assert_eq!(party.identifiers().len(), 1);
        assert_eq!(party.contact_mechanisms().len(), 1);
    }

    #[test]
    fn seed_demo_registers_free_rooms() {
        let services = AppServices::in_memory();
        services.seed_demo().unwrap();

        let rooms = services
            .desk
            .list_rooms(&innkeep_infra::RoomFilter::default())
            .unwrap();
        assert_eq!(rooms.len(), 3);
        assert!(rooms.iter().all(|r| r.price.is_some()));
        assert!(services.desk.catalog().list_price(rooms[0].product_id).is_some());
    }
}
