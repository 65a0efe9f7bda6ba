use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{Aggregate, AggregateRoot, DomainError, Event, Money};

innkeep_core::typed_id!(ProductId, "Catalog product identifier.");

/// Product status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Archived,
}

/// One entry of a product's list price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPrice {
    pub price: Money,
    pub active: bool,
    pub effective_from: DateTime<Utc>,
}

/// Aggregate root: Product.
///
/// `list_prices` is kept newest first; the current price is the first active entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    status: ProductStatus,
    list_prices: Vec<ListPrice>,
    version: u64,
    created: bool,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            sku: String::new(),
            name: String::new(),
            status: ProductStatus::Active,
            list_prices: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn list_prices(&self) -> &[ListPrice] {
        &self.list_prices
    }

    /// Current list price: first active entry of the price history.
    pub fn list_price(&self) -> Option<Money> {
        self.list_prices.iter().find(|p| p.active).map(|p| p.price)
    }

    /// Archived products cannot be charged anymore.
    pub fn can_be_sold(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub list_price: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeListPrice (new price becomes the current one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeListPrice {
    pub product_id: ProductId,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawListPrice (deactivate the current price; the previous active one applies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawListPrice {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ArchiveProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    ChangeListPrice(ChangeListPrice),
    WithdrawListPrice(WithdrawListPrice),
    ArchiveProduct(ArchiveProduct),
}

impl ProductCommand {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductCommand::CreateProduct(c) => c.product_id,
            ProductCommand::ChangeListPrice(c) => c.product_id,
            ProductCommand::WithdrawListPrice(c) => c.product_id,
            ProductCommand::ArchiveProduct(c) => c.product_id,
        }
    }
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub list_price: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ListPriceChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPriceChanged {
    pub product_id: ProductId,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ListPriceWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPriceWithdrawn {
    pub product_id: ProductId,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductArchived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductArchived {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    ListPriceChanged(ListPriceChanged),
    ListPriceWithdrawn(ListPriceWithdrawn),
    ProductArchived(ProductArchived),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "products.product.created",
            ProductEvent::ListPriceChanged(_) => "products.product.list_price_changed",
            ProductEvent::ListPriceWithdrawn(_) => "products.product.list_price_withdrawn",
            ProductEvent::ProductArchived(_) => "products.product.archived",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::ListPriceChanged(e) => e.occurred_at,
            ProductEvent::ListPriceWithdrawn(e) => e.occurred_at,
            ProductEvent::ProductArchived(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.id = e.product_id;
                self.sku = e.sku.clone();
                self.name = e.name.clone();
                self.status = ProductStatus::Active;
                self.list_prices = e
                    .list_price
                    .map(|price| ListPrice {
                        price,
                        active: true,
                        effective_from: e.occurred_at,
                    })
                    .into_iter()
                    .collect();
                self.created = true;
            }
            ProductEvent::ListPriceChanged(e) => {
                self.list_prices.insert(
                    0,
                    ListPrice {
                        price: e.price,
                        active: true,
                        effective_from: e.occurred_at,
                    },
                );
            }
            ProductEvent::ListPriceWithdrawn(_) => {
                if let Some(current) = self.list_prices.iter_mut().find(|p| p.active) {
                    current.active = false;
                }
            }
            ProductEvent::ProductArchived(_) => {
                self.status = ProductStatus::Archived;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::ChangeListPrice(cmd) => self.handle_change_price(cmd),
            ProductCommand::WithdrawListPrice(cmd) => self.handle_withdraw_price(cmd),
            ProductCommand::ArchiveProduct(cmd) => self.handle_archive(cmd),
        }
    }
}

impl Product {
    fn ensure_product_id(&self, product_id: ProductId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("product {product_id}")));
        }
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::uniqueness("product already exists"));
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if cmd.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }

        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            product_id: cmd.product_id,
            sku: cmd.sku.clone(),
            name: cmd.name.clone(),
            list_price: cmd.list_price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_price(
        &self,
        cmd: &ChangeListPrice,
    ) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;

        if self.status == ProductStatus::Archived {
            return Err(DomainError::invariant("archived products cannot be repriced"));
        }

        Ok(vec![ProductEvent::ListPriceChanged(ListPriceChanged {
            product_id: cmd.product_id,
            price: cmd.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_withdraw_price(
        &self,
        cmd: &WithdrawListPrice,
    ) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;

        let Some(current) = self.list_price() else {
            return Err(DomainError::invariant("product has no active list price"));
        };

        Ok(vec![ProductEvent::ListPriceWithdrawn(ListPriceWithdrawn {
            product_id: cmd.product_id,
            price: current,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_archive(&self, cmd: &ArchiveProduct) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;

        if self.status == ProductStatus::Archived {
            return Err(DomainError::invariant("product is already archived"));
        }

        Ok(vec![ProductEvent::ProductArchived(ProductArchived {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
