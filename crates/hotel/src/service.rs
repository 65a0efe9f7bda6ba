//! Per-stay service ledger: a charge container per reservation and its itemised lines.
//!
//! Totals, refund and debt are computed on read from the lines; only `total_price` is
//! stored, and the engine refreshes it whenever the lines change.

use serde::{Deserialize, Serialize};

use innkeep_core::{DomainError, DomainResult, Entity, Money, Workflow};
use innkeep_products::ProductId;

use crate::reservation::ReservationId;

innkeep_core::typed_id!(ServiceId, "Service (charge container) identifier.");
innkeep_core::typed_id!(ServiceLineId, "Service line identifier.");

/// Prefix of generated service names.
pub const SERVICE_NAME_PREFIX: &str = "SRVC-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Draft,
    Open,
    Closed,
}

impl core::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ServiceState::Draft => "draft",
            ServiceState::Open => "open",
            ServiceState::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl Workflow for ServiceState {
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (ServiceState::Draft, ServiceState::Open),
        (ServiceState::Open, ServiceState::Closed),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub reservation_id: ReservationId,
    pub payment: Money,
    pub total_price: Money,
    pub state: ServiceState,
}

impl Service {
    /// Open charge container for a reservation being checked in. The name is left blank
    /// and filled by [`Service::assign_name`] when the record is created.
    pub fn open_for(reservation_id: ReservationId, total_price: Money) -> Self {
        Self {
            id: ServiceId::generate(),
            name: String::new(),
            reservation_id,
            payment: Money::ZERO,
            total_price,
            state: ServiceState::Open,
        }
    }

    /// Creation hook: "SRVC-<reservation id>".
    pub fn assign_name(&mut self) {
        self.name = format!("{SERVICE_NAME_PREFIX}{}", self.reservation_id);
    }

    pub fn is_closed(&self) -> bool {
        self.state == ServiceState::Closed
    }

    pub fn close(&mut self) -> DomainResult<()> {
        self.state = self.state.transition_to(ServiceState::Closed)?;
        Ok(())
    }

    /// Lines and payment can only change while the service is not closed.
    pub fn ensure_editable(&self) -> DomainResult<()> {
        if self.is_closed() {
            return Err(DomainError::invariant(format!(
                "service {} is closed",
                self.name
            )));
        }
        Ok(())
    }

    pub fn record_payment(&mut self, amount: Money) -> DomainResult<()> {
        self.ensure_editable()?;
        self.payment = amount;
        Ok(())
    }

    /// Refresh the stored `total_price` from the current lines.
    pub fn recompute_total(&mut self, lines: &[ServiceLine]) {
        self.total_price = total(lines);
    }

    pub fn totals(&self, lines: &[ServiceLine]) -> ServiceTotals {
        ServiceTotals::compute(self.payment, lines)
    }
}

impl Entity for Service {
    type Id = ServiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sum of line prices; zero without lines.
pub fn total(lines: &[ServiceLine]) -> Money {
    lines.iter().map(ServiceLine::price).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTotals {
    pub total: Money,
    pub total_price: Money,
    pub refund: Money,
    pub indebt: Money,
}

impl ServiceTotals {
    pub fn compute(payment: Money, lines: &[ServiceLine]) -> Self {
        let total = total(lines);
        Self {
            total,
            total_price: total,
            refund: refund(payment, total),
            indebt: indebt(payment, total),
        }
    }
}

/// Overpayment to give back: `payment - total` when the guest paid more, else zero.
pub fn refund(payment: Money, total: Money) -> Money {
    if payment > total {
        payment.saturating_sub(total)
    } else {
        Money::ZERO
    }
}

// No formula for the outstanding balance has been agreed yet.
pub fn indebt(_payment: Money, _total: Money) -> Money {
    Money::ZERO
}

/// One billable item on a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub id: ServiceLineId,
    pub service_id: ServiceId,
    pub product_id: ProductId,
    pub qty: u32,
    /// Zero means "not set"; filled from the catalog by [`ServiceLine::resolve_unit_price`].
    pub unit_price: Money,
}

impl ServiceLine {
    pub fn new(service_id: ServiceId, product_id: ProductId) -> Self {
        Self {
            id: ServiceLineId::generate(),
            service_id,
            product_id,
            qty: 1,
            unit_price: Money::ZERO,
        }
    }

    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    pub fn with_unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.qty == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }

    /// Fill an unset unit price with the current catalog price.
    pub fn resolve_unit_price(&mut self, catalog_price: Option<Money>) {
        if self.unit_price.is_zero() {
            if let Some(price) = catalog_price {
                self.unit_price = price;
            }
        }
    }

    pub fn price(&self) -> Money {
        self.unit_price.times(self.qty)
    }

    /// Lines have no state of their own.
    pub fn status(&self, service: &Service) -> ServiceState {
        service.state
    }
}

impl Entity for ServiceLine {
    type Id = ServiceLineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub line_id: ServiceLineId,
    pub product_id: ProductId,
    pub qty: u32,
    pub unit_price: Money,
    pub price: Money,
    pub status: ServiceState,
}

/// Read view of a service with its lines and computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatement {
    pub service: Service,
    pub lines: Vec<StatementLine>,
    pub totals: ServiceTotals,
}

impl ServiceStatement {
    pub fn build(service: Service, lines: &[ServiceLine]) -> Self {
        let statement_lines = lines
            .iter()
            .map(|line| StatementLine {
                line_id: line.id,
                product_id: line.product_id,
                qty: line.qty,
                unit_price: line.unit_price,
                price: line.price(),
                status: line.status(&service),
            })
            .collect();
        let totals = service.totals(lines);

        Self {
            service,
            lines: statement_lines,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service() -> Service {
        Service::open_for(ReservationId::generate(), Money::ZERO)
    }

    fn line(service: &Service, qty: u32, unit_price: u64) -> ServiceLine {
        ServiceLine::new(service.id, ProductId::generate())
            .with_qty(qty)
            .with_unit_price(Money::new(unit_price))
    }

    #[test]
    fn assigned_name_carries_reservation_id() {
        let mut service = service();
        assert!(service.name.is_empty());
        service.assign_name();
        assert_eq!(service.name, format!("SRVC-{}", service.reservation_id));
    }

    #[test]
    fn unset_unit_price_comes_from_catalog() {
        let service = service();
        let mut line = ServiceLine::new(service.id, ProductId::generate()).with_qty(2);
        line.resolve_unit_price(Some(Money::new(5_000)));
        assert_eq!(line.unit_price, Money::new(5_000));
        assert_eq!(line.price(), Money::new(10_000));
    }

    #[test]
    fn explicit_unit_price_wins_over_catalog() {
        let service = service();
        let mut line = line(&service, 1, 3_000);
        line.resolve_unit_price(Some(Money::new(5_000)));
        assert_eq!(line.price(), Money::new(3_000));
    }

    #[test]
    fn empty_service_totals_are_zero() {
        let totals = service().totals(&[]);
        assert_eq!(totals.total, Money::ZERO);
        assert_eq!(totals.total_price, Money::ZERO);
        assert_eq!(totals.refund, Money::ZERO);
    }

    #[test]
    fn refund_only_on_overpayment() {
        assert_eq!(refund(Money::new(15_000), Money::new(12_000)), Money::new(3_000));
        assert_eq!(refund(Money::new(12_000), Money::new(12_000)), Money::ZERO);
        assert_eq!(refund(Money::new(100), Money::new(12_000)), Money::ZERO);
        assert_eq!(refund(Money::new(100), Money::ZERO), Money::new(100));
    }

    #[test]
    fn indebt_is_always_zero() {
        assert_eq!(indebt(Money::ZERO, Money::new(12_000)), Money::ZERO);
    }

    #[test]
    fn closed_service_rejects_payment_and_second_close() {
        let mut service = service();
        service.close().unwrap();
        assert!(matches!(
            service.record_payment(Money::new(1)).unwrap_err(),
            DomainError::InvariantViolation(_)
        ));
        assert!(matches!(
            service.close().unwrap_err(),
            DomainError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn line_status_mirrors_service_state() {
        let mut service = service();
        let line = line(&service, 1, 100);
        assert_eq!(line.status(&service), ServiceState::Open);
        service.close().unwrap();
        assert_eq!(line.status(&service), ServiceState::Closed);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let service = service();
        assert!(line(&service, 0, 100).validate().is_err());
    }

    #[test]
    fn statement_lists_lines_with_prices() {
        let mut service = service();
        let lines = vec![line(&service, 1, 12_000), line(&service, 3, 450)];
        service.recompute_total(&lines);
        service.record_payment(Money::new(14_000)).unwrap();

        let statement = ServiceStatement::build(service, &lines);
        assert_eq!(statement.service.total_price, Money::new(13_350));
        assert_eq!(statement.lines[1].price, Money::new(1_350));
        assert_eq!(statement.totals.total, Money::new(13_350));
        assert_eq!(statement.totals.refund, Money::new(650));
    }

    proptest! {
        #[test]
        fn total_is_sum_of_line_prices(items in prop::collection::vec((1u32..20, 0u64..100_000), 0..12)) {
            let service = service();
            let lines: Vec<ServiceLine> = items
                .iter()
                .map(|&(qty, unit)| line(&service, qty, unit))
                .collect();
            let expected: u64 = items.iter().map(|&(qty, unit)| u64::from(qty) * unit).sum();

            let totals = service.totals(&lines);
            prop_assert_eq!(totals.total, Money::new(expected));
            prop_assert_eq!(totals.total_price, totals.total);
        }
    }
}
