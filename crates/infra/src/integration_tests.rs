//! Integration tests for the front-desk pipeline.
//!
//! Tests: Directory/Catalog → FrontDesk → HotelStore
//!
//! Verifies:
//! - check-in/check-out update reservation, room and ledger together
//! - failed transitions leave no partial writes
//! - referential rules (unique guest per party, cascades, restricts)

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::{NaiveDate, Utc};

    use innkeep_core::{DomainError, Money};
    use innkeep_hotel::{
        ReservationChanges, ReservationId, ReservationState, RoomAction, RoomId, RoomState,
        RoomType, ServiceState, TextClause,
    };
    use innkeep_parties::{Party, PartyCommand, PartyId, PartyKind, RegisterParty};
    use innkeep_products::{ArchiveProduct, CreateProduct, Product, ProductCommand, ProductId};

    use crate::front_desk::{FrontDesk, FrontDeskError, NewReservation, NewRoom, NewServiceLine, RoomFilter};
    use crate::registry::{InMemoryPartyDirectory, InMemoryProductCatalog};
    use crate::store::{HotelStore, InMemoryHotelStore};

    type Desk = FrontDesk<
        Arc<InMemoryHotelStore>,
        Arc<InMemoryPartyDirectory>,
        Arc<InMemoryProductCatalog>,
    >;

    fn setup() -> Desk {
        FrontDesk::new(
            Arc::new(InMemoryHotelStore::new()),
            Arc::new(InMemoryPartyDirectory::new()),
            Arc::new(InMemoryProductCatalog::new()),
        )
    }

    fn register_party(desk: &Desk, kind: PartyKind, name: &str) -> PartyId {
        let party_id = PartyId::generate();
        desk.directory()
            .dispatch(
                party_id,
                &PartyCommand::RegisterParty(RegisterParty {
                    party_id,
                    kind,
                    name: name.to_string(),
                    lastname: Some("Lopez".to_string()),
                    date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 2),
                    gender: None,
                    occurred_at: Utc::now(),
                }),
                Party::empty,
            )
            .unwrap();
        party_id
    }

    fn create_product(desk: &Desk, name: &str, price: Option<Money>) -> ProductId {
        let product_id = ProductId::generate();
        desk.catalog()
            .dispatch(
                product_id,
                &ProductCommand::CreateProduct(CreateProduct {
                    product_id,
                    sku: name.to_uppercase(),
                    name: name.to_string(),
                    list_price: price,
                    occurred_at: Utc::now(),
                }),
                Product::empty,
            )
            .unwrap();
        product_id
    }

    fn register_room(desk: &Desk, number: &str, price: u64) -> RoomId {
        let product_id = create_product(desk, "Double room", Some(Money::new(price)));
        desk.register_room(NewRoom {
            product_id,
            room_number: number.to_string(),
            room_type: RoomType::Double,
            max_guests: 2,
        })
        .unwrap()
        .id_typed()
    }

    struct Booking {
        reservation_id: ReservationId,
        room_id: RoomId,
    }

    fn book(desk: &Desk, price: Option<u64>) -> Booking {
        let party_id = register_party(desk, PartyKind::Person, "Ana");
        let guest = desk.register_guest(party_id, true).unwrap();
        let room_id = register_room(desk, "101", 12_000);
        let reservation = desk
            .create_reservation(NewReservation {
                room_id,
                reserved_by: guest.id_typed(),
                price: price.map(Money::new),
                observations: String::new(),
            })
            .unwrap();
        Booking {
            reservation_id: reservation.id_typed(),
            room_id,
        }
    }

    fn domain_error(err: FrontDeskError) -> DomainError {
        match err {
            FrontDeskError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn reservation_price_defaults_to_room_catalog_price() {
        let desk = setup();
        let booking = book(&desk, None);
        let reservation = desk.reservation(booking.reservation_id).unwrap();
        assert_eq!(reservation.price(), Money::new(12_000));
        assert_eq!(reservation.state(), ReservationState::Draft);
    }

    #[test]
    fn open_takes_room_and_creates_stay_ledger() {
        let desk = setup();
        let booking = book(&desk, Some(9_500));

        let opened = desk.open_reservations(&[booking.reservation_id]).unwrap();
        assert_eq!(opened.len(), 1);

        let reservation = desk.reservation(booking.reservation_id).unwrap();
        assert_eq!(reservation.state(), ReservationState::Open);
        assert!(reservation.check_in().is_some());
        assert_eq!(desk.room(booking.room_id).unwrap().state(), RoomState::Taken);

        let view = desk.reservation_view(booking.reservation_id).unwrap();
        assert_eq!(view.stay_guests.len(), 1);
        assert_eq!(view.stay_guests[0].guest_id, reservation.reserved_by());
        assert_eq!(view.stay_guests[0].reservation_id, booking.reservation_id);
        assert_eq!(view.services.len(), 1);

        let statement = desk.service_statement(view.services[0]).unwrap();
        assert_eq!(statement.service.total_price, Money::new(9_500));
        assert_eq!(statement.service.state, ServiceState::Open);
        assert_eq!(
            statement.service.name,
            format!("SRVC-{}", booking.reservation_id)
        );
        assert_eq!(statement.lines.len(), 1);
        assert_eq!(statement.lines[0].qty, 1);
        assert_eq!(statement.lines[0].unit_price, Money::new(9_500));
        assert_eq!(
            statement.lines[0].product_id,
            desk.room(booking.room_id).unwrap().product_id()
        );
    }

    #[test]
    fn companions_can_join_until_checkout() {
        let desk = setup();
        let booking = book(&desk, Some(9_500));
        desk.open_reservations(&[booking.reservation_id]).unwrap();

        let companion = register_party(&desk, PartyKind::Person, "Luis");
        let companion = desk.register_guest(companion, true).unwrap();
        let stay = desk
            .add_stay_guest(booking.reservation_id, companion.id_typed())
            .unwrap();
        assert_eq!(stay.guest_id, companion.id_typed());
        assert_eq!(
            desk.reservation_view(booking.reservation_id)
                .unwrap()
                .stay_guests
                .len(),
            2
        );

        desk.close_reservations(&[booking.reservation_id]).unwrap();
        let late = register_party(&desk, PartyKind::Person, "Eva");
        let late = desk.register_guest(late, true).unwrap();
        let err = desk
            .add_stay_guest(booking.reservation_id, late.id_typed())
            .unwrap_err();
        assert!(matches!(domain_error(err), DomainError::InvariantViolation(_)));
    }

    #[test]
    fn zero_priced_stay_bills_the_room_catalog_price() {
        let desk = setup();
        let booking = book(&desk, Some(0));
        desk.open_reservations(&[booking.reservation_id]).unwrap();

        let view = desk.reservation_view(booking.reservation_id).unwrap();
        let statement = desk.service_statement(view.services[0]).unwrap();
        assert_eq!(statement.lines[0].unit_price, Money::new(12_000));
        assert_eq!(statement.totals.total, Money::new(12_000));
        assert_eq!(statement.service.total_price, Money::new(12_000));
        assert_eq!(view.total_reservation, Money::new(12_000));
    }

    #[test]
    fn checkout_succeeds_after_housekeeping_marked_room_dirty() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        desk.apply_room_action(booking.room_id, RoomAction::ToClean)
            .unwrap();

        desk.close_reservations(&[booking.reservation_id]).unwrap();

        let reservation = desk.reservation(booking.reservation_id).unwrap();
        assert_eq!(reservation.state(), ReservationState::Closed);
        assert_eq!(desk.room(booking.room_id).unwrap().state(), RoomState::ToClean);
    }

    #[test]
    fn checkout_after_room_was_freed_still_leaves_it_dirty() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        desk.apply_room_action(booking.room_id, RoomAction::ToClean)
            .unwrap();
        desk.apply_room_action(booking.room_id, RoomAction::Free)
            .unwrap();

        desk.close_reservations(&[booking.reservation_id]).unwrap();

        assert_eq!(desk.room(booking.room_id).unwrap().state(), RoomState::ToClean);
        assert_eq!(
            desk.reservation(booking.reservation_id).unwrap().state(),
            ReservationState::Closed
        );
    }

    #[test]
    fn admission_flag_can_be_toggled() {
        let desk = setup();
        let party_id = register_party(&desk, PartyKind::Person, "Nora");
        let guest = desk.register_guest(party_id, true).unwrap();

        let barred = desk.set_guest_admission(guest.id_typed(), false).unwrap();
        assert!(!barred.is_admitted());
        assert!(!desk.guest(guest.id_typed()).unwrap().is_admitted());

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(!desk.guest_profile(guest.id_typed(), today).unwrap().is_admitted);
    }

    #[test]
    fn reservations_can_be_listed_by_state() {
        let desk = setup();
        let first = book(&desk, Some(9_000));
        desk.open_reservations(&[first.reservation_id]).unwrap();

        let party_id = register_party(&desk, PartyKind::Person, "Pablo");
        let guest = desk.register_guest(party_id, true).unwrap();
        let room_id = register_room(&desk, "202", 8_000);
        let second = desk
            .create_reservation(NewReservation {
                room_id,
                reserved_by: guest.id_typed(),
                price: None,
                observations: String::new(),
            })
            .unwrap();

        let all = desk.list_reservations(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.reservation_id);

        let drafts = desk.list_reservations(Some(ReservationState::Draft)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, second.id_typed());
        assert_eq!(drafts[0].price, Money::new(8_000));
    }

    #[test]
    fn close_cleans_room_and_closes_first_service() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.open_reservations(&[booking.reservation_id]).unwrap();

        desk.close_reservations(&[booking.reservation_id]).unwrap();

        let reservation = desk.reservation(booking.reservation_id).unwrap();
        assert_eq!(reservation.state(), ReservationState::Closed);
        assert!(reservation.check_out().is_some());
        assert_eq!(desk.room(booking.room_id).unwrap().state(), RoomState::ToClean);

        let view = desk.reservation_view(booking.reservation_id).unwrap();
        let statement = desk.service_statement(view.services[0]).unwrap();
        assert_eq!(statement.service.state, ServiceState::Closed);
        assert!(statement.lines.iter().all(|l| l.status == ServiceState::Closed));
    }

    #[test]
    fn open_and_close_reject_out_of_order_requests() {
        let desk = setup();
        let booking = book(&desk, None);

        let err = domain_error(desk.close_reservations(&[booking.reservation_id]).unwrap_err());
        assert_eq!(err, DomainError::invalid_transition("draft", "closed"));

        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let err = domain_error(desk.open_reservations(&[booking.reservation_id]).unwrap_err());
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn failed_batch_open_leaves_earlier_reservations_untouched() {
        let desk = setup();
        let first = book(&desk, None);

        // Second reservation's room is disabled after booking.
        let second = book(&desk, None);
        desk.apply_room_action(second.room_id, RoomAction::Disabled)
            .unwrap();

        let err = domain_error(
            desk.open_reservations(&[first.reservation_id, second.reservation_id])
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::DomainConstraint(_)));

        let reservation = desk.reservation(first.reservation_id).unwrap();
        assert_eq!(reservation.state(), ReservationState::Draft);
        assert!(reservation.check_in().is_none());
        assert_eq!(desk.room(first.room_id).unwrap().state(), RoomState::Free);

        let view = desk.reservation_view(first.reservation_id).unwrap();
        assert!(view.stay_guests.is_empty());
        assert!(view.services.is_empty());
    }

    #[test]
    fn concurrent_opens_of_the_same_room_admit_one() {
        let desk = Arc::new(setup());
        let booking = book(&desk, None);

        let party_id = register_party(&desk, PartyKind::Person, "Luis");
        let guest = desk.register_guest(party_id, true).unwrap();
        let rival = desk
            .create_reservation(NewReservation {
                room_id: booking.room_id,
                reserved_by: guest.id_typed(),
                price: None,
                observations: String::new(),
            })
            .unwrap();

        let handles: Vec<_> = [booking.reservation_id, rival.id_typed()]
            .into_iter()
            .map(|id| {
                let desk = desk.clone();
                thread::spawn(move || desk.open_reservations(&[id]).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(desk.room(booking.room_id).unwrap().state(), RoomState::Taken);
    }

    #[test]
    fn reservation_requires_a_free_room() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.apply_room_action(booking.room_id, RoomAction::Disabled)
            .unwrap();

        let reservation = desk.reservation(booking.reservation_id).unwrap();
        let err = domain_error(
            desk.create_reservation(NewReservation {
                room_id: booking.room_id,
                reserved_by: reservation.reserved_by(),
                price: None,
                observations: String::new(),
            })
            .unwrap_err(),
        );
        assert!(matches!(err, DomainError::DomainConstraint(_)));
    }

    #[test]
    fn extra_line_takes_catalog_price() {
        let desk = setup();
        let booking = book(&desk, Some(12_000));
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let service_id = desk.reservation_view(booking.reservation_id).unwrap().services[0];

        let minibar = create_product(&desk, "Minibar", Some(Money::new(5_000)));
        let line = desk
            .add_service_line(
                service_id,
                NewServiceLine {
                    product_id: minibar,
                    qty: Some(2),
                    unit_price: None,
                },
            )
            .unwrap();
        assert_eq!(line.unit_price, Money::new(5_000));
        assert_eq!(line.price(), Money::new(10_000));

        let statement = desk.service_statement(service_id).unwrap();
        assert_eq!(statement.totals.total, Money::new(22_000));
        assert_eq!(statement.service.total_price, Money::new(22_000));

        desk.remove_service_line(service_id, line.id).unwrap();
        let statement = desk.service_statement(service_id).unwrap();
        assert_eq!(statement.totals.total, Money::new(12_000));
    }

    #[test]
    fn archived_products_cannot_be_charged() {
        let desk = setup();
        let booking = book(&desk, Some(12_000));
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let service_id = desk.reservation_view(booking.reservation_id).unwrap().services[0];

        let laundry = create_product(&desk, "Laundry", Some(Money::new(800)));
        desk.catalog()
            .dispatch(
                laundry,
                &ProductCommand::ArchiveProduct(ArchiveProduct {
                    product_id: laundry,
                    occurred_at: Utc::now(),
                }),
                Product::empty,
            )
            .unwrap();

        let err = desk
            .add_service_line(
                service_id,
                NewServiceLine {
                    product_id: laundry,
                    qty: None,
                    unit_price: None,
                },
            )
            .unwrap_err();
        assert!(matches!(domain_error(err), DomainError::DomainConstraint(_)));
        assert_eq!(desk.service_statement(service_id).unwrap().lines.len(), 1);
    }

    #[test]
    fn total_reservation_sums_service_totals() {
        let desk = setup();
        let booking = book(&desk, Some(12_000));
        assert_eq!(
            desk.reservation_view(booking.reservation_id)
                .unwrap()
                .total_reservation,
            Money::ZERO
        );

        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let view = desk.reservation_view(booking.reservation_id).unwrap();
        assert_eq!(view.total_reservation, Money::new(12_000));
    }

    #[test]
    fn payment_and_lines_are_locked_after_checkout() {
        let desk = setup();
        let booking = book(&desk, Some(12_000));
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let service_id = desk.reservation_view(booking.reservation_id).unwrap().services[0];

        let service = desk.record_payment(service_id, Money::new(15_000)).unwrap();
        assert_eq!(service.payment, Money::new(15_000));
        let statement = desk.service_statement(service_id).unwrap();
        assert_eq!(statement.totals.refund, Money::new(3_000));
        assert_eq!(statement.totals.indebt, Money::ZERO);

        desk.close_reservations(&[booking.reservation_id]).unwrap();
        let err = domain_error(desk.record_payment(service_id, Money::new(1)).unwrap_err());
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let laundry = create_product(&desk, "Laundry", Some(Money::new(800)));
        let err = domain_error(
            desk.add_service_line(
                service_id,
                NewServiceLine {
                    product_id: laundry,
                    qty: None,
                    unit_price: None,
                },
            )
            .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn second_guest_for_same_party_is_a_uniqueness_violation() {
        let desk = setup();
        let party_id = register_party(&desk, PartyKind::Person, "Ana");
        desk.register_guest(party_id, true).unwrap();

        let err = domain_error(desk.register_guest(party_id, true).unwrap_err());
        assert!(matches!(err, DomainError::UniquenessViolation(_)));
    }

    #[test]
    fn guests_must_be_known_natural_persons() {
        let desk = setup();
        let err = domain_error(desk.register_guest(PartyId::generate(), true).unwrap_err());
        assert!(matches!(err, DomainError::NotFound(_)));

        let org = register_party(&desk, PartyKind::Organization, "Acme Travel");
        let err = domain_error(desk.register_guest(org, true).unwrap_err());
        assert!(matches!(err, DomainError::DomainConstraint(_)));
    }

    #[test]
    fn guest_search_matches_first_or_last_name() {
        let desk = setup();
        let ana = register_party(&desk, PartyKind::Person, "Ana");
        let luis = register_party(&desk, PartyKind::Person, "Luis");
        desk.register_guest(ana, true).unwrap();
        desk.register_guest(luis, false).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let found = desk
            .search_guests(Some(&TextClause::contains("ana")), today)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rec_name, "Lopez, Ana");
        assert_eq!(found[0].age, Some(39));

        let everyone = desk
            .search_guests(Some(&TextClause::contains("lopez")), today)
            .unwrap();
        assert_eq!(everyone.len(), 2);
    }

    #[test]
    fn deleting_open_reservation_is_rejected_closed_one_cascades() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let service_id = desk.reservation_view(booking.reservation_id).unwrap().services[0];

        let err = domain_error(desk.delete_reservation(booking.reservation_id).unwrap_err());
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        desk.close_reservations(&[booking.reservation_id]).unwrap();
        desk.delete_reservation(booking.reservation_id).unwrap();

        let err = domain_error(desk.service_statement(service_id).unwrap_err());
        assert!(matches!(err, DomainError::NotFound(_)));
        let leftovers = desk
            .store()
            .read(|t| t.stay_guests_of(booking.reservation_id).len() + t.lines_of(service_id).len())
            .unwrap();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn referenced_guest_cannot_be_removed() {
        let desk = setup();
        let booking = book(&desk, None);
        let guest_id = desk.reservation(booking.reservation_id).unwrap().reserved_by();

        let err = domain_error(desk.remove_guest(guest_id).unwrap_err());
        assert!(matches!(err, DomainError::DomainConstraint(_)));

        desk.delete_reservation(booking.reservation_id).unwrap();
        desk.remove_guest(guest_id).unwrap();
        assert!(desk.guest(guest_id).is_err());
    }

    #[test]
    fn room_fields_freeze_after_checkin_but_notes_do_not() {
        let desk = setup();
        let booking = book(&desk, None);
        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let other_room = register_room(&desk, "202", 8_000);

        let err = domain_error(
            desk.change_reservation(
                booking.reservation_id,
                ReservationChanges {
                    room_id: Some(other_room),
                    ..Default::default()
                },
            )
            .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let reservation = desk
            .change_reservation(
                booking.reservation_id,
                ReservationChanges {
                    observations: Some("extra towels".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(reservation.observations(), "extra towels");
    }

    #[test]
    fn free_room_listing_hides_taken_rooms() {
        let desk = setup();
        let booking = book(&desk, None);
        register_room(&desk, "202", 8_000);

        let filter = RoomFilter {
            free_only: true,
            text: None,
        };
        assert_eq!(desk.list_rooms(&filter).unwrap().len(), 2);

        desk.open_reservations(&[booking.reservation_id]).unwrap();
        let free = desk.list_rooms(&filter).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].room_number, "202");
        assert_eq!(free[0].rec_name, "[202] - Double room");
        assert_eq!(free[0].price, Some(Money::new(8_000)));

        let by_number = desk
            .list_rooms(&RoomFilter {
                free_only: false,
                text: Some(TextClause::contains("10")),
            })
            .unwrap();
        assert_eq!(by_number.len(), 1);
    }
}
