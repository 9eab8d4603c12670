//! End-to-end exercises of the [`Command`]s over an in-memory [`Database`].
//!
//! [`Command`]: service::Command
//! [`Database`]: service::infra::Database

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use common::{
    operations::{
        By, Commit, Insert, Lock, Perform, Select, Transact, Update,
    },
    Date, Handler, Money,
};
use service::{
    command::{
        place_order, ApproveBooking, CancelBooking, CreatePricingRule,
        PlaceOrder, RejectBooking, SaveRenterProfile, SetPricingRuleActive,
    },
    domain::{
        audit, booking, car, payment, renter, rule, Booking, Car, Payment,
        Quote, Rule,
    },
    infra::{
        database,
        gateway::{self, Sandbox},
    },
    query::quote::Estimate,
    read, Config, Service,
};
use tracerr::Traced;

/// Whole persisted state of the [`InMemory`] database.
#[derive(Clone, Debug, Default)]
struct State {
    cars: HashMap<car::Id, Car>,
    profiles: HashMap<renter::Id, renter::Profile>,
    bookings: HashMap<booking::Id, Booking>,
    payments: Vec<Payment>,
    rules: HashMap<rule::Id, Rule>,
    events: Vec<audit::Event>,
}

impl State {
    fn overlaps(&self, sel: &read::booking::Overlapping) -> bool {
        self.bookings.values().any(|b| {
            b.car_id == sel.car_id
                && sel.blocking.statuses().contains(&b.status)
                && b.period.overlaps(&sel.period)
        })
    }

    fn occupied(&self, car_id: car::Id) -> bool {
        self.bookings
            .values()
            .any(|b| b.car_id == car_id && b.is_active())
    }
}

/// In-memory stand-in for the Postgres database.
#[derive(Clone, Debug, Default)]
struct InMemory(Arc<Mutex<State>>);

impl InMemory {
    fn state(&self) -> State {
        self.0.lock().unwrap().clone()
    }
}

/// Transaction over an [`InMemory`] database.
///
/// Writes land into a staged copy and only reach the shared [`State`] on
/// [`Commit`].
#[derive(Debug)]
struct InMemoryTx {
    shared: Arc<Mutex<State>>,
    staged: Mutex<State>,
}

impl Handler<Transact> for InMemory {
    type Ok = InMemoryTx;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(InMemoryTx {
            shared: Arc::clone(&self.0),
            staged: Mutex::new(self.0.lock().unwrap().clone()),
        })
    }
}

macro_rules! impl_select {
    ($db:ty, $by:ty => $what:ty, |$state:ident, $arg:ident| $body:expr) => {
        impl Handler<Select<By<$what, $by>>> for $db {
            type Ok = $what;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<$what, $by>>,
            ) -> Result<Self::Ok, Self::Err> {
                let $arg = by.into_inner();
                let $state = self.view();
                Ok($body)
            }
        }
    };
}

macro_rules! impl_selects {
    ($db:ty) => {
        impl_select!($db, car::Id => Option<Car>, |state, id| {
            state.cars.get(&id).cloned()
        });
        impl_select!($db, renter::Id => Option<renter::Profile>, |state, id| {
            state.profiles.get(&id).cloned()
        });
        impl_select!($db, booking::Id => Option<Booking>, |state, id| {
            state.bookings.get(&id).cloned()
        });
        impl_select!($db, rule::Id => Option<Rule>, |state, id| {
            state.rules.get(&id).cloned()
        });
        impl_select!(
            $db,
            read::rule::Candidates => Vec<Rule>,
            |state, sel| {
                let mut rules = state
                    .rules
                    .values()
                    .filter(|r| r.is_active && r.scope.covers(sel.car_id))
                    .cloned()
                    .collect::<Vec<_>>();
                rules.sort_by_key(|r| r.id);
                rules
            }
        );
        impl_select!(
            $db,
            read::booking::Overlapping => read::booking::Overlaps,
            |state, sel| read::booking::Overlaps(state.overlaps(&sel))
        );
        impl_select!($db, car::Id => read::car::Occupied, |state, id| {
            read::car::Occupied(state.occupied(id))
        });
    };
}

impl InMemory {
    fn view(&self) -> State {
        self.state()
    }
}

impl InMemoryTx {
    fn view(&self) -> State {
        self.staged.lock().unwrap().clone()
    }
}

impl_selects!(InMemory);
impl_selects!(InMemoryTx);

impl Handler<Lock<By<Car, car::Id>>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Handler<Insert<Booking>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(b): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.staged.lock().unwrap().bookings.insert(b.id, b);
        Ok(())
    }
}

impl Handler<Update<Booking>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(b): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.staged.lock().unwrap().bookings.insert(b.id, b);
        Ok(())
    }
}

impl Handler<Insert<Payment>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(p): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.staged.lock().unwrap().payments.push(p);
        Ok(())
    }
}

impl Handler<Update<Car>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(c): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.staged.lock().unwrap().cars.insert(c.id, c);
        Ok(())
    }
}

impl Handler<Insert<Rule>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(r): Insert<Rule>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.staged.lock().unwrap().rules.insert(r.id, r);
        Ok(())
    }
}

impl Handler<Update<Rule>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(r): Update<Rule>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.staged.lock().unwrap().rules.insert(r.id, r);
        Ok(())
    }
}

impl Handler<Update<renter::Profile>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(p): Update<renter::Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .staged
            .lock()
            .unwrap()
            .profiles
            .insert(p.renter_id, p);
        Ok(())
    }
}

impl Handler<Insert<audit::Event>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(e): Insert<audit::Event>,
    ) -> Result<Self::Ok, Self::Err> {
        self.staged.lock().unwrap().events.push(e);
        Ok(())
    }
}

impl Handler<Perform<read::booking::Elapsed>> for InMemoryTx {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(read::booking::Elapsed(today)): Perform<
            read::booking::Elapsed,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.staged.lock().unwrap();
        let mut freed = Vec::new();
        for b in state.bookings.values_mut() {
            if b.status == booking::Status::Confirmed && b.period.end() < today
            {
                b.status = booking::Status::Completed;
                freed.push(b.car_id);
            }
        }
        for car_id in &freed {
            let occupied = state
                .bookings
                .values()
                .any(|b| b.car_id == *car_id && b.is_active());
            if let Some(car) = state.cars.get_mut(car_id) {
                car.status = car.recomputed_status(occupied);
            }
        }
        Ok(freed.len() as u64)
    }
}

impl Handler<Commit> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        *self.shared.lock().unwrap() = self.staged.lock().unwrap().clone();
        Ok(())
    }
}

/// Payment gateway refusing every charge.
#[derive(Clone, Copy, Debug)]
struct Declining;

impl Handler<Perform<gateway::Request>> for Declining {
    type Ok = gateway::Receipt;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Perform<gateway::Request>,
    ) -> Result<Self::Ok, Self::Err> {
        Err(tracerr::new!(gateway::Error::Declined {
            message: "insufficient funds".into(),
        }))
    }
}

fn config() -> Config {
    Config {
        complete_elapsed_bookings: service::task::complete_elapsed_bookings::Config {
            interval: Duration::from_secs(3600),
        },
    }
}

fn date(s: &str) -> Date {
    s.parse().unwrap()
}

fn test_car() -> Car {
    Car {
        id: car::Id::new(),
        make: car::Make::new("Toyota").unwrap(),
        model: car::Model::new("Corolla").unwrap(),
        year: 2021,
        kilometre: 54_000,
        daily_rate: "50NZD".parse::<Money>().unwrap(),
        min_days: 1,
        max_days: 30,
        status: car::Status::Available,
        created_at: car::CreationDateTime::now(),
    }
}

fn test_profile(renter_id: renter::Id) -> renter::Profile {
    renter::Profile {
        renter_id,
        first_name: renter::Name::new("Alice").unwrap(),
        last_name: renter::Name::new("Smith").unwrap(),
        phone: renter::Phone::new("021-555-0123").unwrap(),
        id_document: renter::IdDocument::new("NZ1234567").unwrap(),
    }
}

fn seeded(car: &Car, profile: &renter::Profile) -> InMemory {
    let db = InMemory::default();
    {
        let mut state = db.0.lock().unwrap();
        let _ = state.cars.insert(car.id, car.clone());
        let _ = state.profiles.insert(profile.renter_id, profile.clone());
    }
    db
}

fn order(car_id: car::Id, renter_id: renter::Id) -> PlaceOrder {
    PlaceOrder {
        car_id,
        renter_id,
        start: date("2026-09-10"),
        end: date("2026-09-12"),
        method: payment::Method::PayPal {
            email: "alice@example.com".into(),
        },
    }
}

#[tokio::test]
async fn place_order_persists_booking_payment_and_audit() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let booking = svc.execute(order(car.id, renter_id)).await.unwrap();

    assert_eq!(booking.status, booking::Status::Pending);
    assert_eq!(booking.cost.days, 3);
    assert_eq!(booking.cost.total, "150NZD".parse::<Money>().unwrap());

    let state = db.state();
    assert_eq!(state.bookings.len(), 1);
    assert_eq!(state.cars[&car.id].status, car::Status::Reserved);
    assert_eq!(state.payments.len(), 1);
    let payment = &state.payments[0];
    assert!(payment.ok);
    assert_eq!(payment.booking_id, booking.id);
    assert_eq!(
        payment.txn_id.clone().map(String::from),
        Some(format!("PP-{renter_id}-001")),
    );
    assert_eq!(
        state
            .events
            .iter()
            .map(|e| e.action)
            .collect::<Vec<_>>(),
        vec![audit::Action::CreatePayment, audit::Action::CreateBooking],
    );
}

#[tokio::test]
async fn place_order_rejects_overlapping_period() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let _ = svc.execute(order(car.id, renter_id)).await.unwrap();
    let err = svc
        .execute(PlaceOrder {
            start: date("2026-09-12"),
            end: date("2026-09-14"),
            ..order(car.id, renter_id)
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        place_order::ExecutionError::SlotTaken(_),
    ));
    assert_eq!(db.state().bookings.len(), 1);
    assert_eq!(db.state().payments.len(), 1);
}

#[tokio::test]
async fn declined_charge_persists_nothing() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Declining);

    let err = svc.execute(order(car.id, renter_id)).await.unwrap_err();

    assert!(matches!(
        err.as_ref(),
        place_order::ExecutionError::PaymentDeclined { .. },
    ));
    let state = db.state();
    assert!(state.bookings.is_empty());
    assert!(state.payments.is_empty());
    assert!(state.events.is_empty());
    assert_eq!(state.cars[&car.id].status, car::Status::Available);
}

#[tokio::test]
async fn place_order_requires_profile() {
    let car = test_car();
    let db = InMemory::default();
    let _ = db.0.lock().unwrap().cars.insert(car.id, car.clone());
    let (svc, _bg) = Service::new(config(), db, Sandbox);

    let err = svc
        .execute(order(car.id, renter::Id::new()))
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        place_order::ExecutionError::ProfileRequired(_),
    ));
}

#[tokio::test]
async fn place_order_rejects_reversed_period() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db, Sandbox);

    let err = svc
        .execute(PlaceOrder {
            start: date("2026-09-12"),
            end: date("2026-09-10"),
            ..order(car.id, renter_id)
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        place_order::ExecutionError::InvalidPeriod,
    ));
}

#[tokio::test]
async fn place_order_respects_rentable_range() {
    let mut car = test_car();
    car.min_days = 5;
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db, Sandbox);

    let err = svc.execute(order(car.id, renter_id)).await.unwrap_err();

    assert!(matches!(
        err.as_ref(),
        place_order::ExecutionError::DaysOutOfRange { min: 5, max: 30 },
    ));
}

#[tokio::test]
async fn approved_booking_confirms_and_rejection_frees_the_car() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let operator_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let placed = svc.execute(order(car.id, renter_id)).await.unwrap();
    let approved = svc
        .execute(ApproveBooking {
            actor_id: operator_id,
            booking_id: placed.id,
        })
        .await
        .unwrap();
    assert_eq!(approved.status, booking::Status::Confirmed);
    assert_eq!(db.state().cars[&car.id].status, car::Status::Reserved);

    // A `Confirmed` booking can no longer be rejected.
    let err = svc
        .execute(RejectBooking {
            actor_id: operator_id,
            booking_id: placed.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        service::command::reject_booking::ExecutionError::NotPending(
            booking::Status::Confirmed,
        ),
    ));

    let cancelled = svc
        .execute(CancelBooking {
            actor_id: renter_id,
            booking_id: placed.id,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, booking::Status::Cancelled);
    assert_eq!(db.state().cars[&car.id].status, car::Status::Available);
}

#[tokio::test]
async fn rejected_booking_frees_the_car() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let placed = svc.execute(order(car.id, renter_id)).await.unwrap();
    assert_eq!(db.state().cars[&car.id].status, car::Status::Reserved);

    let rejected = svc
        .execute(RejectBooking {
            actor_id: renter::Id::new(),
            booking_id: placed.id,
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, booking::Status::Cancelled);
    assert_eq!(db.state().cars[&car.id].status, car::Status::Available);
}

#[tokio::test]
async fn estimate_applies_strongest_discount() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = seeded(&car, &test_profile(renter_id));
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let rule = svc
        .execute(CreatePricingRule {
            actor_id: renter::Id::new(),
            name: rule::Name::new("Spring special").unwrap(),
            kind: rule::Kind::Discount,
            amount: rule::Amount::Percent(
                common::Percent::new(rust_decimal::Decimal::TEN).unwrap(),
            ),
            scope: rule::Scope::Global,
            min_days: 1,
            window: rule::Window::default(),
        })
        .await
        .unwrap();

    let quote: Quote = svc
        .execute(Estimate {
            car_id: car.id,
            start: date("2026-09-10"),
            end: date("2026-09-12"),
        })
        .await
        .unwrap();
    assert_eq!(quote.total, "135NZD".parse::<Money>().unwrap());
    assert_eq!(quote.rule_id, Some(rule.id));

    // Deactivated rules stop applying to new quotes.
    let _ = svc
        .execute(SetPricingRuleActive {
            actor_id: renter::Id::new(),
            rule_id: rule.id,
            is_active: false,
        })
        .await
        .unwrap();
    let quote: Quote = svc
        .execute(Estimate {
            car_id: car.id,
            start: date("2026-09-10"),
            end: date("2026-09-12"),
        })
        .await
        .unwrap();
    assert_eq!(quote.total, "150NZD".parse::<Money>().unwrap());
    assert_eq!(quote.rule_id, None);
}

#[tokio::test]
async fn saved_profile_unlocks_ordering() {
    let car = test_car();
    let renter_id = renter::Id::new();
    let db = InMemory::default();
    let _ = db.0.lock().unwrap().cars.insert(car.id, car.clone());
    let (svc, _bg) = Service::new(config(), db.clone(), Sandbox);

    let profile = test_profile(renter_id);
    let _ = svc
        .execute(SaveRenterProfile {
            renter_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone: profile.phone,
            id_document: profile.id_document,
        })
        .await
        .unwrap();

    let booking = svc.execute(order(car.id, renter_id)).await.unwrap();
    assert_eq!(
        booking.renter.first_name,
        renter::Name::new("Alice").unwrap(),
    );
}
