//! Storage tests against an in-memory SQLite database with the real migrations

mod common;

use admission_engine::config::Config;
use admission_engine::contract::*;
use admission_engine::domain::registration::build_guest;
use admission_engine::domain::repository::{
    AttendeeRepository, SeatingRepository, TicketFormRepository,
};
use admission_engine::infra::storage::migrations::Migrator;
use admission_engine::infra::storage::repositories::{
    SeaOrmAttendeeRepository, SeaOrmSeatingRepository, SeaOrmTicketFormRepository,
};
use admission_engine::AdmissionEngineModule;
use chrono::Utc;
use common::{gala_form, print_test_header, purchaser_answers, TABLE_ITEM};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// One shared connection so every query sees the same in-memory database
async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .expect("Failed to open in-memory database")
}

struct Storage {
    forms: SeaOrmTicketFormRepository,
    attendees: SeaOrmAttendeeRepository,
    seating: SeaOrmSeatingRepository,
}

impl Storage {
    async fn new() -> Self {
        let db = connect().await;
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        let db = Arc::new(db);

        Self {
            forms: SeaOrmTicketFormRepository::new(db.clone()),
            attendees: SeaOrmAttendeeRepository::new(db.clone()),
            seating: SeaOrmSeatingRepository::new(db),
        }
    }

    async fn form(&self) -> TicketForm {
        self.forms
            .save_ticket_form(&gala_form())
            .await
            .expect("Failed to save form")
    }

    async fn configuration(&self, form_id: Uuid, name: &str) -> SeatingConfiguration {
        self.seating
            .create_configuration(&SeatingConfiguration {
                id: Uuid::new_v4(),
                form_id,
                name: name.to_string(),
                is_active: false,
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to create configuration")
    }
}

fn primary(form_id: Uuid) -> Attendee {
    Attendee {
        id: Uuid::new_v4(),
        form_id,
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        ticket_type_summary: "Table of 8 x1".to_string(),
        registered_at: Utc::now(),
        payment_status: PaymentStatus::Paid,
        transaction_id: Some("txn_1".to_string()),
        qr_payload: "qr-primary".to_string(),
        is_primary: true,
        primary_attendee_id: None,
        invoice_id: Uuid::new_v4(),
        total_seats: Some(8),
        donation_type: Some(DonationType::Seats),
        donated_seats: 2,
        donated_tables: 0,
        dietary_preference: Some("vegan".to_string()),
        answers: purchaser_answers("Ada Lovelace", "ada@example.com"),
        assigned_table_id: None,
        assigned_seat: None,
        is_test: false,
    }
}

fn guests_of(primary: &Attendee, count: usize) -> Vec<Attendee> {
    let now = primary.registered_at;
    (1..=count)
        .map(|n| {
            let details = GuestDetails {
                name: format!("Guest {n}"),
                email: format!("guest{n}@example.com"),
                dietary_preference: None,
            };
            build_guest(primary, &details, now)
        })
        .collect()
}

fn table(label: &str, capacity: u32) -> SeatingTable {
    SeatingTable {
        id: Uuid::new_v4(),
        form_id: Uuid::nil(),
        configuration_id: Uuid::nil(),
        label: label.to_string(),
        capacity,
        shape: TableShape::Round,
        position: Position { x: 10.0, y: 20.0 },
        vip: false,
        issued_seats: 0,
    }
}

fn seat(configuration_id: Uuid, table_id: Uuid, seat_number: u32) -> SeatingAssignment {
    SeatingAssignment {
        configuration_id,
        attendee_id: Uuid::new_v4(),
        table_id,
        seat_number,
    }
}

fn plan(
    configuration: &SeatingConfiguration,
    tables: Vec<SeatingTable>,
    assignments: Vec<SeatingAssignment>,
) -> SeatingPlan {
    SeatingPlan {
        form_id: configuration.form_id,
        configuration_id: configuration.id,
        tables,
        assignments,
    }
}

// ===== Attendees =====

#[tokio::test]
async fn test_registration_rows_keep_slot_order() {
    let storage = Storage::new().await;

    print_test_header(
        "test_registration_rows_keep_slot_order",
        &["A primary and its guests written together read back in slot order with every field intact."],
    );

    println!("\n📝 Stage 1: Insert a registration");
    let form = storage.form().await;
    let primary = primary(form.id);
    let guests = guests_of(&primary, 5);
    storage
        .attendees
        .insert_registration(&primary, &guests)
        .await
        .expect("Failed to insert registration");

    println!("\n📝 Stage 2: Read it back");
    let stored = storage.attendees.get_attendee(primary.id).await.unwrap().unwrap();
    assert_eq!(stored.total_seats, Some(8));
    assert_eq!(stored.donation_type, Some(DonationType::Seats));
    assert_eq!(stored.donated_seats, 2);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
    assert_eq!(stored.answers, primary.answers);
    assert_eq!(stored.dietary_preference.as_deref(), Some("vegan"));

    let listed = storage.attendees.list_guests_of(primary.id).await.unwrap();
    assert_eq!(
        listed.iter().map(|g| g.id).collect::<Vec<_>>(),
        guests.iter().map(|g| g.id).collect::<Vec<_>>()
    );
    assert!(listed.iter().all(|g| g.invoice_id == primary.invoice_id));

    println!("\n📝 Stage 3: Update one guest in place");
    let mut renamed = listed[2].clone();
    renamed.name = "Grace Hopper".to_string();
    storage.attendees.upsert_attendee(&renamed).await.unwrap();

    let all = storage.attendees.list_by_form(form.id).await.unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(
        storage.attendees.get_attendee(renamed.id).await.unwrap().unwrap().name,
        "Grace Hopper"
    );
}

#[tokio::test]
async fn test_failed_registration_insert_writes_nothing() {
    let storage = Storage::new().await;

    let form = storage.form().await;
    let primary = primary(form.id);
    let mut guests = guests_of(&primary, 3);
    guests[2].id = guests[0].id;

    let result = storage.attendees.insert_registration(&primary, &guests).await;

    assert!(result.is_err());
    assert!(storage.attendees.list_by_form(form.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_seat_count_beyond_column_range_is_refused() {
    let storage = Storage::new().await;

    let form = storage.form().await;
    let mut primary = primary(form.id);
    primary.total_seats = Some(u32::MAX);

    let result = storage.attendees.insert_registration(&primary, &[]).await;

    assert!(result.is_err());
    assert!(storage.attendees.get_attendee(primary.id).await.unwrap().is_none());
}

// ===== Seating =====

#[tokio::test]
async fn test_removing_table_deletes_its_assignments() {
    let storage = Storage::new().await;

    print_test_header(
        "test_removing_table_deletes_its_assignments",
        &["Saving a plan without a table removes the table row and every seat issued at it."],
    );

    let form = storage.form().await;
    let configuration = storage.configuration(form.id, "Ballroom").await;

    println!("\n📝 Stage 1: Two tables, three guests");
    let (first, second) = (table("Table 1", 4), table("Table 2", 4));
    let seated = vec![
        seat(configuration.id, first.id, 1),
        seat(configuration.id, first.id, 2),
        seat(configuration.id, second.id, 1),
    ];
    storage
        .seating
        .save_plan(&plan(&configuration, vec![first.clone(), second.clone()], seated.clone()))
        .await
        .expect("Failed to save plan");
    assert_eq!(
        storage.seating.list_assignments(form.id, configuration.id).await.unwrap().len(),
        3
    );

    println!("\n📝 Stage 2: Drop the first table");
    storage
        .seating
        .save_plan(&plan(&configuration, vec![second.clone()], vec![seated[2]]))
        .await
        .expect("Failed to save plan");

    let tables = storage.seating.list_tables(form.id, configuration.id).await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].id, second.id);
    assert_eq!(tables[0].form_id, form.id);
    assert_eq!(tables[0].position, Position { x: 10.0, y: 20.0 });

    let assignments = storage.seating.list_assignments(form.id, configuration.id).await.unwrap();
    assert_eq!(assignments, vec![seated[2]]);
}

#[tokio::test]
async fn test_saving_assignments_replaces_full_set() {
    let storage = Storage::new().await;

    print_test_header(
        "test_saving_assignments_replaces_full_set",
        &["Each save leaves exactly the plan's assignments; other layouts are untouched."],
    );

    let form = storage.form().await;
    let ballroom = storage.configuration(form.id, "Ballroom").await;
    let garden = storage.configuration(form.id, "Garden").await;
    let head = table("Head table", 6);
    let patio = table("Patio", 2);

    storage
        .seating
        .save_plan(&plan(&garden, vec![patio.clone()], vec![seat(garden.id, patio.id, 1)]))
        .await
        .unwrap();

    println!("\n📝 Stage 1: Seat three guests");
    let initial: Vec<_> = (1..=3).map(|n| seat(ballroom.id, head.id, n)).collect();
    storage
        .seating
        .save_plan(&plan(&ballroom, vec![head.clone()], initial))
        .await
        .unwrap();

    println!("\n📝 Stage 2: Save a different pair");
    let replacement = vec![seat(ballroom.id, head.id, 4), seat(ballroom.id, head.id, 5)];
    storage
        .seating
        .save_plan(&plan(&ballroom, vec![head.clone()], replacement.clone()))
        .await
        .unwrap();

    let stored = storage.seating.list_assignments(form.id, ballroom.id).await.unwrap();
    assert_eq!(stored, replacement);
    assert_eq!(
        storage.seating.list_assignments(form.id, garden.id).await.unwrap().len(),
        1
    );

    println!("\n📝 Stage 3: Save an empty set");
    storage
        .seating
        .save_plan(&plan(&ballroom, vec![head], Vec::new()))
        .await
        .unwrap();
    assert!(storage
        .seating
        .list_assignments(form.id, ballroom.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_failed_plan_save_rolls_back_table_changes() {
    let storage = Storage::new().await;

    print_test_header(
        "test_failed_plan_save_rolls_back_table_changes",
        &["When the assignments cannot be written, the table edits of the same save are undone."],
    );

    let form = storage.form().await;
    let configuration = storage.configuration(form.id, "Ballroom").await;
    let original = table("Table 1", 4);
    let kept_seat = seat(configuration.id, original.id, 1);
    storage
        .seating
        .save_plan(&plan(&configuration, vec![original.clone()], vec![kept_seat]))
        .await
        .unwrap();

    println!("\n📝 Stage 1: Rename, add a table and issue one seat twice");
    let mut renamed = original.clone();
    renamed.label = "Renamed".to_string();
    let added = table("Table 2", 2);
    let clashing = vec![
        seat(configuration.id, original.id, 1),
        seat(configuration.id, original.id, 1),
    ];
    let result = storage
        .seating
        .save_plan(&plan(&configuration, vec![renamed, added], clashing))
        .await;
    assert!(result.is_err());

    println!("\n📝 Stage 2: Stored plan is unchanged");
    let tables = storage.seating.list_tables(form.id, configuration.id).await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].label, "Table 1");
    assert_eq!(
        storage.seating.list_assignments(form.id, configuration.id).await.unwrap(),
        vec![kept_seat]
    );
}

#[tokio::test]
async fn test_assignments_are_scoped_to_form() {
    let storage = Storage::new().await;

    let form = storage.form().await;
    let configuration = storage.configuration(form.id, "Ballroom").await;
    let head = table("Head table", 4);
    storage
        .seating
        .save_plan(&plan(&configuration, vec![head.clone()], vec![seat(configuration.id, head.id, 1)]))
        .await
        .unwrap();

    let other_form = Uuid::new_v4();
    assert!(storage
        .seating
        .list_assignments(other_form, configuration.id)
        .await
        .unwrap()
        .is_empty());
    assert!(storage
        .seating
        .get_configuration(other_form, configuration.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_single_active_configuration() {
    let storage = Storage::new().await;

    let form = storage.form().await;
    let first = storage.configuration(form.id, "Ballroom").await;
    let second = storage.configuration(form.id, "Garden").await;

    storage.seating.set_active_configuration(form.id, first.id).await.unwrap();
    storage.seating.set_active_configuration(form.id, second.id).await.unwrap();

    let configurations = storage.seating.list_configurations(form.id).await.unwrap();
    let active: Vec<_> = configurations.iter().filter(|c| c.is_active).map(|c| c.id).collect();
    assert_eq!(active, vec![second.id]);
}

// ===== Module =====

#[tokio::test]
async fn test_module_checkout_and_referral_on_sqlite() {
    print_test_header(
        "test_module_checkout_and_referral_on_sqlite",
        &["Migrate, init and drive a checkout plus a referral through the in-process client."],
    );

    let db = connect().await;
    let module = AdmissionEngineModule::new(Config::default());
    module.migrate(&db).await.expect("Failed to migrate");
    module.init(Arc::new(db)).await.expect("Failed to init");
    let client = module.client().expect("Client not available");

    println!("\n📝 Stage 1: Check out a table");
    let form = client.save_ticket_form(gala_form()).await.unwrap();
    let outcome = client
        .checkout(CheckoutRequest {
            form_id: form.id,
            quantities: HashMap::from([(TABLE_ITEM.to_string(), 1)]),
            promo_code: None,
            donation: DonationChoice::None,
            guest_slots: Vec::new(),
            answers: purchaser_answers("Ada Lovelace", "ada@example.com"),
            payment: None,
            is_test: false,
        })
        .await
        .unwrap();
    assert_eq!(outcome.guests.len(), 7);

    println!("\n📝 Stage 2: Claim a placeholder, then add a guest on the purchaser's link");
    let placeholder = outcome.guests[3].id;
    let claimed = client
        .submit_guest_registration(
            form.id,
            &placeholder.to_string(),
            GuestDetails {
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                dietary_preference: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(claimed.id, placeholder);

    let added = client
        .submit_guest_registration(
            form.id,
            &outcome.primary.id.to_string(),
            GuestDetails {
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                dietary_preference: None,
            },
        )
        .await
        .unwrap();
    assert!(outcome.guests.iter().all(|g| g.id != added.id));

    let status = client
        .resolve_referral(form.id, &outcome.primary.id.to_string())
        .await
        .unwrap();
    assert_eq!(status.total_seats, 8);
    assert_eq!(status.remaining_seats, 5);
}
