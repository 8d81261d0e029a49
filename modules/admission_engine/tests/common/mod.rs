//! Common test utilities: in-memory repositories, notifiers and a gala fixture
#![allow(dead_code)]

use admission_engine::config::Config;
use admission_engine::contract::*;
use admission_engine::domain::repository::{
    AttendeeRepository, SeatingRepository, TicketFormRepository,
};
use admission_engine::domain::{Notification, NotificationDispatcher, NotificationError, Service};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Mock repositories =====

pub mod mocks {
    use super::*;

    #[derive(Clone, Default)]
    pub struct MockFormRepo {
        data: Arc<RwLock<HashMap<Uuid, TicketForm>>>,
        reads: Arc<AtomicUsize>,
    }

    impl MockFormRepo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of form lookups served so far
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TicketFormRepository for MockFormRepo {
        async fn get_ticket_form(&self, form_id: Uuid) -> anyhow::Result<Option<TicketForm>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.read().get(&form_id).cloned())
        }

        async fn save_ticket_form(&self, form: &TicketForm) -> anyhow::Result<TicketForm> {
            self.data.write().insert(form.id, form.clone());
            Ok(form.clone())
        }
    }

    /// Attendees kept in insertion order
    #[derive(Clone, Default)]
    pub struct MockAttendeeRepo {
        data: Arc<RwLock<Vec<Attendee>>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MockAttendeeRepo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every following write fail
        pub fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        pub fn count(&self) -> usize {
            self.data.read().len()
        }

        pub fn all(&self) -> Vec<Attendee> {
            self.data.read().clone()
        }

        pub fn get(&self, id: Uuid) -> Option<Attendee> {
            self.data.read().iter().find(|a| a.id == id).cloned()
        }

        /// Store a record as-is, bypassing the service
        pub fn seed(&self, attendee: Attendee) {
            self.data.write().push(attendee);
        }

        /// Print verbose information about repository state
        pub fn print_state(&self, context: &str) {
            let data = self.data.read();
            println!("\n========== AttendeeRepository State: {} ==========", context);
            println!("Total attendees: {}", data.len());
            for attendee in data.iter() {
                println!(
                    "  {} {:<32} primary={:<5} parent={:?} seat={:?}",
                    attendee.id,
                    attendee.name,
                    attendee.is_primary,
                    attendee.primary_attendee_id,
                    attendee.assigned_seat
                );
            }
            println!("====================================================\n");
        }

        fn check_writable(&self) -> anyhow::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("database is read-only");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AttendeeRepository for MockAttendeeRepo {
        async fn get_attendee(&self, id: Uuid) -> anyhow::Result<Option<Attendee>> {
            Ok(self.get(id))
        }

        async fn list_guests_of(&self, primary_id: Uuid) -> anyhow::Result<Vec<Attendee>> {
            Ok(self
                .data
                .read()
                .iter()
                .filter(|a| !a.is_primary && a.primary_attendee_id == Some(primary_id))
                .cloned()
                .collect())
        }

        async fn list_by_form(&self, form_id: Uuid) -> anyhow::Result<Vec<Attendee>> {
            Ok(self
                .data
                .read()
                .iter()
                .filter(|a| a.form_id == form_id)
                .cloned()
                .collect())
        }

        async fn upsert_attendee(&self, attendee: &Attendee) -> anyhow::Result<Attendee> {
            self.check_writable()?;
            let mut data = self.data.write();
            match data.iter_mut().find(|a| a.id == attendee.id) {
                Some(existing) => *existing = attendee.clone(),
                None => data.push(attendee.clone()),
            }
            Ok(attendee.clone())
        }

        async fn insert_registration(
            &self,
            primary: &Attendee,
            guests: &[Attendee],
        ) -> anyhow::Result<()> {
            self.check_writable()?;
            let mut data = self.data.write();
            data.push(primary.clone());
            data.extend(guests.iter().cloned());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub struct MockSeatingRepo {
        configurations: Arc<RwLock<Vec<SeatingConfiguration>>>,
        tables: Arc<RwLock<Vec<SeatingTable>>>,
        assignments: Arc<RwLock<Vec<SeatingAssignment>>>,
    }

    impl MockSeatingRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn assignment_count(&self, configuration_id: Uuid) -> usize {
            self.assignments
                .read()
                .iter()
                .filter(|a| a.configuration_id == configuration_id)
                .count()
        }
    }

    #[async_trait]
    impl SeatingRepository for MockSeatingRepo {
        async fn create_configuration(
            &self,
            configuration: &SeatingConfiguration,
        ) -> anyhow::Result<SeatingConfiguration> {
            self.configurations.write().push(configuration.clone());
            Ok(configuration.clone())
        }

        async fn get_configuration(
            &self,
            form_id: Uuid,
            configuration_id: Uuid,
        ) -> anyhow::Result<Option<SeatingConfiguration>> {
            Ok(self
                .configurations
                .read()
                .iter()
                .find(|c| c.form_id == form_id && c.id == configuration_id)
                .cloned())
        }

        async fn list_configurations(
            &self,
            form_id: Uuid,
        ) -> anyhow::Result<Vec<SeatingConfiguration>> {
            Ok(self
                .configurations
                .read()
                .iter()
                .filter(|c| c.form_id == form_id)
                .cloned()
                .collect())
        }

        async fn set_active_configuration(
            &self,
            form_id: Uuid,
            configuration_id: Uuid,
        ) -> anyhow::Result<()> {
            for configuration in self
                .configurations
                .write()
                .iter_mut()
                .filter(|c| c.form_id == form_id)
            {
                configuration.is_active = configuration.id == configuration_id;
            }
            Ok(())
        }

        async fn save_plan(&self, plan: &SeatingPlan) -> anyhow::Result<()> {
            let configuration_id = plan.configuration_id;
            let mut tables = self.tables.write();
            let mut assignments = self.assignments.write();

            tables.retain(|t| t.configuration_id != configuration_id);
            tables.extend(plan.tables.iter().cloned().map(|mut t| {
                t.form_id = plan.form_id;
                t.configuration_id = configuration_id;
                t
            }));
            assignments.retain(|a| a.configuration_id != configuration_id);
            assignments.extend_from_slice(&plan.assignments);
            Ok(())
        }

        async fn list_tables(
            &self,
            form_id: Uuid,
            configuration_id: Uuid,
        ) -> anyhow::Result<Vec<SeatingTable>> {
            Ok(self
                .tables
                .read()
                .iter()
                .filter(|t| t.form_id == form_id && t.configuration_id == configuration_id)
                .cloned()
                .collect())
        }

        async fn list_assignments(
            &self,
            _form_id: Uuid,
            configuration_id: Uuid,
        ) -> anyhow::Result<Vec<SeatingAssignment>> {
            Ok(self
                .assignments
                .read()
                .iter()
                .filter(|a| a.configuration_id == configuration_id)
                .copied()
                .collect())
        }
    }
}

// ===== Notifiers =====

/// Records every message it is asked to send
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.read().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.read().iter().map(|n| n.to.clone()).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.write().push(notification.clone());
        Ok(())
    }
}

/// Fails every delivery
#[derive(Clone, Default)]
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery {
            to: notification.to.clone(),
            reason: "mailbox unavailable".to_string(),
        })
    }
}

// ===== Fixture =====

pub const TABLE_ITEM: &str = "table-8";
pub const GA_ITEM: &str = "ga";

/// Service wired to in-memory repositories
pub struct TestHarness {
    pub service: Arc<Service>,
    pub forms: Arc<mocks::MockFormRepo>,
    pub attendees: Arc<mocks::MockAttendeeRepo>,
    pub seating: Arc<mocks::MockSeatingRepo>,
    pub notifier: RecordingDispatcher,
    pub form: TicketForm,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with(Config::default(), None).await
    }

    /// Harness with a custom config and, optionally, a dispatcher other than the recorder
    pub async fn with(config: Config, dispatcher: Option<Arc<dyn NotificationDispatcher>>) -> Self {
        let forms = Arc::new(mocks::MockFormRepo::new());
        let attendees = Arc::new(mocks::MockAttendeeRepo::new());
        let seating = Arc::new(mocks::MockSeatingRepo::new());
        let notifier = RecordingDispatcher::default();
        let dispatcher = dispatcher.unwrap_or_else(|| Arc::new(notifier.clone()));

        let service = Arc::new(Service::new(
            forms.clone(),
            attendees.clone(),
            seating.clone(),
            dispatcher,
            config,
        ));

        let form = service
            .save_ticket_form(gala_form())
            .await
            .expect("Failed to save gala form");

        Self {
            service,
            forms,
            attendees,
            seating,
            notifier,
            form,
        }
    }

    /// Cart for the gala form with the given quantities
    pub async fn cart(&self, quantities: &[(&str, u32)], promo: Option<&str>) -> Cart {
        let quantities: HashMap<String, u32> = quantities
            .iter()
            .map(|(id, qty)| (id.to_string(), *qty))
            .collect();
        self.service
            .build_cart(self.form.id, &quantities, promo)
            .await
            .expect("Failed to build cart")
    }

    /// Registration request purchased by Ada Lovelace
    pub fn request(&self, cart: Cart, donation: DonationChoice, slots: Vec<GuestSlot>) -> RegistrationRequest {
        RegistrationRequest {
            form_id: self.form.id,
            cart,
            donation,
            guest_slots: slots,
            answers: purchaser_answers("Ada Lovelace", "ada@example.com"),
            payment: Some(PaymentResult {
                succeeded: true,
                transaction_id: Some("txn_123".to_string()),
                amount: Decimal::ZERO,
            }),
            is_test: false,
        }
    }

    /// Finalize a one-table purchase with no named guests
    pub async fn register_table(&self) -> RegistrationOutcome {
        let cart = self.cart(&[(TABLE_ITEM, 1)], None).await;
        self.service
            .finalize_registration(self.request(cart, DonationChoice::None, Vec::new()))
            .await
            .expect("Failed to finalize registration")
    }
}

pub fn purchaser_answers(name: &str, email: &str) -> FormAnswers {
    HashMap::from([
        ("full_name".to_string(), name.to_string()),
        ("email".to_string(), email.to_string()),
    ])
}

pub fn named_slot(name: &str, email: &str) -> GuestSlot {
    GuestSlot {
        name: name.to_string(),
        email: email.to_string(),
        dietary: None,
        is_purchaser: false,
    }
}

/// Spring gala: tables of 8, general admission, two promo codes
pub fn gala_form() -> TicketForm {
    TicketForm {
        id: Uuid::new_v4(),
        title: "Spring Gala".to_string(),
        fields: vec![
            FormField {
                id: "full_name".to_string(),
                label: "Full name".to_string(),
                field_type: FieldType::Text,
                required: true,
                visible_when: None,
            },
            FormField {
                id: "email".to_string(),
                label: "Email".to_string(),
                field_type: FieldType::Email,
                required: true,
                visible_when: None,
            },
            FormField {
                id: "company".to_string(),
                label: "Company".to_string(),
                field_type: FieldType::Text,
                required: false,
                visible_when: None,
            },
        ],
        ticket_items: vec![
            TicketItem {
                id: TABLE_ITEM.to_string(),
                name: "Table of 8".to_string(),
                unit_price: Decimal::from(800),
                inventory: 20,
                max_per_order: 4,
                seats_per_unit: 8,
            },
            TicketItem {
                id: GA_ITEM.to_string(),
                name: "General Admission".to_string(),
                unit_price: Decimal::from(50),
                inventory: 0,
                max_per_order: 10,
                seats_per_unit: 1,
            },
        ],
        promo_codes: vec![
            PromoCode {
                code: "SAVE10".to_string(),
                discount_type: DiscountType::Percent,
                value: Decimal::from(10),
            },
            PromoCode {
                code: "COMP".to_string(),
                discount_type: DiscountType::Fixed,
                value: Decimal::from(5000),
            },
        ],
        ticket_required: true,
    }
}
