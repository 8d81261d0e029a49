//! SeaORM repository implementations

use crate::contract::{
    Attendee, SeatingAssignment, SeatingConfiguration, SeatingPlan, SeatingTable, TicketForm,
};
use crate::domain::repository::{AttendeeRepository, SeatingRepository, TicketFormRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{attendee, seating_assignment, seating_configuration, seating_table, ticket_form};
use super::mapper::table_active_model;

// ===== Ticket Form Repository =====

pub struct SeaOrmTicketFormRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTicketFormRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketFormRepository for SeaOrmTicketFormRepository {
    async fn get_ticket_form(&self, form_id: Uuid) -> Result<Option<TicketForm>> {
        let result = ticket_form::Entity::find_by_id(form_id)
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn save_ticket_form(&self, form: &TicketForm) -> Result<TicketForm> {
        let existing = ticket_form::Entity::find_by_id(form.id)
            .one(&*self.db)
            .await?;

        let mut active = ticket_form::ActiveModel::try_from(form)?;
        let result = if let Some(existing) = existing {
            active.created_at = Set(existing.created_at);
            ticket_form::Entity::update(active).exec(&*self.db).await?
        } else {
            ticket_form::Entity::insert(active)
                .exec_with_returning(&*self.db)
                .await?
        };

        result.try_into()
    }
}

// ===== Attendee Repository =====

pub struct SeaOrmAttendeeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAttendeeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn into_attendees(models: Vec<attendee::Model>) -> Result<Vec<Attendee>> {
    models
        .into_iter()
        .map(|e| e.try_into())
        .collect::<Result<Vec<_>>>()
}

#[async_trait]
impl AttendeeRepository for SeaOrmAttendeeRepository {
    async fn get_attendee(&self, id: Uuid) -> Result<Option<Attendee>> {
        let result = attendee::Entity::find_by_id(id).one(&*self.db).await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_guests_of(&self, primary_id: Uuid) -> Result<Vec<Attendee>> {
        let results = attendee::Entity::find()
            .filter(attendee::Column::PrimaryAttendeeId.eq(primary_id))
            .filter(attendee::Column::IsPrimary.eq(false))
            .order_by_asc(attendee::Column::RegisteredAt)
            .order_by_asc(attendee::Column::SlotIndex)
            .all(&*self.db)
            .await?;

        into_attendees(results)
    }

    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Attendee>> {
        let results = attendee::Entity::find()
            .filter(attendee::Column::FormId.eq(form_id))
            .order_by_asc(attendee::Column::RegisteredAt)
            .order_by_asc(attendee::Column::SlotIndex)
            .all(&*self.db)
            .await?;

        into_attendees(results)
    }

    async fn upsert_attendee(&self, attendee: &Attendee) -> Result<Attendee> {
        let existing = attendee::Entity::find_by_id(attendee.id)
            .one(&*self.db)
            .await?;

        let mut active = attendee::ActiveModel::try_from(attendee)?;
        let result = if existing.is_some() {
            attendee::Entity::update(active).exec(&*self.db).await?
        } else {
            active.slot_index = Set(0);
            attendee::Entity::insert(active)
                .exec_with_returning(&*self.db)
                .await?
        };

        result.try_into()
    }

    async fn insert_registration(&self, primary: &Attendee, guests: &[Attendee]) -> Result<()> {
        let rows = std::iter::once(primary)
            .chain(guests.iter())
            .enumerate()
            .map(|(index, attendee)| -> Result<attendee::ActiveModel> {
                let mut active = attendee::ActiveModel::try_from(attendee)?;
                active.slot_index = Set(i32::try_from(index)?);
                Ok(active)
            })
            .collect::<Result<Vec<_>>>()?;

        let txn = self.db.begin().await?;
        attendee::Entity::insert_many(rows).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

// ===== Seating Repository =====

pub struct SeaOrmSeatingRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSeatingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SeatingRepository for SeaOrmSeatingRepository {
    async fn create_configuration(
        &self,
        configuration: &SeatingConfiguration,
    ) -> Result<SeatingConfiguration> {
        let active: seating_configuration::ActiveModel = configuration.into();

        let result = seating_configuration::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(result.into())
    }

    async fn get_configuration(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<Option<SeatingConfiguration>> {
        let result = seating_configuration::Entity::find_by_id(configuration_id)
            .filter(seating_configuration::Column::FormId.eq(form_id))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn list_configurations(&self, form_id: Uuid) -> Result<Vec<SeatingConfiguration>> {
        let results = seating_configuration::Entity::find()
            .filter(seating_configuration::Column::FormId.eq(form_id))
            .order_by_asc(seating_configuration::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn set_active_configuration(&self, form_id: Uuid, configuration_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;

        seating_configuration::Entity::update_many()
            .col_expr(seating_configuration::Column::IsActive, Expr::value(false))
            .filter(seating_configuration::Column::FormId.eq(form_id))
            .exec(&txn)
            .await?;

        seating_configuration::Entity::update_many()
            .col_expr(seating_configuration::Column::IsActive, Expr::value(true))
            .filter(seating_configuration::Column::FormId.eq(form_id))
            .filter(seating_configuration::Column::Id.eq(configuration_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn save_plan(&self, plan: &SeatingPlan) -> Result<()> {
        let txn = self.db.begin().await?;

        write_tables(&txn, &plan.tables, plan.form_id, plan.configuration_id).await?;
        write_assignments(&txn, &plan.assignments, plan.configuration_id).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn list_tables(&self, form_id: Uuid, configuration_id: Uuid) -> Result<Vec<SeatingTable>> {
        let results = seating_table::Entity::find()
            .filter(seating_table::Column::FormId.eq(form_id))
            .filter(seating_table::Column::ConfigurationId.eq(configuration_id))
            .order_by_asc(seating_table::Column::SortOrder)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn list_assignments(
        &self,
        form_id: Uuid,
        configuration_id: Uuid,
    ) -> Result<Vec<SeatingAssignment>> {
        let results = seating_assignment::Entity::find()
            .inner_join(seating_table::Entity)
            .filter(seating_table::Column::FormId.eq(form_id))
            .filter(seating_assignment::Column::ConfigurationId.eq(configuration_id))
            .order_by_asc(seating_assignment::Column::TableId)
            .order_by_asc(seating_assignment::Column::SeatNumber)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }
}

/// Upsert `tables` and delete the tables no longer listed, with their assignments
async fn write_tables(
    txn: &DatabaseTransaction,
    tables: &[SeatingTable],
    form_id: Uuid,
    configuration_id: Uuid,
) -> Result<()> {
    let existing: HashSet<Uuid> = seating_table::Entity::find()
        .select_only()
        .column(seating_table::Column::Id)
        .filter(seating_table::Column::FormId.eq(form_id))
        .filter(seating_table::Column::ConfigurationId.eq(configuration_id))
        .into_tuple::<Uuid>()
        .all(txn)
        .await?
        .into_iter()
        .collect();

    let kept: HashSet<Uuid> = tables.iter().map(|t| t.id).collect();
    let removed: Vec<Uuid> = existing.difference(&kept).copied().collect();

    if !removed.is_empty() {
        seating_assignment::Entity::delete_many()
            .filter(seating_assignment::Column::ConfigurationId.eq(configuration_id))
            .filter(seating_assignment::Column::TableId.is_in(removed.clone()))
            .exec(txn)
            .await?;
        seating_table::Entity::delete_many()
            .filter(seating_table::Column::Id.is_in(removed))
            .exec(txn)
            .await?;
    }

    for (sort_order, table) in tables.iter().enumerate() {
        let mut active = table_active_model(table, sort_order)?;
        active.form_id = Set(form_id);
        active.configuration_id = Set(configuration_id);

        if existing.contains(&table.id) {
            seating_table::Entity::update(active).exec(txn).await?;
        } else {
            seating_table::Entity::insert(active).exec(txn).await?;
        }
    }

    Ok(())
}

/// Delete every assignment of the configuration, then insert `assignments`
async fn write_assignments(
    txn: &DatabaseTransaction,
    assignments: &[SeatingAssignment],
    configuration_id: Uuid,
) -> Result<()> {
    seating_assignment::Entity::delete_many()
        .filter(seating_assignment::Column::ConfigurationId.eq(configuration_id))
        .exec(txn)
        .await?;

    if !assignments.is_empty() {
        let rows = assignments
            .iter()
            .map(seating_assignment::ActiveModel::try_from)
            .collect::<Result<Vec<_>>>()?;
        seating_assignment::Entity::insert_many(rows).exec(txn).await?;
    }

    Ok(())
}
