//! Seating assignment - manual placement and greedy first-fit
//!
//! A [`SeatingPlan`] holds the tables and assignments of one configuration.
//! Seat numbers are issued once per table and never reused, so they may have
//! gaps after guests are unassigned.

use crate::contract::{AdmissionError, AutoAssignReport, SeatingAssignment, SeatingPlan, SeatingTable};
use std::collections::HashSet;
use uuid::Uuid;

impl SeatingPlan {
    /// Empty plan for one configuration
    pub fn new(form_id: Uuid, configuration_id: Uuid) -> Self {
        Self {
            form_id,
            configuration_id,
            tables: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Look up a table by id
    pub fn table(&self, table_id: Uuid) -> Option<&SeatingTable> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Number of attendees currently seated at a table
    pub fn occupancy(&self, table_id: Uuid) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.table_id == table_id)
            .count() as u32
    }

    /// Seats still free at a table
    pub fn remaining(&self, table_id: Uuid) -> u32 {
        self.table(table_id)
            .map_or(0, |t| t.capacity.saturating_sub(self.occupancy(table_id)))
    }

    /// Current assignment of an attendee, if seated
    pub fn assignment_for(&self, attendee_id: Uuid) -> Option<&SeatingAssignment> {
        self.assignments.iter().find(|a| a.attendee_id == attendee_id)
    }

    /// Seat `guest_ids` at `table_id` in input order.
    ///
    /// Guests beyond the table's remaining capacity are dropped. A guest already
    /// seated elsewhere in this configuration is moved. Returns the new assignments.
    pub fn assign(
        &mut self,
        guest_ids: &[Uuid],
        table_id: Uuid,
    ) -> Result<Vec<SeatingAssignment>, AdmissionError> {
        let capacity = self
            .table(table_id)
            .map(|t| t.capacity)
            .ok_or_else(|| AdmissionError::not_found("table", table_id))?;

        let mut placed = Vec::new();
        for &guest_id in guest_ids {
            if self.occupancy(table_id) >= capacity {
                continue;
            }
            self.assignments.retain(|a| a.attendee_id != guest_id);

            let seat_number = self.issue_seat(table_id);
            let assignment = SeatingAssignment {
                configuration_id: self.configuration_id,
                attendee_id: guest_id,
                table_id,
                seat_number,
            };
            self.assignments.push(assignment);
            placed.push(assignment);
        }

        Ok(placed)
    }

    /// Remove an attendee's seat; other seat numbers at the table are kept
    pub fn unassign(&mut self, attendee_id: Uuid) -> Option<SeatingAssignment> {
        let index = self
            .assignments
            .iter()
            .position(|a| a.attendee_id == attendee_id)?;
        Some(self.assignments.remove(index))
    }

    /// Greedy first-fit: unassigned attendees in list order fill tables in list
    /// order, each table to capacity before the next one.
    pub fn auto_assign(&mut self, attendee_ids: &[Uuid]) -> AutoAssignReport {
        let seated: HashSet<Uuid> = self.assignments.iter().map(|a| a.attendee_id).collect();
        let mut pending = attendee_ids
            .iter()
            .copied()
            .filter(|id| !seated.contains(id))
            .peekable();

        let mut report = AutoAssignReport::default();
        let table_ids: Vec<Uuid> = self.tables.iter().map(|t| t.id).collect();

        for table_id in table_ids {
            while self.remaining(table_id) > 0 {
                let Some(attendee_id) = pending.next() else {
                    break;
                };
                let seat_number = self.issue_seat(table_id);
                let assignment = SeatingAssignment {
                    configuration_id: self.configuration_id,
                    attendee_id,
                    table_id,
                    seat_number,
                };
                self.assignments.push(assignment);
                report.seated.push(assignment);
            }
            if pending.peek().is_none() {
                break;
            }
        }

        report.unassigned = pending.collect();
        report
    }

    /// Replace the table set; assignments at removed tables are dropped.
    ///
    /// Seat counters of surviving tables never move backwards, and a table
    /// cannot shrink below the number of guests still seated at it.
    pub fn replace_tables(&mut self, tables: Vec<SeatingTable>) -> Result<(), AdmissionError> {
        let kept: HashSet<Uuid> = tables.iter().map(|t| t.id).collect();
        let mut assignments = self.assignments.clone();
        assignments.retain(|a| kept.contains(&a.table_id));

        let mut replaced = Vec::with_capacity(tables.len());
        for mut table in tables {
            if table.capacity == 0 {
                return Err(AdmissionError::validation(format!(
                    "table '{}' must seat at least one guest",
                    table.label
                )));
            }
            let seated = assignments.iter().filter(|a| a.table_id == table.id).count() as u32;
            if seated > table.capacity {
                return Err(AdmissionError::validation(format!(
                    "table '{}' has {} seated guests but capacity {}",
                    table.label, seated, table.capacity
                )));
            }
            if let Some(existing) = self.table(table.id) {
                table.issued_seats = table.issued_seats.max(existing.issued_seats);
            }
            table.form_id = self.form_id;
            table.configuration_id = self.configuration_id;
            replaced.push(table);
        }

        self.tables = replaced;
        self.assignments = assignments;
        Ok(())
    }

    fn issue_seat(&mut self, table_id: Uuid) -> u32 {
        let highest_seated = self
            .assignments
            .iter()
            .filter(|a| a.table_id == table_id)
            .map(|a| a.seat_number)
            .max()
            .unwrap_or(0);

        let Some(table) = self.tables.iter_mut().find(|t| t.id == table_id) else {
            return highest_seated + 1;
        };
        let next = table.issued_seats.max(highest_seated) + 1;
        table.issued_seats = next;
        next
    }
}
