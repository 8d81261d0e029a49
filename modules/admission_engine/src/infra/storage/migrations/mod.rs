//! Database migrations for the admission engine

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_ticket_forms::Migration),
            Box::new(m20250301_000002_create_attendees::Migration),
            Box::new(m20250301_000003_create_seating::Migration),
        ]
    }
}

mod m20250301_000001_create_ticket_forms {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_ticket_forms"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TicketForms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TicketForms::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TicketForms::Title).string().not_null())
                        .col(ColumnDef::new(TicketForms::Definition).json().not_null())
                        .col(
                            ColumnDef::new(TicketForms::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(TicketForms::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TicketForms::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TicketForms {
        Table,
        Id,
        Title,
        Definition,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_attendees {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_attendees"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Attendees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Attendees::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Attendees::FormId).uuid().not_null())
                        .col(ColumnDef::new(Attendees::Name).string().not_null())
                        .col(ColumnDef::new(Attendees::Email).string().not_null())
                        .col(
                            ColumnDef::new(Attendees::TicketTypeSummary)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Attendees::RegisteredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Attendees::SlotIndex)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Attendees::PaymentStatus).string().not_null())
                        .col(ColumnDef::new(Attendees::TransactionId).string())
                        .col(ColumnDef::new(Attendees::QrPayload).text().not_null())
                        .col(ColumnDef::new(Attendees::IsPrimary).boolean().not_null())
                        .col(ColumnDef::new(Attendees::PrimaryAttendeeId).uuid())
                        .col(ColumnDef::new(Attendees::InvoiceId).uuid().not_null())
                        .col(ColumnDef::new(Attendees::TotalSeats).integer())
                        .col(ColumnDef::new(Attendees::DonationType).string())
                        .col(
                            ColumnDef::new(Attendees::DonatedSeats)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Attendees::DonatedTables)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Attendees::DietaryPreference).string())
                        .col(ColumnDef::new(Attendees::Answers).json().not_null())
                        .col(ColumnDef::new(Attendees::AssignedTableId).uuid())
                        .col(ColumnDef::new(Attendees::AssignedSeat).integer())
                        .col(
                            ColumnDef::new(Attendees::IsTest)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_attendees_ticket_form")
                                .from(Attendees::Table, Attendees::FormId)
                                .to(TicketForms::Table, TicketForms::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_attendees_form_id")
                        .table(Attendees::Table)
                        .col(Attendees::FormId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_attendees_primary_attendee_id")
                        .table(Attendees::Table)
                        .col(Attendees::PrimaryAttendeeId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_attendees_invoice_id")
                        .table(Attendees::Table)
                        .col(Attendees::InvoiceId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Attendees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Attendees {
        Table,
        Id,
        FormId,
        Name,
        Email,
        TicketTypeSummary,
        RegisteredAt,
        SlotIndex,
        PaymentStatus,
        TransactionId,
        QrPayload,
        IsPrimary,
        PrimaryAttendeeId,
        InvoiceId,
        TotalSeats,
        DonationType,
        DonatedSeats,
        DonatedTables,
        DietaryPreference,
        Answers,
        AssignedTableId,
        AssignedSeat,
        IsTest,
    }

    #[derive(DeriveIden)]
    enum TicketForms {
        Table,
        Id,
    }
}

mod m20250301_000003_create_seating {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_seating"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SeatingConfigurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeatingConfigurations::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SeatingConfigurations::FormId).uuid().not_null())
                        .col(ColumnDef::new(SeatingConfigurations::Name).string().not_null())
                        .col(
                            ColumnDef::new(SeatingConfigurations::IsActive)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SeatingConfigurations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SeatingTables::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeatingTables::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SeatingTables::FormId).uuid().not_null())
                        .col(ColumnDef::new(SeatingTables::ConfigurationId).uuid().not_null())
                        .col(ColumnDef::new(SeatingTables::SortOrder).integer().not_null())
                        .col(ColumnDef::new(SeatingTables::Label).string().not_null())
                        .col(ColumnDef::new(SeatingTables::Capacity).integer().not_null())
                        .col(ColumnDef::new(SeatingTables::Shape).string().not_null())
                        .col(ColumnDef::new(SeatingTables::PosX).double().not_null())
                        .col(ColumnDef::new(SeatingTables::PosY).double().not_null())
                        .col(
                            ColumnDef::new(SeatingTables::Vip)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SeatingTables::IssuedSeats)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seating_tables_configuration")
                                .from(SeatingTables::Table, SeatingTables::ConfigurationId)
                                .to(SeatingConfigurations::Table, SeatingConfigurations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SeatingAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeatingAssignments::ConfigurationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SeatingAssignments::AttendeeId).uuid().not_null())
                        .col(ColumnDef::new(SeatingAssignments::TableId).uuid().not_null())
                        .col(
                            ColumnDef::new(SeatingAssignments::SeatNumber)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(SeatingAssignments::ConfigurationId)
                                .col(SeatingAssignments::AttendeeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seating_assignments_table")
                                .from(SeatingAssignments::Table, SeatingAssignments::TableId)
                                .to(SeatingTables::Table, SeatingTables::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seating_configurations_form_id")
                        .table(SeatingConfigurations::Table)
                        .col(SeatingConfigurations::FormId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seating_tables_configuration_id")
                        .table(SeatingTables::Table)
                        .col(SeatingTables::ConfigurationId)
                        .to_owned(),
                )
                .await?;

            // A seat number is issued once per table
            manager
                .create_index(
                    Index::create()
                        .name("idx_seating_assignments_table_seat")
                        .table(SeatingAssignments::Table)
                        .col(SeatingAssignments::TableId)
                        .col(SeatingAssignments::SeatNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SeatingAssignments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SeatingTables::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SeatingConfigurations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SeatingConfigurations {
        Table,
        Id,
        FormId,
        Name,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum SeatingTables {
        Table,
        Id,
        FormId,
        ConfigurationId,
        SortOrder,
        Label,
        Capacity,
        Shape,
        PosX,
        PosY,
        Vip,
        IssuedSeats,
    }

    #[derive(DeriveIden)]
    enum SeatingAssignments {
        Table,
        ConfigurationId,
        AttendeeId,
        TableId,
        SeatNumber,
    }
}
