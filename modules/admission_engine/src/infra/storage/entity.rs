//! SeaORM entities for database tables

/// Registration forms; the ticket field and questions live in `definition`
pub mod ticket_form {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "ticket_forms")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub title: String,

        /// Fields, ticket items, promo codes and the ticket-required flag as JSON
        pub definition: Json,

        /// Creation timestamp
        pub created_at: DateTimeUtc,

        /// Last update timestamp
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::attendee::Entity")]
        Attendees,
    }

    impl Related<super::attendee::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Attendees.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Primary attendees and their guests
pub mod attendee {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "attendees")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub form_id: Uuid,
        pub name: String,
        pub email: String,
        pub ticket_type_summary: String,
        pub registered_at: DateTimeUtc,

        /// Position within its registration (primary 0, guests 1..)
        pub slot_index: i32,

        /// PAID, FREE or PENDING
        pub payment_status: String,
        pub transaction_id: Option<String>,
        pub qr_payload: String,
        pub is_primary: bool,
        pub primary_attendee_id: Option<Uuid>,
        pub invoice_id: Uuid,
        pub total_seats: Option<i32>,

        /// TABLES or SEATS
        pub donation_type: Option<String>,
        pub donated_seats: i32,
        pub donated_tables: i32,
        pub dietary_preference: Option<String>,
        pub answers: Json,
        pub assigned_table_id: Option<Uuid>,
        pub assigned_seat: Option<i32>,
        pub is_test: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::ticket_form::Entity",
            from = "Column::FormId",
            to = "super::ticket_form::Column::Id"
        )]
        TicketForm,
    }

    impl Related<super::ticket_form::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::TicketForm.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Named seating layouts of a form
pub mod seating_configuration {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "seating_configurations")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub form_id: Uuid,
        pub name: String,
        pub is_active: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::seating_table::Entity")]
        Tables,
    }

    impl Related<super::seating_table::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tables.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Tables of one seating layout
pub mod seating_table {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "seating_tables")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub form_id: Uuid,
        pub configuration_id: Uuid,

        /// Layout order
        pub sort_order: i32,
        pub label: String,
        pub capacity: i32,

        /// ROUND, RECTANGLE or SQUARE
        pub shape: String,
        pub pos_x: f64,
        pub pos_y: f64,
        pub vip: bool,

        /// Highest seat number ever issued
        pub issued_seats: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::seating_configuration::Entity",
            from = "Column::ConfigurationId",
            to = "super::seating_configuration::Column::Id"
        )]
        Configuration,
        #[sea_orm(has_many = "super::seating_assignment::Entity")]
        Assignments,
    }

    impl Related<super::seating_configuration::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Configuration.def()
        }
    }

    impl Related<super::seating_assignment::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Assignments.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// One seat per attendee per layout
pub mod seating_assignment {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "seating_assignments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub configuration_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub attendee_id: Uuid,
        pub table_id: Uuid,
        pub seat_number: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::seating_table::Entity",
            from = "Column::TableId",
            to = "super::seating_table::Column::Id"
        )]
        Table,
    }

    impl Related<super::seating_table::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Table.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
