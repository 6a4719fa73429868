//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. Role flags are only set out of band.
    users (id) {
        id -> Uuid,
        /// Unique login handle.
        username -> Varchar,
        email -> Varchar,
        display_name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        is_trade_admin -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listed items.
    items (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category -> Varchar,
        location -> Varchar,
        address -> Varchar,
        /// Opaque media reference.
        image -> Nullable<Text>,
        status -> Varchar,
        /// Optimistic concurrency counter.
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Offers against listed items.
    ///
    /// `offer_type` decides which of `item_offered_id` and
    /// `money_amount_cents` is set; a check constraint enforces it.
    offers (id) {
        id -> Uuid,
        item_desired_id -> Uuid,
        offer_type -> Varchar,
        item_offered_id -> Nullable<Uuid>,
        money_amount_cents -> Nullable<Int8>,
        offerer_id -> Uuid,
        status -> Varchar,
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(items -> users (owner_id));
diesel::joinable!(offers -> users (offerer_id));

diesel::allow_tables_to_appear_in_same_query!(users, items, offers);
