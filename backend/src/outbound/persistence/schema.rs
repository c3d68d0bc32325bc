//! Diesel table definitions for the accounts schema.
//!
//! Must match the deployed tables; `diesel print-schema` regenerates them.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Unique.
        email -> Varchar,
        /// Unique.
        username -> Varchar,
        followers -> Int4,
        /// PHC-encoded salted hash.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Posts authored by users. Read-only here.
    posts (id) {
        id -> Uuid,
        user_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, posts);
