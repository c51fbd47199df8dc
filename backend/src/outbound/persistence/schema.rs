//! Diesel table definitions for the helpdesk schema.
//!
//! Must match `backend/migrations`. Case-insensitive uniqueness of
//! `users.email` and `faqs.question` is enforced by expression indexes that
//! Diesel does not model.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Stored trimmed and lower-cased.
        email -> Varchar,
        password_hash -> Text,
        name -> Varchar,
        /// `student` or `admin`.
        role -> Varchar,
        /// SHA-256 hex of the single active refresh token.
        refresh_token_fingerprint -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets. Rows cascade away with their owner.
    tickets (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category -> Varchar,
        status -> Varchar,
        priority -> Varchar,
        response -> Nullable<Text>,
        attachment_path -> Nullable<Varchar>,
        resolved_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only admin comments, one row per comment.
    ticket_comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        admin_id -> Nullable<Uuid>,
        comment -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Curated FAQ entries.
    faqs (id) {
        id -> Uuid,
        question -> Text,
        answer -> Text,
        category -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tickets -> users (owner_id));
diesel::joinable!(ticket_comments -> tickets (ticket_id));
diesel::joinable!(ticket_comments -> users (admin_id));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, ticket_comments, faqs);
