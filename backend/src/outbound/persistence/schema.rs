//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Users known to the pair directory.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Name used in notification text.
        display_name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Two-user relations. Incomplete while `second_user_id` is null.
    pairs (id) {
        /// Primary key.
        id -> Uuid,
        /// Member who created the pair.
        first_user_id -> Uuid,
        /// Member who joined, once they have.
        second_user_id -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only button ledger.
    ledger_actions (id) {
        /// Surrogate key.
        id -> Int8,
        /// Owning pair.
        pair_id -> Uuid,
        /// Member who pressed the button.
        actor_id -> Uuid,
        /// `sutta`, `project`, `junior`, or `resign`.
        kind -> Varchar,
        /// When the press was accepted.
        occurred_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notice board entries; the latest per pair drives turn-taking.
    notices (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning pair.
        pair_id -> Uuid,
        /// Author.
        author_id -> Uuid,
        /// Trimmed body.
        content -> Text,
        /// Creation time.
        created_at -> Timestamptz,
        /// When the partner acknowledged it.
        seen_at -> Nullable<Timestamptz>,
        /// Set by the single permitted edit.
        is_edited -> Bool,
        /// End of the edit window.
        editable_until -> Timestamptz,
    }
}

diesel::table! {
    /// Ephemeral gossip, hidden once acknowledged.
    gossip_messages (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning pair.
        pair_id -> Uuid,
        /// Author.
        author_id -> Uuid,
        /// Trimmed body.
        content -> Text,
        /// Creation time.
        created_at -> Timestamptz,
        /// Set once the partner has fetched it.
        seen -> Bool,
        /// Set by the partner's reaction.
        acknowledged_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Mood check-ins.
    moods (id) {
        /// Surrogate key.
        id -> Int8,
        /// Owning pair.
        pair_id -> Uuid,
        /// Reporting member.
        user_id -> Uuid,
        /// Mood name, exact spelling.
        mood -> Varchar,
        /// Report time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notification history.
    notification_queue (id) {
        /// Primary key.
        id -> Uuid,
        /// Recipient.
        recipient_id -> Uuid,
        /// Pair the event happened in.
        pair_id -> Uuid,
        /// Notification kind, snake case.
        kind -> Varchar,
        /// Structured event details.
        payload -> Jsonb,
        /// Whether the recipient acknowledged it.
        read -> Bool,
        /// Record time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered push endpoints, unique per `(user_id, endpoint)`.
    push_subscriptions (id) {
        /// Primary key.
        id -> Uuid,
        /// Owner.
        user_id -> Uuid,
        /// Push service URL, duplicated out of `descriptor` for the unique key.
        endpoint -> Text,
        /// Browser-supplied descriptor.
        descriptor -> Jsonb,
        /// First registration.
        created_at -> Timestamptz,
        /// Last refresh.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(ledger_actions -> pairs (pair_id));
diesel::joinable!(notices -> pairs (pair_id));
diesel::joinable!(gossip_messages -> pairs (pair_id));
diesel::joinable!(moods -> pairs (pair_id));
diesel::joinable!(notification_queue -> pairs (pair_id));
diesel::joinable!(push_subscriptions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    pairs,
    ledger_actions,
    notices,
    gossip_messages,
    moods,
    notification_queue,
    push_subscriptions,
);
