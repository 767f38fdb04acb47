//! Diesel schema for task persistence.

diesel::table! {
    /// Task records scoped by owner.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Upper-cased title.
        #[max_length = 100]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Priority within the owner's active tasks.
        priority -> Int4,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status transition records.
    task_status_changes (id) {
        /// Record identifier.
        id -> Uuid,
        /// Insertion sequence used to order records with equal timestamps.
        sequence -> Int8,
        /// Task the record describes.
        task_id -> Uuid,
        /// Status before the transition.
        #[max_length = 20]
        old_status -> Varchar,
        /// Status after the transition.
        #[max_length = 20]
        new_status -> Varchar,
        /// Time the transition was recorded.
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(task_status_changes -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_status_changes);
