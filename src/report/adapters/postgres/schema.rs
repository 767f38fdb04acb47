//! Diesel schema for report persistence.

diesel::table! {
    /// One summary schedule per owner.
    report_schedules (owner_id) {
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Username greeted in summaries.
        #[max_length = 150]
        username -> Varchar,
        /// Delivery address.
        #[max_length = 254]
        email -> Varchar,
        /// UTC time of day after which sending is allowed.
        send_after -> Time,
        /// Time of the last delivery.
        last_sent_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Copies of delivered summaries.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Rendered summary body.
        #[max_length = 1024]
        content -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(report_schedules, notifications);
