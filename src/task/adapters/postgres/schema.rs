//! Diesel schema for task persistence.

diesel::table! {
    /// Scheduled task records.
    scheduled_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Action tag selecting the handler.
        #[max_length = 100]
        action -> Varchar,
        /// Action payload object.
        payload -> Jsonb,
        /// Earliest execution instant.
        run_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last status transition timestamp.
        updated_at -> Timestamptz,
        /// Failure cause, set only for failed tasks.
        error_message -> Nullable<Text>,
    }
}
