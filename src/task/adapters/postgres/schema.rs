//! Diesel schema for task and comment persistence.

diesel::table! {
    /// Task records with lifecycle and assignment fields.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority of the work.
        #[max_length = 20]
        priority -> Varchar,
        /// User the work is assigned to.
        assigned_to -> Uuid,
        /// User who created the task.
        created_by -> Uuid,
        /// Deadline for the work.
        due_date -> Timestamptz,
        /// Effort estimate in hours.
        estimated_hours -> Nullable<Double>,
        /// Free-form notes.
        notes -> Nullable<Text>,
        /// Completion timestamp, non-null exactly when status is completed.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only comments attached to tasks.
    task_comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Owning task; rows cascade-delete with it.
        task_id -> Uuid,
        /// Comment author.
        author_id -> Uuid,
        /// Comment body.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
