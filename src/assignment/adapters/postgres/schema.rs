//! Diesel schema for assignment persistence.
//!
//! Referential actions: `tasks.initiator_id` cascades with the user,
//! `tasks.group_id` and affiliation columns are set-null, and
//! `tasks.parent_task_id` is protected while children exist.

diesel::table! {
    /// Task group (category) records.
    groups (id) {
        /// Group identifier.
        id -> Uuid,
        /// Group name.
        #[max_length = 200]
        name -> Varchar,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 512]
        title -> Varchar,
        /// External registration number.
        #[max_length = 56]
        number -> Nullable<Varchar>,
        /// Category reference, cleared when the group is removed.
        group_id -> Nullable<Uuid>,
        /// Initiating user, cascades with the user row.
        initiator_id -> Uuid,
        /// Resolution text.
        resolution -> Text,
        /// Parent task for redirections, protected against deletion.
        parent_task_id -> Nullable<Uuid>,
        /// Date the task was assigned.
        assignment_date -> Date,
        /// Due date.
        execution_date -> Date,
        /// Reference to the task brief attachment.
        #[max_length = 512]
        brief_attachment -> Nullable<Varchar>,
        /// Reference to the execution-evidence attachment.
        #[max_length = 512]
        evidence_attachment -> Nullable<Varchar>,
        /// Free-text execution comment.
        execution_comment -> Nullable<Text>,
        /// Executor-side completion flag.
        is_completed -> Bool,
        /// Initiator-side closure flag.
        is_closed -> Bool,
    }
}

diesel::table! {
    /// Task-to-executor assignment rows.
    task_executors (task_id, user_id) {
        /// Task reference, cascades with the task row.
        task_id -> Uuid,
        /// Executor reference, cascades with the user row.
        user_id -> Uuid,
    }
}

diesel::joinable!(tasks -> groups (group_id));
diesel::joinable!(task_executors -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(groups, tasks, task_executors);
