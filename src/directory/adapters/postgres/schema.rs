//! Diesel schema for directory persistence.

diesel::table! {
    /// Department records.
    departments (id) {
        /// Department identifier.
        id -> Uuid,
        /// Unique department name.
        #[max_length = 255]
        name -> Varchar,
        /// Curating user, cleared when that user is removed.
        curator_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// User records.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique email address.
        #[max_length = 254]
        email -> Varchar,
        /// Given name.
        #[max_length = 150]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 150]
        last_name -> Varchar,
        /// Canonical role string.
        #[max_length = 64]
        role -> Varchar,
        /// Department affiliation, cleared when the department is removed.
        department_id -> Nullable<Uuid>,
        /// Chat handle for the external notification channel.
        #[max_length = 100]
        chat_handle -> Nullable<Varchar>,
        /// Administrator flag.
        is_admin -> Bool,
    }
}

diesel::joinable!(users -> departments (department_id));
diesel::allow_tables_to_appear_in_same_query!(departments, users);
