//! Diesel schema for user persistence.

diesel::table! {
    /// User records with profile role and group memberships.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Login name, unique across the store.
        #[max_length = 150]
        username -> Varchar,
        /// Email address.
        #[max_length = 254]
        email -> Varchar,
        /// Profile role.
        #[max_length = 20]
        role -> Varchar,
        /// Staff flag.
        staff -> Bool,
        /// Group membership names.
        groups -> Array<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
