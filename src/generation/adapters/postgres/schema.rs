//! Diesel schema for generation persistence.

diesel::table! {
    /// Test-generation requests and their outcomes.
    generations (id) {
        /// Generation identifier.
        id -> Uuid,
        /// Requesting principal.
        owner_id -> Uuid,
        /// Submitted source code.
        input_code -> Text,
        /// Normalized language label.
        #[max_length = 64]
        language -> Varchar,
        /// Lifecycle status.
        #[max_length = 16]
        status -> Varchar,
        /// Generated tests, present once completed.
        generated_tests -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last status transition timestamp.
        updated_at -> Timestamptz,
    }
}
