diesel::table! {
    users (id) {
        id -> Int4,
        email -> Text,
        username -> Text,
        password_hash -> Text,
        role -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    schools (id) {
        id -> Int4,
        name -> Text,
        admin_name -> Text,
        address -> Nullable<Text>,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    students (id) {
        id -> Int4,
        school_id -> Int4,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    fundraisers (id) {
        id -> Int4,
        name -> Text,
        location -> Text,
        school_id -> Int4,
        is_active -> Bool,
        event_date -> Date,
        price -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    student_fundraisers (student_id, fundraiser_id) {
        student_id -> Int4,
        fundraiser_id -> Int4,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Int4,
        user_id -> Int4,
        title -> Text,
        message -> Text,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    sessions (id) {
        id -> Text,
        data -> Text,
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(schools -> users (user_id));
diesel::joinable!(students -> schools (school_id));
diesel::joinable!(students -> users (user_id));
diesel::joinable!(fundraisers -> schools (school_id));
diesel::joinable!(student_fundraisers -> students (student_id));
diesel::joinable!(student_fundraisers -> fundraisers (fundraiser_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    schools,
    students,
    fundraisers,
    student_fundraisers,
    notifications,
    sessions,
);
