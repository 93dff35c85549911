table! {
    movies (movie_id) {
        movie_id -> Int4,
        title -> Varchar,
        released_at -> Nullable<Date>,
        imdb_url -> Nullable<Varchar>,
    }
}

table! {
    ratings (rating_id) {
        rating_id -> Int4,
        movie_id -> Int4,
        user_id -> Int4,
        score -> Int4,
    }
}

table! {
    users (user_id) {
        user_id -> Int4,
        email -> Nullable<Text>,
        password_hash -> Nullable<Text>,
        age -> Nullable<Int4>,
        zipcode -> Nullable<Varchar>,
    }
}

joinable!(ratings -> movies (movie_id));
joinable!(ratings -> users (user_id));

allow_tables_to_appear_in_same_query!(
    movies,
    ratings,
    users,
);
