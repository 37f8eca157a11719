//! Diesel schema definitions for the ship registry server.

diesel::table! {
    ships (id) {
        id -> Int8,
        name -> Text,
        planet -> Text,
        ship_type -> Text,
        prod_date -> Timestamp,
        is_used -> Bool,
        speed -> Float8,
        crew_size -> Int4,
        rating -> Float8,
    }
}
