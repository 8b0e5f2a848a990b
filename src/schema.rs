// Kept by hand; the table is created at startup by `actions::ensure_schema`.

diesel::table! {
    kv_store (key) {
        key -> Text,
        value -> Text,
    }
}
