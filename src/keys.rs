//! Store key derivation.
//!
//! Key names are derived purely from static schema names, never from
//! runtime state, so they are stable across restarts and shared with any
//! other client of the same data. Layout:
//!
//! | Purpose           | Key                      |
//! |-------------------|--------------------------|
//! | primary index     | `<type>`                 |
//! | id counter        | `<type>:next_id`         |
//! | field sort index  | `<type>:sort_<field>`    |
//! | text terms index  | `<type>:terms_<field>`   |
//! | per-token index   | `<type>:term_<field>:<token>` |
//! | record hash       | `<type>:<id>`            |

use crate::schema::CREATED_AT;

/// The primary index: all live ids of a record type, scored by creation time.
pub fn primary_index(type_name: &str) -> String {
    type_name.to_string()
}

/// The atomic id-allocation counter.
pub fn next_id(type_name: &str) -> String {
    format!("{type_name}:next_id")
}

/// The sort index of one sortable field.
///
/// `created_at` is kept in the primary index itself, so its sort index is
/// the primary index key.
pub fn sort_index(type_name: &str, field: &str) -> String {
    if field == CREATED_AT {
        primary_index(type_name)
    } else {
        format!("{type_name}:sort_{field}")
    }
}

/// The terms index of a text-searchable field: every distinct token,
/// scored by the token's own string score.
pub fn terms_index(type_name: &str, field: &str) -> String {
    format!("{type_name}:terms_{field}")
}

/// The per-token index: ids of records containing `token`, scored by
/// creation time.
pub fn term_index(type_name: &str, field: &str, token: &str) -> String {
    format!("{type_name}:term_{field}:{token}")
}

/// The hash holding one record's field values.
pub fn record_hash(type_name: &str, id: u64) -> String {
    format!("{type_name}:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(primary_index("person"), "person");
        assert_eq!(next_id("person"), "person:next_id");
        assert_eq!(sort_index("person", "age"), "person:sort_age");
        assert_eq!(terms_index("person", "bio"), "person:terms_bio");
        assert_eq!(term_index("person", "bio", "rust"), "person:term_bio:rust");
        assert_eq!(record_hash("person", 7), "person:7");
    }

    #[test]
    fn test_created_at_sort_index_is_the_primary_index() {
        assert_eq!(sort_index("person", CREATED_AT), primary_index("person"));
    }

    #[test]
    fn test_keys_distinct_across_fields_and_tokens() {
        assert_ne!(sort_index("person", "age"), sort_index("person", "name"));
        assert_ne!(
            term_index("person", "bio", "rust"),
            term_index("person", "bio", "ruby")
        );
        assert_ne!(
            term_index("person", "bio", "rust"),
            term_index("person", "tags", "rust")
        );
    }
}
