use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Client, ClientPatch};

/// Natural identity key for a client record. Phone numbers are expected in
/// normalized digit-only form.
#[derive(Debug, Clone, Copy)]
pub enum ClientKey<'a> {
    Phone(&'a str),
    Email(&'a str),
}

/// Create-or-update keyed by phone or email: existing records get the
/// supplied fields overwritten (omitted fields are preserved), fresh
/// records are inserted with the key folded in. Returns the full record
/// either way.
///
/// Lookup-then-write is fine here: intake traffic is low-concurrency per
/// phone number, and the unique indexes on the identity keys make a racing
/// duplicate insert fail instead of creating a second record.
pub fn upsert_client(
    conn: &Connection,
    key: ClientKey<'_>,
    mut patch: ClientPatch,
) -> anyhow::Result<Client> {
    let existing = match key {
        ClientKey::Phone(phone) => queries::get_client_by_phone(conn, phone)?,
        ClientKey::Email(email) => queries::get_client_by_email(conn, email)?,
    };

    match existing {
        Some(client) => {
            tracing::debug!(client_id = client.id, "updating existing client");
            queries::update_client(conn, client.id, &patch)
        }
        None => {
            match key {
                ClientKey::Phone(phone) => patch.phone_no = Some(phone.to_string()),
                ClientKey::Email(email) => patch.email = Some(email.to_string()),
            }
            tracing::debug!("registering new client");
            queries::insert_client(conn, &patch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn patch(name: &str, age: i64, city: &str) -> ClientPatch {
        ClientPatch {
            name: Some(name.to_string()),
            age: Some(age),
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_then_update_same_key_yields_one_record() {
        let conn = db::init_db(":memory:").unwrap();

        let first = upsert_client(&conn, ClientKey::Phone("919876543210"), patch("Asha", 29, "Pune"))
            .unwrap();
        let second = upsert_client(&conn, ClientKey::Phone("919876543210"), patch("Asha", 29, "Pune"))
            .unwrap();

        assert_eq!(first.id, second.id);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM client", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_update_overwrites_only_supplied_fields() {
        let conn = db::init_db(":memory:").unwrap();

        upsert_client(&conn, ClientKey::Phone("919876543210"), patch("Asha", 29, "Pune")).unwrap();

        let updated = upsert_client(
            &conn,
            ClientKey::Phone("919876543210"),
            ClientPatch {
                city: Some("Mumbai".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Asha"));
        assert_eq!(updated.age, Some(29));
        assert_eq!(updated.city.as_deref(), Some("Mumbai"));
        assert_eq!(updated.phone_no.as_deref(), Some("919876543210"));
    }

    #[test]
    fn test_upsert_by_email() {
        let conn = db::init_db(":memory:").unwrap();

        let created = upsert_client(
            &conn,
            ClientKey::Email("asha@example.com"),
            ClientPatch {
                q_and_a: Some(serde_json::json!({"q1": "0"})),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(created.email.as_deref(), Some("asha@example.com"));

        let updated = upsert_client(
            &conn,
            ClientKey::Email("asha@example.com"),
            ClientPatch {
                q_and_a: Some(serde_json::json!({"q1": "2"})),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.q_and_a, Some(serde_json::json!({"q1": "2"})));
    }
}
