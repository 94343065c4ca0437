use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Client, ClientPatch, NewProfessional, Professional};

// ── Professionals ──

const PROFESSIONAL_COLS: &str = "id, full_name, email, phone, photo_url, area_of_expertise, \
     languages, city, country, created_at, updated_at";

pub fn professionals_by_expertise(
    conn: &Connection,
    expertise: &str,
) -> anyhow::Result<Vec<Professional>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFESSIONAL_COLS} FROM professional WHERE area_of_expertise = ?1",
    ))?;

    let rows = stmt.query_map(params![expertise], |row| Ok(parse_professional_row(row)))?;

    let mut professionals = vec![];
    for row in rows {
        professionals.push(row??);
    }
    Ok(professionals)
}

pub fn list_professionals(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Professional>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFESSIONAL_COLS} FROM professional ORDER BY full_name ASC LIMIT ?1",
    ))?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_professional_row(row)))?;

    let mut professionals = vec![];
    for row in rows {
        professionals.push(row??);
    }
    Ok(professionals)
}

pub fn get_professional(conn: &Connection, id: i64) -> anyhow::Result<Option<Professional>> {
    let result = conn.query_row(
        &format!("SELECT {PROFESSIONAL_COLS} FROM professional WHERE id = ?1"),
        params![id],
        |row| Ok(parse_professional_row(row)),
    );

    match result {
        Ok(professional) => Ok(Some(professional?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_professional(
    conn: &Connection,
    new: &NewProfessional,
) -> anyhow::Result<Professional> {
    let languages_json = new
        .languages
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO professional (full_name, email, phone, photo_url, area_of_expertise, languages, city, country)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.full_name,
            new.email,
            new.phone,
            new.photo_url,
            new.area_of_expertise,
            languages_json,
            new.city,
            new.country,
        ],
    )?;

    let id = conn.last_insert_rowid();
    get_professional(conn, id)?
        .ok_or_else(|| anyhow::anyhow!("professional {id} vanished after insert"))
}

fn parse_professional_row(row: &Row) -> anyhow::Result<Professional> {
    let languages_json: Option<String> = row.get(6)?;
    let languages = languages_json
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok());

    Ok(Professional {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        photo_url: row.get(4)?,
        area_of_expertise: row.get(5)?,
        languages,
        city: row.get(7)?,
        country: row.get(8)?,
        created_at: parse_timestamp(row.get::<_, String>(9)?),
        updated_at: parse_timestamp(row.get::<_, String>(10)?),
    })
}

// ── Clients ──

const CLIENT_COLS: &str =
    "id, name, age, email, phone_no, city, q_and_a, sessions, created_at, updated_at";

pub fn get_client(conn: &Connection, id: i64) -> anyhow::Result<Option<Client>> {
    client_query_row(
        conn,
        &format!("SELECT {CLIENT_COLS} FROM client WHERE id = ?1"),
        params![id],
    )
}

pub fn get_client_by_phone(conn: &Connection, phone: &str) -> anyhow::Result<Option<Client>> {
    client_query_row(
        conn,
        &format!("SELECT {CLIENT_COLS} FROM client WHERE phone_no = ?1 LIMIT 1"),
        params![phone],
    )
}

pub fn get_client_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<Client>> {
    client_query_row(
        conn,
        &format!("SELECT {CLIENT_COLS} FROM client WHERE email = ?1 COLLATE NOCASE LIMIT 1"),
        params![email],
    )
}

pub fn insert_client(conn: &Connection, patch: &ClientPatch) -> anyhow::Result<Client> {
    let q_and_a_json = patch.q_and_a.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "INSERT INTO client (name, age, email, phone_no, city, q_and_a)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patch.name,
            patch.age,
            patch.email,
            patch.phone_no,
            patch.city,
            q_and_a_json,
        ],
    )?;

    let id = conn.last_insert_rowid();
    get_client(conn, id)?.ok_or_else(|| anyhow::anyhow!("client {id} vanished after insert"))
}

/// Overwrites only the supplied fields; omitted fields keep their values.
pub fn update_client(conn: &Connection, id: i64, patch: &ClientPatch) -> anyhow::Result<Client> {
    let q_and_a_json = patch.q_and_a.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "UPDATE client SET
           name = COALESCE(?1, name),
           age = COALESCE(?2, age),
           email = COALESCE(?3, email),
           phone_no = COALESCE(?4, phone_no),
           city = COALESCE(?5, city),
           q_and_a = COALESCE(?6, q_and_a),
           updated_at = datetime('now')
         WHERE id = ?7",
        params![
            patch.name,
            patch.age,
            patch.email,
            patch.phone_no,
            patch.city,
            q_and_a_json,
            id,
        ],
    )?;

    get_client(conn, id)?.ok_or_else(|| anyhow::anyhow!("client {id} vanished after update"))
}

fn client_query_row(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> anyhow::Result<Option<Client>> {
    let result = conn.query_row(sql, params, |row| Ok(parse_client_row(row)));

    match result {
        Ok(client) => Ok(Some(client?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_client_row(row: &Row) -> anyhow::Result<Client> {
    let q_and_a_json: Option<String> = row.get(6)?;
    let q_and_a = q_and_a_json
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok());

    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        email: row.get(3)?,
        phone_no: row.get(4)?,
        city: row.get(5)?,
        q_and_a,
        sessions: row.get(7)?,
        created_at: parse_timestamp(row.get::<_, String>(8)?),
        updated_at: parse_timestamp(row.get::<_, String>(9)?),
    })
}

fn parse_timestamp(s: String) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").unwrap_or_else(|_| Utc::now().naive_utc())
}
