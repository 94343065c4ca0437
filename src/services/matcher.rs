use rand::seq::SliceRandom;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Expertise, Professional};

/// Picks one professional with the given expertise tag, uniformly at random
/// among all matches. Deliberately unweighted: no rating, ranking or
/// availability filter at this layer.
pub fn find_random(
    conn: &Connection,
    expertise: Expertise,
) -> anyhow::Result<Option<Professional>> {
    let professionals = queries::professionals_by_expertise(conn, expertise.as_str())?;
    Ok(professionals.choose(&mut rand::thread_rng()).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewProfessional;

    fn seed(conn: &Connection, name: &str, expertise: &str) {
        queries::create_professional(
            conn,
            &NewProfessional {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                phone: "919800000000".to_string(),
                photo_url: None,
                area_of_expertise: Some(expertise.to_string()),
                languages: None,
                city: None,
                country: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_no_match_returns_none() {
        let conn = db::init_db(":memory:").unwrap();
        seed(&conn, "Dr. Iyer", "Clinical Psychologist");

        let result = find_random(&conn, Expertise::WellnessBuddy).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_filters_by_expertise_tag() {
        let conn = db::init_db(":memory:").unwrap();
        seed(&conn, "Dr. Iyer", "Clinical Psychologist");
        seed(&conn, "Dr. Rao", "Counseling Psychologist");

        for _ in 0..20 {
            let pro = find_random(&conn, Expertise::CounselingPsychologist)
                .unwrap()
                .unwrap();
            assert_eq!(pro.full_name, "Dr. Rao");
        }
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let conn = db::init_db(":memory:").unwrap();
        for name in ["Dr. Iyer", "Dr. Rao", "Dr. Mehta"] {
            seed(&conn, name, "Clinical Psychologist");
        }

        let trials = 600;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..trials {
            let pro = find_random(&conn, Expertise::ClinicalPsychologist)
                .unwrap()
                .unwrap();
            *counts.entry(pro.full_name).or_insert(0u32) += 1;
        }

        assert_eq!(counts.len(), 3);
        // Expected 200 each; a fair draw stays well inside these bounds.
        for (name, count) in counts {
            assert!(
                (120..=280).contains(&count),
                "selection skewed: {name} chosen {count}/{trials} times"
            );
        }
    }
}
