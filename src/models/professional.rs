use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The fixed set of expertise tags the matcher filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expertise {
    ClinicalPsychologist,
    CounselingPsychologist,
    WellnessBuddy,
}

impl Expertise {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expertise::ClinicalPsychologist => "Clinical Psychologist",
            Expertise::CounselingPsychologist => "Counseling Psychologist",
            Expertise::WellnessBuddy => "Wellness Buddy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Clinical Psychologist" => Some(Expertise::ClinicalPsychologist),
            "Counseling Psychologist" => Some(Expertise::CounselingPsychologist),
            "Wellness Buddy" => Some(Expertise::WellnessBuddy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub area_of_expertise: Option<String>,
    pub languages: Option<Vec<String>>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Professional {
    /// Human-readable language list for the profile notification.
    pub fn languages_label(&self) -> String {
        match &self.languages {
            Some(list) if !list.is_empty() => list.join(", "),
            _ => "English, Hindi".to_string(),
        }
    }

    pub fn photo_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.photo_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(default)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfessional {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub area_of_expertise: Option<String>,
    pub languages: Option<Vec<String>>,
    pub city: Option<String>,
    pub country: Option<String>,
}
