/// Every intent the webhook knows how to handle. Parsing an unknown display
/// name yields `Fallback`, so the router always has somewhere to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Welcome,
    CollectUserInfo,
    GetClinicalProfessional,
    GetCounselingProfessional,
    GetScholarProfessional,
    BookPsychologistSession,
    SuggestAnotherProfessional,
    Fallback,
}

impl Intent {
    pub fn from_display_name(name: &str) -> Self {
        match name {
            "Default Welcome Intent" => Intent::Welcome,
            "collectUserInfo" => Intent::CollectUserInfo,
            "getClinicalProfessional" => Intent::GetClinicalProfessional,
            "getCounselingProfessional" => Intent::GetCounselingProfessional,
            "getScholarProfessional" => Intent::GetScholarProfessional,
            "bookPsychologistSession" => Intent::BookPsychologistSession,
            "suggestAnotherProfessional" => Intent::SuggestAnotherProfessional,
            _ => Intent::Fallback,
        }
    }

    pub fn as_display_name(&self) -> &'static str {
        match self {
            Intent::Welcome => "Default Welcome Intent",
            Intent::CollectUserInfo => "collectUserInfo",
            Intent::GetClinicalProfessional => "getClinicalProfessional",
            Intent::GetCounselingProfessional => "getCounselingProfessional",
            Intent::GetScholarProfessional => "getScholarProfessional",
            Intent::BookPsychologistSession => "bookPsychologistSession",
            Intent::SuggestAnotherProfessional => "suggestAnotherProfessional",
            Intent::Fallback => "Default Fallback Intent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_display_names() {
        assert_eq!(
            Intent::from_display_name("getClinicalProfessional"),
            Intent::GetClinicalProfessional
        );
        assert_eq!(
            Intent::from_display_name("bookPsychologistSession"),
            Intent::BookPsychologistSession
        );
        assert_eq!(
            Intent::from_display_name("Default Welcome Intent"),
            Intent::Welcome
        );
    }

    #[test]
    fn test_unknown_display_name_falls_back() {
        assert_eq!(Intent::from_display_name("orderPizza"), Intent::Fallback);
        assert_eq!(Intent::from_display_name(""), Intent::Fallback);
    }
}
