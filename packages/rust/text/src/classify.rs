//! Keyword-table tagging: category, priority, and keyword extraction.
//!
//! Tables are literal ordered slices. Lookups walk them front to back and the
//! first group with a substring hit wins, so reordering a table changes output.

use medassist_shared::{Category, Priority};

/// Ordered categorizer groups. Text matching none is `general_medicine`.
pub const CATEGORY_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::WarSurgery,
        &["surgery", "surgical", "operation", "amputation", "anesthesia"],
    ),
    (
        Category::BleedingControl,
        &["bleeding", "hemorrhage", "blood loss", "tourniquet", "pressure point"],
    ),
    (
        Category::WoundCare,
        &["wound", "cut", "laceration", "injury", "trauma", "bandage", "dressing"],
    ),
    (
        Category::Fractures,
        &["fracture", "broken bone", "splint", "immobilization"],
    ),
    (
        Category::Burns,
        &["burn", "thermal", "chemical burn", "electrical burn"],
    ),
    (
        Category::ShockManagement,
        &["shock", "hypotension", "circulation", "pulse"],
    ),
    (
        Category::RespiratoryEmergency,
        &["airway", "breathing", "respiratory", "ventilation", "oxygen"],
    ),
    (
        Category::PainManagement,
        &["pain", "analgesic", "morphine", "pain management"],
    ),
    (
        Category::InfectionControl,
        &["infection", "antibiotic", "sepsis", "contamination"],
    ),
    (
        Category::EmergencyCare,
        &["first aid", "emergency", "urgent", "critical", "life threatening"],
    ),
    (
        Category::FeverManagement,
        &["fever", "temperature", "pyrexia"],
    ),
    (
        Category::FluidManagement,
        &["dehydration", "fluid", "electrolyte", "iv fluid"],
    ),
    (
        Category::Cardiovascular,
        &["heart", "cardiac", "chest pain", "cpr"],
    ),
    (
        Category::Triage,
        &["triage", "priority", "mass casualty"],
    ),
];

/// Ordered priority levels. Text matching none is `medium`.
pub const PRIORITY_LEVELS: &[(Priority, &[&str])] = &[
    (
        Priority::Critical,
        &["emergency", "urgent", "critical", "life-threatening", "immediate"],
    ),
    (Priority::High, &["severe", "serious", "acute"]),
    (Priority::Low, &["chronic", "mild", "routine"]),
];

/// Candidate keywords, in output order.
pub const KEYWORD_CANDIDATES: &[&str] = &[
    "fever",
    "pain",
    "bleeding",
    "infection",
    "inflammation",
    "treatment",
    "medication",
    "dosage",
    "symptoms",
    "diagnosis",
    "emergency",
    "first aid",
    "wound",
    "burn",
    "fracture",
    "dehydration",
    "diarrhea",
    "vomiting",
    "nausea",
    "breathing",
    "cough",
    "chest pain",
    "heart rate",
    "blood pressure",
    "diabetes",
    "insulin",
    "glucose",
];

/// Maximum number of keywords attached to one passage.
pub const MAX_KEYWORDS: usize = 10;

/// Assign a topic category to `text`.
pub fn categorize(text: &str) -> Category {
    first_match(CATEGORY_GROUPS, &text.to_lowercase()).unwrap_or(Category::GeneralMedicine)
}

/// Assign an urgency level to `text`.
pub fn priority(text: &str) -> Priority {
    first_match(PRIORITY_LEVELS, &text.to_lowercase()).unwrap_or(Priority::Medium)
}

/// Collect candidate terms found in `text`, in candidate order, capped at [`MAX_KEYWORDS`].
pub fn keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KEYWORD_CANDIDATES
        .iter()
        .filter(|term| lower.contains(*term))
        .take(MAX_KEYWORDS)
        .map(|term| (*term).to_string())
        .collect()
}

fn first_match<T: Copy>(table: &[(T, &[&str])], lower: &str) -> Option<T> {
    table
        .iter()
        .find(|(_, terms)| terms.iter().any(|term| lower.contains(term)))
        .map(|(tag, _)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surgery_wins_over_bleeding() {
        let text = "During surgery, control bleeding with a tourniquet.";
        assert_eq!(categorize(text), Category::WarSurgery);
    }

    #[test]
    fn bleeding_wins_over_wound() {
        let text = "Apply a tourniquet above the wound to stop the bleeding.";
        assert_eq!(categorize(text), Category::BleedingControl);
    }

    #[test]
    fn categorize_is_case_insensitive() {
        assert_eq!(categorize("SPLINT THE LIMB"), Category::Fractures);
        assert_eq!(categorize("Check the Airway"), Category::RespiratoryEmergency);
    }

    #[test]
    fn each_group_reachable() {
        let samples = [
            ("amputation", Category::WarSurgery),
            ("hemorrhage", Category::BleedingControl),
            ("laceration", Category::WoundCare),
            ("immobilization", Category::Fractures),
            ("thermal", Category::Burns),
            ("hypotension", Category::ShockManagement),
            ("ventilation", Category::RespiratoryEmergency),
            ("morphine", Category::PainManagement),
            ("sepsis", Category::InfectionControl),
            ("life threatening", Category::EmergencyCare),
            ("pyrexia", Category::FeverManagement),
            ("electrolyte", Category::FluidManagement),
            ("cardiac", Category::Cardiovascular),
            ("mass casualty", Category::Triage),
        ];
        for (text, expected) in samples {
            assert_eq!(categorize(text), expected, "text: {text}");
        }
    }

    #[test]
    fn groups_follow_category_order() {
        let order: Vec<Category> = CATEGORY_GROUPS.iter().map(|(c, _)| *c).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(order.len(), 14);
    }

    #[test]
    fn unmatched_text_is_general_medicine() {
        assert_eq!(categorize("Wash hands with soap."), Category::GeneralMedicine);
        assert_eq!(categorize(""), Category::GeneralMedicine);
    }

    #[test]
    fn priority_levels() {
        assert_eq!(priority("Immediate transfer required"), Priority::Critical);
        assert_eq!(priority("A severe and chronic cough"), Priority::High);
        assert_eq!(priority("Routine follow-up"), Priority::Low);
        assert_eq!(priority("Give fluids"), Priority::Medium);
    }

    #[test]
    fn critical_checked_before_low() {
        assert_eq!(priority("Mild symptoms can turn life-threatening"), Priority::Critical);
    }

    #[test]
    fn keywords_follow_candidate_order() {
        let text = "Wound care: bleeding first, then fever and pain.";
        assert_eq!(keywords(text), vec!["fever", "pain", "bleeding", "wound"]);
    }

    #[test]
    fn keywords_capped_at_ten() {
        let text = KEYWORD_CANDIDATES.join(" ");
        let found = keywords(&text);
        assert_eq!(found.len(), MAX_KEYWORDS);
        assert_eq!(found, KEYWORD_CANDIDATES[..MAX_KEYWORDS].to_vec());
    }

    #[test]
    fn keywords_drawn_from_candidates() {
        let text = "Severe CHEST PAIN with nausea, low blood pressure and high glucose.";
        let found = keywords(text);
        assert_eq!(
            found,
            vec!["pain", "nausea", "chest pain", "blood pressure", "glucose"]
        );
        assert!(found.iter().all(|k| KEYWORD_CANDIDATES.contains(&k.as_str())));
    }

    #[test]
    fn no_keywords_in_unrelated_text() {
        assert!(keywords("Registration opens at noon.").is_empty());
    }
}
