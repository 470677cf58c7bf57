//! Built-in guideline entries used when no source documents are available.

use medassist_shared::{Category, GuidelineEntry, Priority};

fn entry(
    id: &str,
    category: Category,
    text: &str,
    source: &str,
    priority: Priority,
    keywords: &[&str],
) -> GuidelineEntry {
    GuidelineEntry {
        id: id.to_string(),
        category,
        text: text.to_string(),
        source: source.to_string(),
        priority,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

/// The fixed sample knowledge set, in output order.
pub fn sample_entries() -> Vec<GuidelineEntry> {
    vec![
        entry(
            "fever_001",
            Category::FeverManagement,
            "Fever management in resource-limited settings: Administer paracetamol 500-1000mg \
             every 4-6 hours (maximum 4g per day). Ensure adequate fluid intake. Use tepid \
             sponging for high fever. Monitor for danger signs including difficulty breathing, \
             severe headache, or altered consciousness.",
            "who_guidelines",
            Priority::Medium,
            &["fever", "paracetamol", "fluid", "temperature"],
        ),
        entry(
            "wound_001",
            Category::WoundCare,
            "Basic wound care procedure: Clean hands thoroughly. Stop bleeding with direct \
             pressure. Clean wound with clean water or saline. Apply antibiotic ointment if \
             available. Cover with sterile dressing. Change dressing daily and monitor for signs \
             of infection.",
            "first_aid_manual",
            Priority::High,
            &["wound", "bleeding", "infection", "dressing", "antibiotic"],
        ),
        entry(
            "dehydration_001",
            Category::FluidManagement,
            "Oral rehydration therapy: Mix 1 liter clean water with 6 teaspoons sugar and 1/2 \
             teaspoon salt. Give small frequent sips. For severe dehydration, give 75ml/kg over \
             first 4 hours for children, 3 liters over 6 hours for adults.",
            "who_guidelines",
            Priority::High,
            &["dehydration", "oral rehydration", "salt", "sugar", "fluid"],
        ),
        entry(
            "respiratory_001",
            Category::RespiratoryEmergency,
            "Respiratory distress management: Position patient upright. Ensure airway is clear. \
             Give oxygen if available. For asthma, use bronchodilator inhaler. Seek immediate \
             medical attention for severe breathing difficulty, blue lips, or inability to speak.",
            "emergency_protocols",
            Priority::Critical,
            &["breathing", "respiratory", "asthma", "oxygen", "emergency"],
        ),
        entry(
            "emergency_001",
            Category::EmergencyCare,
            "Emergency assessment: Check consciousness level, breathing, and pulse. Call for help \
             immediately. Begin CPR if no pulse detected. Control severe bleeding with direct \
             pressure. Keep patient warm and monitor vital signs.",
            "emergency_protocols",
            Priority::Critical,
            &["emergency", "cpr", "bleeding", "consciousness", "vital signs"],
        ),
    ]
}
