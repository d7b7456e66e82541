use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Amber", "Quiet", "Crimson", "Patient", "Hidden", "Silver", "Northern", "Lucky",
    "Stubborn", "Hollow", "Distant", "Rapid", "Bright", "Sleepy", "Crooked", "Open",
];

const NOUNS: &[&str] = &[
    "Stone", "Crossing", "Lantern", "Garden", "Harbor", "Meadow", "Ridge", "Bridge",
    "Orchard", "Summit", "Valley", "Grove", "Beacon", "Courtyard", "Terrace", "Pavilion",
];

/// Human-friendly name for a session the host did not bother to name.
pub fn generate_session_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{} {}", adjective, noun)
}

pub fn computer_participant_id(seat_index: usize) -> String {
    format!("computer-{}", seat_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_name_has_two_words() {
        let name = generate_session_name();
        assert_eq!(name.split(' ').count(), 2);
    }

    #[test]
    fn test_computer_ids_are_one_based() {
        assert_eq!(computer_participant_id(1), "computer-2");
    }
}
