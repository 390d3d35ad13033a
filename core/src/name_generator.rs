//! Deterministic customer and staff names for mock datasets.
//!
//! All generation is deterministic (same RNG seed = same names).

use crate::rng::SeededRng;

pub struct NameGenerator;

impl NameGenerator {
    /// "Family Given", the order the salon's customer cards use.
    pub fn generate_full_name(rng: &mut SeededRng) -> String {
        let family = Self::generate_family_name(rng);
        let given = Self::generate_given_name(rng);
        format!("{family} {given}")
    }

    pub fn generate_family_name(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::family_names())
    }

    pub fn generate_given_name(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::given_names())
    }

    pub fn staff_name(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::staff_names())
    }

    fn family_names() -> &'static [&'static str] {
        &[
            "Sato", "Suzuki", "Takahashi", "Tanaka", "Ito", "Watanabe", "Yamamoto",
            "Nakamura", "Kobayashi", "Kato", "Yoshida", "Yamada", "Sasaki", "Yamaguchi",
            "Matsumoto", "Inoue", "Kimura", "Hayashi", "Shimizu", "Yamazaki", "Mori",
            "Ikeda", "Hashimoto", "Abe", "Ishikawa", "Maeda", "Fujita", "Ogawa",
            "Okada", "Goto",
        ]
    }

    fn given_names() -> &'static [&'static str] {
        &[
            "Yoko", "Misaki", "Nanami", "Yui", "Hanako", "Mayumi", "Kaori", "Ai",
            "Yuko", "Akemi", "Mai", "Chihiro", "Haruka", "Sakura", "Hiroko", "Asami",
            "Junko", "Aya", "Megumi", "Mariko", "Miho", "Yumi", "Tomoko", "Rie",
            "Sayaka", "Nana", "Saori", "Tomomi", "Hitomi", "Aoi",
        ]
    }

    fn staff_names() -> &'static [&'static str] {
        &["Sato", "Suzuki", "Tanaka", "Ito", "Watanabe", "Kimura", "Yamada"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::MockStream;

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = SeededRng::for_stream(12345, MockStream::Names);
        let mut rng2 = SeededRng::for_stream(12345, MockStream::Names);
        assert_eq!(
            NameGenerator::generate_full_name(&mut rng1),
            NameGenerator::generate_full_name(&mut rng2),
            "Same seed should produce same name"
        );
    }

    #[test]
    fn generates_two_part_names() {
        let mut rng = SeededRng::for_stream(12345, MockStream::Names);
        for _ in 0..100 {
            let name = NameGenerator::generate_full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {}", name);
        }
    }
}
