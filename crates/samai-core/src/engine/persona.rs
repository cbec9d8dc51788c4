//! Personality layer: the assistant's persona and the post-hoc tone pass over responses.
//!
//! A [`PersonalityProfile`] is built from one of three presets (friendly, professional,
//! companion). It is folded into the system prompt at dispatch time, then
//! [`PersonalityEngine::apply`] decorates successful responses: informal openers for casual
//! personas, empathetic phrases for highly empathetic personas on psychological support.
//! Every augmentation is gated by a profile level crossing a threshold *and* a random draw;
//! the randomness source is injected so callers can pin it.

use super::dispatch::ResponseRecord;
use crate::shared::TaskCategory;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Formality strictly below this enables informal openers.
pub const INFORMAL_FORMALITY_THRESHOLD: f32 = 0.5;
pub const INFORMAL_OPENER_PROBABILITY: f64 = 0.3;
/// Empathy strictly above this enables empathetic phrases on psychological support.
pub const EMPATHY_LEVEL_THRESHOLD: f32 = 0.8;
pub const EMPATHY_PHRASE_PROBABILITY: f64 = 0.4;
/// Declared for the humor pass, which has no behavior yet.
pub const HUMOR_LEVEL_THRESHOLD: f32 = 0.6;
pub const HUMOR_PROBABILITY: f64 = 0.2;

const INFORMAL_OPENERS: &[&str] = &["راستش", "ببین", "خب", "Well", "So"];
const GREETINGS: &[&str] = &["سلام", "hello", "hi"];
const EMPATHY_PHRASES: &[&str] = &[
    "درکت می‌کنم",
    "حست رو می‌فهمم",
    "I understand how you feel",
    "این واقعاً سخته",
    "You're not alone in this",
];

const FEMALE_NAMES: &[&str] = &["آریا", "نیلا", "سارا", "مهرناز", "الهام", "Aria", "Luna", "Sophie"];
const MALE_NAMES: &[&str] = &["آرش", "کیان", "امیر", "پویا", "سینا", "Alex", "Max", "David"];
const NEUTRAL_NAMES: &[&str] = &["آی", "هوشیار", "دانا", "AI", "Assistant", "Helper"];

const EXPERTISE_AREAS: &[&str] = &[
    "مکالمه عمومی", "مشاوره", "تولید محتوا", "تحلیل مالی", "حمایت روانی", "آموزش", "سرگرمی",
];

/// Display attribute; only used for prompt text and name pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Neutral,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Neutral => "neutral",
        }
    }

    /// Unknown or empty values map to `Neutral`.
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            s if s.eq_ignore_ascii_case("male") => Gender::Male,
            s if s.eq_ignore_ascii_case("female") => Gender::Female,
            _ => Gender::Neutral,
        }
    }

    fn name_pool(&self) -> &'static [&'static str] {
        match self {
            Gender::Male => MALE_NAMES,
            Gender::Female => FEMALE_NAMES,
            Gender::Neutral => NEUTRAL_NAMES,
        }
    }
}

/// Persona preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    #[default]
    Friendly,
    Professional,
    Companion,
}

impl PersonalityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalityType::Friendly => "friendly",
            PersonalityType::Professional => "professional",
            PersonalityType::Companion => "companion",
        }
    }

    /// Unknown presets fall back to `Friendly`.
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            s if s.eq_ignore_ascii_case("professional") => PersonalityType::Professional,
            s if s.eq_ignore_ascii_case("companion") => PersonalityType::Companion,
            _ => PersonalityType::Friendly,
        }
    }

    fn preset(&self) -> Preset {
        match self {
            PersonalityType::Friendly => Preset {
                traits: &["دوستانه", "مهربان", "صبور", "کمک‌کار"],
                communication_style: "گرم و صمیمی",
                empathy_level: 0.9,
                humor_level: 0.7,
                formality_level: 0.3,
            },
            PersonalityType::Professional => Preset {
                traits: &["حرفه‌ای", "دقیق", "قابل اعتماد", "کارآمد"],
                communication_style: "رسمی و مؤدبانه",
                empathy_level: 0.6,
                humor_level: 0.3,
                formality_level: 0.8,
            },
            PersonalityType::Companion => Preset {
                traits: &["رفیق", "درک‌کننده", "حمایت‌گر", "آرام‌بخش"],
                communication_style: "صمیمی و حمایت‌کننده",
                empathy_level: 0.95,
                humor_level: 0.8,
                formality_level: 0.2,
            },
        }
    }
}

struct Preset {
    traits: &'static [&'static str],
    communication_style: &'static str,
    empathy_level: f32,
    humor_level: f32,
    formality_level: f32,
}

/// The active persona. Levels are always within [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub name: String,
    pub gender: Gender,
    pub personality_type: PersonalityType,
    pub traits: Vec<String>,
    pub communication_style: String,
    pub expertise_areas: Vec<String>,
    pub emotional_intelligence: f32,
    pub humor_level: f32,
    pub formality_level: f32,
    pub empathy_level: f32,
}

impl PersonalityProfile {
    /// Builds a profile from a preset. Without a name, one is drawn from the gender's pool.
    pub fn from_preset<R: Rng + ?Sized>(
        gender: Gender,
        name: Option<&str>,
        personality_type: PersonalityType,
        rng: &mut R,
    ) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| gender.name_pool().choose(rng).map(|n| n.to_string()))
            .unwrap_or_else(|| "Assistant".to_string());
        let preset = personality_type.preset();
        Self {
            name,
            gender,
            personality_type,
            traits: preset.traits.iter().map(|t| t.to_string()).collect(),
            communication_style: preset.communication_style.to_string(),
            expertise_areas: EXPERTISE_AREAS.iter().map(|t| t.to_string()).collect(),
            emotional_intelligence: preset.empathy_level,
            humor_level: preset.humor_level,
            formality_level: preset.formality_level,
            empathy_level: preset.empathy_level,
        }
        .clamped()
    }

    /// Forces every level into [0, 1]; NaN becomes 0.
    pub fn clamped(mut self) -> Self {
        for level in [
            &mut self.emotional_intelligence,
            &mut self.humor_level,
            &mut self.formality_level,
            &mut self.empathy_level,
        ] {
            *level = if level.is_nan() { 0.0 } else { (*level).clamp(0.0, 1.0) };
        }
        self
    }

    /// Plain sentences folded into the system instruction at dispatch time.
    pub fn prompt_description(&self) -> String {
        format!(
            "نام شما {} است و جنسیت شما {} است.\nویژگی‌های شخصیتی شما: {}\nسبک ارتباطی شما: {}",
            self.name,
            self.gender.as_str(),
            self.traits.join("، "),
            self.communication_style
        )
    }
}

/// Post-hoc tone pass. Stateless; the profile is read-only here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalityEngine;

impl PersonalityEngine {
    /// Decorates a successful response according to `profile`. Failed responses and the
    /// no-profile case are returned untouched.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        mut response: ResponseRecord,
        category: TaskCategory,
        profile: Option<&PersonalityProfile>,
        rng: &mut R,
    ) -> ResponseRecord {
        let Some(profile) = profile else {
            return response;
        };
        if !response.success {
            return response;
        }

        let mut content = std::mem::take(&mut response.content);

        if profile.formality_level < INFORMAL_FORMALITY_THRESHOLD
            && !starts_with_greeting(&content)
            && rng.gen_bool(INFORMAL_OPENER_PROBABILITY)
        {
            if let Some(opener) = INFORMAL_OPENERS.choose(rng) {
                content = format!("{}, {}", opener, content);
            }
        }

        if category == TaskCategory::PsychologicalSupport
            && profile.empathy_level > EMPATHY_LEVEL_THRESHOLD
            && rng.gen_bool(EMPATHY_PHRASE_PROBABILITY)
        {
            if let Some(phrase) = EMPATHY_PHRASES.choose(rng) {
                content = format!("{}. {}", phrase, content);
            }
        }

        // TODO: humor pass (HUMOR_LEVEL_THRESHOLD / HUMOR_PROBABILITY) once a humor style is defined.
        if profile.humor_level > HUMOR_LEVEL_THRESHOLD
            && matches!(category, TaskCategory::Conversation | TaskCategory::CreativeWriting)
        {
            tracing::trace!(target: "samai::persona", "humor pass eligible; no-op");
        }

        response.content = content;
        response.personality_applied = true;
        response.personality_name = Some(profile.name.clone());
        response
    }
}

fn starts_with_greeting(content: &str) -> bool {
    let head = content.trim_start().to_lowercase();
    GREETINGS.iter().any(|g| {
        head.strip_prefix(g)
            .is_some_and(|rest| rest.chars().next().map_or(true, |c| !c.is_alphanumeric()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every `gen_bool` succeeds and every `choose` picks the first element.
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every `gen_bool` fails.
    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn ok(content: &str) -> ResponseRecord {
        ResponseRecord::succeeded("gpt-4", TaskCategory::Conversation, content.to_string(), Some(5))
    }

    fn profile(t: PersonalityType) -> PersonalityProfile {
        PersonalityProfile::from_preset(Gender::Female, Some("نیلا"), t, &mut always())
    }

    #[test]
    fn test_presets_and_parse() {
        let p = profile(PersonalityType::Professional);
        assert!(p.traits.contains(&"حرفه‌ای".to_string()));
        assert_eq!(p.formality_level, 0.8);
        assert_eq!(PersonalityType::from_str("unknown"), PersonalityType::Friendly);
        assert_eq!(Gender::from_str("FEMALE"), Gender::Female);
        assert_eq!(Gender::from_str(""), Gender::Neutral);
    }

    #[test]
    fn test_name_drawn_from_gender_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = PersonalityProfile::from_preset(Gender::Male, None, PersonalityType::Friendly, &mut rng);
        assert!(MALE_NAMES.contains(&p.name.as_str()));
        let p = PersonalityProfile::from_preset(Gender::Neutral, Some("  "), PersonalityType::Friendly, &mut always());
        assert_eq!(p.name, NEUTRAL_NAMES[0]);
    }

    #[test]
    fn test_levels_clamped() {
        let mut p = profile(PersonalityType::Friendly);
        p.humor_level = 3.0;
        p.empathy_level = -1.0;
        p.formality_level = f32::NAN;
        let p = p.clamped();
        assert_eq!(p.humor_level, 1.0);
        assert_eq!(p.empathy_level, 0.0);
        assert_eq!(p.formality_level, 0.0);
    }

    #[test]
    fn test_no_profile_is_pass_through() {
        let out = PersonalityEngine.apply(ok("hello"), TaskCategory::Conversation, None, &mut always());
        assert_eq!(out, ok("hello"));
    }

    #[test]
    fn test_failed_response_unchanged() {
        let failed = ResponseRecord::failed("gpt-4", TaskCategory::PsychologicalSupport, "boom".to_string());
        let p = profile(PersonalityType::Companion);
        let out = PersonalityEngine.apply(failed.clone(), TaskCategory::PsychologicalSupport, Some(&p), &mut always());
        assert_eq!(out, failed);
        assert_eq!(out.content, failed.content);
    }

    #[test]
    fn test_informal_opener_prepended() {
        let p = profile(PersonalityType::Friendly);
        let out = PersonalityEngine.apply(ok("امروز هوا خوب است."), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "راستش, امروز هوا خوب است.");
        assert!(out.personality_applied);
        assert_eq!(out.personality_name.as_deref(), Some("نیلا"));
    }

    #[test]
    fn test_no_opener_when_greeting_present() {
        let p = profile(PersonalityType::Friendly);
        let out = PersonalityEngine.apply(ok("Hello there"), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "Hello there");
        let out = PersonalityEngine.apply(ok("سلام دوست من"), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "سلام دوست من");
        let out = PersonalityEngine.apply(ok("hi!"), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "hi!");
    }

    #[test]
    fn test_greeting_must_be_a_whole_word() {
        let p = profile(PersonalityType::Friendly);
        let out = PersonalityEngine.apply(
            ok("History shows markets recover."),
            TaskCategory::Conversation,
            Some(&p),
            &mut always(),
        );
        assert_eq!(out.content, "راستش, History shows markets recover.");
        let out = PersonalityEngine.apply(ok("سلامتی مهم است"), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "راستش, سلامتی مهم است");
    }

    #[test]
    fn test_formality_at_threshold_gets_no_opener() {
        let mut p = profile(PersonalityType::Friendly);
        p.formality_level = INFORMAL_FORMALITY_THRESHOLD;
        let out = PersonalityEngine.apply(ok("Markets recover."), TaskCategory::Conversation, Some(&p), &mut always());
        assert_eq!(out.content, "Markets recover.");
    }

    #[test]
    fn test_empathy_at_threshold_gets_no_phrase() {
        let mut p = profile(PersonalityType::Companion);
        p.formality_level = 0.9;
        p.empathy_level = EMPATHY_LEVEL_THRESHOLD;
        let out = PersonalityEngine.apply(ok("Breathe."), TaskCategory::PsychologicalSupport, Some(&p), &mut always());
        assert_eq!(out.content, "Breathe.");
        assert!(out.personality_applied);
    }

    #[test]
    fn test_formal_profile_never_gets_opener() {
        let p = profile(PersonalityType::Professional);
        let out = PersonalityEngine.apply(ok("Index funds."), TaskCategory::FinancialAdvice, Some(&p), &mut always());
        assert_eq!(out.content, "Index funds.");
        assert!(out.personality_applied);
    }

    #[test]
    fn test_empathy_phrase_on_psychological_support() {
        let mut p = profile(PersonalityType::Companion);
        p.formality_level = 0.9;
        let out = PersonalityEngine.apply(ok("Try breathing slowly."), TaskCategory::PsychologicalSupport, Some(&p), &mut always());
        assert_eq!(out.content, "درکت می‌کنم. Try breathing slowly.");
    }

    #[test]
    fn test_both_augmentations_stack() {
        let p = profile(PersonalityType::Companion);
        let out = PersonalityEngine.apply(ok("Breathe."), TaskCategory::PsychologicalSupport, Some(&p), &mut always());
        assert_eq!(out.content, "درکت می‌کنم. راستش, Breathe.");
    }

    #[test]
    fn test_losing_draws_only_annotate() {
        let p = profile(PersonalityType::Companion);
        let out = PersonalityEngine.apply(ok("Breathe."), TaskCategory::PsychologicalSupport, Some(&p), &mut never());
        assert_eq!(out.content, "Breathe.");
        assert!(out.personality_applied);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let p = profile(PersonalityType::Companion);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| PersonalityEngine.apply(ok("x"), TaskCategory::PsychologicalSupport, Some(&p), &mut rng).content)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_prompt_description_mentions_name_and_style() {
        let p = profile(PersonalityType::Friendly);
        let d = p.prompt_description();
        assert!(d.contains("نیلا"));
        assert!(d.contains("female"));
        assert!(d.contains("گرم و صمیمی"));
    }
}
