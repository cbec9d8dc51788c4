//! Task classifier: keyword scoring over bilingual (Persian + English) trigger phrases.
//!
//! Each phrase is matched as a literal substring of the lower-cased input. A category's score
//! is the total number of occurrences of all its phrases; the highest score wins, ties go to
//! the category listed first in [`TaskClassifier::PRIORITY`], and no match at all yields
//! [`TaskCategory::Conversation`].

use crate::shared::TaskCategory;

const FINANCIAL_ADVICE: &[&str] = &[
    "سهام", "بورس", "ارز", "بیت کوین", "تریدینگ", "سرمایه‌گذاری",
    "stock", "crypto", "bitcoin", "trading", "investment",
];

const PSYCHOLOGICAL_SUPPORT: &[&str] = &[
    "غمگین", "استرس", "اضطراب", "مشکل", "نگران", "افسرده",
    "sad", "stress", "anxiety", "worried", "depressed", "help me",
];

const CREATIVE_WRITING: &[&str] = &[
    "داستان", "شعر", "نوشتن", "خلاقیت", "متن",
    "story", "poem", "write", "creative", "content",
];

const TRANSLATION: &[&str] = &["ترجمه", "translate", "معنی", "meaning"];

const MEDITATION: &[&str] = &[
    "آرامش", "مدیتیشن", "تنفس", "آرام", "استراحت",
    "meditation", "relax", "calm", "peace", "breathe",
];

const RESEARCH: &[&str] = &[
    "تحقیق", "جستجو", "اطلاعات", "یاد بگیر", "بگو",
    "research", "search", "information", "learn", "tell me",
];

const TECHNICAL_ANALYSIS: &[&str] = &[
    "تحلیل تکنیکال", "نمودار", "اندیکاتور", "میانگین متحرک",
    "technical analysis", "chart", "indicator", "moving average", "rsi", "macd",
];

const CONTENT_GENERATION: &[&str] = &[
    "تولید محتوا", "مقاله", "کپشن", "شعار تبلیغاتی",
    "article", "blog post", "caption", "slogan", "newsletter",
];

const COMPANIONSHIP: &[&str] = &[
    "تنهایی", "همراهم باش", "باهام حرف بزن", "دلم گرفته",
    "lonely", "keep me company", "talk with me", "be my friend",
];

/// Keyword-scoring classifier with a fixed tie-break order.
#[derive(Debug, Clone)]
pub struct TaskClassifier {
    table: Vec<(TaskCategory, &'static [&'static str])>,
}

impl TaskClassifier {
    /// Tie-break order among equally scored categories (earlier wins).
    pub const PRIORITY: [TaskCategory; 9] = [
        TaskCategory::FinancialAdvice,
        TaskCategory::PsychologicalSupport,
        TaskCategory::CreativeWriting,
        TaskCategory::Translation,
        TaskCategory::Meditation,
        TaskCategory::Research,
        TaskCategory::TechnicalAnalysis,
        TaskCategory::ContentGeneration,
        TaskCategory::Companionship,
    ];

    pub fn new() -> Self {
        let table = Self::PRIORITY
            .iter()
            .map(|&category| (category, trigger_phrases(category)))
            .collect();
        Self { table }
    }

    /// Per-category scores in priority order (zero scores included).
    pub fn scores(&self, text: &str) -> Vec<(TaskCategory, usize)> {
        let input = text.to_lowercase();
        self.table
            .iter()
            .map(|(category, phrases)| {
                let score = phrases
                    .iter()
                    .map(|p| count_occurrences(&input, p))
                    .sum();
                (*category, score)
            })
            .collect()
    }

    /// Maps free text to exactly one category. Never fails.
    pub fn classify(&self, text: &str) -> TaskCategory {
        let mut best: Option<(TaskCategory, usize)> = None;
        for (category, score) in self.scores(text) {
            if score == 0 {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((category, score)),
            }
        }
        best.map(|(c, _)| c).unwrap_or_default()
    }
}

impl Default for TaskClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over a default [`TaskClassifier`].
pub fn classify(text: &str) -> TaskCategory {
    TaskClassifier::new().classify(text)
}

/// Trigger phrases for a category. The default category has none.
pub fn trigger_phrases(category: TaskCategory) -> &'static [&'static str] {
    match category {
        TaskCategory::FinancialAdvice => FINANCIAL_ADVICE,
        TaskCategory::PsychologicalSupport => PSYCHOLOGICAL_SUPPORT,
        TaskCategory::CreativeWriting => CREATIVE_WRITING,
        TaskCategory::Translation => TRANSLATION,
        TaskCategory::Meditation => MEDITATION,
        TaskCategory::Research => RESEARCH,
        TaskCategory::TechnicalAnalysis => TECHNICAL_ANALYSIS,
        TaskCategory::ContentGeneration => CONTENT_GENERATION,
        TaskCategory::Companionship => COMPANIONSHIP,
        TaskCategory::Conversation => &[],
    }
}

/// Counts occurrences of `needle` in `haystack`, overlapping ones included.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        count += 1;
        // advance one char past the match start so overlapping hits are seen
        let step = rest[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
        rest = &rest[pos + step..];
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persian_samples() {
        let c = TaskClassifier::new();
        assert_eq!(c.classify("چگونه سهام بخرم؟"), TaskCategory::FinancialAdvice);
        assert_eq!(c.classify("احساس غمگینی می‌کنم"), TaskCategory::PsychologicalSupport);
        assert_eq!(c.classify("یک داستان کوتاه بنویس"), TaskCategory::CreativeWriting);
        assert_eq!(c.classify("ترجمه کن"), TaskCategory::Translation);
        assert_eq!(c.classify("درباره هوش مصنوعی تحقیق کن"), TaskCategory::Research);
        assert_eq!(c.classify("سلام حالت چطوره؟"), TaskCategory::Conversation);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(classify(""), TaskCategory::Conversation);
        assert_eq!(classify("   "), TaskCategory::Conversation);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("Should I buy BITCOIN?"), TaskCategory::FinancialAdvice);
        assert_eq!(classify("Please TRANSLATE this"), TaskCategory::Translation);
    }

    #[test]
    fn test_higher_count_wins() {
        // one meditation phrase vs two financial phrases
        assert_eq!(classify("calm me down about my stock and crypto"), TaskCategory::FinancialAdvice);
        // "research" contains "search": research scores 2 vs translation 1
        assert_eq!(classify("research the meaning"), TaskCategory::Research);
    }

    #[test]
    fn test_repeated_phrase_counts_twice() {
        // meditation: calm x2 = 2, financial: stock = 1
        assert_eq!(classify("calm, calm, then stock"), TaskCategory::Meditation);
    }

    #[test]
    fn test_tie_resolved_by_priority() {
        // one hit each: financial_advice precedes meditation
        assert_eq!(classify("relax about trading"), TaskCategory::FinancialAdvice);
        // one hit each: creative_writing precedes research
        assert_eq!(classify("poem, learn"), TaskCategory::CreativeWriting);
        for _ in 0..5 {
            assert_eq!(classify("relax about trading"), TaskCategory::FinancialAdvice);
        }
    }

    #[test]
    fn test_supplemented_categories() {
        assert_eq!(classify("draw an rsi chart"), TaskCategory::TechnicalAnalysis);
        assert_eq!(classify("a newsletter slogan"), TaskCategory::ContentGeneration);
        assert_eq!(classify("I feel lonely tonight"), TaskCategory::Companionship);
    }

    #[test]
    fn test_overlapping_occurrences() {
        assert_eq!(count_occurrences("aaa", "aa"), 2);
        assert_eq!(count_occurrences("سهام سهام", "سهام"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }

    #[test]
    fn test_every_non_default_category_has_phrases() {
        for c in TaskCategory::ALL {
            let phrases = trigger_phrases(c);
            if c == TaskCategory::Conversation {
                assert!(phrases.is_empty());
            } else {
                assert!(!phrases.is_empty(), "{} has no phrases", c);
                assert!(phrases.iter().all(|p| *p == p.to_lowercase()));
            }
        }
    }
}
