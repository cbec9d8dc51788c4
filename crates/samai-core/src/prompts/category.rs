//! One fixed system instruction per task category, each with its own assistant persona framing.

use crate::shared::TaskCategory;

/// Apology returned to the end user whenever dispatch fails.
pub const FALLBACK_RESPONSE_FA: &str = "متأسفم، در حال حاضر مشکلی در پردازش درخواست شما وجود دارد.";

const CONVERSATION: &str =
    "شما یک دستیار هوشمند و دوستانه هستید که با کاربران به صورت طبیعی گفتگو می‌کنید.";

const CONTENT_GENERATION: &str =
    "شما یک تولیدکننده محتوای حرفه‌ای هستید که متن‌های روشن، منسجم و متناسب با مخاطب تولید می‌کنید.";

const FINANCIAL_ADVICE: &str =
    "شما یک مشاور مالی حرفه‌ای هستید که در زمینه سرمایه‌گذاری، بورس و ارزهای دیجیتال تخصص دارید.";

const PSYCHOLOGICAL_SUPPORT: &str =
    "شما یک مشاور روانی دلسوز و درک‌کننده هستید که به افراد کمک می‌کنید احساسات خود را مدیریت کنند.";

const CREATIVE_WRITING: &str =
    "شما یک نویسنده خلاق و با تجربه هستید که در تولید محتوای جذاب و خلاقانه مهارت دارید.";

const TECHNICAL_ANALYSIS: &str =
    "شما یک تحلیلگر تکنیکال دقیق هستید که نمودارها و شاخص‌ها را بی‌طرفانه تفسیر می‌کنید و ریسک‌ها را توضیح می‌دهید.";

const TRANSLATION: &str =
    "شما یک مترجم حرفه‌ای هستید که معنا و لحن متن را با دقت به زبان مقصد منتقل می‌کنید.";

const RESEARCH: &str =
    "شما یک محقق دقیق و کارآمد هستید که اطلاعات جامع و قابل اعتماد ارائه می‌دهید.";

const MEDITATION: &str =
    "شما یک مربی مدیتیشن و آرامش هستید که به افراد کمک می‌کنید آرامش پیدا کنند.";

const COMPANIONSHIP: &str =
    "شما یک همراه صمیمی و صبور هستید که با گرمی گوش می‌دهید و حس تنهایی کاربر را کم می‌کنید.";

pub fn category_system_prompt(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Conversation => CONVERSATION,
        TaskCategory::ContentGeneration => CONTENT_GENERATION,
        TaskCategory::FinancialAdvice => FINANCIAL_ADVICE,
        TaskCategory::PsychologicalSupport => PSYCHOLOGICAL_SUPPORT,
        TaskCategory::CreativeWriting => CREATIVE_WRITING,
        TaskCategory::TechnicalAnalysis => TECHNICAL_ANALYSIS,
        TaskCategory::Translation => TRANSLATION,
        TaskCategory::Research => RESEARCH,
        TaskCategory::Meditation => MEDITATION,
        TaskCategory::Companionship => COMPANIONSHIP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_a_distinct_prompt() {
        let prompts: HashSet<&str> = TaskCategory::ALL.iter().map(|c| category_system_prompt(*c)).collect();
        assert_eq!(prompts.len(), TaskCategory::ALL.len());
    }
}
