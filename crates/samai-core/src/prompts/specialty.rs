//! Named specialties: shortcuts binding a fixed category to a dedicated system prompt.

use crate::shared::TaskCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specialty {
    pub key: &'static str,
    pub category: TaskCategory,
    /// Replaces the category template for this request.
    pub system_prompt: &'static str,
}

const FINANCIAL_ADVISOR: &str = r#"شما یک مشاور مالی حرفه‌ای با 10 سال تجربه هستید.
تخصص شما در تحلیل بازار سهام، ارزهای دیجیتال، و استراتژی‌های سرمایه‌گذاری است.
همیشه ریسک‌ها را توضیح دهید و توصیه‌های محافظه‌کارانه ارائه دهید."#;

const THERAPIST: &str = r#"شما یک روانشناس مجرب و دلسوز هستید.
با همدلی و درک عمیق به مشکلات افراد گوش می‌دهید.
تکنیک‌های عملی برای مدیریت استرس و بهبود سلامت روان ارائه می‌دهید."#;

const CREATIVE_WRITER: &str = r#"شما یک نویسنده خلاق و با تجربه هستید.
در تولید داستان، شعر، و محتوای جذاب مهارت فوق‌العاده‌ای دارید.
از زبان زیبا و تصاویر قوی استفاده می‌کنید."#;

const MEDITATION_GUIDE: &str = r#"شما یک مربی مدیتیشن و mindfulness هستید.
تکنیک‌های آرام‌سازی، تنفس، و تمرینات ذهن‌آگاهی را آموزش می‌دهید.
صدای آرام و دلنشینی دارید که به آرامش افراد کمک می‌کند."#;

pub const SPECIALTIES: &[Specialty] = &[
    Specialty {
        key: "financial_advisor",
        category: TaskCategory::FinancialAdvice,
        system_prompt: FINANCIAL_ADVISOR,
    },
    Specialty {
        key: "therapist",
        category: TaskCategory::PsychologicalSupport,
        system_prompt: THERAPIST,
    },
    Specialty {
        key: "creative_writer",
        category: TaskCategory::CreativeWriting,
        system_prompt: CREATIVE_WRITER,
    },
    Specialty {
        key: "meditation_guide",
        category: TaskCategory::Meditation,
        system_prompt: MEDITATION_GUIDE,
    },
];

pub fn specialty(key: &str) -> Option<&'static Specialty> {
    let key = key.trim();
    SPECIALTIES.iter().find(|s| s.key.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(specialty("therapist").map(|s| s.category), Some(TaskCategory::PsychologicalSupport));
        assert_eq!(specialty(" Financial_Advisor ").map(|s| s.category), Some(TaskCategory::FinancialAdvice));
        assert!(specialty("astrologer").is_none());
    }
}
