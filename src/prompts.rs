//! Prompt templates for the specification assistant
//!
//! Every builder is a pure function returning the system/user pair sent to
//! the selected provider. The persona line is shared by all of them.

use crate::error::QuotaExceeded;

/// Persona and output discipline shared by every request.
pub const SYSTEM_PROMPT: &str = "Ты опытный аналитик 1С, помогающий формулировать технические задания. \
Отвечай только по существу, без лишних комментариев. \
Генерируй только запрошенный контент.";

/// Mode with the short question list.
pub const SIMPLIFIED_MODE: &str = "simplified";

const SIMPLIFIED_QUOTA: usize = 5;
const FULL_QUOTA: usize = 15;

/// Rendered in place of the existing-questions list when there are none.
const NO_QUESTIONS: &str = "нет";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptPair {
    fn with_user(user_prompt: String) -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt,
        }
    }
}

/// Total number of questions a mode allows.
pub fn question_quota(mode: &str) -> usize {
    if mode == SIMPLIFIED_MODE {
        SIMPLIFIED_QUOTA
    } else {
        FULL_QUOTA
    }
}

/// How many new questions may still be requested, or `None` once the
/// quota is used up.
pub fn remaining_questions(mode: &str, existing: usize) -> Option<usize> {
    question_quota(mode)
        .checked_sub(existing)
        .filter(|remaining| *remaining > 0)
}

/// Prompt asking for the next batch of clarifying questions.
///
/// Fails before anything is built when `existing_questions` already fills
/// the mode's quota.
pub fn question_prompt(
    task_description: &str,
    existing_questions: &[String],
    mode: &str,
) -> Result<PromptPair, QuotaExceeded> {
    let remaining =
        remaining_questions(mode, existing_questions.len()).ok_or_else(|| QuotaExceeded {
            limit: question_quota(mode),
            mode: mode.to_string(),
        })?;

    let existing = if existing_questions.is_empty() {
        NO_QUESTIONS.to_string()
    } else {
        existing_questions.join(", ")
    };

    Ok(PromptPair::with_user(format!(
        r#"Как опытный аналитик 1С, сформулируй {remaining} уточняющих вопросов для следующей задачи.

Задача: "{task_description}"

Существующие вопросы: {existing}

Требования:
- Только вопросы, заканчивающиеся вопросительным знаком
- Вопросы должны быть конкретными и полезными для составления ТЗ
- Каждый вопрос с новой строки
- Не добавляй пояснения или дополнительный текст
- Вопросы должны быть про 1С и технические детали"#
    )))
}

/// Prompt asking for a simpler wording of one question.
pub fn refresh_prompt(question: &str) -> PromptPair {
    PromptPair::with_user(format!(
        r#"Переформулируй следующий вопрос проще и понятнее: "{question}". Верни только переформулированный вопрос, без дополнительного текста."#
    ))
}

/// Prompt asking for the final specification document in Markdown.
pub fn spec_prompt(task_description: &str) -> PromptPair {
    PromptPair::with_user(format!(
        r#"На основе следующей информации составь понятное и читабельное техническое задание для программиста 1С:

ИСХОДНАЯ ЗАДАЧА:
{task_description}

Требования к ТЗ:
- Понятная структура с заголовками разных уровней
- Конкретные технические требования
- Критерии приемки
- Технические детали для реализации в 1С
- Формат, понятный программисту
- Учитывай особенности платформы 1С:Предприятие

ВАЖНО: Верни ТЗ СТРОГО в формате Markdown:
- Используй заголовки: # Заголовок 1, ## Заголовок 2, ### Заголовок 3
- Для выделения используй **жирный текст**
- Для списков используй - или *
- Для кода используй `код` или ```блок кода```
- НЕ используй HTML теги
- НЕ добавляй лишнее форматирование"#
    ))
}
