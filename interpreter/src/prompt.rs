//! Prompt construction for the interpretation model.

use std::fmt::Write;

use crate::interpret::Interpretation;

/// System prompt matching the fine-tuned fortune-telling model's training.
pub const SYSTEM_PROMPT: &str = "你是一位精通周易的算命先生，擅长给人占卜吉凶。
要求：
1. 基于卦象给出明确的结论
2. 用老百姓听得懂的话说，不要文绉绉的
3. 必须引用周易原文来支撑你的判断";

const NO_QUESTION_FALLBACK: &str = "无具体问题，请通占";

/// The prompt pair sent to the interpretation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivinationPrompt {
    pub system: String,
    pub user: String,
}

/// Build the user/system prompt pair for a resolved casting.
///
/// An empty or whitespace question becomes a general reading request.
#[must_use]
pub fn build_divination_prompt(question: &str, interp: &Interpretation<'_>) -> DivinationPrompt {
    let question = match question.trim() {
        "" => NO_QUESTION_FALLBACK,
        q => q,
    };

    let mut info = format!("本卦: {}", interp.original.label());
    if let Some(changed) = interp.changed {
        let _ = write!(info, "\n之卦: {}", changed.label());
    }
    if !interp.changing_lines.is_empty() {
        let positions = interp
            .changing_lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("、");
        let _ = write!(info, "\n变爻: 第{positions}爻");
    }

    let mut texts = interp.original.cited_judgment();
    if let Some(changed) = interp.changed {
        let _ = write!(texts, "\n\n{}\n【之卦】\n{}", "=".repeat(50), changed.cited_judgment());
    }

    let user = format!(
        "【占卜问题】
{question}

【起卦结果】
{info}

【周易原文】
{texts}

---

请严格按照以下格式回答，不要使用markdown格式：

一、结论
一句话直击重点，给出最终的结论（能成/不能成/具体情况）。

二、原因
请写成一段完整、连贯的话，不要分段，不要使用数字序号。内容必须包含：导致上述结论的具体原因分析，并直接引用周易原文中的关键句子作为佐证。请将原文引用自然地融入到你的分析中（例如：“依据卦辞中‘xxx’的描述，说明了……”），让原因和依据浑然一体。
"
    );

    DivinationPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
