//! Prompt Assembler — builds the voice-agent persona for one session from a
//! role/level/techstack/questions tuple. The templates are consts; every
//! assembly works on its own copy, so no invocation can leak questions into
//! the next.

use crate::errors::AppError;
use crate::session::SessionKind;
use crate::voice::{
    AssistantConfig, ModelConfig, ModelMessage, TranscriberConfig, VoiceConfig,
};

pub const ASSISTANT_NAME: &str = "PrepWise AI Interviewer";

/// System prompt for the voice agent. Placeholders are interpolated per
/// session; `{{questions}}` becomes a bulleted list.
const INTERVIEWER_SYSTEM_TEMPLATE: &str = "\
You are a professional job interviewer conducting a real-time voice interview for a {{level}} {{role}} position.

The required tech stack includes: {{techstack}}.

Ask the following questions in a conversational manner, one at a time:
{{questions}}

Interview Guidelines:
- Listen actively to responses and acknowledge them before moving forward
- Ask follow-up questions if a response is vague or requires more detail
- Keep the conversation flowing naturally
- Be professional, yet warm and welcoming
- Use official yet friendly language
- Keep responses concise (like in a real voice interview)

Conclude the interview by thanking the candidate for their time.";

/// Question set used by generative sessions, which have no stored interview
/// to draw questions from yet.
pub const DEFAULT_GENERATE_QUESTIONS: [&str; 5] = [
    "Tell me about your experience with web development.",
    "How do you approach learning new technologies?",
    "Can you describe a challenging project you've worked on recently?",
    "What are your strengths as a developer?",
    "Do you have any questions about the position?",
];

/// Candidate and role inputs for one session.
#[derive(Debug, Clone)]
pub struct SessionProfile {
    pub user_name: String,
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
}

/// Builds the full voice session config for one session.
///
/// Interview sessions must carry at least one question; assembly fails fast
/// with a configuration error before any transport call is made. Generative
/// sessions ignore `profile.questions` and use the default set.
pub fn assemble(kind: SessionKind, profile: &SessionProfile) -> Result<AssistantConfig, AppError> {
    let questions: Vec<String> = match kind {
        SessionKind::Generate => DEFAULT_GENERATE_QUESTIONS
            .iter()
            .map(|q| q.to_string())
            .collect(),
        SessionKind::Interview => {
            if profile.questions.is_empty() {
                return Err(AppError::Configuration(
                    "No questions provided for the interview".to_string(),
                ));
            }
            profile.questions.clone()
        }
    };

    let bulleted = format!("- {}", questions.join("\n- "));
    let system_prompt = INTERVIEWER_SYSTEM_TEMPLATE
        .replace("{{level}}", &profile.level)
        .replace("{{role}}", &profile.role)
        .replace("{{techstack}}", &profile.techstack.join(", "))
        .replace("{{questions}}", &bulleted);

    let first_message = format!(
        "Hello {}! Thank you for taking the time to speak with me today. \
         I'm excited to learn more about you and your experience as a {}.",
        profile.user_name, profile.role
    );

    Ok(AssistantConfig {
        name: ASSISTANT_NAME.to_string(),
        transcriber: TranscriberConfig {
            provider: "deepgram".to_string(),
            model: "nova-2".to_string(),
            language: "en".to_string(),
        },
        voice: VoiceConfig {
            provider: "11labs".to_string(),
            voice_id: "sarah".to_string(),
            stability: 0.4,
            similarity_boost: 0.8,
            speed: 0.9,
            style: 0.5,
            use_speaker_boost: true,
        },
        first_message,
        model: ModelConfig {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            messages: vec![ModelMessage {
                role: "system".to_string(),
                content: system_prompt,
            }],
        },
        client_messages: vec![],
        server_messages: vec![],
    })
}
