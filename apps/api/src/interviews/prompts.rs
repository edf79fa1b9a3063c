// Prompt constants for interview question generation.

/// System prompt — enforces JSON-only output.
pub const QUESTION_GEN_SYSTEM: &str = "You are an expert technical recruiter preparing \
    questions for a job interview. \
    You MUST respond with valid JSON only — a JSON array of question strings. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Question generation template.
/// Replace: {role}, {level}, {techstack}, {focus}, {amount}
pub const QUESTION_GEN_PROMPT_TEMPLATE: &str = r#"Prepare questions for a job interview.

The job role is {role}.
The job experience level is {level}.
The tech stack used in the job is: {techstack}.
The focus between behavioural and technical questions should lean towards: {focus}.
The amount of questions required is: {amount}.

Please return only the questions, without any additional text.
The questions are going to be read by a voice assistant, so do not use "/" or "*" or any other special characters which might break the voice assistant.

Return the questions formatted like this:
["Question 1", "Question 2", "Question 3"]"#;
