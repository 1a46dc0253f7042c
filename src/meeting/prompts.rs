//! Meeting Prompts
//!
//! Every role and task prompt used by the meeting pipeline. Each builder
//! returns a [`PromptTemplate`]; the keys each one needs are listed next to it
//! and checked by the tests below.
//!
//! The offering being pitched is always a placeholder (`{offering}`), never
//! hard-coded.

use crate::ai::PromptTemplate;

// =============================================================================
// Role Prompts
// =============================================================================

/// Keys: `person_name`, `context`
pub fn personality_analysis() -> PromptTemplate {
    PromptTemplate::new(
        "personality_analysis",
        "You are an advanced personality analysis AI specialized in generating detailed \
personality insights. Analyze the context provided for {person_name} and build a \
comprehensive profile covering personality type, traits, communication style, buying \
preferences and how to engage them effectively.\n\n\
Context:\n{context}\n\n\
Structure the profile with exactly these sections:\n\
1. Personality Overview\n\
2. Personality Compatibility\n\
3. Communication Style\n\
4. Tips for Selling and Engagement\n\
5. Advanced Insights (DISC, OCEAN, etc.)\n\n\
Analysis:",
    )
}

/// Keys: `person_name`, `analysis`, `offering`, `transcript`, `query`
pub fn persona_response() -> PromptTemplate {
    PromptTemplate::new(
        "persona_response",
        "You are an AI version of {person_name}. Your personality analysis follows:\n\
{analysis}\n\n\
You are in a virtual meeting with a {offering} sales representative. You have reviewed \
your own public content and are ready to share your views. Answer naturally and \
thoughtfully, in keeping with your style, background and expertise.\n\n\
Meeting Conversation History:\n{transcript}\n\n\
Query: {query}\n\n\
Response:",
    )
}

/// Keys: `offering`, `transcript`, `query`
pub fn sales_response() -> PromptTemplate {
    PromptTemplate::new(
        "sales_response",
        "You are a sales expert representing {offering} in a virtual meeting with a client. \
Explain the value of {offering} clearly and persuasively while staying sensitive to the \
client's preferences. The client usually prefers full-time employees but may be open to \
hearing how flexible talent can also work for them.\n\n\
Meeting Conversation History:\n{transcript}\n\n\
Sales Query: {query}\n\n\
Sales Response:",
    )
}

// =============================================================================
// Scripted Meeting Queries
// =============================================================================

pub const PERSONA_GREETING_QUERY: &str =
    "Please provide a friendly greeting, introducing yourself and your role.";

pub const SALES_GREETING_QUERY: &str = "Please greet the client warmly and ask about their \
biggest challenge in scaling their team.";

pub const PERSONA_PREFERENCE_QUERY: &str = "Please state your preference for full-time \
employees over freelancers, and explain why full-time hires offer more stability for your \
projects.";

/// Keys: `offering`
pub fn sales_objection_query() -> PromptTemplate {
    PromptTemplate::new(
        "sales_objection_query",
        "Given the client's preference for full-time hires, handle the objection by explaining \
how {offering}'s hybrid model can start with flexible hires that later transition into \
full-time roles. Then ask what challenges the client faces with their current full-time \
hiring process.",
    )
}

/// Keys: `question`, `topic`
pub fn dynamic_answer_query() -> PromptTemplate {
    PromptTemplate::new(
        "dynamic_answer_query",
        "Based on the conversation so far, please address the following question dynamically: \
'{question}'. Provide an answer related to {topic}.",
    )
}

// =============================================================================
// Task Prompts
// =============================================================================

/// Keys: `person_name`, `transcript`, `min_questions`, `max_questions`, `offering`
pub fn dynamic_questions() -> PromptTemplate {
    PromptTemplate::new(
        "dynamic_questions",
        "You are an insightful AI that writes curiosity-driven, reflective questions for a \
persona in a virtual meeting. The persona is '{person_name}' and the conversation so far \
is:\n\n\
{transcript}\n\n\
Write {min_questions} to {max_questions} open-ended questions that {person_name} might ask \
to understand {offering}'s offerings in more depth. Cover topics such as talent matching, \
moving flexible hires into full-time roles, compliance across markets and success stories. \
Put each question on its own line and keep every question clear and engaging.",
    )
}

/// Keys: `person_name`, `offering`, `transcript`
pub fn refined_analysis() -> PromptTemplate {
    PromptTemplate::new(
        "refined_analysis",
        "You are an AI analyst who observed a virtual meeting with {person_name}, a potential \
client. From the conversation history, analyze their communication style, personality \
traits and behavioral cues. Summarize their style and recommend how best to pitch \
{offering} to them, keeping their preference for full-time hires and their strategic goals \
in mind.\n\n\
Meeting Conversation History:\n{transcript}\n\n\
Give a detailed analysis of communication style, key motivations and tailored pitch \
strategies.",
    )
}

/// Keys: `refined_analysis`, `transcript`, `offering`
pub fn tailored_pitch() -> PromptTemplate {
    PromptTemplate::new(
        "tailored_pitch",
        "Using the refined analysis and conversation history below, write a final tailored \
sales pitch that speaks to the client's specific needs, communication style and likely \
concerns.\n\n\
Refined Analysis:\n{refined_analysis}\n\n\
Conversation History:\n{transcript}\n\n\
Make the pitch compelling and personal, showing how {offering} solves their specific \
challenges.",
    )
}

/// Keys: `personality_analysis`, `refined_analysis`, `final_pitch`, `offering`
pub fn cold_email() -> PromptTemplate {
    PromptTemplate::new(
        "cold_email",
        "You are a sales expert writing a cold email to a prospective client. No meeting has \
taken place, but you hold in-depth insight into the client's personality, communication \
style and business needs. Use these insights to draft the email:\n\n\
Detailed Personality Analysis:\n{personality_analysis}\n\n\
Refined Analysis & Pitch Strategy:\n{refined_analysis}\n\n\
Final Tailored Pitch:\n{final_pitch}\n\n\
Introduce yourself, explain why the client would benefit from {offering}, and invite them \
to a conversation. Do not mention any prior meeting or conversation; this must read as \
genuine cold outreach. Keep the tone professional, insightful and engaging.",
    )
}

/// Keys: `focus_clause`, `transcript`
pub fn conversation_review() -> PromptTemplate {
    PromptTemplate::new(
        "conversation_review",
        "You are an advanced conversation analysis AI. Review the following conversation \
carefully and give a comprehensive analysis. {focus_clause}\n\n\
Key areas to analyze:\n\
1. Communication Dynamics\n\
2. Effectiveness of Sales Approach\n\
3. Client's Underlying Needs and Concerns\n\
4. Missed Opportunities\n\
5. Potential Improvements\n\n\
Conversation Log:\n{transcript}\n\n\
Provide a detailed, objective analysis with actionable insights.",
    )
}

/// Keys: `focus`
pub fn review_focus_clause() -> PromptTemplate {
    PromptTemplate::new(
        "review_focus_clause",
        "Pay special attention to the {focus} aspects of the conversation.",
    )
}
