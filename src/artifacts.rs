use serde::{Deserialize, Serialize};

use crate::config::PromptConfig;
use crate::parser::{
    extract_json_array, extract_json_object, normalize, parse_value, truncate_chars, Generator,
    NormalizedMindMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Intermediate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDifficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for CardDifficulty {
    fn default() -> Self {
        CardDifficulty::Medium
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    #[serde(default)]
    pub difficulty: CardDifficulty,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: CardDifficulty,
}

fn summary_prompt(source_text: &str, title: &str, config: &PromptConfig) -> String {
    let content = truncate_chars(source_text, config.summary_char_budget);
    format!(
        "Analyze this educational document and create a comprehensive summary:\n\
         \n\
         Title: {title}\n\
         Content:\n{content}\n\
         \n\
         Please provide:\n\
         1. A concise summary (2-3 paragraphs)\n\
         2. Key points (5-7 bullet points)\n\
         3. Main concepts (3-5 concepts)\n\
         4. Difficulty level (beginner/intermediate/advanced)\n\
         \n\
         Format as JSON:\n\
         {{\"summary\": \"...\", \"key_points\": [\"...\"], \"concepts\": [\"...\"], \"difficulty\": \"beginner|intermediate|advanced\"}}\n"
    )
}

fn flashcards_prompt(source_text: &str, title: &str, count: usize, config: &PromptConfig) -> String {
    let content = truncate_chars(source_text, config.mind_map_char_budget);
    format!(
        "Create {count} educational flashcards from this content:\n\
         \n\
         Title: {title}\n\
         Content: {content}\n\
         \n\
         Each flashcard should have a clear question on the front, a detailed\n\
         answer on the back, a difficulty level, and a category.\n\
         \n\
         Format as JSON array:\n\
         [{{\"id\": \"1\", \"front\": \"Question text\", \"back\": \"Answer text\", \"difficulty\": \"easy|medium|hard\", \"category\": \"Category name\"}}]\n"
    )
}

fn quiz_prompt(source_text: &str, title: &str, count: usize, config: &PromptConfig) -> String {
    let content = truncate_chars(source_text, config.mind_map_char_budget);
    format!(
        "Create {count} quiz questions from this educational content:\n\
         \n\
         Title: {title}\n\
         Content: {content}\n\
         \n\
         Each question should have 4 multiple choice options, the index of the\n\
         correct answer (0-3), an explanation, and a difficulty level.\n\
         \n\
         Format as JSON array:\n\
         [{{\"id\": \"1\", \"question\": \"Question text?\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"correct_answer\": 0, \"explanation\": \"Why\", \"difficulty\": \"easy|medium|hard\"}}]\n"
    )
}

fn fallback_summary(source_text: &str, title: &str) -> Summary {
    Summary {
        summary: format!(
            "(AI unavailable) Summary for {title}:\n\n{}",
            truncate_chars(source_text, 300)
        ),
        key_points: vec!["Key concepts could not be generated (AI unavailable)".to_string()],
        concepts: vec!["AI unavailable".to_string()],
        difficulty: Difficulty::Intermediate,
    }
}

fn degraded_summary(response: &str) -> Summary {
    Summary {
        summary: truncate_chars(response, 500).to_string(),
        key_points: vec![
            "Key concepts extracted from document".to_string(),
            "Important information highlighted".to_string(),
        ],
        concepts: vec!["Main topic".to_string(), "Secondary concepts".to_string()],
        difficulty: Difficulty::Intermediate,
    }
}

fn fallback_flashcards(title: &str) -> Vec<Flashcard> {
    vec![
        Flashcard {
            id: "1".to_string(),
            front: "What is the main topic of this document?".to_string(),
            back: title.to_string(),
            difficulty: CardDifficulty::Easy,
            category: "General".to_string(),
        },
        Flashcard {
            id: "2".to_string(),
            front: "Name one key concept from the document.".to_string(),
            back: "Key concept (AI unavailable)".to_string(),
            difficulty: CardDifficulty::Medium,
            category: "Concepts".to_string(),
        },
    ]
}

fn fallback_quiz(title: &str) -> Vec<QuizQuestion> {
    vec![QuizQuestion {
        id: "1".to_string(),
        question: "What is the main subject of this document?".to_string(),
        options: vec![
            title.to_string(),
            "General topic".to_string(),
            "Unknown subject".to_string(),
            "Multiple topics".to_string(),
        ],
        correct_answer: 0,
        explanation: "The main subject is the document title.".to_string(),
        difficulty: CardDifficulty::Easy,
    }]
}

/// Total: a failed or unparsable generation degrades to a usable placeholder,
/// never an error.
pub fn generate_summary<G: Generator>(
    source_text: &str,
    title: &str,
    generator: &G,
    config: &PromptConfig,
) -> Summary {
    let prompt = summary_prompt(source_text, title, config);
    let Ok(response) = generator.generate(&prompt) else {
        return fallback_summary(source_text, title);
    };
    if response.trim().is_empty() {
        return fallback_summary(source_text, title);
    }
    extract_json_object(&response)
        .and_then(parse_value)
        .and_then(|value| serde_json::from_value::<Summary>(value).ok())
        .unwrap_or_else(|| {
            log::warn!("summary payload failed to parse; degrading to raw text");
            degraded_summary(&response)
        })
}

pub fn generate_flashcards<G: Generator>(
    source_text: &str,
    title: &str,
    generator: &G,
    config: &PromptConfig,
) -> Vec<Flashcard> {
    let prompt = flashcards_prompt(source_text, title, config.flashcard_count, config);
    let Ok(response) = generator.generate(&prompt) else {
        return fallback_flashcards(title);
    };
    let cards = extract_json_array(&response)
        .and_then(parse_value)
        .and_then(|value| serde_json::from_value::<Vec<Flashcard>>(value).ok())
        .unwrap_or_default();
    if cards.is_empty() {
        log::warn!("flashcard payload unusable; using fallback set");
        return fallback_flashcards(title);
    }
    cards
}

pub fn generate_quiz<G: Generator>(
    source_text: &str,
    title: &str,
    generator: &G,
    config: &PromptConfig,
) -> Vec<QuizQuestion> {
    let prompt = quiz_prompt(source_text, title, config.quiz_question_count, config);
    let Ok(response) = generator.generate(&prompt) else {
        return fallback_quiz(title);
    };
    let questions = extract_json_array(&response)
        .and_then(parse_value)
        .and_then(|value| serde_json::from_value::<Vec<QuizQuestion>>(value).ok())
        .unwrap_or_default();
    if questions.is_empty() {
        log::warn!("quiz payload unusable; using fallback set");
        return fallback_quiz(title);
    }
    questions
}

/// The full artifact set for one document. Generations are independent: one
/// of them falling back never aborts or degrades the others.
#[derive(Debug, Clone)]
pub struct StudySet {
    pub summary: Summary,
    pub mind_map: NormalizedMindMap,
    pub flashcards: Vec<Flashcard>,
    pub quiz: Vec<QuizQuestion>,
}

pub fn generate_study_set<G: Generator>(
    source_text: &str,
    title: &str,
    generator: &G,
    config: &PromptConfig,
) -> StudySet {
    StudySet {
        summary: generate_summary(source_text, title, generator, config),
        mind_map: normalize(source_text, title, generator, config),
        flashcards: generate_flashcards(source_text, title, generator, config),
        quiz: generate_quiz(source_text, title, generator, config),
    }
}
