//! Built-in sample question bank

use super::question_store::QuestionStore;
use crate::error::Result;
use crate::models::SeedResult;

/// Minimum normalised length before containment counts as similarity
const MIN_SIMILAR_LEN: usize = 12;

/// `(topic, question)` pairs loaded by [`seed_questions`]
pub const SAMPLE_QUESTIONS: &[(&str, &str)] = &[
    ("reactjs", "What is JSX and how does it work in React?"),
    ("reactjs", "Explain the difference between state and props in React."),
    ("reactjs", "What are React hooks and why were they introduced?"),
    ("reactjs", "How does the virtual DOM work in React?"),
    ("reactjs", "What is the useEffect hook used for?"),
    ("reactjs", "Explain the concept of component lifecycle in React."),
    ("reactjs", "What is Context API and when would you use it?"),
    ("reactjs", "How do you handle forms in React?"),
    ("javascript", "Explain closures in JavaScript with an example."),
    ("javascript", "What is the difference between let, const, and var?"),
    ("javascript", "How does asynchronous JavaScript work?"),
    ("javascript", "What is the event loop in JavaScript?"),
    ("javascript", "Explain prototypal inheritance in JavaScript."),
    ("javascript", "What are promises and how do they work?"),
    ("javascript", "What is the this keyword in JavaScript?"),
    ("python", "What are Python decorators and how do you use them?"),
    ("python", "Explain the difference between lists and tuples in Python."),
    ("python", "What is the Global Interpreter Lock (GIL) in Python?"),
    ("python", "How do you handle exceptions in Python?"),
    ("python", "What are Python generators and when would you use them?"),
    ("database", "What is normalization in database design?"),
    ("database", "Explain the difference between SQL and NoSQL databases."),
    ("database", "What are database indexes and when should you use them?"),
    ("database", "What is ACID in database transactions?"),
    ("database", "How do you handle database deadlocks?"),
    ("system design", "How would you design a URL shortening service like bit.ly?"),
    ("system design", "Explain the concept of load balancing."),
    ("system design", "What is caching and what are different caching strategies?"),
    ("system design", "How would you design a chat application?"),
    ("system design", "What is database sharding?"),
];

/// Lowercase, collapse every run of non-alphanumerics to one space, trim
pub fn normalize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Similarity of two normalised texts: equal, or one contains the other
/// when both are long enough
pub fn is_similar(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    a.len() >= MIN_SIMILAR_LEN && b.len() >= MIN_SIMILAR_LEN && (a.contains(b) || b.contains(a))
}

/// Insert `questions` unused, skipping near-duplicates of stored ones
pub async fn seed_from(store: &dyn QuestionStore, questions: &[(&str, &str)]) -> Result<SeedResult> {
    let mut result = SeedResult::default();

    let mut topics: Vec<&str> = questions.iter().map(|(t, _)| *t).collect();
    topics.sort_unstable();
    topics.dedup();

    for topic in topics {
        let mut existing: Vec<String> = store
            .list_questions(topic)
            .await?
            .iter()
            .map(|q| normalize_text(q))
            .collect();

        for (_, question) in questions.iter().filter(|(t, _)| *t == topic) {
            let normalized = normalize_text(question);
            if existing.iter().any(|e| is_similar(&normalized, e)) {
                result.skipped += 1;
                continue;
            }
            store.insert(topic, question, false).await?;
            existing.push(normalized);
            result.inserted += 1;
        }
    }

    log::info!(
        "[seed] Inserted {} questions, skipped {} duplicates",
        result.inserted,
        result.skipped
    );

    Ok(result)
}

/// Load the built-in sample bank
pub async fn seed_questions(store: &dyn QuestionStore) -> Result<SeedResult> {
    seed_from(store, SAMPLE_QUESTIONS).await
}
