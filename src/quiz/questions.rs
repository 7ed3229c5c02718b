use crate::quiz::{Question, QuestionError};

// (prompt, options, index of the correct option)
const BUILT_IN: [(&str, [&str; 3], usize); 4] = [
    (
        "What sound does a cat make?",
        ["Bhau-Bhau", "Meow-Meow", "Oink-Oink"],
        1,
    ),
    (
        "What is the capital of France?",
        ["London", "Berlin", "Paris"],
        2,
    ),
    (
        "Which planet is known as the Red Planet?",
        ["Venus", "Mars", "Jupiter"],
        1,
    ),
    (
        "How many continents are there on Earth?",
        ["5", "6", "7"],
        2,
    ),
];

/// The question set shipped with the widget. Ids start at 1.
pub fn built_in() -> Result<Vec<Question>, QuestionError> {
    BUILT_IN
        .iter()
        .zip(1..)
        .map(|((prompt, options, correct), id)| {
            Question::new(
                id,
                *prompt,
                options.iter().map(|o| o.to_string()).collect(),
                *correct,
            )
        })
        .collect()
}
