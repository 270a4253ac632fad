//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use sapling_practice::models::{
    AnswerMode, ExerciseModality, ExerciseRecord, ExerciseType, ItemLink, LessonRecord,
    SubmitAttemptRequest,
};

use super::PROFILE_ID;

/// Canonical phrase for each test item.
pub fn phrase(item_id: &str) -> &'static str {
    match item_id {
        "chat" => "le chat",
        "chien" => "le chien",
        "bonjour" => "bonjour",
        "tres_bien" => "très bien",
        "pomme" => "la pomme",
        "pain" => "le pain",
        "fromage" => "le fromage",
        "oiseau" => "l'oiseau",
        _ => "inconnu",
    }
}

/// Build an exercise linked to `items`.
pub fn exercise(
    id: &str,
    lesson_id: Option<&str>,
    exercise_type: ExerciseType,
    difficulty: u32,
    items: &[&str],
    data: serde_json::Value,
) -> ExerciseRecord {
    ExerciseRecord {
        id: id.to_string(),
        lesson_id: lesson_id.map(str::to_string),
        exercise_type,
        modality: ExerciseModality::Mixed,
        prompt_text: None,
        difficulty,
        data: data.to_string(),
        items: items
            .iter()
            .map(|item| ItemLink {
                item_id: item.to_string(),
                target_text: phrase(item).to_string(),
            })
            .collect(),
        pattern_ids: vec![],
    }
}

/// Unit 1 lesson: two recognition exercises and four production exercises.
pub fn starter_lesson() -> LessonRecord {
    use ExerciseType::*;
    let id = Some("lesson-starter");
    LessonRecord {
        id: "lesson-starter".to_string(),
        title: "First words".to_string(),
        unit_order: 1,
        unit_title: "Greetings".to_string(),
        exercises: vec![
            exercise("e1", id, ImagePickWord, 1, &["chat"], json!({"answers": ["le chat"]})),
            exercise("e2", id, ListenPickImage, 1, &["chien"], json!({"answers": []})),
            exercise(
                "e3",
                id,
                ListenType,
                2,
                &["bonjour"],
                json!({"answers": ["bonjour", "salut"]}),
            ),
            exercise("e4", id, TileOrder, 2, &["chat"], json!({})),
            exercise(
                "e5",
                id,
                SpeakRepeat,
                3,
                &["tres_bien"],
                json!({"answers": ["très bien"], "audioText": "très bien !"}),
            ),
            exercise(
                "e6",
                id,
                PhraseComplete,
                3,
                &["chat", "chien"],
                json!({"answers": ["le chat et le chien"]}),
            ),
        ],
    }
}

/// Unit 3 lesson with seven exercises across all tiers.
pub fn market_lesson() -> LessonRecord {
    use ExerciseType::*;
    let id = Some("lesson-market");
    LessonRecord {
        id: "lesson-market".to_string(),
        title: "At the market".to_string(),
        unit_order: 3,
        unit_title: "Food".to_string(),
        exercises: vec![
            exercise("a1", id, ImagePickWord, 1, &["pomme"], json!({})),
            exercise("a2", id, ListenPickImage, 1, &["pain"], json!({})),
            exercise("a3", id, ListenType, 2, &["pomme"], json!({})),
            exercise("a4", id, TileOrder, 2, &["pain"], json!({})),
            exercise("a5", id, PhraseComplete, 3, &["fromage"], json!({})),
            exercise("a6", id, SpeakRepeat, 3, &["fromage"], json!({})),
            exercise("a7", id, ImagePickWord, 1, &["fromage"], json!({})),
        ],
    }
}

/// Review-only exercises outside any lesson.
pub fn review_exercises() -> Vec<ExerciseRecord> {
    use ExerciseType::*;
    vec![
        exercise("r-chien-type", None, ListenType, 1, &["chien"], json!({})),
        exercise("r-chien-img", None, ImagePickWord, 2, &["chien"], json!({})),
        exercise("r-bonjour-tile", None, TileOrder, 1, &["bonjour"], json!({})),
    ]
}

pub fn attempt(exercise_id: &str, answer: &str, mode: AnswerMode) -> SubmitAttemptRequest {
    SubmitAttemptRequest {
        profile_id: PROFILE_ID.to_string(),
        exercise_id: exercise_id.to_string(),
        answer: answer.to_string(),
        mode,
        session_id: Some("session-1".to_string()),
        in_session: true,
    }
}
