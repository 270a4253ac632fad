//! Lenient decoding of authored exercise data.
//!
//! Content is stored as a JSON blob with camelCase keys. Malformed blobs and
//! wrongly typed fields decode to empty or absent values instead of failing.

use practice_core::types::{ExerciseData, PlaybackRate};
use serde_json::{Map, Value};

pub fn parse_exercise_data(raw: &str) -> ExerciseData {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unparsable exercise data, using defaults: {}", e);
            return ExerciseData::default();
        }
    };

    let Some(obj) = value.as_object() else {
        return ExerciseData::default();
    };

    ExerciseData {
        prompt: string_field(obj, "prompt"),
        answers: string_list(obj, "answers").unwrap_or_default(),
        options: string_list(obj, "options"),
        image_choices: string_list(obj, "imageChoices"),
        hint: string_field(obj, "hint"),
        audio_text: string_field(obj, "audioText"),
        playback_rate: match obj.get("playbackRate").and_then(Value::as_str) {
            Some("slow") => Some(PlaybackRate::Slow),
            Some("normal") => Some(PlaybackRate::Normal),
            _ => None,
        },
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    obj.get(key).and_then(Value::as_array).map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}
