//! Shared documents and configs for grading flow tests.

use std::fs;
use std::path::{Path, PathBuf};

use rubric::config::Config;

/// Reference answer reused across fixtures and assertions.
pub const Q1_ANSWER: &str = "Photosynthesis converts light energy into chemical energy. \
     It takes place inside the chloroplasts of plant cells.";

pub const ANSWER_KEY_JSON: &str = r#"{
    "q1": {
        "question": "What is photosynthesis?",
        "answer": "Photosynthesis converts light energy into chemical energy. It takes place inside the chloroplasts of plant cells."
    },
    "q2": {
        "question": "Why do leaves look green?",
        "answer": "Chlorophyll absorbs red and blue light while reflecting green wavelengths. The reflected green light is what reaches our eyes."
    }
}"#;

/// Student who answered q1 verbatim and q2 verbatim.
pub const SUBMISSION_S1_JSON: &str = r#"{
    "q1": {
        "answer": "Photosynthesis converts light energy into chemical energy. It takes place inside the chloroplasts of plant cells."
    },
    "q2": {
        "answer": "Chlorophyll absorbs red and blue light while reflecting green wavelengths. The reflected green light is what reaches our eyes."
    }
}"#;

/// Student who skipped q1 and barely attempted q2.
pub const SUBMISSION_S2_JSON: &str = r#"{
    "q1": {
        "answer": ""
    },
    "q2": {
        "answer": "No idea."
    }
}"#;

/// Scripted decomposition reply for q1.
pub const Q1_BREAKDOWN_REPLY: &str = r#"{"breakdown": {
    "definition": "Photosynthesis converts light energy into chemical energy.",
    "location": "It takes place inside the chloroplasts of plant cells."},
    "requires_llm_evaluation": []}"#;

/// Scripted mapping reply matching `Q1_BREAKDOWN_REPLY` labels.
pub const Q1_MAPPING_REPLY: &str = r#"{
    "definition": "Photosynthesis converts light energy into chemical energy.",
    "location": "It takes place inside the chloroplasts of plant cells."}"#;

/// Config for deterministic runs: stub embeddings, no retries, structure
/// decomposed by the deterministic fallback.
pub fn fallback_config() -> Config {
    Config {
        embedding_dim: 32,
        segmentation_retries: 0,
        use_structure_fallback: true,
        ..Config::default()
    }
}

/// Config for runs driven by scripted segmentation replies.
pub fn scripted_config() -> Config {
    Config {
        use_structure_fallback: false,
        ..fallback_config()
    }
}

/// Lays out a data directory with an answer key and two submissions.
pub fn write_data_dir(root: &Path) -> PathBuf {
    let data = root.join("data");
    let students = data.join("student_answers");
    fs::create_dir_all(&students).expect("Data directories should be creatable");

    fs::write(data.join("answer_key.json"), ANSWER_KEY_JSON)
        .expect("Answer key fixture should be writable");
    fs::write(students.join("s1.json"), SUBMISSION_S1_JSON)
        .expect("Submission fixture s1 should be writable");
    fs::write(students.join("s2.json"), SUBMISSION_S2_JSON)
        .expect("Submission fixture s2 should be writable");

    data
}
