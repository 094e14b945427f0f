use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_rubric_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("RUBRIC_MODEL_DIR");
        env::remove_var("RUBRIC_EMBEDDING_DIM");
        env::remove_var("RUBRIC_MAX_SEQ_LEN");
        env::remove_var("RUBRIC_MAX_PROMPT_CHARS");
        env::remove_var("RUBRIC_MAX_COMPONENTS");
        env::remove_var("RUBRIC_MIN_CONTENT_LEN");
        env::remove_var("RUBRIC_SEGMENTATION_MODEL");
        env::remove_var("RUBRIC_SEGMENTATION_RETRIES");
        env::remove_var("RUBRIC_USE_FALLBACK");
        env::remove_var("RUBRIC_LLM_COMPONENT_SCORING");
        env::remove_var("RUBRIC_GRADE_MODEL");
        env::remove_var("RUBRIC_EMBED_CACHE_CAPACITY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.model_dir.is_none());
    assert_eq!(config.embedding_dim, 768);
    assert_eq!(config.max_seq_len, 512);
    assert_eq!(config.max_prompt_chars, 6000);
    assert_eq!(config.max_components, 10);
    assert_eq!(config.min_content_len, 20);
    assert_eq!(config.segmentation_model, "gemma-3-27b-it");
    assert_eq!(config.segmentation_retries, 2);
    assert!(!config.use_structure_fallback);
    assert!(!config.llm_component_scoring);
    assert_eq!(
        config.grade_model_path,
        PathBuf::from("./models/grade_model.json")
    );
    assert_eq!(config.embed_cache_capacity, 4096);
}

#[test]
fn test_stub_config_forces_fallback() {
    let config = Config::stub();

    assert!(config.use_structure_fallback);
    assert!(config.model_dir.is_none());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_rubric_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.embedding_dim, 768);
    assert!(!config.use_structure_fallback);
}

#[test]
#[serial]
fn test_from_env_custom_numbers() {
    clear_rubric_env();

    with_env_vars(
        &[
            ("RUBRIC_EMBEDDING_DIM", "384"),
            ("RUBRIC_MAX_COMPONENTS", "6"),
            ("RUBRIC_SEGMENTATION_RETRIES", "4"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.embedding_dim, 384);
            assert_eq!(config.max_components, 6);
            assert_eq!(config.segmentation_retries, 4);
        },
    );
}

#[test]
#[serial]
fn test_from_env_custom_paths() {
    clear_rubric_env();

    with_env_vars(
        &[
            ("RUBRIC_MODEL_DIR", "/models/bert-base-uncased"),
            ("RUBRIC_GRADE_MODEL", "/models/knn_bundle.json"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(
                config.model_dir,
                Some(PathBuf::from("/models/bert-base-uncased"))
            );
            assert_eq!(
                config.grade_model_path,
                PathBuf::from("/models/knn_bundle.json")
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_empty_model_dir_is_none() {
    clear_rubric_env();

    with_env_vars(&[("RUBRIC_MODEL_DIR", "  ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.model_dir.is_none());
    });
}

#[test]
#[serial]
fn test_from_env_bool_values() {
    clear_rubric_env();

    for truthy in ["1", "true", "YES", "on"] {
        with_env_vars(&[("RUBRIC_USE_FALLBACK", truthy)], || {
            let config = Config::from_env().expect("should parse");
            assert!(config.use_structure_fallback, "{truthy} should enable");
        });
    }

    for falsy in ["0", "false", "off", "nonsense"] {
        with_env_vars(&[("RUBRIC_USE_FALLBACK", falsy)], || {
            let config = Config::from_env().expect("should parse");
            assert!(!config.use_structure_fallback, "{falsy} should disable");
        });
    }
}

#[test]
#[serial]
fn test_from_env_invalid_number_uses_default() {
    clear_rubric_env();

    with_env_vars(&[("RUBRIC_EMBEDDING_DIM", "not_a_number")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.embedding_dim, 768);
    });
}

#[test]
fn test_validate_zero_embedding_dim() {
    let config = Config {
        embedding_dim: 0,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    assert!(err.to_string().contains("dimension"));
}

#[test]
fn test_validate_zero_max_components() {
    let config = Config {
        max_components: 0,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_validate_nonexistent_model_dir() {
    let config = Config {
        model_dir: Some(PathBuf::from("/nonexistent/bert")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_model_dir_is_file() {
    let config = Config {
        model_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_grade_model_path_is_directory() {
    let config = Config {
        grade_model_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_success_with_defaults() {
    // Default grade_model_path may not exist; validate only rejects wrong kinds.
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        model_dir: Some(manifest_dir.join("src")),
        grade_model_path: manifest_dir.join("Cargo.toml"),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidValue {
        name: "RUBRIC_EMBEDDING_DIM",
        reason: "embedding dimension cannot be zero".to_string(),
    };
    assert!(err.to_string().contains("RUBRIC_EMBEDDING_DIM"));
    assert!(err.to_string().contains("zero"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));
}
