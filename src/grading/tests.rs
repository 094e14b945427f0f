mod model_tests {
    use crate::grading::{
        FEATURE_FULL, FEATURE_MEAN, FEATURE_TF_IDF, GradeModel, GradingError, TrainingPoint,
    };

    fn canonical_order() -> Vec<String> {
        vec![
            FEATURE_TF_IDF.to_string(),
            FEATURE_FULL.to_string(),
            FEATURE_MEAN.to_string(),
        ]
    }

    fn point(features: [f32; 3], label: &str) -> TrainingPoint {
        TrainingPoint {
            features,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_nearest_neighbor_wins_with_k1() {
        let model = GradeModel::from_points(
            1,
            &canonical_order(),
            vec![
                point([0.1, 0.1, 0.1], "2"),
                point([0.5, 0.5, 0.5], "5"),
                point([0.9, 0.9, 0.9], "9"),
            ],
        )
        .unwrap();

        assert_eq!(model.predict(0.12, 0.08, 0.1), "2");
        assert_eq!(model.predict(0.55, 0.5, 0.45), "5");
        assert_eq!(model.predict(1.0, 0.95, 0.9), "9");
    }

    #[test]
    fn test_majority_vote_with_k3() {
        let model = GradeModel::from_points(
            3,
            &canonical_order(),
            vec![
                point([0.0, 0.0, 0.0], "low"),
                point([0.05, 0.0, 0.0], "low"),
                point([0.1, 0.1, 0.1], "high"),
                point([0.9, 0.9, 0.9], "high"),
            ],
        )
        .unwrap();

        assert_eq!(model.predict(0.0, 0.0, 0.0), "low");
    }

    #[test]
    fn test_split_vote_resolves_toward_nearer_neighbor() {
        let model = GradeModel::from_points(
            2,
            &canonical_order(),
            vec![
                point([0.2, 0.2, 0.2], "near"),
                point([0.4, 0.4, 0.4], "far"),
            ],
        )
        .unwrap();

        assert_eq!(model.predict(0.2, 0.2, 0.2), "near");
    }

    #[test]
    fn test_k_larger_than_point_count_uses_all_points() {
        let model = GradeModel::from_points(
            10,
            &canonical_order(),
            vec![
                point([0.1, 0.1, 0.1], "low"),
                point([0.2, 0.2, 0.2], "low"),
                point([0.9, 0.9, 0.9], "high"),
            ],
        )
        .unwrap();

        assert_eq!(model.predict(0.0, 0.0, 0.0), "low");
    }

    #[test]
    fn test_artifact_feature_order_is_respected() {
        let reordered = vec![
            FEATURE_MEAN.to_string(),
            FEATURE_TF_IDF.to_string(),
            FEATURE_FULL.to_string(),
        ];
        // Point stored as [mean, tfidf, full] = [0.8, 0.2, 0.4].
        let model = GradeModel::from_points(
            1,
            &reordered,
            vec![
                point([0.8, 0.2, 0.4], "hit"),
                point([0.0, 0.9, 0.9], "decoy"),
            ],
        )
        .unwrap();

        assert_eq!(model.predict(0.2, 0.4, 0.8), "hit");
    }

    #[test]
    fn test_accessors() {
        let model = GradeModel::from_points(
            2,
            &canonical_order(),
            vec![point([0.1, 0.1, 0.1], "a"), point([0.9, 0.9, 0.9], "b")],
        )
        .unwrap();

        assert_eq!(model.k(), 2);
        assert_eq!(model.point_count(), 2);
    }

    #[test]
    fn test_zero_k_rejected() {
        let err = GradeModel::from_points(0, &canonical_order(), vec![point([0.0; 3], "a")])
            .unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }

    #[test]
    fn test_empty_points_rejected() {
        let err = GradeModel::from_points(1, &canonical_order(), Vec::new()).unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let order = vec![FEATURE_TF_IDF.to_string(), FEATURE_FULL.to_string()];
        let err = GradeModel::from_points(1, &order, vec![point([0.0; 3], "a")]).unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let order = vec![
            FEATURE_TF_IDF.to_string(),
            FEATURE_FULL.to_string(),
            "mystery_feature".to_string(),
        ];
        let err = GradeModel::from_points(1, &order, vec![point([0.0; 3], "a")]).unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let order = vec![
            FEATURE_TF_IDF.to_string(),
            FEATURE_TF_IDF.to_string(),
            FEATURE_MEAN.to_string(),
        ];
        let err = GradeModel::from_points(1, &order, vec![point([0.0; 3], "a")]).unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }
}

mod artifact_tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::grading::{GradeModel, GradingError};

    const VALID_ARTIFACT: &str = r#"{
        "algorithm": "knn",
        "k": 1,
        "feature_order": ["tf_idf_similarity", "full_similarity_score", "mean_similarity_score"],
        "points": [
            {"features": [0.1, 0.1, 0.1], "label": "2"},
            {"features": [0.9, 0.9, 0.9], "label": "9"}
        ]
    }"#;

    #[test]
    fn test_load_valid_artifact() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grade_model.json");
        fs::write(&path, VALID_ARTIFACT).expect("write artifact");

        let model = GradeModel::from_path(&path).expect("load model");

        assert_eq!(model.k(), 1);
        assert_eq!(model.point_count(), 2);
        assert_eq!(model.predict(0.85, 0.9, 0.95), "9");
    }

    #[test]
    fn test_missing_artifact_reports_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nonexistent.json");

        let err = GradeModel::from_path(&path).unwrap_err();

        assert!(matches!(err, GradingError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_invalid_json_reports_malformed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grade_model.json");
        fs::write(&path, "not json at all").expect("write artifact");

        let err = GradeModel::from_path(&path).unwrap_err();

        assert!(matches!(err, GradingError::ArtifactMalformed { .. }));
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grade_model.json");
        let artifact = VALID_ARTIFACT.replace("\"knn\"", "\"svm\"");
        fs::write(&path, artifact).expect("write artifact");

        let err = GradeModel::from_path(&path).unwrap_err();

        assert!(matches!(
            err,
            GradingError::UnsupportedAlgorithm { algorithm } if algorithm == "svm"
        ));
    }

    #[test]
    fn test_artifact_with_invalid_k_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grade_model.json");
        let artifact = VALID_ARTIFACT.replace("\"k\": 1", "\"k\": 0");
        fs::write(&path, artifact).expect("write artifact");

        let err = GradeModel::from_path(&path).unwrap_err();

        assert!(matches!(err, GradingError::InvalidModel { .. }));
    }
}
