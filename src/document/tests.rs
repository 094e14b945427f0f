use super::*;

mod ordered_map_tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map: OrderedMap<String> = OrderedMap::new();
        assert!(map.is_empty());

        map.insert("definition", "a force that attracts".to_string());
        map.insert("example", "an apple falling".to_string());

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("definition").map(String::as_str),
            Some("a force that attracts")
        );
        assert!(map.get("missing").is_none());
        assert!(map.contains_key("example"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut map: OrderedMap<u32> = OrderedMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map: OrderedMap<u32> = OrderedMap::new();
        map.insert("first", 1);
        map.insert("second", 2);

        let old = map.insert("first", 10);
        assert_eq!(old, Some(1));
        assert_eq!(map.len(), 2);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(map.get("first"), Some(&10));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let mut map: OrderedMap<String> = OrderedMap::new();
        map.insert("zeta", "z".to_string());
        map.insert("alpha", "a".to_string());

        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"zeta":"z","alpha":"a"}"#);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let map: OrderedMap<String> =
            serde_json::from_str(r#"{"third": "3", "first": "1", "second": "2"}"#)
                .expect("deserialize");

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_deserialize_duplicate_key_last_wins() {
        let map: OrderedMap<u32> =
            serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).expect("deserialize");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        let result: Result<OrderedMap<String>, _> = serde_json::from_str(r#"["not", "a", "map"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_iterator() {
        let map: OrderedMap<u32> = vec![
            ("one".to_string(), 1),
            ("two".to_string(), 2),
            ("one".to_string(), 11),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("one"), Some(&11));
    }

    #[test]
    fn test_round_trip_nested() {
        let mut inner: OrderedMap<String> = OrderedMap::new();
        inner.insert("b_label", "content b".to_string());
        inner.insert("a_label", "content a".to_string());

        let mut outer: OrderedMap<OrderedMap<String>> = OrderedMap::new();
        outer.insert("q1", inner);

        let json = serde_json::to_string(&outer).expect("serialize");
        let back: OrderedMap<OrderedMap<String>> =
            serde_json::from_str(&json).expect("deserialize");

        let keys: Vec<_> = back.get("q1").expect("q1").keys().collect();
        assert_eq!(keys, vec!["b_label", "a_label"]);
    }
}

mod document_tests {
    use super::*;

    #[test]
    fn test_raw_answer_key_parses() {
        let json = r#"{
            "1": {"question": "Define gravity.", "answer": "A force of attraction between masses."},
            "2": {"question": "State the first law.", "answer": "A body remains at rest unless acted on."}
        }"#;

        let key: RawAnswerKey = serde_json::from_str(json).expect("parse key");
        assert_eq!(key.len(), 2);
        assert_eq!(
            key.get("1").expect("q1").question,
            "Define gravity."
        );
    }

    #[test]
    fn test_raw_answer_key_rejects_missing_fields() {
        let json = r#"{"1": {"question": "Only a question."}}"#;
        let result: Result<RawAnswerKey, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_submission_parses() {
        let json = r#"{"1": {"answer": "Gravity pulls objects together."}, "2": {"answer": ""}}"#;

        let submission: RawSubmission = serde_json::from_str(json).expect("parse submission");
        assert_eq!(submission.len(), 2);
        assert!(submission.get("2").expect("q2").answer.is_empty());
    }

    #[test]
    fn test_processed_key_question_labels_in_order() {
        let mut structure: OrderedMap<KeyComponent> = OrderedMap::new();
        structure.insert(
            "definition",
            KeyComponent {
                content: "a force".to_string(),
                embedding: vec![0.1, 0.2],
            },
        );
        structure.insert(
            "example",
            KeyComponent {
                content: "an apple".to_string(),
                embedding: vec![0.3, 0.4],
            },
        );

        let record = ProcessedKeyQuestion {
            question: "Define gravity.".to_string(),
            answer: "a force; an apple".to_string(),
            embedding: vec![0.0; 4],
            structure,
            requires_llm_evaluation: vec![],
        };

        assert_eq!(record.labels(), vec!["definition", "example"]);
        assert!(!record.is_defaulted());
    }

    #[test]
    fn test_defaulted_key_question() {
        let record = ProcessedKeyQuestion {
            question: "Q".to_string(),
            answer: String::new(),
            embedding: vec![0.0; 8],
            structure: OrderedMap::new(),
            requires_llm_evaluation: vec![],
        };

        assert!(record.is_defaulted());
        assert!(record.labels().is_empty());
    }

    #[test]
    fn test_processed_key_round_trip_keeps_structure_order() {
        let json = r#"{
            "question": "Q",
            "answer": "A",
            "embedding": [0.0],
            "structure": {
                "second_point": {"content": "b", "embedding": [0.0]},
                "first_point": {"content": "a", "embedding": [0.0]}
            },
            "requires_llm_evaluation": ["second_point"]
        }"#;

        let record: ProcessedKeyQuestion = serde_json::from_str(json).expect("parse");
        assert_eq!(record.labels(), vec!["second_point", "first_point"]);
        assert_eq!(record.requires_llm_evaluation, vec!["second_point"]);

        let back = serde_json::to_string(&record).expect("serialize");
        let reparsed: ProcessedKeyQuestion = serde_json::from_str(&back).expect("reparse");
        assert_eq!(reparsed.labels(), vec!["second_point", "first_point"]);
    }

    #[test]
    fn test_processed_key_missing_llm_list_defaults_empty() {
        let json = r#"{
            "question": "Q",
            "answer": "A",
            "embedding": [],
            "structure": {}
        }"#;

        let record: ProcessedKeyQuestion = serde_json::from_str(json).expect("parse");
        assert!(record.requires_llm_evaluation.is_empty());
    }

    #[test]
    fn test_processed_student_answer_serializes_expected_fields() {
        let mut structure: StructureMapping = OrderedMap::new();
        structure.insert("definition", "gravity pulls".to_string());

        let record = ProcessedStudentAnswer {
            original_answer: "gravity pulls".to_string(),
            full_similarity_score: 0.8,
            tfidf_similarity_score: 0.5,
            structure_similarity_scores: vec![0.8],
            mean_structure_similarity_score: 0.8,
            total_structure_components: 1,
            predicted_grade: "7".to_string(),
            structure,
            requires_llm_evaluation: vec![],
        };

        let value = serde_json::to_value(&record).expect("serialize");
        let obj = value.as_object().expect("object");
        for field in [
            "original_answer",
            "full_similarity_score",
            "tfidf_similarity_score",
            "structure_similarity_scores",
            "mean_structure_similarity_score",
            "total_structure_components",
            "predicted_grade",
            "structure",
        ] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
    }
}
