//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{Extractor, ExtractorConfig, ExtractorError, SourceFile};
    use gleaner_domain::{
        ContentPart, ExtractedValue, ExtractionStatus, FieldType, LlmProvider, Schema,
        SchemaError, SchemaField, SchemaTemplate,
    };
    use gleaner_llm::MockProvider;
    use std::future::Future;
    use std::io::Write;
    use std::time::Duration;

    fn contract_schema() -> Schema {
        let mut schema = Schema::new();
        schema.push(SchemaField::new("nr_umowy", FieldType::Number, "Contract number"));
        schema.push(SchemaField::new("data_umowy", FieldType::Date, "Signing date"));
        schema
    }

    fn text_file(name: &str, body: &str) -> SourceFile {
        SourceFile::from_bytes(name, "text/plain", body.as_bytes().to_vec())
    }

    const CONTRACT_ANSWER: &str = r#"{
        "nr_umowy": {"value": 1234, "source": "contract.txt"},
        "data_umowy": {"value": "2024-03-01", "source": "contract.txt"}
    }"#;

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let llm = MockProvider::new(CONTRACT_ANSWER);
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let files = vec![text_file("contract.txt", "Umowa nr 1234 z dnia 1 marca 2024")];
        let result = extractor.extract(&files, &contract_schema()).await.unwrap();

        assert_eq!(result.status(), ExtractionStatus::Success);
        assert!(result.error_message().is_none());

        let names: Vec<&str> = result.data().field_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["nr_umowy", "data_umowy"]);

        let number = result.data().get("nr_umowy").unwrap();
        assert_eq!(number.value.as_ref().and_then(ExtractedValue::as_f64), Some(1234.0));
        assert_eq!(number.source.as_deref(), Some("contract.txt"));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let llm = MockProvider::new(CONTRACT_ANSWER);
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let files = vec![
            text_file("contract.txt", "a"),
            SourceFile::from_bytes("scan.png", "image/png", vec![0x89, 0x50]),
        ];
        extractor.extract(&files, &contract_schema()).await.unwrap();

        let request = extractor.llm().last_request().unwrap();
        assert_eq!(request.file_count(), 2);
        assert!(matches!(request.parts.last(), Some(ContentPart::Text(_))));
        assert_eq!(request.config.response_mime_type, "application/json");
        assert!((request.config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(request.config.response_schema.required, vec!["nr_umowy", "data_umowy"]);

        let prompt = request.prompt().unwrap();
        assert!(prompt.contains("Files provided: contract.txt, scan.png"));
        assert!(prompt.contains("- nr_umowy (number): Contract number"));
    }

    #[tokio::test]
    async fn test_unfound_fields_are_null() {
        let llm = MockProvider::new(
            r#"{"nr_umowy": {"value": null, "source": null}, "data_umowy": {"value": null, "source": null}}"#,
        );
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let result = extractor
            .extract(&[text_file("a.txt", "nothing here")], &contract_schema())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.data().len(), 2);
        assert!(result.data().iter().all(|(_, item)| !item.has_value() && item.source.is_none()));
    }

    #[tokio::test]
    async fn test_missing_field_is_error() {
        let llm = MockProvider::new(r#"{"nr_umowy": {"value": 1, "source": null}}"#);
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let result = extractor
            .extract(&[text_file("a.txt", "x")], &contract_schema())
            .await
            .unwrap();

        assert_eq!(result.status(), ExtractionStatus::Error);
        assert!(result.data().is_empty());
        assert!(result.error_message().unwrap().contains("data_umowy"));
    }

    #[tokio::test]
    async fn test_extraction_with_invalid_json() {
        let llm = MockProvider::new("This is not JSON");
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let result = extractor
            .extract(&[text_file("a.txt", "x")], &contract_schema())
            .await
            .unwrap();

        assert!(!result.is_success());
        assert!(result.data().is_empty());
        assert!(result.error_message().unwrap().starts_with("JSON parse error"));
    }

    #[tokio::test]
    async fn test_extraction_with_empty_response() {
        let llm = MockProvider::new("");
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let result = extractor
            .extract(&[text_file("a.txt", "x")], &contract_schema())
            .await
            .unwrap();

        assert_eq!(result.error_message(), Some("Empty response from AI"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_error_result() {
        let llm = MockProvider::failing("service unavailable");
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        let result = extractor
            .extract(&[text_file("a.txt", "x")], &contract_schema())
            .await
            .unwrap();

        assert!(!result.is_success());
        assert!(result.error_message().unwrap().contains("service unavailable"));
        assert_eq!(extractor.llm().call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_files_is_validation_error() {
        let extractor = Extractor::new(MockProvider::new(CONTRACT_ANSWER), ExtractorConfig::default());

        let err = extractor.extract(&[], &contract_schema()).await.unwrap_err();
        assert!(matches!(err, ExtractorError::NoFiles));
        assert_eq!(err.to_string(), "Please upload at least one file.");
        assert_eq!(extractor.llm().call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_schema_is_validation_error() {
        let extractor = Extractor::new(MockProvider::new("{}"), ExtractorConfig::default());

        let err = extractor
            .extract(&[text_file("a.txt", "x")], &Schema::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::Schema(SchemaError::Empty)));
        assert_eq!(err.to_string(), "Please define at least one field to extract.");
        assert_eq!(extractor.llm().call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_files_checked_before_schema() {
        let extractor = Extractor::new(MockProvider::new("{}"), ExtractorConfig::default());

        let err = extractor.extract(&[], &Schema::new()).await.unwrap_err();
        assert!(matches!(err, ExtractorError::NoFiles));
    }

    #[tokio::test]
    async fn test_duplicate_field_names_rejected() {
        let extractor = Extractor::new(MockProvider::new("{}"), ExtractorConfig::default());

        let mut schema = Schema::new();
        schema.push(SchemaField::new("total", FieldType::Number, ""));
        schema.push(SchemaField::new("total", FieldType::Text, ""));

        let err = extractor
            .extract(&[text_file("a.txt", "x")], &schema)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::Schema(SchemaError::DuplicateName(_))));
        assert_eq!(extractor.llm().call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_media_type_rejected() {
        let extractor = Extractor::new(MockProvider::new("{}"), ExtractorConfig::default());

        let files = vec![SourceFile::from_bytes("movie.mp4", "video/mp4", vec![0])];
        let err = extractor.extract(&files, &contract_schema()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, ExtractorError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn test_unreadable_file_aborts_batch() {
        let extractor = Extractor::new(MockProvider::new(CONTRACT_ANSWER), ExtractorConfig::default());

        let files = vec![
            text_file("a.txt", "x"),
            SourceFile::from_path("/definitely/not/here.pdf"),
        ];
        let result = extractor.extract(&files, &contract_schema()).await.unwrap();

        assert!(!result.is_success());
        assert!(result.error_message().unwrap().contains("here.pdf"));
        assert_eq!(extractor.llm().call_count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_from_disk_and_data_uri() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(tmp, "contract,date\n1234,2024-03-01").unwrap();

        let extractor = Extractor::new(MockProvider::new(CONTRACT_ANSWER), ExtractorConfig::default());
        let files = vec![
            SourceFile::from_path(tmp.path()),
            SourceFile::from_data_uri("note.txt", "data:text/plain;base64,aGVsbG8="),
        ];
        let result = extractor.extract(&files, &contract_schema()).await.unwrap();
        assert!(result.is_success());

        let request = extractor.llm().last_request().unwrap();
        let mime_types: Vec<&str> = request
            .parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::InlineData(m) => Some(m.mime_type.as_str()),
                ContentPart::Text(_) => None,
            })
            .collect();
        assert_eq!(mime_types, vec!["text/csv", "text/plain"]);
    }

    #[tokio::test]
    async fn test_template_schema_extraction() {
        let mut schema = Schema::new();
        let templates = SchemaTemplate::builtin();
        let template = &templates[0];
        schema.apply_template(template);

        let extractor = Extractor::new(MockProvider::new(CONTRACT_ANSWER), ExtractorConfig::default());
        let result = extractor
            .extract(&[text_file("contract.txt", "x")], &schema)
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.data().len(), template.fields.len());
    }

    #[tokio::test]
    async fn test_result_serialization() {
        let extractor = Extractor::new(MockProvider::new(CONTRACT_ANSWER), ExtractorConfig::default());
        let result = extractor
            .extract(&[text_file("contract.txt", "x")], &contract_schema())
            .await
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["nr_umowy"]["value"], 1234);
        assert_eq!(json["data"]["data_umowy"]["source"], "contract.txt");
    }

    /// Provider that never answers in time
    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        type Error = String;

        fn model_name(&self) -> &str {
            "slow"
        }

        fn generate_structured(
            &self,
            _request: &gleaner_domain::GenerationRequest,
        ) -> impl Future<Output = Result<String, Self::Error>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("{}".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_timeout_is_error_result() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            ..Default::default()
        };
        let extractor = Extractor::new(SlowProvider, config);

        let result = extractor
            .extract(&[text_file("a.txt", "x")], &contract_schema())
            .await
            .unwrap();
        assert_eq!(result.error_message(), Some("Extraction timeout"));
    }
}
