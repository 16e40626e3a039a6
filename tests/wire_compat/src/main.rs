fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use podcopy_protocol::{BatchUploadResult, FileStatus, FileUploadResult, PodTarget};

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    /// Reads a committed fixture. A missing fixture fails the test.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixture_path(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Parses a fixture into `T`, serializes it back and requires the
    /// exact same JSON value. Integers are compared without conversion.
    fn roundtrip<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  Go:   {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    #[test]
    fn batch_upload_result_roundtrip() {
        let result: BatchUploadResult = roundtrip("batch_upload_result.json");
        assert_eq!(result.total_files, 3);
        assert_eq!(result.files.len(), 3);
        assert_eq!(result.success_count + result.failure_count, result.total_files);
        assert_eq!(result.duration.as_nanos(), 1_532_418_907);
        assert_eq!(
            result.files[1].file_name, "my report (final).txt",
            "file_name keeps the name before sanitization"
        );
        assert_eq!(result.files[2].status, FileStatus::Error);
        assert!(result.end_time > result.start_time);
    }

    #[test]
    fn long_batch_keeps_exact_nanoseconds() {
        let result: BatchUploadResult = roundtrip("batch_upload_result_long.json");
        assert_eq!(result.duration.as_nanos(), 9_007_199_254_740_993);
        assert_eq!(result.files[0].size, 1_099_511_627_776);
    }

    #[test]
    fn file_upload_result_roundtrip() {
        let file: FileUploadResult = roundtrip("file_upload_result_done.json");
        assert!(file.is_done());
        assert_eq!(file.size, 0);
    }

    #[test]
    fn pod_target_roundtrip() {
        let target: PodTarget = roundtrip("pod_target.json");
        assert_eq!(target.to_string(), "default/web-0:nginx");
    }

    #[test]
    fn empty_error_is_omitted() {
        let done = FileUploadResult::done("a.txt", 4);
        let value = serde_json::to_value(&done).unwrap();
        assert!(value.get("error").is_none(), "got {value}");
        assert_eq!(value["status"], "done");
    }

    #[test]
    fn missing_error_defaults_to_empty() {
        let json = r#"{"file_name": "a.txt", "status": "error", "size": 1}"#;
        let file: FileUploadResult = serde_json::from_str(json).unwrap();
        assert!(file.error.is_empty());
        assert!(!file.is_done());
    }

    #[test]
    fn negative_duration_rejected() {
        let mut json = load_fixture("batch_upload_result.json");
        json["duration"] = serde_json::json!(-1);
        let parsed: Result<BatchUploadResult, _> = serde_json::from_value(json);
        assert!(parsed.is_err());
    }
}
