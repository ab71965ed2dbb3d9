use realitydefender::{
    format_result, normalize_score, status, MediaModel, MediaResponse, ResultFormatter,
    ResultsMetadata, ResultsSummary,
};
use serde_json::json;

#[test]
fn test_format_documented_payload() {
    let payload: MediaResponse = serde_json::from_value(json!({
        "requestId": "r1",
        "overallStatus": "COMPLETED",
        "resultsSummary": { "status": "FAKE", "metadata": { "finalScore": 87.5 } },
        "models": [
            { "name": "m1", "status": "FAKE", "finalScore": 90 },
            { "name": "m2", "status": "NOT_APPLICABLE", "finalScore": null }
        ]
    }))
    .unwrap();

    let result = format_result(&payload);

    assert_eq!(result.request_id, "r1");
    assert_eq!(result.status, status::MANIPULATED);
    assert_eq!(result.score, Some(0.875));
    assert_eq!(result.models.len(), 2);
    assert_eq!(result.models[0].name, "m1");
    assert_eq!(result.models[0].status, status::MANIPULATED);
    assert_eq!(result.models[0].score, Some(0.9));
    assert_eq!(result.models[1].status, status::NOT_APPLICABLE);
    assert_eq!(result.models[1].score, None);
}

#[test]
fn test_score_scale_boundary() {
    assert_eq!(normalize_score(Some(1.0)), Some(1.0));
    assert_eq!(normalize_score(Some(0.0)), Some(0.0));
    assert_eq!(normalize_score(Some(100.0)), Some(1.0));
    assert_eq!(normalize_score(None), None);
}

#[test]
fn test_custom_label_and_passthrough() {
    let formatter = ResultFormatter::new("ARTIFICIAL");
    let payload = MediaResponse {
        request_id: "r2".to_string(),
        results_summary: Some(ResultsSummary {
            status: "FAKE".to_string(),
            metadata: Some(ResultsMetadata {
                final_score: Some(0.4),
            }),
        }),
        models: vec![MediaModel {
            name: "m1".to_string(),
            status: "SOMETHING_NEW".to_string(),
            final_score: Some(40.0),
            ..Default::default()
        }],
        ..Default::default()
    };

    let result = formatter.format(&payload);

    assert_eq!(result.status, "ARTIFICIAL");
    assert_eq!(result.score, Some(0.4));
    assert_eq!(result.models[0].status, "SOMETHING_NEW");
    assert_eq!(result.models[0].score, Some(0.4));
}

#[test]
fn test_missing_summary_uses_overall_status() {
    let payload: MediaResponse = serde_json::from_value(json!({
        "requestId": "r3",
        "overallStatus": "ANALYZING"
    }))
    .unwrap();

    let result = ResultFormatter::default().format(&payload);

    assert_eq!(result.status, status::ANALYZING);
    assert_eq!(result.score, None);
    assert!(result.models.is_empty());
    assert!(result.is_still_pending());
}
