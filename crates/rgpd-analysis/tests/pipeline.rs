mod common;

use common::{pdf_bytes, pipeline, text_document};
use rgpd_analysis::{
    AnalysisConfig, AnalysisRequest, AnalysisStatus, AnonymizationPolicy, Document, EntityType,
    ErrorKind, FileType, Language, Pipeline,
};
use rgpd_guard::recognizer::Recognizer;
use rgpd_guard::{DetectorConfig, EntityDetector, EntitySpan, GuardError};
use std::sync::Arc;

const CONTACT: &str = "John Doe, john@example.com, +33612345678";

#[test]
fn test_contact_line_replace() {
    let record = pipeline().run_with_entities(
        &text_document("contact.txt", CONTACT),
        &AnonymizationPolicy::replace("<SENSITIVE_DATA>"),
        Language::French,
        &[EntityType::Person, EntityType::Email, EntityType::PhoneNumber],
    );

    let report = record.report().expect("completed");
    assert_eq!(
        report.anonymized_text,
        "<SENSITIVE_DATA>, <SENSITIVE_DATA>, <SENSITIVE_DATA>"
    );
    assert_eq!(report.original_text, CONTACT);
    assert_eq!(report.items.len(), 3);

    assert_eq!(report.statistics.len(), 3);
    for stat in &report.statistics {
        assert_eq!(stat.count, 1);
        assert!((stat.percentage - 33.33).abs() < 0.01);
    }
    let total: f64 = report.statistics.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 0.01);
}

#[test]
fn test_contact_line_default_mask() {
    let config = AnalysisConfig::default();
    let policy = config.anonymizer.default_policy().unwrap();
    let record = pipeline().run(&text_document("contact.txt", CONTACT), &policy, Language::French);
    assert_eq!(
        record.report().unwrap().anonymized_text,
        "**** Doe, ****@example.com, ****12345678"
    );
}

#[test]
fn test_allow_list_limits_statistics() {
    let record = pipeline().run_with_entities(
        &text_document("contact.txt", CONTACT),
        &AnonymizationPolicy::Redact,
        Language::French,
        &[EntityType::Email],
    );
    let report = record.report().unwrap();
    assert_eq!(report.anonymized_text, "John Doe, , +33612345678");
    assert!(report
        .entities
        .iter()
        .all(|span| span.entity_type == EntityType::Email));
    assert_eq!(report.statistics.len(), 1);
    assert_eq!(report.statistics[0].percentage, 100.0);
}

#[test]
fn test_clean_document_is_unchanged() {
    let text = "Le comité se réunira jeudi pour valider le budget.";
    for policy in [
        AnonymizationPolicy::mask('*', 4, false).unwrap(),
        AnonymizationPolicy::replace("<X>"),
        AnonymizationPolicy::Redact,
    ] {
        let record = pipeline().run(&text_document("note.txt", text), &policy, Language::French);
        let report = record.report().unwrap();
        assert_eq!(report.anonymized_text, text);
        assert!(report.statistics.is_empty());
        assert_eq!(report.sensitive_count(), 0);
    }
}

#[test]
fn test_pdf_document() {
    let bytes = pdf_bytes(&[
        "Client: Marie Curie",
        "Email: marie.curie@example.fr",
        "Carte: 4532 0151 1283 0366",
    ]);
    let record = pipeline().run(
        &Document::new("dossier.pdf", FileType::Pdf, bytes),
        &AnonymizationPolicy::replace("[X]"),
        Language::French,
    );

    assert_eq!(record.status(), AnalysisStatus::Completed);
    let report = record.report().unwrap();
    assert_eq!(report.page_count, Some(3));
    assert!(report.original_text.contains("marie.curie@example.fr"));
    for secret in ["Marie Curie", "marie.curie@example.fr", "4532 0151 1283 0366"] {
        assert!(!report.anonymized_text.contains(secret), "{secret} leaked");
    }
    let types: Vec<EntityType> = report.statistics.iter().map(|s| s.entity_type).collect();
    assert!(types.contains(&EntityType::Person));
    assert!(types.contains(&EntityType::Email));
    assert!(types.contains(&EntityType::CreditCard));
}

#[test]
fn test_csv_document() {
    let csv = "nom,email,telephone\n\
               Jean Martin,jean.martin@example.fr,06 12 34 56 78\n\
               Sophie Bernard,sophie@example.org,01 98 76 54 32\n";
    let record = pipeline().run(
        &Document::new("clients.csv", FileType::Csv, csv.as_bytes().to_vec()),
        &AnonymizationPolicy::Redact,
        Language::French,
    );

    let report = record.report().unwrap();
    assert_eq!(report.row_count, Some(2));
    assert!(report.original_text.starts_with("           nom"));
    for secret in ["jean.martin@example.fr", "06 12 34 56 78", "Sophie Bernard"] {
        assert!(report.original_text.contains(secret));
        assert!(!report.anonymized_text.contains(secret));
    }
    let emails = report
        .statistics
        .iter()
        .find(|s| s.entity_type == EntityType::Email)
        .unwrap();
    assert_eq!(emails.count, 2);
}

#[test]
fn test_windows_1252_csv() {
    let bytes = b"nom,ville\nH\xe9l\xe8ne Dupont,Orl\xe9ans\n".to_vec();
    let record = pipeline().run(
        &Document::new("export.csv", FileType::Csv, bytes),
        &AnonymizationPolicy::Redact,
        Language::French,
    );
    let report = record.report().unwrap();
    assert_eq!(report.encoding.as_deref(), Some("windows-1252"));
    assert!(report.original_text.contains("Hélène Dupont"));
    for secret in ["Hélène Dupont", "Orléans"] {
        assert!(!report.anonymized_text.contains(secret), "{secret} leaked");
    }
    assert_eq!(report.statistics[0].entity_type, EntityType::Person);
}

#[test]
fn test_windows_1252_text() {
    let bytes = b"Adresse \xe9lectronique de la soci\xe9t\xe9 : contact@example.fr".to_vec();
    let record = pipeline().run(
        &Document::new("legacy.txt", FileType::PlainText, bytes),
        &AnonymizationPolicy::replace("<EMAIL>"),
        Language::French,
    );
    let report = record.report().unwrap();
    assert_eq!(report.encoding.as_deref(), Some("windows-1252"));
    assert!(report.original_text.starts_with("Adresse électronique"));
    assert!(report.anonymized_text.ends_with("<EMAIL>"));
}

#[test]
fn test_whitespace_document_fails() {
    let record = pipeline().run(
        &text_document("blank.txt", " \n\n\t "),
        &AnonymizationPolicy::Redact,
        Language::French,
    );
    assert_eq!(record.status(), AnalysisStatus::Failed);
    assert_eq!(record.failure().unwrap().kind, ErrorKind::EmptyContent);
    assert!(record.report().is_none());
}

#[test]
fn test_corrupt_pdf_fails() {
    let record = pipeline().run(
        &Document::new("broken.pdf", FileType::Pdf, b"%PDF-1.5 garbage".to_vec()),
        &AnonymizationPolicy::Redact,
        Language::French,
    );
    assert_eq!(record.failure().unwrap().kind, ErrorKind::ExtractionFailure);
}

struct Unavailable;

impl Recognizer for Unavailable {
    fn name(&self) -> &str {
        "remote_ner"
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Person
    }

    fn analyze(&self, _text: &str, _language: Language) -> rgpd_guard::Result<Vec<EntitySpan>> {
        Err(GuardError::DetectionFailure("service unavailable".into()))
    }
}

#[test]
fn test_recognizer_failure_marks_record_failed() {
    let mut detector = EntityDetector::new(DetectorConfig::default()).unwrap();
    detector.add_recognizer(Box::new(Unavailable));
    let pipeline = Pipeline::builder()
        .audit(false)
        .detector(Arc::new(detector))
        .build()
        .unwrap();

    let record = pipeline.run(
        &text_document("contact.txt", CONTACT),
        &AnonymizationPolicy::Redact,
        Language::French,
    );
    let failure = record.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::DetectionFailure);
    assert!(failure.message.contains("remote_ner"));
    assert!(failure.message.contains("service unavailable"));
    assert!(record.analysis_date.is_some());
}

#[tokio::test]
async fn test_concurrent_requests_share_pipeline() {
    let pipeline = pipeline();
    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let text = format!("Dossier {i}: user{i}@example.fr");
            let request = AnalysisRequest::new(
                text_document("batch.txt", &text),
                AnonymizationPolicy::replace("<EMAIL>"),
            )
            .with_entities(vec![EntityType::Email]);
            pipeline.analyze(request).await.unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.await.unwrap();
        assert_eq!(
            record.report().unwrap().anonymized_text,
            format!("Dossier {i}: <EMAIL>")
        );
    }
}

#[tokio::test]
async fn test_upload_to_record() {
    let config = AnalysisConfig::default();
    let request = AnalysisRequest::from_upload(
        "contact.txt",
        CONTACT.as_bytes().to_vec(),
        "txt",
        Some("replace"),
        Some("fr"),
        &config,
    )
    .unwrap();
    let record = Pipeline::new(config).unwrap().analyze(request).await.unwrap();
    assert_eq!(record.document.file_size, CONTACT.len());
    assert_eq!(record.language, Language::French);
    assert_eq!(record.report().unwrap().statistics.len(), 3);
}
