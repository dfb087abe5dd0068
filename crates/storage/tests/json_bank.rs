use std::path::PathBuf;

use storage::{JsonQuestionBank, QuestionBankRepository, StorageError};

fn temp_bank_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("quiz-bank-{}-{name}.json", std::process::id()))
}

#[tokio::test]
async fn json_bank_loads_questions_from_disk() {
    let path = temp_bank_path("load");
    tokio::fs::write(
        &path,
        r#"[
            {"question_text": "2+2?", "options": {"A": "3", "B": "4"}, "correct_answer": "B"},
            {"question_text": "Capital of France?", "options": {"A": "Paris", "B": "Rome"}, "correct_answer": "A"}
        ]"#,
    )
    .await
    .unwrap();

    let bank = JsonQuestionBank::new(&path);
    let questions = bank.load_questions().await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].text(), "2+2?");
    assert_eq!(questions[1].correct_answer().as_str(), "A");
}

#[tokio::test]
async fn json_bank_reports_missing_file() {
    let bank = JsonQuestionBank::new(temp_bank_path("missing"));
    let err = bank.load_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn json_bank_rejects_invalid_record() {
    let path = temp_bank_path("invalid");
    tokio::fs::write(
        &path,
        r#"[{"question_text": "Q", "options": {"A": "x", "B": "y"}, "correct_answer": "C"}]"#,
    )
    .await
    .unwrap();

    let err = JsonQuestionBank::new(&path).load_questions().await.unwrap_err();
    tokio::fs::remove_file(&path).await.unwrap();

    assert!(matches!(err, StorageError::InvalidRecord { index: 0, .. }));
}
