use super::*;
use crate::db::memory::MemoryDatabase;

const THREE_UNITS: &str = "INSERT INTO RESERVA (nombre) VALUES ('Pampa Galeras');\n\
INSERT INTO ESPECIE (nombre_comun) VALUES ('Vicuña');\n\
INSERT INTO HATO (zona) VALUES ('Norte');\n";

fn run(db: &MemoryDatabase, script: &str) -> Result<ExecutionOutcome, crate::db::error::DbError> {
    let units = split_script_units(script);
    let provider = db.provider();
    ScriptRunner::new(&provider).run(&units)
}

#[test]
fn test_all_units_succeed_and_commit() {
    let db = MemoryDatabase::new();
    let outcome = run(&db, THREE_UNITS).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Success { units_executed: 3 });

    let committed = db.committed();
    assert_eq!(committed.len(), 3);
    assert!(committed[0].contains("Pampa Galeras"));
    assert!(committed[2].contains("Norte"));
}

#[test]
fn test_units_are_sent_without_terminators() {
    let db = MemoryDatabase::new();
    run(&db, "CREATE TABLE t (x NUMBER);\nBEGIN\n  NULL;\nEND;\n/\n").unwrap();
    assert_eq!(
        db.committed(),
        vec![
            "CREATE TABLE t (x NUMBER)".to_string(),
            "BEGIN\n  NULL;\nEND;".to_string()
        ]
    );
}

#[test]
fn test_failure_in_second_unit_rolls_back_everything() {
    let db = MemoryDatabase::new();
    db.fail_on("Vicuña");

    let outcome = run(&db, THREE_UNITS).unwrap();
    let failure = match outcome {
        ExecutionOutcome::Failure(failure) => failure,
        other => panic!("expected failure, got {other:?}"),
    };

    assert_eq!(failure.failed_index, 2);
    assert_eq!(failure.total_units, 3);
    assert_eq!(
        failure.full_text,
        "INSERT INTO ESPECIE (nombre_comun) VALUES ('Vicuña');"
    );
    assert!(failure.error_message.contains("ORA-00942"));
    assert!(db.committed().is_empty(), "unit 1 must not be persisted");
    assert_eq!(db.rollbacks(), 1);
}

#[test]
fn test_failure_stops_remaining_units() {
    let db = MemoryDatabase::new();
    db.fail_on("RESERVA");
    db.fail_on("HATO");

    let outcome = run(&db, THREE_UNITS).unwrap();
    match outcome {
        ExecutionOutcome::Failure(failure) => assert_eq!(failure.failed_index, 1),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_failure_preview_is_capped() {
    let db = MemoryDatabase::new();
    db.fail_on("LONG_TABLE");
    let long_insert = format!(
        "INSERT INTO LONG_TABLE (texto)\nVALUES ('{}');",
        "x".repeat(400)
    );

    let outcome = run(&db, &long_insert).unwrap();
    let ExecutionOutcome::Failure(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.preview.chars().count(), 200);
    assert!(!failure.preview.contains('\n'));
    assert_eq!(failure.full_text, long_insert);
}

#[test]
fn test_commit_failure_is_reported_distinctly() {
    let db = MemoryDatabase::new();
    db.fail_commit(true);

    let outcome = run(&db, THREE_UNITS).unwrap();
    match outcome {
        ExecutionOutcome::CommitFailed {
            units_executed,
            error_message,
        } => {
            assert_eq!(units_executed, 3);
            assert!(error_message.contains("ORA-02091"));
        }
        other => panic!("expected commit failure, got {other:?}"),
    }
    assert!(db.committed().is_empty());
}

#[test]
fn test_empty_script_commits_nothing() {
    let db = MemoryDatabase::new();
    let outcome = run(&db, "-- nada que hacer\n").unwrap();
    assert_eq!(outcome, ExecutionOutcome::Success { units_executed: 0 });
    assert_eq!(db.acquired(), 1);
}

#[test]
fn test_session_released_on_every_path() {
    let db = MemoryDatabase::new();
    run(&db, THREE_UNITS).unwrap();
    assert_eq!(db.released(), 1);

    db.fail_on("HATO");
    run(&db, THREE_UNITS).unwrap();
    assert_eq!(db.released(), 2);

    let db = MemoryDatabase::new();
    db.fail_commit(true);
    run(&db, THREE_UNITS).unwrap();
    assert_eq!(db.acquired(), 1);
    assert_eq!(db.released(), 1);
}

#[test]
fn test_unavailable_database_is_an_error() {
    let db = MemoryDatabase::new();
    db.set_unavailable(true);
    assert!(run(&db, THREE_UNITS).is_err());
    assert_eq!(db.released(), 0);
}

#[test]
fn test_report_success_shape() {
    let report = RunFileReport::from_outcome(ExecutionOutcome::Success { units_executed: 3 });
    assert!(report.is_success());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["blocksExecuted"], 3);
    assert_eq!(json["message"], "Executed 3 block(s) successfully");
}

#[test]
fn test_report_failure_shape() {
    let report = RunFileReport::from_outcome(ExecutionOutcome::Failure(UnitFailure {
        failed_index: 2,
        total_units: 3,
        preview: "INSERT INTO ESPECIE".to_string(),
        full_text: "INSERT INTO ESPECIE (x) VALUES (1);".to_string(),
        error_message: "ORA-00942: table or view does not exist".to_string(),
    }));
    assert!(!report.is_success());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["error"], "Error executing block");
    assert_eq!(json["blockIndex"], 2);
    assert_eq!(json["totalBlocks"], 3);
    assert_eq!(json["blockPreview"], "INSERT INTO ESPECIE");
    assert_eq!(json["sqlCode"], "INSERT INTO ESPECIE (x) VALUES (1);");
    assert_eq!(json["details"], "ORA-00942: table or view does not exist");
}

#[test]
fn test_report_commit_and_abort_shapes() {
    let commit = RunFileReport::from_outcome(ExecutionOutcome::CommitFailed {
        units_executed: 3,
        error_message: "ORA-02091".to_string(),
    });
    let json = serde_json::to_value(&commit).unwrap();
    assert_eq!(json["error"], "Commit failed");
    assert_eq!(json["details"], "ORA-02091");

    let aborted = RunFileReport::from_result(Err(crate::db::error::DbError::NotConfigured));
    assert!(!aborted.is_success());
    let json = serde_json::to_value(&aborted).unwrap();
    assert_eq!(json["error"], "Script execution failed");
    assert!(json["details"].as_str().unwrap().contains("not configured"));
}
