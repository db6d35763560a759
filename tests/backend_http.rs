//! HttpBackend and the commit executor against an in-process fake backend.

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use sprintplan::assignment::{AssignmentBoard, BucketKey};
use sprintplan::backend::{HttpBackend, TaskBackend, UPLOAD_FIELD};
use sprintplan::commit::{CommitContext, CommitPolicy, build_commit_plan, execute_commit};
use sprintplan::errors::{BackendError, CommitError};
use sprintplan::models::DraftId;
use sprintplan::upload::UploadedFile;
use sprintplan::wizard::{Wizard, WizardStep};

use common::{ServerState, membership, spawn, suggestion};

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::with_timeout(base_url, Duration::from_secs(5)).unwrap()
}

fn team() -> Vec<serde_json::Value> {
    vec![membership(10, 1, "ana"), membership(11, 2, "bo")]
}

fn document() -> UploadedFile {
    UploadedFile::new("sprint.txt", b"Build login and the dashboard".to_vec()).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ===== endpoints =====

#[tokio::test]
async fn fetch_team_members_maps_user_ids() {
    let server = spawn(ServerState {
        members: team(),
        ..Default::default()
    })
    .await;

    let members = backend(&server.base_url)
        .fetch_team_members(1)
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].id, 1);
    assert_eq!(members[0].membership_id, 10);
    assert_eq!(members[1].name, "bo");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = spawn(ServerState::default()).await;
    let err = backend(&server.base_url)
        .fetch_team_members(404)
        .await
        .unwrap_err();
    match err {
        BackendError::Status { status, url, .. } => {
            assert_eq!(status.as_u16(), 404);
            assert!(url.ends_with("/usuarioProyecto/proyecto/404"));
        }
        other => panic!("Expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let err = backend("http://127.0.0.1:1")
        .fetch_team_members(1)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Transport { .. }));
}

#[tokio::test]
async fn suggest_tasks_uploads_multipart_document() {
    let server = spawn(ServerState {
        suggestions: vec![suggestion("login", Some(1))],
        ..Default::default()
    })
    .await;

    let records = backend(&server.base_url)
        .suggest_tasks(&document())
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].titulo.as_deref(), Some("login"));
    assert_eq!(records[0].fecha_fin_estimada, Some(date(2099, 1, 20)));

    let uploads = server.state.uploads();
    assert_eq!(uploads.len(), 1);
    let (content_type, body) = &uploads[0];
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(body.contains(&format!("name=\"{}\"", UPLOAD_FIELD)));
    assert!(body.contains("filename=\"sprint.txt\""));
    assert!(body.contains("Build login and the dashboard"));
}

#[tokio::test]
async fn suggestion_failure_carries_body() {
    let server = spawn(ServerState {
        fail_suggest: true,
        ..Default::default()
    })
    .await;
    let err = backend(&server.base_url)
        .suggest_tasks(&document())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("model unavailable"));
}

#[tokio::test]
async fn delete_task_hits_delete_route() {
    let server = spawn(ServerState::default()).await;
    backend(&server.base_url).delete_task(77).await.unwrap();
    assert_eq!(server.state.deleted(), vec![77]);
}

// ===== full run =====

#[tokio::test]
async fn wizard_commits_over_http() {
    let server = spawn(ServerState {
        members: team(),
        suggestions: vec![
            suggestion("login", Some(1)),
            suggestion("dashboard", Some(2)),
            suggestion("docs", Some(999)),
        ],
        ..Default::default()
    })
    .await;
    let backend = backend(&server.base_url);
    let today = date(2099, 1, 1);

    let mut wizard = Wizard::new(1, 1);
    wizard.start().unwrap();
    wizard.confirm_upload(document()).unwrap();
    wizard
        .submit_metadata(&backend, Some(date(2099, 1, 5)), Some(date(2099, 1, 19)), today)
        .await
        .unwrap();
    assert_eq!(wizard.draft_tasks().len(), 3);
    wizard.confirm_review().unwrap();
    wizard.load_team(&backend).await.unwrap();

    let board = wizard.board().unwrap();
    assert_eq!(board.unassigned().len(), 1);
    let docs = board.unassigned()[0];
    let login = board.bucket(BucketKey::Member(1)).unwrap()[0];

    let ctx = CommitContext {
        sprint_id: Some(4),
        today,
    };
    assert!(
        wizard
            .commit(&backend, &ctx, CommitPolicy::Compensate)
            .await
            .is_err()
    );
    assert!(server.state.created().is_empty());

    wizard
        .move_task(docs, BucketKey::Unassigned, BucketKey::Member(2))
        .unwrap();
    wizard
        .move_task(login, BucketKey::Member(1), BucketKey::Member(2))
        .unwrap();
    let report = wizard
        .commit(&backend, &ctx, CommitPolicy::Compensate)
        .await
        .unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(wizard.step(), WizardStep::Idle);

    let created = server.state.created();
    assert_eq!(created.len(), 3);
    for body in &created {
        assert_eq!(body["desarrolladorId"], 2);
        assert_eq!(body["sprintId"], 4);
        assert_eq!(body["fechaInicio"], "2099-01-01");
        assert_eq!(body["fechaFinEstimada"], "2099-01-20");
        assert!(body["fechaFinReal"].is_null());
    }
}

#[tokio::test]
async fn partial_failure_is_rolled_back_over_http() {
    let server = spawn(ServerState {
        members: team(),
        fail_titles: vec!["b".to_string()],
        ..Default::default()
    })
    .await;
    let backend = backend(&server.base_url);
    let members = backend.fetch_team_members(1).await.unwrap();

    let tasks = ["a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            sprintplan::backend::TaskRecord {
                titulo: Some(name.to_string()),
                desarrollador_id: Some(1),
                ..Default::default()
            }
            .into_draft(
                DraftId(i as u64 + 1),
                &sprintplan::backend::SuggestionDefaults {
                    estimated_date: date(2099, 2, 1),
                    project_id: 1,
                    user_story_id: 1,
                },
            )
        })
        .collect();
    let mut board = AssignmentBoard::new(tasks);
    board.set_roster(members);

    let ctx = CommitContext {
        sprint_id: None,
        today: date(2099, 1, 1),
    };
    let plan = build_commit_plan(&board, &ctx).unwrap();
    let err = execute_commit(&backend, &plan, CommitPolicy::Compensate)
        .await
        .unwrap_err();

    match err {
        CommitError::Partial {
            total,
            created,
            failures,
            rolled_back,
            orphaned,
        } => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 1);
            assert!(failures[0].1.contains("500"));
            let mut created = created;
            created.sort();
            let mut deleted = server.state.deleted();
            deleted.sort();
            assert_eq!(deleted, created);
            assert_eq!(rolled_back.len(), 2);
            assert!(orphaned.is_empty());
        }
        other => panic!("Expected Partial, got {:?}", other),
    }
}
