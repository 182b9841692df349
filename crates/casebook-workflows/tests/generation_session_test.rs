//! Generation session state machine: selection preconditions, rollback on
//! failure, parse-into-sections, editing, and save semantics.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use casebook_core::*;
use casebook_generation::{MockGenerationBackend, SimulatedBackend};
use casebook_workflows::{AuditRecorder, GenerationSession, SelectionPolicy, SessionState};
use chrono::NaiveDate;
use support::*;
use uuid::Uuid;

struct Ctx {
    templates: Arc<FakeTemplateRepository>,
    files: Arc<FakeFileRepository>,
    storage: Arc<FakeObjectStore>,
    notes: Arc<FakeNoteRepository>,
    reports: Arc<FakeReportRepository>,
    audit_repo: Arc<FakeAuditLogRepository>,
    audit: AuditRecorder,
}

impl Ctx {
    fn new() -> Self {
        let audit_repo = FakeAuditLogRepository::new();
        Self {
            templates: FakeTemplateRepository::new(),
            files: FakeFileRepository::new(),
            storage: FakeObjectStore::new(),
            notes: FakeNoteRepository::new(),
            reports: FakeReportRepository::new(),
            audit: AuditRecorder::new(audit_repo.clone()),
            audit_repo,
        }
    }

    async fn seed_template(&self) -> Uuid {
        self.templates
            .create(CreateTemplateRequest {
                name: "Monthly development report".to_string(),
                description: None,
                author_id: Uuid::new_v4(),
                sections: vec![
                    CreateTemplateSection {
                        title: "Progress".to_string(),
                        order_index: 0,
                        instructions: "Describe school and home progress".to_string(),
                    },
                    CreateTemplateSection {
                        title: "Concerns".to_string(),
                        order_index: 1,
                        instructions: "List open concerns".to_string(),
                    },
                ],
            })
            .await
            .unwrap()
    }

    async fn seed_inline_file(&self, content: &str) -> Uuid {
        self.files
            .insert(CreateFileRecord {
                name: "visit-log.txt".to_string(),
                folder_id: Uuid::new_v4(),
                content_type: "text/plain".to_string(),
                size_bytes: content.len() as i64,
                storage_path: None,
                inline_content: Some(content.to_string()),
                content_hash: None,
                confidentiality: Confidentiality::Internal,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_stored_file(&self, path: &str, content: &str) -> Uuid {
        self.storage.write(path, content.as_bytes()).await.unwrap();
        self.files
            .insert(CreateFileRecord {
                name: "stored.txt".to_string(),
                folder_id: Uuid::new_v4(),
                content_type: "text/plain".to_string(),
                size_bytes: content.len() as i64,
                storage_path: Some(path.to_string()),
                inline_content: None,
                content_hash: None,
                confidentiality: Confidentiality::Internal,
            })
            .await
            .unwrap()
            .id
    }

    async fn generate(
        &self,
        session: &mut GenerationSession,
        backend: &dyn GenerationBackend,
    ) -> Result<()> {
        session
            .generate(
                self.templates.as_ref(),
                self.files.as_ref(),
                self.storage.as_ref(),
                backend,
            )
            .await
    }
}

#[tokio::test]
async fn test_generate_parses_sections_and_enters_editing() {
    let ctx = Ctx::new();
    let template_id = ctx.seed_template().await;
    let file_id = ctx.seed_inline_file("weekly visit notes").await;
    let backend = MockGenerationBackend::new().with_response("# A\n\nfoo\n\n# B\n\nbar\n\n");

    let mut session = GenerationSession::new(SelectionPolicy::TemplateAndSources);
    session.select_template(Some(template_id)).unwrap();
    session.toggle_source(file_id).unwrap();

    ctx.generate(&mut session, &backend).await.unwrap();

    let SessionState::Editing { draft } = session.state() else {
        panic!("expected editing state, got {:?}", session.state());
    };
    assert_eq!(
        draft.sections,
        Some(vec![
            ReportSection::text("A", "foo"),
            ReportSection::text("B", "bar"),
        ])
    );
    assert_eq!(draft.title, "A");

    // The backend saw the template structure and the file content.
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].template_sections.len(), 2);
    assert_eq!(calls[0].template_sections[0].title, "Progress");
    assert_eq!(calls[0].source_documents[0].content, "weekly visit notes");
}

#[tokio::test]
async fn test_generate_reads_stored_file_content() {
    let ctx = Ctx::new();
    let file_id = ctx.seed_stored_file("k/stored", "content from the blob").await;
    let backend = MockGenerationBackend::new();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    assert_eq!(
        backend.calls()[0].source_documents[0].content,
        "content from the blob"
    );
}

#[tokio::test]
async fn test_generation_failure_returns_to_selection() {
    let ctx = Ctx::new();
    let file_id = ctx.seed_inline_file("notes").await;
    let failing = MockGenerationBackend::new().with_failure("endpoint unreachable");

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();

    let err = ctx.generate(&mut session, &failing).await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    assert!(matches!(session.state(), SessionState::Selecting));

    // Selections survive the failure; a retry against a healthy backend
    // succeeds without re-selecting anything.
    let healthy = MockGenerationBackend::new().with_response("# Retry\n\nok");
    ctx.generate(&mut session, &healthy).await.unwrap();
    assert!(matches!(session.state(), SessionState::Editing { .. }));
}

#[tokio::test]
async fn test_selection_policy_blocks_generation_before_backend_call() {
    let ctx = Ctx::new();
    let template_id = ctx.seed_template().await;
    let backend = MockGenerationBackend::new();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateAndSources);
    session.select_template(Some(template_id)).unwrap();

    let err = ctx.generate(&mut session, &backend).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(backend.call_count(), 0);
    assert!(matches!(session.state(), SessionState::Selecting));
}

#[tokio::test]
async fn test_save_note_persists_draft_and_audits() {
    let ctx = Ctx::new();
    let file_id = ctx.seed_inline_file("notes").await;
    let backend = MockGenerationBackend::new().with_response("# Summary\n\nSettled well.");
    let author = Uuid::new_v4();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    let note_id = session
        .save_note(
            ctx.notes.as_ref(),
            &ctx.audit,
            author,
            Confidentiality::Sensitive,
        )
        .await
        .unwrap();

    assert!(matches!(session.state(), SessionState::Saved { record_id } if *record_id == note_id));
    let note = ctx.notes.fetch(note_id).await.unwrap();
    assert_eq!(note.title, "Summary");
    assert!(note.content.contains("Settled well."));

    settle().await;
    let trail = ctx
        .audit_repo
        .list_for_resource(ResourceKind::Note, note_id)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].details.as_ref().unwrap()["generated"], true);
}

#[tokio::test]
async fn test_save_failure_keeps_session_editing() {
    let ctx = Ctx::new();
    let file_id = ctx.seed_inline_file("notes").await;
    let backend = MockGenerationBackend::new();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    ctx.notes.fail_insert.store(true, Ordering::SeqCst);
    let err = session
        .save_note(
            ctx.notes.as_ref(),
            &ctx.audit,
            Uuid::new_v4(),
            Confidentiality::Internal,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Internal(_)));

    // Nothing lost: the draft is still there to retry or copy out.
    assert!(matches!(session.state(), SessionState::Editing { .. }));
}

#[tokio::test]
async fn test_save_report_uses_parsed_sections() {
    let ctx = Ctx::new();
    let template_id = ctx.seed_template().await;
    let file_id = ctx.seed_inline_file("notes").await;
    let backend =
        MockGenerationBackend::new().with_response("# Progress\n\ngood\n\n# Concerns\n\nnone");

    let mut session = GenerationSession::new(SelectionPolicy::TemplateAndSources);
    session.select_template(Some(template_id)).unwrap();
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    let report_id = session
        .save_report(
            ctx.reports.as_ref(),
            &ctx.audit,
            Uuid::new_v4(),
            ReportType::Standardized,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            Confidentiality::Restricted,
        )
        .await
        .unwrap();

    let report = ctx.reports.fetch(report_id).await.unwrap();
    assert_eq!(report.sections.len(), 2);
    assert_eq!(report.sections[0].title, "Progress");
    assert_eq!(report.metadata["generated"], true);
}

#[tokio::test]
async fn test_editing_preserves_flat_text_when_unparseable() {
    let ctx = Ctx::new();
    let file_id = ctx.seed_inline_file("notes").await;
    let backend = MockGenerationBackend::new();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    session
        .edit(
            Some("Reworked".to_string()),
            Some("no headings here at all".to_string()),
        )
        .unwrap();

    let SessionState::Editing { draft } = session.state() else {
        panic!("expected editing state");
    };
    assert_eq!(draft.title, "Reworked");
    assert_eq!(draft.content, "no headings here at all");
    assert!(draft.sections.is_none());
}

#[tokio::test]
async fn test_selection_is_locked_while_generating_result_pending() {
    // The state enum rejects selection changes outside `Selecting`; after
    // a completed generation the selection is frozen with the draft.
    let ctx = Ctx::new();
    let file_id = ctx.seed_inline_file("notes").await;
    let backend = MockGenerationBackend::new();

    let mut session = GenerationSession::new(SelectionPolicy::TemplateOrSources);
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    assert!(session.toggle_source(Uuid::new_v4()).is_err());
    assert!(session.select_template(Some(Uuid::new_v4())).is_err());
}

#[tokio::test]
async fn test_simulated_backend_drives_full_session() {
    let ctx = Ctx::new();
    let template_id = ctx.seed_template().await;
    let file_id = ctx.seed_inline_file("weekly visit notes").await;
    let backend = SimulatedBackend::new(std::time::Duration::from_millis(0));

    let mut session = GenerationSession::new(SelectionPolicy::TemplateAndSources);
    session.select_template(Some(template_id)).unwrap();
    session.toggle_source(file_id).unwrap();
    ctx.generate(&mut session, &backend).await.unwrap();

    let SessionState::Editing { draft } = session.state() else {
        panic!("expected editing state");
    };
    let sections = draft.sections.as_ref().unwrap();
    assert_eq!(sections[0].title, "Progress");
    assert_eq!(sections[1].title, "Concerns");
}
