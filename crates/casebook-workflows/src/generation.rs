//! Generation session: selection → generating → editing → saved/discarded.
//!
//! The session is the dialog-scoped state behind AI-assisted note and
//! report drafting. States are an explicit enum, so an in-flight request
//! or an unsaved draft cannot be confused with an empty selection, and a
//! second generation cannot start while one is running.

use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use casebook_core::{
    parse_sections, Confidentiality, CreateNoteRequest, CreateReportRequest, Error,
    FileRepository, GenerationBackend, GenerationRequest, NoteRepository, ObjectStore,
    ReportRepository, ReportSection, ReportType, Result, SectionSpec, SourceDocument,
    TemplateRepository,
};

use crate::audit::{actions, AuditRecorder};

/// What a session requires before generation may start.
///
/// Call sites differ: free-form notes generate from a template *or* source
/// files, standardized reports require both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    TemplateOrSources,
    TemplateAndSources,
}

/// A generated draft being edited.
#[derive(Debug, Clone)]
pub struct Draft {
    pub title: String,
    /// Flat text; always authoritative.
    pub content: String,
    /// Best-effort section projection of `content`. `None` when the text
    /// has no headings.
    pub sections: Option<Vec<ReportSection>>,
    pub model: Option<String>,
}

/// Session lifecycle state.
#[derive(Debug, Clone)]
pub enum SessionState {
    Selecting,
    Generating,
    Editing { draft: Draft },
    Saved { record_id: Uuid },
    Discarded,
}

/// Dialog-scoped generation state machine.
pub struct GenerationSession {
    policy: SelectionPolicy,
    template_id: Option<Uuid>,
    source_file_ids: Vec<Uuid>,
    profile_context: Option<String>,
    state: SessionState,
}

impl GenerationSession {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            template_id: None,
            source_file_ids: Vec::new(),
            profile_context: None,
            state: SessionState::Selecting,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn require_selecting(&self) -> Result<()> {
        match self.state {
            SessionState::Selecting => Ok(()),
            SessionState::Generating => Err(Error::InvalidInput(
                "generation already in flight".to_string(),
            )),
            _ => Err(Error::InvalidInput(
                "session is no longer selecting".to_string(),
            )),
        }
    }

    /// Choose (or clear) the template.
    pub fn select_template(&mut self, template_id: Option<Uuid>) -> Result<()> {
        self.require_selecting()?;
        self.template_id = template_id;
        Ok(())
    }

    /// Add or remove a source file from the selection.
    pub fn toggle_source(&mut self, file_id: Uuid) -> Result<()> {
        self.require_selecting()?;
        if let Some(pos) = self.source_file_ids.iter().position(|id| *id == file_id) {
            self.source_file_ids.remove(pos);
        } else {
            self.source_file_ids.push(file_id);
        }
        Ok(())
    }

    pub fn set_profile_context(&mut self, context: Option<String>) -> Result<()> {
        self.require_selecting()?;
        self.profile_context = context;
        Ok(())
    }

    fn selection_satisfied(&self) -> bool {
        let has_template = self.template_id.is_some();
        let has_sources = !self.source_file_ids.is_empty();
        match self.policy {
            SelectionPolicy::TemplateOrSources => has_template || has_sources,
            SelectionPolicy::TemplateAndSources => has_template && has_sources,
        }
    }

    /// True when closing the dialog would lose work: a draft being edited,
    /// or a non-empty selection.
    pub fn has_unsaved_work(&self) -> bool {
        match &self.state {
            SessionState::Editing { .. } => true,
            SessionState::Selecting => {
                self.template_id.is_some() || !self.source_file_ids.is_empty()
            }
            _ => false,
        }
    }

    /// Run one generation request against the backend.
    ///
    /// On success the session moves to `Editing` with a parsed draft. On
    /// failure it returns to `Selecting` with selections intact and no
    /// partial content.
    pub async fn generate(
        &mut self,
        templates: &dyn TemplateRepository,
        files: &dyn FileRepository,
        storage: &dyn ObjectStore,
        backend: &dyn GenerationBackend,
    ) -> Result<()> {
        self.require_selecting()?;
        if !self.selection_satisfied() {
            return Err(Error::InvalidInput(match self.policy {
                SelectionPolicy::TemplateOrSources => {
                    "select a template or at least one source file".to_string()
                }
                SelectionPolicy::TemplateAndSources => {
                    "select a template and at least one source file".to_string()
                }
            }));
        }

        self.state = SessionState::Generating;
        let start = Instant::now();

        match self.run_generation(templates, files, storage, backend).await {
            Ok(draft) => {
                info!(
                    subsystem = "workflows",
                    op = "generate",
                    backend = backend.name(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "draft generated"
                );
                self.state = SessionState::Editing { draft };
                Ok(())
            }
            Err(e) => {
                warn!(
                    subsystem = "workflows",
                    op = "generate",
                    backend = backend.name(),
                    error = %e,
                    "generation failed; returning to selection"
                );
                self.state = SessionState::Selecting;
                Err(e)
            }
        }
    }

    async fn run_generation(
        &self,
        templates: &dyn TemplateRepository,
        files: &dyn FileRepository,
        storage: &dyn ObjectStore,
        backend: &dyn GenerationBackend,
    ) -> Result<Draft> {
        let template_sections = match self.template_id {
            Some(template_id) => {
                let full = templates
                    .get(template_id)
                    .await?
                    .ok_or_else(|| Error::NotFound(format!("Template {} not found", template_id)))?;
                full.sections
                    .into_iter()
                    .map(|s| SectionSpec {
                        title: s.title,
                        instructions: s.instructions,
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let mut source_documents = Vec::with_capacity(self.source_file_ids.len());
        for file_id in &self.source_file_ids {
            let record = files.get(*file_id).await?;
            let content = match (&record.storage_path, &record.inline_content) {
                (Some(path), _) => {
                    String::from_utf8_lossy(&storage.read(path).await?).into_owned()
                }
                (None, Some(inline)) => inline.clone(),
                (None, None) => {
                    return Err(Error::Internal(format!(
                        "file {} has neither storage path nor inline content",
                        record.id
                    )))
                }
            };
            source_documents.push(SourceDocument {
                name: record.name,
                content,
            });
        }

        let response = backend
            .generate(&GenerationRequest {
                template_sections,
                source_documents,
                profile_context: self.profile_context.clone(),
            })
            .await?;

        let sections = parse_sections(&response.content);
        let title = derive_title(&response.content);

        Ok(Draft {
            title,
            content: response.content,
            sections,
            model: response.model,
        })
    }

    /// Apply edits to the draft. The flat text is updated first; the
    /// section projection is refreshed best-effort and may disappear.
    pub fn edit(&mut self, title: Option<String>, content: Option<String>) -> Result<()> {
        let SessionState::Editing { draft } = &mut self.state else {
            return Err(Error::InvalidInput("no draft to edit".to_string()));
        };

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(content) = content {
            draft.sections = parse_sections(&content);
            draft.content = content;
        }
        Ok(())
    }

    /// Persist the draft as a note. A failed insert leaves the session in
    /// `Editing` so the dialog stays open with nothing lost.
    pub async fn save_note(
        &mut self,
        notes: &dyn NoteRepository,
        audit: &AuditRecorder,
        author_id: Uuid,
        confidentiality: Confidentiality,
    ) -> Result<Uuid> {
        let SessionState::Editing { draft } = &self.state else {
            return Err(Error::InvalidInput("no draft to save".to_string()));
        };
        if draft.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }

        let id = notes
            .insert(CreateNoteRequest {
                author_id,
                title: draft.title.clone(),
                content: draft.content.clone(),
                confidentiality,
            })
            .await?;

        audit.record(
            author_id,
            actions::NOTE_CREATE,
            casebook_core::ResourceKind::Note,
            id,
            Some(serde_json::json!({ "generated": true })),
        );

        self.state = SessionState::Saved { record_id: id };
        Ok(id)
    }

    /// Persist the draft as a report. A failed insert leaves the session
    /// in `Editing`.
    #[allow(clippy::too_many_arguments)]
    pub async fn save_report(
        &mut self,
        reports: &dyn ReportRepository,
        audit: &AuditRecorder,
        actor_id: Uuid,
        report_type: ReportType,
        period_start: chrono::NaiveDate,
        period_end: chrono::NaiveDate,
        confidentiality: Confidentiality,
    ) -> Result<Uuid> {
        let SessionState::Editing { draft } = &self.state else {
            return Err(Error::InvalidInput("no draft to save".to_string()));
        };
        if draft.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }

        let sections = draft
            .sections
            .clone()
            .unwrap_or_else(|| vec![ReportSection::text(draft.title.clone(), draft.content.clone())]);

        let id = reports
            .insert(CreateReportRequest {
                title: draft.title.clone(),
                report_type,
                period_start,
                period_end,
                sections,
                metadata: serde_json::json!({
                    "generated": true,
                    "model": draft.model.clone(),
                }),
                confidentiality,
            })
            .await?;

        audit.record(
            actor_id,
            actions::REPORT_CREATE,
            casebook_core::ResourceKind::Report,
            id,
            Some(serde_json::json!({ "report_type": report_type.as_str() })),
        );

        self.state = SessionState::Saved { record_id: id };
        Ok(id)
    }

    /// Reset everything without persisting. The caller asks the user for
    /// confirmation first when [`Self::has_unsaved_work`] is true.
    pub fn discard(&mut self) {
        self.template_id = None;
        self.source_file_ids.clear();
        self.profile_context = None;
        self.state = SessionState::Discarded;
    }
}

/// Title from the first non-blank line, stripped of heading markers.
fn derive_title(content: &str) -> String {
    content
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim_start_matches('#').trim())
        .filter(|l| !l.is_empty())
        .unwrap_or("Untitled")
        .to_string()
}
