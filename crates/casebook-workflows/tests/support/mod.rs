//! In-memory fakes for the trait seams, with failure injection.
//!
//! These stand in for the PostgreSQL repositories and the object store so
//! workflow behavior (ordering, fallback, swallowed errors) is observable
//! without a live database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use casebook_core::*;

fn injected(what: &str) -> Error {
    Error::Internal(format!("injected {} failure", what))
}

/// Let detached audit tasks run to completion before asserting on them.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}

/// Opt-in test logging: `RUST_LOG=debug cargo test -p casebook-workflows`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeObjectStore {
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_writes: AtomicBool,
    pub fail_removes: AtomicBool,
}

impl FakeObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected write failure".to_string()));
        }
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no blob at {}", path)))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected remove failure".to_string()));
        }
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }

    async fn remove_batch(&self, paths: &[String]) -> Result<()> {
        for path in paths {
            self.remove(path).await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(path))
    }
}

// ---------------------------------------------------------------------------
// Folder repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeFolderRepository {
    pub rows: Mutex<HashMap<Uuid, Folder>>,
    pub fail_delete: AtomicBool,
}

impl FakeFolderRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.lock().unwrap().contains_key(&id)
    }
}

#[async_trait]
impl FolderRepository for FakeFolderRepository {
    async fn create(&self, req: CreateFolderRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        self.rows.lock().unwrap().insert(
            id,
            Folder {
                id,
                title: req.title,
                profile_id: req.profile_id,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn rename(&self, id: Uuid, title: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let folder = rows.get_mut(&id).ok_or(Error::FolderNotFound(id))?;
        folder.title = title.to_string();
        folder.updated_at = Utc::now();
        Ok(())
    }

    async fn list_for_profile(&self, profile_id: Uuid) -> Result<Vec<FolderSummary>> {
        let mut summaries: Vec<FolderSummary> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.profile_id == profile_id)
            .map(|f| FolderSummary {
                id: f.id,
                title: f.title.clone(),
                profile_id: f.profile_id,
                file_count: 0,
                created_at: f.created_at,
                updated_at: f.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(summaries)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("folder delete"));
        }
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::FolderNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// File repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeFileRepository {
    pub rows: Mutex<HashMap<Uuid, FileRecord>>,
    pub fail_list: AtomicBool,
    pub fail_delete_by_folder: AtomicBool,
}

impl FakeFileRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count_in_folder(&self, folder_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.folder_id == folder_id)
            .count()
    }
}

#[async_trait]
impl FileRepository for FakeFileRepository {
    async fn insert(&self, rec: CreateFileRecord) -> Result<FileRecord> {
        let now = Utc::now();
        let record = FileRecord {
            id: new_v7(),
            name: rec.name,
            folder_id: rec.folder_id,
            content_type: rec.content_type,
            size_bytes: rec.size_bytes,
            storage_path: rec.storage_path,
            inline_content: rec.inline_content,
            content_hash: rec.content_hash,
            confidentiality: rec.confidentiality,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<FileRecord> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::FileNotFound(id))
    }

    async fn list_by_folder(&self, folder_id: Uuid) -> Result<Vec<FileRecord>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("file list"));
        }
        let mut records: Vec<FileRecord> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect();
        records.sort_by_key(|f| f.created_at);
        Ok(records)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::FileNotFound(id))
    }

    async fn delete_by_folder(&self, folder_id: Uuid) -> Result<u64> {
        if self.fail_delete_by_folder.load(Ordering::SeqCst) {
            return Err(injected("file bulk delete"));
        }
        let mut rows = self.rows.lock().unwrap();
        let ids: Vec<Uuid> = rows
            .values()
            .filter(|f| f.folder_id == folder_id)
            .map(|f| f.id)
            .collect();
        for id in &ids {
            rows.remove(id);
        }
        Ok(ids.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// Note repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeNoteRepository {
    pub rows: Mutex<HashMap<Uuid, Note>>,
    pub fail_insert: AtomicBool,
}

impl FakeNoteRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl NoteRepository for FakeNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(injected("note insert"));
        }
        let id = new_v7();
        let now = Utc::now();
        self.rows.lock().unwrap().insert(
            id,
            Note {
                id,
                author_id: req.author_id,
                title: req.title,
                content: req.content,
                confidentiality: req.confidentiality,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let mut notes: Vec<Note> = self.rows.lock().unwrap().values().cloned().collect();
        if let Some(search) = &req.search {
            let needle = search.to_lowercase();
            notes.retain(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            });
        }
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = notes.len() as i64;
        Ok(ListNotesResponse {
            notes: notes
                .into_iter()
                .map(|n| NoteSummary {
                    id: n.id,
                    title: n.title,
                    snippet: n.content.chars().take(200).collect(),
                    confidentiality: n.confidentiality,
                    created_at: n.created_at,
                    updated_at: n.updated_at,
                })
                .collect(),
            total,
        })
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let note = rows.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(confidentiality) = req.confidentiality {
            note.confidentiality = confidentiality;
        }
        note.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Template repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTemplateRepository {
    pub rows: Mutex<HashMap<Uuid, TemplateFull>>,
}

impl FakeTemplateRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl TemplateRepository for FakeTemplateRepository {
    async fn create(&self, req: CreateTemplateRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        let sections = req
            .sections
            .into_iter()
            .map(|s| TemplateSection {
                id: new_v7(),
                template_id: id,
                title: s.title,
                order_index: s.order_index,
                instructions: s.instructions,
            })
            .collect();
        self.rows.lock().unwrap().insert(
            id,
            TemplateFull {
                template: Template {
                    id,
                    name: req.name,
                    description: req.description,
                    author_id: req.author_id,
                    created_at: now,
                    updated_at: now,
                },
                sections,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<TemplateFull>> {
        let mut full = self.rows.lock().unwrap().get(&id).cloned();
        if let Some(full) = &mut full {
            full.sections.sort_by_key(|s| s.order_index);
        }
        Ok(full)
    }

    async fn list(&self) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .map(|f| f.template.clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn update(&self, id: Uuid, req: UpdateTemplateRequest) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let full = rows
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Template {} not found", id)))?;
        if let Some(name) = req.name {
            full.template.name = name;
        }
        if let Some(description) = req.description {
            full.template.description = Some(description);
        }
        full.template.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Template {} not found", id)))
    }
}

// ---------------------------------------------------------------------------
// Report repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeReportRepository {
    pub rows: Mutex<HashMap<Uuid, Report>>,
}

impl FakeReportRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ReportRepository for FakeReportRepository {
    async fn insert(&self, req: CreateReportRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        self.rows.lock().unwrap().insert(
            id,
            Report {
                id,
                title: req.title,
                report_type: req.report_type,
                period_start: req.period_start,
                period_end: req.period_end,
                sections: req.sections,
                metadata: req.metadata,
                confidentiality: req.confidentiality,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Report> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))
    }

    async fn update(&self, id: Uuid, req: UpdateReportRequest) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let report = rows
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))?;
        if let Some(title) = req.title {
            report.title = title;
        }
        if let Some(sections) = req.sections {
            report.sections = sections;
        }
        if let Some(metadata) = req.metadata {
            report.metadata = metadata;
        }
        if let Some(confidentiality) = req.confidentiality {
            report.confidentiality = confidentiality;
        }
        report.updated_at = Utc::now();
        Ok(())
    }

    async fn list_by_type(
        &self,
        report_type: ReportType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReportSummary>> {
        let mut reports: Vec<Report> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.report_type == report_type)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        Ok(reports
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|r| ReportSummary {
                id: r.id,
                title: r.title,
                report_type: r.report_type,
                period_start: r.period_start,
                period_end: r.period_end,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))
    }
}

// ---------------------------------------------------------------------------
// Audit log repository
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeAuditLogRepository {
    pub entries: Mutex<Vec<AuditLog>>,
    pub fail_append: AtomicBool,
}

impl FakeAuditLogRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_append(&self, fail: bool) {
        self.fail_append.store(fail, Ordering::SeqCst);
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append(&self, entry: AuditEntry) -> Result<Uuid> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(injected("audit append"));
        }
        let id = new_v7();
        self.entries.lock().unwrap().push(AuditLog {
            id,
            actor_id: entry.actor_id,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            details: entry.details,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_resource(
        &self,
        resource_type: ResourceKind,
        resource_id: Uuid,
    ) -> Result<Vec<AuditLog>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.resource_type == resource_type && e.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<AuditLog>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
