//! Upload flow: file selection, the tree view, the annotation dialog and the
//! submit lifecycle.
//!
//! Phases run `Idle → StepsLoaded → TreeView → Submitting`, then back to `Idle`
//! after a successful submission or to `TreeView` after a failed one.

pub mod files;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    annotations::{
        dialog::{AnnotationDialog, DialogCommit, DialogEdit, DialogView},
        store::{Annotation, MetadataStore},
    },
    core::errors::{AppError, AppResult},
    providers::submission::{ScribeAttachment, SubmissionPayload},
    tree::{
        path::NodePath,
        render::{render, ExpansionState, TreeRow},
        walk::{resolve, NodeTarget},
    },
};

use files::{
    checksum_bytes, ensure_type, parse_steps, FileSlot, FileSummary, IncomingFile, ScribeFile,
    StepsDocument,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Idle,
    StepsLoaded,
    TreeView,
    Submitting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ClickOutcome {
    Toggled { path: String, expanded: bool },
    DialogOpened { dialog: DialogView },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadView {
    pub phase: UploadPhase,
    pub steps: Option<FileSummary>,
    pub scribe: Option<FileSummary>,
    pub can_advance: bool,
    pub can_submit: bool,
    pub scribe_optional_note: bool,
    pub annotation_count: usize,
    pub dialog_open: bool,
}

#[derive(Debug, Default)]
pub struct UploadController {
    steps: Option<StepsDocument>,
    scribe: Option<ScribeFile>,
    show_tree: bool,
    metadata: MetadataStore,
    expansion: ExpansionState,
    dialog: Option<AnnotationDialog>,
    in_flight: Option<Uuid>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        if self.in_flight.is_some() {
            UploadPhase::Submitting
        } else if self.show_tree && self.steps.is_some() {
            UploadPhase::TreeView
        } else if self.steps.is_some() {
            UploadPhase::StepsLoaded
        } else {
            UploadPhase::Idle
        }
    }

    pub fn steps_content(&self) -> Option<&Value> {
        self.steps.as_ref().map(|doc| &doc.content)
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn dialog(&self) -> Option<&AnnotationDialog> {
        self.dialog.as_ref()
    }

    pub fn can_advance(&self) -> bool {
        self.steps.is_some() && !self.show_tree
    }

    /// Takes a picked or dropped file for `slot`. A rejected file leaves the
    /// slot exactly as it was.
    pub fn accept_file(&mut self, slot: FileSlot, file: IncomingFile) -> AppResult<FileSummary> {
        if self.show_tree || self.in_flight.is_some() {
            return Err(AppError::InvalidState(
                "files can only be changed before advancing".to_string(),
            ));
        }
        if let Err(err) = ensure_type(slot, &file) {
            warn!(slot = slot.as_str(), file = %file.name, error = %err, "rejected file");
            return Err(err);
        }

        let checksum = checksum_bytes(&file.bytes);
        let summary = match slot {
            FileSlot::Steps => {
                let content = parse_steps(&file).map_err(|err| {
                    warn!(file = %file.name, error = %err, "invalid JSON file");
                    err
                })?;
                let doc = StepsDocument {
                    file_name: file.name,
                    checksum,
                    size: file.bytes.len(),
                    content,
                };
                let summary = doc.summary();
                self.steps = Some(doc);
                // A new document invalidates paths collected against the old one.
                self.metadata.clear();
                self.expansion.reset();
                summary
            }
            FileSlot::Scribe => {
                let scribe = ScribeFile {
                    file_name: file.name,
                    checksum,
                    bytes: file.bytes,
                };
                let summary = scribe.summary();
                self.scribe = Some(scribe);
                summary
            }
        };

        info!(
            slot = slot.as_str(),
            file = %summary.name,
            size = summary.size,
            checksum = %summary.checksum,
            "accepted file"
        );
        Ok(summary)
    }

    pub fn advance(&mut self) -> AppResult<()> {
        if self.in_flight.is_some() {
            return Err(AppError::InvalidState("submission in progress".to_string()));
        }
        if self.steps.is_none() {
            return Err(AppError::MissingSteps);
        }
        if !self.show_tree {
            info!(has_scribe = self.scribe.is_some(), "advancing to tree view");
        }
        self.show_tree = true;
        Ok(())
    }

    fn tree_document(&self) -> AppResult<&Value> {
        match (&self.steps, self.show_tree) {
            (Some(doc), true) => Ok(&doc.content),
            (None, _) => Err(AppError::MissingSteps),
            (Some(_), false) => Err(AppError::InvalidState(
                "advance to the tree view first".to_string(),
            )),
        }
    }

    pub fn tree_rows(&self) -> AppResult<Vec<TreeRow>> {
        let document = self.tree_document()?;
        Ok(render(document, &self.metadata, &self.expansion))
    }

    pub fn toggle(&mut self, path: &NodePath) -> AppResult<bool> {
        let document = self.tree_document()?;
        match resolve(document, path) {
            Some(NodeTarget::Container(_)) => Ok(self.expansion.toggle(path)),
            Some(NodeTarget::Leaf(_)) => Err(AppError::InvalidInput(format!(
                "`{path}` is a value, not a container"
            ))),
            None => Err(AppError::NotFound(format!("node `{path}`"))),
        }
    }

    /// Containers fold or unfold; leaves open the dialog seeded from the store.
    pub fn click(&mut self, path: &NodePath) -> AppResult<ClickOutcome> {
        let document = self.tree_document()?;
        match resolve(document, path) {
            Some(NodeTarget::Container(_)) => {
                let expanded = self.expansion.toggle(path);
                Ok(ClickOutcome::Toggled {
                    path: path.to_string(),
                    expanded,
                })
            }
            Some(NodeTarget::Leaf(value)) => {
                if self.in_flight.is_some() {
                    return Err(AppError::InvalidState("submission in progress".to_string()));
                }
                let dialog = AnnotationDialog::open(path.clone(), value, self.metadata.get(path));
                let view = dialog.view();
                self.dialog = Some(dialog);
                Ok(ClickOutcome::DialogOpened { dialog: view })
            }
            None => Err(AppError::NotFound(format!("node `{path}`"))),
        }
    }

    pub fn edit_dialog(&mut self, edit: DialogEdit) -> AppResult<DialogView> {
        let dialog = self
            .dialog
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("no node is being edited".to_string()))?;
        dialog.apply(edit);
        Ok(dialog.view())
    }

    /// Commits the active tab into the store and closes the dialog. An invalid
    /// restriction keeps the dialog open with its drafts intact.
    pub fn save_dialog(&mut self) -> AppResult<(NodePath, Annotation)> {
        let dialog = self
            .dialog
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("no node is being edited".to_string()))?;
        let path = dialog.path().clone();
        match dialog.commit()? {
            DialogCommit::Instructions(text) => self.metadata.set_instructions(&path, text),
            DialogCommit::Restrictions(restriction) => {
                self.metadata.set_restrictions(&path, restriction)
            }
        }
        self.dialog = None;
        info!(path = %path, "annotation saved");
        let saved = self.metadata.get(&path).cloned().unwrap_or_default();
        Ok((path, saved))
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Marks a submission as in flight and returns what to send.
    pub fn begin_submit(&mut self) -> AppResult<SubmissionPayload> {
        if self.in_flight.is_some() {
            return Err(AppError::InvalidState(
                "a submission is already in progress".to_string(),
            ));
        }
        let doc = self.steps.as_ref().ok_or(AppError::MissingSteps)?;
        let payload = SubmissionPayload {
            submission_id: Uuid::new_v4(),
            steps_json: serde_json::to_string(&doc.content)?,
            scribe: self.scribe.as_ref().map(|scribe| ScribeAttachment {
                file_name: scribe.file_name.clone(),
                bytes: scribe.bytes.clone(),
            }),
            metadata_json: self.metadata.to_json()?,
        };
        self.in_flight = Some(payload.submission_id);
        Ok(payload)
    }

    /// Settles the in-flight submission: success resets the form, failure
    /// keeps the tree and annotations for a retry.
    pub fn finish_submit(&mut self, submission_id: Uuid, succeeded: bool) {
        if self.in_flight != Some(submission_id) {
            warn!(%submission_id, "ignoring result for a submission that is not in flight");
            return;
        }
        self.in_flight = None;
        if succeeded {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn view(&self) -> UploadView {
        UploadView {
            phase: self.phase(),
            steps: self.steps.as_ref().map(StepsDocument::summary),
            scribe: self.scribe.as_ref().map(ScribeFile::summary),
            can_advance: self.can_advance(),
            can_submit: self.steps.is_some() && self.in_flight.is_none(),
            scribe_optional_note: self.scribe.is_none(),
            annotation_count: self.metadata.len(),
            dialog_open: self.dialog.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::annotations::{
        dialog::DialogTab,
        restriction::{Restriction, RestrictionKind},
    };

    fn json_file(name: &str, body: &str) -> IncomingFile {
        IncomingFile::new(name, Some("application/json".to_string()), body.as_bytes().to_vec())
    }

    fn loaded() -> UploadController {
        let mut controller = UploadController::new();
        controller
            .accept_file(
                FileSlot::Steps,
                json_file("data.json", r#"{"a": 1, "b": {"c": "hello"}}"#),
            )
            .expect("accept json");
        controller.advance().expect("advance");
        controller
    }

    #[test]
    fn advance_stays_disabled_until_json_parses() {
        let mut controller = UploadController::new();
        assert!(!controller.can_advance());
        assert!(matches!(controller.advance(), Err(AppError::MissingSteps)));

        let err = controller
            .accept_file(FileSlot::Steps, json_file("broken.json", "{\"a\": "))
            .expect_err("malformed");
        assert_eq!(err.code(), "MALFORMED_JSON");
        assert!(!controller.can_advance());
        assert!(controller.steps_content().is_none());

        let err = controller
            .accept_file(
                FileSlot::Steps,
                IncomingFile::new("notes.txt", Some("text/plain".to_string()), b"{}".to_vec()),
            )
            .expect_err("wrong type");
        assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");
        assert_eq!(controller.phase(), UploadPhase::Idle);

        controller
            .accept_file(FileSlot::Steps, json_file("ok.json", "[1, 2]"))
            .expect("accept");
        assert!(controller.can_advance());
        assert_eq!(controller.phase(), UploadPhase::StepsLoaded);
    }

    #[test]
    fn rejected_replacement_keeps_the_previous_document() {
        let mut controller = UploadController::new();
        controller
            .accept_file(FileSlot::Steps, json_file("first.json", r#"{"x": 1}"#))
            .expect("accept");
        let _ = controller.accept_file(FileSlot::Steps, json_file("second.json", "nope"));
        assert_eq!(controller.steps_content(), Some(&json!({"x": 1})));
    }

    #[test]
    fn scribe_requires_pdf_and_is_optional() {
        let mut controller = UploadController::new();
        let err = controller
            .accept_file(
                FileSlot::Scribe,
                IncomingFile::new("scan.png", Some("image/png".to_string()), vec![1, 2]),
            )
            .expect_err("png is not pdf");
        assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");

        let summary = controller
            .accept_file(
                FileSlot::Scribe,
                IncomingFile::new("scan.pdf", None, b"%PDF-1.4".to_vec()),
            )
            .expect("pdf accepted");
        assert_eq!(summary.size, 8);
        assert!(!controller.can_advance());
        assert!(!controller.view().scribe_optional_note);
    }

    #[test]
    fn clicking_a_container_toggles_without_opening_the_dialog() {
        let mut controller = loaded();
        let outcome = controller.click(&NodePath::from("b")).expect("click");
        assert!(matches!(outcome, ClickOutcome::Toggled { expanded: false, .. }));
        assert!(controller.dialog().is_none());
        let paths: Vec<String> = controller
            .tree_rows()
            .expect("rows")
            .into_iter()
            .map(|row| row.path)
            .collect();
        assert_eq!(paths, vec!["", "a", "b"]);
    }

    #[test]
    fn reopening_the_dialog_never_leaks_unsaved_edits() {
        let mut controller = loaded();
        let path_b = NodePath::from("b.c");

        controller.click(&path_b).expect("open b.c");
        controller
            .edit_dialog(DialogEdit::Instructions("greeting".to_string()))
            .expect("edit instructions");
        controller.save_dialog().expect("save instructions");
        controller.click(&path_b).expect("reopen b.c");
        for edit in [
            DialogEdit::Tab(DialogTab::Restrictions),
            DialogEdit::Min("2".to_string()),
            DialogEdit::Max("8".to_string()),
        ] {
            controller.edit_dialog(edit).expect("edit restriction");
        }
        controller.save_dialog().expect("save restriction");

        controller.click(&NodePath::from("a")).expect("open a");
        for edit in [
            DialogEdit::Instructions("unsaved draft".to_string()),
            DialogEdit::Tab(DialogTab::Restrictions),
            DialogEdit::Kind(RestrictionKind::Enum),
            DialogEdit::ValidValues("x, y".to_string()),
        ] {
            controller.edit_dialog(edit).expect("edit a");
        }
        controller.close_dialog();

        controller.click(&path_b).expect("open b.c again");
        let view = controller.dialog().expect("dialog open").view();
        assert_eq!(view.path, "b.c");
        assert_eq!(view.active_tab, DialogTab::Instructions);
        assert_eq!(view.instructions, "greeting");
        assert_eq!(view.kind, RestrictionKind::String);
        assert_eq!(view.min, "2");
        assert_eq!(view.max, "8");
        assert_eq!(view.valid_values, "");

        controller.close_dialog();
        controller.click(&NodePath::from("a")).expect("reopen a");
        let view = controller.dialog().expect("dialog").view();
        assert_eq!(view.instructions, "");
        assert_eq!(view.kind, RestrictionKind::Number);
        assert!(!controller.metadata().contains(&NodePath::from("a")));
    }

    #[test]
    fn invalid_restriction_keeps_the_dialog_open() {
        let mut controller = loaded();
        controller.click(&NodePath::from("a")).expect("open");
        controller
            .edit_dialog(DialogEdit::Tab(DialogTab::Restrictions))
            .expect("tab");
        controller
            .edit_dialog(DialogEdit::Kind(RestrictionKind::Enum))
            .expect("kind");
        assert!(controller.save_dialog().is_err());
        assert!(controller.dialog().is_some());
        assert!(controller.metadata().is_empty());
    }

    #[test]
    fn submit_without_document_fails_fast() {
        let mut controller = UploadController::new();
        assert!(matches!(controller.begin_submit(), Err(AppError::MissingSteps)));
        assert_eq!(controller.phase(), UploadPhase::Idle);
    }

    #[test]
    fn second_submit_is_refused_while_one_is_in_flight() {
        let mut controller = loaded();
        let first = controller.begin_submit().expect("first submit");
        assert_eq!(controller.phase(), UploadPhase::Submitting);
        assert!(matches!(controller.begin_submit(), Err(AppError::InvalidState(_))));

        controller.finish_submit(Uuid::new_v4(), true);
        assert_eq!(controller.phase(), UploadPhase::Submitting);

        controller.finish_submit(first.submission_id, false);
        assert_eq!(controller.phase(), UploadPhase::TreeView);
    }

    #[test]
    fn failed_submit_preserves_state_and_success_resets_it() {
        let mut controller = loaded();
        controller.click(&NodePath::from("b.c")).expect("open");
        controller
            .edit_dialog(DialogEdit::Tab(DialogTab::Restrictions))
            .expect("tab");
        controller.save_dialog().expect("save");

        let payload = controller.begin_submit().expect("submit");
        assert_eq!(
            serde_json::from_str::<Value>(&payload.steps_json).expect("steps json"),
            json!({"a": 1, "b": {"c": "hello"}})
        );
        assert!(payload.scribe.is_none());
        controller.finish_submit(payload.submission_id, false);
        assert_eq!(controller.phase(), UploadPhase::TreeView);
        assert_eq!(
            controller
                .metadata()
                .get(&NodePath::from("b.c"))
                .and_then(|note| note.restrictions.clone()),
            Some(Restriction::empty(RestrictionKind::String))
        );

        let retry = controller.begin_submit().expect("retry");
        controller.finish_submit(retry.submission_id, true);
        assert_eq!(controller.phase(), UploadPhase::Idle);
        assert!(controller.metadata().is_empty());
        assert!(controller.steps_content().is_none());
        assert!(controller.view().scribe.is_none());
    }
}
