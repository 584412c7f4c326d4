use time::OffsetDateTime;

use crate::types::UploadedDocument;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("document {0} not found")]
    NotFound(String),
}

/// The user's uploaded documents and the one currently open in the viewer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentLibrary {
    documents: Vec<UploadedDocument>,
    current: Option<String>,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    pub fn get(&self, filename: &str) -> Option<&UploadedDocument> {
        self.documents.iter().find(|doc| doc.filename == filename)
    }

    pub fn current(&self) -> Option<&UploadedDocument> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Adds a freshly uploaded document and opens it.
    pub fn insert(&mut self, document: UploadedDocument) {
        let filename = document.filename.clone();
        match self.documents.iter_mut().find(|doc| doc.filename == filename) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
        self.current = Some(filename);
    }

    pub fn remove(&mut self, filename: &str) -> Option<UploadedDocument> {
        let index = self.documents.iter().position(|doc| doc.filename == filename)?;
        if self.current.as_deref() == Some(filename) {
            self.current = None;
        }
        Some(self.documents.remove(index))
    }

    pub fn select(&mut self, filename: &str) -> Result<(), LibraryError> {
        if self.get(filename).is_none() {
            return Err(LibraryError::NotFound(filename.to_string()));
        }
        self.current = Some(filename.to_string());
        Ok(())
    }

    pub fn close_current(&mut self) {
        self.current = None;
    }

    /// Merges the backend's file listing: unknown names are added without
    /// metadata, names no longer listed are dropped, known entries keep theirs.
    pub fn sync_filenames(&mut self, filenames: &[String]) {
        self.documents
            .retain(|doc| filenames.iter().any(|name| name == &doc.filename));
        for name in filenames {
            if self.get(name).is_none() {
                self.documents.push(UploadedDocument {
                    filename: name.clone(),
                    size_bytes: 0,
                    uploaded_at: OffsetDateTime::now_utc(),
                    preview: None,
                });
            }
        }
        if self.current().is_none() {
            self.current = None;
        }
    }
}
