//! Environment-aware multipart form construction.
//!
//! Upload endpoints need a `multipart/form-data` body that works both on native
//! targets, where the builder computes the boundary and hands back an explicit
//! `Content-Type` header, and in the browser (`wasm32`), where the platform form
//! data object is sent as-is and the transport derives the header itself.
//!
//! [`FormPayload`] hides that difference: callers append fields and merge
//! [`FormPayload::headers`] into the outgoing request without ever checking
//! which [`Environment`] the payload was built for.
//!
//! ```ignore
//! let mut form = FormPayload::new(Environment::detect())?;
//! form.text("title", "March retainer")
//!     .append_json("items", &items)?
//!     .append("invoice_date", invoice_date)?
//!     .append("logo", FileInput::blob(png, "logo.png"))?;
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::Result;
use crate::utils::date_format::format_timestamp;

/// Size of the chunks a file part is streamed in when progress is reported.
#[cfg(not(target_arch = "wasm32"))]
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// The runtime the crate was built for, which decides the multipart primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Native targets. The form computes its own boundary header.
    Server,
    /// `wasm32` targets. The browser computes the boundary header when sending.
    Browser,
}

impl Environment {
    /// Detects the current environment. Defaults to [`Environment::Server`]
    /// unless compiled for a browser-like `wasm32` target.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Browser
        } else {
            Self::Server
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Browser => write!(f, "browser"),
        }
    }
}

/// Progress of an upload, reported as the body is handed to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes of file data sent so far.
    pub loaded: u64,
    /// Total size of the file data, if known.
    pub total: Option<u64>,
}

/// Callback invoked zero or more times while an upload is in flight.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// A file supplied to an upload endpoint.
///
/// The SDK does not convert between the two representations; pass whichever
/// one your runtime has at hand. Blob contents are reference counted, so
/// cloning a `FileInput` never copies the file.
#[derive(Clone, PartialEq, Eq)]
pub enum FileInput {
    /// Raw file contents, sent as a binary part.
    Blob {
        data: Bytes,
        file_name: String,
        mime: Option<String>,
    },
    /// A string reference to a file the server can resolve (e.g. an uploaded URL),
    /// sent as a plain text field.
    Reference(String),
}

impl FileInput {
    /// Creates a binary file input.
    #[must_use]
    pub fn blob(data: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self::Blob {
            data: data.into(),
            file_name: file_name.into(),
            mime: None,
        }
    }

    /// Creates a reference file input.
    #[must_use]
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Reference(reference.into())
    }

    /// Returns `true` for a reference with no text. Such an input names no file
    /// and required-file checks treat it as missing. A zero-length blob is
    /// still a file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Reference(reference) if reference.is_empty())
    }

    /// Sets the MIME type of a binary file input. Has no effect on references.
    #[must_use]
    pub fn with_mime(self, mime_type: impl Into<String>) -> Self {
        match self {
            Self::Blob {
                data, file_name, ..
            } => Self::Blob {
                data,
                file_name,
                mime: Some(mime_type.into()),
            },
            reference @ Self::Reference(_) => reference,
        }
    }

    /// Reads a local file into a binary file input named after the file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::blob(data, file_name))
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob {
                data,
                file_name,
                mime,
            } => f
                .debug_struct("Blob")
                .field("file_name", file_name)
                .field("mime", mime)
                .field("size", &data.len())
                .finish(),
            Self::Reference(reference) => f.debug_tuple("Reference").field(reference).finish(),
        }
    }
}

/// The closed set of value shapes a form field can take.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Sent verbatim.
    Text(String),
    /// Sent as a UTC timestamp with millisecond precision.
    Date(OffsetDateTime),
    /// A nested record or list, sent as a single JSON string field.
    Json(serde_json::Value),
    /// A binary part or a reference, see [`FileInput`].
    File(FileInput),
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<OffsetDateTime> for FormValue {
    fn from(value: OffsetDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<FileInput> for FormValue {
    fn from(value: FileInput) -> Self {
        Self::File(value)
    }
}

/// What was appended under a field name, as recorded by [`FormPayload::fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text(String),
    File { file_name: String, size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
}

/// The capability every environment's multipart container provides.
pub trait MultipartForm {
    /// The environment this container was built for.
    fn environment(&self) -> Environment;

    fn append_text(&mut self, name: String, value: String);

    fn append_part(&mut self, name: String, part: Part);

    /// Headers that must accompany the body. Empty when the transport derives them.
    fn headers(&self) -> HeaderMap;

    fn into_form(self: Box<Self>) -> Form;
}

#[cfg(not(target_arch = "wasm32"))]
type BoxedForm = Box<dyn MultipartForm + Send>;
#[cfg(target_arch = "wasm32")]
type BoxedForm = Box<dyn MultipartForm>;

/// Server-side container: the boundary is known up front and declared explicitly.
#[cfg(not(target_arch = "wasm32"))]
pub struct ServerForm {
    form: Form,
    content_type: HeaderValue,
}

#[cfg(not(target_arch = "wasm32"))]
impl ServerForm {
    pub fn new() -> Result<Self> {
        let form = Form::new();
        let content_type =
            HeaderValue::from_str(&format!("multipart/form-data; boundary={}", form.boundary()))?;
        Ok(Self { form, content_type })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MultipartForm for ServerForm {
    fn environment(&self) -> Environment {
        Environment::Server
    }

    fn append_text(&mut self, name: String, value: String) {
        // The boundary belongs to the original form, so it is threaded through.
        let form = std::mem::replace(&mut self.form, Form::new());
        self.form = form.text(name, value);
    }

    fn append_part(&mut self, name: String, part: Part) {
        let form = std::mem::replace(&mut self.form, Form::new());
        self.form = form.part(name, part);
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, self.content_type.clone());
        headers
    }

    fn into_form(self: Box<Self>) -> Form {
        self.form
    }
}

/// Browser-side container: the platform form data object, whose content type the
/// transport fills in when the request is sent.
pub struct BrowserForm {
    form: Form,
}

impl BrowserForm {
    #[must_use]
    pub fn new() -> Self {
        Self { form: Form::new() }
    }
}

impl Default for BrowserForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm for BrowserForm {
    fn environment(&self) -> Environment {
        Environment::Browser
    }

    fn append_text(&mut self, name: String, value: String) {
        let form = std::mem::replace(&mut self.form, Form::new());
        self.form = form.text(name, value);
    }

    fn append_part(&mut self, name: String, part: Part) {
        let form = std::mem::replace(&mut self.form, Form::new());
        self.form = form.part(name, part);
    }

    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    fn into_form(self: Box<Self>) -> Form {
        self.form
    }
}

/// A multipart body under construction, plus the headers that must travel with it.
///
/// Built fresh for every request and consumed when the request is sent.
pub struct FormPayload {
    inner: BoxedForm,
    fields: Vec<FormField>,
    progress: Option<ProgressCallback>,
}

impl FormPayload {
    /// Creates an empty payload for the given environment.
    ///
    /// Fails with [`crate::Error::MultipartUnavailable`] if that environment's multipart
    /// primitive does not exist on this target. There is no fallback.
    pub fn new(environment: Environment) -> Result<Self> {
        let inner: BoxedForm = match environment {
            #[cfg(not(target_arch = "wasm32"))]
            Environment::Server => Box::new(ServerForm::new()?),
            #[cfg(target_arch = "wasm32")]
            Environment::Server => {
                return Err(crate::error::Error::MultipartUnavailable { environment });
            }
            Environment::Browser => Box::new(BrowserForm::new()),
        };
        trace!(%environment, "created multipart payload");
        Ok(Self {
            inner,
            fields: Vec::new(),
            progress: None,
        })
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.inner.environment()
    }

    /// Reports upload progress for file parts appended after this call.
    #[must_use]
    pub fn with_progress(mut self, progress: Option<ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Appends a field, serializing it according to its [`FormValue`] shape.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Result<&mut Self> {
        let name = name.into();
        match value.into() {
            FormValue::Text(text) => self.push_text(name, text),
            FormValue::Date(datetime) => {
                let formatted = format_timestamp(datetime)?;
                self.push_text(name, formatted);
            }
            FormValue::Json(json) => {
                let encoded = serde_json::to_string(&json)?;
                self.push_text(name, encoded);
            }
            FormValue::File(FileInput::Reference(reference)) => self.push_text(name, reference),
            FormValue::File(FileInput::Blob {
                data,
                file_name,
                mime,
            }) => {
                let size = data.len() as u64;
                let part = file_part(data, file_name.clone(), mime, self.progress.as_ref())?;
                self.inner.append_part(name.clone(), part);
                self.fields.push(FormField {
                    name,
                    kind: FieldKind::File { file_name, size },
                });
            }
        }
        Ok(self)
    }

    /// Appends a field only when a value is present. Absent values are omitted
    /// rather than sent as empty strings.
    pub fn append_opt<V: Into<FormValue>>(
        &mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Result<&mut Self> {
        match value {
            Some(value) => self.append(name, value),
            None => Ok(self),
        }
    }

    /// Appends a scalar using its textual representation.
    pub fn text(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.push_text(name.into(), value.to_string());
        self
    }

    /// Appends a scalar only when present.
    pub fn text_opt<V: ToString>(&mut self, name: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push_text(name.into(), value.to_string());
        }
        self
    }

    /// Appends a nested record or list as a single JSON string field.
    pub fn append_json<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self> {
        let encoded = serde_json::to_string(value)?;
        self.push_text(name.into(), encoded);
        Ok(self)
    }

    /// Appends a list of scalars as indexed fields: `name[0]`, `name[1]`, ...
    pub fn append_indexed<I>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.push_text(format!("{name}[{index}]"), value.to_string());
        }
        self
    }

    /// The headers that must be merged into the request carrying this payload.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        self.inner.headers()
    }

    /// Every field appended so far, in order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// The first field appended under `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.kind)
    }

    /// Splits the payload into the body and its headers for sending.
    pub(crate) fn into_parts(self) -> (Form, HeaderMap) {
        let headers = self.inner.headers();
        (self.inner.into_form(), headers)
    }

    fn push_text(&mut self, name: String, value: String) {
        self.inner.append_text(name.clone(), value.clone());
        self.fields.push(FormField {
            name,
            kind: FieldKind::Text(value),
        });
    }
}

impl fmt::Debug for FormPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormPayload")
            .field("environment", &self.environment())
            .field("fields", &self.fields)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

fn file_part(
    data: Bytes,
    file_name: String,
    mime: Option<String>,
    progress: Option<&ProgressCallback>,
) -> Result<Part> {
    let part = match progress {
        #[cfg(not(target_arch = "wasm32"))]
        Some(progress) => {
            let total = data.len() as u64;
            Part::stream_with_length(progress_body(data, Arc::clone(progress)), total)
        }
        // The browser form data object is sent whole, so progress is reported once.
        #[cfg(target_arch = "wasm32")]
        Some(progress) => {
            let total = data.len() as u64;
            progress(UploadProgress {
                loaded: total,
                total: Some(total),
            });
            Part::bytes(data.to_vec())
        }
        #[cfg(not(target_arch = "wasm32"))]
        None => {
            let total = data.len() as u64;
            Part::stream_with_length(data, total)
        }
        #[cfg(target_arch = "wasm32")]
        None => Part::bytes(data.to_vec()),
    };
    let part = part.file_name(file_name);
    match mime {
        Some(mime) => Ok(part.mime_str(&mime)?),
        None => Ok(part),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn progress_body(data: Bytes, progress: ProgressCallback) -> reqwest::Body {
    use futures::stream::{self, StreamExt};

    let total = data.len() as u64;
    let chunks = upload_chunks(&data);
    let mut loaded = 0u64;
    let stream = stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        progress(UploadProgress {
            loaded,
            total: Some(total),
        });
        Ok::<_, std::io::Error>(chunk)
    });
    reqwest::Body::wrap_stream(stream)
}

/// Splits a file into upload chunks. Slices share the buffer; nothing is copied.
#[cfg(not(target_arch = "wasm32"))]
fn upload_chunks(data: &Bytes) -> Vec<Bytes> {
    (0..data.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..data.len().min(start + UPLOAD_CHUNK_SIZE)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn detects_server_on_native_targets() {
        assert_eq!(Environment::detect(), Environment::Server);
    }

    #[test]
    fn server_form_declares_its_boundary() {
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        payload.text("name", "Acme");
        let (form, headers) = payload.into_parts();
        let content_type = headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
        assert_eq!(
            content_type,
            format!("multipart/form-data; boundary={}", form.boundary())
        );
    }

    #[test]
    fn browser_form_leaves_headers_to_the_transport() {
        let mut payload = FormPayload::new(Environment::Browser).unwrap();
        payload.text("name", "Acme");
        assert_eq!(payload.environment(), Environment::Browser);
        assert!(payload.headers().is_empty());
    }

    #[test]
    fn both_environments_record_the_same_fields() {
        let build = |environment| {
            let mut payload = FormPayload::new(environment).unwrap();
            payload
                .text("title", "Retainer")
                .append_indexed("sector", ["product", "service"]);
            payload
                .append("file", FileInput::blob(vec![1, 2, 3], "a.pdf"))
                .unwrap();
            payload.fields().to_vec()
        };
        assert_eq!(build(Environment::Server), build(Environment::Browser));
    }

    #[test]
    fn json_fields_round_trip() {
        let items = json!([{ "title": "Design", "quantity": 2, "rate": 150.5 }]);
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        payload.append_json("items", &items).unwrap();
        payload.append("customer", json!({ "name": "Jane" })).unwrap();

        let Some(FieldKind::Text(encoded)) = payload.field("items") else {
            panic!("items should be a text field");
        };
        let decoded: serde_json::Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(decoded, items);

        let Some(FieldKind::Text(encoded)) = payload.field("customer") else {
            panic!("customer should be a text field");
        };
        assert_eq!(encoded, r#"{"name":"Jane"}"#);
    }

    #[test]
    fn dates_are_normalized() {
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        payload
            .append("invoice_date", datetime!(2025-04-01 12:00 +02:00))
            .unwrap();
        assert_eq!(
            payload.field("invoice_date"),
            Some(&FieldKind::Text("2025-04-01T10:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        payload
            .append_opt("logo", None::<FileInput>)
            .unwrap()
            .text_opt("zip_code", None::<String>)
            .text_opt("state", Some("Dubai"));
        assert_eq!(payload.fields().len(), 1);
        assert!(payload.field("logo").is_none());
    }

    #[test]
    fn references_are_sent_as_text() {
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        payload
            .append("license", FileInput::reference("https://cdn.example.com/l.pdf"))
            .unwrap();
        assert_eq!(
            payload.field("license"),
            Some(&FieldKind::Text("https://cdn.example.com/l.pdf".to_string()))
        );
    }

    #[test]
    fn invalid_mime_is_rejected() {
        let mut payload = FormPayload::new(Environment::Server).unwrap();
        let file = FileInput::blob(vec![0u8; 4], "x.bin").with_mime("not a mime");
        assert!(payload.append("file", file).is_err());
    }

    #[test]
    fn only_blank_references_count_as_empty() {
        assert!(FileInput::reference("").is_empty());
        assert!(!FileInput::reference("https://cdn.example.com/c.jpg").is_empty());
        assert!(!FileInput::blob(Vec::new(), "empty.csv").is_empty());
    }

    #[test]
    fn clones_share_blob_contents() {
        let file = FileInput::blob(vec![1u8; 1024], "statement.csv");
        let copy = file.clone();
        let (FileInput::Blob { data: a, .. }, FileInput::Blob { data: b, .. }) = (&file, &copy) else {
            panic!("both inputs are blobs");
        };
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn upload_chunks_slice_without_copying() {
        let data = Bytes::from(vec![7u8; UPLOAD_CHUNK_SIZE * 2 + 10]);
        let chunks = upload_chunks(&data);

        let sizes: Vec<usize> = chunks.iter().map(Bytes::len).collect();
        assert_eq!(sizes, [UPLOAD_CHUNK_SIZE, UPLOAD_CHUNK_SIZE, 10]);
        assert_eq!(chunks[1].as_ptr(), data[UPLOAD_CHUNK_SIZE..].as_ptr());
        assert_eq!(chunks.concat(), data.to_vec());
        assert!(upload_chunks(&Bytes::new()).is_empty());
    }

    #[test]
    fn file_input_debug_hides_contents() {
        let file = FileInput::blob(vec![7u8; 2048], "statement.csv");
        let debug = format!("{file:?}");
        assert!(debug.contains("statement.csv"));
        assert!(debug.contains("2048"));
        assert!(!debug.contains("7, 7"));
    }
}
