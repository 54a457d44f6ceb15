//! Project orchestrator
//!
//! A [`Project`] ties one requester to the project-level state derived from
//! it: the data dictionary, the export field map, and the remote version.
//! Each is fetched lazily on first access, cached, and replaceable through
//! an explicit setter so tests can inject fixtures in place of live calls.

use crate::adapters::redcap::{HttpRequester, Requester};
use crate::config::RedsyncConfig;
use crate::core::download::ChunkedDownloader;
use crate::core::resolver::FieldResolver;
use crate::domain::{DataDictionary, ExportFieldMap, Record, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A `records` or `fields` argument at the call boundary
///
/// The wire format wants one comma-separated string; callers may already
/// hold that string or still have a list of identifiers. The two cases are
/// kept distinct instead of sniffing for commas at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireList {
    /// Already in wire form; passed through unchanged
    Raw(String),

    /// Identifiers to join comma-separated
    Items(Vec<String>),
}

impl WireList {
    /// The comma-separated wire representation
    pub fn to_wire(&self) -> String {
        match self {
            WireList::Raw(s) => s.clone(),
            WireList::Items(items) => items.join(","),
        }
    }
}

impl From<&str> for WireList {
    fn from(s: &str) -> Self {
        WireList::Raw(s.to_string())
    }
}

impl From<Vec<String>> for WireList {
    fn from(items: Vec<String>) -> Self {
        WireList::Items(items)
    }
}

impl From<Vec<&str>> for WireList {
    fn from(items: Vec<&str>) -> Self {
        WireList::Items(items.into_iter().map(str::to_string).collect())
    }
}

/// One REDCap project: a requester plus the cached state derived from it
///
/// The requester is a shared collaborator; the caches are exclusively owned
/// here. Rebuilding a cache replaces it atomically via its setter.
pub struct Project {
    requester: Arc<dyn Requester>,
    metadata: Option<DataDictionary>,
    resolver: Option<FieldResolver>,
    remote_version: Option<String>,
}

impl Project {
    /// Create a project around an existing requester
    pub fn new(requester: Arc<dyn Requester>) -> Self {
        Self {
            requester,
            metadata: None,
            resolver: None,
            remote_version: None,
        }
    }

    /// Create a project from configuration, building an HTTP requester
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the requester cannot be built.
    pub fn from_config(config: &RedsyncConfig) -> Result<Self> {
        let requester = HttpRequester::new(&config.api)?;
        Ok(Self::new(Arc::new(requester)))
    }

    /// The shared requester
    pub fn requester(&self) -> &Arc<dyn Requester> {
        &self.requester
    }

    /// The project's data dictionary, fetched on first access
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the metadata fetch fails.
    pub async fn metadata(&mut self) -> Result<&DataDictionary> {
        let dictionary = match self.metadata.take() {
            Some(cached) => cached,
            None => {
                tracing::debug!("Fetching project metadata");
                DataDictionary::new(self.requester.metadata().await?)
            }
        };
        Ok(self.metadata.insert(dictionary))
    }

    /// Replace the cached data dictionary (fixture injection)
    pub fn set_metadata(&mut self, metadata: DataDictionary) {
        self.metadata = Some(metadata);
    }

    /// The export field map, built from descriptors on first access
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the descriptor fetch fails.
    pub async fn export_field_map(&mut self) -> Result<&ExportFieldMap> {
        Ok(self.field_resolver().await?.map())
    }

    /// Replace the cached export field map (fixture injection)
    pub fn set_export_field_map(&mut self, map: ExportFieldMap) {
        self.resolver = Some(FieldResolver::from_map(map));
    }

    /// The remote server's version string, fetched on first access
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the version fetch fails.
    pub async fn version(&mut self) -> Result<&str> {
        let version = match self.remote_version.take() {
            Some(cached) => cached,
            None => self.requester.version().await?,
        };
        Ok(self.remote_version.insert(version).as_str())
    }

    /// Replace the cached version string (fixture injection)
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.remote_version = Some(version.into());
    }

    /// Single-shot record export, bypassing the chunked downloader
    ///
    /// This is the unbounded path for id sets known to be small; use
    /// [`Project::downloader`] for large sets. `records` and `fields` are
    /// joined into wire form; `extra` parameters are merged last so callers
    /// can override defaults.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the request fails.
    pub async fn get_records(
        &self,
        records: Option<WireList>,
        fields: Option<WireList>,
        extra: &BTreeMap<String, String>,
    ) -> Result<Value> {
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), "record".to_string());
        if let Some(records) = records {
            payload.insert("records".to_string(), records.to_wire());
        }
        if let Some(fields) = fields {
            payload.insert("fields".to_string(), fields.to_wire());
        }
        for (key, value) in extra {
            payload.insert(key.clone(), value.clone());
        }

        self.requester.post(&payload).await
    }

    /// Export names behind a checkbox field
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for a field with no exported variants, or an
    /// `Api` error if the descriptor fetch fails.
    pub async fn cbnames(&mut self, field_name: &str) -> Result<Vec<String>> {
        Ok(self
            .field_resolver()
            .await?
            .export_names(field_name)?
            .to_vec())
    }

    /// Whether any choice of `field_name` is endorsed in `record`
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for a field with no exported variants,
    /// `DataShape` for a malformed flag value, or an `Api` error if the
    /// descriptor fetch fails.
    pub async fn any_endorsed(&mut self, record: &Record, field_name: &str) -> Result<bool> {
        self.field_resolver()
            .await?
            .any_endorsed(record, field_name)
    }

    /// Build a chunked downloader sharing this project's requester
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `chunk_size` is zero.
    pub fn downloader(
        &self,
        chunk_size: usize,
        extra_params: &BTreeMap<String, String>,
    ) -> Result<ChunkedDownloader> {
        ChunkedDownloader::new(self.requester.clone(), chunk_size, extra_params)
    }

    async fn field_resolver(&mut self) -> Result<&FieldResolver> {
        let resolver = match self.resolver.take() {
            Some(cached) => cached,
            None => {
                tracing::debug!("Fetching export field names");
                let descriptors = self.requester.export_field_names().await?;
                FieldResolver::build(&descriptors)
            }
        };
        Ok(self.resolver.insert(resolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDescriptor, MetadataField, RecordSet, RedsyncError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Counts fetches and records posted payloads
    struct CountingRequester {
        metadata_calls: AtomicUsize,
        descriptor_calls: AtomicUsize,
        version_calls: AtomicUsize,
        posts: Mutex<Vec<BTreeMap<String, String>>>,
    }

    impl CountingRequester {
        fn new() -> Self {
            Self {
                metadata_calls: AtomicUsize::new(0),
                descriptor_calls: AtomicUsize::new(0),
                version_calls: AtomicUsize::new(0),
                posts: Mutex::new(Vec::new()),
            }
        }

        fn last_post(&self) -> BTreeMap<String, String> {
            self.posts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Requester for CountingRequester {
        async fn post(&self, payload: &BTreeMap<String, String>) -> Result<Value> {
            self.posts.lock().unwrap().push(payload.clone());
            Ok(json!([]))
        }

        async fn metadata(&self) -> Result<Vec<MetadataField>> {
            self.metadata_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![MetadataField {
                field_name: "record_id".to_string(),
                form_name: "baseline".to_string(),
                field_type: "text".to_string(),
                field_label: String::new(),
                select_choices_or_calculations: String::new(),
                text_validation_type_or_show_slider_number: String::new(),
                required_field: String::new(),
            }])
        }

        async fn export_field_names(&self) -> Result<Vec<FieldDescriptor>> {
            self.descriptor_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                FieldDescriptor::new("record_id", "", "record_id"),
                FieldDescriptor::new("meds", "1", "meds___1"),
                FieldDescriptor::new("meds", "2", "meds___2"),
            ])
        }

        async fn version(&self) -> Result<String> {
            self.version_calls.fetch_add(1, Ordering::SeqCst);
            Ok("14.5.10".to_string())
        }
    }

    #[tokio::test]
    async fn test_metadata_fetched_once_and_cached() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester.clone());

        assert_eq!(project.metadata().await.unwrap().len(), 1);
        assert_eq!(project.metadata().await.unwrap().len(), 1);

        assert_eq!(requester.metadata_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_injected_metadata_skips_fetch() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester.clone());

        project.set_metadata(DataDictionary::default());
        assert!(project.metadata().await.unwrap().is_empty());

        assert_eq!(requester.metadata_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_export_field_map_fetched_once() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester.clone());

        assert!(project.export_field_map().await.unwrap().contains("meds"));
        assert!(project.export_field_map().await.unwrap().contains("meds"));

        assert_eq!(requester.descriptor_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_version_cached_and_injectable() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester.clone());

        assert_eq!(project.version().await.unwrap(), "14.5.10");
        assert_eq!(project.version().await.unwrap(), "14.5.10");
        assert_eq!(requester.version_calls.load(Ordering::SeqCst), 1);

        project.set_version("13.0.0");
        assert_eq!(project.version().await.unwrap(), "13.0.0");
        assert_eq!(requester.version_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cbnames_delegates_to_resolver() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester);

        assert_eq!(
            project.cbnames("meds").await.unwrap(),
            vec!["meds___1", "meds___2"]
        );

        let err = project.cbnames("record_id").await.unwrap_err();
        assert!(matches!(err, RedsyncError::UnknownField(_)));
    }

    #[tokio::test]
    async fn test_any_endorsed_uses_cached_map() {
        let requester = Arc::new(CountingRequester::new());
        let mut project = Project::new(requester.clone());

        let set = RecordSet::from_value(json!([{"meds___1": "0", "meds___2": "1"}])).unwrap();
        let record = set.iter().next().unwrap().clone();

        assert!(project.any_endorsed(&record, "meds").await.unwrap());
        assert!(project.any_endorsed(&record, "meds").await.unwrap());
        assert_eq!(requester.descriptor_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_records_joins_collections() {
        let requester = Arc::new(CountingRequester::new());
        let project = Project::new(requester.clone());

        project
            .get_records(
                Some(WireList::from(vec!["1", "2", "3"])),
                Some(WireList::from(vec!["record_id", "meds"])),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        let payload = requester.last_post();
        assert_eq!(payload.get("content").map(String::as_str), Some("record"));
        assert_eq!(payload.get("records").map(String::as_str), Some("1,2,3"));
        assert_eq!(
            payload.get("fields").map(String::as_str),
            Some("record_id,meds")
        );
    }

    #[tokio::test]
    async fn test_get_records_passes_raw_strings_through() {
        let requester = Arc::new(CountingRequester::new());
        let project = Project::new(requester.clone());

        project
            .get_records(Some(WireList::from("1,2,3")), None, &BTreeMap::new())
            .await
            .unwrap();

        let payload = requester.last_post();
        assert_eq!(payload.get("records").map(String::as_str), Some("1,2,3"));
        assert!(!payload.contains_key("fields"));
    }

    #[tokio::test]
    async fn test_get_records_extra_params_merge_last() {
        let requester = Arc::new(CountingRequester::new());
        let project = Project::new(requester.clone());

        let mut extra = BTreeMap::new();
        extra.insert("content".to_string(), "report".to_string());
        project.get_records(None, None, &extra).await.unwrap();

        assert_eq!(
            requester.last_post().get("content").map(String::as_str),
            Some("report")
        );
    }

    #[test]
    fn test_wire_list_forms() {
        assert_eq!(WireList::from("a,b").to_wire(), "a,b");
        assert_eq!(WireList::from(vec!["a", "b"]).to_wire(), "a,b");
        assert_eq!(
            WireList::Items(vec!["solo".to_string()]).to_wire(),
            "solo"
        );
    }

    #[test]
    fn test_downloader_shares_requester() {
        let requester = Arc::new(CountingRequester::new());
        let project = Project::new(requester);

        let downloader = project.downloader(25, &BTreeMap::new()).unwrap();
        assert_eq!(downloader.chunk_size(), 25);

        assert!(project.downloader(0, &BTreeMap::new()).is_err());
    }
}
