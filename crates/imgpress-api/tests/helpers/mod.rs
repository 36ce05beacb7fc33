//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgpress-api --test compress_test`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use imgpress_api::setup::routes;
use imgpress_api::state::AppState;
use imgpress_core::Config;
use imgpress_services::{
    EncodingProfile, EntryMetadata, ImageEncoder, KeySnapshot, LocalStorage, OutputFormat,
    Storage, StorageError, StorageResult,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Origin used for response URLs in tests
pub const TEST_PUBLIC_BASE_URL: &str = "http://localhost:5001";

/// Encoder that ignores its input and returns `output_len` bytes.
pub struct FixedSizeEncoder {
    pub output_len: usize,
}

impl ImageEncoder for FixedSizeEncoder {
    fn encode(
        &self,
        _data: &[u8],
        _format: OutputFormat,
        _profile: EncodingProfile,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(vec![0xAB; self.output_len])
    }
}

/// Encoder that always fails, like a decoder given a corrupt file.
pub struct FailingEncoder;

impl ImageEncoder for FailingEncoder {
    fn encode(
        &self,
        _data: &[u8],
        _format: OutputFormat,
        _profile: EncodingProfile,
    ) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("Failed to decode image: corrupt JPEG marker")
    }
}

/// Storage rooted at a real directory that refuses every write.
pub struct ReadOnlyStorage {
    root: PathBuf,
}

impl ReadOnlyStorage {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl Storage for ReadOnlyStorage {
    async fn put_new(&self, key: &str, _data: Bytes) -> StorageResult<()> {
        Err(StorageError::UploadFailed(format!("read-only filesystem: {}", key)))
    }

    async fn list_keys(&self) -> StorageResult<KeySnapshot> {
        Ok(KeySnapshot::default())
    }

    async fn stat(&self, key: &str) -> StorageResult<EntryMetadata> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn Storage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_dir(&self) -> &Path {
        self.storage.root()
    }
}

pub fn create_test_config(storage_dir: &Path) -> Config {
    Config {
        storage_dir: storage_dir.to_path_buf(),
        public_base_url: Some(TEST_PUBLIC_BASE_URL.to_string()),
        max_file_size_bytes: 1024 * 1024,
        retention_sweep_enabled: false,
        ..Config::default()
    }
}

/// Setup test app with a temporary storage directory and the given encoder.
pub async fn setup_test_app(encoder: Arc<dyn ImageEncoder>) -> TestApp {
    setup_test_app_with(encoder, |_| {}).await
}

/// Like [`setup_test_app`], with a hook to adjust the configuration.
pub async fn setup_test_app_with(
    encoder: Arc<dyn ImageEncoder>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let mut config = create_test_config(temp_dir.path());
    configure(&mut config);

    build_test_app(encoder, storage, config, temp_dir).await
}

/// Like [`setup_test_app`], with the storage backend built by `make_storage` over the
/// temporary directory.
pub async fn setup_test_app_with_storage(
    encoder: Arc<dyn ImageEncoder>,
    make_storage: impl FnOnce(&Path) -> Arc<dyn Storage>,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage = make_storage(temp_dir.path());
    let config = create_test_config(temp_dir.path());

    build_test_app(encoder, storage, config, temp_dir).await
}

async fn build_test_app(
    encoder: Arc<dyn ImageEncoder>,
    storage: Arc<dyn Storage>,
    config: Config,
    temp_dir: TempDir,
) -> TestApp {
    let state = Arc::new(AppState::new(config.clone(), storage.clone(), encoder));
    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with a single `image` part.
pub fn image_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part("image", part)
}
