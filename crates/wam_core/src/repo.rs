//! Repository handle providing the main WAM API.

use crate::aggregator::Aggregator;
use crate::config::{Backend, Config};
use crate::correlator::Correlator;
use crate::error::{Result, WamError};
use crate::locks::NamedLocks;
use crate::presenter::{NoopPresenter, Presenter};
use crate::redb_store::RedbStore;
use crate::repository::Repository;
use crate::storage::Storage;
use crate::store::{KvStore, MemoryStore};
use crate::{IdGenerator, SystemClock, TimeProvider, UuidGenerator};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};
use tracing::debug;

/// Name of the repository directory.
pub const WAM_DIR: &str = ".wam";

/// Lock registries of live stores, keyed by store address.
static LOCK_REGISTRIES: OnceLock<Mutex<HashMap<usize, Weak<NamedLocks>>>> = OnceLock::new();

/// Returns the lock registry of `store`, shared by every handle over it.
fn shared_locks(store: &Arc<dyn KvStore>) -> Arc<NamedLocks> {
    let addr = Arc::as_ptr(store) as *const () as usize;
    let mut registries = LOCK_REGISTRIES.get_or_init(Default::default).lock();
    registries.retain(|_, locks| locks.strong_count() > 0);

    if let Some(locks) = registries.get(&addr).and_then(Weak::upgrade) {
        return locks;
    }
    let locks = Arc::new(NamedLocks::new());
    registries.insert(addr, Arc::downgrade(&locks));
    locks
}

/// WAM repository handle.
///
/// Owns the store and the shared lock registry, and hands out the components
/// that operate on them. Every component obtained from one handle shares the
/// same locks, so they may be used from any number of threads.
pub struct WamRepo {
    /// Root directory containing the repository (parent of `.wam`).
    root: Option<PathBuf>,
    config: Config,
    storage: Storage,
    locks: Arc<NamedLocks>,
    presenter: Arc<dyn Presenter>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn TimeProvider>,
}

impl WamRepo {
    /// Opens an existing WAM repository.
    ///
    /// # Errors
    ///
    /// Returns `NotARepository` if the `.wam` directory doesn't exist, a
    /// configuration error for an unreadable config, or a storage error if
    /// the database is held by another process.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wam_core::WamRepo;
    ///
    /// let repo = WamRepo::open(".").unwrap();
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let wam_dir = root.join(WAM_DIR);

        if !wam_dir.is_dir() {
            return Err(WamError::NotARepository(root));
        }

        let config = Config::load(&wam_dir)?;
        let store: Arc<dyn KvStore> = match config.storage.backend {
            Backend::Redb => Arc::new(RedbStore::open(wam_dir.join(&config.storage.file))?),
            Backend::Memory => Arc::new(MemoryStore::new()),
        };
        debug!(root = %root.display(), backend = ?config.storage.backend, "opened repository");

        Ok(Self::assemble(Some(root), config, store))
    }

    /// Initializes a new WAM repository.
    ///
    /// Creates `.wam/` with a default `config.toml` and a `.gitignore` for
    /// the database, then opens it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if `.wam` exists, or any I/O error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wam_core::WamRepo;
    ///
    /// let repo = WamRepo::init(".").unwrap();
    /// ```
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let wam_dir = root.join(WAM_DIR);

        if wam_dir.exists() {
            return Err(WamError::AlreadyInitialized(root));
        }

        fs::create_dir_all(&wam_dir)?;
        let config = Config::default();
        config.save(&wam_dir)?;

        let gitignore = format!(
            "# WAM capture database\n{}\n*.tmp\n",
            config.storage.file
        );
        fs::write(wam_dir.join(".gitignore"), gitignore)?;

        Self::open(root)
    }

    /// Creates a repository backed by process memory, with no directory.
    pub fn in_memory() -> Self {
        Self::assemble(None, Config::default(), Arc::new(MemoryStore::new()))
    }

    /// Creates a repository over any store.
    ///
    /// Handles created over the same `Arc` share one lock registry, so they
    /// exclude each other like components of a single handle.
    pub fn with_store(store: Arc<dyn KvStore>) -> Self {
        Self::assemble(None, Config::default(), store)
    }

    fn assemble(root: Option<PathBuf>, config: Config, store: Arc<dyn KvStore>) -> Self {
        Self {
            root,
            config,
            locks: shared_locks(&store),
            storage: Storage::new(store),
            presenter: Arc::new(NoopPresenter),
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets a custom request id source, for deterministic tests.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Sets a custom time provider for testing.
    pub fn with_time_provider(mut self, clock: impl TimeProvider + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Routes change notifications to `presenter`.
    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Returns the repository root (parent of `.wam`), if on disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Returns the `.wam` directory path, if on disk.
    pub fn wam_dir(&self) -> Option<PathBuf> {
        self.root.as_ref().map(|r| r.join(WAM_DIR))
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record-level API over this repository's store.
    pub fn repository(&self) -> Repository {
        Repository::new(
            self.storage.clone(),
            Arc::clone(&self.locks),
            Arc::clone(&self.presenter),
        )
    }

    /// Page aggregator sharing this repository's locks.
    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.repository())
    }

    /// Lifecycle event correlator.
    pub fn correlator(&self) -> Correlator {
        let repo = self.repository();
        Correlator::new(
            repo.clone(),
            Aggregator::new(repo),
            Arc::clone(&self.ids),
            Arc::clone(&self.clock),
        )
    }
}
