//! A filesystem backed inventory.
//!
//! A warehouse is a directory tree with one YAML document per entity:
//! elements live under a directory per hierarchy kind
//! (`categories/`, `footprints/`, `locations/`, `manufacturers/`,
//! `suppliers/`), parts under `parts/`, each named `<id>.yaml`. The
//! `.inv/config.toml` file marks the root. [`Warehouse`] loads the whole
//! tree into an [`InventoryStore`] and writes changed documents back on
//! [`Warehouse::flush`].

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::{
    domain::{
        Config, ElementId, ElementKind, LotId, Part, PartId, PartLot, StructuralElement,
    },
    storage::{ElementStore, InventoryStore, PartStore},
};

const CONFIG_DIR: &str = ".inv";
const CONFIG_FILE: &str = "config.toml";
const PARTS_DIR: &str = "parts";

/// A filesystem backed inventory rooted at one directory.
///
/// All reads are answered from memory; writes go to memory immediately and
/// to disk when flushed.
#[derive(Debug)]
pub struct Warehouse {
    root: PathBuf,
    config: Config,
    store: InventoryStore,
    dirty_elements: BTreeSet<ElementId>,
    dirty_parts: BTreeSet<PartId>,
}

/// Errors from opening or initializing a warehouse.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// The directory is already an inventory root.
    #[error("'{0}' is already an inventory root")]
    AlreadyInitialised(PathBuf),

    /// The directory is not an inventory root.
    #[error("'{0}' is not an inventory root (missing {CONFIG_DIR}/{CONFIG_FILE})")]
    NotInitialised(PathBuf),

    /// The directory layout could not be created or read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The configuration file could not be written.
    #[error("{0}")]
    Config(String),

    /// Files in the inventory directories could not be loaded.
    #[error(transparent)]
    Unrecognised(#[from] UnrecognisedFiles),
}

/// Files under the inventory directories that are not valid entities.
#[derive(Debug, thiserror::Error)]
pub struct UnrecognisedFiles {
    paths: Vec<PathBuf>,
}

impl fmt::Display for UnrecognisedFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised files: ")?;
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Counts of documents written by a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    /// Element documents written.
    pub elements: usize,
    /// Part documents written.
    pub parts: usize,
}

impl FlushReport {
    /// Total documents written.
    #[must_use]
    pub const fn total(self) -> usize {
        self.elements + self.parts
    }
}

/// Documents that could not be written back.
///
/// A flush does not fail fast; every dirty document is attempted before
/// the failures are reported, and the failed ones stay dirty.
#[derive(Debug, thiserror::Error)]
pub struct FlushError {
    failures: NonEmpty<(PathBuf, io::Error)>,
}

impl fmt::Display for FlushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "failed to write inventory files: ")?;

        let total = self.failures.len();

        let displayed_paths: Vec<String> = self
            .failures
            .iter()
            .take(MAX_DISPLAY)
            .map(|(p, _e)| p.display().to_string())
            .collect();

        let msg = displayed_paths.join(", ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}

#[derive(Debug)]
enum Document {
    Element(StructuralElement),
    Part(Box<Part>),
}

impl Warehouse {
    /// Creates the directory skeleton and default configuration at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::AlreadyInitialised`] when a configuration
    /// already exists there, and I/O or configuration errors when the
    /// skeleton cannot be written.
    pub fn init(root: &Path) -> Result<Self, WarehouseError> {
        let config_path = config_path(root);
        if config_path.exists() {
            return Err(WarehouseError::AlreadyInitialised(root.to_path_buf()));
        }

        std::fs::create_dir_all(root.join(CONFIG_DIR))?;
        for kind in ElementKind::ALL {
            std::fs::create_dir_all(root.join(kind.plural()))?;
        }
        std::fs::create_dir_all(root.join(PARTS_DIR))?;

        let config = Config::default();
        config.save(&config_path).map_err(WarehouseError::Config)?;

        tracing::info!(root = %root.display(), "initialised inventory");

        Ok(Self {
            root: root.to_path_buf(),
            config,
            store: InventoryStore::default(),
            dirty_elements: BTreeSet::new(),
            dirty_parts: BTreeSet::new(),
        })
    }

    /// Opens the warehouse at `root` and loads every document.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::NotInitialised`] when `root` carries no
    /// configuration, and [`WarehouseError::Unrecognised`] when the
    /// inventory directories contain files that are not valid entities and
    /// the configuration does not allow skipping them.
    pub fn open(root: &Path) -> Result<Self, WarehouseError> {
        let config_path = config_path(root);
        if !config_path.exists() {
            return Err(WarehouseError::NotInitialised(root.to_path_buf()));
        }

        let config = Config::load(&config_path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        });

        let paths = collect_yaml_paths(root);

        let (documents, unrecognised): (Vec<_>, Vec<_>) = paths
            .par_iter()
            .map(|path| try_load_document(path, root))
            .partition(Result::is_ok);

        let documents: Vec<_> = documents.into_iter().map(Result::unwrap).collect();
        let unrecognised: Vec<_> = unrecognised.into_iter().map(Result::unwrap_err).collect();

        if !unrecognised.is_empty() {
            if config.allow_unrecognised {
                for path in &unrecognised {
                    tracing::debug!("Skipping unrecognised file: {}", path.display());
                }
            } else {
                return Err(UnrecognisedFiles {
                    paths: unrecognised,
                }
                .into());
            }
        }

        let mut store = InventoryStore::default();
        for document in documents {
            match document {
                Document::Element(element) => {
                    store.save_element(element);
                }
                Document::Part(part) => {
                    store.save_part(*part);
                }
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            store,
            dirty_elements: BTreeSet::new(),
            dirty_parts: BTreeSet::new(),
        })
    }

    /// The warehouse root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The in-memory store all queries are answered from.
    #[must_use]
    pub const fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Number of entities changed since the last flush.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty_elements.len() + self.dirty_parts.len()
    }

    /// Writes every changed entity back to its document.
    ///
    /// # Errors
    ///
    /// Returns [`FlushError`] listing the documents that could not be
    /// written. Those entities remain dirty; the rest are written even when
    /// some fail.
    pub fn flush(&mut self) -> Result<FlushReport, FlushError> {
        let mut report = FlushReport::default();
        let mut failures = Vec::new();

        for id in std::mem::take(&mut self.dirty_elements) {
            let Some(element) = self.store.element(id) else {
                continue;
            };
            let path = element_path(&self.root, element);
            match write_yaml(&path, element) {
                Ok(()) => report.elements += 1,
                Err(e) => {
                    failures.push((path, e));
                    self.dirty_elements.insert(id);
                }
            }
        }

        for id in std::mem::take(&mut self.dirty_parts) {
            let Some(part) = self.store.part(id) else {
                continue;
            };
            let path = part_path(&self.root, id);
            match write_yaml(&path, part) {
                Ok(()) => report.parts += 1,
                Err(e) => {
                    failures.push((path, e));
                    self.dirty_parts.insert(id);
                }
            }
        }

        tracing::debug!(
            elements = report.elements,
            parts = report.parts,
            "flushed inventory"
        );

        NonEmpty::from_vec(failures).map_or(Ok(report), |failures| Err(FlushError { failures }))
    }
}

impl ElementStore for Warehouse {
    fn element(&self, id: ElementId) -> Option<&StructuralElement> {
        self.store.element(id)
    }

    fn all_of_kind(&self, kind: ElementKind) -> Vec<&StructuralElement> {
        self.store.all_of_kind(kind)
    }

    fn save_element(&mut self, element: StructuralElement) -> Option<StructuralElement> {
        self.dirty_elements.insert(element.id);
        self.store.save_element(element)
    }
}

impl PartStore for Warehouse {
    fn part(&self, id: PartId) -> Option<&Part> {
        self.store.part(id)
    }

    fn all_parts(&self) -> Vec<&Part> {
        self.store.all_parts()
    }

    fn save_part(&mut self, part: Part) -> Option<Part> {
        self.dirty_parts.insert(part.id);
        self.store.save_part(part)
    }

    fn lot(&self, id: LotId) -> Option<(&Part, &PartLot)> {
        self.store.lot(id)
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

fn element_path(root: &Path, element: &StructuralElement) -> PathBuf {
    root.join(element.kind.plural())
        .join(format!("{}.yaml", element.id))
}

fn part_path(root: &Path, id: PartId) -> PathBuf {
    root.join(PARTS_DIR).join(format!("{id}.yaml"))
}

fn collect_yaml_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            // Skip the .inv directory (configuration and other metadata)
            !entry
                .path()
                .components()
                .any(|c| c.as_os_str() == CONFIG_DIR)
        })
        .filter(|entry| entry.path().extension() == Some(OsStr::new("yaml")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn try_load_document(path: &Path, root: &Path) -> Result<Document, PathBuf> {
    let Some(id) = id_from_file_name(path) else {
        tracing::debug!("Skipping file with invalid name at {}", path.display());
        return Err(path.to_path_buf());
    };

    // The directory directly under the root decides what the file holds.
    let dir = path
        .strip_prefix(root)
        .ok()
        .and_then(|relative| relative.components().next())
        .map(|component| component.as_os_str().to_os_string());

    let Some(dir) = dir else {
        return Err(path.to_path_buf());
    };

    if dir == OsStr::new(PARTS_DIR) {
        let part: Part = read_yaml(path)?;
        if part.id != PartId::from(id) {
            tracing::debug!(
                "Id in {} does not match the file name, skipping",
                path.display()
            );
            return Err(path.to_path_buf());
        }
        return Ok(Document::Part(Box::new(part)));
    }

    let Some(kind) = ElementKind::ALL
        .into_iter()
        .find(|kind| dir == OsStr::new(kind.plural()))
    else {
        tracing::debug!("Skipping file outside known directories: {}", path.display());
        return Err(path.to_path_buf());
    };

    let element: StructuralElement = read_yaml(path)?;
    if element.id != ElementId::from(id) || element.kind != kind {
        tracing::debug!(
            "Id or kind in {} does not match its location, skipping",
            path.display()
        );
        return Err(path.to_path_buf());
    }
    Ok(Document::Element(element))
}

fn id_from_file_name(path: &Path) -> Option<uuid::Uuid> {
    let stem = path.file_stem()?.to_str()?;
    uuid::Uuid::parse_str(stem).ok()
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, PathBuf> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::debug!("Failed to read {}: {e}", path.display());
        path.to_path_buf()
    })?;
    serde_yaml::from_str(&content).map_err(|e| {
        tracing::debug!("Failed to parse {}: {e}", path.display());
        path.to_path_buf()
    })
}

fn write_yaml<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), io::Error> {
    let content = serde_yaml::to_string(value).map_err(io::Error::other)?;
    std::fs::write(path, content)
}
