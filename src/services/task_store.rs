//! JSON file repository for tasks
//!
//! Stores every task in `<data-dir>/tasks.json`. Access is serialized through
//! `<data-dir>/tasks.lock`: reads hold a shared lock, and every
//! read-modify-write holds one exclusive lock from the load until the temp
//! file has been renamed over the store file.

use chrono::Utc;
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{color_for_index, validate_name, CalendarDay, Result, StreaklyError, Task};

/// Store file layout version
pub const STORE_VERSION: u32 = 1;

const STORE_FILE: &str = "tasks.json";
const LOCK_FILE: &str = "tasks.lock";

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskFile {
    pub version: u32,
    pub updated_at: i64,
    pub tasks: Vec<Task>,
}

/// Default data directory: `~/.streakly`
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| StreaklyError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".streakly"))
}

pub struct TaskStore {
    data_dir: PathBuf,
}

/// Held advisory lock on the store's lock file, released on drop
struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl TaskStore {
    /// Store in the default data directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_data_dir(default_data_dir()?))
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    /// Read every task. A missing file is an empty store; an unreadable or
    /// corrupted file is an error so no data is silently dropped.
    ///
    /// Also accepts a bare JSON array of tasks without the version header.
    pub fn load_all(&self) -> Result<Vec<Task>> {
        if !self.store_path().exists() {
            debug!(path = %self.store_path().display(), "no store file, starting empty");
            return Ok(Vec::new());
        }
        let _lock = self.lock_shared()?;
        self.read_tasks()
    }

    /// Replace the stored task list
    pub fn save_all(&self, tasks: &[Task]) -> Result<()> {
        let _lock = self.lock_exclusive()?;
        self.write_tasks(tasks)
    }

    fn lock_file(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.data_dir.join(LOCK_FILE))
            .map_err(|e| StreaklyError::Storage(format!("Failed to open lock file: {}", e)))
    }

    fn lock_shared(&self) -> Result<StoreLock> {
        let file = self.lock_file()?;
        FileExt::lock_shared(&file)
            .map_err(|e| StreaklyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(StoreLock { file })
    }

    fn lock_exclusive(&self) -> Result<StoreLock> {
        fs::create_dir_all(&self.data_dir)?;
        let file = self.lock_file()?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| StreaklyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(StoreLock { file })
    }

    /// Load without locking; callers hold the store lock
    fn read_tasks(&self) -> Result<Vec<Task>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut content = String::new();
        std::io::BufReader::new(File::open(&path)?).read_to_string(&mut content)?;

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| StreaklyError::Storage(format!("Corrupted store file: {}", e)))?;

        let tasks = if value.is_array() {
            warn!(path = %path.display(), "loading legacy task list without version header");
            serde_json::from_value::<Vec<Task>>(value)
                .map_err(|e| StreaklyError::Storage(format!("Invalid task record: {}", e)))?
        } else {
            let stored: TaskFile = serde_json::from_value(value)
                .map_err(|e| StreaklyError::Storage(format!("Invalid task record: {}", e)))?;
            if stored.version > STORE_VERSION {
                return Err(StreaklyError::Storage(format!(
                    "Store version {} is newer than supported version {}",
                    stored.version, STORE_VERSION
                )));
            }
            stored.tasks
        };

        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Atomic write through a temp file; callers hold the exclusive lock
    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let stored = TaskFile {
            version: STORE_VERSION,
            updated_at: Utc::now().timestamp(),
            tasks: tasks.to_vec(),
        };

        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| StreaklyError::Storage(format!("Serialization failed: {}", e)))?;

        let path = self.store_path();
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| StreaklyError::Storage(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| StreaklyError::Storage(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| StreaklyError::Storage(format!("Failed to sync temp file: {}", e)))?;
        }

        fs::rename(&temp_path, &path)
            .map_err(|e| StreaklyError::Storage(format!("Failed to rename temp file: {}", e)))?;

        debug!(count = tasks.len(), path = %path.display(), "saved tasks");
        Ok(())
    }

    /// Create a task. Color rotates through the palette by task count.
    pub fn add(&self, name: &str) -> Result<Task> {
        // Validate before touching the data directory
        validate_name(name)?;
        let _lock = self.lock_exclusive()?;
        let mut tasks = self.read_tasks()?;
        let task = Task::new(name, color_for_index(tasks.len()), Utc::now())?;
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        Ok(task)
    }

    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.load_all()?.into_iter().find(|t| t.id == id))
    }

    /// Resolve a full id or a unique id prefix
    pub fn find(&self, id_or_prefix: &str) -> Result<Task> {
        let tasks = self.load_all()?;
        resolve(&tasks, id_or_prefix).map(|idx| tasks[idx].clone())
    }

    /// Replace the stored task with the same id
    pub fn update(&self, task: &Task) -> Result<()> {
        let _lock = self.lock_exclusive()?;
        let mut tasks = self.read_tasks()?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| StreaklyError::NotFound(task.id.clone()))?;
        *slot = task.clone();
        self.write_tasks(&tasks)
    }

    pub fn rename(&self, id_or_prefix: &str, name: &str) -> Result<Task> {
        let name = validate_name(name)?;
        self.modify(id_or_prefix, |task| task.name = name)
    }

    /// Remove a task, returning it
    pub fn delete(&self, id_or_prefix: &str) -> Result<Task> {
        let _lock = self.lock_exclusive()?;
        let mut tasks = self.read_tasks()?;
        let idx = resolve(&tasks, id_or_prefix)?;
        let removed = tasks.remove(idx);
        self.write_tasks(&tasks)?;
        Ok(removed)
    }

    /// Flip completion of `day`. Returns the updated task and whether the
    /// day is now completed.
    pub fn toggle_completion(&self, id_or_prefix: &str, day: CalendarDay) -> Result<(Task, bool)> {
        let mut completed = false;
        let task = self.modify(id_or_prefix, |task| {
            completed = task.toggle_completion(day);
        })?;
        debug!(id = %task.id, %day, completed, "toggled completion");
        Ok((task, completed))
    }

    /// Delete the store file
    pub fn clear(&self) -> Result<()> {
        let path = self.store_path();
        if path.exists() {
            let _lock = self.lock_exclusive()?;
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn modify<F>(&self, id_or_prefix: &str, f: F) -> Result<Task>
    where
        F: FnOnce(&mut Task),
    {
        let _lock = self.lock_exclusive()?;
        let mut tasks = self.read_tasks()?;
        let idx = resolve(&tasks, id_or_prefix)?;
        f(&mut tasks[idx]);
        let task = tasks[idx].clone();
        self.write_tasks(&tasks)?;
        Ok(task)
    }
}

/// Index of the task whose id equals `id_or_prefix`, or else the single
/// task whose id starts with it
fn resolve(tasks: &[Task], id_or_prefix: &str) -> Result<usize> {
    if let Some(idx) = tasks.iter().position(|t| t.id == id_or_prefix) {
        return Ok(idx);
    }
    if id_or_prefix.is_empty() {
        return Err(StreaklyError::NotFound(String::new()));
    }

    let mut matches = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.id.starts_with(id_or_prefix));
    match (matches.next(), matches.next()) {
        (Some((idx, _)), None) => Ok(idx),
        (None, _) => Err(StreaklyError::NotFound(id_or_prefix.to_string())),
        (Some(_), Some(_)) => Err(StreaklyError::InvalidTask(format!(
            "id prefix {:?} matches more than one task",
            id_or_prefix
        ))),
    }
}
