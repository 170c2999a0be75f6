//! CLI Tooling
//!
//! Command-line interface for the organizer. Every item command runs against
//! the collection of the user recorded in the persisted session.

use crate::auth::{AuthService, RegisterOutcome, Session, INVALID_CREDENTIALS_MESSAGE, USERNAME_TAKEN_MESSAGE};
use crate::concurrency::UserLockManager;
use crate::config::{ConfigLoader, OrganisaConfig};
use crate::error::ApiError;
use crate::generation::{ContentGenerator, OpenAiCompatibleGenerator};
use crate::item::payload::{decode_data_url, encode_file};
use crate::item::validation::validate_topic;
use crate::item::{tree, validate_file_size, validate_name, Item, ItemRepository, NewItem};
use crate::kv::{KeyValueStore, SledKeyValueStore};
use crate::logging::LoggingConfig;
use crate::tooling::format::{
    format_breadcrumb, format_item_detail, format_item_table, format_tree, items_to_json,
    tree_to_json, ItemSummary,
};
use crate::types::ItemId;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Organisa - personal folders, notes, links and files
#[derive(Parser)]
#[command(name = "organisa")]
#[command(about = "Organize folders, notes, links and files in a local store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides storage.path)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply `--log-*` flags on top of the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in as it
    Register {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in to an existing account
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List a folder (root by default)
    Ls {
        /// Folder ID to list
        #[arg(long)]
        folder: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the whole collection as a tree
    Tree {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Find items by name (case-insensitive)
    Search {
        query: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the folder path leading to an item
    Path {
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a folder
    Mkdir {
        name: String,
        /// Parent folder ID (root when omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create a note
    Note {
        name: String,
        /// Note body
        #[arg(long, conflicts_with = "generate")]
        text: Option<String>,
        /// Generate the body from the note name
        #[arg(long)]
        generate: bool,
        /// Parent folder ID (root when omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Save a link
    Link {
        name: String,
        url: String,
        /// Parent folder ID (root when omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Upload a file from disk
    Upload {
        file: PathBuf,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        /// Parent folder ID (root when omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Show one item
    Show {
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Save an uploaded file back to disk
    Download {
        id: String,
        /// Target file or directory
        dest: PathBuf,
    },
    /// Delete an item (folders take their contents with them)
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context holding the opened store and services
pub struct CliContext {
    config: OrganisaConfig,
    repository: ItemRepository,
    auth: AuthService,
    generator: Option<Arc<dyn ContentGenerator>>,
}

impl CliContext {
    /// Load configuration and open the on-disk store.
    pub fn new(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_or_default(config_path.as_deref())?;
        Self::from_config(config, data_dir)
    }

    /// Open the on-disk store described by an already loaded configuration.
    pub fn from_config(config: OrganisaConfig, data_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = match data_dir {
            Some(dir) => dir,
            None => config.storage.resolve_path()?,
        };
        let store = SledKeyValueStore::open(&store_path)?;
        info!(path = %store_path.display(), "Opened store");
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Build a context over any store.
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: OrganisaConfig) -> Self {
        let locks = Arc::new(UserLockManager::new());
        let repository = ItemRepository::new(Arc::clone(&store))
            .with_strict_parents(config.repository.strict_parents)
            .with_lock_manager(Arc::clone(&locks));
        let auth = AuthService::new(store).with_lock_manager(locks);
        Self {
            config,
            repository,
            auth,
            generator: None,
        }
    }

    /// Use `generator` instead of the configured HTTP service.
    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &OrganisaConfig {
        &self.config
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Register { username, password } => {
                self.handle_register(username, password.as_deref())
            }
            Commands::Login { username, password } => {
                self.handle_login(username, password.as_deref())
            }
            Commands::Logout => self.handle_logout(),
            Commands::Whoami => Ok(match self.auth.current()? {
                Some(session) => session.username().to_string(),
                None => "Not logged in".to_string(),
            }),
            Commands::Ls { folder, format } => self.handle_ls(folder.as_deref(), format),
            Commands::Tree { format } => self.handle_tree(format),
            Commands::Search { query, format } => self.handle_search(query, format),
            Commands::Path { id, format } => self.handle_path(id, format),
            Commands::Mkdir { name, parent } => {
                let session = self.auth.require_session()?;
                let name = validate_name(name)?;
                let parent_id = self.resolve_parent(&session, parent.as_deref())?;
                let item = self
                    .repository
                    .create(session.username(), NewItem::folder(name).under(parent_id))?;
                Ok(created_message(&item))
            }
            Commands::Note {
                name,
                text,
                generate,
                parent,
            } => self.handle_note(name, text.as_deref(), *generate, parent.as_deref()),
            Commands::Link { name, url, parent } => {
                let session = self.auth.require_session()?;
                let name = validate_name(name)?;
                let url = url.trim();
                if url.is_empty() {
                    return Err(ApiError::ValidationError("URL cannot be empty".to_string()));
                }
                let parent_id = self.resolve_parent(&session, parent.as_deref())?;
                let item = self
                    .repository
                    .create(session.username(), NewItem::link(name, url).under(parent_id))?;
                Ok(created_message(&item))
            }
            Commands::Upload { file, name, parent } => {
                self.handle_upload(file, name.as_deref(), parent.as_deref())
            }
            Commands::Show { id, format } => self.handle_show(id, format),
            Commands::Download { id, dest } => self.handle_download(id, dest),
            Commands::Rm { id, force } => self.handle_rm(id, *force),
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e))),
        }
    }

    fn handle_register(&self, username: &str, password: Option<&str>) -> Result<String, ApiError> {
        let username = require_field(username)?;
        let password = match password {
            Some(p) => p.to_string(),
            None => prompt_password(true)?,
        };
        let password = require_field(&password)?;
        match self.auth.register(username, password)? {
            RegisterOutcome::AlreadyExists => {
                Err(ApiError::ValidationError(USERNAME_TAKEN_MESSAGE.to_string()))
            }
            RegisterOutcome::Registered => match self.auth.login(username, password)? {
                Some(session) => Ok(format!(
                    "Registered and logged in as {}",
                    session.username()
                )),
                None => Err(ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())),
            },
        }
    }

    fn handle_login(&self, username: &str, password: Option<&str>) -> Result<String, ApiError> {
        let username = require_field(username)?;
        let password = match password {
            Some(p) => p.to_string(),
            None => prompt_password(false)?,
        };
        let password = require_field(&password)?;
        match self.auth.login(username, password)? {
            Some(session) => Ok(format!("Logged in as {}", session.username())),
            None => Err(ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())),
        }
    }

    fn handle_logout(&self) -> Result<String, ApiError> {
        match self.auth.current()? {
            Some(session) => {
                let message = format!("Logged out {}", session.username());
                self.auth.logout(session)?;
                Ok(message)
            }
            None => {
                self.auth.clear_session()?;
                Ok("Not logged in".to_string())
            }
        }
    }

    fn handle_ls(&self, folder: Option<&str>, format: &str) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let user = session.username();
        let parent_id = self.resolve_parent(&session, folder)?;
        let items = self.repository.children(user, parent_id.as_deref())?;
        match format {
            "json" => to_json(items_to_json(&items)),
            "text" => {
                let path = match &parent_id {
                    Some(id) => self.repository.breadcrumb(user, id)?,
                    None => Vec::new(),
                };
                Ok(format_item_table(
                    &format_breadcrumb(&path),
                    &items,
                    "This folder is empty.",
                ))
            }
            other => Err(invalid_format(other)),
        }
    }

    fn handle_tree(&self, format: &str) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let items = self.repository.list(session.username())?;
        let walked = tree::walk(&items);
        match format {
            "json" => to_json(tree_to_json(&walked)),
            "text" => Ok(format_tree(&walked)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_search(&self, query: &str, format: &str) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let items = self.repository.search(session.username(), query)?;
        match format {
            "json" => to_json(items_to_json(&items)),
            "text" => {
                let heading = if query.trim().is_empty() {
                    "/".to_string()
                } else {
                    format!("Results for \"{}\"", query.trim())
                };
                Ok(format_item_table(
                    &heading,
                    &items,
                    &format!("No results for \"{}\".", query.trim()),
                ))
            }
            other => Err(invalid_format(other)),
        }
    }

    fn handle_path(&self, id: &str, format: &str) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let user = session.username();
        self.repository.get_or_error(user, id)?;
        let path = self.repository.breadcrumb(user, id)?;
        match format {
            "json" => to_json(items_to_json(&path)),
            "text" => Ok(format_breadcrumb(&path)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_note(
        &self,
        name: &str,
        text: Option<&str>,
        generate: bool,
        parent: Option<&str>,
    ) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let parent_id = self.resolve_parent(&session, parent)?;
        let body = if generate {
            validate_topic(name)?;
            self.generate_note_text(name.trim())?
        } else {
            text.unwrap_or_default().to_string()
        };
        let name = validate_name(name)?;
        let item = self
            .repository
            .create(session.username(), NewItem::note(name, body).under(parent_id))?;
        Ok(created_message(&item))
    }

    /// Run the generator to completion on a private runtime, bounded by the
    /// configured timeout and Ctrl-C.
    fn generate_note_text(&self, topic: &str) -> Result<String, ApiError> {
        let generator: Arc<dyn ContentGenerator> = match &self.generator {
            Some(generator) => Arc::clone(generator),
            None => Arc::new(OpenAiCompatibleGenerator::from_config(
                self.config.generation.clone(),
            )?),
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ApiError::GenerationFailed(
                "Cannot generate content from within an async runtime".to_string(),
            ));
        }
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::GenerationFailed(format!("Failed to create runtime: {}", e)))?;

        let timeout_secs = self.config.generation.timeout_secs;
        info!(topic, "Generating note content");
        rt.block_on(async {
            tokio::select! {
                result = tokio::time::timeout(Duration::from_secs(timeout_secs), generator.generate(topic)) => {
                    match result {
                        Ok(text) => text,
                        Err(_) => Err(ApiError::GenerationFailed(format!(
                            "Timed out after {}s",
                            timeout_secs
                        ))),
                    }
                }
                Ok(()) = tokio::signal::ctrl_c() => {
                    Err(ApiError::GenerationFailed("Cancelled".to_string()))
                }
            }
        })
    }

    fn handle_upload(
        &self,
        file: &Path,
        name: Option<&str>,
        parent: Option<&str>,
    ) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let parent_id = self.resolve_parent(&session, parent)?;

        let metadata = std::fs::metadata(file).map_err(|e| {
            ApiError::ValidationError(format!("Cannot read {}: {}", file.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(ApiError::ValidationError(format!(
                "{} is not a regular file",
                file.display()
            )));
        }
        validate_file_size(metadata.len(), self.config.limits.max_file_bytes)?;

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = validate_name(name.unwrap_or(&file_name))?;
        let bytes = std::fs::read(file).map_err(|e| {
            ApiError::ValidationError(format!("Cannot read {}: {}", file.display(), e))
        })?;
        let data = encode_file(&file_name, &bytes);
        let item = self
            .repository
            .create(session.username(), NewItem::file(name, data).under(parent_id))?;
        Ok(created_message(&item))
    }

    fn handle_show(&self, id: &str, format: &str) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let user = session.username();
        let item = self.repository.get_or_error(user, id)?;
        match format {
            "json" => to_json(serde_json::to_string_pretty(&ItemSummary::from(&item))),
            "text" => {
                let child_count = if item.is_folder() {
                    self.repository.children(user, Some(id))?.len()
                } else {
                    0
                };
                Ok(format_item_detail(&item, child_count))
            }
            other => Err(invalid_format(other)),
        }
    }

    fn handle_download(&self, id: &str, dest: &Path) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let item = self.repository.get_or_error(session.username(), id)?;
        let data = match item.content.payload() {
            Some(data) if item.kind() == crate::item::ItemKind::File => data,
            _ => {
                return Err(ApiError::ValidationError(format!(
                    "'{}' is a {}, not a file",
                    item.name,
                    item.kind()
                )))
            }
        };
        let decoded = decode_data_url(data)?;
        let target = if dest.is_dir() {
            let file_name = Path::new(&item.name).file_name().ok_or_else(|| {
                ApiError::ValidationError(format!(
                    "'{}' has no usable file name; give a full target path",
                    item.name
                ))
            })?;
            dest.join(file_name)
        } else {
            dest.to_path_buf()
        };
        std::fs::write(&target, &decoded.bytes).map_err(|e| {
            ApiError::ValidationError(format!("Cannot write {}: {}", target.display(), e))
        })?;
        Ok(format!(
            "Saved {} bytes to {}",
            decoded.bytes.len(),
            target.display()
        ))
    }

    fn handle_rm(&self, id: &str, force: bool) -> Result<String, ApiError> {
        let session = self.auth.require_session()?;
        let user = session.username();
        let item = self.repository.get_or_error(user, id)?;

        if !force {
            use dialoguer::Confirm;
            let prompt = if item.is_folder() {
                let inside = self.repository.descendants(user, id)?.len();
                format!(
                    "Delete folder '{}' and the {} item(s) inside it?",
                    item.name, inside
                )
            } else {
                format!("Delete '{}'?", item.name)
            };
            let confirmed = Confirm::new()
                .with_prompt(prompt)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }

        let removed = self.repository.delete(user, id)?;
        Ok(format!("Deleted '{}' ({} item(s) removed)", item.name, removed))
    }

    /// Check that `parent` names an existing folder of the session's user.
    fn resolve_parent(
        &self,
        session: &Session,
        parent: Option<&str>,
    ) -> Result<Option<ItemId>, ApiError> {
        let Some(parent_id) = parent else {
            return Ok(None);
        };
        let item = self.repository.get_or_error(session.username(), parent_id)?;
        if !item.is_folder() {
            return Err(ApiError::InvalidParent {
                parent_id: parent_id.to_string(),
                reason: format!("'{}' is a {}, not a folder", item.name, item.kind()),
            });
        }
        Ok(Some(item.id))
    }
}

fn created_message(item: &Item) -> String {
    format!("Created {} '{}' ({})", item.kind(), item.name, item.id)
}

fn require_field(value: &str) -> Result<&str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Please fill in all fields".to_string(),
        ));
    }
    Ok(value)
}

fn prompt_password(confirm: bool) -> Result<String, ApiError> {
    use dialoguer::Password;
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn to_json(result: Result<String, serde_json::Error>) -> Result<String, ApiError> {
    result.map_err(|e| ApiError::ConfigError(format!("Failed to serialize JSON: {}", e)))
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::ValidationError(format!(
        "Invalid format: {} (must be 'text' or 'json')",
        format
    ))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Register { .. } => "register",
        Commands::Login { .. } => "login",
        Commands::Logout => "logout",
        Commands::Whoami => "whoami",
        Commands::Ls { .. } => "ls",
        Commands::Tree { .. } => "tree",
        Commands::Search { .. } => "search",
        Commands::Path { .. } => "path",
        Commands::Mkdir { .. } => "mkdir",
        Commands::Note { .. } => "note",
        Commands::Link { .. } => "link",
        Commands::Upload { .. } => "upload",
        Commands::Show { .. } => "show",
        Commands::Download { .. } => "download",
        Commands::Rm { .. } => "rm",
        Commands::Config => "config",
    }
}
