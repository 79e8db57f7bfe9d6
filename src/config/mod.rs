//! Configuration loading and schema.
//!
//! Settings come from `.larder.yml` (discovered by walking up from the
//! project root, or given explicitly with `--config`), with compiled-in
//! defaults for everything, so larder runs usefully in a project with no
//! config file at all.

pub mod loader;
pub mod schema;

pub use loader::{find_config_file, load_config, load_config_file, parse_config, CONFIG_FILE};
pub use schema::{
    default_packages, CheckSettings, Config, LibrarySettings, RepositorySettings, RuntimeSettings,
};
