//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use shop_cache::{cache_key, FileStore};
use shop_commerce::cart::CartStore;
use shop_commerce::pricing::PricingCalculator;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the config was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the cart store lives in.
    ///
    /// Relative paths are taken from the config file's directory, or the
    /// working directory when there is no config file.
    pub fn storage_dir(&self) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(self.cwd.as_path());
        resolve(base, &self.config.storage.dir)
    }

    /// Open the cart, optionally scoped to a named session.
    pub fn open_cart(&self, session: Option<&str>) -> Result<CartStore<FileStore>> {
        let key = match session {
            Some(session) => cache_key!(self.config.storage.cart_key.as_str(), session),
            None => self.config.storage.cart_key.clone(),
        };
        if let Err(err) = FileStore::validate_key(&key) {
            bail!(
                "{}. Session names and cart_key may only use letters, digits, '-', '_' and '.'",
                err
            );
        }

        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;

        self.output.debug(&format!("Cart key {} in {}", key, dir.display()));

        Ok(CartStore::load_with_key(store, key).with_currency(self.config.pricing.currency))
    }

    /// Pricing calculator for the configured rates.
    pub fn calculator(&self) -> PricingCalculator {
        PricingCalculator::new(self.config.pricing.clone())
    }
}

/// Find a config file in `start` or its parents.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    #[test]
    fn test_find_config_in_parent() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("shop.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.path().join("shop.toml")));
    }

    #[test]
    fn test_storage_dir_relative_to_config() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig {
                storage: StorageConfig {
                    dir: "data".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            config_path: Some(root.path().join("shop.toml")),
            output: Output::new(false, true),
            cwd: PathBuf::from("/nowhere"),
        };

        assert_eq!(ctx.storage_dir(), root.path().join("data"));
    }

    #[test]
    fn test_sessions_use_separate_carts() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: root.path().to_path_buf(),
        };

        let product = shop_commerce::cart::CartProduct::new("p1", "Phone", 100);
        ctx.open_cart(None).unwrap().add(&product).unwrap();

        let mut guest = ctx.open_cart(Some("guest")).unwrap();
        assert_eq!(guest.key(), "cart:guest");
        assert!(guest.is_empty());
        guest.add(&product).unwrap();
        guest.add(&product).unwrap();

        assert_eq!(ctx.open_cart(None).unwrap().item_count(), 1);
        assert_eq!(ctx.open_cart(Some("guest")).unwrap().item_count(), 2);
    }

    #[test]
    fn test_invalid_session_name_rejected() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: root.path().to_path_buf(),
        };

        let err = ctx.open_cart(Some("my session")).err().unwrap();
        assert!(err.to_string().contains("Invalid key: cart:my session"));
        assert!(!root.path().join(".shop").exists());

        assert!(ctx.open_cart(Some("my-session")).is_ok());
    }
}
