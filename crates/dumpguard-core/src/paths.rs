use std::path::{Path, PathBuf};

use crate::config::{EtlMode, ValidatorConfig};

/// Resolves dump file locations for one mode under a base directory.
///
/// Files follow `{base}/{mode_dir}/{date_tag}_{source_tag}-{database}_{suffix}.csv`.
#[derive(Debug, Clone)]
pub struct DumpPaths {
    dir: PathBuf,
    prefix: String,
}

impl DumpPaths {
    pub fn new(base_path: &Path, mode: EtlMode, config: &ValidatorConfig) -> Self {
        Self {
            dir: base_path.join(mode.dir_name()),
            prefix: format!("{}_{}", config.date_tag(), config.source_tag()),
        }
    }

    fn file(&self, database: &str, suffix: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}_{}.csv", self.prefix, database, suffix))
    }

    pub fn manifest(&self, database: &str) -> PathBuf {
        self.file(database, "Manifest")
    }

    pub fn raw(&self, database: &str, table_name: &str) -> PathBuf {
        self.file(database, &format!("{}_raw", table_name))
    }

    pub fn validation(&self, database: &str, table_name: &str) -> PathBuf {
        self.file(database, &format!("{}_validation", table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_paths() {
        let paths = DumpPaths::new(Path::new("./20241204"), EtlMode::Delta, &ValidatorConfig::default());
        assert_eq!(
            paths.manifest("online"),
            PathBuf::from("./20241204/daily/20241204_jti_vita-ploom-online_Manifest.csv")
        );
        assert_eq!(
            paths.raw("online", "orders"),
            PathBuf::from("./20241204/daily/20241204_jti_vita-ploom-online_orders_raw.csv")
        );
    }

    #[test]
    fn test_full_validation_path() {
        let paths = DumpPaths::new(Path::new("/data"), EtlMode::Full, &ValidatorConfig::default());
        assert_eq!(
            paths.validation("offline", "Product"),
            PathBuf::from("/data/full/20241204_jti_vita-ploom-offline_Product_validation.csv")
        );
    }
}
