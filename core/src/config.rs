//! A thin knob holder, not a configuration layer: file/env discovery
//! machinery is explicitly out of scope, so this just gives the remote
//! driver a socket path and the pool a size without pulling in a config
//! crate for three fields.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub socket_dir: PathBuf,
    /// Size of the local THREADED worker pool. Defaults to 8.
    pub batch_size: usize,
    pub user: String,
    /// Overrides the composed `<socket-dir>/scan-<user>` path with an
    /// exact daemon socket path, e.g. one given directly on a command
    /// line rather than assembled from `socket_dir`/`user`.
    pub socket_path_override: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_dir: PathBuf::from("/tmp"),
            batch_size: 8,
            user: String::from("default"),
            socket_path_override: None,
        }
    }
}

impl Config {
    /// Reads `WARDENSCAN_SOCKET_DIR` / `WARDENSCAN_BATCH_SIZE` /
    /// `WARDENSCAN_USER`, falling back to `USER` for the user name, and to
    /// `Default` for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("WARDENSCAN_SOCKET_DIR") {
            config.socket_dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("WARDENSCAN_BATCH_SIZE") {
            if let Ok(parsed) = size.parse() {
                config.batch_size = parsed;
            }
        }
        if let Ok(user) = std::env::var("WARDENSCAN_USER").or_else(|_| std::env::var("USER")) {
            config.user = user;
        }

        config
    }

    /// `<socket-dir>/scan-<user>`, the daemon socket convention, unless
    /// `socket_path_override` names an exact path to use instead.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path_override
            .clone()
            .unwrap_or_else(|| self.socket_dir.join(format!("scan-{}", self.user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_path_follows_the_naming_convention() {
        let config = Config {
            socket_dir: PathBuf::from("/var/run/wardenscan"),
            user: "alice".into(),
            ..Config::default()
        };
        assert_eq!(config.socket_path(), PathBuf::from("/var/run/wardenscan/scan-alice"));
    }

    #[test]
    fn socket_path_override_wins_over_the_composed_convention() {
        let config = Config {
            socket_dir: PathBuf::from("/var/run/wardenscan"),
            user: "alice".into(),
            socket_path_override: Some(PathBuf::from("/run/daemon.sock")),
            ..Config::default()
        };
        assert_eq!(config.socket_path(), PathBuf::from("/run/daemon.sock"));
    }

    #[test]
    fn default_pool_size_is_eight() {
        assert_eq!(Config::default().batch_size, 8);
    }
}
