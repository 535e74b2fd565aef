//! Utility functions for path construction.

use std::path::PathBuf;

/// Joins a directory path with a subdirectory or file name.
///
/// Handles the path separator for the current platform and returns the
/// result as a `String`.
///
/// # Panics
///
/// Panics if the resulting path contains invalid UTF-8.
///
/// # Examples
///
/// ```
/// # use rollo::utils::get_path;
/// let path = get_path("/home/user", "session");
/// assert_eq!(path, "/home/user/session");
/// ```
pub fn get_path(dir_path: &str, subdir_path: &str) -> String {
    let path_buf: PathBuf = [dir_path, subdir_path].iter().collect();
    path_buf.to_str().unwrap().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_path_simple() {
        let path = get_path("/home/user", "session");
        #[cfg(unix)]
        assert_eq!(path, "/home/user/session");
        #[cfg(windows)]
        assert_eq!(path, "\\home\\user\\session");
    }

    #[test]
    fn test_get_path_relative() {
        let path = get_path(".", "data");
        #[cfg(unix)]
        assert_eq!(path, "./data");
        #[cfg(windows)]
        assert_eq!(path, ".\\data");
    }

    #[test]
    fn test_get_path_with_file() {
        let path = get_path("/var/data", "config.yaml");
        #[cfg(unix)]
        assert_eq!(path, "/var/data/config.yaml");
        #[cfg(windows)]
        assert_eq!(path, "\\var\\data\\config.yaml");
    }

    #[test]
    fn test_get_path_multiple_components() {
        let base = get_path("/home", "user");
        let final_path = get_path(&base, "session");
        #[cfg(unix)]
        assert_eq!(final_path, "/home/user/session");
        #[cfg(windows)]
        assert_eq!(final_path, "\\home\\user\\session");
    }
}
