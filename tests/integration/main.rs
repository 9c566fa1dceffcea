//! Integration tests for gradle-provision

mod stub {
    //! Minimal HTTP server standing in for the Gradle services endpoint

    use std::collections::HashMap;
    use std::io::{BufRead, BufReader, Cursor, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub struct StubServer {
        pub base: String,
        hits: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        /// Start serving routes built from the server's base URL
        pub fn start(routes: impl FnOnce(&str) -> HashMap<String, Vec<u8>>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            let routes = routes(&base);
            let hits = Arc::new(Mutex::new(Vec::new()));

            let recorded = Arc::clone(&hits);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    serve(stream, &routes, &recorded);
                }
            });

            Self { base, hits }
        }

        pub fn hits(&self, path: &str) -> usize {
            self.hits.lock().unwrap().iter().filter(|p| *p == path).count()
        }
    }

    fn serve(stream: TcpStream, routes: &HashMap<String, Vec<u8>>, hits: &Mutex<Vec<String>>) {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).is_err() {
            return;
        }
        loop {
            let mut header = String::new();
            match reader.read_line(&mut header) {
                Ok(0) | Err(_) => break,
                Ok(_) if header == "\r\n" => break,
                Ok(_) => {}
            }
        }

        let path = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or("/")
            .to_string();
        hits.lock().unwrap().push(path.clone());

        let (status, body): (&str, &[u8]) = match routes.get(&path) {
            Some(body) => ("200 OK", body.as_slice()),
            None => ("404 Not Found", &b"not found"[..]),
        };
        let mut stream = stream;
        let _ = write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        let _ = stream.write_all(body);
        let _ = stream.flush();
    }

    /// A distribution zip whose launcher prints its version
    pub fn gradle_zip(version: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().unix_permissions(0o644);
        let root = format!("gradle-{}", version);

        zip.add_directory(format!("{}/bin/", root), options).unwrap();
        for launcher in ["gradle", "gradle.bat"] {
            zip.start_file(format!("{}/bin/{}", root, launcher), options)
                .unwrap();
            zip.write_all(
                format!("#!/bin/sh\necho\necho \"Gradle {}\"\n", version).as_bytes(),
            )
            .unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    /// Routes for a registry knowing `versions`, with `current` as the current channel
    pub fn gradle_services(
        base: &str,
        current: &str,
        versions: &[&str],
    ) -> HashMap<String, Vec<u8>> {
        let descriptor = |v: &str| {
            format!(
                r#"{{"version":"{v}","downloadUrl":"{base}/distributions/gradle-{v}-bin.zip"}}"#
            )
        };

        let mut routes = HashMap::new();
        routes.insert("/versions/current".to_string(), descriptor(current).into_bytes());
        routes.insert("/versions/release-candidate".to_string(), b"{}".to_vec());
        let all: Vec<String> = versions.iter().map(|&v| descriptor(v)).collect();
        routes.insert(
            "/versions/all".to_string(),
            format!("[{}]", all.join(",")).into_bytes(),
        );
        for v in versions {
            routes.insert(
                format!("/distributions/gradle-{}-bin.zip", v),
                gradle_zip(v),
            );
        }
        routes
    }
}

mod cli_tests {
    use super::stub::{gradle_services, StubServer};
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn gradle_provision() -> Command {
        cargo_bin_cmd!("gradle-provision")
    }

    /// Command isolated from the host: own config, cache, PATH and runner files
    fn isolated(temp: &Path, versions_url: &str) -> Command {
        let config = temp.join("config.toml");
        std::fs::write(
            &config,
            format!(
                "[provision]\nroot = {:?}\n\n[cache]\ndir = {:?}\n",
                temp.join("root"),
                temp.join("cache")
            ),
        )
        .unwrap();
        let empty_bin = temp.join("empty-bin");
        std::fs::create_dir_all(&empty_bin).unwrap();

        let mut cmd = gradle_provision();
        cmd.arg("--config")
            .arg(&config)
            .env("PATH", &empty_bin)
            .env("GRADLE_PROVISION_VERSIONS_URL", versions_url)
            .env("GITHUB_OUTPUT", temp.join("github-output"))
            .env("GITHUB_PATH", temp.join("github-path"))
            .env_remove("GRADLE_PROVISION_CACHE_DISABLED")
            .env_remove("GRADLE_PROVISION_CACHE_READ_ONLY")
            .env_remove("GRADLE_PROVISION_CACHE_DIR")
            .env_remove("RUNNER_TEMP")
            .env_remove("GRADLE_VERSION");
        cmd
    }

    #[test]
    fn help_displays() {
        gradle_provision()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Provision Gradle"));
    }

    #[test]
    fn version_displays() {
        gradle_provision()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gradle-provision"));
    }

    #[test]
    fn wrapper_is_not_configured() {
        let temp = TempDir::new().unwrap();
        for version in ["wrapper", ""] {
            isolated(temp.path(), "http://127.0.0.1:9/versions")
                .args(["install", version])
                .assert()
                .success()
                .stdout(predicate::str::contains("Gradle not configured"));
        }
        assert!(!temp.path().join("root").exists());
        assert!(!temp.path().join("github-output").exists());
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        isolated(temp.path(), "http://127.0.0.1:9/versions")
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        isolated(temp.path(), "http://127.0.0.1:9/versions")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("http://127.0.0.1:9/versions"));
    }

    #[test]
    fn unreachable_registry_fails() {
        let temp = TempDir::new().unwrap();
        isolated(temp.path(), "http://127.0.0.1:9/versions")
            .args(["resolve", "current"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read version registry"));
    }

    #[test]
    fn unknown_version_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["8.5"]));

        isolated(temp.path(), &format!("{}/versions", server.base))
            .args(["install", "1.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Gradle version 1.0 does not exist"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn release_candidate_falls_back_to_current() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["8.5"]));

        isolated(temp.path(), &format!("{}/versions", server.base))
            .args(["resolve", "release-candidate"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("8.5 "))
            .stderr(predicate::str::contains("fallback").not());
    }

    #[test]
    fn install_current_end_to_end() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["8.4", "8.5"]));
        let versions_url = format!("{}/versions", server.base);

        isolated(temp.path(), &versions_url)
            .args(["install", "current"])
            .assert()
            .success()
            .stdout(predicate::str::contains("gradle-8.5"))
            .stderr(predicate::str::contains("Provision Gradle 8.5"))
            .stderr(predicate::str::contains("Downloaded"));

        let install_dir = temp.path().join("root/installs/gradle-8.5");
        assert!(install_dir.join(".provisioned").exists());
        assert!(temp.path().join("root/downloads/gradle-8.5-bin.zip").exists());
        assert!(temp.path().join("cache/gradle-8.5/entry.json").exists());

        let output = std::fs::read_to_string(temp.path().join("github-output")).unwrap();
        assert_eq!(output, "gradle-version=8.5\n");
        let path = std::fs::read_to_string(temp.path().join("github-path")).unwrap();
        assert!(path.trim_end().ends_with("bin"));

        // Second run reuses the installation without downloading again
        isolated(temp.path(), &versions_url)
            .args(["install", "8.5"])
            .assert()
            .success();
        assert_eq!(server.hits("/distributions/gradle-8.5-bin.zip"), 1);
        assert_eq!(server.hits("/versions/all"), 1);
    }

    #[test]
    fn cache_restore_avoids_download() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["8.5"]));
        let versions_url = format!("{}/versions", server.base);

        isolated(temp.path(), &versions_url)
            .args(["install", "8.5"])
            .assert()
            .success();

        // A fresh machine sharing the cache directory
        std::fs::remove_dir_all(temp.path().join("root")).unwrap();
        isolated(temp.path(), &versions_url)
            .args(["install", "8.5"])
            .assert()
            .success();

        assert_eq!(server.hits("/distributions/gradle-8.5-bin.zip"), 1);
        assert!(temp.path().join("root/installs/gradle-8.5/.provisioned").exists());
    }

    #[test]
    fn disabled_cache_is_not_written() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["8.5"]));

        isolated(temp.path(), &format!("{}/versions", server.base))
            .env("GRADLE_PROVISION_CACHE_DISABLED", "true")
            .args(["install", "8.5"])
            .assert()
            .success();

        assert!(!temp.path().join("cache").exists());
    }

    #[test]
    fn at_least_installs_minimum_when_nothing_matches() {
        let temp = TempDir::new().unwrap();
        let server = StubServer::start(|base| gradle_services(base, "8.5", &["7.0", "8.5"]));

        isolated(temp.path(), &format!("{}/versions", server.base))
            .args(["at-least", "7.0", "/nonexistent/gradle"])
            .assert()
            .success()
            .stdout(predicate::str::contains("gradle-7.0"));

        assert!(!temp.path().join("github-path").exists());
        assert!(!temp.path().join("github-output").exists());
    }
}
