use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn routegen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_routegen"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run routegen")
}

fn write_page(root: &Path, glob: &str) {
    let path = root.join("src/pages").join(glob);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "export default function Page() {}").unwrap();
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = routegen(temp_dir.path(), &["init"]);
    assert!(output.status.success());

    let config_path = temp_dir.path().join(".routegen/settings.toml");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[pages]"));
    assert!(content.contains("[watch]"));

    // A second init without --force refuses to overwrite
    let output = routegen(temp_dir.path(), &["init"]);
    assert!(!output.status.success());

    let output = routegen(temp_dir.path(), &["init", "--force"]);
    assert!(output.status.success());
}

#[test]
fn test_generate_command() {
    let temp_dir = TempDir::new().unwrap();
    assert!(routegen(temp_dir.path(), &["init"]).status.success());
    write_page(temp_dir.path(), "index.tsx");
    write_page(temp_dir.path(), "about/index.tsx");

    let output = routegen(temp_dir.path(), &["generate"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(temp_dir.path().join("src/router/elegant/routes.json").exists());
    assert!(temp_dir.path().join("src/router/elegant/manifest.json").exists());
}

#[test]
fn test_routes_command_prints_entries() {
    let temp_dir = TempDir::new().unwrap();
    assert!(routegen(temp_dir.path(), &["init"]).status.success());
    write_page(temp_dir.path(), "user/[id].tsx");

    let output = routegen(temp_dir.path(), &["routes"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user_[id]"));
    assert!(stdout.contains("/user/:id"));
    // Listing never writes artifacts
    assert!(!temp_dir.path().join("src/router").exists());
}

#[test]
fn test_invalid_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[pages]\npatterns = [\"**/[unclosed.tsx\"]\n").unwrap();

    let output = routegen(
        temp_dir.path(),
        &["generate", "--config", config_path.to_str().unwrap()],
    );
    assert!(!output.status.success());
}
