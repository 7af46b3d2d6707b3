use routegen::routes::{PersistedRoute, RouteTransforms};
use routegen::{GenerateError, RouteGenerator, RouteManifest, Settings};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn settings_for(root: &Path) -> Settings {
    Settings {
        cwd: Some(root.to_path_buf()),
        ..Settings::default()
    }
}

fn write_page(root: &Path, glob: &str) {
    let path = root.join("src/pages").join(glob);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "export default function Page() {}").unwrap();
}

fn read_routes(settings: &Settings) -> Value {
    serde_json::from_str(&fs::read_to_string(settings.routes_path()).unwrap()).unwrap()
}

fn find<'a>(routes: &'a [PersistedRoute], name: &str) -> Option<&'a PersistedRoute> {
    routes.iter().find_map(|route| {
        if route.name == name {
            return Some(route);
        }
        find(route.children.as_deref().unwrap_or_default(), name)
    })
}

#[test]
fn test_generate_from_page_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    for glob in [
        "layout.tsx",
        "index.tsx",
        "about/index.tsx",
        "user/layout.tsx",
        "user/index.tsx",
        "user/[id].tsx",
        "user/components/card.tsx",
        "(auth)/layout.tsx",
        "(auth)/login/index.tsx",
        "404/index.tsx",
    ] {
        write_page(root, glob);
    }

    let settings = settings_for(root);
    let generator = RouteGenerator::new(settings.clone());
    let report = generator.generate(None).unwrap();
    assert!(report.warnings.is_empty());

    let routes = generator.store().load().unwrap();

    // The root has a layout, so everything else hangs below it
    assert_eq!(routes.len(), 1);
    let promoted = &routes[0];
    assert_eq!(promoted.name, "root");
    let children: Vec<_> = promoted
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(children, vec!["(auth)", "404", "about", "user", "notFound"]);

    let group = find(&routes, "(auth)").unwrap();
    assert_eq!(group.handle, Value::Null);
    assert_eq!(group.path, None);

    let user = find(&routes, "user").unwrap();
    assert_eq!(
        user.matched_files.clone().unwrap(),
        vec![
            Some("user".to_string()),
            Some("/src/pages/user/index.tsx".to_string()),
            None,
            None
        ]
    );
    assert_eq!(find(&routes, "user_[id]").unwrap().path.as_deref(), Some("/user/:id"));
    assert_eq!(
        find(&routes, "notFound").unwrap().matched_files.as_ref().unwrap()[1].as_deref(),
        Some("/src/pages/404/index.tsx")
    );

    let manifest = RouteManifest::load(&settings.manifest_path()).unwrap();
    assert_eq!(manifest.route_path("(auth)_login"), Some("/login"));
    assert_eq!(manifest.route_path("not-found"), Some("*"));
    assert_eq!(manifest.imports.layouts["user"], "@/pages/user/layout.tsx");
    assert_eq!(manifest.imports.pages["user_[id]"], "@/pages/user/[id].tsx");
    assert!(!manifest.names.iter().any(|n| n.contains("components")));
}

#[test]
fn test_regeneration_preserves_hand_edits() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_page(root, "index.tsx");
    write_page(root, "about/index.tsx");

    let settings = settings_for(root);
    let generator = RouteGenerator::new(settings.clone());
    generator.generate(None).unwrap();

    // Edit the artifact by hand
    let mut routes = read_routes(&settings);
    let about = routes
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|r| r["name"] == "about")
        .unwrap();
    about["handle"] = json!({ "title": "About us", "icon": "info" });
    about["path"] = json!("/edited");
    about["keepAlive"] = json!(true);
    fs::write(
        settings.routes_path(),
        serde_json::to_string_pretty(&routes).unwrap(),
    )
    .unwrap();

    write_page(root, "about/team/index.tsx");
    generator.generate(None).unwrap();

    let routes = generator.store().load().unwrap();
    let about = find(&routes, "about").unwrap();
    assert_eq!(about.handle, json!({ "title": "About us", "icon": "info" }));
    assert_eq!(about.extra["keepAlive"], json!(true));
    // Structural facts refresh
    assert_eq!(about.path.as_deref(), Some("/about"));
    assert_eq!(
        find(&routes, "about_team").unwrap().handle,
        json!({ "title": "about_team" })
    );
}

#[test]
fn test_regeneration_without_changes_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_page(root, "index.tsx");
    write_page(root, "blog/[slug].tsx");
    write_page(root, "blog/index.tsx");

    let settings = settings_for(root);
    let generator = RouteGenerator::new(settings.clone());

    generator.generate(None).unwrap();
    let first = fs::read_to_string(settings.routes_path()).unwrap();
    generator.generate(None).unwrap();
    let second = fs::read_to_string(settings.routes_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_custom_meta_generator() {
    let temp_dir = TempDir::new().unwrap();
    write_page(temp_dir.path(), "about/index.tsx");

    let transforms = RouteTransforms {
        meta: Arc::new(|name: &str| {
            json!({ "title": name.to_uppercase(), "i18nKey": format!("route.{name}") })
        }),
        ..RouteTransforms::default()
    };
    let generator = RouteGenerator::new(settings_for(temp_dir.path())).with_transforms(transforms);
    generator.generate(None).unwrap();

    let routes = generator.store().load().unwrap();
    assert_eq!(
        find(&routes, "about").unwrap().handle,
        json!({ "title": "ABOUT", "i18nKey": "route.about" })
    );
}

#[test]
fn test_malformed_artifact_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    write_page(temp_dir.path(), "index.tsx");

    let settings = settings_for(temp_dir.path());
    fs::create_dir_all(settings.routes_path().parent().unwrap()).unwrap();
    fs::write(settings.routes_path(), "{ broken").unwrap();

    let err = RouteGenerator::new(settings).generate(None).unwrap_err();
    assert!(matches!(err, GenerateError::Storage(_)));
    assert!(err.to_string().contains("Malformed"));
}

#[test]
fn test_invalid_page_names_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    write_page(temp_dir.path(), "about/index.tsx");
    write_page(temp_dir.path(), "bad name/index.tsx");

    let generator = RouteGenerator::new(settings_for(temp_dir.path()));
    let report = generator.generate(None).unwrap();

    assert_eq!(report.files, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].glob, "bad name/index.tsx");
}
