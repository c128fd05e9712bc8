//! Fixture engine integration tests
//!
//! Exercises the provisioning flow end to end against a scratch
//! filesystem: bulk scaffold, overlay merge, live mirroring, teardown.

use stagehand_core::fixtures::{
    FixtureConfig, FixtureRegistry, PathResolver, SafeRemover, ScaffoldError, Scaffolder,
    WatchSession,
};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn resolver_for(temp: &TempDir) -> PathResolver {
    let config = FixtureConfig {
        projects_root: temp.path().join("projects"),
        fixtures_root: temp.path().join("project-fixtures"),
        workspace_root: temp.path().join("workspace"),
    };
    fs::create_dir_all(&config.projects_root).unwrap();
    fs::create_dir_all(&config.fixtures_root).unwrap();
    PathResolver::new(config)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_full_provisioning_flow() {
    let temp = TempDir::new().unwrap();
    let paths = resolver_for(&temp);

    // One project with an overlay, one without.
    write(
        &paths.project_source("demo"),
        "package.json",
        r#"{"projectFixtureDirectory": "overlay-a"}"#,
    );
    write(&paths.project_source("demo"), "x.txt", "B");
    write(&paths.project_source("plain"), "readme.md", "plain project");
    write(&paths.fixture_source("overlay-a"), "x.txt", "A");

    let registry = FixtureRegistry::load(paths.fixtures_root()).unwrap();
    let scaffolder = Scaffolder::new(&paths, &registry);

    // Bulk setup copies every base tree, descriptors untouched.
    scaffolder.scaffold_all().await.unwrap();
    assert_eq!(
        fs::read_to_string(paths.workspace_dir("demo").join("x.txt")).unwrap(),
        "B"
    );

    // Per-project scaffold applies the overlay on top.
    let demo = scaffolder.scaffold_project("demo").await.unwrap();
    assert_eq!(fs::read_to_string(demo.join("x.txt")).unwrap(), "A");

    let plain = scaffolder.scaffold_project("plain").await.unwrap();
    assert_eq!(
        fs::read_to_string(plain.join("readme.md")).unwrap(),
        "plain project"
    );
    assert!(!plain.join("x.txt").exists());

    // Teardown is idempotent per project and for the whole root.
    let remover = SafeRemover::new(&paths);
    remover.remove_project("demo").await.unwrap();
    assert!(!demo.exists());
    remover.remove_project("demo").await.unwrap();

    remover.remove_all().await.unwrap();
    assert!(!paths.workspace_root().exists());
    remover.remove_all().await.unwrap();
}

#[tokio::test]
async fn test_unknown_overlay_reports_registered_names() {
    let temp = TempDir::new().unwrap();
    let paths = resolver_for(&temp);

    fs::create_dir_all(paths.fixture_source("overlay-a")).unwrap();
    fs::create_dir_all(paths.fixture_source("overlay-b")).unwrap();
    write(
        &paths.project_source("demo"),
        "package.json",
        r#"{"projectFixtureDirectory": "overlay-c"}"#,
    );

    let registry = FixtureRegistry::load(paths.fixtures_root()).unwrap();
    let scaffolder = Scaffolder::new(&paths, &registry);
    let err = scaffolder.scaffold_project("demo").await.unwrap_err();

    match err {
        ScaffoldError::UnknownFixture {
            requested,
            available,
        } => {
            assert_eq!(requested, "overlay-c");
            assert_eq!(available, vec!["overlay-a", "overlay-b"]);
        }
        other => panic!("expected UnknownFixture, got {other:?}"),
    }
}

#[tokio::test]
async fn test_watch_session_mirrors_edits_in_place() {
    let temp = TempDir::new().unwrap();
    let paths = resolver_for(&temp);

    write(&paths.project_source("demo"), "spec.txt", "original");

    let registry = FixtureRegistry::load(paths.fixtures_root()).unwrap();
    let scaffolder = Scaffolder::new(&paths, &registry);
    let workspace = scaffolder.scaffold_project("demo").await.unwrap();
    let mirror = workspace.join("spec.txt");

    #[cfg(unix)]
    let inode_before = {
        use std::os::unix::fs::MetadataExt;
        fs::metadata(&mirror).unwrap().ino()
    };

    let _session = WatchSession::start(&paths).unwrap();

    // Give the recursive watch a moment to attach before editing.
    tokio::time::sleep(Duration::from_millis(500)).await;
    write(&paths.project_source("demo"), "spec.txt", "edited");

    let mut synced = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if fs::read_to_string(&mirror).unwrap() == "edited" {
            synced = true;
            break;
        }
    }
    assert!(synced, "mirror never picked up the source edit");

    // The mirror file was overwritten in place, not replaced.
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        assert_eq!(fs::metadata(&mirror).unwrap().ino(), inode_before);
    }
}
