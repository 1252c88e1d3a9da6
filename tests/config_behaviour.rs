use std::error::Error;
use std::fs;

use sasspipe::config::{load_and_validate, load_or_default, ConfigFile};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_config_file_falls_back_to_defaults() -> TestResult {
    let dir = TempDir::new()?;
    let cfg = load_or_default(dir.path().join("Sasspipe.toml"))?;

    assert_eq!(cfg.paths.styles, "src/scss/*.scss");
    assert_eq!(cfg.paths.dest, "src/css/");
    assert_eq!(cfg.paths.markup, "*.html");
    assert_eq!(cfg.serve.port, 3000);
    assert!(cfg.output.sourcemaps);

    Ok(())
}

#[test]
fn minify_section_is_inert_by_default() -> TestResult {
    let cfg = ConfigFile::default();
    assert!(cfg.minify.is_inert());
    Ok(())
}

#[test]
fn toml_file_drives_all_sections() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Sasspipe.toml");
    fs::write(
        &path,
        r#"
[paths]
styles = "assets/sass/*.scss"
dest = "public/css/"
markup = "templates/*.html"

[output]
sourcemaps = false

[serve]
port = 8080
open_browser = false

[minify]
normalize_whitespace = true

[minify.discard_comments]
remove_all = true
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.paths.styles, "assets/sass/*.scss");
    assert_eq!(cfg.paths.dest, "public/css/");
    assert_eq!(cfg.paths.markup, "templates/*.html");
    assert!(!cfg.output.sourcemaps);
    assert_eq!(cfg.serve.port, 8080);
    assert!(!cfg.serve.open_browser);
    assert!(cfg.serve.inject_css, "unset options keep their defaults");

    assert!(!cfg.minify.is_inert());
    assert!(cfg.minify.normalize_whitespace);
    assert!(cfg.minify.discard_comments.remove_all);
    assert!(!cfg.minify.reduce_idents);

    Ok(())
}

#[test]
fn dest_matched_by_styles_glob_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Sasspipe.toml");
    fs::write(
        &path,
        r#"
[paths]
styles = "src/scss/*.scss"
dest = "src/scss/"
"#,
    )?;

    let err = load_and_validate(&path).expect_err("looping dest must fail");
    assert!(err.to_string().contains("retrigger"));

    Ok(())
}

#[test]
fn invalid_styles_glob_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Sasspipe.toml");
    fs::write(
        &path,
        r#"
[paths]
styles = "src/scss/[*.scss"
"#,
    )?;

    assert!(load_and_validate(&path).is_err());

    Ok(())
}
